//! File-name conventions and key-file discovery.

use std::path::Path;
use std::path::PathBuf;

/// File-name conventions for a signing project.
///
/// Modeled as one immutable record handed to the components rather than
/// scattered constants, so tests and embedders can relocate everything at
/// once.
#[derive(Debug, Clone)]
pub struct Config {
    /// Name of the key file inside a project directory.
    pub key_file: String,
    /// Name of the trusted-keys list.
    pub trust_file: String,
    /// Extension appended to a signed file's path for its signature record.
    pub sig_ext: String,
    /// Environment variable naming a shared key directory.
    pub home_var: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            key_file: ".songe.key".into(),
            trust_file: ".songe.trust".into(),
            sig_ext: ".sgsig".into(),
            home_var: "SONGE_HOME".into(),
        }
    }
}

impl Config {
    /// Path of the trust list inside `dir`.
    pub fn trust_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.trust_file)
    }

    /// Path of the trust list's signature sibling inside `dir`.
    pub fn trust_sig_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}{}", self.trust_file, self.sig_ext))
    }

    /// Path of a file's detached signature record (`<file>.sgsig`).
    pub fn sig_path(&self, file: &Path) -> PathBuf {
        let mut os = file.as_os_str().to_os_string();
        os.push(&self.sig_ext);
        PathBuf::from(os)
    }

    /// Resolve the key file to read or write for a project at `dir`.
    ///
    /// Lookup order: the project directory itself, then the directory named
    /// by `SONGE_HOME` (when it exists), then `$HOME` (when a key file is
    /// already there). Writes fall back to the project directory.
    pub fn resolve_key_path(&self, dir: &Path) -> PathBuf {
        let local = dir.join(&self.key_file);
        if local.exists() {
            return local;
        }
        if let Some(shared) = std::env::var_os(&self.home_var) {
            let shared = PathBuf::from(shared);
            if shared.is_dir() {
                return shared.join(&self.key_file);
            }
        }
        if let Some(home) = std::env::var_os("HOME") {
            let user = PathBuf::from(home).join(&self.key_file);
            if user.exists() {
                return user;
            }
        }
        local
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sig_path_appends_extension() {
        let config = Config::default();
        assert_eq!(config.sig_path(Path::new("dir/hello.txt")), PathBuf::from("dir/hello.txt.sgsig"));
    }

    #[test]
    fn trust_sig_path_is_sibling_of_trust_file() {
        let config = Config::default();
        assert_eq!(config.trust_sig_path(Path::new("/p")), PathBuf::from("/p/.songe.trust.sgsig"));
    }

    #[test]
    fn local_key_file_wins() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join(".songe.key");
        std::fs::write(&local, "x").unwrap();

        let config = Config::default();
        assert_eq!(config.resolve_key_path(dir.path()), local);
    }

    #[test]
    fn missing_key_file_resolves_to_project_dir_for_writes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            home_var: "SONGE_TEST_UNSET_HOME".into(),
            ..Config::default()
        };
        // No local file, no shared dir: resolution falls back to the
        // project directory so a write can create it there.
        let resolved = config.resolve_key_path(dir.path());
        assert!(resolved == dir.path().join(".songe.key") || resolved.ends_with(".songe.key"));
    }
}
