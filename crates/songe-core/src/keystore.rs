//! The project key file.
//!
//! `.songe.key` is a small YAML record holding the verify key and the
//! passphrase-wrapped signing key. It is written 0600 because the wrapped
//! blob is still a brute-force target.

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use ed25519_dalek::VerifyingKey;
use serde::Deserialize;
use serde::Serialize;

use crate::codec;
use crate::config::Config;
use crate::error::Result;
use crate::error::SongeError;
use crate::fsutil;
use crate::keywrap;

/// On-disk key-file record.
///
/// Format quirk kept for compatibility: `verifykey` holds the verify-key
/// bytes in the signing-tag (`K…`) encoding, not the `P…` form.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct KeyFile {
    verifykey: String,
    signingkey: String,
}

/// Reads and writes the resolved key file for one project directory.
pub struct KeyStore {
    path: PathBuf,
    trust_sig_path: PathBuf,
}

impl KeyStore {
    pub fn new(dir: &Path, config: &Config) -> Self {
        let path = config.resolve_key_path(dir);
        let key_dir = path.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));
        Self {
            trust_sig_path: config.trust_sig_path(&key_dir),
            path,
        }
    }

    /// Resolved key-file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the wrapped signing key and the declared verify key.
    ///
    /// The declared key is what the file *claims*; after unwrapping, callers
    /// must check it against the key derived from the seed and treat a
    /// mismatch as [`SongeError::BadKeyfile`].
    pub fn load(&self) -> Result<(Vec<u8>, VerifyingKey)> {
        let text = fs::read_to_string(&self.path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                SongeError::BadKeyfile(format!("no key file at {}", self.path.display()))
            } else {
                SongeError::Io(e)
            }
        })?;
        let file: KeyFile = serde_yaml::from_str(&text)
            .map_err(|e| SongeError::BadKeyfile(format!("malformed key file: {e}")))?;

        let raw = codec::decode_signing_key(&file.verifykey)?;
        let verify = VerifyingKey::from_bytes(&raw)
            .map_err(|_| SongeError::BadKeyfile("stored verify key is not a valid Ed25519 point".into()))?;

        let wrapped = codec::decode_bytes(&file.signingkey)?;
        if wrapped.len() != keywrap::WRAPPED_LEN {
            return Err(SongeError::BadKeyfile(format!(
                "wrapped signing key is {} bytes, expected {}",
                wrapped.len(),
                keywrap::WRAPPED_LEN
            )));
        }
        Ok((wrapped, verify))
    }

    /// Write the key file (atomically, mode 0600) and delete any trust-list
    /// signature next to it: the list is signed by an identity this write
    /// just replaced, and a stale signature would be misleading.
    pub fn store(&self, wrapped: &[u8], verify: &VerifyingKey) -> Result<()> {
        let file = KeyFile {
            verifykey: codec::encode_signing_key(verify.as_bytes()),
            signingkey: codec::encode_bytes(wrapped),
        };
        let text = serde_yaml::to_string(&file)?;
        fsutil::write_atomic(&self.path, text.as_bytes(), true)?;

        match fs::remove_file(&self.trust_sig_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
