//! Atomic file writes.

use std::io::Write as _;
use std::path::Path;

use crate::error::Result;

/// Write `bytes` to `path` through a temporary file in the same directory,
/// then rename into place. A crash mid-write leaves the previous file
/// intact. `owner_only` restricts the mode to 0600 on Unix; other files get
/// the usual 0644.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8], owner_only: bool) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = if owner_only { 0o600 } else { 0o644 };
        tmp.as_file().set_permissions(std::fs::Permissions::from_mode(mode))?;
    }
    #[cfg(not(unix))]
    let _ = owner_only;

    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
