//! Directory preparation shared by the generator and the table writer.

use std::fs::{self, create_dir_all};
use std::path::Path;

use crate::error::{PipelineError, Result};

/// Prefix of the temporary files atomic writers create before renaming.
pub(crate) const PARTIAL_PREFIX: &str = ".partial-";

/// Make sure `dir` exists as a writable directory, creating it (and any
/// missing parents) when absent.
///
/// # Errors
/// [`PipelineError::Directory`] when the path exists but is not a directory,
/// cannot be written to, or cannot be created.
pub fn ensure_directory(dir: impl AsRef<Path>) -> Result<()> {
    let dir = dir.as_ref();
    match fs::metadata(dir) {
        Ok(meta) if !meta.is_dir() => {
            return Err(PipelineError::directory(dir, "exists but is not a directory"));
        }
        Ok(_) => {}
        Err(_) => create_dir_all(dir)
            .map_err(|e| PipelineError::directory(dir, format!("mkdir -p failed: {e}")))?,
    }
    // A real file also catches ownership and ACL denials the mode bits hide.
    tempfile::tempfile_in(dir)
        .map(drop)
        .map_err(|e| PipelineError::directory(dir, format!("is not writable: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_missing_nested_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("a").join("b");
        ensure_directory(&dir).unwrap();
        assert!(dir.is_dir());
        // second call is a no-op
        ensure_directory(&dir).unwrap();
    }

    #[test]
    fn rejects_regular_file() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("occupied");
        fs::write(&file, b"x").unwrap();
        let err = ensure_directory(&file).unwrap_err();
        assert!(matches!(err, PipelineError::Directory { .. }));
        assert!(err.to_string().contains("not a directory"));
    }

    #[cfg(unix)]
    #[test]
    fn rejects_directory_without_write_access() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("locked");
        fs::create_dir(&dir).unwrap();
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o555)).unwrap();

        // Privileged users bypass permission bits; nothing to check then.
        let bypassed = fs::write(dir.join("canary"), b"").is_ok();
        let result = ensure_directory(&dir);
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o755)).unwrap();
        if bypassed {
            return;
        }

        let err = result.unwrap_err();
        assert!(matches!(err, PipelineError::Directory { .. }));
        assert!(err.to_string().contains("is not writable"));
    }
}
