//! Local filesystem helpers.

use std::path::Path;

use tracing::{debug, warn};

/// Deletes a local file. Directories are not removed.
///
/// Returns `false` on any failure.
pub fn delete_local_file(path: &str) -> bool {
    if path.is_empty() {
        return false;
    }
    match std::fs::remove_file(Path::new(path)) {
        Ok(()) => {
            debug!(path = %path, "Script deleted local file");
            true
        }
        Err(e) => {
            warn!(path = %path, error = %e, "Script failed to delete local file");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_existing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("a.txt");
        std::fs::write(&file, "x").expect("write");

        assert!(delete_local_file(file.to_str().expect("utf8")));
        assert!(!file.exists());
    }

    #[test]
    fn test_delete_failures_return_false() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("missing.txt");
        assert!(!delete_local_file(missing.to_str().expect("utf8")));
        assert!(!delete_local_file(dir.path().to_str().expect("utf8")));
        assert!(dir.path().exists());
        assert!(!delete_local_file(""));
    }
}
