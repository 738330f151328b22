//! Filesystem utilities for atomic slot replacement.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Write `contents` to `destination` through a synced sibling temp file.
///
/// Readers see either the old contents or the new contents, never a mix.
pub fn write_atomic(destination: &Path, contents: &[u8]) -> io::Result<()> {
    let parent = destination.parent().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} has no parent directory", destination.display()),
        )
    })?;
    let file_name = destination
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_path = parent.join(format!(".{}.{}.tmp", file_name, std::process::id()));

    let result = (|| {
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(contents)?;
        file.sync_all()
    })();
    if let Err(err) = result {
        let _ = fs::remove_file(&temp_path);
        return Err(err);
    }

    replace_with(&temp_path, destination)
}

/// Move `staged` over `destination`.
///
/// Where rename refuses to overwrite, the destination is removed and the
/// rename retried. The staged file never outlives a failure.
fn replace_with(staged: &Path, destination: &Path) -> io::Result<()> {
    let Err(first) = fs::rename(staged, destination) else {
        return Ok(());
    };
    let _ = fs::remove_file(destination);
    fs::rename(staged, destination).map_err(|second| {
        let _ = fs::remove_file(staged);
        io::Error::new(
            second.kind(),
            format!(
                "Could not move {} into place ({}; retry: {})",
                staged.display(),
                first,
                second
            ),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_replace_with_overwrites_and_consumes_staged() {
        let dir = tempdir().unwrap();
        let staged = dir.path().join(".slot.tmp");
        let dest = dir.path().join("slot");
        fs::write(&dest, "old").unwrap();
        fs::write(&staged, "new").unwrap();

        replace_with(&staged, &dest).unwrap();

        assert!(!staged.exists());
        assert_eq!(fs::read_to_string(&dest).unwrap(), "new");
    }

    #[test]
    fn test_write_atomic_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("slot");

        write_atomic(&dest, b"first").unwrap();
        write_atomic(&dest, b"second").unwrap();

        assert_eq!(fs::read_to_string(&dest).unwrap(), "second");
        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["slot".to_string()]);
    }

    #[test]
    fn test_write_atomic_missing_parent_fails() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("missing").join("slot");
        assert!(write_atomic(&dest, b"x").is_err());
    }
}
