// RouterLens - platform/fs.rs
//
// File reading helpers for log input.

use std::io;
use std::path::Path;

/// Read the full content of a file as a string.
///
/// Router exports are not guaranteed to be UTF-8; invalid sequences are
/// replaced rather than rejected so one bad byte never drops the upload.
pub fn read_file_lossy(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes);
    if let std::borrow::Cow::Owned(_) = text {
        tracing::debug!(path = %path.display(), "Invalid UTF-8 replaced while reading");
    }
    Ok(text.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_valid_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log.txt");
        std::fs::write(&path, "jan/05/2024 10:15:30 system,info ok\n").unwrap();
        assert_eq!(
            read_file_lossy(&path).unwrap(),
            "jan/05/2024 10:15:30 system,info ok\n"
        );
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log.txt");
        std::fs::write(&path, b"dhcp,info host \xff\xfe name\n").unwrap();
        let text = read_file_lossy(&path).unwrap();
        assert!(text.starts_with("dhcp,info host "));
        assert!(text.contains('\u{FFFD}'));
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let err = read_file_lossy(&dir.path().join("absent.log")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
