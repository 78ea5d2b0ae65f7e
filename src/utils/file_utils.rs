use std::path::Path;
use std::fs;
use anyhow::{Result, Context};
use log::{debug, warn};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decode bytes as UTF-8, honouring a leading byte-order mark
pub fn decode_utf8_sig(bytes: &[u8]) -> Result<String, std::string::FromUtf8Error> {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    String::from_utf8(body.to_vec())
}

/// Read a text file, trying BOM-aware UTF-8 first and plain UTF-8 second
///
/// The plain fallback replaces undecodable sequences instead of failing, so a
/// single bad byte does not take a whole year of data with it.
pub fn read_text_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read file {}", path.display()))?;

    match decode_utf8_sig(&bytes) {
        Ok(text) => {
            debug!("Read {} bytes from {}", bytes.len(), path.display());
            Ok(text)
        }
        Err(e) => {
            warn!("{} is not valid UTF-8 ({}), falling back to lossy decoding", path.display(), e);
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_bom_is_stripped() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("bom.csv");
        fs::write(&path, b"\xEF\xBB\xBFHS\xEC\xBD\x94\xEB\x93\x9C\n8486\n")?;

        let text = read_text_file(&path)?;
        assert_eq!(text, "HS코드\n8486\n");
        Ok(())
    }

    #[test]
    fn test_invalid_utf8_falls_back_to_lossy() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("broken.csv");
        fs::write(&path, b"code\n84\xFF86\n")?;

        let text = read_text_file(&path)?;
        assert!(text.starts_with("code\n84"));
        assert!(text.contains('\u{FFFD}'));
        Ok(())
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(read_text_file(dir.path().join("absent.csv")).is_err());
    }
}
