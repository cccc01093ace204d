//! Content classification
//!
//! Binary detection and the extension-to-MIME table used for file
//! responses.

use log::debug;
use std::path::Path;

pub const OCTET_STREAM: &str = "application/octet-stream";

// Deliberately small; unknown extensions fall back to octet-stream.
const MIME_TYPES: &[(&str, &str)] = &[
    ("css", "text/css"),
    ("html", "text/html"),
    ("gif", "image/gif"),
    ("jpeg", "image/jpeg"),
    ("jpg", "image/jpeg"),
    ("js", "text/javascript"),
    ("mp3", "audio/mpeg"),
    ("mp4", "video/mp4"),
    ("png", "image/png"),
    ("ico", "image/x-icon"),
    ("svg", "image/svg+xml"),
    ("txt", "text/plain"),
];

/// Look up the content type for a path by its extension.
pub fn mime_for_path(path: &Path) -> &'static str {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| {
            let ext = ext.to_ascii_lowercase();
            MIME_TYPES
                .iter()
                .find(|(known, _)| *known == ext)
                .map(|(_, mime)| *mime)
        })
        .unwrap_or(OCTET_STREAM)
}

/// A text byte is printable ASCII (space through `~`) or TAB/LF/CR.
fn is_text_byte(byte: u8) -> bool {
    (32..127).contains(&byte) || matches!(byte, b'\t' | b'\n' | b'\r')
}

/// Classify content as binary by scanning for the first non-text byte.
///
/// Stops at the first hit; a clean scan classifies the data as text.
pub fn is_binary(data: &[u8]) -> bool {
    match data.iter().position(|byte| !is_text_byte(*byte)) {
        Some(offset) => {
            debug!("binary byte {:#04x} at offset {offset}", data[offset]);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn printable_ascii_with_whitespace_is_text() {
        assert!(!is_binary(b"hello world\r\n\tindented line\n"));
        assert!(!is_binary(b""));
    }

    #[test]
    fn null_byte_is_binary() {
        assert!(is_binary(b"abc\0def"));
    }

    #[test]
    fn high_bytes_are_binary() {
        assert!(is_binary(&[0xC3, 0xA9]));
        assert!(is_binary(&[b'a', 0x80]));
    }

    #[test]
    fn control_bytes_other_than_whitespace_are_binary() {
        assert!(is_binary(&[0x07]));
        assert!(is_binary(&[0x1B, b'[']));
    }

    #[test]
    fn known_extensions_map_and_unknown_fall_back() {
        assert_eq!(mime_for_path(Path::new("a.html")), "text/html");
        assert_eq!(mime_for_path(Path::new("a.JPG")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("a.rs")), OCTET_STREAM);
        assert_eq!(mime_for_path(Path::new("noext")), OCTET_STREAM);
    }
}
