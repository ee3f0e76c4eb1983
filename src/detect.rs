//! Layout format detection.

use crate::error::{Error, Result};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Text formats a layout can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextFormat {
    /// djvused hidden-text script
    #[default]
    Djvused,
    /// hOCR (HTML microformat)
    Hocr,
    /// Plain text, no coordinates
    Text,
    /// Nested JSON nodes
    Json,
}

impl TextFormat {
    /// Every known format.
    pub const ALL: [TextFormat; 4] = [
        TextFormat::Djvused,
        TextFormat::Hocr,
        TextFormat::Text,
        TextFormat::Json,
    ];

    /// Canonical lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            TextFormat::Djvused => "djvused",
            TextFormat::Hocr => "hocr",
            TextFormat::Text => "text",
            TextFormat::Json => "json",
        }
    }

    /// Preferred file extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            TextFormat::Djvused => "djvused",
            TextFormat::Hocr => "hocr",
            TextFormat::Text => "txt",
            TextFormat::Json => "json",
        }
    }

    /// MIME type of rendered output.
    pub fn mime_type(&self) -> &'static str {
        match self {
            TextFormat::Djvused | TextFormat::Text => "text/plain",
            TextFormat::Hocr => "text/html",
            TextFormat::Json => "application/json",
        }
    }

    /// Whether a layout can be read from this format.
    pub fn is_readable(&self) -> bool {
        matches!(self, TextFormat::Djvused)
    }
}

impl fmt::Display for TextFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TextFormat {
    type Err = Error;

    /// Accepts the full name or any abbreviation sharing its first letter,
    /// so `h`, `hocr` and `html` all select hOCR.
    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_bytes().first() {
            Some(b'd') => Ok(TextFormat::Djvused),
            Some(b'h') => Ok(TextFormat::Hocr),
            Some(b't') => Ok(TextFormat::Text),
            Some(b'j') => Ok(TextFormat::Json),
            _ => Err(Error::Unsupported(format!("unknown text format '{}'", s))),
        }
    }
}

/// Detect a format from a file name's extension.
///
/// # Example
/// ```
/// use pdfsed::detect::{detect_format_from_path, TextFormat};
///
/// let format = detect_format_from_path("page-01.djvused").unwrap();
/// assert_eq!(format, TextFormat::Djvused);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<TextFormat> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "djvused" | "dsed" => Ok(TextFormat::Djvused),
        "hocr" | "html" | "htm" => Ok(TextFormat::Hocr),
        "txt" | "text" => Ok(TextFormat::Text),
        "json" => Ok(TextFormat::Json),
        _ => Err(Error::Unsupported(format!(
            "cannot detect text format of '{}'",
            path.display()
        ))),
    }
}

/// Guess a format from the first non-whitespace byte of some content.
///
/// `(` means djvused, `<` hOCR and `{` JSON. Anything else is plain text.
pub fn detect_format_from_bytes(data: &[u8]) -> TextFormat {
    match data.iter().find(|b| !b.is_ascii_whitespace()) {
        Some(b'(') => TextFormat::Djvused,
        Some(b'<') => TextFormat::Hocr,
        Some(b'{') => TextFormat::Json,
        _ => TextFormat::Text,
    }
}

/// Check whether a file looks like a readable layout.
pub fn is_djvused<P: AsRef<Path>>(path: P) -> bool {
    matches!(detect_format_from_path(path), Ok(TextFormat::Djvused))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_from_path() {
        assert_eq!(
            detect_format_from_path("a/b/page.djvused").unwrap(),
            TextFormat::Djvused
        );
        assert_eq!(detect_format_from_path("page.HTML").unwrap(), TextFormat::Hocr);
        assert_eq!(detect_format_from_path("page.hocr").unwrap(), TextFormat::Hocr);
        assert_eq!(detect_format_from_path("page.txt").unwrap(), TextFormat::Text);
        assert_eq!(detect_format_from_path("page.json").unwrap(), TextFormat::Json);
    }

    #[test]
    fn test_detect_unknown_extension() {
        assert!(matches!(
            detect_format_from_path("page.pdf"),
            Err(Error::Unsupported(_))
        ));
        assert!(detect_format_from_path("noext").is_err());
    }

    #[test]
    fn test_parse_format_name() {
        assert_eq!("hocr".parse::<TextFormat>().unwrap(), TextFormat::Hocr);
        assert_eq!("h".parse::<TextFormat>().unwrap(), TextFormat::Hocr);
        assert_eq!("Djvu".parse::<TextFormat>().unwrap(), TextFormat::Djvused);
        assert_eq!("txt".parse::<TextFormat>().unwrap(), TextFormat::Text);
        assert_eq!("json".parse::<TextFormat>().unwrap(), TextFormat::Json);
        assert!("xml".parse::<TextFormat>().is_err());
        assert!("".parse::<TextFormat>().is_err());
    }

    #[test]
    fn test_detect_from_bytes() {
        assert_eq!(detect_format_from_bytes(b"  \n(page 0 0 1 1)"), TextFormat::Djvused);
        assert_eq!(detect_format_from_bytes(b"<!DOCTYPE html>"), TextFormat::Hocr);
        assert_eq!(detect_format_from_bytes(b"{\"level\":1}"), TextFormat::Json);
        assert_eq!(detect_format_from_bytes(b"hello"), TextFormat::Text);
        assert_eq!(detect_format_from_bytes(b""), TextFormat::Text);
    }

    #[test]
    fn test_readability() {
        assert!(TextFormat::Djvused.is_readable());
        assert!(!TextFormat::Hocr.is_readable());
        assert!(is_djvused("x.djvused"));
        assert!(!is_djvused("x.txt"));
        for format in TextFormat::ALL {
            assert_eq!(format.name().parse::<TextFormat>().unwrap(), format);
        }
    }
}
