//! Upload input validation.
//!
//! The upload endpoint accepts plain-text payloads; when the client names the
//! original file, the extension is checked so binary formats get a clear
//! rejection instead of garbage chunks.

use crate::core::errors::RagError;

const SUPPORTED_EXTENSIONS: [&str; 3] = ["txt", "md", "markdown"];

/// Reject filenames whose extension we cannot treat as plain text.
pub fn ensure_supported(filename: &str) -> Result<(), RagError> {
    let extension = filename
        .rsplit('.')
        .next()
        .filter(|ext| !ext.is_empty() && *ext != filename)
        .map(str::to_lowercase);

    match extension {
        Some(ext) if SUPPORTED_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        Some(ext) => Err(RagError::UnsupportedInput(format!(
            "unsupported file type: .{}",
            ext
        ))),
        None => Err(RagError::UnsupportedInput(format!(
            "file has no extension: {}",
            filename
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_extensions_are_accepted() {
        assert!(ensure_supported("notes.txt").is_ok());
        assert!(ensure_supported("README.md").is_ok());
        assert!(ensure_supported("paper.MARKDOWN").is_ok());
    }

    #[test]
    fn binary_formats_are_rejected() {
        let err = ensure_supported("paper.pdf").unwrap_err();
        assert!(matches!(err, RagError::UnsupportedInput(_)));
        assert!(err.to_string().contains(".pdf"));

        assert!(ensure_supported("archive.zip").is_err());
    }

    #[test]
    fn missing_extension_is_rejected() {
        assert!(ensure_supported("Makefile").is_err());
    }
}
