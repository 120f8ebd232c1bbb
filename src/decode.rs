//! PDF text decoding.
//!
//! Decoding sits behind the [`PdfDecoder`] trait so the batch runner never
//! touches lopdf types directly and tests can feed it canned page text.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::RecvTimeoutError;
use lopdf::Document as LopdfDocument;
use unicode_normalization::UnicodeNormalization;

use crate::detect::sniff_pdf_version;
use crate::error::{Error, Result};

/// Source of per-page text for a PDF file.
pub trait PdfDecoder: Send + Sync {
    /// Return the text of every page, in page order.
    fn decode(&self, path: &Path) -> Result<Vec<String>>;
}

/// Text of one input document, pages joined with newlines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocumentText {
    text: String,
    page_count: usize,
}

impl RawDocumentText {
    /// Join page texts, each followed by a newline, and NFC-normalise the result.
    pub fn from_pages<S: AsRef<str>>(pages: &[S]) -> Self {
        let mut text = String::new();
        for page in pages {
            text.push_str(page.as_ref());
            text.push('\n');
        }
        Self {
            text: text.nfc().collect(),
            page_count: pages.len(),
        }
    }

    /// The full document text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of pages the text came from.
    pub fn page_count(&self) -> usize {
        self.page_count
    }
}

/// [`PdfDecoder`] backed by lopdf's text extraction.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfDecoder;

impl LopdfDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl PdfDecoder for LopdfDecoder {
    fn decode(&self, path: &Path) -> Result<Vec<String>> {
        let version = sniff_pdf_version(path)?;
        log::debug!("Decoding {} (PDF {})", path.display(), version);

        let doc = LopdfDocument::load(path).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }

        doc.get_pages()
            .keys()
            .map(|&page_num| {
                doc.extract_text(&[page_num])
                    .map_err(|e| Error::PdfParse(format!("Page {}: {}", page_num, e)))
            })
            .collect()
    }
}

/// Decode `path` into document text, giving up after `timeout`.
///
/// Any decoder error becomes [`Error::DecodeFailure`]. With a timeout the
/// decoder runs on its own thread; a decoder that never returns leaves that
/// thread behind but the batch moves on.
pub fn decode_document(
    decoder: &Arc<dyn PdfDecoder>,
    path: &Path,
    timeout: Option<Duration>,
) -> Result<RawDocumentText> {
    let pages = match timeout {
        Some(timeout) => decode_with_timeout(decoder, path, timeout)?,
        None => decoder.decode(path),
    };

    let pages = pages.map_err(|e| Error::DecodeFailure {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let text = RawDocumentText::from_pages(&pages);
    log::debug!(
        "Decoded {} pages ({} chars) from {}",
        text.page_count(),
        text.as_str().len(),
        path.display()
    );
    Ok(text)
}

/// Outer `Result` is the timeout, inner is the decoder's own outcome.
fn decode_with_timeout(
    decoder: &Arc<dyn PdfDecoder>,
    path: &Path,
    timeout: Duration,
) -> Result<Result<Vec<String>>> {
    let (tx, rx) = crossbeam_channel::bounded(1);
    let worker = Arc::clone(decoder);
    let worker_path: PathBuf = path.to_path_buf();

    std::thread::Builder::new()
        .name("pdf-decode".to_string())
        .spawn(move || {
            // The receiver is gone if we already timed out.
            let _ = tx.send(worker.decode(&worker_path));
        })?;

    match rx.recv_timeout(timeout) {
        Ok(pages) => Ok(pages),
        Err(RecvTimeoutError::Timeout) => Err(Error::DecodeTimeout {
            path: path.to_path_buf(),
            timeout,
        }),
        Err(RecvTimeoutError::Disconnected) => Err(Error::DecodeFailure {
            path: path.to_path_buf(),
            reason: "decoder thread exited without a result".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SlowDecoder(Duration);

    impl PdfDecoder for SlowDecoder {
        fn decode(&self, _path: &Path) -> Result<Vec<String>> {
            std::thread::sleep(self.0);
            Ok(vec!["late".to_string()])
        }
    }

    struct FailingDecoder;

    impl PdfDecoder for FailingDecoder {
        fn decode(&self, _path: &Path) -> Result<Vec<String>> {
            Err(Error::Encrypted)
        }
    }

    #[test]
    fn test_pages_joined_with_trailing_newline() {
        let text = RawDocumentText::from_pages(&["one", "two"]);
        assert_eq!(text.as_str(), "one\ntwo\n");
        assert_eq!(text.page_count(), 2);
    }

    #[test]
    fn test_text_is_nfc_normalised() {
        let text = RawDocumentText::from_pages(&["Jose\u{301}"]);
        assert_eq!(text.as_str(), "Jos\u{e9}\n");
    }

    #[test]
    fn test_timeout() {
        let decoder: Arc<dyn PdfDecoder> = Arc::new(SlowDecoder(Duration::from_secs(2)));
        let result = decode_document(
            &decoder,
            Path::new("slow.pdf"),
            Some(Duration::from_millis(50)),
        );
        assert!(matches!(result, Err(Error::DecodeTimeout { .. })));
    }

    #[test]
    fn test_fast_decoder_within_timeout() {
        let decoder: Arc<dyn PdfDecoder> = Arc::new(SlowDecoder(Duration::from_millis(1)));
        let text =
            decode_document(&decoder, Path::new("fast.pdf"), Some(Duration::from_secs(5))).unwrap();
        assert_eq!(text.as_str(), "late\n");
    }

    #[test]
    fn test_decoder_error_becomes_decode_failure() {
        let decoder: Arc<dyn PdfDecoder> = Arc::new(FailingDecoder);
        let result = decode_document(&decoder, Path::new("locked.pdf"), None);
        match result {
            Err(Error::DecodeFailure { path, reason }) => {
                assert_eq!(path, PathBuf::from("locked.pdf"));
                assert_eq!(reason, "Document is encrypted");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_lopdf_decoder_rejects_non_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.pdf");
        std::fs::write(&path, "just some notes").unwrap();

        let result = LopdfDecoder::new().decode(&path);
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }
}
