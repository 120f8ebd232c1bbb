//! PDF header sniffing.
//!
//! Input folders collect whatever staff drop into them, so a file is checked
//! for the `%PDF-x.y` magic before it reaches the decoder.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3;

/// Read the header of `path` and return its PDF version (e.g. `"1.7"`).
pub fn sniff_pdf_version<P: AsRef<Path>>(path: P) -> Result<String> {
    let mut header = Vec::with_capacity(16);
    File::open(path)?.take(16).read_to_end(&mut header)?;
    pdf_version_from_bytes(&header)
}

/// Return the PDF version declared by a header byte slice.
pub fn pdf_version_from_bytes(data: &[u8]) -> Result<String> {
    let rest = data.strip_prefix(PDF_MAGIC).ok_or(Error::UnknownFormat)?;
    if rest.len() < VERSION_LEN {
        return Err(Error::UnknownFormat);
    }

    let version = String::from_utf8_lossy(&rest[..VERSION_LEN]).to_string();
    match version.as_bytes() {
        [major, b'.', minor] if major.is_ascii_digit() && minor.is_ascii_digit() => Ok(version),
        _ => Err(Error::UnsupportedVersion(version)),
    }
}

/// Whether the file at `path` carries a readable PDF header.
pub fn is_pdf<P: AsRef<Path>>(path: P) -> bool {
    sniff_pdf_version(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_from_header() {
        assert_eq!(pdf_version_from_bytes(b"%PDF-1.7\n%\xe2\xe3").unwrap(), "1.7");
        assert_eq!(pdf_version_from_bytes(b"%PDF-2.0\n").unwrap(), "2.0");
    }

    #[test]
    fn test_rejects_non_pdf() {
        assert!(matches!(
            pdf_version_from_bytes(b"<!DOCTYPE html>"),
            Err(Error::UnknownFormat)
        ));
        assert!(matches!(
            pdf_version_from_bytes(b"%PDF"),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_rejects_garbled_version() {
        assert!(matches!(
            pdf_version_from_bytes(b"%PDF-x.y\n"),
            Err(Error::UnsupportedVersion(v)) if v == "x.y"
        ));
    }

    #[test]
    fn test_sniff_file() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("a.pdf");
        let txt = dir.path().join("b.pdf");
        std::fs::write(&pdf, b"%PDF-1.4\n%%EOF").unwrap();
        std::fs::write(&txt, b"hello").unwrap();

        assert!(is_pdf(&pdf));
        assert!(!is_pdf(&txt));
        assert!(!is_pdf(dir.path().join("missing.pdf")));
    }
}
