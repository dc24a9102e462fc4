//! Text layer extraction backed by `pdf-extract`.

use crate::core::{PageSource, PageText};
use crate::utils::error::{EtlError, Result};
use std::panic::{self, AssertUnwindSafe};

/// The `%PDF-` marker must appear within the first kilobyte.
const HEADER_SEARCH_WINDOW: usize = 1024;

#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextSource;

impl PdfTextSource {
    pub fn new() -> Self {
        Self
    }
}

fn has_pdf_header(data: &[u8]) -> bool {
    let window = &data[..data.len().min(HEADER_SEARCH_WINDOW)];
    window.windows(5).any(|w| w == b"%PDF-")
}

/// Numbers pages from 1. Blank pages (scanned images, empty pages) carry no text.
pub fn pages_from_texts(texts: Vec<String>) -> Vec<PageText> {
    texts
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            let text = if text.trim().is_empty() { None } else { Some(text) };
            PageText::new(i + 1, text)
        })
        .collect()
}

impl PageSource for PdfTextSource {
    fn page_texts(&self, document: &[u8]) -> Result<Vec<PageText>> {
        if !has_pdf_header(document) {
            return Err(EtlError::PdfError {
                message: "missing %PDF header".to_string(),
            });
        }

        // pdf-extract panics on some malformed font data.
        let extracted = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(document)
        }));

        match extracted {
            Ok(Ok(texts)) => Ok(pages_from_texts(texts)),
            Ok(Err(e)) => Err(EtlError::PdfError {
                message: e.to_string(),
            }),
            Err(_) => Err(EtlError::PdfError {
                message: "PDF parser panicked while reading the text layer".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_pdf_input_is_rejected() {
        let err = PdfTextSource::new()
            .page_texts(b"41.555616 69.123456")
            .unwrap_err();
        assert!(matches!(err, EtlError::PdfError { .. }));
    }

    #[test]
    fn test_header_search() {
        assert!(has_pdf_header(b"%PDF-1.7\n"));
        assert!(has_pdf_header(b"\xef\xbb\xbf%PDF-1.4"));
        assert!(!has_pdf_header(b"%PD"));
        assert!(!has_pdf_header(b""));
    }

    #[test]
    fn test_blank_pages_have_no_text() {
        let pages = pages_from_texts(vec![
            "0001 41.5 69.1".to_string(),
            "  \n ".to_string(),
            String::new(),
        ]);
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0], PageText::new(1, Some("0001 41.5 69.1".to_string())));
        assert_eq!(pages[1], PageText::new(2, None));
        assert_eq!(pages[2].number, 3);
        assert!(pages[2].text.is_none());
    }
}
