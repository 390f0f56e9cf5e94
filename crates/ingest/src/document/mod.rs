mod md;
mod pdf;
mod txt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),
    #[error("PDF extraction failed: {0}")]
    PdfError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A page of extracted text. For TXT/MD the whole file is page 1.
#[derive(Debug, Clone)]
pub struct PageContent {
    /// 1-based page number (for PDFs).
    pub page_number: usize,
    pub text: String,
}

/// Result of extracting text from a document.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub filename: String,
    /// File type: "pdf", "txt", "md"
    pub file_type: String,
    pub pages: Vec<PageContent>,
}

impl ExtractedDocument {
    /// All text concatenated, pages separated by a blank line.
    pub fn full_text(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn total_chars(&self) -> usize {
        self.pages.iter().map(|p| p.text.chars().count()).sum()
    }
}

/// Extract text from file bytes based on the filename's extension.
pub fn extract_text(bytes: &[u8], filename: &str) -> Result<ExtractedDocument, ExtractionError> {
    let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();
    let file_type = ext.as_str();

    let pages = match file_type {
        "pdf" => pdf::extract_pdf(bytes)?,
        "txt" | "text" => txt::extract_txt(bytes)?,
        "md" | "markdown" => md::extract_md(bytes)?,
        other => return Err(ExtractionError::UnsupportedType(other.to_string())),
    };

    Ok(ExtractedDocument {
        filename: filename.to_string(),
        file_type: file_type.to_string(),
        pages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_on_extension() {
        let doc = extract_text(b"plain contents", "notes.txt").unwrap();
        assert_eq!(doc.file_type, "txt");
        assert_eq!(doc.pages.len(), 1);
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = extract_text(b"...", "slides.pptx").unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedType(ref t) if t == "pptx"));
    }

    #[test]
    fn full_text_joins_pages() {
        let doc = ExtractedDocument {
            filename: "x.pdf".into(),
            file_type: "pdf".into(),
            pages: vec![
                PageContent { page_number: 1, text: "one".into() },
                PageContent { page_number: 2, text: "two".into() },
            ],
        };
        assert_eq!(doc.full_text(), "one\n\ntwo");
        assert_eq!(doc.total_chars(), 6);
    }
}
