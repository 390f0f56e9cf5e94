use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Extensions the extraction pipeline understands.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "txt", "text", "md", "markdown"];

/// Where a document comes from: a local file or a remote URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    Path(PathBuf),
    Url(String),
}

impl DocumentSource {
    /// Parse a user-supplied reference. `file://` prefixes and bare paths map
    /// to `Path`; `http(s)://` maps to `Url`.
    pub fn parse(input: &str) -> Self {
        if let Some(path) = input.strip_prefix("file://") {
            return Self::Path(PathBuf::from(path));
        }
        if input.starts_with("http://") || input.starts_with("https://") {
            return Self::Url(input.to_string());
        }
        Self::Path(PathBuf::from(input))
    }

    /// Stable identity string used as the cache key for this document.
    pub fn identity(&self) -> String {
        match self {
            Self::Path(p) => p.to_string_lossy().into_owned(),
            Self::Url(u) => u.clone(),
        }
    }

    /// Display filename. For URLs this is the last path segment with any
    /// query string stripped; unrecognized extensions fall back to
    /// `document.pdf`.
    pub fn filename(&self) -> String {
        match self {
            Self::Path(p) => p
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "document.pdf".to_string()),
            Self::Url(u) => {
                let last = u.rsplit('/').next().unwrap_or("");
                let name = last.split('?').next().unwrap_or("");
                if has_supported_extension(name) {
                    name.to_string()
                } else {
                    "document.pdf".to_string()
                }
            }
        }
    }
}

fn has_supported_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Inferred document category, selecting the chunking strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentCategory {
    Legal,
    Medical,
    Technical,
    Financial,
    Default,
}

impl DocumentCategory {
    pub const ALL: [DocumentCategory; 5] = [
        DocumentCategory::Legal,
        DocumentCategory::Medical,
        DocumentCategory::Technical,
        DocumentCategory::Financial,
        DocumentCategory::Default,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Legal => "legal",
            Self::Medical => "medical",
            Self::Technical => "technical",
            Self::Financial => "financial",
            Self::Default => "default",
        }
    }
}

impl std::fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_url() {
        let src = DocumentSource::parse("https://example.com/docs/policy.pdf?sig=abc");
        assert_eq!(
            src,
            DocumentSource::Url("https://example.com/docs/policy.pdf?sig=abc".into())
        );
        assert_eq!(src.filename(), "policy.pdf");
    }

    #[test]
    fn parse_file_scheme() {
        let src = DocumentSource::parse("file:///tmp/notes.md");
        assert_eq!(src, DocumentSource::Path(PathBuf::from("/tmp/notes.md")));
        assert_eq!(src.filename(), "notes.md");
    }

    #[test]
    fn parse_bare_path() {
        let src = DocumentSource::parse("/var/data/report.txt");
        assert_eq!(src, DocumentSource::Path(PathBuf::from("/var/data/report.txt")));
    }

    #[test]
    fn url_without_recognized_extension_defaults_to_pdf() {
        let src = DocumentSource::parse("https://example.com/download?id=42");
        assert_eq!(src.filename(), "document.pdf");
    }

    #[test]
    fn identity_is_stable() {
        let a = DocumentSource::parse("https://example.com/a.pdf");
        let b = DocumentSource::parse("https://example.com/a.pdf");
        assert_eq!(a.identity(), b.identity());
    }
}
