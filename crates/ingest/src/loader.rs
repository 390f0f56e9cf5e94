//! Document loading: local paths and remote URLs.

use std::time::Duration;

use docqa_core::DocumentSource;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("failed to download document: HTTP {0}")]
    Status(u16),
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// A fetched document: raw bytes plus the name extraction dispatches on.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub source: DocumentSource,
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Fetches documents from local paths or URLs. Reading is the only side
/// effect; parsing happens downstream.
pub struct Loader {
    client: reqwest::Client,
}

impl Loader {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    pub async fn fetch(&self, source: &DocumentSource) -> Result<LoadedDocument, FetchError> {
        let bytes = match source {
            DocumentSource::Path(path) => {
                debug!("Reading local document: {}", path.display());
                std::fs::read(path).map_err(|e| FetchError::Io {
                    path: path.display().to_string(),
                    source: e,
                })?
            }
            DocumentSource::Url(url) => {
                debug!("Downloading document: {}", url);
                let response = self.client.get(url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(FetchError::Status(status.as_u16()));
                }
                response.bytes().await?.to_vec()
            }
        };

        Ok(LoadedDocument {
            filename: source.filename(),
            source: source.clone(),
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn fetch_local_file() {
        let mut tmp = tempfile::NamedTempFile::with_suffix(".txt").unwrap();
        tmp.write_all(b"local contents").unwrap();

        let loader = Loader::new(Duration::from_secs(5));
        let source = DocumentSource::Path(tmp.path().to_path_buf());
        let loaded = loader.fetch(&source).await.unwrap();
        assert_eq!(loaded.bytes, b"local contents");
        assert!(loaded.filename.ends_with(".txt"));
    }

    #[tokio::test]
    async fn fetch_missing_file_is_io_error() {
        let loader = Loader::new(Duration::from_secs(5));
        let source = DocumentSource::parse("/definitely/not/here.txt");
        let err = loader.fetch(&source).await.unwrap_err();
        assert!(matches!(err, FetchError::Io { .. }));
    }
}
