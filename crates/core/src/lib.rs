pub mod config;
pub mod document;

pub use config::Config;
pub use document::{DocumentCategory, DocumentSource, SUPPORTED_EXTENSIONS};
