//! Error type shared by the library.

use thiserror::Error;

/// Extraction run errors.
///
/// Anything returned here is fatal to the run. Malformed fragments and
/// documents without data rows are not errors.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Fragment source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Page {page} out of range (document has {count} pages)")]
    PageOutOfRange { page: usize, count: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid pattern for rule '{name}': {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, ExtractError>;
