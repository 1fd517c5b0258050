use thiserror::Error;

/// Errors surfaced by the conversion pipeline.
///
/// Bad input never shows up here: unparsable links, entries and
/// unsupported protocols are skipped and reported through
/// [`crate::models::ConversionResult`]. These variants describe setup
/// mistakes and failures of the outside world.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Format already registered: {0}")]
    DuplicateFormat(String),

    #[error("Adapter already registered for protocol: {0}")]
    DuplicateAdapter(&'static str),

    #[error("No adapter registered for protocol: {0}")]
    MissingAdapter(&'static str),

    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    #[error("No parser registered for format: {0}")]
    MissingParser(String),

    #[error("No generator registered for format: {0}")]
    MissingGenerator(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
