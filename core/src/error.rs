use thiserror::Error;

/// Reasons a query or file is refused before any request is made.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a search query")]
    EmptyQuery,

    #[error("Query is too long: maximum {max} characters, got {actual}")]
    QueryTooLong { max: usize, actual: usize },

    #[error("Unsupported file type {mime:?}: please choose an image or video")]
    UnsupportedMediaType { mime: String },

    #[error("The selected file is empty")]
    EmptyFile,

    #[error("File is too large: {size} bytes exceeds the {max} byte limit")]
    FileTooLarge { size: u64, max: u64 },

    #[error("top_k must be between {min} and {max}, got {actual}")]
    InvalidTopK { min: u32, max: u32, actual: u32 },
}

pub type Result<T> = std::result::Result<T, ValidationError>;
