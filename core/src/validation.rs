use crate::config::UploadLimits;
use crate::error::Result;
use crate::error::ValidationError;
use multiseek_protocol::MediaBlob;
use multiseek_protocol::Query;
use multiseek_protocol::SearchOptions;

/// Longest text query the backend accepts.
pub const MAX_QUERY_CHARS: usize = 500;
pub const MIN_TOP_K: u32 = 1;
pub const MAX_TOP_K: u32 = 1000;

/// Checks queries and files before they reach the network. Pure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryValidator {
    limits: UploadLimits,
}

impl QueryValidator {
    pub fn new(limits: UploadLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &UploadLimits {
        &self.limits
    }

    /// Returns the query normalized for submission: text is trimmed, files
    /// pass through untouched.
    pub fn validate(&self, query: Query) -> Result<Query> {
        match query {
            Query::Text { text } => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Err(ValidationError::EmptyQuery);
                }
                let actual = trimmed.chars().count();
                if actual > MAX_QUERY_CHARS {
                    return Err(ValidationError::QueryTooLong {
                        max: MAX_QUERY_CHARS,
                        actual,
                    });
                }
                Ok(Query::Text {
                    text: trimmed.to_string(),
                })
            }
            Query::Image { file } => {
                self.validate_file(&file)?;
                Ok(Query::Image { file })
            }
        }
    }

    /// Declared type must be `image/*` or `video/*`; size must be within the
    /// configured limit.
    pub fn validate_file(&self, file: &MediaBlob) -> Result<()> {
        if file.kind().is_none() {
            return Err(ValidationError::UnsupportedMediaType {
                mime: file.mime.clone(),
            });
        }
        if file.is_empty() {
            return Err(ValidationError::EmptyFile);
        }
        if file.len() > self.limits.max_bytes {
            return Err(ValidationError::FileTooLarge {
                size: file.len(),
                max: self.limits.max_bytes,
            });
        }
        Ok(())
    }

    pub fn validate_options(&self, options: &SearchOptions) -> Result<()> {
        if !(MIN_TOP_K..=MAX_TOP_K).contains(&options.top_k) {
            return Err(ValidationError::InvalidTopK {
                min: MIN_TOP_K,
                max: MAX_TOP_K,
                actual: options.top_k,
            });
        }
        Ok(())
    }
}

/// Validates with default limits.
pub fn validate(query: Query) -> Result<Query> {
    QueryValidator::default().validate(query)
}
