use thiserror::Error;

/// Failures surfaced by the gateway. Callers never see a raw `reqwest`
/// error; everything that did not produce an HTTP status is `Transport`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// No usable response: connection failure, timeout, or a body that
    /// could not be decoded.
    #[error("transport error: {0}")]
    Transport(String),

    #[error("search failed with status {status}{}", detail_suffix(.detail))]
    SearchFailed { status: u16, detail: Option<String> },

    #[error("upload failed with status {status}{}", detail_suffix(.detail))]
    UploadFailed { status: u16, detail: Option<String> },

    #[error("feed page request failed with status {status}{}", detail_suffix(.detail))]
    FeedFailed { status: u16, detail: Option<String> },

    #[error("{endpoint} request failed with status {status}{}", detail_suffix(.detail))]
    RequestFailed {
        endpoint: &'static str,
        status: u16,
        detail: Option<String>,
    },

    #[error("invalid gateway configuration: {0}")]
    InvalidConfig(String),
}

impl GatewayError {
    /// HTTP status carried by the error, if the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::SearchFailed { status, .. }
            | Self::UploadFailed { status, .. }
            | Self::FeedFailed { status, .. }
            | Self::RequestFailed { status, .. } => Some(*status),
            Self::Transport(_) | Self::InvalidConfig(_) => None,
        }
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(detail) => format!(": {detail}"),
        None => String::new(),
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Transport(err.to_string())
    }
}

impl From<url::ParseError> for GatewayError {
    fn from(err: url::ParseError) -> Self {
        GatewayError::InvalidConfig(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
