/// Why a fetch strategy gave up on a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}: {message}", .kind.category())]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Network,
    Session,
    InvalidSelector,
}

impl FailureKind {
    /// Caller-facing error family, used as the prefix of every message.
    pub fn category(&self) -> &'static str {
        match self {
            FailureKind::InvalidUrl => "Invalid URL",
            FailureKind::HttpStatus(_)
            | FailureKind::Timeout
            | FailureKind::TooLarge { .. }
            | FailureKind::Network => "Network error",
            FailureKind::Session => "Browser session error",
            FailureKind::InvalidSelector => "Invalid selector",
        }
    }
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_builder() {
        return FetchError::new(FailureKind::InvalidUrl, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
