use std::fmt;
use std::time::Duration;

use url::Url;

use crate::AttributeSelector;

/// How long a rendered fetch waits for the selector when the caller does not say.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Which fetch strategy produced (or should produce) a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchMode {
    Static,
    Rendered,
}

impl FetchMode {
    pub fn label(self) -> &'static str {
        match self {
            FetchMode::Static => "Static",
            FetchMode::Rendered => "Rendered",
        }
    }

    /// Label used when this strategy answered an auto request directly.
    pub fn auto_label(self) -> String {
        format!("{} (Auto)", self.label())
    }

    /// Label used when this strategy answered an auto request after a fallback.
    pub fn fallback_label(self) -> String {
        format!("{} (Auto Fallback)", self.label())
    }
}

impl fmt::Display for FetchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RequestError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),
    #[error("Wait timeout must be a positive number of seconds, got {0}")]
    InvalidWaitTimeout(f64),
}

/// A single, validated extraction job.
///
/// The url is parsed up front so no strategy ever sees an unusable address.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionRequest {
    pub url: Url,
    pub selector: String,
    pub attribute: AttributeSelector,
    pub wait_timeout: Duration,
}

impl ExtractionRequest {
    pub fn new(url: &str, selector: &str, attribute: &str) -> Result<Self, RequestError> {
        let url = Url::parse(url.trim()).map_err(|err| RequestError::InvalidUrl(err.to_string()))?;
        match url.scheme() {
            "http" | "https" => {}
            other => return Err(RequestError::UnsupportedScheme(other.to_string())),
        }
        Ok(Self {
            url,
            selector: selector.trim().to_string(),
            attribute: AttributeSelector::parse(attribute),
            wait_timeout: DEFAULT_WAIT_TIMEOUT,
        })
    }

    pub fn with_wait_timeout_secs(mut self, seconds: f64) -> Result<Self, RequestError> {
        if seconds <= 0.0 {
            return Err(RequestError::InvalidWaitTimeout(seconds));
        }
        // Rejects NaN, infinity and values too large for a Duration.
        self.wait_timeout = Duration::try_from_secs_f64(seconds)
            .map_err(|_| RequestError::InvalidWaitTimeout(seconds))?;
        Ok(self)
    }

    pub fn has_selector(&self) -> bool {
        !self.selector.is_empty()
    }
}
