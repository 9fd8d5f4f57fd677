use std::time::Duration;

use reqwest::header::CONTENT_TYPE;

use crate::types::map_reqwest_error;
use crate::{FailureKind, FetchError};

pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// What a HEAD request learned about a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlProbe {
    pub status_code: u16,
    pub content_type: String,
}

/// Check that a URL answers at all. Any HTTP status counts as reachable.
pub async fn probe_url(url: &str, timeout: Duration) -> Result<UrlProbe, FetchError> {
    let parsed = url::Url::parse(url.trim())
        .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;

    // The first response is reported as-is, redirects included.
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;

    let response = client.head(parsed).send().await.map_err(map_reqwest_error)?;

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("Unknown")
        .to_string();

    Ok(UrlProbe {
        status_code: response.status().as_u16(),
        content_type,
    })
}
