use std::time::Duration;

use engine_logging::{engine_debug, engine_warn};
use extractor_core::{ExtractionRequest, FetchMode, MatchedElement};
use futures_util::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE};

use crate::types::map_reqwest_error;
use crate::{decode_body, select_elements, FailureKind, FetchError};

/// Desktop Chrome user agent; some sites serve stripped pages to unknown clients.
pub(crate) const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// A way of turning a URL and a selector into matched elements.
#[async_trait::async_trait]
pub trait FetchStrategy: Send + Sync {
    fn mode(&self) -> FetchMode;

    async fn fetch(&self, request: &ExtractionRequest) -> Result<Vec<MatchedElement>, FetchError>;
}

#[derive(Debug, Clone)]
pub struct StaticFetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub user_agent: String,
}

impl Default for StaticFetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(15),
            redirect_limit: 10,
            max_bytes: 10 * 1024 * 1024,
            user_agent: DESKTOP_USER_AGENT.to_string(),
        }
    }
}

/// Plain HTTP GET plus HTML parsing. Never runs page scripts.
#[derive(Debug, Clone)]
pub struct StaticFetcher {
    settings: StaticFetchSettings,
    client: reqwest::Client,
}

impl StaticFetcher {
    pub fn new(settings: StaticFetchSettings) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .default_headers(headers)
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self { settings, client })
    }

    async fn download(&self, url: &url::Url) -> Result<(Vec<u8>, Option<String>), FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                format!("{status} for url {url}"),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(self.too_large(Some(content_len)));
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(self.too_large(Some(next_len)));
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok((bytes, content_type))
    }

    fn too_large(&self, actual: Option<u64>) -> FetchError {
        FetchError::new(
            FailureKind::TooLarge {
                max_bytes: self.settings.max_bytes,
                actual,
            },
            format!("response exceeds {} bytes", self.settings.max_bytes),
        )
    }
}

#[async_trait::async_trait]
impl FetchStrategy for StaticFetcher {
    fn mode(&self) -> FetchMode {
        FetchMode::Static
    }

    async fn fetch(&self, request: &ExtractionRequest) -> Result<Vec<MatchedElement>, FetchError> {
        let (bytes, content_type) = self.download(&request.url).await?;
        let decoded = decode_body(&bytes, content_type.as_deref());
        if decoded.lossy {
            engine_warn!(
                "Body of {} had bytes invalid as {}, replaced",
                request.url,
                decoded.encoding
            );
        }
        engine_debug!(
            "Fetched {} bytes from {} ({})",
            bytes.len(),
            request.url,
            decoded.encoding
        );
        select_elements(&decoded.text, &request.selector)
    }
}
