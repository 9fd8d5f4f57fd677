use std::path::PathBuf;
use std::time::Duration;

use chromiumoxide::element::Element;
use chromiumoxide::error::CdpError;
use chromiumoxide::page::Page;
use engine_logging::{engine_debug, engine_warn};
use extractor_core::{AttributeSelector, ExtractionRequest, FetchMode, MatchedElement, RawValue};

use crate::fetch::DESKTOP_USER_AGENT;
use crate::select::parse_selector;
use crate::session::BrowserSession;
use crate::{FailureKind, FetchError, FetchStrategy};

#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub user_agent: String,
    pub navigation_timeout: Duration,
    /// Fixed pause after the selector wait for late async rendering.
    pub settle_delay: Duration,
    pub poll_interval: Duration,
    /// `None` lets chromiumoxide locate an installed Chrome/Chromium.
    pub chrome_executable: Option<PathBuf>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            viewport_width: 1920,
            viewport_height: 1080,
            user_agent: DESKTOP_USER_AGENT.to_string(),
            navigation_timeout: Duration::from_secs(30),
            settle_delay: Duration::from_secs(2),
            poll_interval: Duration::from_millis(250),
            chrome_executable: None,
        }
    }
}

/// Headless browser fetch: runs page scripts and waits for the selector.
#[derive(Debug, Clone, Default)]
pub struct RenderedFetcher {
    settings: RenderSettings,
}

impl RenderedFetcher {
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings }
    }

    async fn collect(
        &self,
        session: &BrowserSession,
        request: &ExtractionRequest,
    ) -> Result<Vec<MatchedElement>, FetchError> {
        let page = session
            .open(&request.url, self.settings.navigation_timeout)
            .await?;

        let appeared = wait_for_selector(
            &page,
            &request.selector,
            request.wait_timeout,
            self.settings.poll_interval,
        )
        .await;
        if !appeared {
            engine_warn!(
                "No '{}' on {} after {:?}, proceeding with what is present",
                request.selector,
                request.url,
                request.wait_timeout
            );
        }

        tokio::time::sleep(self.settings.settle_delay).await;

        let elements = page
            .find_elements(request.selector.as_str())
            .await
            .map_err(|err| {
                FetchError::new(FailureKind::Session, format!("element query failed: {err}"))
            })?;

        let mut matched = Vec::with_capacity(elements.len());
        for element in &elements {
            matched.push(snapshot(element, &request.attribute).await);
        }
        Ok(matched)
    }
}

#[async_trait::async_trait]
impl FetchStrategy for RenderedFetcher {
    fn mode(&self) -> FetchMode {
        FetchMode::Rendered
    }

    async fn fetch(&self, request: &ExtractionRequest) -> Result<Vec<MatchedElement>, FetchError> {
        if !request.has_selector() {
            engine_debug!("Empty selector for {}, skipping browser launch", request.url);
            return Ok(Vec::new());
        }
        // Malformed selectors fail before any browser is launched.
        parse_selector(&request.selector)?;

        let session = BrowserSession::launch(&self.settings).await?;
        let outcome = self.collect(&session, request).await;
        session.close().await;
        outcome
    }
}

/// Poll until at least one element matches. Query errors count as "not yet".
async fn wait_for_selector(page: &Page, selector: &str, timeout: Duration, poll: Duration) -> bool {
    let poll_loop = async {
        loop {
            if let Ok(found) = page.find_elements(selector).await {
                if !found.is_empty() {
                    return;
                }
            }
            tokio::time::sleep(poll).await;
        }
    };
    tokio::time::timeout(timeout, poll_loop).await.is_ok()
}

async fn snapshot(element: &Element, attribute: &AttributeSelector) -> MatchedElement {
    match read_live(element, attribute).await {
        Ok(matched) => matched,
        Err(err) => {
            engine_warn!("Failed reading {} from element: {}", attribute, err);
            MatchedElement::faulted(err.to_string())
        }
    }
}

async fn read_live(
    element: &Element,
    attribute: &AttributeSelector,
) -> Result<MatchedElement, CdpError> {
    let name = match attribute {
        AttributeSelector::TextContent { .. } => {
            let text = element.inner_text().await?.unwrap_or_default();
            return Ok(MatchedElement::new().with_text(text));
        }
        AttributeSelector::Named { name, .. } => name,
    };

    let mut matched = MatchedElement::new();
    let value = element.attribute(name.as_str()).await?;
    let blank = value.as_deref().is_none_or(str::is_empty);
    if let Some(value) = value {
        matched = matched.with_attribute(name, RawValue::Text(value));
    }
    // Runtime-only state such as `checked` or `value` lives on the property.
    if blank {
        if let Some(property) = element.property(name.as_str()).await? {
            matched = matched.with_property(name, RawValue::Json(property));
        }
    }
    Ok(matched)
}
