//! One headless Chromium process per rendered fetch.

use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::page::Page;
use engine_logging::{engine_debug, engine_trace, engine_warn};
use futures_util::StreamExt;
use tempfile::TempDir;
use tokio::task::JoinHandle;
use url::Url;

use crate::{FailureKind, FetchError, RenderSettings};

/// A launched browser owned by exactly one request.
///
/// Call [`BrowserSession::close`] on every path. If the owning future is
/// dropped instead, `Drop` stops the event loop and chromiumoxide kills the
/// child process when `Browser` goes away.
pub(crate) struct BrowserSession {
    browser: Browser,
    events: JoinHandle<()>,
    // Deleted when the session is dropped, after the browser has exited.
    _profile: TempDir,
}

impl BrowserSession {
    pub(crate) async fn launch(settings: &RenderSettings) -> Result<Self, FetchError> {
        let profile = tempfile::Builder::new()
            .prefix("extractor-profile-")
            .tempdir()
            .map_err(|err| session_error("failed to create browser profile dir", err))?;

        let mut builder = BrowserConfig::builder()
            .window_size(settings.viewport_width, settings.viewport_height)
            .viewport(Some(Viewport {
                width: settings.viewport_width,
                height: settings.viewport_height,
                device_scale_factor: Some(1.0),
                ..Default::default()
            }))
            .user_data_dir(profile.path())
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg(format!("--user-agent={}", settings.user_agent));
        if let Some(path) = &settings.chrome_executable {
            builder = builder.chrome_executable(path);
        }
        let config = builder.build().map_err(|err| {
            FetchError::new(FailureKind::Session, format!("invalid browser config: {err}"))
        })?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|err| session_error("failed to launch browser", err))?;

        // Event errors are not fatal to the connection; keep draining.
        let events = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(err) = event {
                    engine_trace!("Browser event error: {}", err);
                }
            }
        });
        engine_debug!("Browser session started in {:?}", profile.path());

        Ok(Self {
            browser,
            events,
            _profile: profile,
        })
    }

    /// Open a fresh tab and navigate it, bounded by `timeout`.
    pub(crate) async fn open(&self, url: &Url, timeout: Duration) -> Result<Page, FetchError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|err| session_error("failed to open tab", err))?;

        match tokio::time::timeout(timeout, page.goto(url.as_str())).await {
            Ok(Ok(_)) => Ok(page),
            Ok(Err(err)) => Err(session_error("navigation failed", err)),
            Err(_) => Err(FetchError::new(
                FailureKind::Session,
                format!("navigation to {url} timed out after {timeout:?}"),
            )),
        }
    }

    /// Terminate the browser and wait for the process to exit.
    pub(crate) async fn close(mut self) {
        if let Err(err) = self.browser.close().await {
            engine_warn!("Browser did not acknowledge close: {}", err);
        }
        if let Err(err) = self.browser.wait().await {
            engine_warn!("Failed waiting for browser exit: {}", err);
        }
        self.events.abort();
        engine_debug!("Browser session closed");
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.events.abort();
    }
}

fn session_error(context: &str, err: impl std::fmt::Display) -> FetchError {
    FetchError::new(FailureKind::Session, format!("{context}: {err}"))
}
