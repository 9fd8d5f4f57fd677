use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use extractor_core::{ExtractionRequest, FetchMode, MatchedElement};
use extractor_engine::{
    FailureKind, FetchError, FetchStrategy, RenderSettings, RenderedFetcher, ScrapeEngine,
    StaticFetchSettings, StaticFetcher,
};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Strategy with a canned outcome that counts how often it ran.
struct Scripted {
    mode: FetchMode,
    outcome: Result<Vec<MatchedElement>, FetchError>,
    calls: Arc<AtomicUsize>,
}

impl Scripted {
    fn new(
        mode: FetchMode,
        outcome: Result<Vec<MatchedElement>, FetchError>,
    ) -> (Arc<Self>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let strategy = Arc::new(Self {
            mode,
            outcome,
            calls: Arc::clone(&calls),
        });
        (strategy, calls)
    }
}

#[async_trait]
impl FetchStrategy for Scripted {
    fn mode(&self) -> FetchMode {
        self.mode
    }

    async fn fetch(&self, _request: &ExtractionRequest) -> Result<Vec<MatchedElement>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

fn texts(values: &[&str]) -> Vec<MatchedElement> {
    values
        .iter()
        .map(|value| MatchedElement::new().with_text(*value))
        .collect()
}

fn request() -> ExtractionRequest {
    ExtractionRequest::new("https://example.com/", "h1", "Text Content").unwrap()
}

#[tokio::test]
async fn static_hit_skips_the_browser() {
    let (fast, _) = Scripted::new(FetchMode::Static, Ok(texts(&["Hello"])));
    let (slow, slow_calls) = Scripted::new(FetchMode::Rendered, Ok(texts(&["never"])));
    let engine = ScrapeEngine::with_strategies(fast, slow);

    let result = engine.auto_extract(&request()).await;

    assert!(result.success);
    assert_eq!(result.method, "Static (Auto)");
    assert_eq!(result.total_found, 1);
    assert_eq!(result.values[0].value, "Hello");
    assert_eq!(slow_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn empty_static_result_falls_back() {
    let (fast, fast_calls) = Scripted::new(FetchMode::Static, Ok(Vec::new()));
    let (slow, slow_calls) = Scripted::new(FetchMode::Rendered, Ok(texts(&["Hello", "World"])));
    let engine = ScrapeEngine::with_strategies(fast, slow);

    let result = engine.auto_extract(&request()).await;

    assert!(result.success);
    assert_eq!(result.method, "Rendered (Auto Fallback)");
    assert_eq!(result.total_found, 2);
    assert_eq!(fast_calls.load(Ordering::SeqCst), 1);
    assert_eq!(slow_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn static_failure_falls_back() {
    let (fast, _) = Scripted::new(
        FetchMode::Static,
        Err(FetchError::new(FailureKind::Network, "connection refused")),
    );
    let (slow, _) = Scripted::new(FetchMode::Rendered, Ok(texts(&["Hello"])));
    let engine = ScrapeEngine::with_strategies(fast, slow);

    let result = engine.auto_extract(&request()).await;

    assert!(result.success);
    assert_eq!(result.method, "Rendered (Auto Fallback)");
    assert_eq!(result.error, None);
}

#[tokio::test]
async fn rendered_outcome_is_final_even_when_empty() {
    let (fast, _) = Scripted::new(FetchMode::Static, Ok(Vec::new()));
    let (slow, slow_calls) = Scripted::new(FetchMode::Rendered, Ok(Vec::new()));
    let engine = ScrapeEngine::with_strategies(fast, slow);

    let result = engine.auto_extract(&request()).await;

    assert!(result.success);
    assert_eq!(result.method, "Rendered (Auto Fallback)");
    assert_eq!(result.total_found, 0);
    assert_eq!(slow_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn both_failing_reports_the_rendered_error() {
    let (fast, _) = Scripted::new(
        FetchMode::Static,
        Err(FetchError::new(FailureKind::Timeout, "timed out")),
    );
    let (slow, _) = Scripted::new(
        FetchMode::Rendered,
        Err(FetchError::new(FailureKind::Session, "failed to launch browser")),
    );
    let engine = ScrapeEngine::with_strategies(fast, slow);

    let result = engine.auto_extract(&request()).await;

    assert!(!result.success);
    assert_eq!(result.method, "Rendered (Auto Fallback)");
    assert_eq!(
        result.error.as_deref(),
        Some("Browser session error: failed to launch browser")
    );
    assert!(result.values.is_empty());
}

#[tokio::test]
async fn explicit_mode_uses_the_bare_label() {
    let (fast, fast_calls) = Scripted::new(FetchMode::Static, Ok(Vec::new()));
    let (slow, _) = Scripted::new(FetchMode::Rendered, Ok(texts(&["A", "B"])));
    let engine = ScrapeEngine::with_strategies(fast, slow);

    let rendered = engine.extract(&request(), FetchMode::Rendered).await;
    assert_eq!(rendered.method, "Rendered");
    assert_eq!(rendered.total_found, 2);
    assert_eq!(fast_calls.load(Ordering::SeqCst), 0);

    let plain = engine.extract(&request(), FetchMode::Static).await;
    assert_eq!(plain.method, "Static");
    assert!(plain.success);
    assert_eq!(plain.total_found, 0);
}

#[tokio::test]
async fn indices_follow_document_order() {
    let (fast, _) = Scripted::new(FetchMode::Static, Ok(texts(&[" a ", "", "c"])));
    let (slow, _) = Scripted::new(FetchMode::Rendered, Ok(Vec::new()));
    let engine = ScrapeEngine::with_strategies(fast, slow);

    let result = engine.extract(&request(), FetchMode::Static).await;
    let rows: Vec<(usize, &str)> = result
        .values
        .iter()
        .map(|item| (item.index, item.value.as_str()))
        .collect();
    assert_eq!(
        rows,
        vec![(1, "a"), (2, "[Empty Text Content]"), (3, "c")]
    );
}

#[tokio::test]
async fn script_only_page_falls_back_to_rendered() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/spa"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<html><body><div id="root"></div><script src="app.js"></script></body></html>"#,
            "text/html",
        ))
        .mount(&server)
        .await;

    let fast = Arc::new(StaticFetcher::new(StaticFetchSettings::default()).unwrap());
    let (slow, slow_calls) = Scripted::new(FetchMode::Rendered, Ok(texts(&["Hello"])));
    let engine = ScrapeEngine::with_strategies(fast, slow);

    let request =
        ExtractionRequest::new(&format!("{}/spa", server.uri()), "h1", "Text Content").unwrap();
    let result = engine.auto_extract(&request).await;

    assert_eq!(result.method, "Rendered (Auto Fallback)");
    assert_eq!(result.total_found, 1);
    assert_eq!(result.values[0].value, "Hello");
    assert_eq!(slow_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn static_page_with_the_heading_answers_directly() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hello"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<html><body><h1>Hello</h1></body></html>",
            "text/html",
        ))
        .mount(&server)
        .await;

    let fast = Arc::new(StaticFetcher::new(StaticFetchSettings::default()).unwrap());
    let (slow, slow_calls) = Scripted::new(FetchMode::Rendered, Ok(texts(&["never"])));
    let engine = ScrapeEngine::with_strategies(fast, slow);

    let request =
        ExtractionRequest::new(&format!("{}/hello", server.uri()), "h1", "Text Content").unwrap();
    let result = engine.auto_extract(&request).await;

    assert!(result.success);
    assert_eq!(result.method, "Static (Auto)");
    assert_eq!(result.total_found, 1);
    assert_eq!(result.values[0].value, "Hello");
    assert_eq!(slow_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn malformed_selector_fails_fast_in_both_strategies() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<h1>Hello</h1>", "text/html"))
        .mount(&server)
        .await;

    let engine = ScrapeEngine::with_strategies(
        Arc::new(StaticFetcher::new(StaticFetchSettings::default()).unwrap()),
        Arc::new(RenderedFetcher::new(RenderSettings {
            chrome_executable: Some("/nonexistent/chrome".into()),
            ..RenderSettings::default()
        })),
    );
    let request = ExtractionRequest::new(&server.uri(), "h1[", "Text Content").unwrap();

    let started = std::time::Instant::now();
    let result = engine.auto_extract(&request).await;

    assert!(!result.success);
    assert_eq!(result.method, "Rendered (Auto Fallback)");
    assert!(result.error.as_deref().unwrap().starts_with("Invalid selector: "));
    assert!(started.elapsed() < std::time::Duration::from_secs(5));
}
