//! JSON routes over the extraction engine.
//!
//! Every route answers 200 with a JSON body; failures are reported inside it.

use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use engine_logging::{engine_info, engine_warn};
use extractor_core::{
    export_filename, to_table, ExportMetadata, ExtractedValue, ExtractionRequest,
    ExtractionResult, FetchMode, TEXT_CONTENT,
};
use extractor_engine::{probe_url, ScrapeEngine, PROBE_TIMEOUT};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Method label on a failed auto request that never reached a strategy.
const AUTO_LABEL: &str = "Auto";

#[derive(Clone)]
pub struct AppState {
    engine: ScrapeEngine,
}

impl AppState {
    pub fn new(engine: ScrapeEngine) -> Self {
        Self { engine }
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/scrape/static", post(scrape_static))
        .route("/scrape/rendered", post(scrape_rendered))
        .route("/scrape/auto", post(scrape_auto))
        .route("/validate-url", post(validate_url))
        .route("/export-csv", post(export_csv))
        .layer(cors)
        .with_state(state)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScrapePayload {
    // Optional fields accept both a missing key and an explicit null.
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    selector: Option<String>,
    #[serde(default)]
    attribute: Option<String>,
    #[serde(default, alias = "wait_time")]
    wait_timeout_seconds: Option<f64>,
}

impl ScrapePayload {
    fn into_request(self) -> Result<ExtractionRequest, String> {
        let request = ExtractionRequest::new(
            self.url.as_deref().unwrap_or_default(),
            self.selector.as_deref().unwrap_or_default(),
            self.attribute.as_deref().unwrap_or(TEXT_CONTENT),
        )
        .map_err(|err| err.to_string())?;
        match self.wait_timeout_seconds {
            Some(seconds) => request
                .with_wait_timeout_secs(seconds)
                .map_err(|err| err.to_string()),
            None => Ok(request),
        }
    }
}

fn decode(
    payload: Result<Json<ScrapePayload>, JsonRejection>,
) -> Result<ExtractionRequest, String> {
    let Json(payload) = payload.map_err(|rejection| rejection.body_text())?;
    payload.into_request()
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: VERSION,
    })
}

async fn scrape_static(
    State(state): State<AppState>,
    payload: Result<Json<ScrapePayload>, JsonRejection>,
) -> Json<ExtractionResult> {
    Json(scrape_with(&state, payload, FetchMode::Static).await)
}

async fn scrape_rendered(
    State(state): State<AppState>,
    payload: Result<Json<ScrapePayload>, JsonRejection>,
) -> Json<ExtractionResult> {
    Json(scrape_with(&state, payload, FetchMode::Rendered).await)
}

async fn scrape_with(
    state: &AppState,
    payload: Result<Json<ScrapePayload>, JsonRejection>,
    mode: FetchMode,
) -> ExtractionResult {
    match decode(payload) {
        Ok(request) => state.engine.extract(&request, mode).await,
        Err(error) => rejected(mode.label(), error),
    }
}

async fn scrape_auto(
    State(state): State<AppState>,
    payload: Result<Json<ScrapePayload>, JsonRejection>,
) -> Json<ExtractionResult> {
    let result = match decode(payload) {
        Ok(request) => state.engine.auto_extract(&request).await,
        Err(error) => rejected(AUTO_LABEL, error),
    };
    Json(result)
}

fn rejected(method: &str, error: String) -> ExtractionResult {
    engine_warn!("Rejected {} scrape request: {}", method, error);
    ExtractionResult::failure(method, Duration::ZERO, error)
}

#[derive(Debug, Deserialize)]
struct ValidatePayload {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidateResponse {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ValidateResponse {
    fn invalid(error: String) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }
}

async fn validate_url(
    payload: Result<Json<ValidatePayload>, JsonRejection>,
) -> Json<ValidateResponse> {
    let url = match payload {
        Ok(Json(payload)) => payload.url.unwrap_or_default(),
        Err(rejection) => return Json(ValidateResponse::invalid(rejection.body_text())),
    };

    let response = match probe_url(&url, PROBE_TIMEOUT).await {
        Ok(probe) => {
            engine_info!("Probed {}: {}", url, probe.status_code);
            ValidateResponse {
                valid: true,
                status_code: Some(probe.status_code),
                content_type: Some(probe.content_type),
                error: None,
            }
        }
        Err(err) => {
            engine_warn!("Probe of {} failed: {}", url, err);
            ValidateResponse::invalid(err.to_string())
        }
    };
    Json(response)
}

#[derive(Debug, Deserialize)]
struct ExportPayload {
    #[serde(default)]
    results: Vec<ExtractedValue>,
    #[serde(default)]
    metadata: ExportMetadata,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    csv_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

async fn export_csv(payload: Result<Json<ExportPayload>, JsonRejection>) -> Json<ExportResponse> {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            return Json(ExportResponse {
                error: Some(rejection.body_text()),
                ..ExportResponse::default()
            })
        }
    };

    let response = match to_table(&payload.results, &payload.metadata) {
        Ok(csv_content) => {
            engine_info!("Exported {} row(s)", payload.results.len());
            ExportResponse {
                success: true,
                csv_content: Some(csv_content),
                filename: Some(export_filename(chrono::Utc::now().timestamp())),
                error: None,
            }
        }
        Err(err) => ExportResponse {
            error: Some(err.to_string()),
            ..ExportResponse::default()
        },
    };
    Json(response)
}
