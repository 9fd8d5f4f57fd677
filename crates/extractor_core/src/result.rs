use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ExtractedValue;

/// Outcome of one extraction request, success or failure alike.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub success: bool,
    pub method: String,
    pub execution_time_seconds: f64,
    pub total_found: usize,
    #[serde(rename = "results")]
    pub values: Vec<ExtractedValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractionResult {
    pub fn success(
        method: impl Into<String>,
        elapsed: Duration,
        values: Vec<ExtractedValue>,
    ) -> Self {
        Self {
            success: true,
            method: method.into(),
            execution_time_seconds: round_seconds(elapsed),
            total_found: values.len(),
            values,
            error: None,
        }
    }

    pub fn failure(method: impl Into<String>, elapsed: Duration, error: impl Into<String>) -> Self {
        Self {
            success: false,
            method: method.into(),
            execution_time_seconds: round_seconds(elapsed),
            total_found: 0,
            values: Vec::new(),
            error: Some(error.into()),
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Successful and non-empty: the only outcome that stops an auto fallback.
    pub fn has_matches(&self) -> bool {
        self.success && self.total_found > 0
    }
}

fn round_seconds(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 100.0).round() / 100.0
}
