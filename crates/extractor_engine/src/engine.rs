use std::sync::Arc;
use std::time::Instant;

use engine_logging::{engine_info, engine_warn};
use extractor_core::{build_results, ExtractionRequest, ExtractionResult, FetchMode};

use crate::{
    FetchError, FetchStrategy, RenderSettings, RenderedFetcher, StaticFetchSettings,
    StaticFetcher,
};

#[derive(Debug, Clone, Default)]
pub struct EngineSettings {
    pub static_fetch: StaticFetchSettings,
    pub render: RenderSettings,
}

/// Runs fetch strategies and turns their matches into results.
///
/// Holds no per-request state; clone it freely or share it behind an `Arc`.
#[derive(Clone)]
pub struct ScrapeEngine {
    static_fetcher: Arc<dyn FetchStrategy>,
    rendered_fetcher: Arc<dyn FetchStrategy>,
}

impl ScrapeEngine {
    pub fn new(settings: EngineSettings) -> Result<Self, FetchError> {
        let static_fetcher = StaticFetcher::new(settings.static_fetch)?;
        let rendered_fetcher = RenderedFetcher::new(settings.render);
        Ok(Self::with_strategies(
            Arc::new(static_fetcher),
            Arc::new(rendered_fetcher),
        ))
    }

    pub fn with_strategies(
        static_fetcher: Arc<dyn FetchStrategy>,
        rendered_fetcher: Arc<dyn FetchStrategy>,
    ) -> Self {
        Self {
            static_fetcher,
            rendered_fetcher,
        }
    }

    /// Run one strategy, labelled with its bare name.
    pub async fn extract(&self, request: &ExtractionRequest, mode: FetchMode) -> ExtractionResult {
        let strategy = match mode {
            FetchMode::Static => self.static_fetcher.as_ref(),
            FetchMode::Rendered => self.rendered_fetcher.as_ref(),
        };
        run_strategy(strategy, request).await
    }

    /// Static first; rendered only when static failed or matched nothing.
    ///
    /// The rendered outcome is final whatever it holds.
    pub async fn auto_extract(&self, request: &ExtractionRequest) -> ExtractionResult {
        let first = run_strategy(self.static_fetcher.as_ref(), request).await;
        if first.has_matches() {
            return first.with_method(self.static_fetcher.mode().auto_label());
        }

        match &first.error {
            Some(error) => engine_warn!(
                "Static fetch of {} failed ({}), falling back to rendered",
                request.url,
                error
            ),
            None => engine_warn!(
                "Static fetch of {} matched nothing for '{}', falling back to rendered",
                request.url,
                request.selector
            ),
        }

        run_strategy(self.rendered_fetcher.as_ref(), request)
            .await
            .with_method(self.rendered_fetcher.mode().fallback_label())
    }
}

async fn run_strategy(
    strategy: &dyn FetchStrategy,
    request: &ExtractionRequest,
) -> ExtractionResult {
    let mode = strategy.mode();
    let started = Instant::now();
    engine_info!(
        "{} extraction of '{}' ({}) from {}",
        mode,
        request.selector,
        request.attribute,
        request.url
    );

    match strategy.fetch(request).await {
        Ok(elements) => {
            let values = build_results(&elements, &request.attribute, mode);
            let result = ExtractionResult::success(mode.label(), started.elapsed(), values);
            engine_info!(
                "{} extraction found {} element(s) in {:.2}s",
                mode,
                result.total_found,
                result.execution_time_seconds
            );
            result
        }
        Err(err) => {
            engine_warn!("{} extraction from {} failed: {}", mode, request.url, err);
            ExtractionResult::failure(mode.label(), started.elapsed(), err.to_string())
        }
    }
}
