mod config;
mod routes;

use anyhow::Context;
use clap::Parser;
use engine_logging::engine_info;
use extractor_engine::ScrapeEngine;

use crate::config::Config;
use crate::routes::{router, AppState, VERSION};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    engine_logging::initialize(config.log_settings());

    let engine = ScrapeEngine::new(config.engine_settings()).context("failed to build engine")?;
    let app = router(AppState::new(engine));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    engine_info!("extractor_app v{} listening on http://{}", VERSION, addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
