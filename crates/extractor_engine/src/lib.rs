//! Extractor engine: fetch strategies and the fallback orchestrator.
mod decode;
mod engine;
mod fetch;
mod probe;
mod render;
mod select;
mod session;
mod types;

pub use decode::{decode_body, DecodedBody};
pub use engine::{EngineSettings, ScrapeEngine};
pub use fetch::{FetchStrategy, StaticFetchSettings, StaticFetcher};
pub use probe::{probe_url, UrlProbe, PROBE_TIMEOUT};
pub use render::{RenderSettings, RenderedFetcher};
pub use select::select_elements;
pub use types::{FailureKind, FetchError};
