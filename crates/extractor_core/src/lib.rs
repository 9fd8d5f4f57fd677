//! Extractor core: request model, value resolution and result assembly.
//!
//! Nothing in this crate performs IO. Fetch strategies live in
//! `extractor_engine` and hand their matches over as [`MatchedElement`]s.
mod attribute;
mod build;
mod element;
mod export;
mod request;
mod resolve;
mod result;

pub use attribute::{AttributeSelector, TEXT_CONTENT};
pub use build::{build_results, ExtractedValue};
pub use element::{MatchedElement, RawValue};
pub use export::{export_filename, to_table, ExportError, ExportMetadata};
pub use request::{ExtractionRequest, FetchMode, RequestError, DEFAULT_WAIT_TIMEOUT};
pub use resolve::{resolve, Placeholder};
pub use result::ExtractionResult;
