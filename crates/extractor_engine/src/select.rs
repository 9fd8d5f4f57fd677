use extractor_core::{MatchedElement, RawValue};
use scraper::{ElementRef, Html, Selector};

use crate::{FailureKind, FetchError};

/// Run a CSS selector over static markup and snapshot every match.
///
/// An empty selector matches nothing. A malformed one is an error.
pub fn select_elements(html: &str, selector: &str) -> Result<Vec<MatchedElement>, FetchError> {
    let selector = selector.trim();
    if selector.is_empty() {
        return Ok(Vec::new());
    }
    let selector = parse_selector(selector)?;

    let document = Html::parse_document(html);
    Ok(document.select(&selector).map(snapshot).collect())
}

/// Parse a CSS selector, reporting a malformed one as [`FailureKind::InvalidSelector`].
pub(crate) fn parse_selector(selector: &str) -> Result<Selector, FetchError> {
    Selector::parse(selector)
        .map_err(|err| FetchError::new(FailureKind::InvalidSelector, err.to_string()))
}

fn snapshot(element: ElementRef<'_>) -> MatchedElement {
    let mut matched = MatchedElement::new().with_text(element.text().collect::<String>());
    for (name, value) in element.value().attrs() {
        // Whitespace-separated token list, kept in source order.
        let value = if name.eq_ignore_ascii_case("class") {
            RawValue::Tokens(value.split_whitespace().map(str::to_string).collect())
        } else {
            RawValue::Text(value.to_string())
        };
        matched = matched.with_attribute(name, value);
    }
    matched
}
