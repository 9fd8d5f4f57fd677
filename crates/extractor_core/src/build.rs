use serde::{Deserialize, Serialize};

use crate::{resolve, AttributeSelector, FetchMode, MatchedElement};

/// One resolved value. Deserializes leniently so exported rows may omit fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedValue {
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub index: usize,
}

/// Resolve every element in document order.
///
/// Each input element yields exactly one record; indices run `1..=len` with no
/// gaps, placeholders included.
pub fn build_results(
    elements: &[MatchedElement],
    attribute: &AttributeSelector,
    mode: FetchMode,
) -> Vec<ExtractedValue> {
    elements
        .iter()
        .enumerate()
        .map(|(position, element)| ExtractedValue {
            value: resolve(element, attribute, mode),
            index: position + 1,
        })
        .collect()
}
