use crate::{AttributeSelector, FetchMode, MatchedElement, RawValue};

/// Descriptive stand-ins for values that could not be extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Empty,
    Missing,
    Error,
}

impl Placeholder {
    pub fn render(self, attribute: &AttributeSelector) -> String {
        match self {
            Placeholder::Empty => format!("[Empty {attribute}]"),
            Placeholder::Missing => format!("[No {attribute} attribute]"),
            Placeholder::Error => format!("[Error extracting {attribute}]"),
        }
    }
}

/// Resolve the requested attribute of one element into a non-empty string.
///
/// Never fails: absent, blank and unreadable values all become placeholders.
pub fn resolve(element: &MatchedElement, attribute: &AttributeSelector, mode: FetchMode) -> String {
    let raw = match read_raw(element, attribute, mode) {
        Ok(raw) => raw,
        Err(_) => return Placeholder::Error.render(attribute),
    };

    match raw {
        Some(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                Placeholder::Empty.render(attribute)
            } else {
                trimmed.to_string()
            }
        }
        None => Placeholder::Missing.render(attribute),
    }
}

fn read_raw(
    element: &MatchedElement,
    attribute: &AttributeSelector,
    mode: FetchMode,
) -> Result<Option<String>, String> {
    if let Some(fault) = element.fault() {
        return Err(fault.to_string());
    }

    let name = match attribute {
        AttributeSelector::TextContent { .. } => {
            return Ok(Some(element.text().unwrap_or_default().to_string()));
        }
        AttributeSelector::Named { name, .. } => name,
    };

    let mut value = element.attribute(name).cloned();
    if mode == FetchMode::Rendered && value.as_ref().is_none_or(RawValue::is_blank) {
        if let Some(property) = element.property(name) {
            value = Some(property.clone());
        } else if value.is_some() {
            // A blank attribute with no property behind it reads as absent.
            value = None;
        }
    }

    Ok(value.and_then(|raw| text_of(&raw, attribute)))
}

fn text_of(raw: &RawValue, attribute: &AttributeSelector) -> Option<String> {
    match raw {
        RawValue::Tokens(tokens) if attribute.is_class() => Some(tokens.join(" ")),
        other => other.to_text(),
    }
}
