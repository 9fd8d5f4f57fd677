use std::collections::BTreeMap;

/// A value as the underlying document representation handed it out.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Text(String),
    /// Multi-valued attribute split into tokens, e.g. `class` in parsed markup.
    Tokens(Vec<String>),
    /// Live DOM property as returned by the browser.
    Json(serde_json::Value),
}

impl RawValue {
    /// String form of the value, `None` when it carries no value at all.
    pub fn to_text(&self) -> Option<String> {
        match self {
            RawValue::Text(text) => Some(text.clone()),
            RawValue::Tokens(tokens) => Some(tokens.join(" ")),
            RawValue::Json(serde_json::Value::Null) => None,
            RawValue::Json(serde_json::Value::String(text)) => Some(text.clone()),
            RawValue::Json(other) => Some(other.to_string()),
        }
    }

    /// Falsy values trigger the live-property fallback in rendered mode.
    pub fn is_blank(&self) -> bool {
        self.to_text().is_none_or(|text| text.is_empty())
    }
}

/// Snapshot of one element matched by a structural query.
///
/// Snapshots are taken while the originating document (parsed tree or live
/// browser page) is still alive, so they can outlive the fetch that made them.
/// Attribute and property names are stored lowercased.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchedElement {
    text: Option<String>,
    attributes: BTreeMap<String, RawValue>,
    properties: BTreeMap<String, RawValue>,
    fault: Option<String>,
}

impl MatchedElement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Element whose values could not be read.
    pub fn faulted(message: impl Into<String>) -> Self {
        Self {
            fault: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_attribute(mut self, name: &str, value: RawValue) -> Self {
        self.attributes.insert(name.to_ascii_lowercase(), value);
        self
    }

    pub fn with_property(mut self, name: &str, value: RawValue) -> Self {
        self.properties.insert(name.to_ascii_lowercase(), value);
        self
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn attribute(&self, name: &str) -> Option<&RawValue> {
        self.attributes.get(&name.to_ascii_lowercase())
    }

    pub fn property(&self, name: &str) -> Option<&RawValue> {
        self.properties.get(&name.to_ascii_lowercase())
    }

    pub fn fault(&self) -> Option<&str> {
        self.fault.as_deref()
    }
}
