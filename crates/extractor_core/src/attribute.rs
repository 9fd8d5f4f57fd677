use std::fmt;

/// Attribute name that selects an element's text instead of an HTML attribute.
pub const TEXT_CONTENT: &str = "Text Content";

/// What to read from every matched element.
///
/// Parsing is case-insensitive; the requested spelling is kept so placeholders
/// echo back exactly what the caller asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeSelector {
    TextContent { requested: String },
    Named { requested: String, name: String },
}

impl Default for AttributeSelector {
    fn default() -> Self {
        Self::text_content()
    }
}

impl AttributeSelector {
    /// Text content, spelled the canonical way.
    pub fn text_content() -> Self {
        AttributeSelector::TextContent {
            requested: TEXT_CONTENT.to_string(),
        }
    }

    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::text_content();
        }
        if trimmed.eq_ignore_ascii_case(TEXT_CONTENT) {
            return AttributeSelector::TextContent {
                requested: raw.to_string(),
            };
        }
        AttributeSelector::Named {
            requested: raw.to_string(),
            name: trimmed.to_ascii_lowercase(),
        }
    }

    /// Lowercased attribute name used for lookups, `None` for text content.
    pub fn name(&self) -> Option<&str> {
        match self {
            AttributeSelector::TextContent { .. } => None,
            AttributeSelector::Named { name, .. } => Some(name),
        }
    }

    pub fn requested(&self) -> &str {
        match self {
            AttributeSelector::TextContent { requested }
            | AttributeSelector::Named { requested, .. } => requested,
        }
    }

    pub fn is_class(&self) -> bool {
        self.name() == Some("class")
    }
}

impl fmt::Display for AttributeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.requested())
    }
}
