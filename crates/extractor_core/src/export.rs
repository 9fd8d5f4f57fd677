use serde::{Deserialize, Serialize};

use crate::ExtractedValue;

/// Request details repeated on every exported row.
///
/// Each present, non-empty field adds one column after `Index` and `Value`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportMetadata {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub selector: Option<String>,
    #[serde(default)]
    pub attribute: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
}

impl ExportMetadata {
    /// `(header, value)` pairs in their fixed column order.
    fn columns(&self) -> Vec<(&'static str, &str)> {
        [
            ("Source URL", &self.url),
            ("CSS Selector", &self.selector),
            ("Attribute", &self.attribute),
            ("Method", &self.method),
        ]
        .into_iter()
        .filter_map(|(header, value)| {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(|v| (header, v))
        })
        .collect()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("No data to export")]
    EmptyInput,
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv output is not valid utf-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Render results as CSV text, header row first.
pub fn to_table(
    results: &[ExtractedValue],
    metadata: &ExportMetadata,
) -> Result<String, ExportError> {
    if results.is_empty() {
        return Err(ExportError::EmptyInput);
    }

    let columns = metadata.columns();
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    let mut header = vec!["Index", "Value"];
    header.extend(columns.iter().map(|(name, _)| *name));
    writer.write_record(&header)?;

    for (position, item) in results.iter().enumerate() {
        let index = (position + 1).to_string();
        let mut row = vec![index.as_str(), item.value.as_str()];
        row.extend(columns.iter().map(|(_, value)| *value));
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Csv(err.into_error().into()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Suggested download name for an export produced at `unix_seconds`.
pub fn export_filename(unix_seconds: i64) -> String {
    format!("web_scraper_results_{unix_seconds}.csv")
}
