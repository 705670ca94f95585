//! Credits of the data sources shown on the map.

/// Text crediting a data source, optionally with a link to the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribution {
    text: String,
    url: Option<String>,
}

impl Attribution {
    /// Creates a new attribution.
    pub fn new(text: impl Into<String>, url: Option<&str>) -> Self {
        Self {
            text: text.into(),
            url: url.map(str::to_owned),
        }
    }

    /// Attribution text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Link to the source, if any.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}
