use serde::{Deserialize, Serialize};

const EXCLUDED_SOURCE_MARKERS: &[&str] = &["seekingalpha", "seeking alpha"];

/// A company news article
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub headline: String,
    pub summary: String,
    pub url: String,
    pub source: String,
    /// Publication time (Unix seconds)
    pub datetime: i64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub related: Option<String>,
}

impl NewsArticle {
    /// Paywalled aggregators whose links are useless to readers.
    pub fn is_excluded_source(&self) -> bool {
        let source = self.source.to_lowercase();
        let url = self.url.to_lowercase();
        EXCLUDED_SOURCE_MARKERS
            .iter()
            .any(|marker| source.contains(marker) || url.contains(marker))
    }
}
