use serde::{Deserialize, Serialize};

/// Where a localized name was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameSource {
    Database,
    Dictionary,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedName {
    pub ticker: String,
    pub name: String,
    pub source: NameSource,
}
