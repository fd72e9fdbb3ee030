use serde::{Deserialize, Serialize};

/// Company profile as published by the provider.
///
/// `market_cap` and `share_outstanding` are passed through in the
/// provider's own unit (Finnhub reports millions) and are not rescaled.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub name: Option<String>,
    pub ticker: Option<String>,
    pub exchange: Option<String>,
    pub industry: Option<String>,
    pub country: Option<String>,
    pub currency: Option<String>,
    pub market_cap: Option<f64>,
    pub share_outstanding: Option<f64>,
    /// IPO date as reported (YYYY-MM-DD)
    pub ipo: Option<String>,
    pub weburl: Option<String>,
    pub logo: Option<String>,
    pub phone: Option<String>,
}
