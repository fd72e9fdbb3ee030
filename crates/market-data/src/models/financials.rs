use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key financial metrics for a symbol, keyed by provider metric name
/// (e.g. `52WeekHigh`, `peBasicExclExtraTTM`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicFinancials {
    pub symbol: String,
    pub metric: Map<String, Value>,
}
