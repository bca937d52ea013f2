pub mod connectors;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct QuoteSourceConfig {
    pub source_id: String,
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_ms: u64,
}

impl Default for QuoteSourceConfig {
    fn default() -> Self {
        QuoteSourceConfig {
            source_id: "finnhub".to_string(),
            base_url: "https://finnhub.io/api/v1".to_string(),
            api_key: None,
            timeout_ms: 5_000,
        }
    }
}
