use std::collections::HashMap;

use anyhow::{Context, Result};
use serde::Deserialize;

/// One entry of the `/simple/price` response with
/// `include_market_cap=true`. Fields can be absent for delisted ids.
#[derive(Debug, Deserialize)]
pub struct SimplePriceEntry {
    #[serde(default)]
    pub usd: Option<f64>,
    #[serde(default)]
    pub usd_market_cap: Option<f64>,
}

/// Minimal CoinGecko client for the public (keyless) market-cap endpoint.
pub struct CoinGeckoRestClient {
    http: reqwest::Client,
    base_url: String,
}

impl CoinGeckoRestClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.to_string(),
        }
    }

    /// Fetch USD market caps for the given CoinGecko ids. Ids without a
    /// market cap in the response are omitted from the result.
    pub async fn market_caps(&self, ids: &[String]) -> Result<HashMap<String, f64>> {
        let url = format!(
            "{}/simple/price?ids={}&vs_currencies=usd&include_market_cap=true",
            self.base_url,
            ids.join(",")
        );
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .context("market cap request failed")?
            .error_for_status()
            .context("market cap request returned error status")?;

        let entries: HashMap<String, SimplePriceEntry> = resp.json().await?;
        Ok(entries
            .into_iter()
            .filter_map(|(id, entry)| entry.usd_market_cap.map(|cap| (id, cap)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_simple_price_body() {
        let json = r#"{
            "bitcoin": { "usd": 42000.5, "usd_market_cap": 830000000000.0 },
            "sui": { "usd": 1.2 }
        }"#;
        let entries: HashMap<String, SimplePriceEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries["bitcoin"].usd_market_cap,
            Some(830000000000.0)
        );
        assert!(entries["sui"].usd_market_cap.is_none());
    }
}
