use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

use crate::model::instrument::Instrument;

/// Timeframes selectable from the dashboard, shortest first. The key
/// handler only ever submits members of this set.
pub const TIMEFRAMES: [&str; 3] = ["1m", "5m", "15m"];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub binance: BinanceConfig,
    pub coingecko: CoinGeckoConfig,
    pub dashboard: DashboardConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
    pub instruments: Vec<Instrument>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BinanceConfig {
    pub ws_base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoinGeckoConfig {
    pub rest_base_url: String,
    pub refresh_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    pub default_timeframe: String,
    pub max_ticks: usize,
    pub max_candles: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    pub refresh_rate_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

/// Parse an interval string (e.g. "1s", "5m", "1h", "1d") into milliseconds.
pub fn parse_interval_ms(s: &str) -> Result<u64> {
    if s.len() < 2 {
        bail!("invalid interval '{}': expected format like '1m'", s);
    }

    let (num_str, suffix) = s.split_at(s.len() - 1);
    let n: u64 = num_str.parse().with_context(|| {
        format!(
            "invalid interval '{}': quantity must be a positive integer",
            s
        )
    })?;
    if n == 0 {
        bail!("invalid interval '{}': quantity must be > 0", s);
    }

    let unit_ms = match suffix {
        "s" => 1_000,
        "m" => 60_000,
        "h" => 3_600_000,
        "d" => 86_400_000,
        _ => bail!(
            "invalid interval '{}': unsupported suffix '{}', expected one of s/m/h/d",
            s,
            suffix
        ),
    };

    n.checked_mul(unit_ms)
        .with_context(|| format!("invalid interval '{}': value is too large", s))
}

impl DashboardConfig {
    pub fn default_timeframe_ms(&self) -> Result<u64> {
        parse_interval_ms(&self.default_timeframe)
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Path::new("config/default.toml");
        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;

        let config: Config =
            toml::from_str(&config_str).context("failed to parse config/default.toml")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.instruments.is_empty() {
            bail!("no [[instruments]] configured");
        }
        let mut seen = HashSet::new();
        for inst in &self.instruments {
            let symbol = inst.symbol.trim();
            if symbol.is_empty() {
                bail!("instrument with empty symbol");
            }
            if !seen.insert(symbol.to_ascii_lowercase()) {
                bail!("duplicate instrument symbol '{}'", symbol);
            }
        }
        if !TIMEFRAMES.contains(&self.dashboard.default_timeframe.as_str()) {
            bail!(
                "dashboard.default_timeframe '{}' not in supported set {:?}",
                self.dashboard.default_timeframe,
                TIMEFRAMES
            );
        }
        self.dashboard
            .default_timeframe_ms()
            .context("dashboard.default_timeframe is invalid")?;
        if self.dashboard.max_ticks == 0 || self.dashboard.max_candles == 0 {
            bail!("dashboard.max_ticks and dashboard.max_candles must be > 0");
        }
        Ok(())
    }
}
