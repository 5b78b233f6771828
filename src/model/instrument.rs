use serde::Deserialize;

/// Static descriptor for one tracked trading pair. Loaded once from the
/// config file's `[[instruments]]` list and never mutated.
#[derive(Debug, Clone, Deserialize)]
pub struct Instrument {
    /// Lowercase stream symbol, e.g. "btcusdt".
    pub symbol: String,
    /// Display name, e.g. "Bitcoin".
    pub name: String,
    /// Short code, e.g. "BTC".
    pub short: String,
    /// Pair label, e.g. "BTC / USDT".
    pub pair: String,
    /// Price decimal places for display.
    pub decimals: usize,
    /// CoinGecko id used for market-cap lookups.
    pub gecko_id: String,
}
