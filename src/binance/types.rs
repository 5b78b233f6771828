use serde::Deserialize;

use crate::market::hub::FeedUpdate;

/// Deserialize Binance string-encoded numbers to f64.
pub fn string_to_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.parse::<f64>().map_err(serde::de::Error::custom)
}

/// Binance miniTicker event (symbol@miniTicker): last price plus the rolling
/// 24h open/high/low/volume.
#[derive(Debug, Deserialize)]
pub struct MiniTickerEvent {
    #[serde(rename = "e")]
    pub event_type: String,
    #[serde(rename = "E")]
    pub event_time: u64,
    #[serde(rename = "s")]
    pub symbol: String,
    #[serde(rename = "c", deserialize_with = "string_to_f64")]
    pub last_price: f64,
    #[serde(rename = "o", deserialize_with = "string_to_f64")]
    pub day_open: f64,
    #[serde(rename = "h", deserialize_with = "string_to_f64")]
    pub day_high: f64,
    #[serde(rename = "l", deserialize_with = "string_to_f64")]
    pub day_low: f64,
    #[serde(rename = "v", deserialize_with = "string_to_f64")]
    pub day_volume: f64,
}

impl MiniTickerEvent {
    /// Normalize into the hub's per-instrument update payload. Stream
    /// symbols are tracked lowercase; the event carries them uppercase.
    pub fn into_update(self) -> FeedUpdate {
        FeedUpdate {
            symbol: self.symbol.to_ascii_lowercase(),
            timestamp_ms: self.event_time,
            last_price: self.last_price,
            day_open: self.day_open,
            day_high: self.day_high,
            day_low: self.day_low,
            day_volume: self.day_volume,
        }
    }
}

/// Combined-stream envelope (`/stream?streams=...` wraps every payload as
/// `{"stream": "...", "data": {...}}`).
#[derive(Debug, Deserialize)]
pub struct CombinedStreamMessage {
    pub stream: String,
    pub data: MiniTickerEvent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_mini_ticker_event() {
        let json = r#"{
            "e": "24hrMiniTicker",
            "E": 1672515782136,
            "s": "BTCUSDT",
            "c": "42000.50",
            "o": "41000.00",
            "h": "42500.00",
            "l": "40800.00",
            "v": "12345.678",
            "q": "512000000.00"
        }"#;
        let event: MiniTickerEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.symbol, "BTCUSDT");
        assert_eq!(event.event_time, 1672515782136);
        assert!((event.last_price - 42000.50).abs() < f64::EPSILON);
        assert!((event.day_open - 41000.00).abs() < f64::EPSILON);
        assert!((event.day_volume - 12345.678).abs() < f64::EPSILON);
    }

    #[test]
    fn deserialize_combined_stream_envelope() {
        let json = r#"{
            "stream": "btcusdt@miniTicker",
            "data": {
                "e": "24hrMiniTicker",
                "E": 1672515782136,
                "s": "BTCUSDT",
                "c": "42000.50",
                "o": "41000.00",
                "h": "42500.00",
                "l": "40800.00",
                "v": "12345.678",
                "q": "512000000.00"
            }
        }"#;
        let msg: CombinedStreamMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.stream, "btcusdt@miniTicker");

        let update = msg.data.into_update();
        assert_eq!(update.symbol, "btcusdt");
        assert_eq!(update.timestamp_ms, 1672515782136);
        assert!((update.last_price - 42000.50).abs() < f64::EPSILON);
    }

    #[test]
    fn malformed_price_string_is_a_parse_error() {
        let json = r#"{
            "e": "24hrMiniTicker",
            "E": 1672515782136,
            "s": "BTCUSDT",
            "c": "not-a-number",
            "o": "41000.00",
            "h": "42500.00",
            "l": "40800.00",
            "v": "12345.678"
        }"#;
        assert!(serde_json::from_str::<MiniTickerEvent>(json).is_err());
    }
}
