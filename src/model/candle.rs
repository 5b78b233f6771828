/// Start of the bucket a timestamp falls into, left-aligned to multiples of
/// the interval since epoch. A tick exactly on a boundary belongs to the
/// bucket it starts.
pub fn bucket_start(timestamp_ms: u64, interval_ms: u64) -> u64 {
    assert!(interval_ms > 0, "interval_ms must be > 0");
    timestamp_ms - (timestamp_ms % interval_ms)
}

/// OHLC summary of all ticks falling into one time bucket.
///
/// Created from the first tick of its bucket, mutated in place by later
/// ticks of the same bucket, and sealed into history when a tick for a
/// later bucket arrives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    pub bucket_start_ms: u64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    /// Open a new candle from the first tick that maps to its bucket.
    pub fn open_at(price: f64, timestamp_ms: u64, interval_ms: u64) -> Self {
        Self {
            bucket_start_ms: bucket_start(timestamp_ms, interval_ms),
            open: price,
            high: price,
            low: price,
            close: price,
        }
    }

    /// Fold another price from the same bucket into the candle. The open is
    /// never touched after creation.
    pub fn update(&mut self, price: f64) {
        self.high = self.high.max(price);
        self.low = self.low.min(price);
        self.close = price;
    }

    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_alignment_uses_floor_semantics() {
        assert_eq!(bucket_start(0, 60_000), 0);
        assert_eq!(bucket_start(59_999, 60_000), 0);
        assert_eq!(bucket_start(60_000, 60_000), 60_000);
        assert_eq!(bucket_start(60_500, 60_000), 60_000);
        assert_eq!(bucket_start(1_700_000_123_456, 300_000), 1_700_000_100_000);
    }

    #[test]
    fn candle_accumulates_ohlc() {
        let mut candle = Candle::open_at(100.0, 60_500, 60_000);
        assert_eq!(candle.bucket_start_ms, 60_000);

        candle.update(105.0);
        candle.update(95.0);
        candle.update(102.0);

        assert!((candle.open - 100.0).abs() < f64::EPSILON);
        assert!((candle.high - 105.0).abs() < f64::EPSILON);
        assert!((candle.low - 95.0).abs() < f64::EPSILON);
        assert!((candle.close - 102.0).abs() < f64::EPSILON);
        assert!(candle.is_bullish());
    }

    #[test]
    fn bearish_candle() {
        let mut candle = Candle::open_at(100.0, 0, 60_000);
        candle.update(95.0);
        assert!(!candle.is_bullish());
    }

    #[test]
    #[should_panic(expected = "interval_ms must be > 0")]
    fn rejects_zero_interval() {
        let _ = bucket_start(60_500, 0);
    }
}
