//! Rolling per-instrument series state: line sparkline buffer, raw-tick
//! retention, and tick-to-candle aggregation with timeframe rebuild.

use std::collections::VecDeque;

use crate::model::candle::{bucket_start, Candle};
use crate::model::tick::Tick;

/// Default line-sparkline capacity (price samples).
pub const MAX_TICKS: usize = 50;
/// Default candle-history capacity (sealed candles).
pub const MAX_CANDLES: usize = 30;

/// Raw-tick retention: once the buffer grows past `RAW_TICK_CAPACITY`,
/// compact it down to the most recent `RAW_TICK_KEEP` entries. The retained
/// window bounds how far back a timeframe rebuild can reach.
pub const RAW_TICK_CAPACITY: usize = 2000;
pub const RAW_TICK_KEEP: usize = 1500;

/// Bounded FIFO of raw prices backing the line sparkline. Oldest-first
/// iteration order, eviction from the front.
#[derive(Debug, Clone)]
pub struct LineBuffer {
    prices: VecDeque<f64>,
    max_len: usize,
}

impl LineBuffer {
    pub fn new(max_len: usize) -> Self {
        assert!(max_len > 0, "max_len must be > 0");
        Self {
            prices: VecDeque::with_capacity(max_len),
            max_len,
        }
    }

    /// Append a price, evicting from the front once at capacity.
    pub fn push(&mut self, price: f64) {
        while self.prices.len() >= self.max_len {
            self.prices.pop_front();
        }
        self.prices.push_back(price);
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn latest(&self) -> Option<f64> {
        self.prices.back().copied()
    }

    /// Prices oldest-first.
    pub fn points(&self) -> Vec<f64> {
        self.prices.iter().copied().collect()
    }
}

/// Bounded FIFO of raw ticks, kept solely so the candle history can be
/// recomputed when the aggregation interval changes. Ticks evicted here are
/// permanently unavailable to reconstruction.
#[derive(Debug, Clone)]
pub struct RawTickBuffer {
    ticks: VecDeque<Tick>,
    capacity: usize,
    keep: usize,
}

impl RawTickBuffer {
    pub fn new(capacity: usize, keep: usize) -> Self {
        assert!(
            0 < keep && keep <= capacity,
            "keep must be in 1..=capacity"
        );
        Self {
            ticks: VecDeque::with_capacity(capacity),
            capacity,
            keep,
        }
    }

    /// Append a tick; once the buffer grows past capacity, drop the oldest
    /// entries down to the retention size.
    pub fn push(&mut self, tick: Tick) {
        self.ticks.push_back(tick);
        if self.ticks.len() > self.capacity {
            let excess = self.ticks.len() - self.keep;
            self.ticks.drain(..excess);
        }
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    /// Ticks oldest-first (chronological replay order).
    pub fn iter(&self) -> impl Iterator<Item = &Tick> {
        self.ticks.iter()
    }
}

impl Default for RawTickBuffer {
    fn default() -> Self {
        Self::new(RAW_TICK_CAPACITY, RAW_TICK_KEEP)
    }
}

/// 24h summary scalars as delivered by the feed (not derived from the candle
/// buffers). Day fields that arrived malformed are stored as `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DaySummary {
    pub last_price: f64,
    pub prev_price: Option<f64>,
    pub day_open: Option<f64>,
    pub day_high: Option<f64>,
    pub day_low: Option<f64>,
    pub day_volume: Option<f64>,
    pub change_pct: f64,
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Full rolling state tracked for one instrument: line buffer, raw-tick
/// retention, candle history plus in-progress candle, and the 24h summary.
#[derive(Debug, Clone)]
pub struct SeriesState {
    line: LineBuffer,
    raw_ticks: RawTickBuffer,
    candles: VecDeque<Candle>,
    current_candle: Option<Candle>,
    bucket_ms: u64,
    max_candles: usize,
    summary: Option<DaySummary>,
    market_cap: Option<f64>,
    msg_count: u64,
}

impl SeriesState {
    pub fn new(bucket_ms: u64, max_ticks: usize, max_candles: usize) -> Self {
        assert!(bucket_ms > 0, "bucket_ms must be > 0");
        assert!(max_candles > 0, "max_candles must be > 0");
        Self {
            line: LineBuffer::new(max_ticks),
            raw_ticks: RawTickBuffer::default(),
            candles: VecDeque::with_capacity(max_candles),
            current_candle: None,
            bucket_ms,
            max_candles,
            summary: None,
            market_cap: None,
            msg_count: 0,
        }
    }

    /// Fold one feed update into every derived view. The caller has already
    /// validated the instrument and that the price is finite and positive.
    pub fn record(
        &mut self,
        tick: Tick,
        day_open: f64,
        day_high: f64,
        day_low: f64,
        day_volume: f64,
    ) {
        let change_pct = if day_open.is_finite() && day_open != 0.0 {
            (tick.price - day_open) / day_open * 100.0
        } else {
            0.0
        };
        self.summary = Some(DaySummary {
            last_price: tick.price,
            prev_price: self.summary.map(|s| s.last_price),
            day_open: finite(day_open),
            day_high: finite(day_high),
            day_low: finite(day_low),
            day_volume: finite(day_volume),
            change_pct,
        });
        self.line.push(tick.price);
        self.ingest_tick(tick);
        self.msg_count += 1;
    }

    /// Bucket state machine: seal the current candle when a tick maps to a
    /// different bucket, otherwise fold the tick into it. The raw tick is
    /// retained regardless of the bucket logic.
    fn ingest_tick(&mut self, tick: Tick) {
        self.raw_ticks.push(tick);

        let bucket = bucket_start(tick.timestamp_ms, self.bucket_ms);
        let same_bucket = self
            .current_candle
            .as_ref()
            .is_some_and(|c| c.bucket_start_ms == bucket);
        if same_bucket {
            if let Some(current) = self.current_candle.as_mut() {
                current.update(tick.price);
            }
        } else {
            if let Some(sealed) = self.current_candle.take() {
                self.candles.push_back(sealed);
                while self.candles.len() > self.max_candles {
                    self.candles.pop_front();
                }
            }
            self.current_candle = Some(Candle::open_at(tick.price, tick.timestamp_ms, self.bucket_ms));
        }
    }

    /// Switch the aggregation interval and re-derive the entire candle
    /// series by replaying the retained raw ticks in chronological order.
    ///
    /// Depends only on the raw buffer and the new interval — never on the
    /// previous candle state — so rebuilding twice with the same interval
    /// yields identical output.
    pub fn set_timeframe(&mut self, bucket_ms: u64) {
        assert!(bucket_ms > 0, "bucket_ms must be > 0");
        self.bucket_ms = bucket_ms;

        let mut sealed: Vec<Candle> = Vec::new();
        let mut current: Option<Candle> = None;
        for tick in self.raw_ticks.iter() {
            let bucket = bucket_start(tick.timestamp_ms, bucket_ms);
            let same_bucket = current.as_ref().is_some_and(|c| c.bucket_start_ms == bucket);
            if same_bucket {
                if let Some(c) = current.as_mut() {
                    c.update(tick.price);
                }
            } else {
                if let Some(done) = current.take() {
                    sealed.push(done);
                }
                current = Some(Candle::open_at(tick.price, tick.timestamp_ms, bucket_ms));
            }
        }
        if sealed.len() > self.max_candles {
            sealed.drain(..sealed.len() - self.max_candles);
        }
        self.candles = sealed.into();
        self.current_candle = current;
    }

    pub fn set_market_cap(&mut self, cap: f64) {
        if cap.is_finite() && cap > 0.0 {
            self.market_cap = Some(cap);
        }
    }

    pub fn line(&self) -> &LineBuffer {
        &self.line
    }

    pub fn raw_tick_len(&self) -> usize {
        self.raw_ticks.len()
    }

    pub fn candles(&self) -> impl Iterator<Item = &Candle> {
        self.candles.iter()
    }

    pub fn current_candle(&self) -> Option<&Candle> {
        self.current_candle.as_ref()
    }

    /// Sealed history plus the in-progress candle, as counted by renderers.
    pub fn candle_count(&self) -> usize {
        self.candles.len() + usize::from(self.current_candle.is_some())
    }

    pub fn bucket_ms(&self) -> u64 {
        self.bucket_ms
    }

    pub fn max_candles(&self) -> usize {
        self.max_candles
    }

    pub fn summary(&self) -> Option<&DaySummary> {
        self.summary.as_ref()
    }

    pub fn market_cap(&self) -> Option<f64> {
        self.market_cap
    }

    pub fn msg_count(&self) -> u64 {
        self.msg_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_buffer_evicts_oldest_first() {
        let mut line = LineBuffer::new(3);
        for p in [1.0, 2.0, 3.0, 4.0, 5.0] {
            line.push(p);
        }
        assert_eq!(line.len(), 3);
        assert_eq!(line.points(), vec![3.0, 4.0, 5.0]);
        assert_eq!(line.latest(), Some(5.0));
    }

    #[test]
    fn raw_buffer_compacts_to_keep_size() {
        let mut raw = RawTickBuffer::new(10, 6);
        for i in 0..11u64 {
            raw.push(Tick::new(i, 100.0 + i as f64));
        }
        // 11th push exceeds capacity: keep the most recent 6.
        assert_eq!(raw.len(), 6);
        let first = raw.iter().next().copied();
        assert_eq!(first, Some(Tick::new(5, 105.0)));
    }

    #[test]
    fn seal_on_later_bucket_and_evict_front() {
        let mut series = SeriesState::new(60_000, 50, 2);
        // Four buckets: 0, 60s, 120s, 180s with history capped at 2.
        for (ts, price) in [(0u64, 10.0), (60_000, 11.0), (120_000, 12.0), (180_000, 13.0)] {
            series.record(Tick::new(ts, price), 10.0, 13.0, 9.0, 1000.0);
        }
        let history: Vec<_> = series.candles().copied().collect();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].bucket_start_ms, 60_000);
        assert_eq!(history[1].bucket_start_ms, 120_000);
        assert_eq!(series.current_candle().unwrap().bucket_start_ms, 180_000);
        assert_eq!(series.candle_count(), 3);
    }

    #[test]
    fn change_pct_defaults_to_zero_without_day_open() {
        let mut series = SeriesState::new(60_000, 50, 30);
        series.record(Tick::new(0, 100.0), 0.0, f64::NAN, 90.0, 1000.0);
        let summary = series.summary().unwrap();
        assert!((summary.change_pct - 0.0).abs() < f64::EPSILON);
        assert!(summary.day_high.is_none());
        assert_eq!(summary.day_low, Some(90.0));
    }
}
