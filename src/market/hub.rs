//! Per-instrument state container: owns one series per tracked instrument
//! and exposes ingest, timeframe switching, and read snapshots.

use std::collections::HashMap;

use crate::model::candle::Candle;
use crate::model::instrument::Instrument;
use crate::model::tick::Tick;

use super::series::{DaySummary, SeriesState};

/// One demultiplexed feed update for a single instrument, numerics already
/// parsed by the transport layer.
#[derive(Debug, Clone)]
pub struct FeedUpdate {
    pub symbol: String,
    pub timestamp_ms: u64,
    pub last_price: f64,
    pub day_open: f64,
    pub day_high: f64,
    pub day_low: f64,
    pub day_volume: f64,
}

/// Result of offering a feed update to the hub. Rejections are silent drops
/// by design — a live dashboard never halts on one bad message — but callers
/// can count and log them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    Applied,
    UnknownInstrument,
    InvalidPrice,
}

impl IngestOutcome {
    pub fn is_applied(self) -> bool {
        self == Self::Applied
    }
}

/// Read-only view of one instrument's series, consistent at the moment of
/// the call.
#[derive(Debug, Clone)]
pub struct SeriesSnapshot {
    /// Line sparkline prices, oldest first.
    pub line_points: Vec<f64>,
    /// Sealed candles, oldest first.
    pub candles: Vec<Candle>,
    pub current_candle: Option<Candle>,
    pub summary: Option<DaySummary>,
    pub market_cap: Option<f64>,
    pub msg_count: u64,
    pub bucket_ms: u64,
}

impl SeriesSnapshot {
    /// Sealed history plus the in-progress candle, as shown by renderers.
    pub fn candle_count(&self) -> usize {
        self.candles.len() + usize::from(self.current_candle.is_some())
    }

    /// History and current candle as one chronological sequence.
    pub fn all_candles(&self) -> Vec<Candle> {
        let mut all = self.candles.clone();
        if let Some(current) = self.current_candle {
            all.push(current);
        }
        all
    }
}

/// Container holding one [`SeriesState`] per tracked instrument, keyed by
/// stream symbol. Instruments evolve independently: a malformed or missing
/// message for one never affects another.
pub struct MarketHub {
    instruments: Vec<Instrument>,
    series: HashMap<String, SeriesState>,
    max_ticks: usize,
    max_candles: usize,
}

impl MarketHub {
    pub fn new(
        instruments: Vec<Instrument>,
        bucket_ms: u64,
        max_ticks: usize,
        max_candles: usize,
    ) -> Self {
        let series = instruments
            .iter()
            .map(|inst| {
                (
                    inst.symbol.clone(),
                    SeriesState::new(bucket_ms, max_ticks, max_candles),
                )
            })
            .collect();
        Self {
            instruments,
            series,
            max_ticks,
            max_candles,
        }
    }

    /// Tracked instruments in configured display order.
    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    pub fn max_ticks(&self) -> usize {
        self.max_ticks
    }

    pub fn max_candles(&self) -> usize {
        self.max_candles
    }

    /// Validate and apply one feed update. Unknown instruments and
    /// non-finite or non-positive prices are dropped without touching any
    /// series state.
    pub fn ingest(&mut self, update: &FeedUpdate) -> IngestOutcome {
        let Some(series) = self.series.get_mut(&update.symbol) else {
            return IngestOutcome::UnknownInstrument;
        };
        if !update.last_price.is_finite() || update.last_price <= 0.0 {
            return IngestOutcome::InvalidPrice;
        }
        series.record(
            Tick::new(update.timestamp_ms, update.last_price),
            update.day_open,
            update.day_high,
            update.day_low,
            update.day_volume,
        );
        IngestOutcome::Applied
    }

    /// Switch the candle interval for one instrument, rebuilding its history
    /// from the retained raw ticks. Returns false for untracked symbols.
    /// Accepted durations are validated by the caller.
    pub fn set_timeframe(&mut self, symbol: &str, bucket_ms: u64) -> bool {
        match self.series.get_mut(symbol) {
            Some(series) => {
                series.set_timeframe(bucket_ms);
                true
            }
            None => false,
        }
    }

    pub fn set_market_cap(&mut self, symbol: &str, cap: f64) -> bool {
        match self.series.get_mut(symbol) {
            Some(series) => {
                series.set_market_cap(cap);
                true
            }
            None => false,
        }
    }

    pub fn snapshot(&self, symbol: &str) -> Option<SeriesSnapshot> {
        let series = self.series.get(symbol)?;
        Some(SeriesSnapshot {
            line_points: series.line().points(),
            candles: series.candles().copied().collect(),
            current_candle: series.current_candle().copied(),
            summary: series.summary().copied(),
            market_cap: series.market_cap(),
            msg_count: series.msg_count(),
            bucket_ms: series.bucket_ms(),
        })
    }

    /// Total feed messages applied across all instruments (liveness signal
    /// for the market-status indicator).
    pub fn total_messages(&self) -> u64 {
        self.series.values().map(|s| s.msg_count()).sum()
    }
}
