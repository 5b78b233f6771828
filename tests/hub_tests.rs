use coindeck::market::hub::{FeedUpdate, IngestOutcome, MarketHub};
use coindeck::model::instrument::Instrument;

fn instrument(symbol: &str, gecko_id: &str) -> Instrument {
    Instrument {
        symbol: symbol.to_string(),
        name: symbol.to_ascii_uppercase(),
        short: symbol[..3].to_ascii_uppercase(),
        pair: format!("{} / USDT", &symbol[..3].to_ascii_uppercase()),
        decimals: 2,
        gecko_id: gecko_id.to_string(),
    }
}

fn hub() -> MarketHub {
    MarketHub::new(
        vec![
            instrument("btcusdt", "bitcoin"),
            instrument("ethusdt", "ethereum"),
        ],
        60_000,
        50,
        30,
    )
}

fn update(symbol: &str, timestamp_ms: u64, price: f64) -> FeedUpdate {
    FeedUpdate {
        symbol: symbol.to_string(),
        timestamp_ms,
        last_price: price,
        day_open: 100.0,
        day_high: 110.0,
        day_low: 90.0,
        day_volume: 12_345.0,
    }
}

#[test]
fn applied_update_is_visible_in_snapshot() {
    let mut hub = hub();
    let outcome = hub.ingest(&update("btcusdt", 30_000, 105.0));
    assert!(outcome.is_applied());

    let snapshot = hub.snapshot("btcusdt").expect("tracked instrument");
    assert_eq!(snapshot.line_points, vec![105.0]);
    assert_eq!(snapshot.candle_count(), 1);
    assert_eq!(snapshot.msg_count, 1);

    let summary = snapshot.summary.expect("summary after first update");
    assert!((summary.last_price - 105.0).abs() < f64::EPSILON);
    assert!(summary.prev_price.is_none());
    // ((105 - 100) / 100) * 100 = 5%
    assert!((summary.change_pct - 5.0).abs() < 1e-9);

    let current = snapshot.current_candle.expect("open candle");
    assert_eq!(current.bucket_start_ms, 0);
}

#[test]
fn prev_price_tracks_the_one_before() {
    let mut hub = hub();
    hub.ingest(&update("btcusdt", 1_000, 100.0));
    hub.ingest(&update("btcusdt", 2_000, 101.0));

    let summary = hub.snapshot("btcusdt").unwrap().summary.unwrap();
    assert!((summary.last_price - 101.0).abs() < f64::EPSILON);
    assert_eq!(summary.prev_price, Some(100.0));
}

#[test]
fn unknown_instrument_is_dropped_without_side_effects() {
    let mut hub = hub();
    let outcome = hub.ingest(&update("dogeusdt", 1_000, 0.12));
    assert_eq!(outcome, IngestOutcome::UnknownInstrument);
    assert!(hub.snapshot("dogeusdt").is_none());
    assert_eq!(hub.total_messages(), 0);
}

#[test]
fn non_finite_or_non_positive_prices_are_dropped() {
    let mut hub = hub();
    for bad in [f64::NAN, f64::INFINITY, 0.0, -5.0] {
        let outcome = hub.ingest(&update("btcusdt", 1_000, bad));
        assert_eq!(outcome, IngestOutcome::InvalidPrice);
    }
    let snapshot = hub.snapshot("btcusdt").unwrap();
    assert!(snapshot.line_points.is_empty());
    assert!(snapshot.summary.is_none());
    assert_eq!(snapshot.msg_count, 0);
}

#[test]
fn instruments_evolve_independently() {
    let mut hub = hub();
    for i in 0..10u64 {
        hub.ingest(&update("btcusdt", i * 1_000, 100.0 + i as f64));
    }
    let eth = hub.snapshot("ethusdt").unwrap();
    assert!(eth.line_points.is_empty());
    assert!(eth.summary.is_none());
    assert_eq!(eth.msg_count, 0);

    let btc = hub.snapshot("btcusdt").unwrap();
    assert_eq!(btc.msg_count, 10);
    assert_eq!(hub.total_messages(), 10);
}

#[test]
fn set_timeframe_rebuilds_only_that_instrument() {
    let mut hub = hub();
    // Two one-minute buckets per instrument.
    for symbol in ["btcusdt", "ethusdt"] {
        hub.ingest(&update(symbol, 0, 100.0));
        hub.ingest(&update(symbol, 30_000, 105.0));
        hub.ingest(&update(symbol, 65_000, 95.0));
    }

    assert!(hub.set_timeframe("btcusdt", 120_000));

    let btc = hub.snapshot("btcusdt").unwrap();
    assert_eq!(btc.bucket_ms, 120_000);
    assert_eq!(btc.candles.len(), 0);
    let merged = btc.current_candle.expect("merged candle");
    assert!((merged.open - 100.0).abs() < f64::EPSILON);
    assert!((merged.high - 105.0).abs() < f64::EPSILON);
    assert!((merged.low - 95.0).abs() < f64::EPSILON);

    // The raw-tick buffer is the rebuild source, not the candle history:
    // switching back restores the original two-bucket shape.
    assert!(hub.set_timeframe("btcusdt", 60_000));
    let btc = hub.snapshot("btcusdt").unwrap();
    assert_eq!(btc.candles.len(), 1);
    assert_eq!(btc.current_candle.unwrap().bucket_start_ms, 60_000);

    let eth = hub.snapshot("ethusdt").unwrap();
    assert_eq!(eth.bucket_ms, 60_000);
    assert_eq!(eth.candles.len(), 1);
}

#[test]
fn set_timeframe_on_untracked_symbol_is_refused() {
    let mut hub = hub();
    assert!(!hub.set_timeframe("dogeusdt", 60_000));
}

#[test]
fn market_caps_apply_per_symbol() {
    let mut hub = hub();
    assert!(hub.set_market_cap("btcusdt", 8.3e11));
    assert!(!hub.set_market_cap("dogeusdt", 1.0e10));

    assert_eq!(hub.snapshot("btcusdt").unwrap().market_cap, Some(8.3e11));
    assert_eq!(hub.snapshot("ethusdt").unwrap().market_cap, None);
}

#[test]
fn snapshot_counts_current_candle() {
    let mut hub = hub();
    hub.ingest(&update("btcusdt", 0, 100.0));
    hub.ingest(&update("btcusdt", 65_000, 101.0));

    let snapshot = hub.snapshot("btcusdt").unwrap();
    assert_eq!(snapshot.candles.len(), 1);
    assert!(snapshot.current_candle.is_some());
    assert_eq!(snapshot.candle_count(), 2);
    assert_eq!(snapshot.all_candles().len(), 2);
}
