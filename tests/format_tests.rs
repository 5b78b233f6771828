use coindeck::ui::format::{
    fmt_compact_usd, fmt_price, fmt_short, fmt_uptime, fmt_volume, timeframe_label,
};

#[test]
fn price_formatting_groups_thousands() {
    assert_eq!(fmt_price(117052.1, 2), "117,052.10");
    assert_eq!(fmt_price(1234567.0, 0), "1,234,567");
    assert_eq!(fmt_price(0.4271, 4), "0.4271");
    assert_eq!(fmt_price(f64::NAN, 2), "—");
}

#[test]
fn compact_usd_tiers() {
    assert_eq!(fmt_compact_usd(1.234e12), "$1.23T");
    assert_eq!(fmt_compact_usd(9.87e9), "$9.87B");
    assert_eq!(fmt_compact_usd(5.5e6), "$5.50M");
    assert_eq!(fmt_compact_usd(2_500.0), "$2.5K");
    assert_eq!(fmt_compact_usd(999.99), "$999.99");
}

#[test]
fn volume_tiers() {
    assert_eq!(fmt_volume(1.23e9), "1.23B");
    assert_eq!(fmt_volume(4.56e6), "4.56M");
    assert_eq!(fmt_volume(789_000.0), "789.0K");
    assert_eq!(fmt_volume(12.3), "12.30");
}

#[test]
fn short_format_adapts_to_magnitude() {
    assert_eq!(fmt_short(117052.4), "117,052");
    assert_eq!(fmt_short(432.15), "432.1");
    assert_eq!(fmt_short(3.14159), "3.14");
    assert_eq!(fmt_short(0.4271), "0.4271");
}

#[test]
fn uptime_format() {
    assert_eq!(fmt_uptime(0), "0s");
    assert_eq!(fmt_uptime(59_999), "59s");
    assert_eq!(fmt_uptime(60_000), "1m 0s");
    assert_eq!(fmt_uptime(3_600_000), "1h 0m 0s");
    assert_eq!(fmt_uptime(5_025_000), "1h 23m 45s");
}

#[test]
fn timeframe_labels() {
    assert_eq!(timeframe_label(60_000), "1m");
    assert_eq!(timeframe_label(300_000), "5m");
    assert_eq!(timeframe_label(900_000), "15m");
    assert_eq!(timeframe_label(120_000), "2m");
    assert_eq!(timeframe_label(5_000), "5s");
}
