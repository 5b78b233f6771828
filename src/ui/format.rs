//! Display formatting helpers shared by the dashboard widgets.

/// Fixed-decimal value with thousands separators: 117052.1 -> "117,052.10".
pub fn fmt_price(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return "—".to_string();
    }
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };
    let grouped = group_thousands(int_part);
    let sign = if value < 0.0 { "-" } else { "" };
    match frac_part {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

fn group_thousands(digits: &str) -> String {
    let bytes = digits.as_bytes();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 && (bytes.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(*b as char);
    }
    out
}

/// Compact dollar value: $1.23T / $4.56B / $789.00M / $12.3K.
pub fn fmt_compact_usd(value: f64) -> String {
    if !value.is_finite() {
        return "—".to_string();
    }
    if value >= 1e12 {
        format!("${:.2}T", value / 1e12)
    } else if value >= 1e9 {
        format!("${:.2}B", value / 1e9)
    } else if value >= 1e6 {
        format!("${:.2}M", value / 1e6)
    } else if value >= 1e3 {
        format!("${:.1}K", value / 1e3)
    } else {
        format!("${:.2}", value)
    }
}

/// Volume without the dollar sign: 1.23B / 4.56M / 789.0K.
pub fn fmt_volume(value: f64) -> String {
    if !value.is_finite() {
        return "—".to_string();
    }
    if value >= 1e9 {
        format!("{:.2}B", value / 1e9)
    } else if value >= 1e6 {
        format!("{:.2}M", value / 1e6)
    } else if value >= 1e3 {
        format!("{:.1}K", value / 1e3)
    } else {
        format!("{:.2}", value)
    }
}

/// Adaptive short format for chart min/max labels.
pub fn fmt_short(value: f64) -> String {
    if !value.is_finite() {
        return "—".to_string();
    }
    if value >= 10_000.0 {
        group_thousands(&format!("{}", value.round() as i64))
    } else if value >= 100.0 {
        format!("{:.1}", value)
    } else if value >= 1.0 {
        format!("{:.2}", value)
    } else {
        format!("{:.4}", value)
    }
}

/// Elapsed time as "1h 23m 45s".
pub fn fmt_uptime(elapsed_ms: u64) -> String {
    let total_sec = elapsed_ms / 1000;
    let hours = total_sec / 3600;
    let minutes = (total_sec % 3600) / 60;
    let seconds = total_sec % 60;
    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// Label for an aggregation interval in milliseconds.
pub fn timeframe_label(bucket_ms: u64) -> String {
    match bucket_ms {
        60_000 => "1m".to_string(),
        300_000 => "5m".to_string(),
        900_000 => "15m".to_string(),
        ms if ms % 60_000 == 0 => format!("{}m", ms / 60_000),
        ms => format!("{}s", ms / 1_000),
    }
}
