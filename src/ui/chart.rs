//! Sparkline and candlestick widgets drawn cell-by-cell into the buffer.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::model::candle::Candle;

use super::format::fmt_short;

const UP_COLOR: Color = Color::Green;
const DOWN_COLOR: Color = Color::Red;

/// Line sparkline with min/max markers, drawn over the full widget area
/// (the parent card supplies the border).
pub struct SparkChart<'a> {
    prices: &'a [f64],
}

impl<'a> SparkChart<'a> {
    pub fn new(prices: &'a [f64]) -> Self {
        Self { prices }
    }
}

impl Widget for SparkChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.prices.len() < 2 || area.height < 3 || area.width < 6 {
            return;
        }

        let chart_height = area.height as usize;
        let chart_width = area.width as usize;

        // Take the last `chart_width` prices
        let visible: &[f64] = if self.prices.len() > chart_width {
            &self.prices[self.prices.len() - chart_width..]
        } else {
            self.prices
        };

        let mut min_price = f64::INFINITY;
        let mut max_price = f64::NEG_INFINITY;
        let mut min_idx = 0usize;
        let mut max_idx = 0usize;
        for (i, &p) in visible.iter().enumerate() {
            if p < min_price {
                min_price = p;
                min_idx = i;
            }
            if p > max_price {
                max_price = p;
                max_idx = i;
            }
        }

        let trend_up = visible[visible.len() - 1] >= visible[0];
        let line_color = if trend_up { UP_COLOR } else { DOWN_COLOR };

        let range = max_price - min_price;
        if range <= f64::EPSILON {
            // Flat series: midline, no markers.
            let y = area.y + area.height / 2;
            for (i, _) in visible.iter().enumerate() {
                buf.set_string(area.x + i as u16, y, "●", Style::default().fg(line_color));
            }
            return;
        }

        let row_for = |price: f64| -> u16 {
            let normalized = (price - min_price) / range;
            let y_off = (chart_height - 1)
                - ((normalized * (chart_height - 1) as f64).round() as usize)
                    .min(chart_height - 1);
            area.y + y_off as u16
        };

        for (i, &price) in visible.iter().enumerate() {
            let x = area.x + i as u16;
            buf.set_string(x, row_for(price), "●", Style::default().fg(line_color));
        }

        // Min/max markers: dot row is already drawn, add a label beside it,
        // clamped inside the widget area.
        let mut mark = |idx: usize, value: f64, is_max: bool| {
            let label = format!("{} {}", if is_max { "▲" } else { "▼" }, fmt_short(value));
            let color = if is_max { UP_COLOR } else { DOWN_COLOR };
            let point_y = row_for(value);
            let y = if is_max {
                point_y.saturating_sub(1).max(area.y)
            } else {
                (point_y + 1).min(area.y + area.height - 1)
            };
            let width = label.chars().count() as u16;
            let x = (area.x + idx as u16).min((area.x + area.width).saturating_sub(width));
            buf.set_string(x, y, &label, Style::default().fg(color));
        };
        mark(max_idx, max_price, true);
        mark(min_idx, min_price, false);
    }
}

/// OHLC candlestick chart: one body column per candle with a one-column gap,
/// wick above/below the body, colored by direction.
pub struct CandleChart<'a> {
    candles: &'a [Candle],
}

impl<'a> CandleChart<'a> {
    pub fn new(candles: &'a [Candle]) -> Self {
        Self { candles }
    }
}

impl Widget for CandleChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.candles.is_empty() || area.height < 3 || area.width < 6 {
            return;
        }

        let chart_height = area.height as usize;
        let max_visible = (area.width as usize / 2).max(1);
        let visible: &[Candle] = if self.candles.len() > max_visible {
            &self.candles[self.candles.len() - max_visible..]
        } else {
            self.candles
        };

        let min_low = visible.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
        let max_high = visible
            .iter()
            .map(|c| c.high)
            .fold(f64::NEG_INFINITY, f64::max);
        let range = max_high - min_low;
        let range = if range <= f64::EPSILON { 1.0 } else { range };

        let row_for = |price: f64| -> u16 {
            let normalized = (price - min_low) / range;
            let y_off = (chart_height - 1)
                - ((normalized * (chart_height - 1) as f64).round() as usize)
                    .min(chart_height - 1);
            area.y + y_off as u16
        };

        for (i, candle) in visible.iter().enumerate() {
            let x = area.x + (i * 2) as u16;
            let color = if candle.is_bullish() {
                UP_COLOR
            } else {
                DOWN_COLOR
            };

            let high_y = row_for(candle.high);
            let low_y = row_for(candle.low);
            let open_y = row_for(candle.open);
            let close_y = row_for(candle.close);
            let body_top = open_y.min(close_y);
            let body_bottom = open_y.max(close_y);

            for y in high_y..=low_y {
                let glyph = if y >= body_top && y <= body_bottom {
                    "█"
                } else {
                    "│"
                };
                buf.set_string(x, y, glyph, Style::default().fg(color));
            }
        }

        // Axis labels
        buf.set_string(
            area.x,
            area.y,
            fmt_short(max_high),
            Style::default().fg(Color::DarkGray),
        );
        buf.set_string(
            area.x,
            area.y + area.height - 1,
            fmt_short(min_low),
            Style::default().fg(Color::DarkGray),
        );
    }
}
