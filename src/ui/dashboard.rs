use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::market::hub::SeriesSnapshot;
use crate::model::instrument::Instrument;

use super::chart::{CandleChart, SparkChart};
use super::format::{fmt_compact_usd, fmt_price, fmt_uptime, fmt_volume, timeframe_label};
use super::ChartMode;

fn change_color(change_pct: f64) -> Color {
    if change_pct >= 0.0 {
        Color::Green
    } else {
        Color::Red
    }
}

fn change_badge(change_pct: f64) -> String {
    let arrow = if change_pct >= 0.0 { "▲" } else { "▼" };
    let sign = if change_pct >= 0.0 { "+" } else { "" };
    format!("{} {}{:.2}%", arrow, sign, change_pct)
}

pub struct StatusBar {
    pub ws_connected: bool,
    pub market_open: bool,
    pub total_messages: u64,
    pub rejected_messages: u64,
    pub uptime_ms: u64,
    pub clock: String,
}

impl Widget for StatusBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let conn_status = if self.ws_connected {
            Span::styled("LIVE", Style::default().fg(Color::Green))
        } else {
            Span::styled("OFFLINE", Style::default().fg(Color::Red))
        };
        let market_status = if self.market_open {
            Span::styled("OPEN", Style::default().fg(Color::Green))
        } else {
            Span::styled("—", Style::default().fg(Color::DarkGray))
        };

        let mut spans = vec![
            Span::styled(
                " coindeck ",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("| ", Style::default().fg(Color::DarkGray)),
            conn_status,
            Span::styled(" | market ", Style::default().fg(Color::DarkGray)),
            market_status,
            Span::styled(
                format!(" | msgs: {}", self.total_messages),
                Style::default().fg(Color::DarkGray),
            ),
        ];
        if self.rejected_messages > 0 {
            spans.push(Span::styled(
                format!(" ({} dropped)", self.rejected_messages),
                Style::default().fg(Color::Yellow),
            ));
        }
        spans.push(Span::styled(
            format!(
                " | up {} | {} ",
                fmt_uptime(self.uptime_ms),
                self.clock
            ),
            Style::default().fg(Color::DarkGray),
        ));

        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}

/// One entry of the mini price ribbon above the card grid.
pub struct SummaryItem {
    pub short: String,
    pub price: Option<String>,
    pub change_pct: Option<f64>,
}

pub struct SummaryStrip<'a> {
    items: &'a [SummaryItem],
}

impl<'a> SummaryStrip<'a> {
    pub fn new(items: &'a [SummaryItem]) -> Self {
        Self { items }
    }
}

impl Widget for SummaryStrip<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![Span::raw(" ")];
        for item in self.items {
            spans.push(Span::styled(
                item.short.clone(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw(" "));
            match &item.price {
                Some(price) => spans.push(Span::styled(
                    format!("${}", price),
                    Style::default().fg(Color::Cyan),
                )),
                None => spans.push(Span::styled("—", Style::default().fg(Color::DarkGray))),
            }
            match item.change_pct {
                Some(change) => spans.push(Span::styled(
                    format!(" {}", change_badge(change)),
                    Style::default().fg(change_color(change)),
                )),
                None => spans.push(Span::styled(
                    " 0.00%",
                    Style::default().fg(Color::DarkGray),
                )),
            }
            spans.push(Span::styled("  ·  ", Style::default().fg(Color::DarkGray)));
        }
        spans.pop();
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}

/// One instrument card: header, price with flash direction, 24h stats,
/// counter line, and the line or candle chart.
pub struct InstrumentCard<'a> {
    instrument: &'a Instrument,
    snapshot: &'a SeriesSnapshot,
    chart_mode: ChartMode,
    selected: bool,
    max_ticks: usize,
    max_candles: usize,
}

impl<'a> InstrumentCard<'a> {
    pub fn new(instrument: &'a Instrument, snapshot: &'a SeriesSnapshot) -> Self {
        Self {
            instrument,
            snapshot,
            chart_mode: ChartMode::Line,
            selected: false,
            max_ticks: 0,
            max_candles: 0,
        }
    }

    pub fn chart_mode(mut self, mode: ChartMode) -> Self {
        self.chart_mode = mode;
        self
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn caps(mut self, max_ticks: usize, max_candles: usize) -> Self {
        self.max_ticks = max_ticks;
        self.max_candles = max_candles;
        self
    }
}

impl Widget for InstrumentCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_color = if self.selected {
            Color::Cyan
        } else {
            Color::DarkGray
        };
        let block = Block::default()
            .title(format!(
                " {} · {} ",
                self.instrument.name, self.instrument.pair
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 4 || inner.width < 10 {
            return;
        }

        let decimals = self.instrument.decimals;
        let summary = self.snapshot.summary;

        // Price line: last price, flash direction vs previous, change badge.
        let price_spans = match summary {
            Some(s) => {
                let flash = match s.prev_price {
                    Some(prev) if s.last_price > prev => {
                        Span::styled("▲ ", Style::default().fg(Color::Green))
                    }
                    Some(prev) if s.last_price < prev => {
                        Span::styled("▼ ", Style::default().fg(Color::Red))
                    }
                    _ => Span::raw("  "),
                };
                let mut spans = vec![
                    flash,
                    Span::styled(
                        format!("${}", fmt_price(s.last_price, decimals)),
                        Style::default()
                            .fg(Color::White)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("  {}", change_badge(s.change_pct)),
                        Style::default().fg(change_color(s.change_pct)),
                    ),
                ];
                if let Some(cap) = self.snapshot.market_cap {
                    spans.push(Span::styled(
                        format!("  MCap {}", fmt_compact_usd(cap)),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
                spans
            }
            None => vec![Span::styled(
                "$—  waiting for feed",
                Style::default().fg(Color::DarkGray),
            )],
        };
        buf.set_line(inner.x, inner.y, &Line::from(price_spans), inner.width);

        // 24h stats line.
        let stat = |label: &str, value: String| -> Vec<Span<'static>> {
            vec![
                Span::styled(format!("{} ", label), Style::default().fg(Color::DarkGray)),
                Span::styled(value, Style::default().fg(Color::White)),
                Span::raw("  "),
            ]
        };
        let mut stats_spans = Vec::new();
        match summary {
            Some(s) => {
                stats_spans.extend(stat(
                    "H",
                    s.day_high
                        .map(|v| format!("${}", fmt_price(v, decimals)))
                        .unwrap_or_else(|| "—".to_string()),
                ));
                stats_spans.extend(stat(
                    "L",
                    s.day_low
                        .map(|v| format!("${}", fmt_price(v, decimals)))
                        .unwrap_or_else(|| "—".to_string()),
                ));
                stats_spans.extend(stat(
                    "V",
                    s.day_volume.map(fmt_volume).unwrap_or_else(|| "—".to_string()),
                ));
            }
            None => {
                stats_spans.extend(stat("H", "—".to_string()));
                stats_spans.extend(stat("L", "—".to_string()));
                stats_spans.extend(stat("V", "—".to_string()));
            }
        }
        buf.set_line(inner.x, inner.y + 1, &Line::from(stats_spans), inner.width);

        // Mode / timeframe / fill counter line.
        let (count, cap, mode_label) = match self.chart_mode {
            ChartMode::Line => (self.snapshot.line_points.len(), self.max_ticks, "LINE"),
            ChartMode::Candle => (self.snapshot.candle_count(), self.max_candles, "OHLC"),
        };
        let counter_line = Line::from(vec![
            Span::styled(mode_label, Style::default().fg(Color::Yellow)),
            Span::styled(
                format!(
                    " · {} · {} / {}",
                    timeframe_label(self.snapshot.bucket_ms),
                    count,
                    cap
                ),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        buf.set_line(inner.x, inner.y + 2, &counter_line, inner.width);

        // Chart area.
        let chart_area = Rect {
            x: inner.x,
            y: inner.y + 3,
            width: inner.width,
            height: inner.height - 3,
        };
        match self.chart_mode {
            ChartMode::Line => {
                SparkChart::new(&self.snapshot.line_points).render(chart_area, buf);
            }
            ChartMode::Candle => {
                let all = self.snapshot.all_candles();
                CandleChart::new(&all).render(chart_area, buf);
            }
        }
    }
}

pub struct LogPanel<'a> {
    messages: &'a [String],
}

impl<'a> LogPanel<'a> {
    pub fn new(messages: &'a [String]) -> Self {
        Self { messages }
    }
}

impl Widget for LogPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let visible_rows = area.height.saturating_sub(2) as usize;
        let start = self.messages.len().saturating_sub(visible_rows);
        let lines: Vec<Line> = self.messages[start..]
            .iter()
            .map(|msg| {
                let color = if msg.starts_with("[ERR]") {
                    Color::Red
                } else if msg.starts_with("[WARN]") {
                    Color::Yellow
                } else {
                    Color::DarkGray
                };
                Line::from(Span::styled(msg.clone(), Style::default().fg(color)))
            })
            .collect();

        let block = Block::default()
            .title(" System Log ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        Paragraph::new(lines).block(block).render(area, buf);
    }
}

pub struct KeybindBar;

impl Widget for KeybindBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bind = |key: &'static str, action: &'static str| {
            [
                Span::styled(key, Style::default().fg(Color::Yellow)),
                Span::styled(action, Style::default().fg(Color::DarkGray)),
            ]
        };
        let mut spans = vec![Span::raw(" ")];
        spans.extend(bind("[Q]", "uit  "));
        spans.extend(bind("[←/→]", " select  "));
        spans.extend(bind("[L]", "ine  "));
        spans.extend(bind("[C]", "andles  "));
        spans.extend(bind("[1/2/3]", " 1m/5m/15m  "));
        spans.extend(bind("[F]", "ocus  "));
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}
