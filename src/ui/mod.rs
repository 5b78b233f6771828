pub mod chart;
pub mod dashboard;
pub mod format;

use std::time::Instant;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::Frame;

use crate::event::{AppEvent, WsConnectionStatus};
use crate::market::hub::{FeedUpdate, IngestOutcome, MarketHub};

use dashboard::{InstrumentCard, KeybindBar, LogPanel, StatusBar, SummaryItem, SummaryStrip};
use format::fmt_price;

const MAX_LOG_MESSAGES: usize = 200;
const GRID_COLUMNS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartMode {
    Line,
    Candle,
}

pub struct AppState {
    pub hub: MarketHub,
    /// Chart mode per instrument, indexed like `hub.instruments()`.
    chart_modes: Vec<ChartMode>,
    selected: usize,
    pub focus_open: bool,
    pub ws_connected: bool,
    pub rejected_count: u64,
    pub log_messages: Vec<String>,
    started_at: Instant,
}

impl AppState {
    pub fn new(hub: MarketHub) -> Self {
        let chart_modes = vec![ChartMode::Line; hub.instruments().len()];
        Self {
            hub,
            chart_modes,
            selected: 0,
            focus_open: false,
            ws_connected: false,
            rejected_count: 0,
            log_messages: Vec::new(),
            started_at: Instant::now(),
        }
    }

    pub fn push_log(&mut self, msg: String) {
        self.log_messages.push(msg);
        if self.log_messages.len() > MAX_LOG_MESSAGES {
            self.log_messages.remove(0);
        }
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_symbol(&self) -> Option<String> {
        self.hub
            .instruments()
            .get(self.selected)
            .map(|inst| inst.symbol.clone())
    }

    pub fn select_next(&mut self) {
        let count = self.hub.instruments().len();
        if count > 0 {
            self.selected = (self.selected + 1) % count;
        }
    }

    pub fn select_prev(&mut self) {
        let count = self.hub.instruments().len();
        if count > 0 {
            self.selected = (self.selected + count - 1) % count;
        }
    }

    pub fn set_chart_mode(&mut self, mode: ChartMode) {
        if let Some(slot) = self.chart_modes.get_mut(self.selected) {
            *slot = mode;
        }
    }

    pub fn chart_mode_at(&self, index: usize) -> ChartMode {
        self.chart_modes
            .get(index)
            .copied()
            .unwrap_or(ChartMode::Line)
    }

    /// Switch the selected instrument's candle interval, rebuilding its
    /// history from retained raw ticks.
    pub fn switch_timeframe(&mut self, label: &str, bucket_ms: u64) {
        let Some(symbol) = self.selected_symbol() else {
            return;
        };
        if self.hub.set_timeframe(&symbol, bucket_ms) {
            let rebuilt = self
                .hub
                .snapshot(&symbol)
                .map(|s| s.candle_count())
                .unwrap_or(0);
            self.push_log(format!(
                "{} timeframe -> {} ({} candles rebuilt)",
                symbol.to_ascii_uppercase(),
                label,
                rebuilt
            ));
        }
    }

    /// Feed updates arrive on their own channel at tick rate; rejections are
    /// counted but otherwise silent.
    pub fn apply_update(&mut self, update: &FeedUpdate) {
        match self.hub.ingest(update) {
            IngestOutcome::Applied => {}
            outcome => {
                self.rejected_count += 1;
                tracing::debug!(symbol = %update.symbol, ?outcome, "Feed update dropped");
            }
        }
    }

    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::MarketCaps(caps) => {
                let mapped: Vec<(String, f64)> = self
                    .hub
                    .instruments()
                    .iter()
                    .filter_map(|inst| {
                        caps.get(&inst.gecko_id)
                            .map(|cap| (inst.symbol.clone(), *cap))
                    })
                    .collect();
                let count = mapped.len();
                for (symbol, cap) in mapped {
                    self.hub.set_market_cap(&symbol, cap);
                }
                if count > 0 {
                    self.push_log(format!("Market caps refreshed ({} instruments)", count));
                }
            }
            AppEvent::WsStatus(status) => match status {
                WsConnectionStatus::Connected => {
                    self.ws_connected = true;
                    self.push_log("WebSocket connected".to_string());
                }
                WsConnectionStatus::Disconnected => {
                    self.ws_connected = false;
                    self.push_log("[WARN] WebSocket disconnected".to_string());
                }
                WsConnectionStatus::Reconnecting { attempt, delay_ms } => {
                    self.ws_connected = false;
                    self.push_log(format!(
                        "[WARN] Reconnecting (attempt {}, wait {}ms)",
                        attempt, delay_ms
                    ));
                }
            },
            AppEvent::LogMessage(msg) => {
                self.push_log(msg);
            }
            AppEvent::Error(msg) => {
                self.push_log(format!("[ERR] {}", msg));
            }
        }
    }

    pub fn market_open(&self) -> bool {
        self.hub.total_messages() > 0
    }

    pub fn uptime_ms(&self) -> u64 {
        self.started_at.elapsed().as_millis() as u64
    }
}

pub fn render(frame: &mut Frame, state: &AppState) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Length(1), // summary strip
            Constraint::Min(10),   // card grid / focus view
            Constraint::Length(6), // system log
            Constraint::Length(1), // keybinds
        ])
        .split(frame.area());

    frame.render_widget(
        StatusBar {
            ws_connected: state.ws_connected,
            market_open: state.market_open(),
            total_messages: state.hub.total_messages(),
            rejected_messages: state.rejected_count,
            uptime_ms: state.uptime_ms(),
            clock: chrono::Local::now().format("%H:%M:%S").to_string(),
        },
        outer[0],
    );

    let summary_items: Vec<SummaryItem> = state
        .hub
        .instruments()
        .iter()
        .map(|inst| {
            let summary = state.hub.snapshot(&inst.symbol).and_then(|s| s.summary);
            SummaryItem {
                short: inst.short.clone(),
                price: summary.map(|s| fmt_price(s.last_price, inst.decimals)),
                change_pct: summary.map(|s| s.change_pct),
            }
        })
        .collect();
    frame.render_widget(SummaryStrip::new(&summary_items), outer[1]);

    if state.focus_open {
        render_focus(frame, state, outer[2]);
    } else {
        render_grid(frame, state, outer[2]);
    }

    frame.render_widget(LogPanel::new(&state.log_messages), outer[3]);
    frame.render_widget(KeybindBar, outer[4]);
}

fn render_focus(frame: &mut Frame, state: &AppState, area: Rect) {
    let index = state.selected_index();
    let Some(instrument) = state.hub.instruments().get(index) else {
        return;
    };
    let Some(snapshot) = state.hub.snapshot(&instrument.symbol) else {
        return;
    };
    frame.render_widget(
        InstrumentCard::new(instrument, &snapshot)
            .chart_mode(state.chart_mode_at(index))
            .selected(true)
            .caps(state.hub.max_ticks(), state.hub.max_candles()),
        area,
    );
}

fn render_grid(frame: &mut Frame, state: &AppState, area: Rect) {
    let instruments = state.hub.instruments();
    if instruments.is_empty() {
        return;
    }
    let rows = instruments.len().div_ceil(GRID_COLUMNS);
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, rows as u32); rows])
        .split(area);

    for (row_idx, row_area) in row_areas.iter().enumerate() {
        let col_areas = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, GRID_COLUMNS as u32); GRID_COLUMNS])
            .split(*row_area);
        for (col_idx, col_area) in col_areas.iter().enumerate() {
            let index = row_idx * GRID_COLUMNS + col_idx;
            let Some(instrument) = instruments.get(index) else {
                continue;
            };
            let Some(snapshot) = state.hub.snapshot(&instrument.symbol) else {
                continue;
            };
            frame.render_widget(
                InstrumentCard::new(instrument, &snapshot)
                    .chart_mode(state.chart_mode_at(index))
                    .selected(index == state.selected_index())
                    .caps(state.hub.max_ticks(), state.hub.max_candles()),
                *col_area,
            );
        }
    }
}
