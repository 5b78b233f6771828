use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{Event, KeyCode};
use tokio::sync::{mpsc, watch};

use coindeck::binance::ws::BinanceWsClient;
use coindeck::coingecko::rest::CoinGeckoRestClient;
use coindeck::config::{parse_interval_ms, Config};
use coindeck::event::AppEvent;
use coindeck::input::{parse_main_command, UiCommand};
use coindeck::market::hub::{FeedUpdate, MarketHub};
use coindeck::ui::{self, AppState, ChartMode};

#[tokio::main]
async fn main() -> Result<()> {
    // Install rustls crypto provider (required by rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Load config
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            eprintln!("Make sure config/default.toml exists with at least one [[instruments]] entry");
            std::process::exit(1);
        }
    };

    // Init tracing (log to file so it doesn't interfere with TUI)
    let log_file = std::fs::File::create("coindeck.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                config
                    .logging
                    .level
                    .parse()
                    .unwrap_or_else(|_| "info".parse().unwrap())
            }),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .json()
        .init();

    tracing::info!(
        ws_url = %config.binance.ws_base_url,
        instruments = config.instruments.len(),
        timeframe = %config.dashboard.default_timeframe,
        "Starting coindeck"
    );

    let bucket_ms = parse_interval_ms(&config.dashboard.default_timeframe)
        .context("validated dashboard.default_timeframe became invalid at runtime")?;

    // Channels
    let (app_tx, mut app_rx) = mpsc::channel::<AppEvent>(256);
    let (update_tx, mut update_rx) = mpsc::channel::<FeedUpdate>(512);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // WebSocket feed task
    let ws_client = BinanceWsClient::new(&config.binance.ws_base_url, &config.instruments);
    let ws_status_tx = app_tx.clone();
    let ws_shutdown = shutdown_rx.clone();
    tokio::spawn(async move {
        if let Err(e) = ws_client
            .connect_and_run(update_tx, ws_status_tx, ws_shutdown)
            .await
        {
            tracing::error!(error = %e, "WebSocket task ended");
        }
    });

    // Market-cap poll task
    let gecko = CoinGeckoRestClient::new(&config.coingecko.rest_base_url);
    let gecko_ids: Vec<String> = config
        .instruments
        .iter()
        .map(|inst| inst.gecko_id.clone())
        .collect();
    let gecko_tx = app_tx.clone();
    let mut gecko_shutdown = shutdown_rx.clone();
    let refresh = Duration::from_secs(config.coingecko.refresh_secs.max(30));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(refresh);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match gecko.market_caps(&gecko_ids).await {
                        Ok(caps) => {
                            let _ = gecko_tx.send(AppEvent::MarketCaps(caps)).await;
                        }
                        Err(e) => {
                            // Non-critical: retried on the next cycle.
                            tracing::warn!(error = %e, "Market cap refresh failed");
                        }
                    }
                }
                _ = gecko_shutdown.changed() => break,
            }
        }
    });

    // Ctrl+C handler
    let ctrl_c_shutdown = shutdown_tx.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        tracing::info!("Ctrl+C received");
        let _ = ctrl_c_shutdown.send(true);
    });

    // TUI main loop
    let mut terminal = ratatui::init();
    let hub = MarketHub::new(
        config.instruments.clone(),
        bucket_ms,
        config.dashboard.max_ticks,
        config.dashboard.max_candles,
    );
    let mut app_state = AppState::new(hub);
    app_state.push_log(format!(
        "coindeck started | {} instruments | {}",
        config.instruments.len(),
        config.dashboard.default_timeframe
    ));

    loop {
        // Draw
        terminal.draw(|frame| ui::render(frame, &app_state))?;

        // Handle input (non-blocking with timeout)
        if crossterm::event::poll(Duration::from_millis(config.ui.refresh_rate_ms))? {
            if let Event::Key(key) = crossterm::event::read()? {
                if matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q')) {
                    tracing::info!("User quit");
                    let _ = shutdown_tx.send(true);
                    break;
                }
                if let Some(cmd) = parse_main_command(&key.code) {
                    match cmd {
                        UiCommand::NextCard => app_state.select_next(),
                        UiCommand::PrevCard => app_state.select_prev(),
                        UiCommand::ChartLine => app_state.set_chart_mode(ChartMode::Line),
                        UiCommand::ChartCandle => app_state.set_chart_mode(ChartMode::Candle),
                        UiCommand::SwitchTimeframe(label) => match parse_interval_ms(label) {
                            Ok(ms) => app_state.switch_timeframe(label, ms),
                            Err(e) => app_state
                                .push_log(format!("[ERR] Invalid timeframe '{}': {}", label, e)),
                        },
                        UiCommand::ToggleFocus => app_state.focus_open = !app_state.focus_open,
                        UiCommand::CloseFocus => app_state.focus_open = false,
                    }
                }
            }
        }

        // Drain feed updates, then the low-rate event channel
        while let Ok(update) = update_rx.try_recv() {
            app_state.apply_update(&update);
        }
        while let Ok(evt) = app_rx.try_recv() {
            app_state.apply(evt);
        }

        // Check shutdown
        if *shutdown_rx.borrow() {
            break;
        }
    }

    ratatui::restore();
    tracing::info!("Shutdown complete");
    println!("Goodbye! Check coindeck.log for details.");
    Ok(())
}
