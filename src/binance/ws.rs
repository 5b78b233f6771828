use anyhow::{Context, Result};
use futures_util::StreamExt;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite;

use super::types::CombinedStreamMessage;
use crate::error::AppError;
use crate::event::{AppEvent, WsConnectionStatus};
use crate::market::hub::FeedUpdate;
use crate::model::instrument::Instrument;

/// Exponential backoff for reconnection.
struct ExponentialBackoff {
    current: Duration,
    initial: Duration,
    max: Duration,
    factor: f64,
}

impl ExponentialBackoff {
    fn new(initial: Duration, max: Duration, factor: f64) -> Self {
        Self {
            current: initial,
            initial,
            max,
            factor,
        }
    }

    fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = Duration::from_secs_f64(
            (self.current.as_secs_f64() * self.factor).min(self.max.as_secs_f64()),
        );
        delay
    }

    fn reset(&mut self) {
        self.current = self.initial;
    }
}

pub struct BinanceWsClient {
    url: String,
}

impl BinanceWsClient {
    /// Combined miniTicker stream covering every tracked instrument.
    pub fn new(ws_base_url: &str, instruments: &[Instrument]) -> Self {
        let streams: Vec<String> = instruments
            .iter()
            .map(|inst| format!("{}@miniTicker", inst.symbol))
            .collect();
        Self {
            url: format!("{}/stream?streams={}", ws_base_url, streams.join("/")),
        }
    }

    /// Connect and run the WebSocket loop with automatic reconnection.
    /// Sends WsStatus events through `status_tx` and updates through
    /// `update_tx`. Series state is never reset on reconnect: a gap in the
    /// feed simply produces no candles for the missed interval.
    pub async fn connect_and_run(
        &self,
        update_tx: mpsc::Sender<FeedUpdate>,
        status_tx: mpsc::Sender<AppEvent>,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<()> {
        let mut backoff =
            ExponentialBackoff::new(Duration::from_secs(1), Duration::from_secs(60), 2.0);
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            match self
                .connect_once(&update_tx, &status_tx, &mut shutdown, &mut backoff)
                .await
            {
                Ok(()) => {
                    // Clean shutdown requested
                    let _ = status_tx
                        .send(AppEvent::WsStatus(WsConnectionStatus::Disconnected))
                        .await;
                    break;
                }
                Err(e) => {
                    let _ = status_tx
                        .send(AppEvent::WsStatus(WsConnectionStatus::Disconnected))
                        .await;
                    let _ = status_tx
                        .send(AppEvent::LogMessage(format!("WS error: {}", e)))
                        .await;

                    let delay = backoff.next_delay();
                    let _ = status_tx
                        .send(AppEvent::WsStatus(WsConnectionStatus::Reconnecting {
                            attempt,
                            delay_ms: delay.as_millis() as u64,
                        }))
                        .await;

                    tokio::select! {
                        _ = tokio::time::sleep(delay) => continue,
                        _ = shutdown.changed() => {
                            let _ = status_tx
                                .send(AppEvent::LogMessage("Shutdown during reconnect".to_string()))
                                .await;
                            break;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    async fn connect_once(
        &self,
        update_tx: &mpsc::Sender<FeedUpdate>,
        status_tx: &mpsc::Sender<AppEvent>,
        shutdown: &mut watch::Receiver<bool>,
        backoff: &mut ExponentialBackoff,
    ) -> Result<()> {
        let _ = status_tx
            .send(AppEvent::LogMessage(format!("Connecting to {}", self.url)))
            .await;

        let (ws_stream, _resp) = tokio_tungstenite::connect_async(&self.url)
            .await
            .context("WebSocket connect failed")?;

        // Send Connected AFTER successful connection, and only then reset
        // the backoff so a flapping endpoint keeps its growing delay.
        backoff.reset();
        let _ = status_tx
            .send(AppEvent::WsStatus(WsConnectionStatus::Connected))
            .await;
        let _ = status_tx
            .send(AppEvent::LogMessage("WebSocket connected".to_string()))
            .await;

        let (_write, mut read) = ws_stream.split();

        loop {
            tokio::select! {
                msg = read.next() => {
                    match msg {
                        Some(Ok(tungstenite::Message::Text(text))) => {
                            match serde_json::from_str::<CombinedStreamMessage>(&text) {
                                Ok(msg) => {
                                    if update_tx.try_send(msg.data.into_update()).is_err() {
                                        tracing::warn!("Update channel full, dropping ticker frame");
                                    }
                                }
                                Err(e) => {
                                    tracing::debug!(error = %e, "Failed to parse WS message");
                                }
                            }
                        }
                        Some(Ok(tungstenite::Message::Ping(_))) => {
                            // tokio-tungstenite handles pong automatically
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            return Err(AppError::WebSocket(format!("read error: {}", e)).into());
                        }
                        None => {
                            return Err(AppError::WebSocket("stream ended".to_string()).into());
                        }
                    }
                }
                _ = shutdown.changed() => {
                    return Ok(());
                }
            }
        }
    }
}
