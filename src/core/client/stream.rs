//! WebSocket telemetry feed.

use futures_util::StreamExt;
use serde::Deserialize;
use tokio::sync::{broadcast, mpsc};
use tokio::time::Duration;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use url::Url;

use crate::core::telemetry::TelemetrySnapshot;
use crate::error::{ChartError, Result};

pub const MONITOR_MESSAGE_TYPE: &str = "crystools.monitor";

const MAX_BACKOFF_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Connected,
    Snapshot(TelemetrySnapshot),
    Disconnected(String),
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: serde_json::Value,
}

/// `ws(s)://host[/base]/ws?clientId=..` for an http(s) server URL.
pub fn websocket_url(server_url: &str, client_id: &str) -> Result<Url> {
    let mut url = Url::parse(server_url)?;
    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => {
            return Err(ChartError::config(format!(
                "Unsupported server scheme '{}'",
                other
            )))
        }
    };
    url.set_scheme(scheme)
        .map_err(|_| ChartError::config("Could not switch URL scheme to WebSocket"))?;

    let path = format!("{}/ws", url.path().trim_end_matches('/'));
    url.set_path(&path);
    url.query_pairs_mut()
        .clear()
        .append_pair("clientId", client_id);
    Ok(url)
}

/// Identifier the server uses to address this client.
pub fn new_client_id() -> String {
    format!(
        "hwmon-{:x}-{:x}",
        chrono::Utc::now().timestamp_millis(),
        std::process::id()
    )
}

/// Snapshot carried by a monitor message; `None` for every other message type.
pub fn parse_message(text: &str) -> Result<Option<TelemetrySnapshot>> {
    let envelope: Envelope = serde_json::from_str(text)?;
    if envelope.kind != MONITOR_MESSAGE_TYPE {
        return Ok(None);
    }
    Ok(Some(serde_json::from_value(envelope.data)?))
}

/// Read frames until the socket closes or shutdown fires.
///
/// Returns `Ok(true)` when shutdown was requested.
async fn read_session(
    url: &Url,
    events: &mpsc::Sender<StreamEvent>,
    shutdown: &mut broadcast::Receiver<()>,
) -> Result<bool> {
    let (mut ws, _) = tokio::select! {
        conn = connect_async(url.as_str()) => conn?,
        _ = shutdown.recv() => return Ok(true),
    };
    log::info!("Connected to {}", url);
    if events.send(StreamEvent::Connected).await.is_err() {
        return Ok(true);
    }

    loop {
        tokio::select! {
            msg = ws.next() => {
                let Some(msg) = msg else {
                    return Ok(false);
                };
                match msg? {
                    Message::Text(text) => match parse_message(&text) {
                        Ok(Some(snapshot)) => {
                            if events.send(StreamEvent::Snapshot(snapshot)).await.is_err() {
                                return Ok(true);
                            }
                        }
                        Ok(None) => log::trace!("Ignoring non-monitor message"),
                        Err(e) => log::debug!("Skipping malformed frame: {}", e),
                    },
                    Message::Close(_) => return Ok(false),
                    _ => {}
                }
            }
            _ = shutdown.recv() => return Ok(true),
        }
    }
}

/// Keep a session open, reconnecting with exponential backoff.
pub async fn stream_task(
    url: Url,
    events: mpsc::Sender<StreamEvent>,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut failures: u32 = 0;

    loop {
        let reason = match read_session(&url, &events, &mut shutdown).await {
            Ok(true) => break,
            Ok(false) => {
                failures = 0;
                "connection closed".to_string()
            }
            Err(e) => {
                failures += 1;
                e.to_string()
            }
        };

        log::warn!("Telemetry stream lost: {}", reason);
        if events.send(StreamEvent::Disconnected(reason)).await.is_err() {
            break;
        }

        let backoff = Duration::from_secs(2u64.pow(failures.min(5)).min(MAX_BACKOFF_SECS));
        tokio::select! {
            _ = tokio::time::sleep(backoff) => {}
            _ = shutdown.recv() => break,
        }
    }

    log::debug!("Telemetry stream task stopped");
}
