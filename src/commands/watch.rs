//! Live chart command handler.
//!
//! Streams telemetry into the chart panel and shows it in a TUI dashboard.

use anyhow::{Context, Result};
use clap::ArgMatches;

use crate::core::client::{new_client_id, websocket_url, MonitorApi, StreamEvent, TelemetryRuntime};
use crate::core::config::MonitorConfig;
use crate::core::telemetry::MetricCatalog;
use crate::ui::monitor_tui::{run_watch_app, WatchConfig};
use crate::ui::snapshot_json_line;

use super::server_url;

/// Execute the watch command
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let mut config = MonitorConfig::load()?;
    let server_url = server_url(matches, &config);
    let gpu_count = matches.get_one::<usize>("gpus").copied();

    // Handle JSON output mode (non-TUI)
    if matches.get_flag("json") {
        return run_json_output(&server_url, gpu_count);
    }

    let pixel_ratio = matches
        .get_one::<f64>("pixel-ratio")
        .copied()
        .or(config.pixel_ratio)
        .unwrap_or(1.0);

    let watch_config = WatchConfig {
        server_url,
        pixel_ratio,
        gpu_count,
        enabled: config.enabled,
        visibility: config.visibility.clone(),
    };

    let visibility = run_watch_app(watch_config).context("Failed to run chart monitor")?;

    // Keep toggles made in the TUI for next time
    if visibility != config.visibility {
        config.visibility = visibility;
        config.save().context("Failed to save visibility settings")?;
    }

    Ok(())
}

/// Run in JSON output mode (for scripting)
fn run_json_output(server_url: &str, gpu_count: Option<usize>) -> Result<()> {
    let mut runtime = TelemetryRuntime::new().context("Failed to start async runtime")?;
    let api = MonitorApi::new(server_url).context("Invalid server URL")?;

    let gpu_count = match gpu_count {
        Some(count) => count,
        None => runtime.block_on(api.gpu_count()),
    };
    let catalog = MetricCatalog::new(gpu_count);

    let ws_url = websocket_url(server_url, &new_client_id()).context("Invalid server URL")?;
    runtime.connect(ws_url);

    // Ctrl+C stops the stream so the loop below drains and exits
    let stop = runtime.stop_handle();
    ctrlc::set_handler(move || {
        let _ = stop.send(());
    })
    .map_err(|e| anyhow::anyhow!("Failed to set Ctrl+C handler: {}", e))?;

    while let Some(event) = runtime.next_event() {
        match event {
            StreamEvent::Snapshot(snapshot) => {
                println!(
                    "{}",
                    snapshot_json_line(&catalog, &snapshot, chrono::Utc::now())
                );
            }
            StreamEvent::Connected => log::info!("Receiving telemetry"),
            StreamEvent::Disconnected(reason) => log::debug!("Stream dropped: {}", reason),
        }
    }

    runtime.shutdown();
    Ok(())
}
