use chrono::{DateTime, Utc};
use colored::*;
use serde_json::{Map, Value};

use crate::core::config::MonitorConfig;
use crate::core::telemetry::{GpuInfo, MetricCatalog, TelemetrySnapshot, VisibilityKey};

/// Format a GPU enumeration as an indexed list
pub fn format_gpu_list(gpus: &[GpuInfo]) -> String {
    if gpus.is_empty() {
        return "No GPUs reported by the server".to_string();
    }

    gpus.iter()
        .map(|gpu| format!("  [{}] {}", gpu.index, gpu.name))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One line of JSON per snapshot: timestamp plus every available metric value.
pub fn snapshot_json_line(
    catalog: &MetricCatalog,
    snapshot: &TelemetrySnapshot,
    at: DateTime<Utc>,
) -> String {
    let mut metrics = Map::new();
    for (id, value) in catalog.extract_all(snapshot) {
        if value >= 0.0 {
            metrics.insert(id.to_string(), Value::from(value));
        }
    }

    let mut line = Map::new();
    line.insert("time".to_string(), Value::from(at.to_rfc3339()));
    line.insert("metrics".to_string(), Value::Object(metrics));
    Value::Object(line).to_string()
}

fn on_off(value: bool) -> ColoredString {
    if value {
        "on".green()
    } else {
        "off".dimmed()
    }
}

/// Print the stored configuration
pub fn print_config(config: &MonitorConfig) {
    println!("{}", "Monitor configuration".bold().bright_cyan());
    println!("{}", "=".repeat(40));
    println!("  {:<18} {}", "Server URL:", config.server_url.white());
    println!("  {:<18} {}s", "Refresh rate:", config.refresh_rate);
    println!("  {:<18} {}", "Panel enabled:", on_off(config.enabled));
    match config.pixel_ratio {
        Some(ratio) => println!("  {:<18} {}", "Pixel ratio:", ratio),
        None => println!("  {:<18} {}", "Pixel ratio:", "auto".dimmed()),
    }

    println!();
    println!("{}", "Visible charts".bold());
    for key in VisibilityKey::ALL {
        println!(
            "  {:<18} {}",
            format!("{}:", key.label()),
            on_off(config.visibility.is_visible(key))
        );
    }
}
