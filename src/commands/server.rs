//! One-shot requests against the monitor server.

use anyhow::{bail, Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use std::future::Future;

use crate::core::client::{GpuSettings, MonitorApi, MonitorSettings};
use crate::core::config::MonitorConfig;
use crate::ui::{format_gpu_list, success, warn};

use super::server_url;

fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    Ok(runtime.block_on(future))
}

fn api(matches: &ArgMatches, config: &MonitorConfig) -> Result<MonitorApi> {
    let url = server_url(matches, config);
    MonitorApi::new(&url).with_context(|| format!("Invalid server URL: {}", url))
}

/// List the GPUs the server reports
pub fn execute_gpus(matches: &ArgMatches) -> Result<()> {
    let config = MonitorConfig::load()?;
    let api = api(matches, &config)?;

    let gpus = block_on(api.fetch_gpus())?.context("Failed to fetch GPU list")?;

    println!("{}", "Detected GPUs".bold().bright_cyan());
    println!("{}", format_gpu_list(&gpus));
    Ok(())
}

/// Push refresh rate and collection switches
pub fn execute_settings(matches: &ArgMatches) -> Result<()> {
    let mut config = MonitorConfig::load()?;
    let api = api(matches, &config)?;

    let settings = MonitorSettings {
        rate: matches.get_one::<f64>("rate").copied(),
        switch_cpu: matches.get_one::<bool>("cpu").copied(),
        switch_ram: matches.get_one::<bool>("ram").copied(),
        switch_transfer_speed: matches.get_one::<bool>("transfer-speed").copied(),
        switch_shared_gpu_memory: matches.get_one::<bool>("shared-gpu-memory").copied(),
    };

    if settings.is_empty() {
        warn("Nothing to change. Pass at least one of --rate, --cpu, --ram, --transfer-speed, --shared-gpu-memory");
        return Ok(());
    }
    if let Some(rate) = settings.rate {
        if rate < 0.0 {
            bail!("Refresh rate must not be negative, got {}", rate);
        }
    }

    block_on(api.push_settings(&settings))?.context("Failed to push monitor settings")?;

    if let Some(rate) = settings.rate {
        config.refresh_rate = rate;
        config.save()?;
    }

    success("✓ Monitor settings updated");
    Ok(())
}

/// Push sensor switches for one GPU
pub fn execute_gpu(matches: &ArgMatches) -> Result<()> {
    let config = MonitorConfig::load()?;
    let api = api(matches, &config)?;

    let index = *matches
        .get_one::<usize>("index")
        .context("GPU index is required")?;
    let settings = GpuSettings {
        utilization: matches.get_one::<bool>("utilization").copied(),
        vram: matches.get_one::<bool>("vram").copied(),
        temperature: matches.get_one::<bool>("temperature").copied(),
    };

    if settings.is_empty() {
        warn("Nothing to change. Pass at least one of --utilization, --vram, --temperature");
        return Ok(());
    }

    block_on(api.push_gpu_settings(index, &settings))?
        .with_context(|| format!("Failed to update GPU {}", index))?;

    success(&format!("✓ GPU {} settings updated", index));
    Ok(())
}

/// Start or stop the server-side monitor
pub fn execute_switch(matches: &ArgMatches) -> Result<()> {
    let mut config = MonitorConfig::load()?;
    let api = api(matches, &config)?;

    let state = matches
        .get_one::<String>("state")
        .context("State argument is required")?;
    let on = match state.as_str() {
        "on" => true,
        "off" => false,
        other => bail!("Expected 'on' or 'off', got '{}'", other),
    };

    block_on(api.switch_monitor(on))?.context("Failed to switch monitor")?;

    config.enabled = on;
    config.save()?;

    success(&format!("✓ Monitor switched {}", state));
    Ok(())
}

/// Print the server's transfer speed measurement info
pub fn execute_transfer_info(matches: &ArgMatches) -> Result<()> {
    let config = MonitorConfig::load()?;
    let api = api(matches, &config)?;

    let info = block_on(api.transfer_speed_info())?
        .context("Failed to fetch transfer speed info")?;

    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}
