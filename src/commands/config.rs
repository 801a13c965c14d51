use crate::core::MonitorConfig;
use anyhow::{Context, Result};
use colored::Colorize;
use url::Url;

use crate::ui::print_config;

pub fn handle_config(matches: &clap::ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("show", _)) => show(),
        Some(("reset", _)) => reset(),
        Some(("set-url", sub_matches)) => set_url(sub_matches),
        _ => {
            println!("Use 'hwmon-charts config --help' for more information.");
            Ok(())
        }
    }
}

fn show() -> Result<()> {
    let config = MonitorConfig::load()?;
    print_config(&config);

    let path = MonitorConfig::get_config_path()?;
    println!();
    println!("{}", format!("Stored at {}", path.display()).dimmed());
    Ok(())
}

fn reset() -> Result<()> {
    MonitorConfig::default().save()?;
    println!("{}", "✓ Configuration reset to defaults".green());
    Ok(())
}

fn set_url(matches: &clap::ArgMatches) -> Result<()> {
    let url = matches
        .get_one::<String>("server-url")
        .context("URL argument is required")?;

    let parsed = Url::parse(url).with_context(|| format!("Invalid URL: {}", url))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        println!(
            "{}",
            format!("Server URL must start with http:// or https://, got '{}'", url).red()
        );
        println!("{}", "Example:".dimmed());
        println!("  {}", "hwmon-charts config set-url http://127.0.0.1:8188".dimmed());
        return Ok(());
    }

    let mut config = MonitorConfig::load()?;
    config.set_server_url(url.trim_end_matches('/').to_string());
    config.save()?;

    println!(
        "{} {}",
        "✓ Server URL set to:".green(),
        config.server_url.cyan().bold()
    );
    Ok(())
}
