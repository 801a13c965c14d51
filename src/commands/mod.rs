// Command handlers module
pub mod completions;
pub mod config;
pub mod server;
pub mod version;
pub mod watch;

use clap::ArgMatches;

use crate::core::MonitorConfig;

// Re-exports for cleaner imports
pub use version::execute as version;
pub use watch::execute as watch;

/// `--url` when given, else the configured server
pub fn server_url(matches: &ArgMatches, config: &MonitorConfig) -> String {
    matches
        .try_get_one::<String>("url")
        .ok()
        .flatten()
        .cloned()
        .unwrap_or_else(|| config.server_url.clone())
}
