// hwmon-charts Library - Public API

// Re-export error types
pub mod error;
pub use error::{ChartError, Result};

// Module declarations
pub mod commands;
pub mod core;
pub mod ui;

// Re-export commonly used types
pub use core::config::MonitorConfig;
pub use core::panel::MonitorPanel;

// Initialize logging; RUST_LOG still wins over `level`
pub fn init_logging(level: log::LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_millis()
        .try_init();
}
