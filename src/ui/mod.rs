// UI and formatting module

pub mod formatters;
pub mod messages;
pub mod monitor_tui;

// Re-export commonly used items for cleaner imports
pub use formatters::{format_gpu_list, print_config, snapshot_json_line};
pub use messages::{success, warn};
