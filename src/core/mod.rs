// Charting engine and the telemetry plumbing that feeds it

pub mod charts;
pub mod client;
pub mod clock;
pub mod config;
pub mod panel;
pub mod telemetry;

// Re-export commonly used items
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{MonitorConfig, VisibilitySettings};
pub use panel::MonitorPanel;
