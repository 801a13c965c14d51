//! Connection to the monitor server: HTTP settings endpoints and the
//! WebSocket telemetry feed.

pub mod api;
mod runtime;
pub mod stream;

pub use api::{GpuSettings, MonitorApi, MonitorSettings};
pub use runtime::TelemetryRuntime;
pub use stream::{new_client_id, parse_message, websocket_url, StreamEvent};
