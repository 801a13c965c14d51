//! Terminal User Interface for live telemetry charts.
//!
//! Charts record their frames into surfaces that ratatui paints as braille canvases.

mod app;
mod event_handler;
mod render;
mod widgets;

pub use app::{run_watch_app, ServerRequest, WatchApp, WatchConfig};
pub use event_handler::MonitorEvent;
pub use widgets::{ChartCell, TerminalContainer};
