//! Telemetry snapshots and the metric catalog built on top of them.

pub mod catalog;
mod scaling;
mod snapshot;

pub use catalog::{MetricCatalog, MetricSource, ValueFormat, VisibilityKey, UNAVAILABLE};
pub use scaling::{CapacityState, ScaleUpdate, SPEED_HEADROOM};
pub use snapshot::{GpuInfo, GpuStatus, TelemetrySnapshot};
