//! Declarative list of charted metrics.
//!
//! The catalog decides which charts exist for a detected GPU count, how each
//! one reads its value out of a [`TelemetrySnapshot`], and how that value is
//! shown as text.

use serde::{Deserialize, Serialize};

use super::snapshot::TelemetrySnapshot;
use crate::core::charts::ChartDefinition;

/// Value meaning "no data this tick".
pub const UNAVAILABLE: f64 = -1.0;

pub const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;
pub const MB_PER_GB: f64 = 1024.0;

/// User-facing visibility category. Several charts may share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VisibilityKey {
    Cpu,
    Ram,
    GpuUsage,
    GpuTemp,
    Vram,
    VramSpeed,
    SharedGpuSpeed,
    SharedGpuMem,
}

impl VisibilityKey {
    pub const ALL: [VisibilityKey; 8] = [
        VisibilityKey::Cpu,
        VisibilityKey::Ram,
        VisibilityKey::GpuUsage,
        VisibilityKey::GpuTemp,
        VisibilityKey::Vram,
        VisibilityKey::VramSpeed,
        VisibilityKey::SharedGpuSpeed,
        VisibilityKey::SharedGpuMem,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VisibilityKey::Cpu => "cpu",
            VisibilityKey::Ram => "ram",
            VisibilityKey::GpuUsage => "gpuUsage",
            VisibilityKey::GpuTemp => "gpuTemp",
            VisibilityKey::Vram => "vram",
            VisibilityKey::VramSpeed => "vramSpeed",
            VisibilityKey::SharedGpuSpeed => "sharedGpuSpeed",
            VisibilityKey::SharedGpuMem => "sharedGpuMem",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VisibilityKey::Cpu => "CPU",
            VisibilityKey::Ram => "RAM",
            VisibilityKey::GpuUsage => "GPU usage",
            VisibilityKey::GpuTemp => "GPU temperature",
            VisibilityKey::Vram => "VRAM",
            VisibilityKey::VramSpeed => "VRAM speed",
            VisibilityKey::SharedGpuSpeed => "Shared GPU speed",
            VisibilityKey::SharedGpuMem => "Shared GPU memory",
        }
    }
}

/// How a value is rendered as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFormat {
    Percent,
    Celsius,
    Gigabytes,
    GigabytesPerSecond,
}

impl ValueFormat {
    pub fn unit(&self) -> &'static str {
        match self {
            ValueFormat::Percent => "%",
            ValueFormat::Celsius => "°C",
            ValueFormat::Gigabytes => "GB",
            ValueFormat::GigabytesPerSecond => "GB/s",
        }
    }

    pub fn format(&self, value: f64) -> String {
        match self {
            ValueFormat::Percent => format!("{:.0}%", value),
            ValueFormat::Celsius => format!("{:.0}°C", value),
            ValueFormat::Gigabytes => format!("{:.1} GB", value),
            ValueFormat::GigabytesPerSecond => format!("{:.2} GB/s", value),
        }
    }
}

/// Where in a snapshot a metric comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricSource {
    CpuUtilization,
    RamUsedGb,
    GpuUtilization(usize),
    GpuTemperature(usize),
    VramUsedPercent(usize),
    VramUsedGb(usize),
    VramTransferSpeed,
    SharedGpuTransferSpeed,
    SharedGpuMemoryPercent,
    SharedGpuMemoryUsedGb,
}

impl MetricSource {
    pub fn format(&self) -> ValueFormat {
        match self {
            MetricSource::CpuUtilization
            | MetricSource::GpuUtilization(_)
            | MetricSource::VramUsedPercent(_)
            | MetricSource::SharedGpuMemoryPercent => ValueFormat::Percent,
            MetricSource::GpuTemperature(_) => ValueFormat::Celsius,
            MetricSource::RamUsedGb
            | MetricSource::VramUsedGb(_)
            | MetricSource::SharedGpuMemoryUsedGb => ValueFormat::Gigabytes,
            MetricSource::VramTransferSpeed | MetricSource::SharedGpuTransferSpeed => {
                ValueFormat::GigabytesPerSecond
            }
        }
    }

    pub fn visibility(&self) -> VisibilityKey {
        match self {
            MetricSource::CpuUtilization => VisibilityKey::Cpu,
            MetricSource::RamUsedGb => VisibilityKey::Ram,
            MetricSource::GpuUtilization(_) => VisibilityKey::GpuUsage,
            MetricSource::GpuTemperature(_) => VisibilityKey::GpuTemp,
            MetricSource::VramUsedPercent(_) | MetricSource::VramUsedGb(_) => VisibilityKey::Vram,
            MetricSource::VramTransferSpeed => VisibilityKey::VramSpeed,
            MetricSource::SharedGpuTransferSpeed => VisibilityKey::SharedGpuSpeed,
            MetricSource::SharedGpuMemoryPercent | MetricSource::SharedGpuMemoryUsedGb => {
                VisibilityKey::SharedGpuMem
            }
        }
    }

    /// Read this metric from `snapshot`, or [`UNAVAILABLE`].
    pub fn extract(&self, snapshot: &TelemetrySnapshot) -> f64 {
        match *self {
            MetricSource::CpuUtilization => reading(snapshot.cpu_utilization),
            MetricSource::RamUsedGb => gigabytes(snapshot.ram_used),
            MetricSource::GpuUtilization(i) => {
                reading(snapshot.gpu(i).and_then(|g| g.gpu_utilization))
            }
            MetricSource::GpuTemperature(i) => {
                reading(snapshot.gpu(i).and_then(|g| g.gpu_temperature))
            }
            MetricSource::VramUsedPercent(i) => {
                reading(snapshot.gpu(i).and_then(|g| g.vram_used_percent))
            }
            MetricSource::VramUsedGb(i) => gigabytes(snapshot.gpu(i).and_then(|g| g.vram_used)),
            MetricSource::VramTransferSpeed => gb_per_second(snapshot.vram_transfer_speed),
            MetricSource::SharedGpuTransferSpeed => {
                gb_per_second(snapshot.shared_gpu_transfer_speed)
            }
            MetricSource::SharedGpuMemoryPercent => reading(snapshot.shared_gpu_memory_percent),
            MetricSource::SharedGpuMemoryUsedGb => gigabytes(snapshot.shared_gpu_memory_used),
        }
    }
}

/// Percentages and temperatures: 0 is a real reading, negatives are not.
fn reading(raw: Option<f64>) -> f64 {
    match raw {
        Some(v) if v >= 0.0 && v.is_finite() => v,
        _ => UNAVAILABLE,
    }
}

/// Byte counts: a zero total or usage is treated as "not reported".
fn gigabytes(raw: Option<f64>) -> f64 {
    match raw {
        Some(v) if v > 0.0 && v.is_finite() => v / BYTES_PER_GB,
        _ => UNAVAILABLE,
    }
}

fn gb_per_second(mb_per_second: Option<f64>) -> f64 {
    match mb_per_second {
        Some(v) if v > 0.0 && v.is_finite() => v / MB_PER_GB,
        _ => UNAVAILABLE,
    }
}

/// Ordered chart definitions for one GPU count.
#[derive(Debug, Clone)]
pub struct MetricCatalog {
    gpu_count: usize,
    definitions: Vec<ChartDefinition>,
}

pub const CPU_ID: &str = "cpu";
pub const RAM_ID: &str = "ram";
pub const VRAM_SPEED_ID: &str = "vram-speed";
pub const SHARED_GPU_SPEED_ID: &str = "shared-gpu-speed";
pub const SHARED_GPU_PERCENT_ID: &str = "shared-gpu-percent";
pub const SHARED_GPU_USED_ID: &str = "shared-gpu-used";

pub fn gpu_usage_id(index: usize) -> String {
    format!("gpu-usage-{}", index)
}

pub fn gpu_temp_id(index: usize) -> String {
    format!("gpu-temp-{}", index)
}

pub fn vram_percent_id(index: usize) -> String {
    format!("vram-percent-{}", index)
}

pub fn vram_used_id(index: usize) -> String {
    format!("vram-used-{}", index)
}

impl MetricCatalog {
    pub fn new(gpu_count: usize) -> Self {
        let mut definitions = vec![
            ChartDefinition::new(CPU_ID, "CPU Usage", "#0AA015", MetricSource::CpuUtilization)
                .with_range(0.0, 100.0),
            ChartDefinition::new(RAM_ID, "RAM Used", "#07630D", MetricSource::RamUsedGb),
        ];

        for index in 0..gpu_count {
            let title = |base: &str| {
                if gpu_count > 1 {
                    format!("{} {}", base, index)
                } else {
                    base.to_string()
                }
            };

            definitions.push(
                ChartDefinition::new(
                    gpu_usage_id(index),
                    title("GPU Usage"),
                    "#0C86F4",
                    MetricSource::GpuUtilization(index),
                )
                .with_range(0.0, 100.0),
            );
            // Fixed ceiling: readings above 100°C are clipped
            definitions.push(
                ChartDefinition::new(
                    gpu_temp_id(index),
                    title("GPU Temp"),
                    "#F44336",
                    MetricSource::GpuTemperature(index),
                )
                .with_range(0.0, 100.0),
            );
            definitions.push(
                ChartDefinition::new(
                    vram_percent_id(index),
                    title("VRAM Usage"),
                    "#176EC7",
                    MetricSource::VramUsedPercent(index),
                )
                .with_range(0.0, 100.0),
            );
            definitions.push(ChartDefinition::new(
                vram_used_id(index),
                title("VRAM Used"),
                "#45A3FF",
                MetricSource::VramUsedGb(index),
            ));
        }

        definitions.extend([
            ChartDefinition::new(
                VRAM_SPEED_ID,
                "VRAM Speed",
                "#FF9800",
                MetricSource::VramTransferSpeed,
            ),
            ChartDefinition::new(
                SHARED_GPU_SPEED_ID,
                "Shared GPU Speed",
                "#FFC107",
                MetricSource::SharedGpuTransferSpeed,
            ),
            ChartDefinition::new(
                SHARED_GPU_PERCENT_ID,
                "Shared GPU Memory",
                "#9C27B0",
                MetricSource::SharedGpuMemoryPercent,
            )
            .with_range(0.0, 100.0),
            ChartDefinition::new(
                SHARED_GPU_USED_ID,
                "Shared GPU Used",
                "#BA68C8",
                MetricSource::SharedGpuMemoryUsedGb,
            ),
        ]);

        Self {
            gpu_count,
            definitions,
        }
    }

    pub fn gpu_count(&self) -> usize {
        self.gpu_count
    }

    pub fn definitions(&self) -> &[ChartDefinition] {
        &self.definitions
    }

    pub fn definition(&self, id: &str) -> Option<&ChartDefinition> {
        self.definitions.iter().find(|d| d.id == id)
    }

    /// Extracted value per chart, in catalog order.
    pub fn extract_all<'a>(
        &'a self,
        snapshot: &'a TelemetrySnapshot,
    ) -> impl Iterator<Item = (&'a str, f64)> + 'a {
        self.definitions
            .iter()
            .map(move |d| (d.id.as_str(), d.source.extract(snapshot)))
    }

    pub fn ids_for(&self, key: VisibilityKey) -> impl Iterator<Item = &str> {
        self.definitions
            .iter()
            .filter(move |d| d.visibility == key)
            .map(|d| d.id.as_str())
    }
}
