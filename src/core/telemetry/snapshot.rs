use serde::{Deserialize, Serialize};

/// One telemetry tick as pushed by the monitor server.
///
/// Every numeric field is optional: the server reports `-1` (or omits the
/// field) when a sensor is switched off or unavailable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TelemetrySnapshot {
    pub cpu_utilization: Option<f64>,
    pub ram_total: Option<f64>,
    pub ram_used: Option<f64>,
    pub ram_used_percent: Option<f64>,
    pub hdd_total: Option<f64>,
    pub hdd_used: Option<f64>,
    pub hdd_used_percent: Option<f64>,
    pub device_type: Option<String>,
    pub gpus: Vec<GpuStatus>,
    /// MB/s
    pub vram_transfer_speed: Option<f64>,
    /// MB/s
    pub shared_gpu_transfer_speed: Option<f64>,
    pub shared_gpu_memory_used: Option<f64>,
    pub shared_gpu_memory_total: Option<f64>,
    pub shared_gpu_memory_percent: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GpuStatus {
    pub gpu_utilization: Option<f64>,
    pub gpu_temperature: Option<f64>,
    pub vram_total: Option<f64>,
    pub vram_used: Option<f64>,
    pub vram_used_percent: Option<f64>,
}

/// Entry of the GPU enumeration endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GpuInfo {
    pub index: usize,
    pub name: String,
}

impl TelemetrySnapshot {
    pub fn gpu(&self, index: usize) -> Option<&GpuStatus> {
        self.gpus.get(index)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}
