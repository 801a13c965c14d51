//! Runtime axis corrections driven by discovered capacities and speeds.

use std::collections::BTreeMap;

use super::catalog::{
    vram_used_id, MetricCatalog, MetricSource, BYTES_PER_GB, RAM_ID, SHARED_GPU_SPEED_ID,
    SHARED_GPU_USED_ID, VRAM_SPEED_ID,
};
use super::snapshot::TelemetrySnapshot;

/// Headroom applied when a transfer speed exceeds its ceiling.
pub const SPEED_HEADROOM: f64 = 1.2;

/// Axis change to push into the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleUpdate {
    pub id: String,
    pub y_max: f64,
    /// New title, when the capacity becomes part of the label
    pub title: Option<String>,
}

/// Discovered totals (locked in once) and speed ceilings (only ever raised).
#[derive(Debug, Clone, Default)]
pub struct CapacityState {
    ram_total_gb: Option<f64>,
    vram_total_gb: BTreeMap<usize, f64>,
    shared_total_gb: Option<f64>,
    vram_speed_ceiling: f64,
    shared_speed_ceiling: f64,
}

impl CapacityState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect a snapshot and return the axis updates it triggers.
    pub fn observe(
        &mut self,
        catalog: &MetricCatalog,
        snapshot: &TelemetrySnapshot,
    ) -> Vec<ScaleUpdate> {
        let mut updates = Vec::new();

        if self.ram_total_gb.is_none() {
            if let Some(gb) = total_gb(snapshot.ram_total) {
                self.ram_total_gb = Some(gb);
                updates.push(capacity_update(catalog, RAM_ID, gb));
            }
        }

        for index in 0..catalog.gpu_count() {
            if self.vram_total_gb.contains_key(&index) {
                continue;
            }
            if let Some(gb) = total_gb(snapshot.gpu(index).and_then(|g| g.vram_total)) {
                self.vram_total_gb.insert(index, gb);
                updates.push(capacity_update(catalog, &vram_used_id(index), gb));
            }
        }

        if self.shared_total_gb.is_none() {
            if let Some(gb) = total_gb(snapshot.shared_gpu_memory_total) {
                self.shared_total_gb = Some(gb);
                updates.push(capacity_update(catalog, SHARED_GPU_USED_ID, gb));
            }
        }

        let vram_speed = MetricSource::VramTransferSpeed.extract(snapshot);
        if let Some(y_max) = raise_ceiling(&mut self.vram_speed_ceiling, vram_speed) {
            updates.push(ScaleUpdate {
                id: VRAM_SPEED_ID.to_string(),
                y_max,
                title: None,
            });
        }

        let shared_speed = MetricSource::SharedGpuTransferSpeed.extract(snapshot);
        if let Some(y_max) = raise_ceiling(&mut self.shared_speed_ceiling, shared_speed) {
            updates.push(ScaleUpdate {
                id: SHARED_GPU_SPEED_ID.to_string(),
                y_max,
                title: None,
            });
        }

        updates
    }

    pub fn ram_total_gb(&self) -> Option<f64> {
        self.ram_total_gb
    }

    pub fn vram_total_gb(&self, index: usize) -> Option<f64> {
        self.vram_total_gb.get(&index).copied()
    }

    pub fn shared_total_gb(&self) -> Option<f64> {
        self.shared_total_gb
    }

    /// Current VRAM transfer speed ceiling in GB/s (0 until first reading).
    pub fn vram_speed_ceiling(&self) -> f64 {
        self.vram_speed_ceiling
    }

    pub fn shared_speed_ceiling(&self) -> f64 {
        self.shared_speed_ceiling
    }
}

fn total_gb(bytes: Option<f64>) -> Option<f64> {
    bytes
        .filter(|b| *b > 0.0 && b.is_finite())
        .map(|b| b / BYTES_PER_GB)
}

fn capacity_update(catalog: &MetricCatalog, id: &str, gb: f64) -> ScaleUpdate {
    let base = catalog.definition(id).map_or(id, |d| d.title.as_str());
    ScaleUpdate {
        id: id.to_string(),
        y_max: gb,
        title: Some(format!("{} ({:.1} GB)", base, gb)),
    }
}

fn raise_ceiling(ceiling: &mut f64, observed: f64) -> Option<f64> {
    if observed > *ceiling {
        *ceiling = observed * SPEED_HEADROOM;
        Some(*ceiling)
    } else {
        None
    }
}
