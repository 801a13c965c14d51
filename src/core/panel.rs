//! The monitor panel: one catalog, its charts, and the state that drives them.

use std::collections::HashMap;
use std::sync::Arc;

use crate::core::charts::{ChartContainer, ChartDefinition, ChartRegistry};
use crate::core::clock::Clock;
use crate::core::config::VisibilitySettings;
use crate::core::telemetry::{CapacityState, MetricCatalog, TelemetrySnapshot, VisibilityKey};
use crate::error::Result;

pub struct MonitorPanel {
    catalog: MetricCatalog,
    capacity: CapacityState,
    registry: ChartRegistry,
    visibility: VisibilitySettings,
    enabled: bool,
    /// Last text shown per chart id; untouched by unavailable readings
    display: HashMap<String, String>,
}

impl MonitorPanel {
    pub fn new(clock: Arc<dyn Clock>, visibility: VisibilitySettings) -> Self {
        Self {
            catalog: MetricCatalog::new(0),
            capacity: CapacityState::new(),
            registry: ChartRegistry::new(clock),
            visibility,
            enabled: true,
            display: HashMap::new(),
        }
    }

    /// Rebuild the catalog for `gpu_count` GPUs and attach every chart.
    ///
    /// Hidden categories are attached too so their history keeps filling.
    pub fn initialize<F>(&mut self, gpu_count: usize, mut container_for: F) -> Result<()>
    where
        F: FnMut(&ChartDefinition) -> Box<dyn ChartContainer>,
    {
        self.registry.destroy_all();
        self.display.clear();
        self.capacity = CapacityState::new();
        self.catalog = MetricCatalog::new(gpu_count);

        for definition in self.catalog.definitions() {
            let container = container_for(definition);
            if let Err(e) = self.registry.create_chart(definition.clone(), container) {
                // Leave an empty panel rather than a partial one
                self.registry.destroy_all();
                return Err(e);
            }
        }

        log::info!(
            "Initialized {} charts for {} GPU(s)",
            self.registry.len(),
            gpu_count
        );
        Ok(())
    }

    /// Route one snapshot: axis corrections first, then values.
    pub fn handle_snapshot(&mut self, snapshot: &TelemetrySnapshot) {
        if !self.enabled {
            log::trace!("Panel disabled, dropping snapshot");
            return;
        }

        for update in self.capacity.observe(&self.catalog, snapshot) {
            log::debug!("Rescaling '{}' to {:.3}", update.id, update.y_max);
            self.registry.update_chart_y_max(&update.id, update.y_max);
            if let Some(title) = &update.title {
                self.registry.update_chart_title(&update.id, title);
            }
        }

        for definition in self.catalog.definitions() {
            let value = definition.source.extract(snapshot);
            self.registry.update_data(&definition.id, value);
            if value >= 0.0 {
                self.display
                    .insert(definition.id.clone(), definition.format.format(value));
            }
        }
    }

    pub fn display_value(&self, id: &str) -> Option<&str> {
        self.display.get(id).map(String::as_str)
    }

    /// Live title, including any capacity discovered so far
    pub fn title(&self, id: &str) -> Option<&str> {
        self.registry
            .chart(id)
            .map(|chart| chart.definition().title.as_str())
    }

    /// Definitions of the charts currently shown, in catalog order.
    pub fn visible_definitions(&self) -> Vec<&ChartDefinition> {
        self.catalog
            .definitions()
            .iter()
            .filter(|d| self.visibility.is_visible(d.visibility))
            .filter_map(|d| self.registry.chart(&d.id).map(|chart| chart.definition()))
            .collect()
    }

    pub fn set_visibility(&mut self, key: VisibilityKey, visible: bool) {
        self.visibility.set(key, visible);
    }

    pub fn toggle_visibility(&mut self, key: VisibilityKey) -> bool {
        self.visibility.toggle(key)
    }

    pub fn is_visible(&self, key: VisibilityKey) -> bool {
        self.visibility.is_visible(key)
    }

    pub fn visibility(&self) -> &VisibilitySettings {
        &self.visibility
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn resize(&mut self, id: &str) {
        self.registry.resize(id);
    }

    pub fn resize_all(&mut self) {
        self.registry.resize_all();
    }

    /// Drop history and shown values; axis corrections are kept.
    pub fn clear(&mut self) {
        self.registry.clear_all_buffers();
        self.display.clear();
    }

    pub fn catalog(&self) -> &MetricCatalog {
        &self.catalog
    }

    pub fn capacity(&self) -> &CapacityState {
        &self.capacity
    }

    pub fn registry(&self) -> &ChartRegistry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::charts::{DrawCommand, Size, StaticContainer};
    use crate::core::clock::ManualClock;
    use crate::core::telemetry::GpuStatus;
    use crate::error::ChartError;

    fn panel(gpu_count: usize) -> (Arc<ManualClock>, MonitorPanel, HashMap<String, StaticContainer>) {
        let clock = Arc::new(ManualClock::new(1_000.0));
        let mut panel = MonitorPanel::new(clock.clone(), VisibilitySettings::default());
        let mut containers = HashMap::new();
        panel
            .initialize(gpu_count, |definition| {
                let container = StaticContainer::new(Size::new(200.0, 80.0), 1.0);
                containers.insert(definition.id.clone(), container.clone());
                Box::new(container)
            })
            .unwrap();
        (clock, panel, containers)
    }

    fn scenario() -> TelemetrySnapshot {
        TelemetrySnapshot {
            cpu_utilization: Some(42.0),
            ram_used: Some(8_000_000_000.0),
            ram_total: Some(16_000_000_000.0),
            gpus: vec![GpuStatus {
                gpu_utilization: Some(77.0),
                gpu_temperature: Some(65.0),
                vram_used: Some(4_000_000_000.0),
                vram_used_percent: Some(50.0),
                vram_total: Some(8_000_000_000.0),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_failed_initialize_leaves_no_charts() {
        let (_, mut panel, _) = panel(1);
        let mut attached = Vec::new();

        let result = panel.initialize(2, |definition| {
            if definition.id.starts_with("vram") {
                Box::new(StaticContainer::without_surface(Size::new(200.0, 80.0)))
            } else {
                let container = StaticContainer::new(Size::new(200.0, 80.0), 1.0);
                attached.push(container.clone());
                Box::new(container)
            }
        });

        assert!(matches!(result, Err(ChartError::SurfaceUnavailable(_))));
        assert!(panel.registry().is_empty());
        assert!(!attached.is_empty());
        for container in &attached {
            assert!(container.last_surface().unwrap().is_detached());
        }
    }

    #[test]
    fn test_end_to_end_single_gpu() {
        let (_, mut panel, containers) = panel(1);
        panel.handle_snapshot(&scenario());

        assert_eq!(panel.display_value("cpu"), Some("42%"));
        assert_eq!(panel.display_value("ram"), Some("7.5 GB"));
        assert_eq!(panel.display_value("gpu-usage-0"), Some("77%"));
        assert_eq!(panel.display_value("gpu-temp-0"), Some("65°C"));
        assert_eq!(panel.display_value("vram-percent-0"), Some("50%"));
        assert_eq!(panel.display_value("vram-used-0"), Some("3.7 GB"));
        assert_eq!(panel.display_value("vram-speed"), None);

        let ram = panel.registry().chart("ram").unwrap();
        assert_eq!(ram.buffer().len(), 1);
        assert!((ram.buffer().latest().unwrap() - 7.450580596923828).abs() < 1e-9);
        assert!((ram.definition().y_max.unwrap() - 14.901161193847656).abs() < 1e-9);
        assert_eq!(panel.title("ram"), Some("RAM Used (14.9 GB)"));
        assert_eq!(panel.registry().latest_value("cpu"), Some(42.0));

        // One value plots as a single circle
        let commands = containers["cpu"].last_surface().unwrap().commands();
        assert_eq!(
            commands
                .iter()
                .filter(|c| matches!(c, DrawCommand::FillCircle { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn test_unavailable_keeps_previous_text() {
        let (clock, mut panel, _) = panel(1);
        panel.handle_snapshot(&scenario());

        clock.advance(1.0);
        panel.handle_snapshot(&TelemetrySnapshot {
            cpu_utilization: Some(-1.0),
            ..Default::default()
        });

        assert_eq!(panel.display_value("cpu"), Some("42%"));
        assert_eq!(panel.registry().chart("cpu").unwrap().buffer().len(), 1);
    }

    #[test]
    fn test_hidden_category_keeps_history() {
        let (clock, mut panel, _) = panel(1);
        panel.set_visibility(VisibilityKey::Vram, false);
        panel.handle_snapshot(&scenario());
        clock.advance(1.0);
        panel.handle_snapshot(&scenario());

        let visible: Vec<&str> = panel
            .visible_definitions()
            .iter()
            .map(|d| d.id.as_str())
            .collect();
        assert!(!visible.contains(&"vram-percent-0"));
        assert!(!visible.contains(&"vram-used-0"));
        assert!(visible.contains(&"cpu"));

        assert!(panel.toggle_visibility(VisibilityKey::Vram));
        let chart = panel.registry().chart("vram-percent-0").unwrap();
        assert_eq!(chart.buffer().len(), 2);
    }

    #[test]
    fn test_disabled_panel_ignores_snapshots() {
        let (_, mut panel, _) = panel(0);
        panel.set_enabled(false);
        panel.handle_snapshot(&scenario());

        assert_eq!(panel.display_value("cpu"), None);
        assert_eq!(panel.capacity().ram_total_gb(), None);

        panel.set_enabled(true);
        panel.handle_snapshot(&scenario());
        assert_eq!(panel.display_value("cpu"), Some("42%"));
    }

    #[test]
    fn test_reinitialize_replaces_charts() {
        let (_, mut panel, containers) = panel(1);
        panel.handle_snapshot(&scenario());

        panel
            .initialize(2, |_| {
                Box::new(StaticContainer::new(Size::new(100.0, 40.0), 2.0))
            })
            .unwrap();

        assert!(containers["cpu"].last_surface().unwrap().is_detached());
        assert!(panel.registry().contains("gpu-usage-1"));
        assert_eq!(panel.title("gpu-usage-0"), Some("GPU Usage 0"));
        assert_eq!(panel.capacity().ram_total_gb(), None);
        assert_eq!(panel.display_value("cpu"), None);
    }

    #[test]
    fn test_clear_keeps_axis_corrections() {
        let (_, mut panel, _) = panel(1);
        panel.handle_snapshot(&scenario());
        panel.clear();

        assert_eq!(panel.registry().latest_value("cpu"), None);
        assert_eq!(panel.display_value("cpu"), None);
        assert_eq!(panel.title("ram"), Some("RAM Used (14.9 GB)"));
    }
}
