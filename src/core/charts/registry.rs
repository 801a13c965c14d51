//! Chart instances addressed by metric id.
//!
//! Every operation keyed by id is a silent no-op for unknown ids, so
//! late events for a chart that was just destroyed never fault.

use std::collections::HashMap;
use std::sync::Arc;

use super::buffer::RetentionBuffer;
use super::definition::ChartDefinition;
use super::renderer::Renderer;
use super::surface::ChartContainer;
use crate::core::clock::Clock;
use crate::error::Result;

/// A definition paired with its buffer and renderer.
pub struct Chart {
    definition: ChartDefinition,
    buffer: RetentionBuffer,
    renderer: Renderer,
}

impl Chart {
    pub fn new(
        definition: ChartDefinition,
        container: Box<dyn ChartContainer>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let renderer = Renderer::new(container, clock.clone())?;
        let mut chart = Self {
            definition,
            buffer: RetentionBuffer::new(clock),
            renderer,
        };
        chart.redraw();
        Ok(chart)
    }

    /// Record `value` and redraw. Negative values mean "unavailable this tick".
    pub fn add_value(&mut self, value: f64) {
        if value < 0.0 || value.is_nan() {
            return;
        }
        self.buffer.add(value);
        self.redraw();
    }

    pub fn redraw(&mut self) {
        self.renderer.draw(&self.definition, &self.buffer);
    }

    pub fn resize(&mut self) {
        self.renderer.resize(&self.definition, &self.buffer);
    }

    pub fn set_y_max(&mut self, y_max: Option<f64>) {
        self.definition.y_max = y_max;
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.definition.title = title.into();
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.redraw();
    }

    pub fn destroy(&mut self) {
        self.renderer.destroy();
    }

    pub fn definition(&self) -> &ChartDefinition {
        &self.definition
    }

    pub fn buffer(&self) -> &RetentionBuffer {
        &self.buffer
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }
}

/// Owns every live chart, at most one per id.
pub struct ChartRegistry {
    charts: HashMap<String, Chart>,
    clock: Arc<dyn Clock>,
}

impl ChartRegistry {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            charts: HashMap::new(),
            clock,
        }
    }

    /// Create (or replace) the chart for `definition.id`.
    pub fn create_chart(
        &mut self,
        definition: ChartDefinition,
        container: Box<dyn ChartContainer>,
    ) -> Result<()> {
        self.destroy_chart(&definition.id);

        let id = definition.id.clone();
        let chart = Chart::new(definition, container, self.clock.clone())?;
        log::debug!("Created chart '{}'", id);
        self.charts.insert(id, chart);
        Ok(())
    }

    pub fn update_data(&mut self, id: &str, value: f64) {
        if let Some(chart) = self.charts.get_mut(id) {
            chart.add_value(value);
        } else {
            log::trace!("Ignoring value for unknown chart '{}'", id);
        }
    }

    /// Change the live axis ceiling; takes effect on the next draw.
    pub fn update_chart_y_max(&mut self, id: &str, y_max: f64) {
        if let Some(chart) = self.charts.get_mut(id) {
            chart.set_y_max(Some(y_max));
        }
    }

    pub fn update_chart_title(&mut self, id: &str, title: &str) {
        if let Some(chart) = self.charts.get_mut(id) {
            chart.set_title(title);
        }
    }

    /// Forward a resize notification to one chart.
    pub fn resize(&mut self, id: &str) {
        if let Some(chart) = self.charts.get_mut(id) {
            chart.resize();
        }
    }

    pub fn resize_all(&mut self) {
        for chart in self.charts.values_mut() {
            chart.resize();
        }
    }

    pub fn latest_value(&self, id: &str) -> Option<f64> {
        self.charts.get(id)?.buffer().latest()
    }

    pub fn clear_buffer(&mut self, id: &str) {
        if let Some(chart) = self.charts.get_mut(id) {
            chart.clear();
        }
    }

    pub fn clear_all_buffers(&mut self) {
        for chart in self.charts.values_mut() {
            chart.clear();
        }
    }

    pub fn destroy_chart(&mut self, id: &str) {
        if let Some(mut chart) = self.charts.remove(id) {
            chart.destroy();
            log::debug!("Destroyed chart '{}'", id);
        }
    }

    pub fn destroy_all(&mut self) {
        for (_, mut chart) in self.charts.drain() {
            chart.destroy();
        }
    }

    pub fn chart(&self, id: &str) -> Option<&Chart> {
        self.charts.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.charts.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.charts.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }
}

impl Drop for ChartRegistry {
    fn drop(&mut self) {
        self.destroy_all();
    }
}
