use crate::core::telemetry::{MetricSource, ValueFormat, VisibilityKey};

/// Static description of one on-screen chart.
///
/// `y_max` and `title` are the only fields that change after construction,
/// and only through the registry when capacities or speeds are discovered.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartDefinition {
    pub id: String,
    pub title: String,
    /// `#RRGGBB`
    pub color: String,
    pub unit: String,
    /// Defaults to 0 when absent
    pub y_min: Option<f64>,
    /// `None` means auto-scale
    pub y_max: Option<f64>,
    pub source: MetricSource,
    pub format: ValueFormat,
    pub visibility: VisibilityKey,
}

impl ChartDefinition {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        color: impl Into<String>,
        source: MetricSource,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            color: color.into(),
            unit: source.format().unit().to_string(),
            y_min: None,
            y_max: None,
            format: source.format(),
            visibility: source.visibility(),
            source,
        }
    }

    pub fn with_range(mut self, y_min: f64, y_max: f64) -> Self {
        self.y_min = Some(y_min);
        self.y_max = Some(y_max);
        self
    }

    pub fn y_min_or_default(&self) -> f64 {
        self.y_min.unwrap_or(0.0)
    }

    pub fn is_auto_scaled(&self) -> bool {
        self.y_max.is_none()
    }
}
