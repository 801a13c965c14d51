//! Per-chart renderer.
//!
//! Maps the samples of one [`RetentionBuffer`] onto a [`DrawingSurface`]:
//! a 60 second window ending "now" on the X axis, and either a fixed or an
//! auto-scaled range on the Y axis.

use std::sync::Arc;

use super::buffer::{RetentionBuffer, Sample};
use super::color::Rgba;
use super::definition::ChartDefinition;
use super::surface::{
    ChartContainer, DrawCommand, DrawingSurface, LineCap, LineJoin, Point, Size, StrokeStyle,
};
use crate::core::clock::Clock;
use crate::error::Result;

/// Auto-scale never goes below this ceiling (before headroom).
pub const AUTO_SCALE_FLOOR: f64 = 10.0;
/// Headroom applied on top of the largest value when auto-scaling.
pub const AUTO_SCALE_HEADROOM: f64 = 1.2;

const BACKGROUND: Rgba = Rgba::new(20, 20, 20, 0.6);
const GUIDE_COLOR: Rgba = Rgba::new(255, 255, 255, 0.1);
const LABEL_COLOR: Rgba = Rgba::new(255, 255, 255, 0.5);
const LABEL_SIZE: f64 = 10.0;
const LABEL_INSET: f64 = 4.0;
const LINE_WIDTH: f64 = 2.0;
const FILL_ALPHA: f64 = 0.15;
const POINT_RADIUS: f64 = 3.0;

/// Draws one metric into a surface sized to its container.
pub struct Renderer {
    surface: Box<dyn DrawingSurface>,
    container: Box<dyn ChartContainer>,
    clock: Arc<dyn Clock>,
    size: Size,
    pixel_ratio: f64,
    detached: bool,
}

impl Renderer {
    /// Mount a new surface into `container`.
    ///
    /// Fails if the container can't provide a drawing surface; there is no
    /// fallback rendering path.
    pub fn new(mut container: Box<dyn ChartContainer>, clock: Arc<dyn Clock>) -> Result<Self> {
        let surface = container.create_surface()?;
        let mut renderer = Self {
            surface,
            container,
            clock,
            size: Size::default(),
            pixel_ratio: 1.0,
            detached: false,
        };
        renderer.measure();
        Ok(renderer)
    }

    /// Re-read the container geometry, then redraw.
    pub fn resize(&mut self, definition: &ChartDefinition, buffer: &RetentionBuffer) {
        if self.detached {
            return;
        }
        self.measure();
        self.draw(definition, buffer);
    }

    fn measure(&mut self) {
        let size = self.container.client_size();
        let ratio = self.container.device_pixel_ratio();
        let ratio = if ratio.is_finite() && ratio > 0.0 {
            ratio
        } else {
            1.0
        };

        let width = (size.width.max(0.0) * ratio).floor() as u32;
        let height = (size.height.max(0.0) * ratio).floor() as u32;
        self.surface.set_backing_size(width, height);
        self.surface.set_scale(ratio);

        self.size = size;
        self.pixel_ratio = ratio;
    }

    pub fn draw(&mut self, definition: &ChartDefinition, buffer: &RetentionBuffer) {
        if self.detached {
            return;
        }

        let Size { width, height } = self.size;
        self.surface.draw(DrawCommand::Clear { width, height });
        self.surface.draw(DrawCommand::FillRect {
            origin: Point::new(0.0, 0.0),
            size: self.size,
            color: BACKGROUND,
        });

        if height > 0.0 {
            for quarter in 1..=3 {
                let y = height * quarter as f64 / 4.0;
                self.surface.draw(DrawCommand::StrokePolyline {
                    points: vec![Point::new(0.0, y), Point::new(width, y)],
                    style: StrokeStyle {
                        color: GUIDE_COLOR,
                        width: 1.0,
                        cap: LineCap::Butt,
                        join: LineJoin::Miter,
                    },
                });
            }
        }

        let (y_min, y_max) = y_range(definition, buffer);
        if y_max - y_min <= 0.0 {
            return;
        }

        let points = plot_points(
            buffer.points(),
            self.clock.now(),
            buffer.window(),
            self.size,
            y_min,
            y_max,
        );
        let color = Rgba::from_hex_alpha(&definition.color, 1.0);

        if points.len() == 1 {
            self.surface.draw(DrawCommand::FillCircle {
                center: points[0],
                radius: POINT_RADIUS,
                color,
            });
        } else if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
            self.surface.draw(DrawCommand::StrokePolyline {
                points: points.clone(),
                style: StrokeStyle {
                    color,
                    width: LINE_WIDTH,
                    cap: LineCap::Round,
                    join: LineJoin::Round,
                },
            });

            let mut area = points;
            area.push(Point::new(last.x, height));
            area.push(Point::new(first.x, height));
            self.surface.draw(DrawCommand::FillPolygon {
                points: area,
                color: Rgba::from_hex_alpha(&definition.color, FILL_ALPHA),
            });
        }

        self.surface.draw(DrawCommand::FillText {
            text: format!("{:.0}", y_max),
            at: Point::new(LABEL_INSET, LABEL_INSET + LABEL_SIZE),
            size: LABEL_SIZE,
            color: LABEL_COLOR,
        });
        self.surface.draw(DrawCommand::FillText {
            text: format!("{:.0}", y_min),
            at: Point::new(LABEL_INSET, height - LABEL_INSET),
            size: LABEL_SIZE,
            color: LABEL_COLOR,
        });
    }

    /// Release the surface. Later draws and resizes are ignored.
    pub fn destroy(&mut self) {
        if !self.detached {
            self.surface.detach();
            self.detached = true;
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.detached
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }
}

/// Y axis bounds for the next draw.
pub fn y_range(definition: &ChartDefinition, buffer: &RetentionBuffer) -> (f64, f64) {
    let y_min = definition.y_min_or_default();
    let y_max = match definition.y_max {
        Some(fixed) => fixed,
        None => {
            let observed = buffer.max_value().unwrap_or(0.0);
            observed.max(AUTO_SCALE_FLOOR) * AUTO_SCALE_HEADROOM
        }
    };
    (y_min, y_max)
}

/// Map samples inside the `window` seconds ending at `now` to CSS pixel coordinates.
pub fn plot_points<'a>(
    samples: impl IntoIterator<Item = &'a Sample>,
    now: f64,
    window: f64,
    size: Size,
    y_min: f64,
    y_max: f64,
) -> Vec<Point> {
    let window_start = now - window;
    let range = y_max - y_min;

    samples
        .into_iter()
        .filter(|s| s.time >= window_start)
        .map(|s| {
            let x = (s.time - window_start) / window * size.width;
            let y = size.height - (s.value - y_min) / range * size.height;
            Point::new(x, y)
        })
        .collect()
}
