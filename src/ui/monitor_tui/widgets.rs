use std::sync::Arc;

use parking_lot::Mutex;
use ratatui::prelude::*;

use crate::core::charts::{
    ChartContainer, DrawCommand, DrawingSurface, Point, RecordingSurface, Rgba, Size,
    SurfaceHandle,
};
use crate::error::Result;

/// Braille dots per terminal cell.
pub const DOTS_PER_COLUMN: f64 = 2.0;
pub const DOTS_PER_ROW: f64 = 4.0;

/// Terminal background the translucent chart colors are blended over.
pub const TERMINAL_BACKGROUND: Rgba = Rgba::opaque(0, 0, 0);

#[derive(Debug, Default)]
struct CellState {
    area: Rect,
    surface: Option<SurfaceHandle>,
}

/// Screen slot of one chart, shared between the layout pass and its container.
#[derive(Debug, Clone, Default)]
pub struct ChartCell(Arc<Mutex<CellState>>);

impl ChartCell {
    /// Record the inner area; returns `true` when it changed.
    pub fn set_area(&self, area: Rect) -> bool {
        let mut state = self.0.lock();
        if state.area == area {
            return false;
        }
        state.area = area;
        true
    }

    pub fn area(&self) -> Rect {
        self.0.lock().area
    }

    pub fn surface(&self) -> Option<SurfaceHandle> {
        self.0.lock().surface.clone()
    }
}

/// Mounts a chart into a terminal cell; one braille dot is one CSS pixel.
pub struct TerminalContainer {
    cell: ChartCell,
    pixel_ratio: f64,
}

impl TerminalContainer {
    pub fn new(cell: ChartCell, pixel_ratio: f64) -> Self {
        Self { cell, pixel_ratio }
    }
}

impl ChartContainer for TerminalContainer {
    fn client_size(&self) -> Size {
        let area = self.cell.area();
        Size::new(
            area.width as f64 * DOTS_PER_COLUMN,
            area.height as f64 * DOTS_PER_ROW,
        )
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn create_surface(&mut self) -> Result<Box<dyn DrawingSurface>> {
        let (surface, handle) = RecordingSurface::new();
        self.cell.0.lock().surface = Some(handle);
        Ok(Box::new(surface))
    }
}

pub fn terminal_color(color: Rgba, background: Rgba) -> Color {
    let (r, g, b) = color.blend_over(background);
    Color::Rgb(r, g, b)
}

/// Background color of a recorded frame (its first filled rect).
pub fn frame_background(commands: &[DrawCommand]) -> Option<Rgba> {
    commands.iter().find_map(|command| match command {
        DrawCommand::FillRect { color, .. } => Some(*color),
        _ => None,
    })
}

/// Vertical spans approximating the area under a filled plot polygon.
///
/// The polygon is the plotted line closed along the bottom edge, so the
/// last two vertices are skipped and every dot column between consecutive
/// line vertices gets one span from the line down to `floor`.
pub fn fill_spans(polygon: &[Point], floor: f64) -> Vec<(Point, Point)> {
    let line = &polygon[..polygon.len().saturating_sub(2)];
    let mut spans = Vec::new();

    for pair in line.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let width = b.x - a.x;
        if width <= 0.0 {
            spans.push((a, Point::new(a.x, floor)));
            continue;
        }
        let steps = width.ceil() as usize;
        for step in 0..steps {
            let x = a.x + step as f64;
            let y = a.y + (b.y - a.y) * ((x - a.x) / width);
            spans.push((Point::new(x, y), Point::new(x, floor)));
        }
    }
    if let Some(last) = line.last() {
        spans.push((*last, Point::new(last.x, floor)));
    }
    spans
}

/// Color for a chart's value text.
pub fn value_color(hex: &str) -> Color {
    match Rgba::parse_hex(hex) {
        Some(color) => Color::Rgb(color.r, color.g, color.b),
        None => Color::White,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_reports_dot_resolution() {
        let cell = ChartCell::default();
        assert!(cell.set_area(Rect::new(2, 3, 40, 10)));
        assert!(!cell.set_area(Rect::new(2, 3, 40, 10)));

        let mut container = TerminalContainer::new(cell.clone(), 2.0);
        assert_eq!(container.client_size(), Size::new(80.0, 40.0));
        assert_eq!(container.device_pixel_ratio(), 2.0);

        assert!(cell.surface().is_none());
        container.create_surface().unwrap();
        assert!(cell.surface().is_some());
    }

    #[test]
    fn test_fill_spans_cover_each_column() {
        let polygon = [
            Point::new(0.0, 10.0),
            Point::new(4.0, 2.0),
            Point::new(4.0, 20.0),
            Point::new(0.0, 20.0),
        ];
        let spans = fill_spans(&polygon, 20.0);
        assert_eq!(spans.len(), 5);
        assert_eq!(spans[0].0, Point::new(0.0, 10.0));
        assert_eq!(spans[2].0, Point::new(2.0, 6.0));
        assert_eq!(spans[4].0, Point::new(4.0, 2.0));
        assert!(spans.iter().all(|(_, bottom)| bottom.y == 20.0));
    }

    #[test]
    fn test_terminal_color_blends() {
        let color = terminal_color(Rgba::new(200, 100, 0, 0.5), TERMINAL_BACKGROUND);
        assert_eq!(color, Color::Rgb(100, 50, 0));
        assert_eq!(value_color("#0AA015"), Color::Rgb(10, 160, 21));
        assert_eq!(value_color("bogus"), Color::White);
    }
}
