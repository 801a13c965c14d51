//! Drawing surfaces and the containers that host them.
//!
//! A renderer only ever talks to these traits, so the same chart code can
//! paint into the terminal, a recorder used by tests, or anything else that
//! understands a handful of 2D primitives.

use std::sync::Arc;

use parking_lot::Mutex;

use super::color::Rgba;
use crate::error::{ChartError, Result};

/// Point in CSS pixels, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// On-screen size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCap {
    Butt,
    Round,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineJoin {
    Miter,
    Round,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Rgba,
    pub width: f64,
    pub cap: LineCap,
    pub join: LineJoin,
}

/// Primitive drawing operations, in CSS pixels after the scale transform.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear { width: f64, height: f64 },
    FillRect { origin: Point, size: Size, color: Rgba },
    StrokePolyline { points: Vec<Point>, style: StrokeStyle },
    FillPolygon { points: Vec<Point>, color: Rgba },
    FillCircle { center: Point, radius: f64, color: Rgba },
    FillText { text: String, at: Point, size: f64, color: Rgba },
}

/// 2D drawing target owned by exactly one renderer.
pub trait DrawingSurface: Send {
    /// Resize the backing store in device pixels.
    fn set_backing_size(&mut self, width: u32, height: u32);

    /// Replace the current transform with a uniform scale.
    fn set_scale(&mut self, scale: f64);

    fn draw(&mut self, command: DrawCommand);

    /// Remove the surface from its container and release it.
    fn detach(&mut self);
}

/// Something a chart can be mounted into.
pub trait ChartContainer: Send {
    /// Current on-screen size in CSS pixels.
    fn client_size(&self) -> Size;

    fn device_pixel_ratio(&self) -> f64;

    /// Create the drawing surface for a new chart.
    fn create_surface(&mut self) -> Result<Box<dyn DrawingSurface>>;
}

/// Everything a recording surface has seen, observable from outside.
#[derive(Debug, Clone, Default)]
pub struct SurfaceState {
    pub backing_width: u32,
    pub backing_height: u32,
    pub scale: f64,
    /// Commands since the last `Clear`.
    pub commands: Vec<DrawCommand>,
    pub frames: usize,
    pub detached: bool,
}

/// Shared view onto a [`RecordingSurface`].
#[derive(Debug, Clone, Default)]
pub struct SurfaceHandle(Arc<Mutex<SurfaceState>>);

impl SurfaceHandle {
    pub fn snapshot(&self) -> SurfaceState {
        self.0.lock().clone()
    }

    pub fn commands(&self) -> Vec<DrawCommand> {
        self.0.lock().commands.clone()
    }

    pub fn is_detached(&self) -> bool {
        self.0.lock().detached
    }

    pub fn frames(&self) -> usize {
        self.0.lock().frames
    }
}

/// Surface that keeps the most recent frame as a list of commands.
///
/// The terminal host paints these commands every frame; tests inspect them.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    state: SurfaceHandle,
}

impl RecordingSurface {
    pub fn new() -> (Self, SurfaceHandle) {
        let state = SurfaceHandle::default();
        (
            Self {
                state: state.clone(),
            },
            state,
        )
    }
}

impl DrawingSurface for RecordingSurface {
    fn set_backing_size(&mut self, width: u32, height: u32) {
        let mut state = self.state.0.lock();
        state.backing_width = width;
        state.backing_height = height;
    }

    fn set_scale(&mut self, scale: f64) {
        self.state.0.lock().scale = scale;
    }

    fn draw(&mut self, command: DrawCommand) {
        let mut state = self.state.0.lock();
        if state.detached {
            return;
        }
        if matches!(command, DrawCommand::Clear { .. }) {
            state.commands.clear();
            state.frames += 1;
        }
        state.commands.push(command);
    }

    fn detach(&mut self) {
        let mut state = self.state.0.lock();
        state.detached = true;
        state.commands.clear();
    }
}

/// Container with a fixed (but adjustable) size, used for headless charts.
#[derive(Debug, Clone)]
pub struct StaticContainer {
    size: Arc<Mutex<Size>>,
    pixel_ratio: f64,
    supports_surface: bool,
    surfaces: Arc<Mutex<Vec<SurfaceHandle>>>,
}

impl StaticContainer {
    pub fn new(size: Size, pixel_ratio: f64) -> Self {
        Self {
            size: Arc::new(Mutex::new(size)),
            pixel_ratio,
            supports_surface: true,
            surfaces: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Container whose environment has no 2D drawing capability.
    pub fn without_surface(size: Size) -> Self {
        Self {
            supports_surface: false,
            ..Self::new(size, 1.0)
        }
    }

    pub fn set_size(&self, size: Size) {
        *self.size.lock() = size;
    }

    /// Handles of every surface created through this container (or its clones).
    pub fn surfaces(&self) -> Vec<SurfaceHandle> {
        self.surfaces.lock().clone()
    }

    pub fn last_surface(&self) -> Option<SurfaceHandle> {
        self.surfaces.lock().last().cloned()
    }
}

impl ChartContainer for StaticContainer {
    fn client_size(&self) -> Size {
        *self.size.lock()
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn create_surface(&mut self) -> Result<Box<dyn DrawingSurface>> {
        if !self.supports_surface {
            return Err(ChartError::surface_unavailable(
                "container has no 2D drawing context",
            ));
        }
        let (surface, handle) = RecordingSurface::new();
        self.surfaces.lock().push(handle);
        Ok(Box::new(surface))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_keeps_last_frame() {
        let (mut surface, handle) = RecordingSurface::new();
        surface.draw(DrawCommand::Clear {
            width: 10.0,
            height: 10.0,
        });
        surface.draw(DrawCommand::FillCircle {
            center: Point::new(1.0, 1.0),
            radius: 3.0,
            color: Rgba::opaque(0, 0, 0),
        });
        surface.draw(DrawCommand::Clear {
            width: 10.0,
            height: 10.0,
        });

        assert_eq!(handle.commands().len(), 1);
        assert_eq!(handle.frames(), 2);
    }

    #[test]
    fn test_detached_surface_ignores_draws() {
        let (mut surface, handle) = RecordingSurface::new();
        surface.detach();
        surface.draw(DrawCommand::Clear {
            width: 1.0,
            height: 1.0,
        });
        assert!(handle.is_detached());
        assert!(handle.commands().is_empty());
    }

    #[test]
    fn test_container_without_surface_fails() {
        let mut container = StaticContainer::without_surface(Size::new(10.0, 10.0));
        let err = container.create_surface().err().map(|e| e.to_string());
        assert!(err.unwrap_or_default().contains("drawing"));
    }
}
