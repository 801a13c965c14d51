use hwmon_charts::core::charts::renderer::{plot_points, y_range};
use hwmon_charts::core::charts::{ChartDefinition, RetentionBuffer, Size, WINDOW_SECONDS};
use hwmon_charts::core::clock::ManualClock;
use hwmon_charts::core::telemetry::MetricSource;
use std::sync::Arc;

fn ram() -> ChartDefinition {
    ChartDefinition::new("ram", "RAM Used", "#07630D", MetricSource::RamUsedGb)
}

#[test]
fn test_window_holds_after_two_minutes_of_ticks() {
    let clock = Arc::new(ManualClock::new(10_000.0));
    let mut buffer = RetentionBuffer::new(clock.clone());

    for tick in 0..120 {
        buffer.add(tick as f64);
        clock.advance(1.0);
    }
    buffer.add(999.0);

    let now = 10_120.0;
    assert!(buffer
        .points()
        .iter()
        .all(|s| s.time >= now - WINDOW_SECONDS));
    assert_eq!(buffer.len(), 61);
    assert_eq!(buffer.latest(), Some(999.0));
}

#[test]
fn test_auto_scale_tracks_buffer_maximum() {
    let clock = Arc::new(ManualClock::new(0.0));
    let mut buffer = RetentionBuffer::new(clock.clone());

    // Small values are floored at 10 before headroom
    buffer.add(2.0);
    let (y_min, y_max) = y_range(&ram(), &buffer);
    assert_eq!(y_min, 0.0);
    assert!((y_max - 12.0).abs() < 1e-9);

    buffer.add(50.0);
    let (_, y_max) = y_range(&ram(), &buffer);
    assert!((y_max - 60.0).abs() < 1e-9);
}

#[test]
fn test_plot_maps_window_edges() {
    let clock = Arc::new(ManualClock::new(100.0));
    let mut buffer = RetentionBuffer::new(clock.clone());
    buffer.add(0.0);
    clock.advance(30.0);
    buffer.add(50.0);
    clock.advance(30.0);
    buffer.add(100.0);

    let points = plot_points(
        buffer.points(),
        160.0,
        buffer.window(),
        Size::new(600.0, 100.0),
        0.0,
        100.0,
    );
    assert_eq!(points.len(), 3);
    assert_eq!((points[0].x, points[0].y), (0.0, 100.0));
    assert_eq!((points[1].x, points[1].y), (300.0, 50.0));
    assert_eq!((points[2].x, points[2].y), (600.0, 0.0));
}
