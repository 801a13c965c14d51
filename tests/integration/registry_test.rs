use hwmon_charts::core::charts::{
    ChartDefinition, ChartRegistry, DrawCommand, Size, StaticContainer,
};
use hwmon_charts::core::clock::ManualClock;
use hwmon_charts::core::telemetry::MetricSource;
use std::sync::Arc;

fn gpu_temp() -> ChartDefinition {
    ChartDefinition::new("gpu-temp-0", "GPU Temp", "#F44336", MetricSource::GpuTemperature(0))
        .with_range(0.0, 100.0)
}

fn count<F: Fn(&DrawCommand) -> bool>(commands: &[DrawCommand], pred: F) -> usize {
    commands.iter().filter(|c| pred(c)).count()
}

#[test]
fn test_high_density_backing_store() {
    let clock = Arc::new(ManualClock::new(0.0));
    let mut registry = ChartRegistry::new(clock);
    let container = StaticContainer::new(Size::new(150.5, 60.0), 2.0);
    registry
        .create_chart(gpu_temp(), Box::new(container.clone()))
        .unwrap();

    let state = container.last_surface().unwrap().snapshot();
    assert_eq!(state.backing_width, 301);
    assert_eq!(state.backing_height, 120);
    assert_eq!(state.scale, 2.0);
}

#[test]
fn test_resize_remeasures_and_redraws() {
    let clock = Arc::new(ManualClock::new(0.0));
    let mut registry = ChartRegistry::new(clock);
    let container = StaticContainer::new(Size::new(100.0, 50.0), 1.0);
    registry
        .create_chart(gpu_temp(), Box::new(container.clone()))
        .unwrap();

    container.set_size(Size::new(200.0, 80.0));
    registry.resize("gpu-temp-0");

    let surface = container.last_surface().unwrap();
    let state = surface.snapshot();
    assert_eq!((state.backing_width, state.backing_height), (200, 80));
    assert_eq!(surface.frames(), 2);
}

#[test]
fn test_line_and_fill_after_two_values() {
    let clock = Arc::new(ManualClock::new(0.0));
    let mut registry = ChartRegistry::new(clock.clone());
    let container = StaticContainer::new(Size::new(120.0, 40.0), 1.0);
    registry
        .create_chart(gpu_temp(), Box::new(container.clone()))
        .unwrap();

    registry.update_data("gpu-temp-0", 40.0);
    clock.advance(1.0);
    registry.update_data("gpu-temp-0", 60.0);

    let commands = container.last_surface().unwrap().commands();
    // Three guides plus the data line
    assert_eq!(
        count(&commands, |c| matches!(c, DrawCommand::StrokePolyline { .. })),
        4
    );
    assert_eq!(
        count(&commands, |c| matches!(c, DrawCommand::FillPolygon { .. })),
        1
    );
    assert_eq!(
        count(&commands, |c| matches!(c, DrawCommand::FillCircle { .. })),
        0
    );

    let labels: Vec<&str> = commands
        .iter()
        .filter_map(|c| match c {
            DrawCommand::FillText { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(labels, vec!["100", "0"]);
}

#[test]
fn test_events_after_destroy_are_ignored() {
    let clock = Arc::new(ManualClock::new(0.0));
    let mut registry = ChartRegistry::new(clock);
    let container = StaticContainer::new(Size::new(120.0, 40.0), 1.0);
    registry
        .create_chart(gpu_temp(), Box::new(container.clone()))
        .unwrap();
    registry.destroy_chart("gpu-temp-0");

    registry.update_data("gpu-temp-0", 10.0);
    registry.resize("gpu-temp-0");
    registry.update_chart_y_max("gpu-temp-0", 120.0);

    let surface = container.last_surface().unwrap();
    assert!(surface.is_detached());
    assert!(surface.commands().is_empty());
    assert_eq!(surface.frames(), 1);
}
