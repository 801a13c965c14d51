use hwmon_charts::core::charts::{Size, StaticContainer};
use hwmon_charts::core::clock::ManualClock;
use hwmon_charts::core::config::VisibilitySettings;
use hwmon_charts::core::telemetry::{GpuStatus, TelemetrySnapshot, VisibilityKey};
use hwmon_charts::MonitorPanel;
use std::sync::Arc;

fn attached(gpu_count: usize) -> (Arc<ManualClock>, MonitorPanel) {
    let clock = Arc::new(ManualClock::new(0.0));
    let mut panel = MonitorPanel::new(clock.clone(), VisibilitySettings::default());
    panel
        .initialize(gpu_count, |_| {
            Box::new(StaticContainer::new(Size::new(300.0, 100.0), 1.0))
        })
        .unwrap();
    (clock, panel)
}

fn scenario() -> TelemetrySnapshot {
    TelemetrySnapshot::from_json(
        r#"{
            "cpu_utilization": 42,
            "ram_used": 8000000000,
            "ram_total": 16000000000,
            "gpus": [{
                "gpu_utilization": 77,
                "gpu_temperature": 65,
                "vram_used": 4000000000,
                "vram_used_percent": 50,
                "vram_total": 8000000000
            }]
        }"#,
    )
    .unwrap()
}

#[test]
fn test_end_to_end_display_values() {
    let (_, mut panel) = attached(1);
    panel.handle_snapshot(&scenario());

    let expected = [
        ("cpu", "42%"),
        ("ram", "7.5 GB"),
        ("gpu-usage-0", "77%"),
        ("gpu-temp-0", "65°C"),
        ("vram-percent-0", "50%"),
        ("vram-used-0", "3.7 GB"),
    ];
    for (id, text) in expected {
        assert_eq!(panel.display_value(id), Some(text), "chart {}", id);
        assert_eq!(panel.registry().chart(id).unwrap().buffer().len(), 1);
    }

    let vram = panel.registry().latest_value("vram-used-0").unwrap();
    assert!((vram - 3.725290298461914).abs() < 1e-9);
    let ram_ceiling = panel.capacity().ram_total_gb().unwrap();
    assert!((ram_ceiling - 14.901161193847656).abs() < 1e-9);
}

#[test]
fn test_history_accumulates_while_hidden() {
    let (clock, mut panel) = attached(1);
    panel.set_visibility(VisibilityKey::GpuTemp, false);

    for _ in 0..5 {
        panel.handle_snapshot(&scenario());
        clock.advance(1.0);
    }
    assert!(panel
        .visible_definitions()
        .iter()
        .all(|d| d.visibility != VisibilityKey::GpuTemp));

    panel.set_visibility(VisibilityKey::GpuTemp, true);
    assert_eq!(
        panel.registry().chart("gpu-temp-0").unwrap().buffer().len(),
        5
    );
    assert_eq!(panel.visible_definitions().len(), 10);
}

#[test]
fn test_gpu_count_zero_still_charts_system_metrics() {
    let (_, mut panel) = attached(0);
    panel.handle_snapshot(&scenario());

    assert_eq!(panel.display_value("cpu"), Some("42%"));
    assert!(!panel.registry().contains("gpu-usage-0"));
}
