use hwmon_charts::core::telemetry::{CapacityState, GpuStatus, MetricCatalog, TelemetrySnapshot};

fn speeds(vram_mb: f64) -> TelemetrySnapshot {
    TelemetrySnapshot {
        vram_transfer_speed: Some(vram_mb),
        ..Default::default()
    }
}

#[test]
fn test_speed_ceiling_sequence() {
    let catalog = MetricCatalog::new(1);
    let mut state = CapacityState::new();

    let first = state.observe(&catalog, &speeds(100.0));
    assert_eq!(first.len(), 1);
    assert!((first[0].y_max - 0.1171875).abs() < 1e-9);

    assert!(state.observe(&catalog, &speeds(50.0)).is_empty());

    let third = state.observe(&catalog, &speeds(200.0));
    assert!((third[0].y_max - 0.234375).abs() < 1e-9);
    assert!((state.vram_speed_ceiling() - 0.234375).abs() < 1e-9);
}

#[test]
fn test_capacities_lock_in_once_per_field() {
    let catalog = MetricCatalog::new(1);
    let mut state = CapacityState::new();
    let snapshot = |ram: f64, vram: f64| TelemetrySnapshot {
        ram_total: Some(ram),
        gpus: vec![GpuStatus {
            vram_total: Some(vram),
            ..Default::default()
        }],
        ..Default::default()
    };

    let updates = state.observe(&catalog, &snapshot(16_000_000_000.0, 8_000_000_000.0));
    let ids: Vec<&str> = updates.iter().map(|u| u.id.as_str()).collect();
    assert_eq!(ids, vec!["ram", "vram-used-0"]);
    assert_eq!(updates[1].title.as_deref(), Some("VRAM Used (7.5 GB)"));

    assert!(state
        .observe(&catalog, &snapshot(64_000_000_000.0, 24_000_000_000.0))
        .is_empty());
}

#[test]
fn test_catalog_shape_for_gpu_counts() {
    assert_eq!(MetricCatalog::new(0).definitions().len(), 6);
    assert_eq!(MetricCatalog::new(1).definitions().len(), 10);

    let two = MetricCatalog::new(2);
    assert_eq!(two.definitions().len(), 14);
    assert_eq!(two.definition("gpu-temp-1").unwrap().title, "GPU Temp 1");
    assert_eq!(
        MetricCatalog::new(1).definition("gpu-temp-0").unwrap().title,
        "GPU Temp"
    );
}
