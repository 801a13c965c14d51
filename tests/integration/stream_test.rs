use hwmon_charts::core::client::{parse_message, websocket_url, MonitorApi};
use hwmon_charts::core::telemetry::MetricCatalog;

#[test]
fn test_monitor_frame_feeds_catalog() {
    let frame = r#"{
        "type": "crystools.monitor",
        "data": {
            "cpu_utilization": 7.5,
            "ram_total": -1,
            "ram_used": -1,
            "gpus": [{"gpu_utilization": 0, "gpu_temperature": -1}],
            "vram_transfer_speed": 512
        }
    }"#;
    let snapshot = parse_message(frame).unwrap().unwrap();
    let catalog = MetricCatalog::new(1);

    let values: Vec<(&str, f64)> = catalog.extract_all(&snapshot).collect();
    let value = |id: &str| values.iter().find(|(i, _)| *i == id).unwrap().1;
    assert_eq!(value("cpu"), 7.5);
    assert_eq!(value("ram"), -1.0);
    // An idle GPU reports a real zero
    assert_eq!(value("gpu-usage-0"), 0.0);
    assert_eq!(value("gpu-temp-0"), -1.0);
    assert_eq!(value("vram-speed"), 0.5);
}

#[test]
fn test_non_monitor_frames_are_skipped() {
    let frame = r#"{"type": "executing", "data": {"node": "3"}}"#;
    assert!(parse_message(frame).unwrap().is_none());
}

#[test]
fn test_server_urls() {
    let ws = websocket_url("https://gpu-box.local:8443", "client-1").unwrap();
    assert_eq!(ws.as_str(), "wss://gpu-box.local:8443/ws?clientId=client-1");

    let api = MonitorApi::new("http://gpu-box.local:8188").unwrap();
    assert_eq!(
        api.endpoint("crystools/monitor/TransferSpeed").unwrap().as_str(),
        "http://gpu-box.local:8188/crystools/monitor/TransferSpeed"
    );
}
