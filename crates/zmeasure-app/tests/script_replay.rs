//! 脚本回放集成测试

use zmeasure_app::{run_script, Script};
use zmeasure_core::measurement::{MeasurementKind, MeasurementShape};
use zmeasure_core::dimension::DimensionOrientation;

const DEMO: &str = include_str!("../../../demos/measure_demo.json");

#[test]
fn demo_script_produces_all_measurements() {
    let script = Script::from_json_str(DEMO).unwrap();
    let report = run_script(&script);

    let labels: Vec<&str> = report.measurements.iter().map(|m| m.label.as_str()).collect();
    assert_eq!(
        labels,
        vec!["100.000 ±0.050", "R25.000", "90.0°", "L=160.000 A=1600.000"]
    );
    assert_eq!(report.rejected, 1);

    let kinds: Vec<MeasurementKind> = report.measurements.iter().map(|m| m.kind).collect();
    assert_eq!(
        kinds,
        vec![
            MeasurementKind::Distance,
            MeasurementKind::Radius,
            MeasurementKind::Angle,
            MeasurementKind::Area
        ]
    );

    // 距离测量的点被捕捉到直线端点
    let distance = &report.measurements[0];
    assert_eq!(distance.points[0].x, 0.0);
    assert_eq!(distance.points[1].x, 100.0);
    match &distance.shape {
        MeasurementShape::Dimension(state) => {
            assert_eq!(state.orientation, DimensionOrientation::Aligned);
            assert_eq!(state.text.content, "100.000 ±0.050");
        }
        other => panic!("unexpected shape: {:?}", other),
    }

    // 角度顶点为两条直线的交点
    let angle = &report.measurements[2];
    assert!((angle.points[0].x - 300.0).abs() < 1e-9);
    assert!(angle.points[0].y.abs() < 1e-9);

    assert!(report
        .statuses
        .iter()
        .any(|s| s == "Point coincides with the previous point"));
    assert_eq!(report.statuses.first().map(String::as_str), Some("指定第一个测量点:"));
}

#[test]
fn snapping_can_be_disabled() {
    let json = r#"{
        "snapping": false,
        "entities": [
            { "id": 1, "geometry": { "Line": { "start": [0.0, 0.0], "end": [100.0, 0.0] } } }
        ],
        "events": [
            { "type": "activate", "tool": "Distance" },
            { "type": "click", "x": 0.5, "y": 0.0 },
            { "type": "click", "x": 99.5, "y": 0.0 },
            { "type": "click", "x": 50.0, "y": 30.0 }
        ]
    }"#;
    let report = run_script(&Script::from_json_str(json).unwrap());
    assert_eq!(report.measurements.len(), 1);
    assert_eq!(report.measurements[0].label, "99.000");
}

#[test]
fn unknown_tolerance_target_is_skipped() {
    let json = r#"{
        "entities": [],
        "events": [
            { "type": "tolerance", "measurement": 9, "tolerance": null },
            { "type": "activate", "tool": "Angle" },
            { "type": "click", "x": 0.0, "y": 0.0 },
            { "type": "click", "x": 10.0, "y": 0.0 },
            { "type": "click", "x": 0.0, "y": 10.0 },
            { "type": "click", "x": -5.0, "y": 5.0 }
        ]
    }"#;
    let report = run_script(&Script::from_json_str(json).unwrap());
    assert_eq!(report.measurements.len(), 1);
    // 放置点在第二象限，测量 90° 到 180° 的扇区
    assert_eq!(report.measurements[0].label, "90.0°");
}

#[test]
fn malformed_script_is_an_error() {
    assert!(Script::from_json_str(r#"{ "entities": [] }"#).is_err());
}
