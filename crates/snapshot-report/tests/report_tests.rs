use std::path::PathBuf;

use snapshot_report::{load_snapshot, run, ReportConfig};
use stoker_types::{PowerState, State, Unit};

#[test]
fn partial_snapshot_reports_supported_readings() {
    let report = load_snapshot(&fixture_path("partial-snapshot.json"), true)
        .expect("load snapshot")
        .expect("connected");

    assert_eq!(report.serial_number.as_deref(), Some("48211"));
    assert_eq!(report.state, Some(State::FaultIgnition));
    assert_eq!(report.alarm, Some(PowerState::On));
    assert_eq!(report.running, Some(PowerState::Off));

    let o2 = report.reading("o2_percent").expect("o2 reading");
    assert_eq!(o2.to_string(), "20.9 %");
    assert_eq!(
        report.reading("hopper_content").expect("content").unit,
        Some(Unit::Kilogram)
    );

    for name in [
        "outside_temp",
        "wind_speed",
        "wind_direction",
        "humidity",
        "hotwater_temperature_current",
        "hotwater_temperature_requested",
    ] {
        assert!(report.unsupported.contains(&name), "{name} should be unsupported");
        assert!(report.reading(name).is_none());
    }

    assert_eq!(report.malformed.len(), 1);
    assert_eq!(report.malformed[0].name, "exhaustfan");
    assert!(report.malformed[0].error.contains("rpm"));
}

#[test]
fn disconnected_snapshot_is_skipped_or_fatal() {
    let path = fixture_path("disconnected-snapshot.json");
    assert!(load_snapshot(&path, true).expect("skip").is_none());
    assert!(load_snapshot(&path, false).is_err());
}

#[test]
fn run_writes_one_line_per_connected_snapshot() {
    let config = ReportConfig {
        snapshots: vec![
            fixture_path("partial-snapshot.json"),
            fixture_path("disconnected-snapshot.json"),
        ],
        ..ReportConfig::default()
    };

    let mut out = Vec::new();
    let written = run(&config, &mut out).expect("run");
    assert_eq!(written, 1);

    let text = String::from_utf8(out).expect("utf8");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 1);

    let json: serde_json::Value = serde_json::from_str(lines[0]).expect("report json");
    assert_eq!(json["state"], "FAULT_IGNITION");
    assert_eq!(json["alarm"], "ON");
    let readings = json["readings"].as_object().expect("readings keyed by name");
    assert_eq!(readings["boiler_return_temperature"]["value"], "37");
    assert_eq!(readings["boiler_return_temperature"]["unit"], "deg");
    assert!(!readings.contains_key("wind_direction"));
    assert!(!readings.contains_key("outside_temp"));

    assert_eq!(json["unsupported"].as_array().expect("unsupported").len(), 6);
    assert_eq!(json["malformed"][0]["name"], "exhaustfan");
}

#[test]
fn missing_snapshot_file_fails_run() {
    let config = ReportConfig {
        snapshots: vec![fixture_path("absent.json")],
        ..ReportConfig::default()
    };
    let mut out = Vec::new();
    assert!(run(&config, &mut out).is_err());
}

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}
