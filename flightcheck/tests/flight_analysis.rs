//! End-to-end tests: synthetic flight → `.tlog` → analysis → report/charts.
//!
//! Run with: `cargo test --test flight_analysis`

use flightcheck::compliance::{
    analyze, FailReason, LapCompletion, PositionSample, UnclosedLapPolicy,
};
use flightcheck::config::ConfigFile;
use flightcheck::plot::{save_charts, ChartStyle};
use flightcheck::report::{render_text, to_json};
use flightcheck::rules::MissionRules;
use flightcheck::scenario::{demo_mission, FlightScript, DEMO_HOME};
use flightcheck::tlog::{read_tlog, write_tlog, MavlinkVersion, TlogWriter};

// ============================================================================
// Helper Functions
// ============================================================================

/// Write `samples` to a temp `.tlog` and read them back.
fn through_tlog(samples: &[PositionSample]) -> Vec<PositionSample> {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flight.tlog");

    let written = write_tlog(&path, samples).unwrap();
    assert_eq!(written, samples.len());

    let (decoded, stats) = read_tlog(&path).unwrap();
    assert_eq!(decoded.len(), samples.len(), "every record decodes");
    assert_eq!(stats.positions as usize, decoded.len());
    for (original, read) in samples.iter().zip(&decoded) {
        assert_eq!(original.timestamp_ms, read.timestamp_ms);
    }
    decoded
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_demo_mission_from_tlog() {
    let samples = through_tlog(&demo_mission());
    let report = analyze(samples, MissionRules::default(), UnclosedLapPolicy::Drop);

    assert!(report.has_data());
    assert_eq!(report.laps.len(), 3);

    let lap1 = &report.laps[0];
    assert!(lap1.is_valid);
    assert_eq!(lap1.fail_reason, FailReason::Clean);
    assert!((lap1.max_alt - 40.0).abs() < 0.01);

    let lap2 = &report.laps[1];
    assert!(!lap2.is_valid);
    assert!(matches!(lap2.fail_reason, FailReason::Altitude { .. }));
    assert!(lap2.fail_reason.to_string().contains("ALTITUDE"));
    assert!((lap2.max_alt - 135.0).abs() < 0.01);

    let lap3 = &report.laps[2];
    assert!(!lap3.is_valid);
    assert_eq!(lap3.fail_reason, FailReason::NoFlyZone);

    assert!(report.laps.iter().all(|l| l.completion == LapCompletion::Closed));
    assert_eq!(report.summary.total_laps, 3);
    assert_eq!(report.summary.valid_laps, 1);
    assert_eq!(report.summary.success_rate_percent, 33);
}

#[test]
fn test_tlog_matches_in_memory_analysis() {
    let samples = demo_mission();
    let direct = analyze(samples.clone(), MissionRules::default(), UnclosedLapPolicy::Drop);
    let decoded = analyze(
        through_tlog(&samples),
        MissionRules::default(),
        UnclosedLapPolicy::Drop,
    );

    assert_eq!(direct.laps.len(), decoded.laps.len());
    for (a, b) in direct.laps.iter().zip(&decoded.laps) {
        assert_eq!(a.lap_id, b.lap_id);
        assert_eq!(a.fail_reason, b.fail_reason);
        assert_eq!(a.started_at_ms, b.started_at_ms);
        assert_eq!(a.ended_at_ms, b.ended_at_ms);
    }
}

#[test]
fn test_mavlink1_log_gives_same_report() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("v1.tlog");
    let samples = demo_mission();

    let mut writer = TlogWriter::create(&path)
        .unwrap()
        .with_version(MavlinkVersion::V1);
    writer.write_all(&samples).unwrap();
    writer.finish().unwrap();

    let (decoded, stats) = read_tlog(&path).unwrap();
    assert_eq!(decoded.len(), samples.len());
    assert_eq!(stats.parse_errors, 0);

    let from_v1 = analyze(decoded, MissionRules::default(), UnclosedLapPolicy::Drop);
    let from_v2 = analyze(through_tlog(&samples), MissionRules::default(), UnclosedLapPolicy::Drop);
    assert_eq!(from_v1.laps, from_v2.laps);
    assert_eq!(from_v1.summary, from_v2.summary);
}

#[test]
fn test_stricter_ceiling_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.ini");
    std::fs::write(&path, "[rules]\naltitude_ceiling_m = 30\n").unwrap();

    let rules = ConfigFile::load_from(&path).unwrap().to_rules();
    let report = analyze(demo_mission(), rules, UnclosedLapPolicy::Drop);

    assert_eq!(report.summary.total_laps, 3);
    assert_eq!(report.summary.valid_laps, 0);
    assert!(report
        .laps
        .iter()
        .all(|l| matches!(l.fail_reason, FailReason::Altitude { .. })));
}

#[test]
fn test_flight_ending_away_from_home() {
    let home = DEMO_HOME;
    let samples = FlightScript::new(home)
        .fly_to(home.lat, home.lon, 30.0, 3.0)
        .fly_to(home.lat + 0.001, home.lon, 30.0, 5.0)
        .into_samples();

    let dropped = analyze(samples.clone(), MissionRules::default(), UnclosedLapPolicy::Drop);
    assert!(dropped.laps.is_empty());
    assert_eq!(dropped.summary.success_rate_percent, 0);

    let kept = analyze(samples, MissionRules::default(), UnclosedLapPolicy::Incomplete);
    assert_eq!(kept.laps.len(), 1);
    assert_eq!(kept.laps[0].completion, LapCompletion::Incomplete);
    assert_eq!(kept.summary.total_laps, 1);
    assert_eq!(kept.summary.valid_laps, 0);
    assert!(render_text(&kept).contains("[ INCOMPLETE ]"));
}

#[test]
fn test_report_and_charts() {
    let report = analyze(demo_mission(), MissionRules::default(), UnclosedLapPolicy::Drop);

    let text = render_text(&report);
    assert!(text.contains("LAP #1 -> [ SUCCESS ]"));
    assert!(text.contains("LAP #3 -> [ FAILED   ]"));
    assert!(text.contains("NFZ VIOLATION (Inside Zone)"));
    assert!(text.contains("Success rate: 33%"));

    let json: serde_json::Value = serde_json::from_str(&to_json(&report).unwrap()).unwrap();
    assert_eq!(json["summary"]["valid_laps"], 1);
    assert_eq!(json["laps"].as_array().unwrap().len(), 3);

    let dir = tempfile::tempdir().unwrap();
    let style = ChartStyle {
        width: 400,
        height: 300,
        ..ChartStyle::default()
    };
    let files = save_charts(&report, dir.path(), &style).unwrap();
    assert!(files.altitude.exists());
    assert!(files.trajectory.exists());
}

#[test]
fn test_empty_tlog_is_no_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.tlog");
    std::fs::write(&path, b"").unwrap();

    let (samples, stats) = read_tlog(&path).unwrap();
    assert!(samples.is_empty());
    assert_eq!(stats.messages, 0);

    let report = analyze(samples, MissionRules::default(), UnclosedLapPolicy::Drop);
    assert!(!report.has_data());
    assert!(render_text(&report).contains("[!] No flight data found."));
}
