//! Flight report rendering.
//!
//! Text output for terminals and JSON output for tooling. Both read a
//! finished [`FlightReport`]; neither touches the compliance state.

use std::fmt::Write as _;

use serde::Serialize;
use thiserror::Error;

use crate::compliance::{FlightReport, FlightSummary, HomePosition, LapCompletion, LapRecord};
use crate::rules::MissionRules;

const RULE: &str = "========================================";
const THIN_RULE: &str = "----------------------------------------";

/// Errors producing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// JSON serialization failed.
    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Verdict tag shown for a lap.
pub fn lap_status_tag(lap: &LapRecord) -> &'static str {
    match (lap.completion, lap.is_valid) {
        (LapCompletion::Incomplete, _) => "[ INCOMPLETE ]",
        (LapCompletion::Closed, true) => "[ SUCCESS ]",
        (LapCompletion::Closed, false) => "[ FAILED   ]",
    }
}

/// One report line for a lap.
pub fn format_lap_line(lap: &LapRecord) -> String {
    format!(
        "LAP #{} -> {} | Max Alt: {:.1}m | Note: {}",
        lap.lap_id,
        lap_status_tag(lap),
        lap.max_alt,
        lap.fail_reason
    )
}

/// Render the plain-text flight analysis report.
pub fn render_text(report: &FlightReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "           FLIGHT ANALYSIS REPORT");
    let _ = writeln!(out, "{}", RULE);

    if !report.has_data() {
        let _ = writeln!(out, "[!] No flight data found.");
        return out;
    }

    if let Some(home) = report.home {
        let _ = writeln!(out, "Home: {}", home.point());
    }

    for lap in &report.laps {
        let _ = writeln!(out, "{}", format_lap_line(lap));
    }

    let summary = &report.summary;
    let _ = writeln!(out, "{}", THIN_RULE);
    let _ = writeln!(out, "Total laps: {}", summary.total_laps);
    let _ = writeln!(out, "Valid laps: {}", summary.valid_laps);
    let _ = writeln!(out, "Success rate: {}%", summary.success_rate_percent);

    out
}

/// Serializable view of a report. Raw samples are summarized as a count.
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    has_data: bool,
    home: Option<HomePosition>,
    sample_count: usize,
    summary: FlightSummary,
    laps: Vec<JsonLap<'a>>,
    rules: &'a MissionRules,
}

/// A lap record plus the derived fields tooling needs to agree with the summary.
#[derive(Debug, Serialize)]
struct JsonLap<'a> {
    #[serde(flatten)]
    record: &'a LapRecord,
    counts_as_valid: bool,
    fail_kind: &'static str,
    duration_ms: u64,
}

impl<'a> From<&'a LapRecord> for JsonLap<'a> {
    fn from(record: &'a LapRecord) -> Self {
        Self {
            record,
            counts_as_valid: record.counts_as_valid(),
            fail_kind: record.fail_reason.as_str(),
            duration_ms: record.duration_ms(),
        }
    }
}

/// Render the report as pretty-printed JSON.
pub fn to_json(report: &FlightReport) -> Result<String, ReportError> {
    let view = JsonReport {
        has_data: report.has_data(),
        home: report.home,
        sample_count: report.samples.len(),
        summary: report.summary,
        laps: report.laps.iter().map(JsonLap::from).collect(),
        rules: &report.rules,
    };
    Ok(serde_json::to_string_pretty(&view)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::{analyze, FailReason, PositionSample, UnclosedLapPolicy};

    fn lap(lap_id: u32, reason: FailReason, completion: LapCompletion) -> LapRecord {
        LapRecord {
            lap_id,
            is_valid: reason.is_clean(),
            max_alt: 41.3,
            fail_reason: reason,
            started_at_ms: 0,
            ended_at_ms: 1000,
            sample_count: 10,
            completion,
        }
    }

    fn report_with(laps: Vec<LapRecord>) -> FlightReport {
        FlightReport {
            home: Some(HomePosition { lat: 1.0, lon: 2.0 }),
            summary: FlightSummary::from_laps(&laps),
            laps,
            samples: vec![PositionSample::new(0, 1.0, 2.0, 5.0)],
            rules: MissionRules::default(),
        }
    }

    #[test]
    fn test_lap_line_format() {
        let line = format_lap_line(&lap(1, FailReason::Clean, LapCompletion::Closed));
        assert_eq!(line, "LAP #1 -> [ SUCCESS ] | Max Alt: 41.3m | Note: Clean");

        let line = format_lap_line(&lap(
            2,
            FailReason::Altitude { alt_m: 135 },
            LapCompletion::Closed,
        ));
        assert!(line.contains("[ FAILED   ]"));
        assert!(line.contains("ALTITUDE VIOLATION (135m)"));
    }

    #[test]
    fn test_incomplete_tag() {
        let l = lap(3, FailReason::Clean, LapCompletion::Incomplete);
        assert_eq!(lap_status_tag(&l), "[ INCOMPLETE ]");
    }

    #[test]
    fn test_render_text_summary() {
        let report = report_with(vec![
            lap(1, FailReason::Clean, LapCompletion::Closed),
            lap(2, FailReason::NoFlyZone, LapCompletion::Closed),
        ]);
        let text = render_text(&report);

        assert!(text.contains("FLIGHT ANALYSIS REPORT"));
        assert!(text.contains("Home: 1.000000, 2.000000"));
        assert!(text.contains("LAP #2 -> [ FAILED   ] | Max Alt: 41.3m | Note: NFZ VIOLATION (Inside Zone)"));
        assert!(text.contains("Total laps: 2"));
        assert!(text.contains("Valid laps: 1"));
        assert!(text.contains("Success rate: 50%"));
    }

    #[test]
    fn test_render_text_no_data() {
        let report = analyze(Vec::new(), MissionRules::default(), UnclosedLapPolicy::Drop);
        let text = render_text(&report);

        assert!(text.contains("[!] No flight data found."));
        assert!(!text.contains("Total laps"));
    }

    #[test]
    fn test_json_report() {
        let report = report_with(vec![lap(
            1,
            FailReason::Altitude { alt_m: 150 },
            LapCompletion::Closed,
        )]);
        let json = to_json(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["has_data"], true);
        assert_eq!(value["sample_count"], 1);
        assert_eq!(value["summary"]["total_laps"], 1);
        assert_eq!(value["laps"][0]["fail_reason"], "ALTITUDE VIOLATION (150m)");
        assert_eq!(value["laps"][0]["completion"], "closed");
        assert_eq!(value["rules"]["altitude_ceiling_m"], 120.0);
        assert_eq!(value["home"]["lat"], 1.0);
        assert_eq!(value["laps"][0]["fail_kind"], "altitude");
        assert_eq!(value["laps"][0]["duration_ms"], 1000);
    }

    #[test]
    fn test_json_lap_validity_agrees_with_summary() {
        let report = report_with(vec![
            lap(1, FailReason::Clean, LapCompletion::Closed),
            lap(2, FailReason::NoFlyZone, LapCompletion::Closed),
            lap(3, FailReason::Clean, LapCompletion::Incomplete),
        ]);
        let value: serde_json::Value = serde_json::from_str(&to_json(&report).unwrap()).unwrap();

        let laps = value["laps"].as_array().unwrap();
        let counted = laps
            .iter()
            .filter(|lap| lap["counts_as_valid"] == true)
            .count();
        assert_eq!(counted as u64, value["summary"]["valid_laps"].as_u64().unwrap());
        assert_eq!(counted, 1);

        // The clean lap that never returned home broke no rule but does not count
        assert_eq!(laps[2]["is_valid"], true);
        assert_eq!(laps[2]["counts_as_valid"], false);
        assert_eq!(laps[2]["completion"], "incomplete");
    }
}
