//! Integration tests for the `tartanilla` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the calendar,
//! encode, decode, and set subcommands through the actual binary. The config
//! fixture points at a closed local port, so commands that reach the network
//! fail fast instead of touching a real server.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

/// Helper: path to the snapshot.json fixture.
fn snapshot_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/snapshot.json")
}

/// Helper: path to the config.toml fixture.
fn config_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/config.toml")
}

/// Helper: the binary with the offline config and no URL override.
fn tartanilla() -> Command {
    let mut cmd = Command::cargo_bin("tartanilla").unwrap();
    cmd.env_remove("TARTANILLA_API_URL")
        .args(["--config", config_path()]);
    cmd
}

/// Helper: run `calendar --json` on the snapshot and parse the output.
fn snapshot_days() -> Vec<Value> {
    let output = tartanilla()
        .args([
            "calendar",
            "--driver",
            "42",
            "--month",
            "2025-03",
            "--snapshot",
            snapshot_path(),
            "--now",
            "2025-03-05T09:00:00",
            "--json",
        ])
        .output()
        .expect("calendar should run");
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

fn status_of<'a>(days: &'a [Value], date: &str) -> &'a str {
    days.iter()
        .find(|d| d["date"] == date)
        .and_then(|d| d["status"].as_str())
        .unwrap_or_else(|| panic!("no entry for {}", date))
}

// ─────────────────────────────────────────────────────────────────────────────
// Calendar subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn calendar_snapshot_json_resolves_every_day() {
    let days = snapshot_days();
    assert_eq!(days.len(), 31);

    assert_eq!(status_of(&days, "2025-03-03"), "past_with_booking");
    assert_eq!(status_of(&days, "2025-03-04"), "past");
    assert_eq!(status_of(&days, "2025-03-05"), "unset");
    assert_eq!(status_of(&days, "2025-03-10"), "booked");
    assert_eq!(status_of(&days, "2025-03-12"), "partial");
    assert_eq!(status_of(&days, "2025-03-15"), "available");
    assert_eq!(status_of(&days, "2025-03-22"), "unavailable");
}

#[test]
fn calendar_snapshot_renders_grid() {
    tartanilla()
        .args([
            "calendar",
            "--driver",
            "42",
            "--month",
            "2025-03",
            "--snapshot",
            snapshot_path(),
            "--now",
            "2025-03-05T09:00:00",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("2025-03\n Su  Mo  Tu  We  Th  Fr  Sa\n"))
        // March 2025 starts on a Saturday.
        .stdout(predicate::str::contains("\n                          1.\n"))
        .stdout(predicate::str::contains("  3b"))
        .stdout(predicate::str::contains(" 10B"))
        .stdout(predicate::str::contains(" 12~"))
        .stdout(predicate::str::contains(" 15+"))
        .stdout(predicate::str::contains(" 22x"))
        .stdout(predicate::str::contains("B Booked"));
}

#[test]
fn calendar_snapshot_from_stdin() {
    let snapshot = std::fs::read_to_string(snapshot_path()).expect("snapshot fixture must exist");

    tartanilla()
        .args([
            "calendar", "--driver", "42", "--month", "2025-03", "--snapshot", "-", "--now",
            "2025-03-05T09:00:00", "--json",
        ])
        .write_stdin(snapshot)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"booked\""));
}

#[test]
fn calendar_other_month_ignores_out_of_window_records() {
    tartanilla()
        .args([
            "calendar",
            "--driver",
            "42",
            "--month",
            "2025-04",
            "--snapshot",
            snapshot_path(),
            "--now",
            "2025-03-05T09:00:00",
            "--json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"2025-04-30\""))
        .stdout(predicate::str::contains("\"booked\"").not());
}

#[test]
fn calendar_rejects_invalid_month() {
    tartanilla()
        .args(["calendar", "--driver", "42", "--month", "2025-13"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("month"));
}

#[test]
fn calendar_rejects_malformed_snapshot() {
    tartanilla()
        .args(["calendar", "--driver", "42", "--month", "2025-03", "--snapshot", "-"])
        .write_stdin("not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Snapshot is not valid JSON"));
}

#[test]
fn calendar_degrades_when_the_api_is_unreachable() {
    tartanilla()
        .args([
            "calendar",
            "--driver",
            "42",
            "--month",
            "2025-03",
            "--now",
            "2025-03-05T09:00:00",
            "--json",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("warning: Could not load schedule"))
        .stdout(predicate::str::contains("\"unset\""));
}

// ─────────────────────────────────────────────────────────────────────────────
// Encode / decode subcommands
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn encode_range_prints_stored_form() {
    let output = tartanilla()
        .args(["encode", "range", "--from", "08:00", "--to", "18:00"])
        .output()
        .expect("encode should run");
    assert!(output.status.success());

    let draft: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(draft["is_available"], true);
    assert_eq!(
        draft["unavailable_times"],
        serde_json::json!(["06:00", "07:00", "18:00", "19:00", "20:00"])
    );
    assert_eq!(draft["notes"], "Available 8:00 AM - 6:00 PM");
}

#[test]
fn encode_custom_prints_stored_form() {
    let output = tartanilla()
        .args(["encode", "custom", "--slots", "13:00, 09:00"])
        .output()
        .expect("encode should run");
    assert!(output.status.success());

    let draft: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(draft["notes"], "Available: 9:00 AM, 1:00 PM");
    assert_eq!(draft["unavailable_times"].as_array().map(Vec::len), Some(13));
}

#[test]
fn encode_uses_owner_catalog_when_asked() {
    let output = tartanilla()
        .args(["--catalog", "owner", "encode", "range", "--from", "08:00", "--to", "19:00"])
        .output()
        .expect("encode should run");
    assert!(output.status.success());

    let draft: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(draft["unavailable_times"], serde_json::json!([]));
}

#[test]
fn encode_inverted_range_fails() {
    tartanilla()
        .args(["encode", "range", "--from", "15:00", "--to", "09:00"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid range end"));
}

#[test]
fn encode_empty_custom_selection_fails() {
    tartanilla()
        .args(["encode", "custom", "--slots", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No time slots selected"));
}

#[test]
fn encode_slot_outside_catalog_fails() {
    tartanilla()
        .args(["encode", "custom", "--slots", "05:00"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not in the catalog"));
}

#[test]
fn decode_contiguous_run_reopens_as_range() {
    let output = tartanilla()
        .args(["decode", "--unavailable", "06:00,07:00,18:00,19:00,20:00"])
        .output()
        .expect("decode should run");
    assert!(output.status.success());

    let mode: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        mode,
        serde_json::json!({"mode": "range", "from": "08:00", "to": "18:00"})
    );
}

#[test]
fn decode_gapped_run_reopens_as_custom() {
    let output = tartanilla()
        .args(["decode", "--unavailable", "06:00,07:00,08:00,10:00,11:00,12:00,13:00,14:00,15:00,16:00,17:00,18:00,19:00"])
        .output()
        .expect("decode should run");
    assert!(output.status.success());

    let mode: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        mode,
        serde_json::json!({"mode": "custom", "selected": ["09:00", "20:00"]})
    );
}

#[test]
fn decode_day_off_reopens_empty() {
    tartanilla()
        .args(["decode", "--day-off"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"custom\""));
}

// ─────────────────────────────────────────────────────────────────────────────
// Set subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn set_requires_an_edit() {
    tartanilla()
        .args(["set", "--driver", "42", "--date", "2025-03-21"])
        .assert()
        .failure();
}

#[test]
fn set_rejects_two_edits_at_once() {
    tartanilla()
        .args([
            "set", "--driver", "42", "--date", "2025-03-21", "--day-off", "--slots", "09:00",
        ])
        .assert()
        .failure();
}

#[test]
fn set_refuses_past_dates() {
    tartanilla()
        .args([
            "set",
            "--driver",
            "42",
            "--date",
            "2025-03-01",
            "--range",
            "08:00-18:00",
            "--now",
            "2025-03-05T09:00:00",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("past date"));
}

#[test]
fn set_refuses_range_starting_in_the_past() {
    tartanilla()
        .args([
            "set",
            "--driver",
            "42",
            "--date",
            "2025-03-05",
            "--range",
            "09:00-18:00",
            "--now",
            "2025-03-05T15:10:00",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Start time 09:00 has already passed"));
}

#[test]
fn set_asks_before_saving_a_trimmed_selection() {
    tartanilla()
        .args([
            "set",
            "--driver",
            "42",
            "--date",
            "2025-03-05",
            "--slots",
            "13:00,16:00,17:00",
            "--now",
            "2025-03-05T15:10:00",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 selected slot(s) already passed"))
        .stderr(predicate::str::contains("16:00, 17:00"))
        .stderr(predicate::str::contains("--accept-trimmed"));
}

#[test]
fn set_reports_unreachable_api() {
    tartanilla()
        .args([
            "set",
            "--driver",
            "42",
            "--date",
            "2025-03-21",
            "--range",
            "08:00-18:00",
            "--now",
            "2025-03-05T09:00:00",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to save availability for 2025-03-21"));
}

#[test]
fn set_rejects_malformed_range() {
    tartanilla()
        .args(["set", "--driver", "42", "--date", "2099-01-01", "--range", "08:00"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Range must look like"));
}

// ─────────────────────────────────────────────────────────────────────────────
// General
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn help_lists_subcommands() {
    Command::cargo_bin("tartanilla")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("calendar"))
        .stdout(predicate::str::contains("encode"))
        .stdout(predicate::str::contains("decode"))
        .stdout(predicate::str::contains("set"));
}

#[test]
fn malformed_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "timeout_secs = \"soon\"\n").unwrap();

    Command::cargo_bin("tartanilla")
        .unwrap()
        .args(["--config", path.to_str().unwrap(), "decode", "--day-off"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}
