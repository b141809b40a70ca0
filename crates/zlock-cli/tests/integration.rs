//! Integration tests for the `zlock` binary.

use std::fmt::Write as _;
use std::process::Command;

fn zlock_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_zlock"))
}

fn run_ok(cmd: &mut Command) -> String {
    let output = cmd.output().expect("failed to run zlock");
    assert!(
        output.status.success(),
        "zlock failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

// ---------------------------------------------------------------------------
// zlock config
// ---------------------------------------------------------------------------

#[test]
fn config_prints_default_toml() {
    let stdout = run_ok(zlock_bin().arg("config"));
    assert!(stdout.contains("carrier_vpp"));
    assert!(stdout.contains("adc_jitter_sec"));
    assert!(stdout.contains("seed = 42"));
}

#[test]
fn config_writes_file_that_simulate_accepts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("zlock.toml");
    run_ok(zlock_bin().args(["config", "--output"]).arg(&path));
    assert!(path.exists());

    let stdout = run_ok(
        zlock_bin()
            .args(["simulate", "--duration-ms", "2", "--config"])
            .arg(&path),
    );
    assert!(stdout.contains("Envelope recovery"));
}

// ---------------------------------------------------------------------------
// zlock impedance
// ---------------------------------------------------------------------------

#[test]
fn impedance_sweep_prints_requested_points() {
    let stdout = run_ok(zlock_bin().args([
        "impedance", "--model", "series-rc", "-r", "1000", "-c", "1e-6", "--start", "10", "--stop",
        "1e6", "--points", "6",
    ]));
    let rows: Vec<&str> = stdout
        .lines()
        .filter(|l| l.trim_start().starts_with(|c: char| c.is_ascii_digit()))
        .collect();
    assert_eq!(rows.len(), 6);
    assert!(stdout.contains("series-rc"));
}

#[test]
fn impedance_rejects_unknown_model_and_bad_range() {
    let out = zlock_bin()
        .args(["impedance", "--model", "parallel-rl"])
        .output()
        .unwrap();
    assert!(!out.status.success());

    let out = zlock_bin()
        .args(["impedance", "--start", "1e6", "--stop", "10"])
        .output()
        .unwrap();
    assert!(!out.status.success());
}

// ---------------------------------------------------------------------------
// zlock simulate
// ---------------------------------------------------------------------------

#[test]
fn simulate_json_report_for_synthetic_pulse() {
    let stdout = run_ok(zlock_bin().args([
        "simulate",
        "--json",
        "--duration-ms",
        "2",
        "--set",
        "dac_inl_lsb=0",
        "--set",
        "adc_inl_lsb=0",
    ]));
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["samples"].as_u64().unwrap() / 1000, 19);
    assert!((report["envelope_peak"].as_f64().unwrap() - 0.01).abs() < 1e-12);
    assert!(report["recovery"]["correlation"].as_f64().unwrap() > 0.9);
    assert_eq!(report["config"]["seed"], 42);
    assert!(report["step"].is_object());
}

#[test]
fn simulate_clamps_out_of_range_knobs() {
    let output = zlock_bin()
        .args(["simulate", "--json", "--duration-ms", "1", "--set", "adc_bits=99"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["config"]["adc_bits"], 24);
    assert!(String::from_utf8_lossy(&output.stderr).contains("clamped"));
}

#[test]
fn simulate_rejects_unknown_knob() {
    let output = zlock_bin()
        .args(["simulate", "--set", "volume=11"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn simulate_from_recorded_envelope() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.txt");
    let mut text = String::new();
    for i in 0..400 {
        let v = if (150..200).contains(&i) { 0.02 } else { 0.0 };
        writeln!(text, "{v}").unwrap();
    }
    std::fs::write(&path, text).unwrap();

    let stdout = run_ok(zlock_bin().args(["simulate", "--json", "--envelope"]).arg(&path));
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!((report["envelope_peak"].as_f64().unwrap() - 0.02).abs() < 1e-12);
    assert!(report["step"].is_null());
}
