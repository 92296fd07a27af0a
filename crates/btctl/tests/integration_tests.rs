//! Integration tests for btctl
//!
//! Every command runs against `--mock` from an empty working directory so no
//! configuration file or driver library is picked up by accident.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Custom predicate to check if output is valid JSON
fn is_json() -> impl predicates::Predicate<[u8]> {
    predicates::function::function(|s: &[u8]| {
        std::str::from_utf8(s).is_ok_and(|text| serde_json::from_str::<Value>(text).is_ok())
    })
}

/// btctl running in a fresh temporary directory
fn btctl(dir: &TempDir) -> Result<Command, Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("btctl")?;
    cmd.current_dir(dir.path())
        .env_remove("BTCTL_CONFIG")
        .env_remove("BTCTL_LIBRARY")
        .env_remove("RUST_LOG");
    Ok(cmd)
}

fn json_stdout(output: &std::process::Output) -> Result<Value, Box<dyn std::error::Error>> {
    Ok(serde_json::from_slice(&output.stdout)?)
}

fn write_effect(dir: &TempDir) -> Result<std::path::PathBuf, Box<dyn std::error::Error>> {
    let path = dir.path().join("bump.yaml");
    fs::write(
        &path,
        "name: bump\n\
         steps:\n\
         \x20 - duration_ms: 80\n\
         \x20   position: { x: 0.0, y: 0.02, z: 0.0 }\n\
         \x20 - duration_ms: 120\n",
    )?;
    Ok(path)
}

#[test]
fn test_cli_help() -> TestResult {
    let dir = TempDir::new()?;
    btctl(&dir)?
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("BlueTiger"));
    Ok(())
}

#[test]
fn test_completion_generation() -> TestResult {
    let dir = TempDir::new()?;
    btctl(&dir)?
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("btctl"));
    Ok(())
}

#[test]
fn test_status_mock() -> TestResult {
    let dir = TempDir::new()?;
    btctl(&dir)?
        .args(["--mock", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Platform status"));
    Ok(())
}

#[test]
fn test_info_json() -> TestResult {
    let dir = TempDir::new()?;
    let output = btctl(&dir)?
        .args(["--mock", "--json", "info"])
        .assert()
        .success()
        .stdout(is_json())
        .get_output()
        .clone();

    let value = json_stdout(&output)?;
    assert_eq!(value["success"], true);
    assert_eq!(value["api_version"], 101);
    assert_eq!(value["status"]["code"], 0);
    assert_eq!(value["device"]["product"], "BlueTiger (mock)");
    Ok(())
}

#[test]
fn test_missing_library_exit_code() -> TestResult {
    let dir = TempDir::new()?;
    btctl(&dir)?
        .args(["--library", "/nonexistent/libBTApi.so", "status"])
        .assert()
        .failure()
        .code(5)
        .stderr(predicate::str::contains("Driver library error"));
    Ok(())
}

#[test]
fn test_missing_config_exit_code() -> TestResult {
    let dir = TempDir::new()?;
    btctl(&dir)?
        .args(["--mock", "--config", "missing.yaml", "status"])
        .assert()
        .failure()
        .code(4);
    Ok(())
}

#[test]
fn test_error_json_format() -> TestResult {
    let dir = TempDir::new()?;
    let output = btctl(&dir)?
        .args(["--mock", "--json", "--config", "missing.yaml", "status"])
        .assert()
        .failure()
        .stdout(is_json())
        .get_output()
        .clone();

    let value = json_stdout(&output)?;
    assert_eq!(value["success"], false);
    assert_eq!(value["error"]["type"], "Config");
    Ok(())
}

#[test]
fn test_config_check_sanitizes() -> TestResult {
    let dir = TempDir::new()?;
    fs::write(
        dir.path().join("bluetiger.yaml"),
        "rotational_sensitivity: 500.0\nupdate_rate_hz: 30.0\n",
    )?;
    let output = btctl(&dir)?
        .args(["--json", "config", "check"])
        .assert()
        .success()
        .get_output()
        .clone();

    let value = json_stdout(&output)?;
    let rotational = value["config"]["rotational_sensitivity"]
        .as_f64()
        .ok_or("missing rotational_sensitivity")?;
    let rate = value["config"]["update_rate_hz"]
        .as_f64()
        .ok_or("missing update_rate_hz")?;
    assert!((rotational - 75.0).abs() < 1e-6);
    assert!((rate - 30.0).abs() < 1e-6);
    Ok(())
}

#[test]
fn test_config_legacy_file() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("settings.txt");
    fs::write(&path, "distance_sensitivity=1.5\nfeed_mode=pitch_roll\n")?;
    btctl(&dir)?
        .args(["--config", "settings.txt", "config", "check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("distance_sensitivity: 1.5"));
    Ok(())
}

#[test]
fn test_config_init_writes_file() -> TestResult {
    let dir = TempDir::new()?;
    btctl(&dir)?.args(["config", "init"]).assert().success();
    assert!(dir.path().join("bluetiger.yaml").exists());

    btctl(&dir)?
        .args(["config", "init"])
        .assert()
        .failure()
        .code(3);
    Ok(())
}

#[test]
fn test_effect_play_undefined_slot() -> TestResult {
    let dir = TempDir::new()?;
    btctl(&dir)?
        .args(["--mock", "effect", "play", "--slot", "2"])
        .assert()
        .failure()
        .code(3);
    Ok(())
}

#[test]
fn test_effect_play_with_file() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_effect(&dir)?;
    btctl(&dir)?
        .args(["--mock", "effect", "play", "--slot", "2", "--repetitions", "3"])
        .arg("--file")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("slot 2"));
    Ok(())
}

#[test]
fn test_effect_play_zero_repetitions_single_json_document() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_effect(&dir)?;
    let output = btctl(&dir)?
        .args([
            "--mock",
            "--json",
            "effect",
            "play",
            "--slot",
            "1",
            "--repetitions",
            "0",
            "--file",
        ])
        .arg(&path)
        .assert()
        .success()
        .stdout(is_json())
        .get_output()
        .clone();

    let value = json_stdout(&output)?;
    assert_eq!(value["success"], true);
    let warnings = value["warnings"].as_array().ok_or("missing warnings")?;
    assert_eq!(warnings.len(), 1);
    Ok(())
}

#[test]
fn test_effect_define_invalid_script() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("empty.json");
    fs::write(&path, r#"{"name": "nothing", "steps": []}"#)?;
    btctl(&dir)?
        .args(["--mock", "effect", "define", "--slot", "1", "--file"])
        .arg(&path)
        .assert()
        .failure()
        .code(3);
    Ok(())
}

#[test]
fn test_move_relative() -> TestResult {
    let dir = TempDir::new()?;
    btctl(&dir)?
        .args([
            "--mock",
            "move",
            "relative",
            "--position",
            "0,-0.05,0",
            "--axis",
            "1,0,0",
            "--angle",
            "0.1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Moved by"));
    Ok(())
}

#[test]
fn test_legacy_tuning_show_json() -> TestResult {
    let dir = TempDir::new()?;
    let output = btctl(&dir)?
        .args(["--mock", "--json", "legacy", "tuning", "show"])
        .assert()
        .success()
        .get_output()
        .clone();

    let value = json_stdout(&output)?;
    assert!(value["tuning"]["motion_limit_range"].is_u64());
    Ok(())
}

#[test]
fn test_legacy_invalid_mac() -> TestResult {
    let dir = TempDir::new()?;
    btctl(&dir)?
        .args([
            "--mock",
            "legacy",
            "address",
            "set",
            "--mac",
            "00:1a:2b",
            "--ip",
            "10.0.0.5",
            "--netmask",
            "255.0.0.0",
            "--router",
            "10.0.0.1",
        ])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("MAC"));
    Ok(())
}

#[test]
fn test_feed_fast_json() -> TestResult {
    let dir = TempDir::new()?;
    let frames = dir.path().join("lap.jsonl");
    fs::write(
        &frames,
        "{\"timestamp_ms\": 0, \"acceleration\": {\"x\": 0.0, \"y\": 9.8, \"z\": 0.0}}\n\
         {\"timestamp_ms\": 10, \"angular_velocity\": {\"x\": 0.0, \"y\": 5.0, \"z\": 0.0}}\n\
         {\"timestamp_ms\": 100, \"rotation\": {\"pitch\": 2.0, \"yaw\": 0.0, \"roll\": -1.0}}\n",
    )?;

    let output = btctl(&dir)?
        .args(["--mock", "--json", "feed", "--fast", "--rate", "20", "--frames"])
        .arg(&frames)
        .assert()
        .success()
        .get_output()
        .clone();

    let value = json_stdout(&output)?;
    assert_eq!(value["feed"]["frames"], 3);
    assert_eq!(value["feed"]["stats"]["sent"], 2);
    assert_eq!(value["feed"]["stats"]["throttled"], 1);
    assert_eq!(value["feed"]["stats"]["failed"], 0);
    Ok(())
}

#[test]
fn test_feed_rotation_vector_mode() -> TestResult {
    let dir = TempDir::new()?;
    let frames = dir.path().join("lap.jsonl");
    fs::write(
        &frames,
        "{\"timestamp_ms\": 0, \"rotation\": {\"pitch\": 0.5, \"yaw\": 0.0, \"roll\": 0.2}}\n\
         {\"timestamp_ms\": 100, \"rotation\": {\"pitch\": 0.6, \"yaw\": 0.1, \"roll\": 0.1}}\n",
    )?;

    let output = btctl(&dir)?
        .args(["--mock", "--json", "feed", "--fast", "--mode", "rotation-vector", "--frames"])
        .arg(&frames)
        .assert()
        .success()
        .get_output()
        .clone();

    let value = json_stdout(&output)?;
    assert_eq!(value["feed"]["stats"]["sent"], 2);
    assert_eq!(value["feed"]["stats"]["failed"], 0);
    Ok(())
}

#[test]
fn test_feed_sub_hertz_rate_from_config() -> TestResult {
    let dir = TempDir::new()?;
    fs::write(dir.path().join("bluetiger.yaml"), "update_rate_hz: 0.5\n")?;
    let frames = dir.path().join("slow.jsonl");
    fs::write(
        &frames,
        "{\"timestamp_ms\": 0}\n{\"timestamp_ms\": 1100}\n{\"timestamp_ms\": 2000}\n",
    )?;

    let output = btctl(&dir)?
        .args(["--mock", "--json", "feed", "--fast", "--frames"])
        .arg(&frames)
        .assert()
        .success()
        .get_output()
        .clone();

    let value = json_stdout(&output)?;
    assert_eq!(value["feed"]["stats"]["sent"], 2);
    assert_eq!(value["feed"]["stats"]["throttled"], 1);
    Ok(())
}

#[test]
fn test_feed_malformed_frame() -> TestResult {
    let dir = TempDir::new()?;
    let frames = dir.path().join("bad.jsonl");
    fs::write(&frames, "{\"timestamp_ms\": 0}\n{\"timestamp_ms\": -5}\n")?;
    btctl(&dir)?
        .args(["--mock", "feed", "--fast", "--frames"])
        .arg(&frames)
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("line 2"));
    Ok(())
}

#[test]
fn test_pause_with_hold() -> TestResult {
    let dir = TempDir::new()?;
    btctl(&dir)?
        .args(["--mock", "pause", "--hold-secs", "0.05"])
        .assert()
        .success()
        .stdout(predicate::str::contains("resumed"));
    Ok(())
}
