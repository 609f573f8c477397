//! CLI surface: every query mode in text and JSON, plus config handling.

#[path = "common/mod.rs"]
mod common;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn cli(tmp: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("video_capabilities"));
    // Keep user configuration out of the way.
    cmd.env_remove("VIDEO_CAPABILITIES_CONFIG");
    cmd.env_remove("XDG_CONFIG_HOME");
    cmd.env("HOME", tmp.path());
    cmd.current_dir(tmp.path());
    cmd
}

fn json_output(cmd: &mut Command) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let output = cmd.assert().success().get_output().stdout.clone();
    Ok(serde_json::from_slice(&output)?)
}

#[test]
fn lists_ranges_as_json() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    let device = common::write_device(&tmp, "hlg.toml", common::HLG_DEVICE);

    let v = json_output(
        cli(&tmp)
            .arg(&device)
            .args(["--list-ranges", "--output", "json"]),
    )?;
    assert_eq!(v["device"], "hlg camera");
    assert_eq!(v["stabilization_supported"], true);
    assert_eq!(v["dynamic_ranges"], serde_json::json!(["sdr/8", "hlg/10"]));
    Ok(())
}

#[test]
fn lists_qualities_for_wildcard_range() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    let device = common::write_device(&tmp, "sdr.toml", common::SDR_DEVICE);

    cli(&tmp)
        .arg(&device)
        .args(["--list-qualities", "--dynamic-range", "unspecified"])
        .assert()
        .success()
        .stdout(predicate::eq("fhd\nhd\n"));

    cli(&tmp)
        .arg(&device)
        .args(["--list-qualities", "--dynamic-range", "hdr-unspecified"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    Ok(())
}

#[test]
fn nearest_query_reports_profile_or_none() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    let device = common::write_device(&tmp, "sdr.toml", common::SDR_DEVICE);

    let v = json_output(
        cli(&tmp)
            .arg(&device)
            .args(["--nearest", "1280x720", "--output", "json"]),
    )?;
    assert_eq!(v["dynamic_range"], "sdr/8");
    assert_eq!(v["quality"], "hd");
    assert_eq!(v["profiles"]["video_profiles"][0]["width"], 1280);
    assert_eq!(v["profiles"]["audio_profiles"][0]["codec"], "aac");

    let v = json_output(
        cli(&tmp)
            .arg(&device)
            .args(["--nearest", "1920x1081", "--output", "json"]),
    )?;
    assert_eq!(v["quality"], "none");
    assert!(v["profiles"].is_null());

    cli(&tmp)
        .arg(&device)
        .args(["--nearest", "1920x1081"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1920x1081 -> none"));
    Ok(())
}

#[test]
fn quality_query_text_output() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    let device = common::write_device(&tmp, "hlg.toml", common::HLG_DEVICE);

    cli(&tmp)
        .arg(&device)
        .args(["--quality", "1080p", "-d", "hlg/10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hlg/10 fhd: 1920x1080 hevc"));

    cli(&tmp)
        .arg(&device)
        .args(["--quality", "uhd"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sdr/8 uhd: unsupported"));
    Ok(())
}

#[test]
fn summary_is_default_output() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    let device = common::write_device(&tmp, "quirky.toml", common::QUIRKY_DEVICE);

    let v = json_output(cli(&tmp).arg(&device).args(["--output", "json"]))?;
    assert_eq!(v["device"], "quirky camera");
    let ranges = v["dynamic_ranges"].as_array().expect("array of ranges");
    assert_eq!(ranges.len(), 2);
    assert_eq!(ranges[0]["dynamic_range"], "sdr/8");
    assert_eq!(ranges[0]["qualities"][0]["quality"], "fhd");
    assert_eq!(ranges[0]["qualities"][0]["resolution"]["height"], 1088);
    Ok(())
}

#[test]
fn query_flags_are_exclusive() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    let device = common::write_device(&tmp, "sdr.toml", common::SDR_DEVICE);

    cli(&tmp)
        .arg(&device)
        .args(["--list-ranges", "--list-qualities"])
        .assert()
        .failure();
    Ok(())
}

#[test]
fn rejects_bad_arguments() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    let device = common::write_device(&tmp, "sdr.toml", common::SDR_DEVICE);

    cli(&tmp)
        .arg(&device)
        .args(["--dynamic-range", "hlg/12"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown bit depth"));

    cli(&tmp)
        .arg(&device)
        .args(["--nearest", "wide"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("WIDTHxHEIGHT"));
    Ok(())
}

#[test]
fn missing_device_file_fails() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;

    cli(&tmp)
        .assert()
        .failure()
        .stderr(predicate::str::contains("<DEVICE_FILE> is required"));

    cli(&tmp)
        .arg(tmp.path().join("absent.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read device description"));
    Ok(())
}

#[test]
fn device_without_profiles_is_a_fatal_error() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    let device = common::write_device(&tmp, "bare.toml", "name = \"bare\"\n");

    cli(&tmp)
        .arg(&device)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no encoder profiles provider"));
    Ok(())
}

#[test]
fn config_file_supplies_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    common::write_device(&tmp, "hlg.toml", common::HLG_DEVICE);
    let config = tmp.path().join("settings.toml");
    fs::write(
        &config,
        "device_file = \"hlg.toml\"\ndynamic_range = \"hlg/10\"\noutput = \"json\"\n",
    )?;

    let v = json_output(
        cli(&tmp)
            .arg("--config-file")
            .arg(&config)
            .arg("--list-qualities"),
    )?;
    assert_eq!(v["dynamic_range"], "hlg/10");
    assert_eq!(v["qualities"], serde_json::json!(["fhd", "hd"]));

    // Command line values win over the config file.
    cli(&tmp)
        .arg("--config-file")
        .arg(&config)
        .args(["--list-qualities", "--output", "text", "-d", "sdr"])
        .assert()
        .success()
        .stdout(predicate::eq("fhd\nhd\n"));
    Ok(())
}

#[test]
fn config_is_discovered_in_working_directory() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    common::write_device(&tmp, "sdr.toml", common::SDR_DEVICE);
    fs::write(
        tmp.path().join("video-capabilities.toml"),
        "device_file = \"sdr.toml\"\n",
    )?;

    cli(&tmp)
        .arg("--list-ranges")
        .assert()
        .success()
        .stdout(predicate::eq("sdr/8\n"));
    Ok(())
}

#[test]
fn command_line_output_wins_over_config() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    let device = common::write_device(&tmp, "sdr.toml", common::SDR_DEVICE);
    let config = tmp.path().join("json.toml");
    fs::write(&config, "output = \"json\"\n")?;

    let v = json_output(
        cli(&tmp)
            .env("VIDEO_CAPABILITIES_CONFIG", &config)
            .arg(&device)
            .arg("--list-ranges"),
    )?;
    assert_eq!(v["dynamic_ranges"], serde_json::json!(["sdr/8"]));

    cli(&tmp)
        .env("VIDEO_CAPABILITIES_CONFIG", &config)
        .arg(&device)
        .args(["--list-ranges", "--output", "text"])
        .assert()
        .success()
        .stdout(predicate::eq("sdr/8\n"));
    Ok(())
}
