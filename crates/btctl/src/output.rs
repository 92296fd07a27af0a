//! Output formatting for CLI responses

use anyhow::Error;
use bluetiger::config::PlatformConfig;
use bluetiger::{
    BTAPI_VERSION, BtStatusCode, DeviceInfo, DiagnosticStatus, FeederStats, NetworkAddress,
    TuningParameters,
};
use colored::*;
use serde::Serialize;
use serde_json::{Value, json};

use crate::error::CliError;

fn emit(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Failed to format output as JSON: {e}"),
    }
}

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    let kind = error
        .downcast_ref::<CliError>()
        .map_or("Other", error_kind);
    emit(&json!({
        "success": false,
        "error": {
            "message": error.to_string(),
            "type": kind,
        }
    }));
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    let mut source = error.source();
    while let Some(err) = source {
        eprintln!("  {} {}", "Caused by:".yellow(), err);
        source = err.source();
    }
}

fn error_kind(error: &CliError) -> &'static str {
    match error {
        CliError::Device(_) => "Device",
        CliError::InvalidInput(_) | CliError::Json(_) | CliError::Yaml(_) => "InvalidInput",
        CliError::Config(_) => "Config",
        CliError::Library(_) => "Library",
        CliError::Io(_) => "Io",
    }
}

pub fn print_success(message: &str, json: bool) {
    print_success_with_warnings(message, &[], json);
}

/// Success with caveats; JSON output stays a single document.
pub fn print_success_with_warnings(message: &str, warnings: &[String], json: bool) {
    if json {
        let mut value = json!({ "success": true, "message": message });
        if !warnings.is_empty() {
            value["warnings"] = json!(warnings);
        }
        emit(&value);
    } else {
        for warning in warnings {
            println!("{} {}", "⚠".yellow(), warning);
        }
        println!("{} {}", "✓".green(), message);
    }
}

pub fn print_warning(message: &str, json: bool) {
    if json {
        emit(&json!({ "success": true, "warning": message }));
    } else {
        println!("{} {}", "⚠".yellow(), message);
    }
}

fn status_json(raw: u16) -> Value {
    json!({
        "code": raw,
        "description": BtStatusCode::from_code(raw).map_or("undocumented status", BtStatusCode::description),
    })
}

fn status_line(raw: u16) -> String {
    match BtStatusCode::from_code(raw) {
        Some(code) if code.is_success() => code.to_string().green().to_string(),
        Some(code) => code.to_string().red().to_string(),
        None => format!("undocumented status ({raw})").red().to_string(),
    }
}

pub fn print_status(raw: u16, json: bool) {
    if json {
        emit(&json!({ "success": true, "status": status_json(raw) }));
    } else {
        println!("{} {}", "Platform status:".bold(), status_line(raw));
    }
}

pub fn print_info(raw_status: u16, api_version: u16, device: &DeviceInfo, json: bool) {
    if json {
        emit(&json!({
            "success": true,
            "status": status_json(raw_status),
            "api_version": api_version,
            "bindings_api_version": BTAPI_VERSION,
            "device": device,
        }));
        return;
    }

    println!("{}", "BlueTiger platform".bold());
    println!("  Status: {}", status_line(raw_status));
    let version = if api_version == BTAPI_VERSION {
        api_version.to_string().green()
    } else {
        format!("{api_version} (bindings expect {BTAPI_VERSION})").yellow()
    };
    println!("  Driver API version: {version}");
    println!("  Company: {}", device.company);
    println!("  Product: {}", device.product);
    println!("  Firmware: {}", device.version);
    println!("  Device API version: {}", device.api_version);
}

pub fn print_address(address: &NetworkAddress, json: bool) {
    if json {
        emit(&json!({ "success": true, "address": address }));
        return;
    }
    println!("{}", "Network address".bold());
    println!("  MAC: {}", address.mac);
    println!("  IP: {}", address.ip);
    println!("  Netmask: {}", address.netmask);
    println!("  Router: {}", address.router);
    let mode = if address.dynamic { "dynamic" } else { "static" };
    println!("  Addressing: {mode}");
}

pub fn print_tuning(tuning: &TuningParameters, json: bool) {
    if json {
        emit(&json!({ "success": true, "tuning": tuning }));
        return;
    }
    println!("{}", "Tuning parameters".bold());
    println!("  Motion limit range: {}", tuning.motion_limit_range);
    println!("  Acceleration pitch: {}", tuning.acceleration_pitch);
    println!("  Acceleration roll: {}", tuning.acceleration_roll);
    println!("  Position pitch: {}", tuning.position_pitch);
    println!("  Position roll: {}", tuning.position_roll);
    println!("  Effect scaling: {}", tuning.effect_scaling);
}

pub fn print_diagnostic(status: &DiagnosticStatus, json: bool) {
    if json {
        emit(&json!({ "success": true, "diagnostic": status }));
    } else {
        println!(
            "{} id {} status {}",
            "Diagnostic:".bold(),
            status.id,
            status.status
        );
    }
}

#[derive(Serialize)]
pub struct FeedSummary {
    pub frames: usize,
    pub stats: FeederStats,
    pub drop_rate_percent: f32,
}

pub fn print_feed_summary(summary: &FeedSummary, json: bool) {
    if json {
        emit(&json!({ "success": true, "feed": summary }));
        return;
    }
    println!("{}", "Feed complete".bold());
    println!("  Frames: {}", summary.frames);
    println!("  Sent: {}", summary.stats.sent.to_string().green());
    if summary.stats.skipped > 0 {
        println!("  Skipped (paused): {}", summary.stats.skipped);
    }
    println!("  Throttled: {}", summary.stats.throttled);
    let failed = summary.stats.failed.to_string();
    if summary.stats.failed > 0 {
        println!("  Failed: {}", failed.red());
    } else {
        println!("  Failed: {failed}");
    }
    println!("  Drop rate: {:.1}%", summary.drop_rate_percent);
}

pub fn print_config(config: &PlatformConfig, json: bool) -> Result<(), CliError> {
    if json {
        emit(&json!({
            "success": true,
            "config": config,
            "library_path": config.resolved_library_path(),
        }));
    } else {
        println!("{}", "Effective configuration".bold());
        println!(
            "  Driver library: {}",
            config.resolved_library_path().display()
        );
        print!("{}", serde_yaml::to_string(config)?);
    }
    Ok(())
}
