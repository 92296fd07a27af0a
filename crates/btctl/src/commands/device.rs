//! Status, information and pause/resume commands

use std::time::Duration;

use bluetiger::{BtStatusCode, LegacyConfiguration, MotionPlatform};

use super::{Context, open_session};
use crate::error::CliError;
use crate::output;

/// Report `BTStatus`. A non-zero status is an error.
pub fn status(ctx: &Context) -> Result<(), CliError> {
    let backend = ctx.backend()?;
    let session = open_session(&*backend, &ctx.config)?;
    let raw = session.status();
    output::print_status(raw, ctx.json);
    session.close()?;

    match BtStatusCode::from_code(raw) {
        Some(code) if code.is_success() => Ok(()),
        Some(code) => Err(CliError::Device(format!("platform reports {code}"))),
        None => Err(CliError::Device(format!(
            "platform reports undocumented status {raw}"
        ))),
    }
}

pub fn info(ctx: &Context) -> Result<(), CliError> {
    let backend = ctx.backend()?;
    let session = open_session(&*backend, &ctx.config)?;
    let api_version = session.check_version();
    let device = backend.device_information()?;
    output::print_info(session.status(), api_version, &device, ctx.json);
    session.close()?;
    Ok(())
}

/// Pause motion, optionally holding the pause before resuming.
pub async fn pause(ctx: &Context, hold_secs: Option<f64>) -> Result<(), CliError> {
    let hold = hold_secs
        .map(|secs| {
            Duration::try_from_secs_f64(secs)
                .map_err(|e| CliError::InvalidInput(format!("--hold-secs {secs}: {e}")))
        })
        .transpose()?;

    let backend = ctx.backend()?;
    let mut session = open_session(&*backend, &ctx.config)?;
    session.pause()?;

    match hold {
        Some(hold) => {
            tracing::info!(hold_ms = hold.as_millis() as u64, "holding pause");
            tokio::time::sleep(hold).await;
            session.resume()?;
            output::print_success(
                &format!("Motion paused for {:.1}s and resumed", hold.as_secs_f64()),
                ctx.json,
            );
        }
        None => output::print_success("Motion paused", ctx.json),
    }
    session.close()?;
    Ok(())
}

/// `BTResume` on a fresh session.
pub fn resume(ctx: &Context) -> Result<(), CliError> {
    let backend = ctx.backend()?;
    let session = open_session(&*backend, &ctx.config)?;
    // The driver may still be paused from an earlier process.
    backend.resume()?;
    output::print_success("Motion resumed", ctx.json);
    session.close()?;
    Ok(())
}
