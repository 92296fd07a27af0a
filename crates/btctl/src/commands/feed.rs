//! Replay recorded simulator telemetry onto the platform

use std::time::Instant;

use bluetiger::{FeedOutcome, MotionFeeder, SimFrame};

use super::{Context, FeedArgs, open_session};
use crate::error::CliError;
use crate::output::{self, FeedSummary};

/// Parse JSON-lines frames. Blank lines and `#` comments are skipped.
pub fn parse_frames(text: &str) -> Result<Vec<SimFrame>, CliError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(index, line)| {
            serde_json::from_str(line)
                .map_err(|e| CliError::InvalidInput(format!("frame on line {}: {e}", index + 1)))
        })
        .collect()
}

pub async fn execute(args: &FeedArgs, ctx: &Context) -> Result<(), CliError> {
    let text = std::fs::read_to_string(&args.frames)
        .map_err(|e| CliError::InvalidInput(format!("{}: {e}", args.frames.display())))?;
    let frames = parse_frames(&text)?;
    if frames.is_empty() {
        return Err(CliError::InvalidInput(format!(
            "{} contains no frames",
            args.frames.display()
        )));
    }

    let rate = args.rate.unwrap_or(ctx.config.update_rate_hz);
    if !rate.is_finite() || rate <= 0.0 {
        return Err(CliError::InvalidInput(format!(
            "update rate must be positive, got {rate}"
        )));
    }
    let mode = args.mode.map_or(ctx.config.feed_mode, Into::into);

    let backend = ctx.backend()?;
    let session = open_session(&*backend, &ctx.config)?;
    let mut feeder = MotionFeeder::new(ctx.config.sensitivity(), rate, mode);
    tracing::info!(frames = frames.len(), rate_hz = rate, ?mode, "feeding telemetry");

    let start = Instant::now();
    for frame in &frames {
        let at = start + frame.timestamp;
        if !args.fast {
            tokio::time::sleep_until(tokio::time::Instant::from_std(at)).await;
        }
        if let FeedOutcome::Failed(err) = feeder.update_at(&session, frame, at) {
            tracing::debug!(error = %err, timestamp_ms = frame.timestamp.as_millis() as u64, "frame not delivered");
        }
    }
    session.close()?;

    let stats = feeder.stats();
    let summary = FeedSummary {
        frames: frames.len(),
        stats,
        drop_rate_percent: feeder.limiter().drop_rate_percent(),
    };
    output::print_feed_summary(&summary, ctx.json);

    if stats.sent == 0 && stats.failed > 0 {
        return Err(CliError::Device(format!(
            "all {} submitted frames failed",
            stats.failed
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_parse_frames_skips_blank_and_comments() -> Result<(), CliError> {
        let text = "# recorded lap\n{\"timestamp_ms\": 0}\n\n{\"timestamp_ms\": 50, \"acceleration\": {\"x\": 1.0, \"y\": 0.0, \"z\": 0.0}}\n";
        let frames = parse_frames(text)?;
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].timestamp, Duration::from_millis(50));
        Ok(())
    }

    #[test]
    fn test_parse_frames_reports_line() {
        let text = "{\"timestamp_ms\": 0}\nnot json\n";
        match parse_frames(text) {
            Err(CliError::InvalidInput(msg)) => assert!(msg.contains("line 2"), "{msg}"),
            other => panic!("expected invalid input, got {other:?}"),
        }
    }
}
