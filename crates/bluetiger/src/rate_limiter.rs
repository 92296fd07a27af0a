//! Submission rate limiting.
//!
//! The platform controller accepts motion updates at a modest rate; frames
//! arriving faster than that are dropped rather than queued.

use std::time::{Duration, Instant};

/// Rate used when the requested one is not a positive finite number.
pub const FALLBACK_RATE_HZ: f32 = 1.0;

pub struct RateLimiter {
    max_rate_hz: f32,
    min_interval: Duration,
    last_processed: Option<Instant>,
    dropped_count: u64,
    processed_count: u64,
}

fn interval_for(rate_hz: f32) -> Duration {
    // Rates so low that the interval overflows never open a second slot.
    Duration::try_from_secs_f64(1.0 / f64::from(rate_hz)).unwrap_or(Duration::MAX)
}

fn effective_rate(rate_hz: f32) -> f32 {
    if rate_hz.is_finite() && rate_hz > 0.0 {
        rate_hz
    } else {
        tracing::warn!(
            requested = rate_hz,
            fallback = FALLBACK_RATE_HZ,
            "invalid submission rate, using fallback"
        );
        FALLBACK_RATE_HZ
    }
}

impl RateLimiter {
    /// Create a limiter allowing at most `max_rate_hz` submissions per second.
    pub fn new(max_rate_hz: f32) -> Self {
        let rate = effective_rate(max_rate_hz);
        Self {
            max_rate_hz: rate,
            min_interval: interval_for(rate),
            last_processed: None,
            dropped_count: 0,
            processed_count: 0,
        }
    }

    pub fn should_process(&mut self) -> bool {
        self.should_process_at(Instant::now())
    }

    /// Same as [`RateLimiter::should_process`] with an explicit clock.
    pub fn should_process_at(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_processed
            && now.saturating_duration_since(last) < self.min_interval
        {
            self.dropped_count += 1;
            return false;
        }

        self.last_processed = Some(now);
        self.processed_count += 1;
        true
    }

    /// Wait until a slot is free, then take it.
    pub async fn wait_for_slot(&mut self) {
        if let Some(last) = self.last_processed {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }

        self.last_processed = Some(Instant::now());
        self.processed_count += 1;
    }

    pub fn dropped_count(&self) -> u64 {
        self.dropped_count
    }

    pub fn processed_count(&self) -> u64 {
        self.processed_count
    }

    /// Current drop rate in percent.
    pub fn drop_rate_percent(&self) -> f32 {
        let total = self.dropped_count + self.processed_count;
        if total == 0 {
            0.0
        } else {
            (self.dropped_count as f32 / total as f32) * 100.0
        }
    }

    pub fn reset_stats(&mut self) {
        self.dropped_count = 0;
        self.processed_count = 0;
    }

    pub fn max_rate_hz(&self) -> f32 {
        self.max_rate_hz
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Rates that are not positive and finite become [`FALLBACK_RATE_HZ`].
    pub fn set_max_rate_hz(&mut self, max_rate_hz: f32) {
        let rate = effective_rate(max_rate_hz);
        self.max_rate_hz = rate;
        self.min_interval = interval_for(rate);
    }
}
