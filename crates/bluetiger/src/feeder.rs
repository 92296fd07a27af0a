//! Maps simulator frames and submits them at a bounded rate.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::error::BtError;
use crate::motion::{MappedMotion, MotionMapper, Sensitivity, SimFrame};
use crate::platform::MotionPlatform;
use crate::rate_limiter::RateLimiter;
use crate::session::Session;

/// Which driver entry point receives the mapped motion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedMode {
    /// `BTAccelerationData` with the full twelve-value sample.
    #[default]
    Acceleration,
    /// `BTPitchRollData` with the clamped tilt angles.
    PitchRoll,
    /// `BTRotationVectorData` with pitch, yaw and roll as one axis-angle.
    RotationVector,
}

#[derive(Debug)]
pub enum FeedOutcome {
    Sent(MappedMotion),
    /// The session is paused; nothing was submitted.
    Skipped,
    Throttled,
    Failed(BtError),
}

impl FeedOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, FeedOutcome::Sent(_))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FeederStats {
    pub sent: u64,
    pub skipped: u64,
    pub throttled: u64,
    pub failed: u64,
}

pub struct MotionFeeder {
    mapper: MotionMapper,
    limiter: RateLimiter,
    mode: FeedMode,
    stats: FeederStats,
}

impl MotionFeeder {
    pub fn new(sensitivity: Sensitivity, rate_hz: f32, mode: FeedMode) -> Self {
        Self {
            mapper: MotionMapper::new(sensitivity),
            limiter: RateLimiter::new(rate_hz),
            mode,
            stats: FeederStats::default(),
        }
    }

    pub fn mode(&self) -> FeedMode {
        self.mode
    }

    pub fn stats(&self) -> FeederStats {
        self.stats
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn update<P: MotionPlatform>(&mut self, session: &Session<P>, frame: &SimFrame) -> FeedOutcome {
        self.update_at(session, frame, Instant::now())
    }

    /// Map `frame` and submit it through `session` if the limiter has a slot
    /// at `now`.
    ///
    /// Every frame is mapped so that derived rotational acceleration stays
    /// continuous across throttled and paused frames. Paused frames do not
    /// take a limiter slot.
    pub fn update_at<P: MotionPlatform>(
        &mut self,
        session: &Session<P>,
        frame: &SimFrame,
        now: Instant,
    ) -> FeedOutcome {
        let motion = self.mapper.map(frame);
        if session.is_paused() {
            self.stats.skipped += 1;
            return FeedOutcome::Skipped;
        }
        if !self.limiter.should_process_at(now) {
            self.stats.throttled += 1;
            return FeedOutcome::Throttled;
        }

        tracing::trace!(mode = ?self.mode, "submitting motion");
        let result = match self.mode {
            FeedMode::Acceleration => session.acceleration(&motion.sample),
            FeedMode::PitchRoll => session.pitch_roll(motion.pitch, motion.roll),
            FeedMode::RotationVector => session.rotation_vector(motion.rotation_vector()),
        };

        match result {
            Ok(true) => {
                self.stats.sent += 1;
                FeedOutcome::Sent(motion)
            }
            Ok(false) => {
                self.stats.skipped += 1;
                FeedOutcome::Skipped
            }
            Err(err) => {
                self.stats.failed += 1;
                tracing::warn!(error = %err, "failed to move BlueTiger motion platform");
                FeedOutcome::Failed(err)
            }
        }
    }

    /// Clear mapping history and counters.
    pub fn reset(&mut self) {
        self.mapper.reset();
        self.limiter.reset_stats();
        self.stats = FeederStats::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BtResult, BtStatusCode};
    use crate::mock::{MockCall, MockPlatform};
    use crate::types::Identity;
    use std::time::Duration;

    fn open(mock: &MockPlatform) -> BtResult<Session<&MockPlatform>> {
        Session::open(mock, &Identity::default())
    }

    #[test]
    fn test_throttles_between_slots() -> BtResult<()> {
        let mock = MockPlatform::new();
        let session = open(&mock)?;
        let mut feeder = MotionFeeder::new(Sensitivity::default(), 20.0, FeedMode::Acceleration);
        let t0 = Instant::now();
        let frame = SimFrame::default();

        assert!(feeder.update_at(&session, &frame, t0).is_sent());
        assert!(matches!(
            feeder.update_at(&session, &frame, t0 + Duration::from_millis(20)),
            FeedOutcome::Throttled
        ));
        assert!(feeder.update_at(&session, &frame, t0 + Duration::from_millis(60)).is_sent());

        assert_eq!(
            feeder.stats(),
            FeederStats {
                sent: 2,
                skipped: 0,
                throttled: 1,
                failed: 0
            }
        );
        Ok(())
    }

    #[test]
    fn test_pitch_roll_mode() -> BtResult<()> {
        let mock = MockPlatform::new();
        let session = open(&mock)?;
        let mut feeder = MotionFeeder::new(
            Sensitivity {
                distance: 1.0,
                rotational: 1.0,
            },
            20.0,
            FeedMode::PitchRoll,
        );
        let mut frame = SimFrame::default();
        frame.rotation.pitch = 90.0;
        feeder.update(&session, &frame);

        match mock.last_call() {
            Some(MockCall::PitchRoll { pitch, roll }) => {
                assert!((pitch - std::f32::consts::FRAC_PI_4).abs() < 1e-6);
                assert!(roll.abs() < 1e-6);
            }
            other => panic!("unexpected call {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn test_rotation_vector_mode() -> BtResult<()> {
        let mock = MockPlatform::new();
        let session = open(&mock)?;
        let mut feeder = MotionFeeder::new(
            Sensitivity {
                distance: 1.0,
                rotational: 1.0,
            },
            20.0,
            FeedMode::RotationVector,
        );
        let mut frame = SimFrame::default();
        frame.rotation.roll = 10.0;
        assert!(feeder.update(&session, &frame).is_sent());

        match mock.last_call() {
            Some(MockCall::RotationVector(rotation)) => {
                assert!((rotation.axis.z - 1.0).abs() < 1e-6);
                assert!((rotation.angle - 10.0_f32.to_radians()).abs() < 1e-5);
            }
            other => panic!("unexpected call {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn test_paused_session_skips_submission() -> BtResult<()> {
        let mock = MockPlatform::new();
        let mut session = open(&mock)?;
        let mut feeder = MotionFeeder::new(Sensitivity::default(), 20.0, FeedMode::Acceleration);
        let t0 = Instant::now();

        session.pause()?;
        let calls_before = mock.calls().len();
        assert!(matches!(
            feeder.update_at(&session, &SimFrame::default(), t0),
            FeedOutcome::Skipped
        ));
        assert_eq!(mock.calls().len(), calls_before);
        assert_eq!(feeder.limiter().processed_count(), 0);

        session.resume()?;
        assert!(feeder.update_at(&session, &SimFrame::default(), t0).is_sent());
        assert_eq!(feeder.stats().skipped, 1);
        assert_eq!(feeder.stats().sent, 1);
        Ok(())
    }

    #[test]
    fn test_sub_hertz_rate_throttles() -> BtResult<()> {
        let mock = MockPlatform::new();
        let session = open(&mock)?;
        let mut feeder = MotionFeeder::new(Sensitivity::default(), 0.5, FeedMode::Acceleration);
        let t0 = Instant::now();

        assert!(feeder.update_at(&session, &SimFrame::default(), t0).is_sent());
        assert!(matches!(
            feeder.update_at(&session, &SimFrame::default(), t0 + Duration::from_millis(1100)),
            FeedOutcome::Throttled
        ));
        Ok(())
    }

    #[test]
    fn test_failures_are_counted_not_fatal() -> BtResult<()> {
        let mock = MockPlatform::new();
        let session = open(&mock)?;
        mock.fail_with(BtStatusCode::CommFail);
        let mut feeder = MotionFeeder::new(Sensitivity::default(), 20.0, FeedMode::Acceleration);
        let t0 = Instant::now();

        let outcome = feeder.update_at(&session, &SimFrame::default(), t0);
        assert!(matches!(outcome, FeedOutcome::Failed(ref e) if e.is_retryable()));

        mock.clear_failure();
        assert!(
            feeder
                .update_at(&session, &SimFrame::default(), t0 + Duration::from_secs(1))
                .is_sent()
        );
        assert_eq!(feeder.stats().failed, 1);
        assert_eq!(feeder.stats().sent, 1);
        Ok(())
    }

    #[test]
    fn test_reset_clears_counters() -> BtResult<()> {
        let mock = MockPlatform::new();
        let session = open(&mock)?;
        let mut feeder = MotionFeeder::new(Sensitivity::default(), 20.0, FeedMode::Acceleration);
        feeder.update(&session, &SimFrame::default());
        feeder.reset();
        assert_eq!(feeder.stats(), FeederStats::default());
        assert_eq!(feeder.limiter().processed_count(), 0);
        Ok(())
    }
}
