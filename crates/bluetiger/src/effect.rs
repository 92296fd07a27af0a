//! Effect scripting.
//!
//! An effect is a keyframe script stored in a numbered driver slot and
//! replayed with an amplitude and a repetition count.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::api::MAX_EFFECT_STEPS;
use crate::error::{BtError, BtResult};
use crate::platform::MotionPlatform;
use crate::types::{EffectStep, Vector3};

/// Driver slot an effect is stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectSlot(pub u8);

impl fmt::Display for EffectSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot {}", self.0)
    }
}

/// Playback strength passed through to the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amplitude(pub u8);

impl Amplitude {
    pub const FULL: Amplitude = Amplitude(u8::MAX);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Repetitions(pub u8);

impl Repetitions {
    pub const ONCE: Repetitions = Repetitions(1);
}

/// Ordered list of keyframes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectScript {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    steps: Vec<EffectStep>,
}

impl EffectScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            steps: Vec::new(),
        }
    }

    pub fn from_steps(steps: Vec<EffectStep>) -> Self {
        Self { name: None, steps }
    }

    pub fn step(mut self, step: EffectStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Keep the platform at the neutral pose for `duration_ms`.
    pub fn hold(self, duration_ms: u16) -> Self {
        self.step(EffectStep {
            duration_ms,
            position: Vector3::ZERO,
            rotation_axis: Vector3::ZERO,
            rotation_angle: 0.0,
        })
    }

    pub fn translate(self, duration_ms: u16, position: Vector3) -> Self {
        self.step(EffectStep {
            duration_ms,
            position,
            rotation_axis: Vector3::ZERO,
            rotation_angle: 0.0,
        })
    }

    /// `angle` in radians around `axis`.
    pub fn rotate(self, duration_ms: u16, axis: Vector3, angle: f32) -> Self {
        self.step(EffectStep {
            duration_ms,
            position: Vector3::ZERO,
            rotation_axis: axis,
            rotation_angle: angle,
        })
    }

    pub fn steps(&self) -> &[EffectStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn total_duration(&self) -> Duration {
        let ms: u64 = self.steps.iter().map(|s| u64::from(s.duration_ms)).sum();
        Duration::from_millis(ms)
    }

    pub fn validate(&self) -> BtResult<()> {
        if self.steps.is_empty() {
            return Err(BtError::InvalidEffect("script has no steps".to_string()));
        }
        if self.steps.len() > MAX_EFFECT_STEPS {
            return Err(BtError::InvalidEffect(format!(
                "{} steps exceeds the {MAX_EFFECT_STEPS} step limit",
                self.steps.len()
            )));
        }
        for (i, step) in self.steps.iter().enumerate() {
            if step.duration_ms == 0 {
                return Err(BtError::InvalidEffect(format!("step {i} has zero duration")));
            }
            let finite = step.position.is_finite()
                && step.rotation_axis.is_finite()
                && step.rotation_angle.is_finite();
            if !finite {
                return Err(BtError::InvalidEffect(format!(
                    "step {i} has a non-finite component"
                )));
            }
        }
        Ok(())
    }
}

/// Uploads and plays scripts on a platform.
pub struct EffectLibrary;

impl EffectLibrary {
    /// Validate `script` and store it in `slot`.
    pub fn upload<P: MotionPlatform + ?Sized>(
        platform: &P,
        slot: EffectSlot,
        script: &EffectScript,
    ) -> BtResult<()> {
        script.validate()?;
        platform.define_effect(slot.0, script.steps())?;
        tracing::debug!(
            slot = slot.0,
            steps = script.len(),
            duration_ms = script.total_duration().as_millis() as u64,
            name = script.name.as_deref().unwrap_or(""),
            "effect defined"
        );
        Ok(())
    }

    pub fn play<P: MotionPlatform + ?Sized>(
        platform: &P,
        slot: EffectSlot,
        amplitude: Amplitude,
        repetitions: Repetitions,
    ) -> BtResult<()> {
        platform.play_effect(slot.0, amplitude.0, repetitions.0)
    }

    /// Play continuously until [`EffectLibrary::stop`].
    pub fn start<P: MotionPlatform + ?Sized>(
        platform: &P,
        slot: EffectSlot,
        amplitude: Amplitude,
    ) -> BtResult<()> {
        platform.start_effect(slot.0, amplitude.0)
    }

    pub fn stop<P: MotionPlatform + ?Sized>(platform: &P, slot: EffectSlot) -> BtResult<()> {
        platform.stop_effect(slot.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockPlatform;
    use crate::types::Identity;

    fn bump() -> EffectScript {
        EffectScript::named("bump")
            .translate(80, Vector3::new(0.0, 0.02, 0.0))
            .rotate(60, Vector3::new(1.0, 0.0, 0.0), 0.05)
            .hold(100)
    }

    #[test]
    fn test_builder_and_duration() {
        let script = bump();
        assert_eq!(script.len(), 3);
        assert_eq!(script.total_duration(), Duration::from_millis(240));
        assert_eq!(script.steps()[1].rotation_axis, Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_validate_rejects_bad_scripts() {
        assert!(EffectScript::new().validate().is_err());
        assert!(EffectScript::new().hold(0).validate().is_err());
        assert!(
            EffectScript::new()
                .translate(10, Vector3::new(f32::NAN, 0.0, 0.0))
                .validate()
                .is_err()
        );

        let mut long = EffectScript::new();
        for _ in 0..=MAX_EFFECT_STEPS {
            long = long.hold(1);
        }
        assert!(matches!(long.validate(), Err(BtError::InvalidEffect(_))));
    }

    #[test]
    fn test_deserialize_from_yaml() -> Result<(), Box<dyn std::error::Error>> {
        let text = r#"
name: kick
steps:
  - duration_ms: 50
    position: { x: 0.0, y: 0.03, z: 0.0 }
  - duration_ms: 120
"#;
        let script: EffectScript = serde_yaml::from_str(text)?;
        assert_eq!(script.name.as_deref(), Some("kick"));
        assert_eq!(script.len(), 2);
        assert_eq!(script.steps()[1].position, Vector3::ZERO);
        script.validate()?;
        Ok(())
    }

    #[test]
    fn test_upload_and_play() -> BtResult<()> {
        let mock = MockPlatform::new();
        mock.init(&Identity::default())?;
        let slot = EffectSlot(4);

        EffectLibrary::upload(&mock, slot, &bump())?;
        assert_eq!(mock.effect(4).map(|s| s.len()), Some(3));

        EffectLibrary::play(&mock, slot, Amplitude::FULL, Repetitions::ONCE)?;
        EffectLibrary::start(&mock, slot, Amplitude(128))?;
        assert_eq!(mock.active_effect(4), Some(128));
        EffectLibrary::stop(&mock, slot)?;
        assert_eq!(mock.active_effect(4), None);
        Ok(())
    }

    #[test]
    fn test_upload_validates_before_driver_call() -> BtResult<()> {
        let mock = MockPlatform::new();
        mock.init(&Identity::default())?;
        let result = EffectLibrary::upload(&mock, EffectSlot(1), &EffectScript::new().hold(0));
        assert!(result.is_err());
        assert_eq!(mock.calls().len(), 1);
        Ok(())
    }
}
