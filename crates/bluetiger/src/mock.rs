//! In-memory platform for tests and for running without the driver.
//!
//! Every call is recorded. Data calls before `init` fail with
//! [`BtStatusCode::NoConnect`], like the driver does with no device attached.

use std::collections::HashMap;

use bluetiger_sys::{self as sys, BTAPI_VERSION};
use parking_lot::Mutex;

use crate::api::validate_script;
use crate::error::{BtError, BtResult, BtStatusCode};
use crate::platform::{LegacyConfiguration, MotionPlatform};
use crate::types::{
    AccelerationSample, DeviceInfo, DiagnosticStatus, EffectStep, Identity, NetworkAddress, Pose,
    RotationVector, TuningParameters, encode_text,
};

/// One recorded call.
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    Init(Identity),
    Pause,
    Resume,
    Shutdown,
    PitchRoll { pitch: f32, roll: f32 },
    RotationVector(RotationVector),
    Acceleration(AccelerationSample),
    DefineEffect { index: u8, steps: usize },
    PlayEffect { index: u8, amplitude: u8, repetitions: u8 },
    StartEffect { index: u8, amplitude: u8 },
    StopEffect { index: u8 },
    MoveAbsolute(Pose),
    MoveRelative(Pose),
    Legacy(&'static str),
}

#[derive(Debug, Default)]
struct MockState {
    initialized: bool,
    paused: bool,
    failure: Option<BtStatusCode>,
    calls: Vec<MockCall>,
    effects: HashMap<u8, Vec<EffectStep>>,
    active_effects: HashMap<u8, u8>,
    pose: Pose,
    address: NetworkAddress,
    tuning: TuningParameters,
    acceleration_heave: i16,
    position_heave: i16,
    tip_rounding: u8,
    diagnostic: DiagnosticStatus,
}

#[derive(Debug, Default)]
pub struct MockPlatform {
    state: Mutex<MockState>,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following call fail with `code`.
    pub fn fail_with(&self, code: BtStatusCode) {
        self.state.lock().failure = Some(code).filter(|c| !c.is_success());
    }

    pub fn clear_failure(&self) {
        self.state.lock().failure = None;
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.state.lock().calls.clone()
    }

    pub fn last_call(&self) -> Option<MockCall> {
        self.state.lock().calls.last().cloned()
    }

    pub fn is_initialized(&self) -> bool {
        self.state.lock().initialized
    }

    pub fn is_paused(&self) -> bool {
        self.state.lock().paused
    }

    pub fn effect(&self, index: u8) -> Option<Vec<EffectStep>> {
        self.state.lock().effects.get(&index).cloned()
    }

    /// Amplitude of a started effect, if it is running.
    pub fn active_effect(&self, index: u8) -> Option<u8> {
        self.state.lock().active_effects.get(&index).copied()
    }

    pub fn pose(&self) -> Pose {
        self.state.lock().pose
    }

    /// Record `call`, then run `apply` if the platform would accept it.
    fn handle<T>(
        &self,
        operation: &'static str,
        call: MockCall,
        apply: impl FnOnce(&mut MockState) -> BtResult<T>,
    ) -> BtResult<T> {
        let mut state = self.state.lock();
        state.calls.push(call);
        if let Some(code) = state.failure {
            return Err(BtError::Status { operation, code });
        }
        if !state.initialized {
            return Err(BtError::Status {
                operation,
                code: BtStatusCode::NoConnect,
            });
        }
        apply(&mut state)
    }

    fn legacy<T>(
        &self,
        operation: &'static str,
        apply: impl FnOnce(&mut MockState) -> T,
    ) -> BtResult<T> {
        self.handle(operation, MockCall::Legacy(operation), |state| {
            Ok(apply(state))
        })
    }
}

impl MotionPlatform for MockPlatform {
    fn init(&self, identity: &Identity) -> BtResult<()> {
        identity.validate()?;
        let mut state = self.state.lock();
        state.calls.push(MockCall::Init(identity.clone()));
        if let Some(code) = state.failure {
            return Err(BtError::Status {
                operation: "BTInit",
                code,
            });
        }
        state.initialized = true;
        state.paused = false;
        Ok(())
    }

    fn status(&self) -> u16 {
        let state = self.state.lock();
        match state.failure {
            Some(code) => code.code(),
            None if state.initialized => sys::BT_ERROR_NONE,
            None => sys::BT_ERROR_NO_CONNECT,
        }
    }

    fn api_version(&self) -> u16 {
        BTAPI_VERSION
    }

    fn pause(&self) -> BtResult<()> {
        self.handle("BTPause", MockCall::Pause, |state| {
            state.paused = true;
            Ok(())
        })
    }

    fn resume(&self) -> BtResult<()> {
        self.handle("BTResume", MockCall::Resume, |state| {
            state.paused = false;
            Ok(())
        })
    }

    fn shutdown(&self) -> BtResult<()> {
        self.handle("BTShutdown", MockCall::Shutdown, |state| {
            state.initialized = false;
            state.active_effects.clear();
            Ok(())
        })
    }

    fn pitch_roll(&self, pitch: f32, roll: f32) -> BtResult<()> {
        self.handle(
            "BTPitchRollData",
            MockCall::PitchRoll { pitch, roll },
            |_| Ok(()),
        )
    }

    fn rotation_vector(&self, rotation: RotationVector) -> BtResult<()> {
        self.handle(
            "BTRotationVectorData",
            MockCall::RotationVector(rotation),
            |_| Ok(()),
        )
    }

    fn acceleration(&self, sample: &AccelerationSample) -> BtResult<()> {
        self.handle(
            "BTAccelerationData",
            MockCall::Acceleration(*sample),
            |_| Ok(()),
        )
    }

    fn define_effect(&self, index: u8, steps: &[EffectStep]) -> BtResult<()> {
        validate_script(steps)?;
        let call = MockCall::DefineEffect {
            index,
            steps: steps.len(),
        };
        self.handle("BTDefineEffect", call, |state| {
            state.effects.insert(index, steps.to_vec());
            Ok(())
        })
    }

    fn play_effect(&self, index: u8, amplitude: u8, repetitions: u8) -> BtResult<()> {
        let call = MockCall::PlayEffect {
            index,
            amplitude,
            repetitions,
        };
        self.handle("BTPlayEffect", call, |state| {
            require_effect(state, "BTPlayEffect", index)
        })
    }

    fn start_effect(&self, index: u8, amplitude: u8) -> BtResult<()> {
        let call = MockCall::StartEffect { index, amplitude };
        self.handle("BTStartEffect", call, |state| {
            require_effect(state, "BTStartEffect", index)?;
            state.active_effects.insert(index, amplitude);
            Ok(())
        })
    }

    fn stop_effect(&self, index: u8) -> BtResult<()> {
        self.handle("BTStopEffect", MockCall::StopEffect { index }, |state| {
            state.active_effects.remove(&index);
            Ok(())
        })
    }

    fn move_absolute(&self, pose: &Pose) -> BtResult<()> {
        self.handle("BTAbsoluteMovementData", MockCall::MoveAbsolute(*pose), |state| {
            state.pose = *pose;
            Ok(())
        })
    }

    fn move_relative(&self, delta: &Pose) -> BtResult<()> {
        self.handle("BTRelativeMovementData", MockCall::MoveRelative(*delta), |state| {
            let p = &mut state.pose;
            p.position.x += delta.position.x;
            p.position.y += delta.position.y;
            p.position.z += delta.position.z;
            if delta.rotation_angle != 0.0 {
                p.rotation_axis = delta.rotation_axis;
                p.rotation_angle += delta.rotation_angle;
            }
            Ok(())
        })
    }
}

fn require_effect(state: &MockState, operation: &'static str, index: u8) -> BtResult<()> {
    if state.effects.contains_key(&index) {
        Ok(())
    } else {
        Err(BtError::Status {
            operation,
            code: BtStatusCode::ParamOutOfRange,
        })
    }
}

impl LegacyConfiguration for MockPlatform {
    fn address(&self) -> BtResult<NetworkAddress> {
        self.legacy("BTGetAddress", |s| s.address)
    }

    fn set_address(&self, address: &NetworkAddress) -> BtResult<()> {
        self.legacy("BTSetAddress", |s| s.address = *address)
    }

    fn motion_limit_range(&self) -> BtResult<u8> {
        self.legacy("BTGetMotionLimitRange", |s| s.tuning.motion_limit_range)
    }

    fn set_motion_limit_range(&self, range: u8) -> BtResult<()> {
        self.legacy("BTSetMotionLimitRange", |s| {
            s.tuning.motion_limit_range = range
        })
    }

    fn acceleration_pitch(&self) -> BtResult<i16> {
        self.legacy("BTGetAccelerationPitch", |s| s.tuning.acceleration_pitch)
    }

    fn set_acceleration_pitch(&self, value: i16) -> BtResult<()> {
        self.legacy("BTSetAccelerationPitch", |s| {
            s.tuning.acceleration_pitch = value
        })
    }

    fn acceleration_roll(&self) -> BtResult<i16> {
        self.legacy("BTGetAccelerationRoll", |s| s.tuning.acceleration_roll)
    }

    fn set_acceleration_roll(&self, value: i16) -> BtResult<()> {
        self.legacy("BTSetAccelerationRoll", |s| {
            s.tuning.acceleration_roll = value
        })
    }

    fn set_acceleration_heave(&self, value: i16) -> BtResult<()> {
        self.legacy("BTSetAccelerationHeave", |s| s.acceleration_heave = value)
    }

    fn position_pitch(&self) -> BtResult<i16> {
        self.legacy("BTGetPositionPitch", |s| s.tuning.position_pitch)
    }

    fn set_position_pitch(&self, value: i16) -> BtResult<()> {
        self.legacy("BTSetPositionPitch", |s| s.tuning.position_pitch = value)
    }

    fn position_roll(&self) -> BtResult<i16> {
        self.legacy("BTGetPositionRoll", |s| s.tuning.position_roll)
    }

    fn set_position_roll(&self, value: i16) -> BtResult<()> {
        self.legacy("BTSetPositionRoll", |s| s.tuning.position_roll = value)
    }

    fn set_position_heave(&self, value: i16) -> BtResult<()> {
        self.legacy("BTSetPositionHeave", |s| s.position_heave = value)
    }

    fn effect_scaling(&self) -> BtResult<i16> {
        self.legacy("BTGetEffectScaling", |s| s.tuning.effect_scaling)
    }

    fn set_effect_scaling(&self, value: i16) -> BtResult<()> {
        self.legacy("BTSetEffectScaling", |s| s.tuning.effect_scaling = value)
    }

    fn set_tip_rounding(&self, value: u8) -> BtResult<()> {
        self.legacy("BTSetTipRounding", |s| s.tip_rounding = value)
    }

    fn start_diagnostic(&self, id: u16) -> BtResult<()> {
        self.legacy("BTStartDiagnostic", |s| {
            s.diagnostic = DiagnosticStatus { id, status: 0 }
        })
    }

    fn diagnostic_status(&self) -> BtResult<DiagnosticStatus> {
        self.legacy("BTDiagnosticStatus", |s| s.diagnostic)
    }

    fn device_information(&self) -> BtResult<DeviceInfo> {
        self.legacy("BTDeviceInformation", |_| {
            let mut raw = sys::tBTDeviceInfo::default();
            raw.company = encode_text("MMI Development Group");
            raw.product = encode_text("BlueTiger (mock)");
            raw.version = encode_text(env!("CARGO_PKG_VERSION"));
            raw.apiVersion = BTAPI_VERSION;
            DeviceInfo::from_raw(&raw)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Vector3;

    fn ready() -> BtResult<MockPlatform> {
        let mock = MockPlatform::new();
        mock.init(&Identity::default())?;
        Ok(mock)
    }

    #[test]
    fn test_calls_before_init_fail() {
        let mock = MockPlatform::new();
        let result = mock.pitch_roll(0.0, 0.0);
        assert!(matches!(
            result,
            Err(BtError::Status {
                code: BtStatusCode::NoConnect,
                ..
            })
        ));
        assert_eq!(mock.status(), sys::BT_ERROR_NO_CONNECT);
    }

    #[test]
    fn test_status_after_init() -> BtResult<()> {
        let mock = ready()?;
        assert_eq!(mock.status(), sys::BT_ERROR_NONE);
        mock.fail_with(BtStatusCode::CommFail);
        assert_eq!(mock.status(), sys::BT_ERROR_COMM_FAIL);
        mock.clear_failure();
        assert_eq!(mock.status(), sys::BT_ERROR_NONE);
        Ok(())
    }

    #[test]
    fn test_effects_require_definition() -> BtResult<()> {
        let mock = ready()?;
        assert!(mock.play_effect(2, 100, 1).is_err());

        let step = EffectStep {
            duration_ms: 100,
            position: Vector3::new(0.0, 0.01, 0.0),
            rotation_axis: Vector3::ZERO,
            rotation_angle: 0.0,
        };
        mock.define_effect(2, &[step])?;
        mock.play_effect(2, 100, 1)?;
        mock.start_effect(2, 50)?;
        assert_eq!(mock.active_effect(2), Some(50));
        mock.stop_effect(2)?;
        assert_eq!(mock.active_effect(2), None);
        Ok(())
    }

    #[test]
    fn test_relative_movement_accumulates() -> BtResult<()> {
        let mock = ready()?;
        let delta = Pose {
            position: Vector3::new(0.01, 0.0, -0.02),
            ..Pose::default()
        };
        mock.move_relative(&delta)?;
        mock.move_relative(&delta)?;
        let pose = mock.pose();
        assert!((pose.position.x - 0.02).abs() < 1e-6);
        assert!((pose.position.z + 0.04).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn test_legacy_roundtrip() -> BtResult<()> {
        let mock = ready()?;
        let tuning = TuningParameters {
            motion_limit_range: 80,
            acceleration_pitch: 10,
            acceleration_roll: -10,
            position_pitch: 5,
            position_roll: -5,
            effect_scaling: 50,
        };
        mock.apply_tuning(&tuning)?;
        assert_eq!(mock.tuning()?, tuning);

        let info = mock.device_information()?;
        assert_eq!(info.api_version, BTAPI_VERSION);
        assert_eq!(info.company, "MMI Development Group");
        Ok(())
    }
}
