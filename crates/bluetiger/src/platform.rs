//! Device traits implemented by the driver backend and the mock.

use crate::error::BtResult;
use crate::types::{
    AccelerationSample, DeviceInfo, DiagnosticStatus, EffectStep, Identity, NetworkAddress, Pose,
    RotationVector, TuningParameters,
};

/// Current (non-deprecated) driver surface.
///
/// Calls are synchronous and forwarded as-is; implementations never retry.
pub trait MotionPlatform: Send + Sync {
    /// `BTInit`. Must precede every data call.
    fn init(&self, identity: &Identity) -> BtResult<()>;

    /// `BTStatus`. The raw status word, not an error.
    fn status(&self) -> u16;

    /// `BTAPIVersion`.
    fn api_version(&self) -> u16;

    fn pause(&self) -> BtResult<()>;
    fn resume(&self) -> BtResult<()>;
    fn shutdown(&self) -> BtResult<()>;

    /// Pitch and roll in radians.
    fn pitch_roll(&self, pitch: f32, roll: f32) -> BtResult<()>;
    fn rotation_vector(&self, rotation: RotationVector) -> BtResult<()>;
    fn acceleration(&self, sample: &AccelerationSample) -> BtResult<()>;

    /// Store `steps` under `index`.
    fn define_effect(&self, index: u8, steps: &[EffectStep]) -> BtResult<()>;
    fn play_effect(&self, index: u8, amplitude: u8, repetitions: u8) -> BtResult<()>;
    fn start_effect(&self, index: u8, amplitude: u8) -> BtResult<()>;
    fn stop_effect(&self, index: u8) -> BtResult<()>;

    fn move_absolute(&self, pose: &Pose) -> BtResult<()>;
    fn move_relative(&self, delta: &Pose) -> BtResult<()>;
}

/// The vendor's deprecated configuration and diagnostics surface.
pub trait LegacyConfiguration: Send + Sync {
    fn address(&self) -> BtResult<NetworkAddress>;
    fn set_address(&self, address: &NetworkAddress) -> BtResult<()>;

    fn motion_limit_range(&self) -> BtResult<u8>;
    fn set_motion_limit_range(&self, range: u8) -> BtResult<()>;

    fn acceleration_pitch(&self) -> BtResult<i16>;
    fn set_acceleration_pitch(&self, value: i16) -> BtResult<()>;
    fn acceleration_roll(&self) -> BtResult<i16>;
    fn set_acceleration_roll(&self, value: i16) -> BtResult<()>;
    fn set_acceleration_heave(&self, value: i16) -> BtResult<()>;

    fn position_pitch(&self) -> BtResult<i16>;
    fn set_position_pitch(&self, value: i16) -> BtResult<()>;
    fn position_roll(&self) -> BtResult<i16>;
    fn set_position_roll(&self, value: i16) -> BtResult<()>;
    fn set_position_heave(&self, value: i16) -> BtResult<()>;

    fn effect_scaling(&self) -> BtResult<i16>;
    fn set_effect_scaling(&self, value: i16) -> BtResult<()>;
    fn set_tip_rounding(&self, value: u8) -> BtResult<()>;

    fn start_diagnostic(&self, id: u16) -> BtResult<()>;
    fn diagnostic_status(&self) -> BtResult<DiagnosticStatus>;

    fn device_information(&self) -> BtResult<DeviceInfo>;

    /// Read every readable tuning parameter.
    fn tuning(&self) -> BtResult<TuningParameters> {
        Ok(TuningParameters {
            motion_limit_range: self.motion_limit_range()?,
            acceleration_pitch: self.acceleration_pitch()?,
            acceleration_roll: self.acceleration_roll()?,
            position_pitch: self.position_pitch()?,
            position_roll: self.position_roll()?,
            effect_scaling: self.effect_scaling()?,
        })
    }

    /// Write every tuning parameter, stopping at the first failure.
    fn apply_tuning(&self, tuning: &TuningParameters) -> BtResult<()> {
        self.set_motion_limit_range(tuning.motion_limit_range)?;
        self.set_acceleration_pitch(tuning.acceleration_pitch)?;
        self.set_acceleration_roll(tuning.acceleration_roll)?;
        self.set_position_pitch(tuning.position_pitch)?;
        self.set_position_roll(tuning.position_roll)?;
        self.set_effect_scaling(tuning.effect_scaling)
    }
}

impl<T: MotionPlatform + ?Sized> MotionPlatform for &T {
    fn init(&self, identity: &Identity) -> BtResult<()> {
        (**self).init(identity)
    }
    fn status(&self) -> u16 {
        (**self).status()
    }
    fn api_version(&self) -> u16 {
        (**self).api_version()
    }
    fn pause(&self) -> BtResult<()> {
        (**self).pause()
    }
    fn resume(&self) -> BtResult<()> {
        (**self).resume()
    }
    fn shutdown(&self) -> BtResult<()> {
        (**self).shutdown()
    }
    fn pitch_roll(&self, pitch: f32, roll: f32) -> BtResult<()> {
        (**self).pitch_roll(pitch, roll)
    }
    fn rotation_vector(&self, rotation: RotationVector) -> BtResult<()> {
        (**self).rotation_vector(rotation)
    }
    fn acceleration(&self, sample: &AccelerationSample) -> BtResult<()> {
        (**self).acceleration(sample)
    }
    fn define_effect(&self, index: u8, steps: &[EffectStep]) -> BtResult<()> {
        (**self).define_effect(index, steps)
    }
    fn play_effect(&self, index: u8, amplitude: u8, repetitions: u8) -> BtResult<()> {
        (**self).play_effect(index, amplitude, repetitions)
    }
    fn start_effect(&self, index: u8, amplitude: u8) -> BtResult<()> {
        (**self).start_effect(index, amplitude)
    }
    fn stop_effect(&self, index: u8) -> BtResult<()> {
        (**self).stop_effect(index)
    }
    fn move_absolute(&self, pose: &Pose) -> BtResult<()> {
        (**self).move_absolute(pose)
    }
    fn move_relative(&self, delta: &Pose) -> BtResult<()> {
        (**self).move_relative(delta)
    }
}
