//! Common imports.
//!
//! ```
//! use bluetiger::prelude::*;
//! ```

pub use crate::effect::{Amplitude, EffectLibrary, EffectScript, EffectSlot, Repetitions};
pub use crate::error::{BtError, BtResult, BtStatusCode};
pub use crate::feeder::{FeedMode, FeedOutcome, MotionFeeder};
pub use crate::mock::MockPlatform;
pub use crate::motion::{MotionMapper, Sensitivity, SimFrame};
pub use crate::platform::{LegacyConfiguration, MotionPlatform};
pub use crate::session::Session;
pub use crate::types::{AccelerationSample, EffectStep, Identity, Pose, RotationVector, Vector3};
pub use crate::{BtApi, PlatformConfig};
