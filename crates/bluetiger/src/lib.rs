//! Safe bindings for BlueTiger motion platforms
//!
//! This crate wraps the vendor's `BTApi` driver (see `bluetiger-sys`) and adds
//! the pieces a simulator integration needs on top of it.
//!
//! # Architecture
//!
//! - [`platform`]: the [`MotionPlatform`] and [`LegacyConfiguration`] traits
//! - [`api`]: [`BtApi`], the backend that calls into the loaded driver
//! - [`mock`]: [`MockPlatform`], an in-memory backend for tests and dry runs
//! - [`session`]: RAII lifecycle around `BTInit`/`BTShutdown`
//! - [`effect`]: keyframe effect scripts and playback
//! - [`motion`]: simulator telemetry to platform axes and units
//! - [`feeder`]: rate-limited submission of mapped telemetry
//! - [`config`]: sensitivity, rate and library settings
//!
//! # Example
//!
//! ```
//! use bluetiger::prelude::*;
//!
//! fn run() -> BtResult<()> {
//!     let platform = MockPlatform::new();
//!     let session = Session::open(&platform, &Identity::default())?;
//!
//!     let mut feeder = MotionFeeder::new(Sensitivity::default(), 20.0, FeedMode::Acceleration);
//!     let outcome = feeder.update(&session, &SimFrame::default());
//!     assert!(outcome.is_sent());
//!
//!     session.close()
//! }
//! # run().unwrap();
//! ```

#![deny(static_mut_refs)]
#![warn(rust_2018_idioms)]

pub mod api;
pub mod config;
pub mod effect;
pub mod error;
pub mod feeder;
pub mod mock;
pub mod motion;
pub mod platform;
pub mod prelude;
pub mod rate_limiter;
pub mod session;
pub mod types;

pub use api::{BtApi, DEFAULT_LIBRARY_NAME, MAX_EFFECT_STEPS};
pub use config::PlatformConfig;
pub use effect::{Amplitude, EffectLibrary, EffectScript, EffectSlot, Repetitions};
pub use error::{BtError, BtResult, BtStatusCode, check_status};
pub use feeder::{FeedMode, FeedOutcome, FeederStats, MotionFeeder};
pub use mock::{MockCall, MockPlatform};
pub use motion::{MappedMotion, MotionMapper, Orientation, Sensitivity, SimFrame};
pub use platform::{LegacyConfiguration, MotionPlatform};
pub use rate_limiter::RateLimiter;
pub use session::{Session, SessionState};
pub use types::{
    AccelerationSample, DeviceInfo, DiagnosticStatus, EffectStep, Identity, MacAddress,
    NetworkAddress, Pose, RotationVector, TuningParameters, Vector3,
};

pub use bluetiger_sys::BTAPI_VERSION;
