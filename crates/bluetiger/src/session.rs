//! Session lifecycle: init, pause/resume, shutdown.
//!
//! The driver itself never checks call order. A [`Session`] exists only after
//! a successful `BTInit` and issues `BTShutdown` exactly once, either from
//! [`Session::close`] or on drop.

use bluetiger_sys::BTAPI_VERSION;

use crate::error::{BtError, BtResult};
use crate::platform::MotionPlatform;
use crate::types::{AccelerationSample, Identity, Pose, RotationVector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Running,
    Paused,
    Closed,
}

pub struct Session<P: MotionPlatform> {
    platform: P,
    state: SessionState,
}

impl<P: MotionPlatform> Session<P> {
    /// Initialize the driver and start a session.
    ///
    /// # Errors
    ///
    /// Returns the `BTInit` failure; no session is created.
    pub fn open(platform: P, identity: &Identity) -> BtResult<Self> {
        platform.init(identity)?;
        Ok(Self {
            platform,
            state: SessionState::Running,
        })
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state == SessionState::Paused
    }

    fn ensure_open(&self) -> BtResult<()> {
        if self.state == SessionState::Closed {
            return Err(BtError::SessionClosed);
        }
        Ok(())
    }

    /// Compare the driver's API version with [`BTAPI_VERSION`].
    pub fn check_version(&self) -> u16 {
        let reported = self.platform.api_version();
        if reported != BTAPI_VERSION {
            tracing::warn!(
                reported,
                expected = BTAPI_VERSION,
                "BlueTiger driver API version differs from the bindings"
            );
        }
        reported
    }

    pub fn status(&self) -> u16 {
        self.platform.status()
    }

    /// No-op when already paused.
    pub fn pause(&mut self) -> BtResult<()> {
        self.ensure_open()?;
        if self.state == SessionState::Running {
            self.platform.pause()?;
            self.state = SessionState::Paused;
            tracing::debug!("motion paused");
        }
        Ok(())
    }

    /// No-op when already running.
    pub fn resume(&mut self) -> BtResult<()> {
        self.ensure_open()?;
        if self.state == SessionState::Paused {
            self.platform.resume()?;
            self.state = SessionState::Running;
            tracing::debug!("motion resumed");
        }
        Ok(())
    }

    /// Runs `submit` only while running. `Ok(false)` means skipped.
    fn submit(&self, submit: impl FnOnce(&P) -> BtResult<()>) -> BtResult<bool> {
        match self.state {
            SessionState::Running => submit(&self.platform).map(|()| true),
            SessionState::Paused => Ok(false),
            SessionState::Closed => Err(BtError::SessionClosed),
        }
    }

    pub fn pitch_roll(&self, pitch: f32, roll: f32) -> BtResult<bool> {
        self.submit(|p| p.pitch_roll(pitch, roll))
    }

    pub fn rotation_vector(&self, rotation: RotationVector) -> BtResult<bool> {
        self.submit(|p| p.rotation_vector(rotation))
    }

    pub fn acceleration(&self, sample: &AccelerationSample) -> BtResult<bool> {
        self.submit(|p| p.acceleration(sample))
    }

    pub fn move_absolute(&self, pose: &Pose) -> BtResult<bool> {
        self.submit(|p| p.move_absolute(pose))
    }

    pub fn move_relative(&self, delta: &Pose) -> BtResult<bool> {
        self.submit(|p| p.move_relative(delta))
    }

    /// Shut the driver down and return its result.
    pub fn close(mut self) -> BtResult<()> {
        self.shutdown_once()
    }

    fn shutdown_once(&mut self) -> BtResult<()> {
        if self.state == SessionState::Closed {
            return Ok(());
        }
        self.state = SessionState::Closed;
        let result = self.platform.shutdown();
        if result.is_ok() {
            tracing::info!("BlueTiger session shut down");
        }
        result
    }
}

impl<P: MotionPlatform> Drop for Session<P> {
    fn drop(&mut self) {
        if let Err(err) = self.shutdown_once() {
            tracing::warn!(error = %err, "BlueTiger shutdown failed");
        }
    }
}
