//! Simulator telemetry to platform motion.
//!
//! Simulator frames use `+x` forward, `+y` right, `+z` up and degrees. The
//! platform uses `+x` right, `+y` up, `+z` backward and radians.

use std::f32::consts::{FRAC_PI_4, PI};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::{AccelerationSample, RotationVector, Vector3};

/// Largest tilt sent to the platform, in radians.
pub const MAX_TILT_RAD: f32 = FRAC_PI_4;

/// Re-express a simulator-frame vector on the platform axes.
pub fn to_platform_axes(v: Vector3) -> Vector3 {
    Vector3::new(v.y, v.z, -v.x)
}

/// Vehicle orientation in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

/// One telemetry sample from the simulator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimFrame {
    #[serde(default)]
    pub rotation: Orientation,
    #[serde(default)]
    pub acceleration: Vector3,
    /// Degrees per second.
    #[serde(default)]
    pub angular_velocity: Vector3,
    #[serde(default)]
    pub forward: Vector3,
    #[serde(default)]
    pub right: Vector3,
    /// Time since the start of the run, as `timestamp_ms` on the wire.
    #[serde(default, rename = "timestamp_ms", with = "millis")]
    pub timestamp: Duration,
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64() * 1000.0)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let ms = f64::deserialize(deserializer)?;
        if !ms.is_finite() || ms < 0.0 {
            return Err(serde::de::Error::custom(format!(
                "timestamp_ms must be a non-negative number, got {ms}"
            )));
        }
        Ok(Duration::from_nanos((ms * 1_000_000.0).round() as u64))
    }
}

/// Gains applied while mapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sensitivity {
    pub distance: f32,
    pub rotational: f32,
}

impl Default for Sensitivity {
    fn default() -> Self {
        Self {
            distance: 0.5,
            rotational: 75.0,
        }
    }
}

/// Result of mapping one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MappedMotion {
    /// Radians, clamped to `±MAX_TILT_RAD`.
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
    pub sample: AccelerationSample,
}

impl MappedMotion {
    /// Pitch, yaw and roll as one rotation on the platform axes.
    ///
    /// Yaw turns about `+y`, pitch about `+x` and roll about `+z`, applied in
    /// that order. No rotation gives angle 0 about `+x`.
    pub fn rotation_vector(&self) -> RotationVector {
        let about = |axis: Vector3, angle: f32| {
            let (sin, cos) = (angle / 2.0).sin_cos();
            Quaternion {
                w: cos,
                v: axis.scale(sin),
            }
        };
        let q = about(Vector3::new(0.0, 1.0, 0.0), self.yaw)
            .then(about(Vector3::new(1.0, 0.0, 0.0), self.pitch))
            .then(about(Vector3::new(0.0, 0.0, 1.0), self.roll));

        // Keep the angle in [0, pi].
        let (w, v) = if q.w < 0.0 { (-q.w, q.v.scale(-1.0)) } else { (q.w, q.v) };
        let sin_half = v.length();
        if sin_half < 1e-7 {
            return RotationVector {
                axis: Vector3::new(1.0, 0.0, 0.0),
                angle: 0.0,
            };
        }
        RotationVector {
            axis: v.scale(1.0 / sin_half),
            angle: 2.0 * sin_half.atan2(w),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Quaternion {
    w: f32,
    v: Vector3,
}

impl Quaternion {
    /// Hamilton product `self * rhs`.
    fn then(self, rhs: Quaternion) -> Quaternion {
        let (a, b) = (self.v, rhs.v);
        Quaternion {
            w: self.w * rhs.w - (a.x * b.x + a.y * b.y + a.z * b.z),
            v: Vector3::new(
                self.w * b.x + rhs.w * a.x + a.y * b.z - a.z * b.y,
                self.w * b.y + rhs.w * a.y + a.z * b.x - a.x * b.z,
                self.w * b.z + rhs.w * a.z + a.x * b.y - a.y * b.x,
            ),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct History {
    angular_velocity: Vector3,
    timestamp: Duration,
}

/// Stateful mapper; rotational acceleration is derived from consecutive frames.
#[derive(Debug, Clone, Default)]
pub struct MotionMapper {
    sensitivity: Sensitivity,
    previous: Option<History>,
}

impl MotionMapper {
    pub fn new(sensitivity: Sensitivity) -> Self {
        Self {
            sensitivity,
            previous: None,
        }
    }

    pub fn sensitivity(&self) -> Sensitivity {
        self.sensitivity
    }

    pub fn map(&mut self, frame: &SimFrame) -> MappedMotion {
        let s = self.sensitivity;
        let tilt = |deg: f32| (deg * s.rotational * PI / 180.0).clamp(-MAX_TILT_RAD, MAX_TILT_RAD);

        // Change in angular velocity per millisecond.
        let angular_acceleration = match self.previous {
            Some(prev) if frame.timestamp > prev.timestamp => {
                let dt_ms = (frame.timestamp - prev.timestamp).as_secs_f32() * 1000.0;
                let w = frame.angular_velocity;
                let p = prev.angular_velocity;
                Vector3::new((w.x - p.x) / dt_ms, (w.y - p.y) / dt_ms, (w.z - p.z) / dt_ms)
            }
            _ => Vector3::ZERO,
        };

        self.previous = Some(History {
            angular_velocity: frame.angular_velocity,
            timestamp: frame.timestamp,
        });

        MappedMotion {
            pitch: tilt(frame.rotation.pitch),
            yaw: tilt(frame.rotation.yaw),
            roll: tilt(frame.rotation.roll),
            sample: AccelerationSample {
                linear: to_platform_axes(frame.acceleration).scale(s.distance),
                rotational: to_platform_axes(angular_acceleration).scale(s.rotational),
                forward: to_platform_axes(frame.forward),
                right: to_platform_axes(frame.right),
            },
        }
    }

    /// Forget the previous frame.
    pub fn reset(&mut self) {
        self.previous = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    fn frame_at(ms: u64, angular_velocity: Vector3) -> SimFrame {
        SimFrame {
            angular_velocity,
            timestamp: Duration::from_millis(ms),
            ..SimFrame::default()
        }
    }

    #[test]
    fn test_axes_remap() {
        let v = to_platform_axes(Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(v, Vector3::new(2.0, 3.0, -1.0));
    }

    #[test]
    fn test_angles_scaled_and_clamped() {
        let mut mapper = MotionMapper::new(Sensitivity {
            distance: 1.0,
            rotational: 1.0,
        });
        let frame = SimFrame {
            rotation: Orientation {
                pitch: 10.0,
                yaw: 90.0,
                roll: -60.0,
            },
            ..SimFrame::default()
        };
        let out = mapper.map(&frame);
        assert!(close(out.pitch, 10.0_f32.to_radians()));
        assert!(close(out.yaw, MAX_TILT_RAD));
        assert!(close(out.roll, -MAX_TILT_RAD));
    }

    #[test]
    fn test_linear_acceleration_and_direction_vectors() {
        let mut mapper = MotionMapper::new(Sensitivity {
            distance: 0.5,
            rotational: 75.0,
        });
        let frame = SimFrame {
            acceleration: Vector3::new(4.0, 2.0, -9.8),
            forward: Vector3::new(1.0, 0.0, 0.0),
            right: Vector3::new(0.0, 1.0, 0.0),
            ..SimFrame::default()
        };
        let out = mapper.map(&frame);
        assert!(close(out.sample.linear.x, 1.0));
        assert!(close(out.sample.linear.y, -4.9));
        assert!(close(out.sample.linear.z, -2.0));
        assert_eq!(out.sample.forward, Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(out.sample.right, Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_rotational_acceleration_from_history() {
        let mut mapper = MotionMapper::new(Sensitivity {
            distance: 1.0,
            rotational: 2.0,
        });
        let first = mapper.map(&frame_at(100, Vector3::new(1.0, 1.0, 1.0)));
        assert_eq!(first.sample.rotational, Vector3::ZERO);

        // +10 deg/s about x and -20 about z over 10 ms
        let second = mapper.map(&frame_at(110, Vector3::new(11.0, 1.0, -19.0)));
        let r = second.sample.rotational;
        assert!(close(r.x, 0.0));
        assert!(close(r.y, -4.0));
        assert!(close(r.z, -2.0));
    }

    #[test]
    fn test_non_increasing_timestamp_gives_zero() {
        let mut mapper = MotionMapper::default();
        mapper.map(&frame_at(50, Vector3::ZERO));
        let out = mapper.map(&frame_at(50, Vector3::new(5.0, 5.0, 5.0)));
        assert_eq!(out.sample.rotational, Vector3::ZERO);
    }

    #[test]
    fn test_frame_from_json_line() -> Result<(), serde_json::Error> {
        let line = r#"{"rotation":{"pitch":2.0,"yaw":0.0,"roll":-1.0},"acceleration":{"x":1.0,"y":0.0,"z":9.8},"timestamp_ms":16.5}"#;
        let frame: SimFrame = serde_json::from_str(line)?;
        assert_eq!(frame.timestamp, Duration::from_micros(16_500));
        assert_eq!(frame.angular_velocity, Vector3::ZERO);
        assert!(serde_json::from_str::<SimFrame>(r#"{"timestamp_ms":-1}"#).is_err());
        Ok(())
    }

    #[test]
    fn test_rotation_vector_single_axis() {
        let pitch_only = MappedMotion {
            pitch: 0.3,
            ..MappedMotion::default()
        };
        let r = pitch_only.rotation_vector();
        assert_eq!(r.axis, Vector3::new(1.0, 0.0, 0.0));
        assert!(close(r.angle, 0.3));

        let roll_only = MappedMotion {
            roll: -0.2,
            ..MappedMotion::default()
        };
        let r = roll_only.rotation_vector();
        assert!(close(r.axis.z, -1.0));
        assert!(close(r.angle, 0.2));
    }

    #[test]
    fn test_rotation_vector_level_and_combined() {
        let level = MappedMotion::default().rotation_vector();
        assert!(close(level.angle, 0.0));
        assert!(close(level.axis.length(), 1.0));

        let tilted = MappedMotion {
            pitch: MAX_TILT_RAD,
            roll: MAX_TILT_RAD,
            ..MappedMotion::default()
        }
        .rotation_vector();
        assert!(close(tilted.axis.length(), 1.0));
        assert!(tilted.angle > MAX_TILT_RAD && tilted.angle < 2.0 * MAX_TILT_RAD);
        assert!(tilted.axis.x > 0.0 && tilted.axis.z > 0.0);
    }

    #[test]
    fn test_reset_forgets_history() {
        let mut mapper = MotionMapper::default();
        mapper.map(&frame_at(0, Vector3::ZERO));
        mapper.reset();
        let out = mapper.map(&frame_at(20, Vector3::new(5.0, 5.0, 5.0)));
        assert_eq!(out.sample.rotational, Vector3::ZERO);
    }
}
