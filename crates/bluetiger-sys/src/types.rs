//! `#[repr(C)]` records shared with the driver.

use std::ffi::{c_char, c_int};

use crate::consts::{BT_IP_LEN, BT_MAC_LEN, BT_RESERVED_LEN, BT_TEXT_LEN};

/// Win32 `BOOL`.
pub type BOOL = c_int;

pub const FALSE: BOOL = 0;
pub const TRUE: BOOL = 1;

/// Hardware address of the platform controller.
pub type tBTMAC = [u8; BT_MAC_LEN];

/// IPv4 address in network order.
pub type tBTIP = [u8; BT_IP_LEN];

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct tBTVector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// One keyframe of a scripted effect.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct tBTEffect {
    /// Length of movement in milliseconds.
    pub duration: u16,
    /// Translational offset.
    pub positionVector: tBTVector3,
    /// Rotation axis.
    pub rotationVector: tBTVector3,
    /// Rotation angle in radians.
    pub rotationAngle: f32,
}

/// Identification block filled in by `BTDeviceInformation`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct tBTDeviceInfo {
    /// Company name (40 char max).
    pub company: [c_char; BT_TEXT_LEN],
    /// Product name (40 char max).
    pub product: [c_char; BT_TEXT_LEN],
    /// Revision number.
    pub version: [c_char; BT_TEXT_LEN],
    /// Supported API version.
    pub apiVersion: u16,
    /// Do not use.
    pub reserved: [u8; BT_RESERVED_LEN],
}

impl Default for tBTDeviceInfo {
    fn default() -> Self {
        Self {
            company: [0; BT_TEXT_LEN],
            product: [0; BT_TEXT_LEN],
            version: [0; BT_TEXT_LEN],
            apiVersion: 0,
            reserved: [0; BT_RESERVED_LEN],
        }
    }
}
