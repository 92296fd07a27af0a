//! Function-pointer types for every exported entry point.
//!
//! Each alias matches one prototype of the vendor header: same parameter
//! count, order and C types, returning the 16-bit status. Array parameters
//! (`tBTMAC`, `tBTIP`) decay to pointers exactly as they do in C.

use std::ffi::c_char;

use crate::types::{BOOL, tBTDeviceInfo, tBTEffect};

// Lifecycle

pub type PFN_BTInit =
    unsafe extern "C" fn(company: *mut c_char, product: *mut c_char, version: *mut c_char) -> u16;
pub type PFN_BTPause = unsafe extern "C" fn() -> u16;
pub type PFN_BTResume = unsafe extern "C" fn() -> u16;
pub type PFN_BTShutdown = unsafe extern "C" fn() -> u16;
pub type PFN_BTStatus = unsafe extern "C" fn() -> u16;
pub type PFN_BTAPIVersion = unsafe extern "C" fn() -> u16;

// Real-time feed

pub type PFN_BTPitchRollData = unsafe extern "C" fn(pitch: f32, roll: f32) -> u16;
pub type PFN_BTRotationVectorData = unsafe extern "C" fn(
    x_rotation: f32,
    y_rotation: f32,
    z_rotation: f32,
    a_rotation: f32,
) -> u16;
pub type PFN_BTAccelerationData = unsafe extern "C" fn(
    x_accel: f32,
    y_accel: f32,
    z_accel: f32,
    x_rot_accel: f32,
    y_rot_accel: f32,
    z_rot_accel: f32,
    x_forward: f32,
    y_forward: f32,
    z_forward: f32,
    x_right: f32,
    y_right: f32,
    z_right: f32,
) -> u16;

// Effects

pub type PFN_BTDefineEffect =
    unsafe extern "C" fn(effect_index: u8, effect_script: *mut tBTEffect, num_entries: u8) -> u16;
pub type PFN_BTPlayEffect =
    unsafe extern "C" fn(effect_index: u8, amplitude: u8, repetitions: u8) -> u16;
pub type PFN_BTStartEffect = unsafe extern "C" fn(effect_index: u8, amplitude: u8) -> u16;
pub type PFN_BTStopEffect = unsafe extern "C" fn(effect_index: u8) -> u16;

// Movement

pub type PFN_BTAbsoluteMovementData = unsafe extern "C" fn(
    x_position: f32,
    y_position: f32,
    z_position: f32,
    x_rotation: f32,
    y_rotation: f32,
    z_rotation: f32,
    a_rotation: f32,
) -> u16;
pub type PFN_BTRelativeMovementData = unsafe extern "C" fn(
    x_position: f32,
    y_position: f32,
    z_position: f32,
    x_rotation: f32,
    y_rotation: f32,
    z_rotation: f32,
    a_rotation: f32,
) -> u16;

// Deprecated by the vendor; still exported.

pub type PFN_BTGetAddress = unsafe extern "C" fn(
    mac: *mut u8,
    ip: *mut u8,
    netmask: *mut u8,
    router: *mut u8,
    dynamic: *mut BOOL,
) -> u16;
pub type PFN_BTSetAddress = unsafe extern "C" fn(
    mac: *mut u8,
    ip: *mut u8,
    netmask: *mut u8,
    router: *mut u8,
    dynamic: BOOL,
) -> u16;
pub type PFN_BTGetMotionLimitRange = unsafe extern "C" fn(range: *mut u8) -> u16;
pub type PFN_BTSetMotionLimitRange = unsafe extern "C" fn(range: u8) -> u16;
pub type PFN_BTGetAccelerationPitch = unsafe extern "C" fn(acceleration_pitch: *mut i16) -> u16;
pub type PFN_BTSetAccelerationPitch = unsafe extern "C" fn(acceleration_pitch: i16) -> u16;
pub type PFN_BTGetAccelerationRoll = unsafe extern "C" fn(acceleration_roll: *mut i16) -> u16;
pub type PFN_BTSetAccelerationRoll = unsafe extern "C" fn(acceleration_roll: i16) -> u16;
pub type PFN_BTGetPositionPitch = unsafe extern "C" fn(position_pitch: *mut i16) -> u16;
pub type PFN_BTSetPositionPitch = unsafe extern "C" fn(position_pitch: i16) -> u16;
pub type PFN_BTGetPositionRoll = unsafe extern "C" fn(position_roll: *mut i16) -> u16;
pub type PFN_BTSetPositionRoll = unsafe extern "C" fn(position_roll: i16) -> u16;
pub type PFN_BTGetEffectScaling = unsafe extern "C" fn(effect_scaling: *mut i16) -> u16;
pub type PFN_BTSetEffectScaling = unsafe extern "C" fn(effect_scaling: i16) -> u16;
pub type PFN_BTStartDiagnostic = unsafe extern "C" fn(diagnostic_id: u16) -> u16;
pub type PFN_BTDiagnosticStatus =
    unsafe extern "C" fn(diagnostic_id: *mut u16, diagnostic_status: *mut u16) -> u16;
pub type PFN_BTDeviceInformation = unsafe extern "C" fn(device_info: *mut tBTDeviceInfo) -> u16;
pub type PFN_BTSetAccelerationHeave = unsafe extern "C" fn(acceleration_heave: i16) -> u16;
pub type PFN_BTSetPositionHeave = unsafe extern "C" fn(position_heave: i16) -> u16;
pub type PFN_BTSetTipRounding = unsafe extern "C" fn(tip_rounding: u8) -> u16;
