//! Driver backend: forwards every call to the vendor library.

use std::ffi::c_char;
use std::net::Ipv4Addr;
use std::path::Path;

use bluetiger_sys::{self as sys, BtApiTable};
use libloading::Library;

use crate::error::{BtError, BtResult, check_status};
use crate::platform::{LegacyConfiguration, MotionPlatform};
use crate::types::{
    AccelerationSample, DeviceInfo, DiagnosticStatus, EffectStep, Identity, MacAddress,
    NetworkAddress, Pose, RotationVector,
};

/// File name of the 64-bit vendor driver.
pub const DEFAULT_LIBRARY_NAME: &str = "BTApi_x64.dll";

/// Longest script the driver's `u8` entry count can describe.
pub const MAX_EFFECT_STEPS: usize = u8::MAX as usize;

/// Safe handle on the vendor driver.
pub struct BtApi {
    table: BtApiTable,
    // Keeps the resolved function pointers valid.
    _library: Option<Library>,
}

impl std::fmt::Debug for BtApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BtApi")
            .field("dynamic", &self._library.is_some())
            .finish_non_exhaustive()
    }
}

impl BtApi {
    /// Load the vendor library and resolve every export.
    ///
    /// # Errors
    ///
    /// Fails if the library cannot be opened or an export is missing.
    pub fn load(path: impl AsRef<Path>) -> BtResult<Self> {
        let path = path.as_ref();
        // SAFETY: loading runs the library's initialization routines; the
        // caller points us at the vendor driver.
        let library = unsafe { Library::new(path)? };
        // SAFETY: the table is stored next to the library it came from and
        // never outlives it.
        let table = unsafe { BtApiTable::load(&library)? };

        tracing::info!(
            path = %path.display(),
            symbols = sys::SYMBOL_NAMES.len(),
            "BlueTiger driver loaded"
        );

        Ok(Self {
            table,
            _library: Some(library),
        })
    }

    /// Backend over an already-resolved table.
    ///
    /// # Safety
    ///
    /// Every pointer in `table` must stay callable for the lifetime of the
    /// returned value and honour the driver contract for its arguments.
    pub unsafe fn from_table(table: BtApiTable) -> Self {
        Self {
            table,
            _library: None,
        }
    }

    fn check(&self, operation: &'static str, raw: u16) -> BtResult<()> {
        let result = check_status(operation, raw);
        if let Err(err) = &result {
            tracing::debug!(operation, code = raw, error = %err, "driver call failed");
        }
        result
    }
}

pub(crate) fn validate_script(steps: &[EffectStep]) -> BtResult<u8> {
    if steps.is_empty() {
        return Err(BtError::InvalidEffect("script has no steps".to_string()));
    }
    u8::try_from(steps.len()).map_err(|_| {
        BtError::InvalidEffect(format!(
            "{} steps exceeds the {MAX_EFFECT_STEPS} step limit",
            steps.len()
        ))
    })
}

impl MotionPlatform for BtApi {
    fn init(&self, identity: &Identity) -> BtResult<()> {
        let [company, product, version] = identity.to_c_strings()?;
        // The driver takes `char*` but only reads the strings.
        // SAFETY: NUL-terminated buffers that outlive the call.
        let raw = unsafe {
            (self.table.BTInit)(
                company.as_ptr() as *mut c_char,
                product.as_ptr() as *mut c_char,
                version.as_ptr() as *mut c_char,
            )
        };
        self.check("BTInit", raw)?;
        tracing::info!(
            company = %identity.company,
            product = %identity.product,
            version = %identity.version,
            "BlueTiger session initialized"
        );
        Ok(())
    }

    fn status(&self) -> u16 {
        // SAFETY: no arguments.
        unsafe { (self.table.BTStatus)() }
    }

    fn api_version(&self) -> u16 {
        // SAFETY: no arguments.
        unsafe { (self.table.BTAPIVersion)() }
    }

    fn pause(&self) -> BtResult<()> {
        // SAFETY: no arguments.
        let raw = unsafe { (self.table.BTPause)() };
        self.check("BTPause", raw)
    }

    fn resume(&self) -> BtResult<()> {
        // SAFETY: no arguments.
        let raw = unsafe { (self.table.BTResume)() };
        self.check("BTResume", raw)
    }

    fn shutdown(&self) -> BtResult<()> {
        // SAFETY: no arguments.
        let raw = unsafe { (self.table.BTShutdown)() };
        self.check("BTShutdown", raw)
    }

    fn pitch_roll(&self, pitch: f32, roll: f32) -> BtResult<()> {
        // SAFETY: value arguments only.
        let raw = unsafe { (self.table.BTPitchRollData)(pitch, roll) };
        self.check("BTPitchRollData", raw)
    }

    fn rotation_vector(&self, rotation: RotationVector) -> BtResult<()> {
        let RotationVector { axis, angle } = rotation;
        // SAFETY: value arguments only.
        let raw = unsafe { (self.table.BTRotationVectorData)(axis.x, axis.y, axis.z, angle) };
        self.check("BTRotationVectorData", raw)
    }

    fn acceleration(&self, sample: &AccelerationSample) -> BtResult<()> {
        let [ax, ay, az, rx, ry, rz, fx, fy, fz, sx, sy, sz] = sample.to_array();
        // SAFETY: value arguments only.
        let raw = unsafe {
            (self.table.BTAccelerationData)(ax, ay, az, rx, ry, rz, fx, fy, fz, sx, sy, sz)
        };
        self.check("BTAccelerationData", raw)
    }

    fn define_effect(&self, index: u8, steps: &[EffectStep]) -> BtResult<()> {
        let count = validate_script(steps)?;
        let mut script: Vec<sys::tBTEffect> = steps.iter().map(EffectStep::to_raw).collect();
        // SAFETY: `script` holds `count` initialized records and outlives the call.
        let raw = unsafe { (self.table.BTDefineEffect)(index, script.as_mut_ptr(), count) };
        self.check("BTDefineEffect", raw)
    }

    fn play_effect(&self, index: u8, amplitude: u8, repetitions: u8) -> BtResult<()> {
        // SAFETY: value arguments only.
        let raw = unsafe { (self.table.BTPlayEffect)(index, amplitude, repetitions) };
        self.check("BTPlayEffect", raw)
    }

    fn start_effect(&self, index: u8, amplitude: u8) -> BtResult<()> {
        // SAFETY: value arguments only.
        let raw = unsafe { (self.table.BTStartEffect)(index, amplitude) };
        self.check("BTStartEffect", raw)
    }

    fn stop_effect(&self, index: u8) -> BtResult<()> {
        // SAFETY: value arguments only.
        let raw = unsafe { (self.table.BTStopEffect)(index) };
        self.check("BTStopEffect", raw)
    }

    fn move_absolute(&self, pose: &Pose) -> BtResult<()> {
        let Pose {
            position: p,
            rotation_axis: r,
            rotation_angle: a,
        } = *pose;
        // SAFETY: value arguments only.
        let raw = unsafe { (self.table.BTAbsoluteMovementData)(p.x, p.y, p.z, r.x, r.y, r.z, a) };
        self.check("BTAbsoluteMovementData", raw)
    }

    fn move_relative(&self, delta: &Pose) -> BtResult<()> {
        let Pose {
            position: p,
            rotation_axis: r,
            rotation_angle: a,
        } = *delta;
        // SAFETY: value arguments only.
        let raw = unsafe { (self.table.BTRelativeMovementData)(p.x, p.y, p.z, r.x, r.y, r.z, a) };
        self.check("BTRelativeMovementData", raw)
    }
}

impl BtApi {
    fn get_i16(&self, operation: &'static str, f: sys::PFN_BTGetPositionPitch) -> BtResult<i16> {
        let mut value = 0i16;
        // SAFETY: valid out-pointer for the duration of the call.
        let raw = unsafe { f(&mut value) };
        self.check(operation, raw)?;
        Ok(value)
    }

    fn set_i16(
        &self,
        operation: &'static str,
        f: sys::PFN_BTSetPositionPitch,
        value: i16,
    ) -> BtResult<()> {
        // SAFETY: value argument only.
        let raw = unsafe { f(value) };
        self.check(operation, raw)
    }
}

impl LegacyConfiguration for BtApi {
    fn address(&self) -> BtResult<NetworkAddress> {
        let mut mac: sys::tBTMAC = [0; sys::BT_MAC_LEN];
        let mut ip: sys::tBTIP = [0; sys::BT_IP_LEN];
        let mut netmask: sys::tBTIP = [0; sys::BT_IP_LEN];
        let mut router: sys::tBTIP = [0; sys::BT_IP_LEN];
        let mut dynamic: sys::BOOL = sys::FALSE;
        // SAFETY: buffers sized per the header, valid for the call.
        let raw = unsafe {
            (self.table.BTGetAddress)(
                mac.as_mut_ptr(),
                ip.as_mut_ptr(),
                netmask.as_mut_ptr(),
                router.as_mut_ptr(),
                &mut dynamic,
            )
        };
        self.check("BTGetAddress", raw)?;
        Ok(NetworkAddress {
            mac: MacAddress(mac),
            ip: Ipv4Addr::from(ip),
            netmask: Ipv4Addr::from(netmask),
            router: Ipv4Addr::from(router),
            dynamic: dynamic != sys::FALSE,
        })
    }

    fn set_address(&self, address: &NetworkAddress) -> BtResult<()> {
        let mut mac = address.mac.0;
        let mut ip = address.ip.octets();
        let mut netmask = address.netmask.octets();
        let mut router = address.router.octets();
        let dynamic = if address.dynamic {
            sys::TRUE
        } else {
            sys::FALSE
        };
        // SAFETY: buffers sized per the header, valid for the call.
        let raw = unsafe {
            (self.table.BTSetAddress)(
                mac.as_mut_ptr(),
                ip.as_mut_ptr(),
                netmask.as_mut_ptr(),
                router.as_mut_ptr(),
                dynamic,
            )
        };
        self.check("BTSetAddress", raw)
    }

    fn motion_limit_range(&self) -> BtResult<u8> {
        let mut range = 0u8;
        // SAFETY: valid out-pointer for the duration of the call.
        let raw = unsafe { (self.table.BTGetMotionLimitRange)(&mut range) };
        self.check("BTGetMotionLimitRange", raw)?;
        Ok(range)
    }

    fn set_motion_limit_range(&self, range: u8) -> BtResult<()> {
        // SAFETY: value argument only.
        let raw = unsafe { (self.table.BTSetMotionLimitRange)(range) };
        self.check("BTSetMotionLimitRange", raw)
    }

    fn acceleration_pitch(&self) -> BtResult<i16> {
        self.get_i16("BTGetAccelerationPitch", self.table.BTGetAccelerationPitch)
    }

    fn set_acceleration_pitch(&self, value: i16) -> BtResult<()> {
        self.set_i16(
            "BTSetAccelerationPitch",
            self.table.BTSetAccelerationPitch,
            value,
        )
    }

    fn acceleration_roll(&self) -> BtResult<i16> {
        self.get_i16("BTGetAccelerationRoll", self.table.BTGetAccelerationRoll)
    }

    fn set_acceleration_roll(&self, value: i16) -> BtResult<()> {
        self.set_i16(
            "BTSetAccelerationRoll",
            self.table.BTSetAccelerationRoll,
            value,
        )
    }

    fn set_acceleration_heave(&self, value: i16) -> BtResult<()> {
        self.set_i16(
            "BTSetAccelerationHeave",
            self.table.BTSetAccelerationHeave,
            value,
        )
    }

    fn position_pitch(&self) -> BtResult<i16> {
        self.get_i16("BTGetPositionPitch", self.table.BTGetPositionPitch)
    }

    fn set_position_pitch(&self, value: i16) -> BtResult<()> {
        self.set_i16("BTSetPositionPitch", self.table.BTSetPositionPitch, value)
    }

    fn position_roll(&self) -> BtResult<i16> {
        self.get_i16("BTGetPositionRoll", self.table.BTGetPositionRoll)
    }

    fn set_position_roll(&self, value: i16) -> BtResult<()> {
        self.set_i16("BTSetPositionRoll", self.table.BTSetPositionRoll, value)
    }

    fn set_position_heave(&self, value: i16) -> BtResult<()> {
        self.set_i16("BTSetPositionHeave", self.table.BTSetPositionHeave, value)
    }

    fn effect_scaling(&self) -> BtResult<i16> {
        self.get_i16("BTGetEffectScaling", self.table.BTGetEffectScaling)
    }

    fn set_effect_scaling(&self, value: i16) -> BtResult<()> {
        self.set_i16("BTSetEffectScaling", self.table.BTSetEffectScaling, value)
    }

    fn set_tip_rounding(&self, value: u8) -> BtResult<()> {
        // SAFETY: value argument only.
        let raw = unsafe { (self.table.BTSetTipRounding)(value) };
        self.check("BTSetTipRounding", raw)
    }

    fn start_diagnostic(&self, id: u16) -> BtResult<()> {
        // SAFETY: value argument only.
        let raw = unsafe { (self.table.BTStartDiagnostic)(id) };
        self.check("BTStartDiagnostic", raw)
    }

    fn diagnostic_status(&self) -> BtResult<DiagnosticStatus> {
        let mut id = 0u16;
        let mut status = 0u16;
        // SAFETY: valid out-pointers for the duration of the call.
        let raw = unsafe { (self.table.BTDiagnosticStatus)(&mut id, &mut status) };
        self.check("BTDiagnosticStatus", raw)?;
        Ok(DiagnosticStatus { id, status })
    }

    fn device_information(&self) -> BtResult<DeviceInfo> {
        let mut info = sys::tBTDeviceInfo::default();
        // SAFETY: valid out-pointer to a zeroed record.
        let raw = unsafe { (self.table.BTDeviceInformation)(&mut info) };
        self.check("BTDeviceInformation", raw)?;
        Ok(DeviceInfo::from_raw(&info))
    }
}
