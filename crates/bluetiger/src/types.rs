//! Safe value types mirroring the driver records.

use std::ffi::{CString, c_char};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use bluetiger_sys as sys;
use serde::{Deserialize, Serialize};

use crate::error::{BtError, BtResult};

/// A 3D vector in platform coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn scale(&self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor, self.z * factor)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn to_raw(self) -> sys::tBTVector3 {
        sys::tBTVector3 {
            x: self.x,
            y: self.y,
            z: self.z,
        }
    }

    pub fn from_raw(raw: sys::tBTVector3) -> Self {
        Self::new(raw.x, raw.y, raw.z)
    }
}

impl From<[f32; 3]> for Vector3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

impl FromStr for Vector3 {
    type Err = BtError;

    /// Parses `x,y,z`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [x, y, z] = parts.as_slice() else {
            return Err(BtError::Config(format!(
                "expected three comma-separated values, got '{s}'"
            )));
        };
        let parse = |v: &str| {
            v.parse::<f32>()
                .map_err(|e| BtError::Config(format!("invalid component '{v}': {e}")))
        };
        Ok(Self::new(parse(*x)?, parse(*y)?, parse(*z)?))
    }
}

/// One keyframe of an effect script.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectStep {
    pub duration_ms: u16,
    #[serde(default)]
    pub position: Vector3,
    #[serde(default)]
    pub rotation_axis: Vector3,
    /// Radians.
    #[serde(default)]
    pub rotation_angle: f32,
}

impl EffectStep {
    pub fn to_raw(&self) -> sys::tBTEffect {
        sys::tBTEffect {
            duration: self.duration_ms,
            positionVector: self.position.to_raw(),
            rotationVector: self.rotation_axis.to_raw(),
            rotationAngle: self.rotation_angle,
        }
    }

    pub fn from_raw(raw: &sys::tBTEffect) -> Self {
        Self {
            duration_ms: raw.duration,
            position: Vector3::from_raw(raw.positionVector),
            rotation_axis: Vector3::from_raw(raw.rotationVector),
            rotation_angle: raw.rotationAngle,
        }
    }
}

/// Hardware address of the platform controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MacAddress(pub [u8; sys::BT_MAC_LEN]);

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl FromStr for MacAddress {
    type Err = BtError;

    /// Accepts `:` or `-` separated hex octets.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| BtError::InvalidText {
            field: "MAC address",
            reason,
        };
        let octets: Vec<&str> = s.split([':', '-']).collect();
        if octets.len() != sys::BT_MAC_LEN {
            return Err(invalid(format!("expected 6 octets, got {}", octets.len())));
        }
        let mut bytes = [0u8; sys::BT_MAC_LEN];
        for (slot, octet) in bytes.iter_mut().zip(octets) {
            if octet.len() != 2 {
                return Err(invalid(format!("octet '{octet}' must be two hex digits")));
            }
            *slot = u8::from_str_radix(octet, 16)
                .map_err(|e| invalid(format!("octet '{octet}': {e}")))?;
        }
        Ok(MacAddress(bytes))
    }
}

impl Serialize for MacAddress {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MacAddress {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Network configuration of the platform controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkAddress {
    pub mac: MacAddress,
    pub ip: Ipv4Addr,
    pub netmask: Ipv4Addr,
    pub router: Ipv4Addr,
    /// Dynamic (DHCP) addressing.
    pub dynamic: bool,
}

impl Default for NetworkAddress {
    fn default() -> Self {
        Self {
            mac: MacAddress::default(),
            ip: Ipv4Addr::UNSPECIFIED,
            netmask: Ipv4Addr::UNSPECIFIED,
            router: Ipv4Addr::UNSPECIFIED,
            dynamic: true,
        }
    }
}

/// Identification reported by `BTDeviceInformation`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub company: String,
    pub product: String,
    pub version: String,
    pub api_version: u16,
}

impl DeviceInfo {
    /// Decode the fixed-size record; the reserved block is ignored.
    pub fn from_raw(raw: &sys::tBTDeviceInfo) -> Self {
        Self {
            company: decode_text(&raw.company),
            product: decode_text(&raw.product),
            version: decode_text(&raw.version),
            api_version: raw.apiVersion,
        }
    }
}

/// Text up to the first NUL, never past the buffer end.
pub(crate) fn decode_text(field: &[c_char]) -> String {
    let bytes: Vec<u8> = field
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Encode into a fixed-size, NUL-terminated field, truncating at capacity.
pub(crate) fn encode_text(text: &str) -> [c_char; sys::BT_TEXT_LEN] {
    let mut field = [0 as c_char; sys::BT_TEXT_LEN];
    for (slot, byte) in field
        .iter_mut()
        .zip(text.bytes().take(sys::BT_TEXT_MAX_CHARS))
    {
        *slot = byte as c_char;
    }
    field
}

/// Caller identification passed to `BTInit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Identity {
    pub company: String,
    pub product: String,
    pub version: String,
}

impl Default for Identity {
    fn default() -> Self {
        Self {
            company: "BlueTiger Rust".to_string(),
            product: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Identity {
    pub fn new(
        company: impl Into<String>,
        product: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            company: company.into(),
            product: product.into(),
            version: version.into(),
        }
    }

    /// Each field must fit the driver's 40-character buffers.
    pub fn validate(&self) -> BtResult<()> {
        for (field, value) in self.fields() {
            validate_text(field, value)?;
        }
        Ok(())
    }

    /// NUL-terminated copies in `BTInit` argument order.
    pub fn to_c_strings(&self) -> BtResult<[CString; 3]> {
        self.validate()?;
        let [company, product, version] = self.fields().map(|(field, value)| {
            CString::new(value).map_err(|e| BtError::InvalidText {
                field,
                reason: e.to_string(),
            })
        });
        Ok([company?, product?, version?])
    }

    fn fields(&self) -> [(&'static str, &str); 3] {
        [
            ("company", self.company.as_str()),
            ("product", self.product.as_str()),
            ("version", self.version.as_str()),
        ]
    }
}

fn validate_text(field: &'static str, value: &str) -> BtResult<()> {
    if value.len() > sys::BT_TEXT_MAX_CHARS {
        return Err(BtError::InvalidText {
            field,
            reason: format!(
                "{} bytes exceeds the {} byte limit",
                value.len(),
                sys::BT_TEXT_MAX_CHARS
            ),
        });
    }
    if value.contains('\0') {
        return Err(BtError::InvalidText {
            field,
            reason: "contains a NUL byte".to_string(),
        });
    }
    Ok(())
}

/// Target pose for absolute or relative movement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vector3,
    pub rotation_axis: Vector3,
    /// Radians.
    pub rotation_angle: f32,
}

/// Orientation as an axis and an angle in radians.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RotationVector {
    pub axis: Vector3,
    pub angle: f32,
}

/// The twelve values of `BTAccelerationData`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AccelerationSample {
    pub linear: Vector3,
    pub rotational: Vector3,
    /// Local `-z` axis in world coordinates.
    pub forward: Vector3,
    /// Local `+x` axis in world coordinates.
    pub right: Vector3,
}

impl AccelerationSample {
    /// Values in driver argument order.
    pub fn to_array(&self) -> [f32; 12] {
        let Self {
            linear,
            rotational,
            forward,
            right,
        } = self;
        [
            linear.x,
            linear.y,
            linear.z,
            rotational.x,
            rotational.y,
            rotational.z,
            forward.x,
            forward.y,
            forward.z,
            right.x,
            right.y,
            right.z,
        ]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticStatus {
    pub id: u16,
    pub status: u16,
}

/// Legacy calibration parameters readable through the driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TuningParameters {
    pub motion_limit_range: u8,
    pub acceleration_pitch: i16,
    pub acceleration_roll: i16,
    pub position_pitch: i16,
    pub position_roll: i16,
    pub effect_scaling: i16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mac_roundtrip_display() -> BtResult<()> {
        let mac: MacAddress = "00:1A:2b:3c:4d:5e".parse()?;
        assert_eq!(mac.0, [0x00, 0x1a, 0x2b, 0x3c, 0x4d, 0x5e]);
        assert_eq!(mac.to_string(), "00:1a:2b:3c:4d:5e");
        let dashed: MacAddress = "00-1a-2b-3c-4d-5e".parse()?;
        assert_eq!(dashed, mac);
        Ok(())
    }

    #[test]
    fn test_mac_rejects_bad_input() {
        assert!("00:1a:2b".parse::<MacAddress>().is_err());
        assert!("00:1a:2b:3c:4d:zz".parse::<MacAddress>().is_err());
        assert!("001:a:2b:3c:4d:5e".parse::<MacAddress>().is_err());
    }

    #[test]
    fn test_identity_limits() {
        let ok = Identity::new("a".repeat(40), "product", "1.0");
        assert!(ok.validate().is_ok());

        let too_long = Identity::new("a".repeat(41), "product", "1.0");
        assert!(matches!(
            too_long.validate(),
            Err(BtError::InvalidText {
                field: "company",
                ..
            })
        ));

        let nul = Identity::new("acme", "pro\0duct", "1.0");
        assert!(matches!(
            nul.to_c_strings(),
            Err(BtError::InvalidText {
                field: "product",
                ..
            })
        ));
    }

    #[test]
    fn test_identity_c_strings_order() -> BtResult<()> {
        let identity = Identity::new("ACME", "Rig", "v1");
        let [company, product, version] = identity.to_c_strings()?;
        assert_eq!(company.as_bytes(), b"ACME");
        assert_eq!(product.as_bytes(), b"Rig");
        assert_eq!(version.as_bytes(), b"v1");
        Ok(())
    }

    #[test]
    fn test_device_info_decoding() {
        let mut raw = sys::tBTDeviceInfo::default();
        raw.company = encode_text("MMI Development Group");
        raw.product = encode_text("Blue Tiger");
        raw.version = encode_text("2.1");
        raw.apiVersion = 101;
        raw.reserved = [0xff; sys::BT_RESERVED_LEN];

        let info = DeviceInfo::from_raw(&raw);
        assert_eq!(info.company, "MMI Development Group");
        assert_eq!(info.product, "Blue Tiger");
        assert_eq!(info.version, "2.1");
        assert_eq!(info.api_version, 101);
    }

    #[test]
    fn test_decode_unterminated_field() {
        let field = [b'x' as c_char; sys::BT_TEXT_LEN];
        assert_eq!(decode_text(&field).len(), sys::BT_TEXT_LEN);
    }

    #[test]
    fn test_encode_truncates_and_terminates() {
        let field = encode_text(&"y".repeat(80));
        assert_eq!(field[sys::BT_TEXT_MAX_CHARS], 0);
        assert_eq!(decode_text(&field).len(), sys::BT_TEXT_MAX_CHARS);
    }

    #[test]
    fn test_effect_step_raw_fields() {
        let step = EffectStep {
            duration_ms: 250,
            position: Vector3::new(0.1, 0.2, 0.3),
            rotation_axis: Vector3::new(0.0, 1.0, 0.0),
            rotation_angle: 0.5,
        };
        let raw = step.to_raw();
        assert_eq!(raw.duration, 250);
        assert_eq!(raw.positionVector, step.position.to_raw());
        assert_eq!(EffectStep::from_raw(&raw), step);
    }

    #[test]
    fn test_acceleration_sample_order() {
        let sample = AccelerationSample {
            linear: Vector3::new(1.0, 2.0, 3.0),
            rotational: Vector3::new(4.0, 5.0, 6.0),
            forward: Vector3::new(7.0, 8.0, 9.0),
            right: Vector3::new(10.0, 11.0, 12.0),
        };
        assert_eq!(
            sample.to_array(),
            [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0]
        );
    }

    #[test]
    fn test_vector_parse() -> BtResult<()> {
        let v: Vector3 = "1, -2.5, 0".parse()?;
        assert_eq!(v, Vector3::new(1.0, -2.5, 0.0));
        assert!("1,2".parse::<Vector3>().is_err());
        assert!("1,2,x".parse::<Vector3>().is_err());
        Ok(())
    }
}
