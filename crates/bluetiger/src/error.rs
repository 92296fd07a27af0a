//! Driver status codes and the crate error type.

use bluetiger_sys as sys;
use thiserror::Error;

/// Status codes returned by every driver entry point.
///
/// `None` is success; the others are the failures the vendor documents.
///
/// # Examples
///
/// ```
/// use bluetiger::BtStatusCode;
///
/// let code = BtStatusCode::from_code(11);
/// assert_eq!(code, Some(BtStatusCode::NoConnect));
/// assert!(BtStatusCode::NoConnect.is_retryable());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[repr(u16)]
pub enum BtStatusCode {
    None = sys::BT_ERROR_NONE,
    CommFail = sys::BT_ERROR_COMM_FAIL,
    GetIpValue = sys::BT_ERROR_GET_IP_VALUE,
    SetIpValue = sys::BT_ERROR_SET_IP_VALUE,
    SetMacValue = sys::BT_ERROR_SET_MAC_VALUE,
    SetNetmaskValue = sys::BT_ERROR_SET_NETMASK_VALUE,
    SetRouterValue = sys::BT_ERROR_SET_ROUTER_VALUE,
    CreateRegKey = sys::BT_ERROR_CREATE_REG_KEY,
    OpenRegKey = sys::BT_ERROR_OPEN_REG_KEY,
    ParamOutOfRange = sys::BT_ERROR_PARAM_OUT_OF_RANGE,
    NotSupported = sys::BT_ERROR_NOT_SUPPORTED,
    NoConnect = sys::BT_ERROR_NO_CONNECT,
}

impl BtStatusCode {
    /// All documented codes in numeric order.
    pub const ALL: [BtStatusCode; 12] = [
        BtStatusCode::None,
        BtStatusCode::CommFail,
        BtStatusCode::GetIpValue,
        BtStatusCode::SetIpValue,
        BtStatusCode::SetMacValue,
        BtStatusCode::SetNetmaskValue,
        BtStatusCode::SetRouterValue,
        BtStatusCode::CreateRegKey,
        BtStatusCode::OpenRegKey,
        BtStatusCode::ParamOutOfRange,
        BtStatusCode::NotSupported,
        BtStatusCode::NoConnect,
    ];

    pub fn code(self) -> u16 {
        self as u16
    }

    /// Returns `None` for values the vendor does not document.
    pub fn from_code(code: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.code() == code)
    }

    pub fn is_success(self) -> bool {
        self == BtStatusCode::None
    }

    /// Short human description.
    pub fn description(self) -> &'static str {
        match self {
            BtStatusCode::None => "no error",
            BtStatusCode::CommFail => "communication with the platform failed",
            BtStatusCode::GetIpValue => "failed to read the IP configuration",
            BtStatusCode::SetIpValue => "failed to set the IP address",
            BtStatusCode::SetMacValue => "failed to set the MAC address",
            BtStatusCode::SetNetmaskValue => "failed to set the netmask",
            BtStatusCode::SetRouterValue => "failed to set the router address",
            BtStatusCode::CreateRegKey => "failed to create the registry key",
            BtStatusCode::OpenRegKey => "failed to open the registry key",
            BtStatusCode::ParamOutOfRange => "parameter out of range",
            BtStatusCode::NotSupported => "operation not supported",
            BtStatusCode::NoConnect => "no connection to the platform",
        }
    }

    /// Communication problems that may clear on a later call.
    pub fn is_retryable(self) -> bool {
        matches!(self, BtStatusCode::CommFail | BtStatusCode::NoConnect)
    }

    /// Failures of the legacy network-address setters and getters.
    pub fn is_network_config(self) -> bool {
        matches!(
            self,
            BtStatusCode::GetIpValue
                | BtStatusCode::SetIpValue
                | BtStatusCode::SetMacValue
                | BtStatusCode::SetNetmaskValue
                | BtStatusCode::SetRouterValue
        )
    }
}

impl std::fmt::Display for BtStatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.description(), self.code())
    }
}

#[derive(Debug, Error)]
pub enum BtError {
    #[error("{operation} failed: {code}")]
    Status {
        operation: &'static str,
        code: BtStatusCode,
    },

    #[error("{operation} returned undocumented status {code}")]
    UnknownStatus { operation: &'static str, code: u16 },

    #[error("Failed to load driver library: {0}")]
    Library(#[from] libloading::Error),

    #[error(transparent)]
    MissingSymbol(#[from] sys::SymbolError),

    #[error("Invalid {field}: {reason}")]
    InvalidText { field: &'static str, reason: String },

    #[error("Invalid effect script: {0}")]
    InvalidEffect(String),

    #[error("Session already closed")]
    SessionClosed,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type BtResult<T> = Result<T, BtError>;

impl BtError {
    /// The driver status behind this error, if it came from the driver.
    pub fn status(&self) -> Option<BtStatusCode> {
        match self {
            BtError::Status { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// The device could not be reached; later calls may succeed.
    pub fn is_retryable(&self) -> bool {
        self.status().is_some_and(BtStatusCode::is_retryable)
    }
}

/// Map a raw driver return value onto `Ok(())` or a typed error.
pub fn check_status(operation: &'static str, raw: u16) -> BtResult<()> {
    match BtStatusCode::from_code(raw) {
        Some(BtStatusCode::None) => Ok(()),
        Some(code) => Err(BtError::Status { operation, code }),
        None => Err(BtError::UnknownStatus {
            operation,
            code: raw,
        }),
    }
}
