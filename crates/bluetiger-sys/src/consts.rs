//! Version and status constants from the vendor header.

/// API revision this binding was written against.
pub const BTAPI_VERSION: u16 = 101;

pub const BT_ERROR_NONE: u16 = 0;
pub const BT_ERROR_COMM_FAIL: u16 = 1;
pub const BT_ERROR_GET_IP_VALUE: u16 = 2;
pub const BT_ERROR_SET_IP_VALUE: u16 = 3;
pub const BT_ERROR_SET_MAC_VALUE: u16 = 4;
pub const BT_ERROR_SET_NETMASK_VALUE: u16 = 5;
pub const BT_ERROR_SET_ROUTER_VALUE: u16 = 6;
pub const BT_ERROR_CREATE_REG_KEY: u16 = 7;
pub const BT_ERROR_OPEN_REG_KEY: u16 = 8;
pub const BT_ERROR_PARAM_OUT_OF_RANGE: u16 = 9;
pub const BT_ERROR_NOT_SUPPORTED: u16 = 10;
pub const BT_ERROR_NO_CONNECT: u16 = 11;

/// Every documented status code, in numeric order.
pub const BT_ERROR_CODES: [u16; 12] = [
    BT_ERROR_NONE,
    BT_ERROR_COMM_FAIL,
    BT_ERROR_GET_IP_VALUE,
    BT_ERROR_SET_IP_VALUE,
    BT_ERROR_SET_MAC_VALUE,
    BT_ERROR_SET_NETMASK_VALUE,
    BT_ERROR_SET_ROUTER_VALUE,
    BT_ERROR_CREATE_REG_KEY,
    BT_ERROR_OPEN_REG_KEY,
    BT_ERROR_PARAM_OUT_OF_RANGE,
    BT_ERROR_NOT_SUPPORTED,
    BT_ERROR_NO_CONNECT,
];

/// Capacity of each text field in [`crate::tBTDeviceInfo`] (40 chars + NUL).
pub const BT_TEXT_LEN: usize = 41;

/// Longest string accepted for the `BTInit` identity fields.
pub const BT_TEXT_MAX_CHARS: usize = BT_TEXT_LEN - 1;

/// Size of the reserved block at the end of [`crate::tBTDeviceInfo`].
pub const BT_RESERVED_LEN: usize = 12;

pub const BT_MAC_LEN: usize = 6;
pub const BT_IP_LEN: usize = 4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_sequential() {
        for (expected, code) in BT_ERROR_CODES.iter().enumerate() {
            assert_eq!(*code as usize, expected);
        }
    }

    #[test]
    fn test_api_version() {
        assert_eq!(BTAPI_VERSION, 101);
    }
}
