//! Write interception for debugging
//!
//! With debug mode on, [`I2c::write`](super::I2c::write) never reaches the
//! link. It emits a [`DebugEvent`] instead, so traffic can be inspected
//! without a microcontroller attached.

use alloc::format;
use alloc::string::String;
use core::fmt::Write;

use ferrobus_hal::SlaveAddress;

/// An intercepted bus operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugEvent {
    /// Name of the intercepted operation
    pub method: &'static str,
    /// Slave address as lowercase hex, at least two digits, `0x` prefixed
    pub address: String,
    /// Payload rendered by [`bit_string`]
    pub data: String,
}

impl DebugEvent {
    pub(crate) fn new(method: &'static str, address: SlaveAddress, data: &[u8]) -> Self {
        Self {
            method,
            address: format!("{}", address),
            data: bit_string(data),
        }
    }
}

/// Render bytes as space-separated 8-digit binary, e.g. `[0x05]` → `00000101`
pub fn bit_string(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 9);
    for (i, byte) in data.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        // Writing to a String cannot fail
        let _ = write!(out, "{:08b}", byte);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_string_single_byte() {
        assert_eq!(bit_string(&[0x05]), "00000101");
    }

    #[test]
    fn test_bit_string_multiple_bytes() {
        assert_eq!(bit_string(&[0x01, 0xFF, 0x80]), "00000001 11111111 10000000");
    }

    #[test]
    fn test_bit_string_empty() {
        assert_eq!(bit_string(&[]), "");
    }

    #[test]
    fn test_event_address_format() {
        let event = DebugEvent::new("write", SlaveAddress::from(0x0A), &[0x05]);
        assert_eq!(event.method, "write");
        assert_eq!(event.address, "0x0a");
        assert_eq!(event.data, "00000101");
    }

    #[test]
    fn test_event_ten_bit_address_format() {
        let event = DebugEvent::new("write", SlaveAddress::new(0x3FF).unwrap(), &[]);
        assert_eq!(event.address, "0x3ff");
    }
}
