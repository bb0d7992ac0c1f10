//! I2C bus abstractions
//!
//! Addressing and configuration types shared by the request encoder and the
//! bus controller. The firmware beneath the link owns the electrical side
//! (speed, ACK/NACK, clock stretching); the host only names peripherals.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Highest 7-bit address
pub const MAX_7BIT_ADDRESS: u16 = 0x7F;

/// Highest 10-bit address
pub const MAX_10BIT_ADDRESS: u16 = 0x3FF;

/// Addressing width required to reach a peripheral
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressMode {
    SevenBit,
    TenBit,
}

/// Address construction errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressError {
    /// Value does not fit in a 10-bit address
    OutOfRange(u16),
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressError::OutOfRange(raw) => {
                write!(f, "i2c address {:#x} exceeds 10 bits", raw)
            }
        }
    }
}

/// I2C slave address
///
/// Used purely as a lookup key for reply correlation; it owns nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SlaveAddress(u16);

impl SlaveAddress {
    /// Create an address, rejecting values wider than 10 bits
    pub const fn new(raw: u16) -> Result<Self, AddressError> {
        if raw > MAX_10BIT_ADDRESS {
            return Err(AddressError::OutOfRange(raw));
        }
        Ok(Self(raw))
    }

    /// Raw numeric value
    pub const fn get(self) -> u16 {
        self.0
    }

    /// Low 8 bits of the address
    pub const fn low(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// High 8 bits of the address
    pub const fn high(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Addressing width needed for this address
    pub const fn mode(self) -> AddressMode {
        if self.0 > MAX_7BIT_ADDRESS {
            AddressMode::TenBit
        } else {
            AddressMode::SevenBit
        }
    }
}

impl From<u8> for SlaveAddress {
    fn from(raw: u8) -> Self {
        Self(raw as u16)
    }
}

impl TryFrom<u16> for SlaveAddress {
    type Error = AddressError;

    fn try_from(raw: u16) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl fmt::Display for SlaveAddress {
    /// Two-digit (at least) lowercase hex with a `0x` prefix, e.g. `0x0a`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02x}", self.0)
    }
}

/// I2C configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct I2cConfig {
    /// Delay the firmware inserts between a register write and the
    /// following read, in microseconds
    pub delay_us: u16,
    /// Start with write interception enabled
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_range() {
        assert!(SlaveAddress::new(0x00).is_ok());
        assert!(SlaveAddress::new(MAX_10BIT_ADDRESS).is_ok());
        assert_eq!(
            SlaveAddress::new(0x400),
            Err(AddressError::OutOfRange(0x400))
        );
    }

    #[test]
    fn test_address_mode() {
        assert_eq!(SlaveAddress::from(0x48).mode(), AddressMode::SevenBit);
        assert_eq!(SlaveAddress::new(0x80).unwrap().mode(), AddressMode::TenBit);
    }

    #[test]
    fn test_address_bytes() {
        let addr = SlaveAddress::new(0x2A5).unwrap();
        assert_eq!(addr.low(), 0xA5);
        assert_eq!(addr.high(), 0x02);
    }

    #[test]
    fn test_default_config() {
        let config = I2cConfig::default();
        assert_eq!(config.delay_us, 0);
        assert!(!config.debug);
    }
}
