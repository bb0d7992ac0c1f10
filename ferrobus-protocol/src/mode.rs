//! I2C request modes

/// Transaction mode carried in the mode byte of every I2C request
///
/// The mode decides whether the request carries data or a byte count, and
/// whether the firmware answers once, keeps answering, or stays silent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cMode {
    /// Write bytes, no reply
    Write,
    /// Read a fixed number of bytes once
    Read,
    /// Read a fixed number of bytes repeatedly until stopped
    ContinuousRead,
    /// Stop a continuous read
    StopReading,
}

// Wire format values (bits 3..4 of the mode byte)
const MODE_WRITE: u8 = 0b00;
const MODE_READ: u8 = 0b01;
const MODE_CONTINUOUS_READ: u8 = 0b10;
const MODE_STOP_READING: u8 = 0b11;

/// Bit position of the mode field in the mode byte
pub const MODE_SHIFT: u8 = 3;

/// Mask of the mode field after shifting
const MODE_MASK: u8 = 0b11;

/// Set in the mode byte when the request uses a 10-bit address
pub const TEN_BIT_FLAG: u8 = 1 << 5;

impl I2cMode {
    /// Parse a mode from a mode byte, ignoring the address flag
    pub fn from_byte(byte: u8) -> Self {
        match (byte >> MODE_SHIFT) & MODE_MASK {
            MODE_WRITE => I2cMode::Write,
            MODE_READ => I2cMode::Read,
            MODE_CONTINUOUS_READ => I2cMode::ContinuousRead,
            _ => I2cMode::StopReading,
        }
    }

    /// Convert to the mode field of a mode byte
    pub fn to_byte(self) -> u8 {
        let bits = match self {
            I2cMode::Write => MODE_WRITE,
            I2cMode::Read => MODE_READ,
            I2cMode::ContinuousRead => MODE_CONTINUOUS_READ,
            I2cMode::StopReading => MODE_STOP_READING,
        };
        bits << MODE_SHIFT
    }

    /// Returns true if the firmware answers requests in this mode
    pub fn expects_reply(&self) -> bool {
        matches!(self, I2cMode::Read | I2cMode::ContinuousRead)
    }
}
