//! Message types for the I2C adapter
//!
//! Message kinds are divided into two directions:
//! - Host → MCU: bus configuration, I2C requests
//! - MCU → Host: I2C replies
//!
//! Payload layouts (logical bytes, before 7-bit packing):
//! - Config: `[delay low][delay high]`
//! - Request: `[mode][address low][address high, 10-bit only][data | count low, count high]`
//! - Reply: `[address low][address high][data...]`

use crate::frame::{Frame, FrameError, MAX_PAYLOAD_SIZE};
use crate::mode::{I2cMode, TEN_BIT_FLAG};
use ferrobus_hal::{AddressMode, SlaveAddress};
use heapless::Vec;

// Message kind IDs: Host → MCU
pub const MSG_I2C_REQUEST: u8 = 0x76;
pub const MSG_I2C_CONFIG: u8 = 0x78;

// Message kind IDs: MCU → Host
pub const MSG_I2C_REPLY: u8 = 0x77;

/// Maximum number of data bytes the host may write or ask for in one request
pub const MAX_I2C_DATA: usize = 120;

/// Maximum number of data bytes a reply frame can carry
///
/// Larger than [`MAX_I2C_DATA`] so that any well-formed reply decodes and an
/// oversized one surfaces as a count mismatch rather than a framing error.
pub const MAX_REPLY_DATA: usize = MAX_PAYLOAD_SIZE - 2;

/// Bytes read back from the bus in one reply
pub type I2cData = Vec<u8, MAX_REPLY_DATA>;

/// Bus configuration sent before the first transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigMessage {
    /// Read delay in microseconds
    pub delay_us: u16,
}

impl ConfigMessage {
    /// Encode this message into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        let [low, high] = self.delay_us.to_le_bytes();
        Frame::new(MSG_I2C_CONFIG, &[low, high])
    }

    /// Parse a config message from a frame (for testing or simulation)
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        match (frame.kind, &frame.payload[..]) {
            (MSG_I2C_CONFIG, &[low, high]) => Ok(Self {
                delay_us: u16::from_le_bytes([low, high]),
            }),
            _ => Err(FrameError::InvalidFrame),
        }
    }
}

/// Mode-specific request payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RequestPayload<'a> {
    /// Bytes to write
    Data(&'a [u8]),
    /// Number of bytes to read
    Count(u16),
    /// No payload
    None,
}

/// An I2C request from the host
///
/// Created per operation and dropped once sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cRequest<'a> {
    pub address: SlaveAddress,
    pub mode: I2cMode,
    pub payload: RequestPayload<'a>,
}

impl<'a> I2cRequest<'a> {
    /// Write `data` to the slave
    pub fn write(address: SlaveAddress, data: &'a [u8]) -> Self {
        Self {
            address,
            mode: I2cMode::Write,
            payload: RequestPayload::Data(data),
        }
    }

    /// Read `count` bytes once
    pub fn read(address: SlaveAddress, count: u16) -> Self {
        Self {
            address,
            mode: I2cMode::Read,
            payload: RequestPayload::Count(count),
        }
    }

    /// Read `count` bytes repeatedly
    pub fn continuous_read(address: SlaveAddress, count: u16) -> Self {
        Self {
            address,
            mode: I2cMode::ContinuousRead,
            payload: RequestPayload::Count(count),
        }
    }

    /// Stop any continuous read from the slave
    pub fn stop_reading(address: SlaveAddress) -> Self {
        Self {
            address,
            mode: I2cMode::StopReading,
            payload: RequestPayload::None,
        }
    }

    /// Encode this request into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        let mut payload = Vec::<u8, MAX_PAYLOAD_SIZE>::new();

        let mut mode = self.mode.to_byte();
        if self.address.mode() == AddressMode::TenBit {
            mode |= TEN_BIT_FLAG;
        }
        payload.push(mode).map_err(|_| FrameError::PayloadTooLarge)?;
        payload
            .push(self.address.low())
            .map_err(|_| FrameError::PayloadTooLarge)?;
        if self.address.mode() == AddressMode::TenBit {
            payload
                .push(self.address.high())
                .map_err(|_| FrameError::PayloadTooLarge)?;
        }

        match self.payload {
            RequestPayload::Data(data) => {
                if data.len() > MAX_I2C_DATA {
                    return Err(FrameError::PayloadTooLarge);
                }
                payload
                    .extend_from_slice(data)
                    .map_err(|_| FrameError::PayloadTooLarge)?;
            }
            RequestPayload::Count(count) => {
                payload
                    .extend_from_slice(&count.to_le_bytes())
                    .map_err(|_| FrameError::PayloadTooLarge)?;
            }
            RequestPayload::None => {}
        }

        Frame::new(MSG_I2C_REQUEST, &payload)
    }

    /// Parse a request from a frame (for testing or simulation)
    pub fn from_frame(frame: &'a Frame) -> Result<Self, FrameError> {
        if frame.kind != MSG_I2C_REQUEST {
            return Err(FrameError::InvalidFrame);
        }
        let (&mode_byte, rest) = frame.payload.split_first().ok_or(FrameError::InvalidFrame)?;
        let mode = I2cMode::from_byte(mode_byte);

        let (raw, rest) = if mode_byte & TEN_BIT_FLAG != 0 {
            match rest {
                [low, high, rest @ ..] => (u16::from_le_bytes([*low, *high]), rest),
                _ => return Err(FrameError::InvalidFrame),
            }
        } else {
            match rest {
                [low, rest @ ..] => (*low as u16, rest),
                _ => return Err(FrameError::InvalidFrame),
            }
        };
        let address = SlaveAddress::new(raw).map_err(|_| FrameError::InvalidFrame)?;

        let payload = match (mode, rest) {
            (I2cMode::Write, data) => RequestPayload::Data(data),
            (I2cMode::Read | I2cMode::ContinuousRead, &[low, high]) => {
                RequestPayload::Count(u16::from_le_bytes([low, high]))
            }
            (I2cMode::StopReading, []) => RequestPayload::None,
            _ => return Err(FrameError::InvalidFrame),
        };

        Ok(Self {
            address,
            mode,
            payload,
        })
    }
}

/// An I2C reply from the MCU
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cReply {
    pub address: SlaveAddress,
    pub data: I2cData,
}

impl I2cReply {
    /// Create a reply carrying `data` from `address`
    pub fn new(address: SlaveAddress, data: &[u8]) -> Result<Self, FrameError> {
        let mut buf = I2cData::new();
        buf.extend_from_slice(data)
            .map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(Self { address, data: buf })
    }

    /// Parse a reply from a frame
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        if frame.kind != MSG_I2C_REPLY {
            return Err(FrameError::InvalidFrame);
        }
        match &frame.payload[..] {
            [low, high, data @ ..] => {
                let address = SlaveAddress::new(u16::from_le_bytes([*low, *high]))
                    .map_err(|_| FrameError::InvalidFrame)?;
                Self::new(address, data)
            }
            _ => Err(FrameError::InvalidFrame),
        }
    }

    /// Encode this reply into a frame (for testing or simulation)
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        let mut payload = Vec::<u8, MAX_PAYLOAD_SIZE>::new();
        payload
            .extend_from_slice(&[self.address.low(), self.address.high()])
            .map_err(|_| FrameError::PayloadTooLarge)?;
        payload
            .extend_from_slice(&self.data)
            .map_err(|_| FrameError::PayloadTooLarge)?;
        Frame::new(MSG_I2C_REPLY, &payload)
    }
}
