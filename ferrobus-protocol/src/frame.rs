//! Frame encoding and decoding for the Ferrobus link.
//!
//! Frame format:
//! - START (1 byte): 0xF0 synchronization byte
//! - KIND (1 byte): message kind, always < 0x80
//! - PAYLOAD (0-256 bytes): each logical byte `b` sent as `b & 0x7F`, `b >> 7`
//! - END (1 byte): 0xF7 terminator
//!
//! Only START and END have the top bit set, so a receiver that lost sync
//! recovers at the next START.

use core::fmt;

use heapless::Vec;

/// Frame synchronization byte
pub const FRAME_START: u8 = 0xF0;

/// Frame terminator byte
pub const FRAME_END: u8 = 0xF7;

/// Maximum logical payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 128;

/// Maximum complete frame size (START + KIND + packed payload + END)
pub const MAX_FRAME_SIZE: usize = 1 + 1 + 2 * MAX_PAYLOAD_SIZE + 1;

/// Errors that can occur during frame parsing or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// Message kind has its top bit set
    InvalidKind,
    /// Invalid frame structure (bad packing or truncated frame)
    InvalidFrame,
    /// Buffer too small for encoding
    BufferTooSmall,
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            FrameError::PayloadTooLarge => "payload too large",
            FrameError::InvalidKind => "invalid message kind",
            FrameError::InvalidFrame => "invalid frame",
            FrameError::BufferTooSmall => "buffer too small",
        };
        f.write_str(msg)
    }
}

/// A parsed or constructed frame
///
/// The payload is held unpacked; packing happens in [`Frame::encode`] and
/// unpacking in [`FrameParser`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Message kind identifier
    pub kind: u8,
    /// Payload data
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    /// Create a new frame with the given message kind and payload
    pub fn new(kind: u8, payload: &[u8]) -> Result<Self, FrameError> {
        if kind & 0x80 != 0 {
            return Err(FrameError::InvalidKind);
        }
        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(FrameError::PayloadTooLarge);
        }

        let mut payload_vec = Vec::new();
        payload_vec
            .extend_from_slice(payload)
            .map_err(|_| FrameError::PayloadTooLarge)?;

        Ok(Self {
            kind,
            payload: payload_vec,
        })
    }

    /// Number of bytes this frame occupies on the wire
    pub fn encoded_len(&self) -> usize {
        3 + 2 * self.payload.len()
    }

    /// Encode this frame into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let frame_len = self.encoded_len();
        if buffer.len() < frame_len {
            return Err(FrameError::BufferTooSmall);
        }

        buffer[0] = FRAME_START;
        buffer[1] = self.kind;
        for (i, &byte) in self.payload.iter().enumerate() {
            buffer[2 + 2 * i] = byte & 0x7F;
            buffer[3 + 2 * i] = byte >> 7;
        }
        buffer[frame_len - 1] = FRAME_END;

        Ok(frame_len)
    }

    /// Encode this frame into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = self.encode(&mut buffer)?;
        let mut vec = Vec::new();
        vec.extend_from_slice(&buffer[..len])
            .map_err(|_| FrameError::BufferTooSmall)?;
        Ok(vec)
    }
}

/// State machine for parsing incoming frames
#[derive(Debug, Clone)]
pub struct FrameParser {
    state: ParseState,
    buffer: Vec<u8, MAX_PAYLOAD_SIZE>,
    kind: u8,
    low: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Waiting for START byte
    WaitingForStart,
    /// Got START, waiting for KIND
    WaitingForKind,
    /// Reading packed payload bytes until END
    ReadingPayload,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    /// Create a new frame parser
    pub fn new() -> Self {
        Self {
            state: ParseState::WaitingForStart,
            buffer: Vec::new(),
            kind: 0,
            low: None,
        }
    }

    /// Reset the parser state
    pub fn reset(&mut self) {
        self.state = ParseState::WaitingForStart;
        self.buffer.clear();
        self.kind = 0;
        self.low = None;
    }

    /// Drop the frame in progress and treat the current byte as a fresh START
    fn restart(&mut self) {
        self.reset();
        self.state = ParseState::WaitingForKind;
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(frame))` when a complete valid frame is parsed,
    /// `Ok(None)` when more bytes are needed, or `Err` on parse error.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        match self.state {
            ParseState::WaitingForStart => {
                if byte == FRAME_START {
                    self.state = ParseState::WaitingForKind;
                }
                // Silently ignore non-START bytes while waiting
                Ok(None)
            }
            ParseState::WaitingForKind => {
                if byte == FRAME_START {
                    return Ok(None);
                }
                if byte & 0x80 != 0 {
                    self.reset();
                    return Err(FrameError::InvalidKind);
                }
                self.kind = byte;
                self.buffer.clear();
                self.low = None;
                self.state = ParseState::ReadingPayload;
                Ok(None)
            }
            ParseState::ReadingPayload => match byte {
                FRAME_END => {
                    if self.low.is_some() {
                        self.reset();
                        return Err(FrameError::InvalidFrame);
                    }
                    let frame = Frame {
                        kind: self.kind,
                        payload: self.buffer.clone(),
                    };
                    self.reset();
                    Ok(Some(frame))
                }
                FRAME_START => {
                    // Previous frame was cut short; this START opens a new one
                    self.restart();
                    Err(FrameError::InvalidFrame)
                }
                b if b & 0x80 != 0 => {
                    self.reset();
                    Err(FrameError::InvalidFrame)
                }
                b => match self.low.take() {
                    None => {
                        self.low = Some(b);
                        Ok(None)
                    }
                    Some(_) if b > 1 => {
                        self.reset();
                        Err(FrameError::InvalidFrame)
                    }
                    Some(low) => {
                        if self.buffer.push(low | (b << 7)).is_err() {
                            self.reset();
                            return Err(FrameError::PayloadTooLarge);
                        }
                        Ok(None)
                    }
                },
            },
        }
    }

    /// Feed multiple bytes to the parser
    ///
    /// Returns the first complete frame found, if any.
    /// Remaining bytes after a complete frame are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<Option<Frame>, FrameError> {
        for &byte in bytes {
            if let Some(frame) = self.feed(byte)? {
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }
}
