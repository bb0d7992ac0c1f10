//! Ferrobus Link Protocol
//!
//! This crate defines the framed messages exchanged between the host and the
//! microcontroller over a single serial link. Several peripheral protocols
//! share the link; each frame carries a message-kind tag so that adapters
//! only ever see their own traffic.
//!
//! # Protocol Overview
//!
//! Every frame uses the same envelope:
//! ```text
//! ┌───────┬──────┬──────────────────────┬─────┐
//! │ START │ KIND │ PACKED PAYLOAD       │ END │
//! │ 0xF0  │ 1B   │ 2 × (0–128) B        │0xF7 │
//! └───────┴──────┴──────────────────────┴─────┘
//! ```
//!
//! Payload bytes are split into 7-bit halves on the wire so that the framing
//! markers can never appear inside a frame.

#![no_std]
#![deny(unsafe_code)]

pub mod frame;
pub mod messages;
pub mod mode;

pub use frame::{Frame, FrameError, FrameParser, FRAME_END, FRAME_START, MAX_PAYLOAD_SIZE};
pub use messages::{
    ConfigMessage, I2cData, I2cReply, I2cRequest, RequestPayload, MAX_I2C_DATA, MAX_REPLY_DATA,
    MSG_I2C_CONFIG, MSG_I2C_REPLY, MSG_I2C_REQUEST,
};
pub use mode::I2cMode;
