//! Host-side protocol adapters for a serial-attached microcontroller
//!
//! This crate contains everything between the raw serial link and the
//! application:
//!
//! - Link plumbing: frame parsing on the inbound side, a message-kind
//!   multiplexer that hands each frame to the one adapter that owns its kind,
//!   and a shared outbound handle
//! - Host configuration loading
//! - Bus state machines
//! - The I2C adapter (bus controller, reply router, listener registry)
//!
//! Everything runs on one logical thread. Inbound frames are dispatched from
//! [`link::Link::feed`], on the same thread that calls the adapters, so no
//! locking is involved.

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

#[macro_use]
mod fmt;

pub mod config;
pub mod error;
pub mod i2c;
pub mod link;
pub mod mux;
pub mod state;

#[cfg(test)]
pub(crate) mod test_util;

pub use error::Error;
pub use i2c::{DebugEvent, I2c, ReadError, ReadFuture};
pub use link::{Link, LinkTx};
pub use mux::{MessageHandler, Multiplexer, MuxError};
