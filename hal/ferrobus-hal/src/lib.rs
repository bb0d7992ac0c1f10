//! Ferrobus Hardware Abstraction Layer
//!
//! This crate defines the seams between the protocol adapters and whatever
//! actually moves bytes to the microcontroller (a serial port, a USB CDC
//! device, a socket, a test double).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Protocol adapters (ferrobus-core)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  ferrobus-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  serial port  │       │  embedded-io  │
//! │  (host impl)  │       │   adapters    │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::SerialTx`], [`uart::SerialRx`] - Serial communication
//! - [`i2c::SlaveAddress`] - I2C peripheral addressing

#![no_std]
#![deny(unsafe_code)]

pub mod i2c;
pub mod uart;

// Re-export key types at crate root for convenience
pub use i2c::{AddressError, AddressMode, I2cConfig, SlaveAddress};
pub use uart::{IoSerial, SerialConfig, SerialRx, SerialTx};
