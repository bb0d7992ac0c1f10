//! Test doubles shared by the unit tests

use alloc::vec::Vec;
use core::cell::Cell;

use ferrobus_hal::SerialTx;
use ferrobus_protocol::{Frame, FrameParser};

/// Serial transmitter that records everything written to it
pub(crate) struct RecordingTx {
    bytes: Vec<u8>,
    failing: Cell<bool>,
}

impl RecordingTx {
    pub(crate) fn new() -> Self {
        Self {
            bytes: Vec::new(),
            failing: Cell::new(false),
        }
    }

    /// A transmitter whose writes all fail
    pub(crate) fn failing() -> Self {
        let tx = Self::new();
        tx.failing.set(true);
        tx
    }

    pub(crate) fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    /// Every frame written so far, in order
    pub(crate) fn frames(&self) -> Vec<Frame> {
        let mut parser = FrameParser::new();
        let mut frames = Vec::new();
        for &byte in &self.bytes {
            if let Ok(Some(frame)) = parser.feed(byte) {
                frames.push(frame);
            }
        }
        frames
    }
}

impl SerialTx for RecordingTx {
    type Error = ();

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        if self.failing.get() {
            return Err(());
        }
        self.bytes.extend_from_slice(data);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
