//! Reply routing from the link to the controller

use ferrobus_hal::SerialTx;
use ferrobus_protocol::{Frame, I2cReply};

use super::controller::I2c;
use crate::mux::MessageHandler;

/// Bridges inbound I2C reply frames to address-scoped delivery
///
/// Registered on the multiplexer for the reply kind when the controller is
/// created, so it only ever sees I2C replies. Frames are handled in arrival
/// order, which keeps delivery FIFO per address.
pub struct ReplyRouter<T> {
    bus: I2c<T>,
}

impl<T> ReplyRouter<T> {
    pub(crate) fn new(bus: I2c<T>) -> Self {
        Self { bus }
    }
}

impl<T: SerialTx> MessageHandler for ReplyRouter<T> {
    fn handle(&mut self, frame: &Frame) {
        match I2cReply::from_frame(frame) {
            Ok(reply) => self.bus.deliver(reply),
            Err(e) => warn!("i2c: malformed reply: {:?}", e),
        }
    }
}
