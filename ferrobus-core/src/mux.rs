//! Message-kind multiplexer
//!
//! Several protocol adapters share one link. Each adapter registers the
//! message kinds it owns; every inbound frame goes to exactly the handler
//! registered for its kind, or nowhere.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use core::fmt;

use ferrobus_protocol::Frame;

/// Receiver of inbound frames of one message kind
pub trait MessageHandler {
    /// Handle a complete inbound frame
    fn handle(&mut self, frame: &Frame);
}

impl<F: FnMut(&Frame)> MessageHandler for F {
    fn handle(&mut self, frame: &Frame) {
        self(frame)
    }
}

/// Multiplexer registration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MuxError {
    /// Another handler already owns this kind
    KindTaken(u8),
    /// Kind has its top bit set and can never appear on the wire
    InvalidKind(u8),
}

impl fmt::Display for MuxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MuxError::KindTaken(kind) => write!(f, "message kind {:#04x} already registered", kind),
            MuxError::InvalidKind(kind) => write!(f, "invalid message kind {:#04x}", kind),
        }
    }
}

/// Routes inbound frames to handlers by message kind
#[derive(Default)]
pub struct Multiplexer {
    handlers: BTreeMap<u8, Box<dyn MessageHandler>>,
}

impl Multiplexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` as the only receiver of frames with `kind`
    pub fn register<H>(&mut self, kind: u8, handler: H) -> Result<(), MuxError>
    where
        H: MessageHandler + 'static,
    {
        if kind & 0x80 != 0 {
            return Err(MuxError::InvalidKind(kind));
        }
        if self.handlers.contains_key(&kind) {
            return Err(MuxError::KindTaken(kind));
        }
        self.handlers.insert(kind, Box::new(handler));
        debug!("mux: registered kind {:#x}", kind);
        Ok(())
    }

    /// Hand `frame` to the handler owning its kind
    ///
    /// Returns false if no adapter claims the kind.
    pub fn dispatch(&mut self, frame: &Frame) -> bool {
        match self.handlers.get_mut(&frame.kind) {
            Some(handler) => {
                handler.handle(frame);
                true
            }
            None => {
                trace!("mux: no handler for kind {:#x}", frame.kind);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use core::cell::Cell;

    #[test]
    fn test_dispatch_by_kind() {
        let hits = Rc::new(Cell::new(0u32));
        let mut mux = Multiplexer::new();
        let counter = hits.clone();
        mux.register(0x77, move |_: &Frame| counter.set(counter.get() + 1))
            .unwrap();

        assert!(mux.dispatch(&Frame::new(0x77, &[1, 2]).unwrap()));
        assert!(!mux.dispatch(&Frame::new(0x6F, &[]).unwrap()));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_kind_taken() {
        let mut mux = Multiplexer::new();
        mux.register(0x77, |_: &Frame| {}).unwrap();
        assert_eq!(
            mux.register(0x77, |_: &Frame| {}),
            Err(MuxError::KindTaken(0x77))
        );
    }

    #[test]
    fn test_invalid_kind() {
        let mut mux = Multiplexer::new();
        assert_eq!(
            mux.register(0xF0, |_: &Frame| {}),
            Err(MuxError::InvalidKind(0xF0))
        );
    }
}
