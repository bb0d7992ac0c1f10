//! Host side of the serial link
//!
//! The outbound half ([`LinkTx`]) is a cheap, cloneable handle shared by every
//! adapter. The inbound half ([`Link`]) turns received bytes into frames and
//! hands them to the [`Multiplexer`] in arrival order.

use alloc::rc::Rc;
use core::cell::{Ref, RefCell};

use ferrobus_hal::{SerialRx, SerialTx};
use ferrobus_protocol::{Frame, FrameParser};

use crate::error::Error;
use crate::mux::{MessageHandler, Multiplexer, MuxError};

/// Buffer size for a single receive poll
const RX_BUF_SIZE: usize = 64;

/// Shared outbound handle to the serial transport
///
/// Every protocol adapter on the link holds a clone. Writes are whole frames,
/// so frames from different adapters never interleave.
pub struct LinkTx<T> {
    inner: Rc<RefCell<T>>,
}

impl<T> Clone for LinkTx<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: SerialTx> LinkTx<T> {
    /// Take ownership of the transport
    pub fn new(tx: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(tx)),
        }
    }

    /// Encode and write one frame
    pub fn send(&self, frame: &Frame) -> Result<(), Error<T::Error>> {
        let bytes = frame.encode_to_vec()?;
        let mut tx = self.inner.borrow_mut();
        tx.write_blocking(&bytes).map_err(Error::Transport)?;
        tx.flush().map_err(Error::Transport)
    }

    /// Borrow the transport, e.g. to inspect a test double
    pub fn borrow(&self) -> Ref<'_, T> {
        self.inner.borrow()
    }
}

/// Inbound side of the link
///
/// Owns the frame parser and the multiplexer. Frames are dispatched
/// synchronously from [`Link::feed`], so handlers run on the caller's thread
/// and in the order their frames arrived.
#[derive(Default)]
pub struct Link {
    parser: FrameParser,
    mux: Multiplexer,
}

impl Link {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one message kind
    pub fn register<H>(&mut self, kind: u8, handler: H) -> Result<(), MuxError>
    where
        H: MessageHandler + 'static,
    {
        self.mux.register(kind, handler)
    }

    /// Feed received bytes, dispatching every frame they complete
    ///
    /// Returns the number of frames dispatched to a handler. Framing errors
    /// are logged and parsing carries on with the next byte.
    pub fn feed(&mut self, bytes: &[u8]) -> usize {
        let mut dispatched = 0;
        for &byte in bytes {
            match self.parser.feed(byte) {
                Ok(Some(frame)) => {
                    if self.mux.dispatch(&frame) {
                        dispatched += 1;
                    }
                }
                Ok(None) => {
                    // Need more bytes
                }
                Err(e) => {
                    warn!("link: frame parse error: {:?}", e);
                }
            }
        }
        dispatched
    }

    /// Read whatever the receiver has pending and feed it
    pub fn poll<R: SerialRx>(&mut self, rx: &mut R) -> Result<usize, R::Error> {
        let mut buf = [0u8; RX_BUF_SIZE];
        let n = rx.read_blocking(&mut buf)?;
        if n > 0 {
            trace!("link: rx {} bytes", n);
        }
        Ok(self.feed(&buf[..n]))
    }
}
