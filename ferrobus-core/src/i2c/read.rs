//! One-shot read results
//!
//! Each [`I2c::read`](super::I2c::read) creates a single-resolution slot: the
//! registry holds the producing half ([`PendingRead`]) and the caller gets the
//! consuming half ([`ReadFuture`]). Both share one `embassy-sync` [`Signal`].

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::fmt;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::signal::Signal;
use ferrobus_protocol::I2cData;

/// Why a one-shot read failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadError {
    /// Reply byte count differs from the requested count
    InvalidResponse { expected: u16, actual: usize },
    /// `stop_reading` removed the read before a reply arrived
    Cancelled,
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::InvalidResponse { expected, actual } => write!(
                f,
                "invalid response: expected {} bytes, got {}",
                expected, actual
            ),
            ReadError::Cancelled => f.write_str("read cancelled"),
        }
    }
}

type ReadResult = Result<I2cData, ReadError>;
type ReadSignal = Signal<NoopRawMutex, ReadResult>;

/// Result of a one-shot read
///
/// Resolves when the first reply for the address arrives. There is no
/// timeout: if the peripheral never answers the future stays pending, so
/// callers wanting a deadline should race it against their own timer.
#[must_use = "the read result is only available through this future"]
pub struct ReadFuture {
    signal: Rc<ReadSignal>,
    /// `Signal::wait` future, created on first poll
    wait: Option<Pin<Box<dyn Future<Output = ReadResult>>>>,
}

impl ReadFuture {
    fn new(signal: Rc<ReadSignal>) -> Self {
        Self { signal, wait: None }
    }

    /// Take the result if it has already arrived
    ///
    /// For hosts that drive the link from a poll loop instead of an executor.
    pub fn try_take(&mut self) -> Option<ReadResult> {
        self.signal.try_take()
    }

    /// Whether a result is waiting to be taken
    pub fn is_settled(&self) -> bool {
        self.signal.signaled()
    }
}

impl Future for ReadFuture {
    type Output = ReadResult;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let signal = &this.signal;
        let wait = this.wait.get_or_insert_with(|| {
            let signal = signal.clone();
            let wait: Pin<Box<dyn Future<Output = ReadResult>>> =
                Box::pin(async move { signal.wait().await });
            wait
        });
        wait.as_mut().poll(cx)
    }
}

/// Producing half of a one-shot read, held by the listener registry
pub(crate) struct PendingRead {
    count: u16,
    signal: Rc<ReadSignal>,
}

impl PendingRead {
    /// Create a linked pending read and future
    pub(crate) fn new(count: u16) -> (Self, ReadFuture) {
        let signal = Rc::new(Signal::new());
        (
            Self {
                count,
                signal: signal.clone(),
            },
            ReadFuture::new(signal),
        )
    }

    /// Settle the read with a reply's bytes
    pub(crate) fn resolve(self, data: &[u8]) {
        let mismatch = ReadError::InvalidResponse {
            expected: self.count,
            actual: data.len(),
        };
        let result = if data.len() == self.count as usize {
            I2cData::from_slice(data).map_err(|_| mismatch)
        } else {
            Err(mismatch)
        };
        self.signal.signal(result);
    }

    /// Settle the read without a reply
    pub(crate) fn cancel(self) {
        self.signal.signal(Err(ReadError::Cancelled));
    }
}
