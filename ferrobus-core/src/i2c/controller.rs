//! I2C bus controller
//!
//! Public entry point of the adapter. Every operation makes sure the bus has
//! been configured, then encodes one request onto the shared link. Reads arm
//! their listener before the request is written.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};

use ferrobus_hal::{I2cConfig, SerialTx, SlaveAddress};
use ferrobus_protocol::{ConfigMessage, FrameError, I2cReply, I2cRequest, MAX_I2C_DATA, MSG_I2C_REPLY};

use super::debug::DebugEvent;
use super::read::{PendingRead, ReadFuture};
use super::registry::{ListenerRegistry, Stream};
use super::router::ReplyRouter;
use crate::error::Error;
use crate::link::{Link, LinkTx};
use crate::mux::MuxError;
use crate::state::{AddressState, BusEvent, BusState};

type DebugSink = Box<dyn FnMut(&DebugEvent)>;

struct Shared<T> {
    tx: LinkTx<T>,
    bus: Cell<BusState>,
    /// Delay used when configuration happens implicitly
    delay_us: u16,
    debug: Cell<bool>,
    registry: RefCell<ListenerRegistry>,
    debug_sink: RefCell<Option<DebugSink>>,
}

/// I2C bus controller
///
/// Cheap to clone; clones drive the same bus. Listeners passed to
/// [`I2c::start_reading`] may capture a clone and call back into the
/// controller, but note that doing so keeps the controller alive for as long
/// as the stream is registered.
pub struct I2c<T> {
    shared: Rc<Shared<T>>,
}

impl<T> Clone for I2c<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T: SerialTx + 'static> I2c<T> {
    /// Create a controller with default configuration
    ///
    /// Registers the reply router on `link`. Fails if another adapter
    /// already owns the I2C reply kind.
    pub fn new(tx: LinkTx<T>, link: &mut Link) -> Result<Self, MuxError> {
        Self::with_config(tx, link, I2cConfig::default())
    }

    /// Create a controller from an [`I2cConfig`]
    pub fn with_config(tx: LinkTx<T>, link: &mut Link, config: I2cConfig) -> Result<Self, MuxError> {
        let bus = Self {
            shared: Rc::new(Shared {
                tx,
                bus: Cell::new(BusState::Uninitialized),
                delay_us: config.delay_us,
                debug: Cell::new(config.debug),
                registry: RefCell::new(ListenerRegistry::new()),
                debug_sink: RefCell::new(None),
            }),
        };
        link.register(MSG_I2C_REPLY, ReplyRouter::new(bus.clone()))?;
        Ok(bus)
    }
}

impl<T: SerialTx> I2c<T> {
    /// Send the bus configuration
    ///
    /// Safe to repeat; each call writes one configuration message.
    pub fn configure(&self, delay_us: u16) -> Result<(), Error<T::Error>> {
        let frame = ConfigMessage { delay_us }.to_frame()?;
        self.shared.tx.send(&frame)?;
        let state = self.shared.bus.get().transition(BusEvent::ConfigSent);
        self.shared.bus.set(state);
        info!("i2c: configured, read delay {} us", delay_us);
        Ok(())
    }

    /// Write `data` to the slave at `address`
    ///
    /// No reply is expected. In debug mode nothing is sent and a
    /// [`DebugEvent`] is emitted instead.
    pub fn write(&self, address: SlaveAddress, data: &[u8]) -> Result<(), Error<T::Error>> {
        if self.shared.debug.get() {
            self.emit_debug(DebugEvent::new("write", address, data));
            return Ok(());
        }

        self.ensure_configured()?;
        self.send(&I2cRequest::write(address, data))
    }

    /// Read `count` bytes once from the slave at `address`
    ///
    /// Returns as soon as the request is written. The future resolves with
    /// the next reply from `address`, or fails if that reply carries a
    /// different number of bytes.
    pub fn read(&self, address: SlaveAddress, count: u16) -> Result<ReadFuture, Error<T::Error>> {
        check_count(count)?;
        self.ensure_configured()?;

        let (pending, future) = PendingRead::new(count);
        self.shared.registry.borrow_mut().push_read(address, pending);
        if let Err(e) = self.send(&I2cRequest::read(address, count)) {
            self.shared.registry.borrow_mut().discard_last_read(address);
            return Err(e);
        }
        Ok(future)
    }

    /// Stream `count`-byte samples from the slave at `address`
    ///
    /// Any earlier stream for `address` is stopped first. `listener` gets
    /// every sample of the right size; the first sample of the wrong size
    /// stops the stream.
    pub fn start_reading<F>(&self, address: SlaveAddress, count: u16, listener: F) -> Result<(), Error<T::Error>>
    where
        F: FnMut(&[u8]) + 'static,
    {
        check_count(count)?;
        self.ensure_configured()?;
        self.stop_reading(address)?;

        self.shared.registry.borrow_mut().set_stream(
            address,
            Stream {
                count,
                listener: Box::new(listener),
            },
        );
        if let Err(e) = self.send(&I2cRequest::continuous_read(address, count)) {
            self.shared.registry.borrow_mut().take_stream(address);
            return Err(e);
        }
        Ok(())
    }

    /// Remove every listener for `address` and tell the firmware to stop
    /// streaming from it
    ///
    /// One-shot reads still waiting on `address` fail with
    /// [`ReadError::Cancelled`](super::ReadError::Cancelled).
    pub fn stop_reading(&self, address: SlaveAddress) -> Result<(), Error<T::Error>> {
        self.ensure_configured()?;

        let removed = self.shared.registry.borrow_mut().clear(address);
        if removed > 0 {
            debug!("i2c: removed {} listener(s) for {}", removed, address);
        }
        self.send(&I2cRequest::stop_reading(address))
    }

    /// Enable or disable write interception
    ///
    /// Only affects [`I2c::write`].
    pub fn debug(&self, enable: bool) {
        self.shared.debug.set(enable);
    }

    /// Install the receiver of [`DebugEvent`]s, replacing any previous one
    pub fn on_debug<F>(&self, sink: F)
    where
        F: FnMut(&DebugEvent) + 'static,
    {
        *self.shared.debug_sink.borrow_mut() = Some(Box::new(sink));
    }

    /// Whether write interception is on
    pub fn is_debug(&self) -> bool {
        self.shared.debug.get()
    }

    /// Whether a configuration message has been sent
    pub fn is_configured(&self) -> bool {
        self.shared.bus.get().is_configured()
    }

    /// Listener state of `address`
    pub fn address_state(&self, address: SlaveAddress) -> AddressState {
        self.shared.registry.borrow().state(address)
    }

    fn ensure_configured(&self) -> Result<(), Error<T::Error>> {
        if !self.is_configured() {
            self.configure(self.shared.delay_us)?;
        }
        Ok(())
    }

    fn send(&self, request: &I2cRequest<'_>) -> Result<(), Error<T::Error>> {
        if request.mode.expects_reply() {
            trace!("i2c: {:?} -> {}, reply expected", request.mode, request.address);
        } else {
            trace!("i2c: {:?} -> {}", request.mode, request.address);
        }
        let frame = request.to_frame()?;
        self.shared.tx.send(&frame)
    }

    fn emit_debug(&self, event: DebugEvent) {
        debug!(
            "i2c: intercepted {} to {}: {}",
            event.method,
            event.address.as_str(),
            event.data.as_str()
        );

        // Run the sink unborrowed so it may install a replacement
        let sink = self.shared.debug_sink.borrow_mut().take();
        if let Some(mut sink) = sink {
            sink(&event);
            let mut slot = self.shared.debug_sink.borrow_mut();
            if slot.is_none() {
                *slot = Some(sink);
            }
        }
    }

    /// Hand a decoded reply to the listeners of its address
    pub(crate) fn deliver(&self, reply: I2cReply) {
        let address = reply.address;
        let data = &reply.data[..];

        let (read, taken) = self.shared.registry.borrow_mut().take_for_reply(address);
        if read.is_none() && taken.is_none() {
            trace!("i2c: unsolicited reply from {}", address);
            return;
        }

        if let Some(read) = read {
            read.resolve(data);
        }

        if let Some(mut taken) = taken {
            if data.len() == taken.stream.count as usize {
                (taken.stream.listener)(data);
                self.shared.registry.borrow_mut().restore_stream(address, taken);
            } else {
                warn!(
                    "i2c: {} sent {} bytes, expected {}; stopping stream",
                    address,
                    data.len(),
                    taken.stream.count
                );
                drop(taken);
                if self.stop_reading(address).is_err() {
                    warn!("i2c: failed to send stop request to {}", address);
                }
            }
        }
    }
}

fn check_count(count: u16) -> Result<(), FrameError> {
    if count as usize > MAX_I2C_DATA {
        return Err(FrameError::PayloadTooLarge);
    }
    Ok(())
}
