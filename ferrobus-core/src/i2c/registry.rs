//! Address-scoped listener registry
//!
//! Maps each slave address to its listener slots: a FIFO of one-shot reads
//! and at most one persistent stream. Replies for an address only ever
//! reach the slots of that address.
//!
//! The registry never calls user code itself. The controller takes a
//! listener out, releases the registry, runs it, and then asks for it to be
//! put back. Each address carries an epoch that [`ListenerRegistry::clear`]
//! bumps, so a stream retired while its listener was running stays retired.

use alloc::boxed::Box;
use alloc::collections::{BTreeMap, VecDeque};

use ferrobus_hal::SlaveAddress;

use super::read::PendingRead;
use crate::state::AddressState;

/// Persistent listener for a continuous read
pub(crate) struct Stream {
    /// Expected bytes per sample
    pub(crate) count: u16,
    pub(crate) listener: Box<dyn FnMut(&[u8])>,
}

/// Stream removed from its slot while its listener runs
pub(crate) struct TakenStream {
    pub(crate) stream: Stream,
    epoch: u32,
}

#[derive(Default)]
struct AddressSlots {
    pending: VecDeque<PendingRead>,
    stream: Option<Stream>,
    epoch: u32,
}

impl AddressSlots {
    fn state(&self) -> AddressState {
        AddressState::from_listeners(self.pending.len(), self.stream.is_some())
    }
}

/// Listener registry for all addresses on one controller
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    slots: BTreeMap<SlaveAddress, AddressSlots>,
}

impl ListenerRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn slots_mut(&mut self, address: SlaveAddress) -> &mut AddressSlots {
        self.slots.entry(address).or_default()
    }

    /// Queue a one-shot read behind any already waiting
    pub(crate) fn push_read(&mut self, address: SlaveAddress, read: PendingRead) {
        self.slots_mut(address).pending.push_back(read);
    }

    /// Drop the most recently queued read, e.g. when its request failed to send
    pub(crate) fn discard_last_read(&mut self, address: SlaveAddress) {
        if let Some(slots) = self.slots.get_mut(&address) {
            slots.pending.pop_back();
        }
    }

    /// Take the listeners one reply for `address` goes to
    ///
    /// That is the oldest one-shot read and the stream, either of which may
    /// be absent. The stream must be handed back with
    /// [`ListenerRegistry::restore_stream`] to keep receiving.
    pub(crate) fn take_for_reply(
        &mut self,
        address: SlaveAddress,
    ) -> (Option<PendingRead>, Option<TakenStream>) {
        match self.slots.get_mut(&address) {
            Some(slots) => {
                let read = slots.pending.pop_front();
                let epoch = slots.epoch;
                let stream = slots
                    .stream
                    .take()
                    .map(|stream| TakenStream { stream, epoch });
                (read, stream)
            }
            None => (None, None),
        }
    }

    /// Install the persistent stream, replacing any previous one
    pub(crate) fn set_stream(&mut self, address: SlaveAddress, stream: Stream) {
        self.slots_mut(address).stream = Some(stream);
    }

    /// Remove the stream so its listener can run without the registry borrowed
    pub(crate) fn take_stream(&mut self, address: SlaveAddress) -> Option<TakenStream> {
        let slots = self.slots.get_mut(&address)?;
        let stream = slots.stream.take()?;
        Some(TakenStream {
            stream,
            epoch: slots.epoch,
        })
    }

    /// Put a taken stream back unless it was retired or replaced meanwhile
    ///
    /// Returns whether the stream was reinstated.
    pub(crate) fn restore_stream(&mut self, address: SlaveAddress, taken: TakenStream) -> bool {
        match self.slots.get_mut(&address) {
            Some(slots) if slots.epoch == taken.epoch && slots.stream.is_none() => {
                slots.stream = Some(taken.stream);
                true
            }
            _ => false,
        }
    }

    /// Remove every listener for `address`
    ///
    /// Waiting one-shot reads settle as cancelled. Returns how many
    /// listeners were removed.
    pub(crate) fn clear(&mut self, address: SlaveAddress) -> usize {
        let slots = self.slots_mut(address);
        slots.epoch = slots.epoch.wrapping_add(1);

        let mut removed = usize::from(slots.stream.take().is_some());
        while let Some(read) = slots.pending.pop_front() {
            read.cancel();
            removed += 1;
        }
        removed
    }

    /// Current listener state of `address`
    pub(crate) fn state(&self, address: SlaveAddress) -> AddressState {
        self.slots
            .get(&address)
            .map_or(AddressState::Idle, AddressSlots::state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i2c::read::ReadError;

    fn stream(count: u16) -> Stream {
        Stream {
            count,
            listener: Box::new(|_| {}),
        }
    }

    #[test]
    fn test_reads_are_fifo() {
        let addr = SlaveAddress::from(0x20);
        let mut registry = ListenerRegistry::new();
        let (first, mut first_fut) = PendingRead::new(1);
        let (second, mut second_fut) = PendingRead::new(2);
        registry.push_read(addr, first);
        registry.push_read(addr, second);

        let (read, stream) = registry.take_for_reply(addr);
        assert!(stream.is_none());
        read.unwrap().resolve(&[0x01]);
        assert!(first_fut.try_take().unwrap().is_ok());
        assert!(!second_fut.is_settled());
        assert_eq!(registry.state(addr), AddressState::Awaiting { pending: 1 });
    }

    #[test]
    fn test_addresses_are_isolated() {
        let mut registry = ListenerRegistry::new();
        let (read, _fut) = PendingRead::new(1);
        registry.push_read(SlaveAddress::from(0x20), read);

        let (read, stream) = registry.take_for_reply(SlaveAddress::from(0x21));
        assert!(read.is_none() && stream.is_none());
        assert_eq!(registry.state(SlaveAddress::from(0x21)), AddressState::Idle);
    }

    #[test]
    fn test_clear_cancels_reads_and_stream() {
        let addr = SlaveAddress::from(0x20);
        let mut registry = ListenerRegistry::new();
        let (read, mut fut) = PendingRead::new(1);
        registry.push_read(addr, read);
        registry.set_stream(addr, stream(2));

        assert_eq!(registry.clear(addr), 2);
        assert_eq!(fut.try_take(), Some(Err(ReadError::Cancelled)));
        assert_eq!(registry.state(addr), AddressState::Idle);
    }

    #[test]
    fn test_restore_after_clear_is_refused() {
        let addr = SlaveAddress::from(0x20);
        let mut registry = ListenerRegistry::new();
        registry.set_stream(addr, stream(2));

        let taken = registry.take_stream(addr).unwrap();
        registry.clear(addr);
        assert!(!registry.restore_stream(addr, taken));
        assert_eq!(registry.state(addr), AddressState::Idle);
    }

    #[test]
    fn test_restore_after_replace_is_refused() {
        let addr = SlaveAddress::from(0x20);
        let mut registry = ListenerRegistry::new();
        registry.set_stream(addr, stream(2));

        let taken = registry.take_stream(addr).unwrap();
        registry.clear(addr);
        registry.set_stream(addr, stream(4));
        assert!(!registry.restore_stream(addr, taken));
        assert_eq!(registry.take_stream(addr).unwrap().stream.count, 4);
    }

    #[test]
    fn test_restore_untouched_stream() {
        let addr = SlaveAddress::from(0x20);
        let mut registry = ListenerRegistry::new();
        registry.set_stream(addr, stream(2));

        let taken = registry.take_stream(addr).unwrap();
        assert!(registry.restore_stream(addr, taken));
        assert_eq!(registry.state(addr), AddressState::Streaming { pending: 0 });
    }

    #[test]
    fn test_take_for_reply_empties_both_slots() {
        let addr = SlaveAddress::from(0x20);
        let mut registry = ListenerRegistry::new();
        let (read, _fut) = PendingRead::new(1);
        registry.push_read(addr, read);
        registry.set_stream(addr, stream(1));

        let (read, taken) = registry.take_for_reply(addr);
        assert!(read.is_some());
        assert_eq!(registry.state(addr), AddressState::Idle);

        assert!(registry.restore_stream(addr, taken.unwrap()));
        assert_eq!(registry.state(addr), AddressState::Streaming { pending: 0 });
    }

    #[test]
    fn test_discard_last_read() {
        let addr = SlaveAddress::from(0x20);
        let mut registry = ListenerRegistry::new();
        let (first, _first_fut) = PendingRead::new(1);
        let (second, _second_fut) = PendingRead::new(1);
        registry.push_read(addr, first);
        registry.push_read(addr, second);

        registry.discard_last_read(addr);
        assert_eq!(registry.state(addr), AddressState::Awaiting { pending: 1 });
    }
}
