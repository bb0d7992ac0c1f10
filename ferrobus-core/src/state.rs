//! Adapter state machines
//!
//! Two orthogonal machines:
//! - [`BusState`]: one per controller, moves once from `Uninitialized` to
//!   `Configured` and never back.
//! - [`AddressState`]: one per slave address, derived from the listeners
//!   currently registered for it.

/// Controller configuration state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusState {
    /// No configuration message sent yet
    #[default]
    Uninitialized,
    /// Configuration sent at least once
    Configured,
}

/// Events that can trigger a bus state transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusEvent {
    /// A configuration message was written to the link
    ConfigSent,
}

impl BusState {
    /// Check whether requests may be sent
    pub fn is_configured(&self) -> bool {
        matches!(self, BusState::Configured)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: BusEvent) -> Self {
        match (self, event) {
            (_, BusEvent::ConfigSent) => BusState::Configured,
        }
    }
}

/// Reply-correlation state of one slave address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressState {
    /// Nothing listening
    Idle,
    /// One-shot reads waiting for their replies
    Awaiting { pending: usize },
    /// A continuous read is active, possibly alongside one-shot reads
    Streaming { pending: usize },
}

impl AddressState {
    /// Derive the state from the listeners registered for an address
    pub fn from_listeners(pending: usize, streaming: bool) -> Self {
        match (pending, streaming) {
            (_, true) => AddressState::Streaming { pending },
            (0, false) => AddressState::Idle,
            (pending, false) => AddressState::Awaiting { pending },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uninitialized_to_configured() {
        let state = BusState::default();
        assert!(!state.is_configured());
        assert_eq!(state.transition(BusEvent::ConfigSent), BusState::Configured);
    }

    #[test]
    fn test_configured_is_terminal() {
        let state = BusState::Configured.transition(BusEvent::ConfigSent);
        assert_eq!(state, BusState::Configured);
    }

    #[test]
    fn test_address_state_from_listeners() {
        assert_eq!(AddressState::from_listeners(0, false), AddressState::Idle);
        assert_eq!(
            AddressState::from_listeners(2, false),
            AddressState::Awaiting { pending: 2 }
        );
        assert_eq!(
            AddressState::from_listeners(1, true),
            AddressState::Streaming { pending: 1 }
        );
    }
}
