//! I2C protocol adapter
//!
//! [`I2c`] is the public bus controller. It encodes requests onto the shared
//! link and, for reads, arms a listener keyed by slave address before the
//! request goes out. [`ReplyRouter`] is registered on the link's multiplexer
//! for the I2C reply kind and feeds decoded replies back into the
//! controller's listener registry.
//!
//! Three consumption modes coexist per address:
//! - [`I2c::write`]: no reply expected
//! - [`I2c::read`]: one reply resolves a [`ReadFuture`]
//! - [`I2c::start_reading`]: every reply goes to a persistent listener until
//!   [`I2c::stop_reading`]

pub mod controller;
pub mod debug;
pub mod read;
pub mod registry;
pub mod router;

pub use controller::I2c;
pub use debug::{bit_string, DebugEvent};
pub use read::{ReadError, ReadFuture};
pub use router::ReplyRouter;
