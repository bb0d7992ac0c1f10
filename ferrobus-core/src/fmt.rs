//! Logging macros
//!
//! Forward to `defmt` when the `defmt` feature is enabled and to the `log`
//! facade otherwise. Arguments must implement both `defmt::Format` and the
//! matching `core::fmt` trait.

#![allow(unused_macros)]

#[cfg(feature = "defmt")]
macro_rules! trace {
    ($($arg:tt)+) => { ::defmt::trace!($($arg)+) };
}

#[cfg(not(feature = "defmt"))]
macro_rules! trace {
    ($($arg:tt)+) => { ::log::trace!($($arg)+) };
}

#[cfg(feature = "defmt")]
macro_rules! debug {
    ($($arg:tt)+) => { ::defmt::debug!($($arg)+) };
}

#[cfg(not(feature = "defmt"))]
macro_rules! debug {
    ($($arg:tt)+) => { ::log::debug!($($arg)+) };
}

#[cfg(feature = "defmt")]
macro_rules! info {
    ($($arg:tt)+) => { ::defmt::info!($($arg)+) };
}

#[cfg(not(feature = "defmt"))]
macro_rules! info {
    ($($arg:tt)+) => { ::log::info!($($arg)+) };
}

#[cfg(feature = "defmt")]
macro_rules! warn {
    ($($arg:tt)+) => { ::defmt::warn!($($arg)+) };
}

#[cfg(not(feature = "defmt"))]
macro_rules! warn {
    ($($arg:tt)+) => { ::log::warn!($($arg)+) };
}

#[cfg(feature = "defmt")]
macro_rules! error {
    ($($arg:tt)+) => { ::defmt::error!($($arg)+) };
}

#[cfg(not(feature = "defmt"))]
macro_rules! error {
    ($($arg:tt)+) => { ::log::error!($($arg)+) };
}
