//! WK2132 bridge driver module.
//!
//! - [`address`] — strap bits, sub-UART and object → 7-bit I2C address
//! - [`baud`] — baud generator divisor
//! - [`registers`] — register map
//! - [`Channel`] — one sub-UART: configuration and byte stream
//!
//! `Channel` also implements the `embedded_io` traits and
//! [`core::fmt::Write`], so `write!(uart, ...)` works directly.

pub mod address;
pub mod baud;
pub(crate) mod registers;
mod channel;
mod serial_io;

pub use address::{ChannelId, ChannelMask, Object, Target};
pub use baud::BaudDivisor;
pub use channel::{Channel, FifoStatus, GlobalReg, Page, State};

#[cfg(test)]
pub(crate) mod sim;
