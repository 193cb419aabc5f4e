//! Local buffering between the hardware FIFOs and application code.
//!
//! - [`ring`] — fixed-capacity byte ring buffer, one per channel

pub mod ring;

pub use ring::RingBuffer;
