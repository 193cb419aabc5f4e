//! # wk2132
//!
//! A `no_std`, allocation-free driver for the WK2132 I2C to dual-UART
//! bridge. Each of the chip's two sub-UARTs is exposed as a polled byte
//! stream with its own baud rate, frame format and 256-byte hardware FIFOs.
//!
//! ## Architecture
//!
//! | Layer | Module | Purpose |
//! |-------|--------|---------|
//! | Addressing | [`bridge::address`] | Strap bits + sub-UART + object → I2C address |
//! | Baud | [`bridge::baud`] | Divisor / prescaler for the 14.7456 MHz crystal |
//! | Driver | [`bridge::Channel`] | Register access, `begin`/`end`, stream I/O |
//! | Buffering | [`io::ring`] | Per-channel receive ring buffer |
//! | Trait | [`control`] | [`SerialControl`](control::SerialControl) seam |
//!
//! ## Quick start
//!
//! ```ignore
//! use wk2132::bridge::{Channel, ChannelId};
//! use wk2132::config::{Format, SerialConfig};
//!
//! let mut uart = Channel::new(i2c, delay, ChannelId::One, true, true);
//! while uart.begin(SerialConfig::new(115_200, Format::F8N1)).is_err() {
//!     delay.delay_ms(1000);
//! }
//!
//! uart.write(b"ping")?;
//! let mut buf = [0u8; 8];
//! let n = uart.read(&mut buf)?;
//! ```
//!
//! ## Features
//!
//! | Feature | Default | Enables |
//! |---------|---------|---------|
//! | `defmt` | no | `defmt::Format` derives and driver debug logging |
//!
//! ## Chip parameters
//!
//! - **Crystal:** 14.7456 MHz ([`constants::FOSC`])
//! - **Hardware FIFOs:** 256 bytes per direction per channel ([`constants::FIFO_DEPTH`])
//! - **Local RX buffer:** 32 slots, 31 usable ([`constants::RX_BUFFER_SIZE`])

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod constants;
pub mod config;
pub mod control;
pub mod error;
pub mod io;
pub mod bridge;

pub use bridge::{Channel, ChannelId};
pub use config::{Format, LineBreak, Mode, PollConfig, SerialConfig};
pub use error::{Error, Status, WriteError};
