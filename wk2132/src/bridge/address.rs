//! I2C address encoding.
//!
//! The WK2132 answers on eight consecutive 7-bit addresses. The address
//! selects the sub-UART and whether the transaction targets its register
//! bank or its FIFO data port:
//!
//! ```text
//!   6     5     4   3   2    1    0
//! ┌─────┬─────┬───┬───┬────┬────┬─────┐
//! │ IA1 │ IA0 │ 1 │ 0 │ C1 │ C0 │ OBJ │
//! └─────┴─────┴───┴───┴────┴────┴─────┘
//! ```
//!
//! `IA1`/`IA0` are the strap pins, `C1:C0` the sub-UART index and `OBJ`
//! is 0 for registers, 1 for the FIFO.

use crate::constants::I2C_ADDR_FIXED;

/// One of the two sub-UARTs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelId {
    One = 0,
    Two = 1,
}

impl ChannelId {
    /// Index placed in address bits 2:1.
    pub const fn index(self) -> u8 {
        self as u8
    }
}

/// Channel selection for the global enable registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelMask {
    One,
    Two,
    Both,
}

impl ChannelMask {
    /// Bits to OR into GENA / GRST / GIER.
    pub const fn bits(self) -> u8 {
        match self {
            ChannelMask::One => 0x01,
            ChannelMask::Two => 0x02,
            ChannelMask::Both => 0x03,
        }
    }
}

impl From<ChannelId> for ChannelMask {
    fn from(id: ChannelId) -> Self {
        match id {
            ChannelId::One => ChannelMask::One,
            ChannelId::Two => ChannelMask::Two,
        }
    }
}

/// What an I2C transaction talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Object {
    Register = 0,
    Fifo = 1,
}

/// Sub-UART plus object, enough to compute the address of one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Target {
    pub channel: ChannelId,
    pub object: Object,
}

impl Target {
    /// Global registers are only reachable through the channel 1 window.
    pub const GLOBAL: Target = Target::register(ChannelId::One);

    pub const fn register(channel: ChannelId) -> Self {
        Self {
            channel,
            object: Object::Register,
        }
    }

    pub const fn fifo(channel: ChannelId) -> Self {
        Self {
            channel,
            object: Object::Fifo,
        }
    }

    /// Effective 7-bit address for this target on a chip at `base`.
    pub const fn address(self, base: u8) -> u8 {
        encode(base, self.channel.index(), self.object as u8)
    }
}

/// Base address from the two strap bits.
pub const fn base_address(ia1: bool, ia0: bool) -> u8 {
    ((ia1 as u8) << 6) | ((ia0 as u8) << 5) | I2C_ADDR_FIXED
}

/// `(base & 0xF8) | (channel << 1) | object`.
pub const fn encode(base: u8, channel: u8, object: u8) -> u8 {
    (base & 0xF8) | ((channel & 0x03) << 1) | (object & 0x01)
}
