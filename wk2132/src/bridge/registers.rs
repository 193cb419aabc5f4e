//! WK2132 register addresses and bitfield definitions.
//!
//! Register offsets are 8-bit and every register holds one byte. Global
//! registers live in the channel 1 address window; sub-UART registers are
//! paged through SPAGE, with page 0 holding control/FIFO/status and page 1
//! holding the baud generator and FIFO trigger levels.

// Some registers are defined for completeness (GMUT, GIFR, SIFR, LSR)
// but are not used by the driver.
#![allow(dead_code)]

// ── Global registers ───────────────────────────────────────────────────────

/// Global control: sub-UART clock enable.
/// - Bit 7   : always reads 1 (presence sentinel)
/// - Bit 1   : UT2EN
/// - Bit 0   : UT1EN
pub const GENA: u8 = 0x00;

/// Global sub-UART soft reset. Bits 1:0 self-clear once the reset completes.
pub const GRST: u8 = 0x01;

/// Global main UART control (unused when the host interface is I2C).
pub const GMUT: u8 = 0x02;

/// Global interrupt enable, one bit per sub-UART.
pub const GIER: u8 = 0x10;

/// Global interrupt flags (read-only).
pub const GIFR: u8 = 0x11;

/// Sentinel bit in [`GENA`] used for the presence check.
pub const GENA_SENTINEL: u8 = 1 << 7;

// ── Page control ───────────────────────────────────────────────────────────

/// Sub-UART page select. Bit 0 : PAGE (0 or 1).
pub const SPAGE: u8 = 0x03;

// ── Page 0 ─────────────────────────────────────────────────────────────────

/// Sub-UART control.
/// - Bit 2 : SLEEPEN
/// - Bit 1 : TXEN
/// - Bit 0 : RXEN
pub const SCR: u8 = 0x04;

/// Line configuration.
/// - Bits 7:6 : reserved (preserved on write)
/// - Bit 5    : BREAK (force TX low)
/// - Bit 4    : IREN
/// - Bits 3:0 : PAEN / PAM / STPL frame format code
pub const LCR: u8 = 0x05;

/// FIFO control.
/// - Bits 7:6 : TFTRIG
/// - Bits 5:4 : RFTRIG
/// - Bit 3    : TFEN
/// - Bit 2    : RFEN
/// - Bit 1    : TFRST (self-clearing)
/// - Bit 0    : RFRST (self-clearing)
pub const FCR: u8 = 0x06;

/// Sub-UART interrupt enable.
/// - Bit 7 : FERR_IEN
/// - Bit 3 : TFEMPTY_IEN
/// - Bit 2 : TFTRIG_IEN
/// - Bit 1 : RXOVT_IEN
/// - Bit 0 : RFTRIG_IEN
pub const SIER: u8 = 0x07;

/// Sub-UART interrupt flags.
pub const SIFR: u8 = 0x08;

/// TX FIFO occupancy count.
pub const TFCNT: u8 = 0x09;

/// RX FIFO occupancy count. Reads 0 for both "empty" and "256 bytes".
pub const RFCNT: u8 = 0x0A;

/// FIFO status, see [`FifoStatus`](super::FifoStatus).
pub const FSR: u8 = 0x0B;

/// Line status.
pub const LSR: u8 = 0x0C;

/// FIFO data port, one byte per access.
pub const FDAT: u8 = 0x0D;

// ── Page 1 ─────────────────────────────────────────────────────────────────

/// Baud divisor, high byte.
pub const BAUD1: u8 = 0x04;

/// Baud divisor, low byte.
pub const BAUD0: u8 = 0x05;

/// Baud fractional prescaler.
pub const PRES: u8 = 0x06;

/// RX FIFO interrupt trigger level.
pub const RFTL: u8 = 0x07;

/// TX FIFO interrupt trigger level.
pub const TFTL: u8 = 0x08;

// ── Bit values ─────────────────────────────────────────────────────────────

pub const SCR_RXEN: u8 = 1 << 0;
pub const SCR_TXEN: u8 = 1 << 1;
pub const SCR_SLEEPEN: u8 = 1 << 2;

pub const FCR_RFRST: u8 = 1 << 0;
pub const FCR_RFEN: u8 = 1 << 2;
pub const FCR_TFEN: u8 = 1 << 3;

pub const SIER_RFTRIG: u8 = 1 << 0;
pub const SIER_RXOVT: u8 = 1 << 1;
pub const SIER_TFTRIG: u8 = 1 << 2;
pub const SIER_TFEMPTY: u8 = 1 << 3;
pub const SIER_FERR: u8 = 1 << 7;

pub const LCR_FORMAT_MASK: u8 = 0x0F;
pub const LCR_IREN_SHIFT: u8 = 4;
pub const LCR_BREAK_SHIFT: u8 = 5;
pub const LCR_RESERVED_MASK: u8 = 0xC0;

pub const FSR_TBUSY: u8 = 1 << 0;
pub const FSR_TFULL: u8 = 1 << 1;
pub const FSR_TDAT: u8 = 1 << 2;
pub const FSR_RDAT: u8 = 1 << 3;
pub const FSR_RFPE: u8 = 1 << 4;
pub const FSR_RFFE: u8 = 1 << 5;
pub const FSR_RFBI: u8 = 1 << 6;
pub const FSR_RFOE: u8 = 1 << 7;

pub const SPAGE_PAGE1: u8 = 1 << 0;

/// Interrupt sources enabled by `begin`.
pub const SIER_DEFAULT: u8 = SIER_RFTRIG | SIER_RXOVT | SIER_TFTRIG | SIER_TFEMPTY | SIER_FERR;

/// RX FIFO reset plus RX/TX FIFO enable.
pub const FCR_DEFAULT: u8 = FCR_RFRST | FCR_RFEN | FCR_TFEN;

/// Receiver and transmitter enabled.
pub const SCR_DEFAULT: u8 = SCR_RXEN | SCR_TXEN;
