//! Sub-UART line settings and polling limits.

/// Frame format written to LCR bits 3:0.
///
/// `N` no parity, `Z` parity bit forced 0, `O` odd, `E` even, `F` forced 1;
/// the trailing digit is the stop-bit count. Data bits are always 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Format {
    #[default]
    F8N1 = 0x00,
    F8N2 = 0x01,
    F8Z1 = 0x08,
    F8Z2 = 0x09,
    F8O1 = 0x0A,
    F8O2 = 0x0B,
    F8E1 = 0x0C,
    F8E2 = 0x0D,
    F8F1 = 0x0E,
    F8F2 = 0x0F,
}

impl Format {
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

/// Physical layer (LCR.IREN).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    #[default]
    Normal = 0,
    Infrared = 1,
}

/// TX line behaviour (LCR.BREAK).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineBreak {
    #[default]
    Normal = 0,
    /// Hold TX low.
    Break = 1,
}

/// Settings applied by `begin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SerialConfig {
    /// Baud rate in bits per second
    pub baud: u32,
    pub format: Format,
    pub mode: Mode,
    pub line_break: LineBreak,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud: 115_200,
            format: Format::F8N1,
            mode: Mode::Normal,
            line_break: LineBreak::Normal,
        }
    }
}

impl SerialConfig {
    pub const fn new(baud: u32, format: Format) -> Self {
        Self {
            baud,
            format,
            mode: Mode::Normal,
            line_break: LineBreak::Normal,
        }
    }

    pub const fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub const fn with_line_break(mut self, line_break: LineBreak) -> Self {
        self.line_break = line_break;
        self
    }

    /// LCR image: reserved bits from `current`, everything else from `self`.
    pub const fn lcr(&self, current: u8) -> u8 {
        use crate::bridge::registers as reg;
        (current & reg::LCR_RESERVED_MASK)
            | (self.format.bits() & reg::LCR_FORMAT_MASK)
            | ((self.mode as u8) << reg::LCR_IREN_SHIFT)
            | ((self.line_break as u8) << reg::LCR_BREAK_SHIFT)
    }
}

/// Bounds for the polling loops in `write`, `flush` and the blocking `embedded_io` calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollConfig {
    /// Extra attempts per byte after a failed FSR read or FDAT write.
    pub write_retries: u8,
    /// Give up on `flush` after this long.
    pub flush_timeout_us: u32,
    /// Give up on a blocking `embedded_io` read or write after this long.
    pub io_timeout_us: u32,
    /// Sleep between FSR polls.
    pub poll_interval_us: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            write_retries: 3,
            flush_timeout_us: 1_000_000,
            io_timeout_us: 1_000_000,
            poll_interval_us: 1_000,
        }
    }
}
