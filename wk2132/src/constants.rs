/// Crystal frequency feeding the sub-UART baud generators, in Hz.
pub const FOSC: u32 = 14_745_600;

/// Slots in the per-channel receive ring buffer. Usable capacity is one less.
pub const RX_BUFFER_SIZE: usize = 32;

/// Depth of each hardware FIFO (RX and TX, per channel).
pub const FIFO_DEPTH: usize = 256;

/// Bytes moved per I2C transaction in FIFO burst transfers.
pub const I2C_CHUNK_SIZE: usize = 32;

/// Pause between TX burst chunks, giving the UART time to drain.
pub const BURST_GAP_MS: u32 = 10;

/// Address bits 4:3 are fixed to `10`.
pub const I2C_ADDR_FIXED: u8 = 0x10;
