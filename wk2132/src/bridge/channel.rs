//! WK2132 sub-UART driver.
//!
//! One [`Channel`] drives one of the two sub-UARTs of a WK2132 bridge and
//! exposes it as a polled byte stream. The driver is generic over any
//! [`embedded_hal::i2c::I2c`] and [`embedded_hal::delay::DelayNs`]
//! implementation. Both channels of a chip may share one bus through any
//! sharing `I2c` wrapper (e.g. `embedded-hal-bus`'s `RefCellDevice`).
//!
//! # Example
//!
//! ```ignore
//! let mut uart2 = Channel::new(i2c, delay, ChannelId::Two, true, true);
//! while uart2.begin(SerialConfig::new(115_200, Format::F8N1)).is_err() {}
//! uart2.write(b"hello")?;
//! if uart2.available() > 0 {
//!     let mut buf = [0u8; 16];
//!     let n = uart2.read(&mut buf)?;
//! }
//! ```
//!
//! # Receive path
//!
//! Bytes are pulled one at a time from the FDAT register into a small
//! per-channel [`RingBuffer`], and handed to the caller from there.
//! [`available`](Channel::available) counts both the hardware FIFO and the
//! ring.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use super::address::{base_address, ChannelId, ChannelMask, Object, Target};
use super::baud::BaudDivisor;
use super::registers as reg;
use crate::config::{PollConfig, SerialConfig};
use crate::constants::{BURST_GAP_MS, FIFO_DEPTH, I2C_CHUNK_SIZE, RX_BUFFER_SIZE};
use crate::control::SerialControl;
use crate::error::{Error, Status, WriteError};
use crate::io::ring::RingBuffer;

// ── Public enums ───────────────────────────────────────────────────────────

/// Sub-UART register page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Page {
    /// Control, FIFO and status registers.
    Zero,
    /// Baud generator and FIFO trigger levels.
    One,
}

/// Global per-channel enable registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GlobalReg {
    /// GENA: sub-UART clock.
    Clock,
    /// GRST: sub-UART soft reset.
    Reset,
    /// GIER: sub-UART interrupt.
    Interrupt,
}

impl GlobalReg {
    /// Register address in the global window.
    pub const fn register(self) -> u8 {
        match self {
            GlobalReg::Clock => reg::GENA,
            GlobalReg::Reset => reg::GRST,
            GlobalReg::Interrupt => reg::GIER,
        }
    }
}

/// Progress of [`Channel::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    Unconfigured,
    ClockEnabled,
    Reset,
    PageSelected(Page),
    FormatProgrammed,
    Ready,
}

/// Parsed FSR register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FifoStatus {
    /// Transmitter is shifting a byte out
    pub tx_busy: bool,
    /// TX FIFO holds 256 bytes
    pub tx_full: bool,
    /// TX FIFO not empty
    pub tx_pending: bool,
    /// RX FIFO not empty
    pub rx_pending: bool,
    /// Parity error on a byte in the RX FIFO
    pub parity_error: bool,
    /// Framing error on a byte in the RX FIFO
    pub frame_error: bool,
    /// Line break received
    pub line_break: bool,
    /// RX FIFO overrun
    pub overrun: bool,
}

impl FifoStatus {
    /// Decode a raw FSR value.
    pub fn from_register(value: u8) -> Self {
        Self {
            tx_busy: value & reg::FSR_TBUSY != 0,
            tx_full: value & reg::FSR_TFULL != 0,
            tx_pending: value & reg::FSR_TDAT != 0,
            rx_pending: value & reg::FSR_RDAT != 0,
            parity_error: value & reg::FSR_RFPE != 0,
            frame_error: value & reg::FSR_RFFE != 0,
            line_break: value & reg::FSR_RFBI != 0,
            overrun: value & reg::FSR_RFOE != 0,
        }
    }

    /// Any receive error flag set.
    pub fn has_error(&self) -> bool {
        self.parity_error || self.frame_error || self.line_break || self.overrun
    }
}

// ── Driver struct ──────────────────────────────────────────────────────────

/// One WK2132 sub-UART.
pub struct Channel<I2C, D> {
    i2c: I2C,
    delay: D,
    /// Chip base address (strap bits + fixed pattern).
    base: u8,
    channel: ChannelId,
    config: SerialConfig,
    poll: PollConfig,
    /// Page last selected through SPAGE.
    page: Page,
    state: State,
    status: Status,
    rx: RingBuffer<RX_BUFFER_SIZE>,
}

impl<I2C, D> Channel<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Create a driver for `channel` on the chip strapped with `ia1` / `ia0`.
    pub fn new(i2c: I2C, delay: D, channel: ChannelId, ia1: bool, ia0: bool) -> Self {
        Self::new_with_address(i2c, delay, channel, base_address(ia1, ia0))
    }

    /// Create a driver from an already-encoded base address.
    pub fn new_with_address(i2c: I2C, delay: D, channel: ChannelId, base: u8) -> Self {
        Self {
            i2c,
            delay,
            base,
            channel,
            config: SerialConfig::default(),
            poll: PollConfig::default(),
            page: Page::Zero,
            state: State::Unconfigured,
            status: Status::Ok,
            rx: RingBuffer::new(),
        }
    }

    /// Replace the retry and timeout limits.
    pub fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// Sub-UART this driver talks to.
    pub fn channel(&self) -> ChannelId {
        self.channel
    }

    /// Address of this channel's register window.
    pub fn address(&self) -> u8 {
        self.target().address(self.base)
    }

    /// Line settings from the last successful `begin` or `set_baud`.
    pub fn config(&self) -> &SerialConfig {
        &self.config
    }

    /// Retry and timeout limits.
    pub fn poll_config(&self) -> &PollConfig {
        &self.poll
    }

    /// How far configuration has progressed.
    pub fn state(&self) -> State {
        self.state
    }

    /// Register page last selected through SPAGE.
    pub fn page(&self) -> Page {
        self.page
    }

    /// Outcome of the most recent I2C transaction.
    pub fn last_status(&self) -> Status {
        self.status
    }

    /// `begin` completed and nothing has knocked the channel out since.
    pub fn is_ready(&self) -> bool {
        self.state == State::Ready
    }

    // ── Low-level I2C helpers ──────────────────────────────────────────

    /// Read one register. The object bit of `target` is forced to
    /// "register".
    pub fn read_register(&mut self, target: Target, register: u8) -> Result<u8, I2C::Error> {
        let address = Target::register(target.channel).address(self.base);
        let mut buf = [0u8; 1];
        self.status = Status::DeviceNotDetected;
        self.i2c.write_read(address, &[register], &mut buf)?;
        self.status = Status::Ok;
        Ok(buf[0])
    }

    /// Write one register. The object bit of `target` is forced to
    /// "register".
    pub fn write_register(
        &mut self,
        target: Target,
        register: u8,
        value: u8,
    ) -> Result<(), I2C::Error> {
        let address = Target::register(target.channel).address(self.base);
        self.status = Status::DeviceNotDetected;
        self.i2c.write(address, &[register, value])?;
        self.status = Status::Ok;
        Ok(())
    }

    /// Read-modify-write: `new = current | mask`.
    fn set_bits(&mut self, target: Target, register: u8, mask: u8) -> Result<u8, I2C::Error> {
        let current = self.read_register(target, register)?;
        let new_val = current | mask;
        self.write_register(target, register, new_val)?;
        Ok(new_val)
    }

    /// Read-modify-write: `new = current & !mask`.
    fn clear_bits(&mut self, target: Target, register: u8, mask: u8) -> Result<u8, I2C::Error> {
        let current = self.read_register(target, register)?;
        let new_val = current & !mask;
        self.write_register(target, register, new_val)?;
        Ok(new_val)
    }

    /// Set `mask`'s channel bits in one of the global enable registers.
    pub fn global_enable(&mut self, mask: ChannelMask, which: GlobalReg) -> Result<(), I2C::Error> {
        self.set_bits(Target::GLOBAL, which.register(), mask.bits())?;
        Ok(())
    }

    /// Switch this channel's SPAGE.
    pub fn select_page(&mut self, page: Page) -> Result<(), I2C::Error> {
        let target = self.target();
        match page {
            Page::Zero => self.clear_bits(target, reg::SPAGE, reg::SPAGE_PAGE1)?,
            Page::One => self.set_bits(target, reg::SPAGE, reg::SPAGE_PAGE1)?,
        };
        self.page = page;
        Ok(())
    }

    /// Bulk write to the FIFO data port.
    fn write_fifo_burst(&mut self, data: &[u8]) -> Result<(), I2C::Error> {
        let address = Target::fifo(self.channel).address(self.base);
        for (i, chunk) in data.chunks(I2C_CHUNK_SIZE).enumerate() {
            if i > 0 {
                self.delay.delay_ms(BURST_GAP_MS);
            }
            self.status = Status::DeviceNotDetected;
            self.i2c.write(address, chunk)?;
            self.status = Status::Ok;
        }
        Ok(())
    }

    fn target(&self) -> Target {
        Target {
            channel: self.channel,
            object: Object::Register,
        }
    }

    // ── Configuration sequence ─────────────────────────────────────────

    /// Bring the channel up.
    ///
    /// Checks for the chip, enables the channel's clock, soft-resets it,
    /// enables its interrupt, turns on both FIFOs plus receiver and
    /// transmitter, then programs the baud generator and frame format.
    ///
    /// Only the presence check has dedicated errors ([`Error::Read`],
    /// [`Error::RegData`]); callers usually retry `begin` until it succeeds.
    pub fn begin(&mut self, config: SerialConfig) -> Result<(), Error<I2C::Error>> {
        let Some(divisor) = BaudDivisor::from_baud(config.baud) else {
            self.status = Status::Parameter;
            return Err(Error::Parameter);
        };

        self.rx.clear();
        self.state = State::Unconfigured;

        let gena = self
            .read_register(Target::GLOBAL, reg::GENA)
            .map_err(|_| Error::Read)?;
        if gena & reg::GENA_SENTINEL == 0 {
            #[cfg(feature = "defmt")]
            defmt::warn!("WK2132 GENA reads 0x{:02x}, sentinel missing", gena);
            return Err(Error::RegData);
        }

        let mask = ChannelMask::from(self.channel);
        self.global_enable(mask, GlobalReg::Clock)?;
        self.state = State::ClockEnabled;
        self.global_enable(mask, GlobalReg::Reset)?;
        self.state = State::Reset;
        self.global_enable(mask, GlobalReg::Interrupt)?;

        self.select_page(Page::Zero)?;
        self.state = State::PageSelected(Page::Zero);

        let target = self.target();
        self.set_bits(target, reg::SIER, reg::SIER_DEFAULT)?;
        self.set_bits(target, reg::FCR, reg::FCR_DEFAULT)?;
        self.set_bits(target, reg::SCR, reg::SCR_DEFAULT)?;

        self.program_baud(divisor)?;

        let lcr = self.read_register(target, reg::LCR)?;
        self.write_register(target, reg::LCR, config.lcr(lcr))?;
        self.state = State::FormatProgrammed;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "WK2132 0x{:02x}: {} baud, divisor {}, LCR 0x{:02x}",
            self.address(),
            config.baud,
            divisor.divisor(),
            config.lcr(lcr)
        );

        self.config = config;
        self.rx.clear();
        self.state = State::Ready;
        Ok(())
    }

    /// Soft-reset the channel through GRST. `begin` must be called again
    /// before the channel is used.
    pub fn end(&mut self) -> Result<(), Error<I2C::Error>> {
        self.global_enable(self.channel.into(), GlobalReg::Reset)?;
        self.rx.clear();
        self.state = State::Unconfigured;
        Ok(())
    }

    /// Change the baud rate of a running channel.
    pub fn set_baud(&mut self, baud: u32) -> Result<(), Error<I2C::Error>> {
        self.ensure_ready()?;
        let divisor = BaudDivisor::from_baud(baud).ok_or(Error::Parameter)?;
        if let Err(e) = self.program_baud(divisor) {
            self.drop_ready();
            return Err(e.into());
        }
        self.config.baud = baud;
        Ok(())
    }

    /// Program BAUD1/BAUD0/PRES. The sub-UART must be disabled (SCR = 0)
    /// while the divisor changes; SCR is restored afterwards.
    fn program_baud(&mut self, divisor: BaudDivisor) -> Result<(), I2C::Error> {
        let target = self.target();
        let scr = self.read_register(target, reg::SCR)?;
        self.write_register(target, reg::SCR, 0)?;

        self.select_page(Page::One)?;
        self.write_register(target, reg::BAUD1, divisor.baud1)?;
        self.write_register(target, reg::BAUD0, divisor.baud0)?;
        self.write_register(target, reg::PRES, divisor.pres)?;
        self.select_page(Page::Zero)?;

        self.write_register(target, reg::SCR, scr)
    }

    /// Program the RX/TX FIFO interrupt trigger levels (page 1).
    ///
    /// A failure part-way can leave page 1 selected; the channel then needs
    /// `begin` again.
    pub fn set_fifo_trigger_levels(&mut self, rx: u8, tx: u8) -> Result<(), Error<I2C::Error>> {
        let target = self.target();
        let result = self
            .select_page(Page::One)
            .and_then(|()| self.write_register(target, reg::RFTL, rx))
            .and_then(|()| self.write_register(target, reg::TFTL, tx))
            .and_then(|()| self.select_page(Page::Zero));
        if let Err(e) = result {
            self.drop_ready();
            return Err(e.into());
        }
        Ok(())
    }

    /// Put the sub-UART to sleep (SCR.SLEEPEN).
    pub fn sleep(&mut self) -> Result<(), Error<I2C::Error>> {
        let target = self.target();
        self.set_bits(target, reg::SCR, reg::SCR_SLEEPEN)?;
        Ok(())
    }

    /// Clear SCR.SLEEPEN.
    pub fn wakeup(&mut self) -> Result<(), Error<I2C::Error>> {
        let target = self.target();
        self.clear_bits(target, reg::SCR, reg::SCR_SLEEPEN)?;
        Ok(())
    }

    // ── FIFO status ────────────────────────────────────────────────────

    pub fn fifo_status(&mut self) -> Result<FifoStatus, Error<I2C::Error>> {
        let target = self.target();
        let fsr = self.read_register(target, reg::FSR)?;
        Ok(FifoStatus::from_register(fsr))
    }

    /// Bytes waiting in the hardware RX FIFO.
    ///
    /// RFCNT cannot represent 256; a full FIFO reads 0 with FSR.RDAT set.
    pub fn rx_fifo_count(&mut self) -> Result<usize, Error<I2C::Error>> {
        let target = self.target();
        let count = self.read_register(target, reg::RFCNT)?;
        if count != 0 {
            return Ok(count as usize);
        }
        if self.fifo_status()?.rx_pending {
            Ok(FIFO_DEPTH)
        } else {
            Ok(0)
        }
    }

    /// Bytes queued in the hardware TX FIFO (same 256 rule, via FSR.TFULL).
    pub fn tx_fifo_count(&mut self) -> Result<usize, Error<I2C::Error>> {
        let target = self.target();
        let count = self.read_register(target, reg::TFCNT)?;
        if count != 0 {
            return Ok(count as usize);
        }
        if self.fifo_status()?.tx_full {
            Ok(FIFO_DEPTH)
        } else {
            Ok(0)
        }
    }

    // ── Stream interface ───────────────────────────────────────────────

    /// Bytes readable without waiting: hardware RX FIFO plus bytes already
    /// pulled into the local buffer.
    ///
    /// A transport failure counts the hardware part as 0; check
    /// [`last_status`](Self::last_status) to tell it apart from "no data".
    pub fn available(&mut self) -> usize {
        self.rx_fifo_count().unwrap_or(0) + self.rx.len()
    }

    /// Next byte without consuming it.
    ///
    /// Pulls one byte from the hardware FIFO when nothing is buffered.
    /// Repeated calls return the same byte.
    pub fn peek(&mut self) -> Option<u8> {
        if self.rx.is_empty() && self.rx_fifo_count().unwrap_or(0) > 0 {
            // A failed pull leaves the ring empty and reports None below.
            let _ = self.pull_byte();
        }
        self.rx.peek()
    }

    /// Read up to `buf.len()` bytes, clamped to [`available`](Self::available).
    ///
    /// Hardware pulls are interleaved with draining the local buffer so the
    /// ring never overruns. Returns the number of bytes written to `buf`.
    /// A failed FDAT pull ends the read early; it is only returned as an
    /// error when no byte was delivered.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error<I2C::Error>> {
        self.ensure_ready()?;

        let hardware = self.rx_fifo_count().unwrap_or(0);
        let size = buf.len().min(hardware + self.rx.len());

        let mut pulled = 0;
        let mut failure = None;
        let mut n = 0;
        while n < size {
            if failure.is_none() && pulled < hardware {
                match self.pull_byte() {
                    Ok(true) => pulled += 1,
                    Ok(false) => {}
                    Err(e) => failure = Some(e),
                }
            }
            match self.rx.pop() {
                Some(byte) => {
                    buf[n] = byte;
                    n += 1;
                }
                None => break,
            }
        }

        // Bytes already taken are never discarded; `last_status` keeps the failure.
        match failure {
            Some(e) if n == 0 => Err(Error::Bus(e)),
            _ => Ok(n),
        }
    }

    /// Read a single byte, `None` if nothing is available.
    pub fn read_byte(&mut self) -> Option<u8> {
        let mut buf = [0u8; 1];
        match self.read(&mut buf) {
            Ok(1) => Some(buf[0]),
            _ => None,
        }
    }

    /// Write `data` one byte at a time through FDAT.
    ///
    /// FSR.TFULL is checked before every byte; a full FIFO ends the write
    /// early with the count accepted so far. A failed FSR read or FDAT write
    /// is retried up to [`PollConfig::write_retries`] times before giving up
    /// with a [`WriteError`] carrying the partial count.
    pub fn write(&mut self, data: &[u8]) -> Result<usize, WriteError<I2C::Error>> {
        if let Err(error) = self.ensure_ready() {
            return Err(WriteError { written: 0, error });
        }

        let target = self.target();
        for (written, &byte) in data.iter().enumerate() {
            let mut attempts = 0u8;
            loop {
                match self.try_write_byte(target, byte) {
                    Ok(true) => break,
                    Ok(false) => {
                        #[cfg(feature = "defmt")]
                        defmt::debug!("WK2132 TX FIFO full after {} bytes", written);
                        return Ok(written);
                    }
                    Err(e) if attempts >= self.poll.write_retries => {
                        #[cfg(feature = "defmt")]
                        defmt::warn!("WK2132 write gave up after {} retries", attempts);
                        return Err(WriteError {
                            written,
                            error: Error::Bus(e),
                        });
                    }
                    Err(_) => attempts += 1,
                }
            }
        }
        Ok(data.len())
    }

    /// Block until the TX FIFO is empty (FSR.TDAT clear), or until
    /// [`PollConfig::flush_timeout_us`] has passed.
    pub fn flush(&mut self) -> Result<(), Error<I2C::Error>> {
        self.ensure_ready()?;
        let mut waited = 0u32;
        loop {
            if !self.fifo_status()?.tx_pending {
                return Ok(());
            }
            if waited >= self.poll.flush_timeout_us {
                return Err(Error::Timeout);
            }
            waited = waited.saturating_add(self.poll_wait());
        }
    }

    /// Write through the FIFO data port in 32-byte transactions.
    ///
    /// TFULL is checked once up front and the burst is clamped to the free
    /// space reported by TFCNT. Returns the number of bytes sent.
    pub fn write_burst(&mut self, data: &[u8]) -> Result<usize, Error<I2C::Error>> {
        self.ensure_ready()?;
        if self.fifo_status()?.tx_full {
            return Ok(0);
        }
        let room = FIFO_DEPTH - self.tx_fifo_count()?;
        let n = data.len().min(room);
        self.write_fifo_burst(&data[..n])?;
        Ok(n)
    }

    /// Read through the FIFO data port in 32-byte transactions.
    ///
    /// Buffered bytes are returned first, then up to the hardware count.
    /// As with [`read`](Self::read), a bus failure after some bytes were
    /// delivered ends the call with the partial count.
    pub fn read_burst(&mut self, buf: &mut [u8]) -> Result<usize, Error<I2C::Error>> {
        self.ensure_ready()?;
        let mut n = 0;
        while n < buf.len() {
            match self.rx.pop() {
                Some(byte) => {
                    buf[n] = byte;
                    n += 1;
                }
                None => break,
            }
        }
        if n == buf.len() {
            return Ok(n);
        }

        let hardware = match self.rx_fifo_count() {
            Ok(count) => count,
            Err(_) if n > 0 => return Ok(n),
            Err(e) => return Err(e),
        };
        let m = (buf.len() - n).min(hardware);
        let address = Target::fifo(self.channel).address(self.base);
        for chunk in buf[n..n + m].chunks_mut(I2C_CHUNK_SIZE) {
            self.status = Status::DeviceNotDetected;
            if let Err(e) = self.i2c.read(address, chunk) {
                return if n > 0 { Ok(n) } else { Err(Error::Bus(e)) };
            }
            self.status = Status::Ok;
            n += chunk.len();
        }
        Ok(n)
    }

    // ── Release ────────────────────────────────────────────────────────

    /// Consume the driver and return the I2C bus and delay.
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    // ── Private helpers ────────────────────────────────────────────────

    /// Sleep one poll interval. Returns the time slept in µs.
    pub(super) fn poll_wait(&mut self) -> u32 {
        let interval = self.poll.poll_interval_us.max(1);
        self.delay.delay_us(interval);
        interval
    }

    /// Leave `Ready` after a failure that may have left page 1 selected or
    /// the UART disabled, so stream calls refuse until `begin` runs again.
    fn drop_ready(&mut self) {
        if self.is_ready() {
            self.state = State::PageSelected(self.page);
        }
    }

    fn ensure_ready(&self) -> Result<(), Error<I2C::Error>> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(Error::NotReady)
        }
    }

    /// Move one byte from FDAT into the ring. `Ok(false)` if the ring is
    /// full and nothing was read.
    fn pull_byte(&mut self) -> Result<bool, I2C::Error> {
        if self.rx.is_full() {
            return Ok(false);
        }
        let target = self.target();
        let byte = self.read_register(target, reg::FDAT)?;
        Ok(self.rx.push(byte).is_ok())
    }

    /// `Ok(false)` if TFULL was set and nothing was written.
    fn try_write_byte(&mut self, target: Target, byte: u8) -> Result<bool, I2C::Error> {
        let fsr = self.read_register(target, reg::FSR)?;
        if fsr & reg::FSR_TFULL != 0 {
            return Ok(false);
        }
        self.write_register(target, reg::FDAT, byte)?;
        Ok(true)
    }
}

// ── SerialControl trait implementation ─────────────────────────────────────

impl<I2C, D> SerialControl for Channel<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    type Error = Error<I2C::Error>;

    fn begin(&mut self, config: SerialConfig) -> Result<(), Self::Error> {
        Channel::begin(self, config)
    }

    fn end(&mut self) -> Result<(), Self::Error> {
        Channel::end(self)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Channel::flush(self)
    }
}
