//! Register-level WK2132 model for tests.
//!
//! Decodes the chip's address scheme, keeps paged per-channel register
//! files and software RX/TX FIFOs, and logs every register write. Faults
//! can be injected per register. Wrap it in a `RefCell` and hand out
//! [`SimBus`] handles so several channels and the test body can reach it.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{self, ErrorType, I2c, NoAcknowledgeSource, Operation};

use super::registers as reg;
use crate::constants::FIFO_DEPTH;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimError;

impl i2c::Error for SimError {
    fn kind(&self) -> i2c::ErrorKind {
        i2c::ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
    }
}

/// One sub-UART's state.
#[derive(Default)]
pub struct SimUart {
    pub spage: u8,
    pub page0: [u8; 16],
    pub page1: [u8; 16],
    pub rx: VecDeque<u8>,
    /// Bytes queued for transmission while `tx_stalled`.
    pub tx: VecDeque<u8>,
    /// Everything that left the transmitter.
    pub sent: Vec<u8>,
    /// Transmitted bytes land in this channel's own RX FIFO.
    pub loopback: bool,
    /// Hold written bytes in the TX FIFO instead of sending them.
    pub tx_stalled: bool,
    /// While stalled, drain the TX FIFO after this many FSR reads.
    pub drain_after_fsr_reads: Option<usize>,
    /// Error flags OR-ed into FSR reads.
    pub fsr_errors: u8,
}

impl SimUart {
    fn transmit(&mut self, byte: u8) {
        self.sent.push(byte);
        if self.loopback && self.rx.len() < FIFO_DEPTH {
            self.rx.push_back(byte);
        }
    }

    fn drain_tx(&mut self) {
        while let Some(byte) = self.tx.pop_front() {
            self.transmit(byte);
        }
    }

    fn fsr(&self) -> u8 {
        let mut fsr = self.fsr_errors;
        if self.tx.len() >= FIFO_DEPTH {
            fsr |= reg::FSR_TFULL;
        }
        if !self.tx.is_empty() {
            fsr |= reg::FSR_TDAT | reg::FSR_TBUSY;
        }
        if !self.rx.is_empty() {
            fsr |= reg::FSR_RDAT;
        }
        fsr
    }
}

/// Register write as seen on the bus: (address, register, value).
pub type WriteRecord = (u8, u8, u8);

pub struct Wk2132Sim {
    base: u8,
    pub global: [u8; 0x20],
    pub uarts: [SimUart; 2],
    /// NACK every transaction.
    pub absent: bool,
    /// (register, accesses to let through first, accesses to fail).
    faults: Vec<(u8, usize, usize)>,
    /// Register pointer set by the last register-object write.
    pointer: Option<(usize, u8)>,
    /// Writes to page 0 and global registers.
    pub writes: Vec<WriteRecord>,
    /// Writes that landed in a page 1 register.
    pub page1_writes: Vec<WriteRecord>,
    /// Register reads: (address, register).
    pub reads: Vec<(u8, u8)>,
    /// FIFO-object transfers: (address, length).
    pub fifo_writes: Vec<(u8, usize)>,
    pub fifo_reads: Vec<(u8, usize)>,
    /// FIFO-object reads to let through before `fifo_read_failures` kicks in.
    pub fifo_read_skip: usize,
    /// FIFO-object reads to fail. A failed read consumes nothing.
    pub fifo_read_failures: usize,
}

impl Wk2132Sim {
    pub fn new(base: u8) -> Self {
        let mut global = [0u8; 0x20];
        global[reg::GENA as usize] = reg::GENA_SENTINEL;
        Self {
            base,
            global,
            uarts: [SimUart::default(), SimUart::default()],
            absent: false,
            faults: Vec::new(),
            pointer: None,
            writes: Vec::new(),
            page1_writes: Vec::new(),
            reads: Vec::new(),
            fifo_writes: Vec::new(),
            fifo_reads: Vec::new(),
            fifo_read_skip: 0,
            fifo_read_failures: 0,
        }
    }

    /// Chip strapped IA1 = IA0 = 1.
    pub fn default_address() -> Self {
        Self::new(0x70)
    }

    /// Make the next `count` accesses to `register` fail.
    pub fn fail(&mut self, register: u8, count: usize) {
        self.fail_after(register, 0, count);
    }

    /// Let `skip` accesses to `register` succeed, then fail `count`.
    pub fn fail_after(&mut self, register: u8, skip: usize, count: usize) {
        self.faults.push((register, skip, count));
    }

    /// Place bytes in a channel's RX FIFO as if they arrived on the wire.
    pub fn receive(&mut self, channel: usize, data: &[u8]) {
        self.uarts[channel].rx.extend(data.iter().copied());
    }

    /// Register value as the driver would read it, without side effects.
    pub fn register(&self, channel: usize, register: u8) -> u8 {
        let uart = &self.uarts[channel];
        match register {
            reg::GENA | reg::GRST | reg::GMUT | reg::GIER | reg::GIFR => {
                self.global[register as usize]
            }
            reg::SPAGE => uart.spage,
            r if uart.spage & reg::SPAGE_PAGE1 != 0 && r >= 0x04 => uart.page1[r as usize & 0x0F],
            r => uart.page0[r as usize & 0x0F],
        }
    }

    /// Page 1 register regardless of the current SPAGE.
    pub fn page1(&self, channel: usize, register: u8) -> u8 {
        self.uarts[channel].page1[register as usize & 0x0F]
    }

    /// Writes that targeted `register`, in order.
    pub fn writes_to(&self, register: u8) -> Vec<WriteRecord> {
        self.writes
            .iter()
            .copied()
            .filter(|&(_, r, _)| r == register)
            .collect()
    }

    fn take_fault(&mut self, register: u8) -> bool {
        for fault in self.faults.iter_mut() {
            if fault.0 != register || fault.2 == 0 {
                continue;
            }
            if fault.1 > 0 {
                fault.1 -= 1;
                return false;
            }
            fault.2 -= 1;
            return true;
        }
        false
    }

    /// Decode an address into (channel, is_fifo).
    fn decode(&self, address: u8) -> Result<(usize, bool), SimError> {
        if self.absent || address & 0xF8 != self.base & 0xF8 {
            return Err(SimError);
        }
        let channel = ((address >> 1) & 0x03) as usize;
        if channel > 1 {
            return Err(SimError);
        }
        Ok((channel, address & 0x01 != 0))
    }

    fn handle_write(&mut self, address: u8, bytes: &[u8]) -> Result<(), SimError> {
        let (channel, fifo) = self.decode(address)?;
        if fifo {
            self.fifo_writes.push((address, bytes.len()));
            for &b in bytes {
                self.push_tx(channel, b);
            }
            return Ok(());
        }
        let Some((&register, values)) = bytes.split_first() else {
            return Ok(());
        };
        if self.take_fault(register) {
            return Err(SimError);
        }
        self.pointer = Some((channel, register));
        for &value in values {
            if self.in_page1(channel, register) {
                self.page1_writes.push((address, register, value));
            } else {
                self.writes.push((address, register, value));
            }
            self.write_register(channel, register, value);
        }
        Ok(())
    }

    fn handle_read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), SimError> {
        let (channel, fifo) = self.decode(address)?;
        if fifo {
            if self.fifo_read_failures > 0 {
                if self.fifo_read_skip > 0 {
                    self.fifo_read_skip -= 1;
                } else {
                    self.fifo_read_failures -= 1;
                    return Err(SimError);
                }
            }
            self.fifo_reads.push((address, buf.len()));
            for b in buf.iter_mut() {
                *b = self.uarts[channel].rx.pop_front().unwrap_or(0);
            }
            return Ok(());
        }
        let (pointed, register) = self.pointer.ok_or(SimError)?;
        if pointed != channel {
            return Err(SimError);
        }
        if self.take_fault(register) {
            return Err(SimError);
        }
        self.reads.push((address, register));
        for b in buf.iter_mut() {
            *b = self.read_register(channel, register);
        }
        Ok(())
    }

    /// Registers 0x04..=0x0F are paged; the rest are shared.
    fn in_page1(&self, channel: usize, register: u8) -> bool {
        self.uarts[channel].spage & reg::SPAGE_PAGE1 != 0 && (0x04..=0x0F).contains(&register)
    }

    fn push_tx(&mut self, channel: usize, byte: u8) {
        let uart = &mut self.uarts[channel];
        if uart.tx_stalled {
            if uart.tx.len() < FIFO_DEPTH {
                uart.tx.push_back(byte);
            }
        } else {
            uart.transmit(byte);
        }
    }

    fn write_register(&mut self, channel: usize, register: u8, value: u8) {
        match register {
            reg::GENA => self.global[reg::GENA as usize] = value | reg::GENA_SENTINEL,
            // Reset bits self-clear.
            reg::GRST => self.global[reg::GRST as usize] = value & !0x03,
            reg::GMUT | reg::GIER | reg::GIFR => self.global[register as usize] = value,
            reg::SPAGE => self.uarts[channel].spage = value,
            r if self.in_page1(channel, r) => self.uarts[channel].page1[r as usize & 0x0F] = value,
            reg::FDAT => self.push_tx(channel, value),
            reg::FCR => {
                let uart = &mut self.uarts[channel];
                if value & reg::FCR_RFRST != 0 {
                    uart.rx.clear();
                }
                uart.page0[reg::FCR as usize] = value & !0x03;
            }
            r => self.uarts[channel].page0[r as usize & 0x0F] = value,
        }
    }

    fn read_register(&mut self, channel: usize, register: u8) -> u8 {
        if self.in_page1(channel, register) {
            return self.register(channel, register);
        }
        let uart = &mut self.uarts[channel];
        match register {
            reg::RFCNT => uart.rx.len() as u8,
            reg::TFCNT => uart.tx.len() as u8,
            reg::FSR => {
                let fsr = uart.fsr();
                if uart.tx_stalled {
                    if let Some(n) = uart.drain_after_fsr_reads.as_mut() {
                        if *n == 0 {
                            uart.drain_tx();
                        } else {
                            *n -= 1;
                        }
                    }
                }
                fsr
            }
            reg::FDAT => uart.rx.pop_front().unwrap_or(0),
            _ => self.register(channel, register),
        }
    }
}

/// Shared handle to a [`Wk2132Sim`].
pub struct SimBus<'a>(pub &'a RefCell<Wk2132Sim>);

impl ErrorType for SimBus<'_> {
    type Error = SimError;
}

impl I2c for SimBus<'_> {
    fn read(&mut self, address: u8, read: &mut [u8]) -> Result<(), Self::Error> {
        self.0.borrow_mut().handle_read(address, read)
    }

    fn write(&mut self, address: u8, write: &[u8]) -> Result<(), Self::Error> {
        self.0.borrow_mut().handle_write(address, write)
    }

    fn write_read(
        &mut self,
        address: u8,
        write: &[u8],
        read: &mut [u8],
    ) -> Result<(), Self::Error> {
        let mut sim = self.0.borrow_mut();
        sim.handle_write(address, write)?;
        sim.handle_read(address, read)
    }

    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut sim = self.0.borrow_mut();
        for op in operations {
            match op {
                Operation::Write(bytes) => sim.handle_write(address, bytes)?,
                Operation::Read(buf) => sim.handle_read(address, buf)?,
            }
        }
        Ok(())
    }
}

/// Delay that only counts.
#[derive(Default)]
pub struct MockDelay {
    pub total_ns: u64,
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
    }
}
