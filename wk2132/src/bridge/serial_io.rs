//! `embedded_io` and `core::fmt::Write` adapters for [`Channel`].
//!
//! The `embedded_io` contracts block until at least one byte moves. Those
//! waits poll at [`PollConfig::poll_interval_us`] and give up with
//! [`Error::Timeout`] after [`PollConfig::io_timeout_us`].
//!
//! [`PollConfig::poll_interval_us`]: crate::config::PollConfig::poll_interval_us
//! [`PollConfig::io_timeout_us`]: crate::config::PollConfig::io_timeout_us

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use super::channel::Channel;
use crate::error::{Error, WriteError};

impl<I2C, D> embedded_io::ErrorType for Channel<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    type Error = Error<I2C::Error>;
}

impl<I2C, D> embedded_io::Read for Channel<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if buf.is_empty() {
            return Ok(0);
        }
        let mut waited = 0u32;
        loop {
            let n = Channel::read(self, buf)?;
            if n > 0 {
                return Ok(n);
            }
            if waited >= self.poll_config().io_timeout_us {
                return Err(Error::Timeout);
            }
            waited = waited.saturating_add(self.poll_wait());
        }
    }
}

impl<I2C, D> embedded_io::ReadReady for Channel<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(self.available() > 0)
    }
}

impl<I2C, D> embedded_io::Write for Channel<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if buf.is_empty() {
            return Ok(0);
        }
        let mut waited = 0u32;
        loop {
            match Channel::write(self, buf) {
                Ok(0) => {}
                Ok(n) => return Ok(n),
                Err(WriteError { written, .. }) if written > 0 => return Ok(written),
                Err(WriteError { error, .. }) => return Err(error),
            }
            // TX FIFO full: wait for the UART to drain it.
            if waited >= self.poll_config().io_timeout_us {
                return Err(Error::Timeout);
            }
            waited = waited.saturating_add(self.poll_wait());
        }
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Channel::flush(self)
    }
}

impl<I2C, D> embedded_io::WriteReady for Channel<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    fn write_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.fifo_status()?.tx_full)
    }
}

impl<I2C, D> core::fmt::Write for Channel<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        embedded_io::Write::write_all(self, s.as_bytes()).map_err(|_| core::fmt::Error)
    }
}
