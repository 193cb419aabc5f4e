//! Driver errors and the last-operation status code.

/// Outcome of the most recent I2C transaction.
///
/// Set to [`Status::DeviceNotDetected`] before every transaction and back to
/// [`Status::Ok`] once it succeeds, so it can be polled after calls whose
/// return value hides transport failures (for example [`available`]).
///
/// [`available`]: crate::bridge::Channel::available
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    Ok = 0,
    Error = 1,
    DeviceNotDetected = 2,
    SoftVersion = 3,
    Parameter = 4,
}

/// Driver error, generic over the I2C bus error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Transport failure.
    Bus(E),
    /// The presence check could not read GENA.
    Read,
    /// GENA was readable but its sentinel bit was clear.
    RegData,
    /// Argument out of range (e.g. a baud rate the generator cannot produce).
    Parameter,
    /// Stream operation on a channel that has not completed `begin`.
    NotReady,
    /// A bounded poll ran out of time.
    Timeout,
}

impl<E> Error<E> {
    /// Signed numeric code: `RegData` is -1 and `Read` is -2.
    pub fn code(&self) -> i8 {
        match self {
            Error::RegData => -1,
            Error::Read => -2,
            Error::Bus(_) => -3,
            Error::Parameter => -4,
            Error::NotReady => -5,
            Error::Timeout => -6,
        }
    }

    /// Matching [`Status`] value.
    pub fn status(&self) -> Status {
        match self {
            Error::Bus(_) | Error::Read | Error::Timeout => Status::DeviceNotDetected,
            Error::Parameter => Status::Parameter,
            Error::RegData | Error::NotReady => Status::Error,
        }
    }
}

impl<E> From<E> for Error<E>
where
    E: embedded_hal::i2c::Error,
{
    fn from(e: E) -> Self {
        Error::Bus(e)
    }
}

impl<E: core::fmt::Debug> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Bus(e) => write!(f, "i2c transport error: {e:?}"),
            Error::Read => f.write_str("device presence read failed"),
            Error::RegData => f.write_str("unexpected GENA contents"),
            Error::Parameter => f.write_str("invalid parameter"),
            Error::NotReady => f.write_str("channel not configured"),
            Error::Timeout => f.write_str("timed out"),
        }
    }
}

impl<E: embedded_hal::i2c::Error> embedded_io::Error for Error<E> {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            Error::Bus(_) | Error::Read | Error::RegData => embedded_io::ErrorKind::Other,
            Error::Parameter => embedded_io::ErrorKind::InvalidInput,
            Error::NotReady => embedded_io::ErrorKind::NotConnected,
            Error::Timeout => embedded_io::ErrorKind::TimedOut,
        }
    }
}

/// A `write` that stopped part-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WriteError<E> {
    /// Bytes accepted by the TX FIFO before the failure.
    pub written: usize,
    pub error: Error<E>,
}
