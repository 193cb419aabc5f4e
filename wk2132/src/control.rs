use crate::config::SerialConfig;

/// Trait for serial ports whose line settings are programmed at runtime.
pub trait SerialControl {
    /// Error type for control operations.
    type Error;

    /// Apply `config` and bring the port up.
    fn begin(&mut self, config: SerialConfig) -> Result<(), Self::Error>;

    /// Take the port down. `begin` must be called again before use.
    fn end(&mut self) -> Result<(), Self::Error>;

    /// Wait until everything written has left the transmitter.
    fn flush(&mut self) -> Result<(), Self::Error>;
}
