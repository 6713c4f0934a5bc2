//! Word-level transport abstraction for the sensor's SSC bus.

/// Direction of the shared data line.
///
/// The TLE5012B uses a single half-duplex data line: the master drives it
/// while sending the command word and releases it while the sensor shifts
/// out the register and safety words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataDirection {
    /// Master drives the data line
    Output,
    /// Data line released, sensor drives it
    Input,
}

/// Word-level access to the synchronous serial (SSC) bus.
///
/// Implementations own the electrical details: clocking, chip-select
/// polarity and any bounded waits on the underlying peripheral. The driver
/// only sequences whole 16-bit words through this trait, so it can be tested
/// against a scripted implementation without hardware.
pub trait SscInterface {
    /// Transport error type
    type Error;

    /// Assert the device select line
    fn select(&mut self) -> Result<(), Self::Error>;

    /// Deassert the device select line
    fn deselect(&mut self) -> Result<(), Self::Error>;

    /// Clock out `words` MSB-first while the data line is driven
    fn send_words(&mut self, words: &[u16]) -> Result<(), Self::Error>;

    /// Clock in `buf.len()` words MSB-first while the data line is released
    fn receive_words(&mut self, buf: &mut [u16]) -> Result<(), Self::Error>;

    /// Switch the shared data line between master-driven and released
    fn set_data_direction(&mut self, direction: DataDirection) -> Result<(), Self::Error>;

    /// Drive the clock line low and the data line high.
    ///
    /// The sensor latches its update buffers on a select pulse while the bus
    /// sits at these levels.
    fn set_lines_idle(&mut self) -> Result<(), Self::Error>;

    /// Busy-wait for `us` microseconds
    fn delay_us(&mut self, us: u32);
}
