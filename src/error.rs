/// Error type for TLE5012B operations
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Communication error on the SSC bus
    Communication(E),
    /// Safety word reported a system error
    System,
    /// Safety word reported an interface access error
    InterfaceAccess,
    /// Safety word reported an invalid angle value
    InvalidAngle,
    /// CRC of the received data does not match the CRC in the safety word
    Crc,
}
