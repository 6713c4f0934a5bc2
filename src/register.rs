//! Command encodings and register layouts for the TLE5012B sensor.

/// Number of configuration registers covered by the block CRC read.
pub(crate) const CRC_REGISTER_COUNT: usize = 8;

/// Read commands for the TLE5012B.
///
/// Structure of the 16-bit command word (MSB to LSB):
/// - bit 15: 0 write, 1 read
/// - bits 14:11: `0000` operational access (addresses 0x00-0x04),
///   `1010` configuration access (addresses 0x05-0x11)
/// - bit 10: 0 current value, 1 value in the update buffer
/// - bits 9:4: 6-bit register address
/// - bits 3:0: 4-bit number of data words
///
/// The values are part of the wire contract with the sensor and must not be
/// altered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
#[repr(u16)]
pub enum Command {
    /// Status register (STAT)
    Status = 0x8001,
    /// Activation status register (ACSTAT)
    ActivationStatus = 0x8011,
    /// Angle value register (AVAL)
    AngleValue = 0x8021,
    /// Angle speed register (ASPD)
    AngleSpeed = 0x8031,
    /// Angle revolution register (AREV)
    Revolutions = 0x8041,
    /// Temperature register (FSYNC/TEMPER)
    Temperature = 0x8051,
    /// Interface mode 1 register (MOD_1), holds the FIR filter mode
    Mod1 = 0x8061,
    /// SIL test register
    Sil = 0x8071,
    /// Interface mode 2 register (MOD_2), holds angle range and prediction
    Mod2 = 0x8081,
    /// Block read of the eight configuration registers validated by one
    /// safety word
    BlockCrc = 0x8088,
    /// Interface mode 3 register (MOD_3)
    Mod3 = 0x8091,
    /// X offset register (OFFX)
    OffsetX = 0x80A1,
    /// Y offset register (OFFY)
    OffsetY = 0x80B1,
    /// Synchronicity register (SYNCH)
    Synch = 0x80C1,
    /// IFAB interface register (IFAB)
    Ifab = 0x80D1,
    /// Interface mode 4 register (MOD_4)
    Mod4 = 0x80E1,
    /// Temperature coefficient register (TCO_Y)
    TempCoefficient = 0x80F1,
    /// Raw X value register (ADC_X)
    RawX = 0x8101,
    /// Raw Y value register (ADC_Y)
    RawY = 0x8111,
    /// Status register, update buffer
    UpdStatus = 0x8401,
    /// Angle value register, update buffer
    UpdAngleValue = 0x8421,
    /// Angle speed register, update buffer
    UpdAngleSpeed = 0x8431,
    /// Angle revolution register, update buffer
    UpdRevolutions = 0x8441,
}

impl From<Command> for u16 {
    fn from(command: Command) -> u16 {
        command as u16
    }
}

bitfield::bitfield! {
    /// Safety word returned after every transaction.
    ///
    /// The status flags are active low: a cleared flag signals the error
    /// condition. Bits 11:8 identify the responding sensor by pulling its
    /// bit low while the others stay high.
    pub struct SafetyWord(u16);
    impl Debug;
    /// Chip reset or watchdog overflow indicator (1 = no reset occurred)
    pub no_reset, _: 15;
    /// System error flag (1 = no error)
    pub no_system_error, _: 14;
    /// Interface access error flag (1 = no error)
    pub no_interface_error, _: 13;
    /// Angle value validity flag (1 = valid)
    pub angle_valid, _: 12;
    u8;
    /// Sensor number response indicator
    pub responding_sensors, _: 11, 8;
    /// CRC over the command word and the returned register words
    pub crc, _: 7, 0;
}

bitfield::bitfield! {
    /// MOD_1
    pub struct Mod1Register(u16);
    impl Debug;
    u8;
    /// FIR filter update rate setting
    pub fir_md, _: 15, 14;
    /// Incremental interface mode
    pub iif_mod, _: 1, 0;
}

bitfield::bitfield! {
    /// MOD_2
    pub struct Mod2Register(u16);
    impl Debug;
    /// Angle range setting
    pub u16, ang_range, _: 14, 4;
    /// Angle direction
    pub ang_dir, _: 3;
    /// Prediction of the angle value enabled
    pub predict, _: 2;
    u8;
    /// Autocalibration mode
    pub autocal, _: 1, 0;
}

/// Contents of the eight configuration registers (addresses 0x08-0x0F)
/// returned by a block CRC read, validated together by a single safety word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterSnapshot {
    words: [u16; CRC_REGISTER_COUNT],
}

impl RegisterSnapshot {
    pub(crate) const fn new(words: [u16; CRC_REGISTER_COUNT]) -> Self {
        Self { words }
    }

    /// All eight register words in address order
    #[must_use]
    pub const fn words(&self) -> &[u16; CRC_REGISTER_COUNT] {
        &self.words
    }

    /// MOD_2 register value
    #[must_use]
    pub const fn mod2(&self) -> u16 {
        self.words[0]
    }

    /// MOD_3 register value
    #[must_use]
    pub const fn mod3(&self) -> u16 {
        self.words[1]
    }

    /// X offset register value
    #[must_use]
    pub const fn offset_x(&self) -> u16 {
        self.words[2]
    }

    /// Y offset register value
    #[must_use]
    pub const fn offset_y(&self) -> u16 {
        self.words[3]
    }

    /// Synchronicity register value
    #[must_use]
    pub const fn synch(&self) -> u16 {
        self.words[4]
    }

    /// IFAB register value
    #[must_use]
    pub const fn ifab(&self) -> u16 {
        self.words[5]
    }

    /// MOD_4 register value
    #[must_use]
    pub const fn mod4(&self) -> u16 {
        self.words[6]
    }

    /// Temperature coefficient register value
    #[must_use]
    pub const fn temp_coefficient(&self) -> u16 {
        self.words[7]
    }
}
