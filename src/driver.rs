//! Blocking driver for the TLE5012B magnetic angle sensor

use crate::{
    error::Error,
    interface::{DataDirection, SscInterface},
    register::{CRC_REGISTER_COUNT, Command, Mod1Register, Mod2Register, RegisterSnapshot, SafetyWord},
    utils,
};

const DUMMY_WORD: u16 = 0xFFFF;

// Command word plus up to eight register words, big-endian.
const CRC_INPUT_MAX: usize = 2 + 2 * CRC_REGISTER_COUNT;

// Hold time of the select pulse that latches the update buffers.
const UPDATE_HOLD_US: u32 = 1;

const FULL_ANGLE: f32 = 360.0;
const POW_2_15: f32 = 32768.0;
const POW_2_7: f32 = 128.0;

const TEMP_OFFSET: f32 = 152.0;
const TEMP_DIV: f32 = 2.776;

const MICROS_TO_SECONDS: f32 = 1e-6;

/// TLE5012B driver instance
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tle5012b<SSC> {
    bus: SSC,
}

impl<SSC, E> Tle5012b<SSC>
where
    SSC: SscInterface<Error = E>,
{
    /// Create a new TLE5012B driver instance
    pub fn new(bus: SSC) -> Self {
        Self { bus }
    }

    /// Release the bus, consuming the driver
    pub fn release(self) -> SSC {
        self.bus
    }

    /// Read a single register from the sensor
    ///
    /// The transaction sends the 16-bit command word, then receives the
    /// register word followed by the safety word validating the exchange.
    ///
    /// # Errors
    ///
    /// Returns an error if the bus transfer fails or the safety word reports
    /// a failed transaction
    pub fn read_register(&mut self, command: Command) -> Result<u16, Error<E>> {
        let command = u16::from(command);

        #[cfg(feature = "defmt")]
        defmt::trace!("Issuing read command 0x{:04X}", command);

        self.bus.select().map_err(Error::Communication)?;
        self.bus
            .set_data_direction(DataDirection::Output)
            .map_err(Error::Communication)?;
        self.bus.send_words(&[command]).map_err(Error::Communication)?;
        self.bus
            .set_data_direction(DataDirection::Input)
            .map_err(Error::Communication)?;

        let mut data = [0u16; 1];
        self.bus.receive_words(&mut data).map_err(Error::Communication)?;

        let mut safety = [0u16; 1];
        self.bus
            .receive_words(&mut safety)
            .map_err(Error::Communication)?;

        self.bus.deselect().map_err(Error::Communication)?;

        self.check_safety(safety[0], command, &data)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("Command 0x{:04X} returned 0x{:04X}", command, data[0]);

        Ok(data[0])
    }

    /// Read the eight configuration registers validated by one safety word
    ///
    /// # Errors
    ///
    /// Returns an error if the bus transfer fails or the safety word reports
    /// a failed transaction
    pub fn read_block_crc(&mut self) -> Result<RegisterSnapshot, Error<E>> {
        let command = u16::from(Command::BlockCrc);

        self.bus.select().map_err(Error::Communication)?;
        self.bus
            .set_data_direction(DataDirection::Output)
            .map_err(Error::Communication)?;
        self.bus.send_words(&[command]).map_err(Error::Communication)?;
        self.bus
            .set_data_direction(DataDirection::Input)
            .map_err(Error::Communication)?;

        let mut words = [0u16; CRC_REGISTER_COUNT];
        self.bus
            .receive_words(&mut words)
            .map_err(Error::Communication)?;

        let mut safety = [0u16; 1];
        self.bus
            .receive_words(&mut safety)
            .map_err(Error::Communication)?;

        self.bus.deselect().map_err(Error::Communication)?;

        self.check_safety(safety[0], command, &words)?;

        Ok(RegisterSnapshot::new(words))
    }

    /// Latch the current angle, speed and revolution values into the update
    /// buffers
    ///
    /// The buffered values are read back with the `Upd*` commands.
    ///
    /// # Errors
    ///
    /// Returns an error if driving the bus lines fails
    pub fn trigger_update(&mut self) -> Result<(), Error<E>> {
        self.bus.set_lines_idle().map_err(Error::Communication)?;
        self.bus.select().map_err(Error::Communication)?;
        self.bus.delay_us(UPDATE_HOLD_US);
        self.bus.deselect().map_err(Error::Communication)?;

        Ok(())
    }

    /// Validate the safety word of a finished transaction.
    ///
    /// The status flags are checked first; only when they all report success
    /// is the CRC over {command, register words} recomputed and compared.
    fn check_safety(&mut self, safety: u16, command: u16, registers: &[u16]) -> Result<(), Error<E>> {
        let safety = SafetyWord(safety);

        if !safety.no_system_error() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Safety word reports a system error");
            return Err(Error::System);
        }

        if !safety.no_interface_error() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Safety word reports an interface access error");
            return Err(Error::InterfaceAccess);
        }

        if !safety.angle_valid() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Safety word reports an invalid angle value");
            return Err(Error::InvalidAngle);
        }

        let mut crc_input = [0u8; CRC_INPUT_MAX];
        let length = 2 + 2 * registers.len();

        crc_input[..2].copy_from_slice(&command.to_be_bytes());
        for (chunk, register) in crc_input[2..length].chunks_exact_mut(2).zip(registers) {
            chunk.copy_from_slice(&register.to_be_bytes());
        }

        let crc = utils::crc8(&crc_input[..length]);

        if crc == safety.crc() {
            Ok(())
        } else {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "Safety CRC mismatch: computed 0x{:02X}, received 0x{:02X}",
                crc,
                safety.crc()
            );
            self.reset_safety();
            Err(Error::Crc)
        }
    }

    /// Clear the latched safety error state.
    ///
    /// The error flags in the safety word stay latched until the status
    /// register is read again, so a CRC failure would otherwise taint every
    /// following transaction. Best effort: outcomes are ignored.
    fn reset_safety(&mut self) {
        let _ = self.trigger_update();

        let _ = self.bus.select();
        let _ = self.bus.send_words(&[Command::Status.into()]);
        let _ = self.bus.send_words(&[DUMMY_WORD]);
        let _ = self.bus.send_words(&[DUMMY_WORD]);
        let _ = self.bus.deselect();
    }

    /// Get the angle value in degrees
    ///
    /// # Errors
    ///
    /// Returns an error if the bus transfer fails or the safety word reports
    /// a failed transaction
    pub fn angle(&mut self) -> Result<f32, Error<E>> {
        let raw = self.read_register(Command::AngleValue)?;

        Ok(FULL_ANGLE / POW_2_15 * f32::from(utils::decode_signed_15(raw)))
    }

    /// Get the angle value in degrees from the update buffer
    ///
    /// # Errors
    ///
    /// Returns an error if the bus transfer fails or the safety word reports
    /// a failed transaction
    pub fn updated_angle(&mut self) -> Result<f32, Error<E>> {
        let raw = self.read_register(Command::UpdAngleValue)?;

        Ok(FULL_ANGLE / POW_2_15 * f32::from(utils::decode_signed_15(raw)))
    }

    /// Get the angle speed in degrees per second
    ///
    /// Combines the raw speed register with the configured angle range, the
    /// FIR filter update rate (MOD_1) and the prediction setting (MOD_2), so
    /// four register reads are issued in sequence. The first failing read
    /// aborts the operation.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the four reads fails
    pub fn angle_speed(&mut self) -> Result<f32, Error<E>> {
        let raw = self.read_register(Command::AngleSpeed)?;

        self.angle_speed_from(raw)
    }

    /// Get the angle speed in degrees per second from the update buffer
    ///
    /// # Errors
    ///
    /// Returns an error if any of the four reads fails
    pub fn updated_angle_speed(&mut self) -> Result<f32, Error<E>> {
        let raw = self.read_register(Command::UpdAngleSpeed)?;

        self.angle_speed_from(raw)
    }

    fn angle_speed_from(&mut self, raw: u16) -> Result<f32, Error<E>> {
        let raw_speed = utils::decode_signed_15(raw);
        let angle_range = self.angle_range()?;
        let mod1 = Mod1Register(self.read_register(Command::Mod1)?);
        let mod2 = Mod2Register(self.read_register(Command::Mod2)?);

        Ok(calculate_angle_speed(
            angle_range,
            raw_speed,
            mod1.fir_md(),
            mod2.predict(),
        ))
    }

    /// Get the signed revolution count
    ///
    /// # Errors
    ///
    /// Returns an error if the bus transfer fails or the safety word reports
    /// a failed transaction
    pub fn revolutions(&mut self) -> Result<i16, Error<E>> {
        let raw = self.read_register(Command::Revolutions)?;

        Ok(utils::decode_signed_9(raw))
    }

    /// Get the signed revolution count from the update buffer
    ///
    /// # Errors
    ///
    /// Returns an error if the bus transfer fails or the safety word reports
    /// a failed transaction
    pub fn updated_revolutions(&mut self) -> Result<i16, Error<E>> {
        let raw = self.read_register(Command::UpdRevolutions)?;

        Ok(utils::decode_signed_9(raw))
    }

    /// Get the temperature in degrees Celsius
    ///
    /// # Errors
    ///
    /// Returns an error if the bus transfer fails or the safety word reports
    /// a failed transaction
    pub fn temperature(&mut self) -> Result<f32, Error<E>> {
        let raw = self.read_register(Command::Temperature)?;

        Ok((f32::from(utils::decode_signed_9(raw)) + TEMP_OFFSET) / TEMP_DIV)
    }

    /// Get the configured angle measurement range in degrees
    ///
    /// The range field lives in bits 14:4 of MOD_2. A zero field (corrupted
    /// configuration) yields an infinite result; the sensor never reports
    /// zero in normal operation.
    ///
    /// # Errors
    ///
    /// Returns an error if the bus transfer fails or the safety word reports
    /// a failed transaction
    pub fn angle_range(&mut self) -> Result<f32, Error<E>> {
        let raw = self.read_register(Command::Mod2)?;
        let range = Mod2Register(raw).ang_range();

        Ok(FULL_ANGLE * (POW_2_7 / f32::from(range)))
    }
}

/// Angle speed formula from the data sheet.
///
/// The FIR filter mode selects the sensor's internal update rate; prediction
/// halves or thirds the effective sample distance.
fn calculate_angle_speed(angle_range: f32, raw_speed: i16, fir_md: u8, prediction: bool) -> f32 {
    let fir_update_rate_us = match fir_md {
        0 => 21.3,
        1 => 42.7,
        2 => 85.3,
        3 => 170.6,
        // fir_md is a 2-bit field
        _ => 0.0,
    };

    let prediction_divisor = if prediction { 3.0 } else { 2.0 };

    (angle_range / POW_2_15 * f32::from(raw_speed))
        / (prediction_divisor * fir_update_rate_us * MICROS_TO_SECONDS)
}
