//! Bit-banged SSC transport over GPIO pins.
//!
//! The sensor's SSC interface is SPI mode 1 (CPOL=0, CPHA=1) with a single
//! half-duplex data line. Modeling the data line as an open-drain pin that
//! implements both [`OutputPin`] and [`InputPin`] lets one pin type serve
//! both directions: releasing the driver (line high) is the input state.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::interface::{DataDirection, SscInterface};

// Half clock period for the default 500 kHz bus clock.
const HALF_PERIOD_NS: u32 = 1_000;

/// Error type for the bit-banged transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitBangError {
    /// A GPIO operation failed
    Pin,
}

/// Bit-banged SSC bus over three GPIO pins and a delay source.
///
/// `DATA` must be an open-drain capable pin implementing both [`OutputPin`]
/// and [`InputPin`].
#[derive(Debug)]
pub struct BitBangSsc<SCK, DATA, CS, D> {
    sck: SCK,
    data: DATA,
    cs: CS,
    delay: D,
}

impl<SCK, DATA, CS, D> BitBangSsc<SCK, DATA, CS, D>
where
    SCK: OutputPin,
    DATA: OutputPin + InputPin,
    CS: OutputPin,
    D: DelayNs,
{
    /// Create a new bit-banged bus with the clock parked low and the device
    /// deselected
    pub fn new(mut sck: SCK, data: DATA, mut cs: CS, delay: D) -> Result<Self, BitBangError> {
        cs.set_high().map_err(|_| BitBangError::Pin)?;
        sck.set_low().map_err(|_| BitBangError::Pin)?;

        Ok(Self {
            sck,
            data,
            cs,
            delay,
        })
    }

    /// Release the pins and the delay source, consuming the bus
    pub fn release(self) -> (SCK, DATA, CS, D) {
        (self.sck, self.data, self.cs, self.delay)
    }

    fn send_word(&mut self, word: u16) -> Result<(), BitBangError> {
        for bit in (0..16).rev() {
            self.sck.set_high().map_err(|_| BitBangError::Pin)?;

            if word & (1 << bit) == 0 {
                self.data.set_low().map_err(|_| BitBangError::Pin)?;
            } else {
                self.data.set_high().map_err(|_| BitBangError::Pin)?;
            }

            self.delay.delay_ns(HALF_PERIOD_NS);
            // sensor samples on the falling edge
            self.sck.set_low().map_err(|_| BitBangError::Pin)?;
            self.delay.delay_ns(HALF_PERIOD_NS);
        }

        Ok(())
    }

    fn receive_word(&mut self) -> Result<u16, BitBangError> {
        let mut word = 0;

        for _ in 0..16 {
            self.sck.set_high().map_err(|_| BitBangError::Pin)?;
            self.delay.delay_ns(HALF_PERIOD_NS);
            self.sck.set_low().map_err(|_| BitBangError::Pin)?;

            let high = self.data.is_high().map_err(|_| BitBangError::Pin)?;
            word = (word << 1) | u16::from(high);

            self.delay.delay_ns(HALF_PERIOD_NS);
        }

        Ok(word)
    }
}

impl<SCK, DATA, CS, D> SscInterface for BitBangSsc<SCK, DATA, CS, D>
where
    SCK: OutputPin,
    DATA: OutputPin + InputPin,
    CS: OutputPin,
    D: DelayNs,
{
    type Error = BitBangError;

    fn select(&mut self) -> Result<(), Self::Error> {
        self.cs.set_low().map_err(|_| BitBangError::Pin)
    }

    fn deselect(&mut self) -> Result<(), Self::Error> {
        self.cs.set_high().map_err(|_| BitBangError::Pin)
    }

    fn send_words(&mut self, words: &[u16]) -> Result<(), Self::Error> {
        for &word in words {
            self.send_word(word)?;
        }

        Ok(())
    }

    fn receive_words(&mut self, buf: &mut [u16]) -> Result<(), Self::Error> {
        for slot in buf {
            *slot = self.receive_word()?;
        }

        Ok(())
    }

    fn set_data_direction(&mut self, direction: DataDirection) -> Result<(), Self::Error> {
        match direction {
            // the line is driven per bit while sending
            DataDirection::Output => Ok(()),
            // releasing the open-drain driver hands the line to the sensor
            DataDirection::Input => self.data.set_high().map_err(|_| BitBangError::Pin),
        }
    }

    fn set_lines_idle(&mut self) -> Result<(), Self::Error> {
        self.sck.set_low().map_err(|_| BitBangError::Pin)?;
        self.data.set_high().map_err(|_| BitBangError::Pin)
    }

    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }
}
