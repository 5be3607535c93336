//! The HT16K33 is an LED driver IC that communicates over I2C. It supports 16x8
//! multiplexed LEDs and can perform input key scanning, although that feature
//! is not implemented here.
//!
//! It works by having 16 bytes of display memory that correspond to the LEDs,
//! each LED having 1 bit determining if it is on or off. LEDs are numbered
//! 0-127, LED `n` being bit `n % 8` of display byte `n / 8`.
//!
//! This driver keeps a copy of the display memory. Setting LEDs only changes
//! that copy, and [`Ht16k33::refresh`] pushes all of it to the device. The
//! HT16K33 holds LEDs according to its display memory so nothing needs to be
//! refreshed until the LEDs change.
//!
//! Which LEDs correspond to which row+common pairs depends on the multiplexed
//! LED circuit, which is external to this chip. See
//! [`crate::matrix8x8`] for the common 8x8 matrix backpack.
//!
//! [HT16K33 datasheet](https://cdn-shop.adafruit.com/datasheets/ht16K33v110.pdf)

use core::fmt;

#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};

use crate::i2c_device::I2cDeviceConnection;

/// The number of bytes in the display data used by the device.
pub const DISPLAY_DATA_LENGTH: usize = 16;
/// The highest LED number.
pub const MAX_LED: u8 = (DISPLAY_DATA_LENGTH * 8 - 1) as u8;
/// The highest brightness (dimming) level. 0 is the dimmest but is not off.
pub const MAX_BRIGHTNESS: u8 = 15;

const SYSTEM_SETUP_REGISTER: u8 = 0b0010_0000;
const SYSTEM_SETUP_ENABLE_OSCILLATOR: u8 = 0b0000_0001;
const DISPLAY_REGISTER: u8 = 0b1000_0000;
const DISPLAY_ON: u8 = 0b0000_0001;
const DISPLAY_OFF: u8 = 0b0000_0000;
const BLINK_2HZ: u8 = 0b0000_0010;
const BLINK_1HZ: u8 = 0b0000_0100;
const BLINK_HALF_HZ: u8 = 0b0000_0110;
const DIMMING_REGISTER: u8 = 0b1110_0000;
// Sent once during initialization, before the display is turned off.
const ROW_DATA_INIT: u8 = 0b1110_1111;
const DISPLAY_DATA_START_REGISTER: u8 = 0x00;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Ht16k33Error<I2C> {
    /// The bus failed to carry out a write.
    I2c(I2C),
    /// `parameter` was larger than `max`. The bus is never touched when this
    /// is returned.
    OutOfRange {
        parameter: &'static str,
        max: u8,
    },
}

impl<I2C> From<I2C> for Ht16k33Error<I2C> {
    fn from(value: I2C) -> Self {
        Self::I2c(value)
    }
}

impl<I2C: fmt::Debug> fmt::Display for Ht16k33Error<I2C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I2c(err) => write!(f, "I2C error: {:?}", err),
            Self::OutOfRange { parameter, max } => {
                write!(f, "{} must be between 0 and {}", parameter, max)
            }
        }
    }
}

/// How [`Ht16k33::refresh`] sends the display data to the device.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum RefreshMode {
    /// One 2-byte write (`[row, data]`) per row, rows in ascending order.
    #[default]
    PerRow,
    /// A single 17-byte write starting at row 0. The device increments its
    /// row pointer after every byte.
    Burst,
}

/// Blinking modes of the display.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum Blink {
    #[default]
    Off,
    TwoHz,
    OneHz,
    HalfHz,
}

impl Blink {
    fn bits(self) -> u8 {
        match self {
            Blink::Off => 0,
            Blink::TwoHz => BLINK_2HZ,
            Blink::OneHz => BLINK_1HZ,
            Blink::HalfHz => BLINK_HALF_HZ,
        }
    }
}

/// Driver for the HT16K33.
pub struct Ht16k33<D> {
    device: D,
    display_data: [u8; DISPLAY_DATA_LENGTH],
    refresh_mode: RefreshMode,
}

impl<D, E> Ht16k33<D>
where
    D: I2cDeviceConnection<Error = E>,
    E: fmt::Debug,
{
    /// Creates a driver for the HT16K33 reachable through `device` and
    /// initializes it: the oscillator is turned on, the display is turned off
    /// and every LED is cleared. Brightness is left at the device's setting.
    ///
    /// If any write fails the error is returned and the device may be left
    /// partly configured.
    pub fn new(device: D) -> Result<Self, Ht16k33Error<E>> {
        Self::with_refresh_mode(device, RefreshMode::default())
    }

    /// Same as [`Ht16k33::new`], but display data is sent with `refresh_mode`,
    /// including during initialization.
    pub fn with_refresh_mode(device: D, refresh_mode: RefreshMode) -> Result<Self, Ht16k33Error<E>> {
        let mut driver = Self {
            device,
            display_data: [0u8; DISPLAY_DATA_LENGTH],
            refresh_mode,
        };

        driver.initialize()?;
        Ok(driver)
    }

    fn initialize(&mut self) -> Result<(), Ht16k33Error<E>> {
        debug!("Initializing HT16K33");
        self.write_one(SYSTEM_SETUP_REGISTER | SYSTEM_SETUP_ENABLE_OSCILLATOR)?;
        self.write_one(ROW_DATA_INIT)?;
        // Clear the display since it will show whatever was last stored
        self.set_display_state(false)?;
        self.refresh()?;
        debug!("HT16K33 initialized");
        Ok(())
    }

    /// Sends the driver's display data to the device so the LEDs match it.
    /// If a write fails, no further writes are attempted and the device shows
    /// only the rows written before the failure.
    pub fn refresh(&mut self) -> Result<(), Ht16k33Error<E>> {
        trace!("Refreshing HT16K33: {:02x?}", self.display_data);

        match self.refresh_mode {
            RefreshMode::PerRow => {
                for (row, data) in self.display_data.iter().enumerate() {
                    self.device.write(&[row as u8, *data])?;
                }
            }
            RefreshMode::Burst => {
                let mut bytes = [0u8; DISPLAY_DATA_LENGTH + 1];
                bytes[0] = DISPLAY_DATA_START_REGISTER;
                bytes[1..].copy_from_slice(&self.display_data);
                self.device.write(&bytes)?;
            }
        }

        Ok(())
    }

    /// Sets the brightness of the display, where `brightness` is 0-15. 0 is
    /// the dimmest but still on.
    pub fn set_brightness(&mut self, brightness: u8) -> Result<(), Ht16k33Error<E>> {
        if brightness > MAX_BRIGHTNESS {
            warn!("Rejected brightness {}", brightness);
            return Err(Ht16k33Error::OutOfRange {
                parameter: "brightness",
                max: MAX_BRIGHTNESS,
            });
        }

        debug!("Setting HT16K33 brightness to {}", brightness);
        self.write_one(DIMMING_REGISTER | brightness)
    }

    /// Turns every LED on or off. Nothing is sent until the next `refresh`.
    pub fn set_all_led_state(&mut self, on: bool) {
        let data = if on { 0xFF } else { 0x00 };
        self.display_data.fill(data);
    }

    /// Turns `led` (0-127) on or off. Nothing is sent until the next `refresh`.
    pub fn set_led_state(&mut self, led: u8, on: bool) -> Result<(), Ht16k33Error<E>> {
        let (index, mask) = Self::locate(led)?;

        if on {
            self.display_data[index] |= mask;
        } else {
            self.display_data[index] &= !mask;
        }

        Ok(())
    }

    /// Returns whether `led` (0-127) is on in the driver's display data.
    pub fn led_state(&self, led: u8) -> Result<bool, Ht16k33Error<E>> {
        let (index, mask) = Self::locate(led)?;
        Ok(self.display_data[index] & mask != 0)
    }

    /// Enables/disables displaying the LEDs that are set to be on. This also
    /// turns blinking off.
    pub fn set_display_state(&mut self, on: bool) -> Result<(), Ht16k33Error<E>> {
        debug!("Setting HT16K33 display on: {}", on);

        if on {
            self.write_one(DISPLAY_REGISTER | DISPLAY_ON)
        } else {
            self.write_one(DISPLAY_REGISTER | DISPLAY_OFF)
        }
    }

    /// Turns the display on with the given blinking mode.
    /// `Blink::Off` is the same as `set_display_state(true)`.
    pub fn set_blink(&mut self, blink: Blink) -> Result<(), Ht16k33Error<E>> {
        debug!("Setting HT16K33 blink to {:?}", blink);
        self.write_one(DISPLAY_REGISTER | DISPLAY_ON | blink.bits())
    }

    /// The driver's copy of the display data, which is what the device shows
    /// after the next `refresh`.
    pub fn display_data(&self) -> &[u8; DISPLAY_DATA_LENGTH] {
        &self.display_data
    }

    pub fn refresh_mode(&self) -> RefreshMode {
        self.refresh_mode
    }

    /// Consumes `self` and returns the device connection so it can be reused.
    /// Nothing is sent to the device.
    pub fn release(self) -> D {
        self.device
    }

    /// Byte index and bit mask of `led` in the display data.
    fn locate(led: u8) -> Result<(usize, u8), Ht16k33Error<E>> {
        if led > MAX_LED {
            warn!("Rejected LED {}", led);
            return Err(Ht16k33Error::OutOfRange {
                parameter: "led",
                max: MAX_LED,
            });
        }

        Ok(((led / 8) as usize, 1 << (led % 8)))
    }

    /// Helper to write a single byte to the device
    fn write_one(&mut self, byte: u8) -> Result<(), Ht16k33Error<E>> {
        self.device.write_byte(byte)?;
        Ok(())
    }
}
