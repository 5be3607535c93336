//! Display driver for the [Adafruit 8x8 LED matrix HT16K33 Backpack](https://learn.adafruit.com/adafruit-led-backpack/1-2-8x8-matrix).
//!
//! Each matrix row is wired to one common of the HT16K33, which is every other
//! byte of its display data, so row `y` starts at LED `y * 16`. The matrix
//! columns are wired to the rows of the HT16K33 shifted by one: column 0 is the
//! last bit of the byte and column `x` (for `x > 0`) is bit `x - 1`.
//!
//! Pixel coordinates have (0, 0) at the top left. The matrix can be mounted in
//! any of four orientations, given as a [`Rotation`].

use core::fmt;

#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};

use crate::{
    ht16k33::{Blink, Ht16k33, Ht16k33Error},
    i2c_device::I2cDeviceConnection,
};

/// Number of pixel columns.
pub const WIDTH: u8 = 8;
/// Number of pixel rows.
pub const HEIGHT: u8 = 8;

// Number of LEDs between the start of two matrix rows
const ROW_STRIDE: u8 = 16;

/// Clockwise rotation of the matrix relative to its default orientation.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    /// Maps pixel (`x`, `y`) to the matrix's unrotated coordinates.
    fn apply(self, x: u8, y: u8) -> (u8, u8) {
        match self {
            Rotation::R0 => (x, y),
            Rotation::R90 => (WIDTH - 1 - y, HEIGHT - 1 - x),
            Rotation::R180 => (WIDTH - 1 - x, HEIGHT - 1 - y),
            Rotation::R270 => (y, x),
        }
    }
}

pub struct Matrix8x8<D> {
    device: Ht16k33<D>,
    rotation: Rotation,
}

impl<D, E> Matrix8x8<D>
where
    D: I2cDeviceConnection<Error = E>,
    E: fmt::Debug,
{
    /// Creates a matrix driven by an already initialized `device`.
    pub fn new(device: Ht16k33<D>, rotation: Rotation) -> Self {
        Self {
            device,
            rotation,
        }
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Turns pixel (`x`, `y`) on or off. Nothing is sent until the next
    /// `refresh`.
    pub fn set_pixel_state(&mut self, x: u8, y: u8, on: bool) -> Result<(), Ht16k33Error<E>> {
        let led = self.pixel_to_led(x, y)?;
        self.device.set_led_state(led, on)
    }

    /// Returns whether pixel (`x`, `y`) is on in the driver's display data.
    pub fn pixel_state(&self, x: u8, y: u8) -> Result<bool, Ht16k33Error<E>> {
        let led = self.pixel_to_led(x, y)?;
        self.device.led_state(led)
    }

    /// Turns every pixel off. Nothing is sent until the next `refresh`.
    pub fn clear(&mut self) {
        self.device.set_all_led_state(false);
    }

    /// Turns every pixel on. Nothing is sent until the next `refresh`.
    pub fn fill(&mut self) {
        self.device.set_all_led_state(true);
    }

    /// Sends the pixels to the device.
    pub fn refresh(&mut self) -> Result<(), Ht16k33Error<E>> {
        self.device.refresh()
    }

    /// Sets how bright the matrix is, where `brightness` is 0-15.
    pub fn set_brightness(&mut self, brightness: u8) -> Result<(), Ht16k33Error<E>> {
        self.device.set_brightness(brightness)
    }

    /// Enables/disables displaying the pixels that are on.
    pub fn set_display_state(&mut self, on: bool) -> Result<(), Ht16k33Error<E>> {
        self.device.set_display_state(on)
    }

    pub fn set_blink(&mut self, blink: Blink) -> Result<(), Ht16k33Error<E>> {
        self.device.set_blink(blink)
    }

    pub fn controller(&self) -> &Ht16k33<D> {
        &self.device
    }

    pub fn controller_mut(&mut self) -> &mut Ht16k33<D> {
        &mut self.device
    }

    /// Consumes `self` and returns the HT16K33 driver so it can be reused.
    pub fn release(self) -> Ht16k33<D> {
        self.device
    }

    /// Converts pixel (`x`, `y`) to the HT16K33 LED it is connected to.
    fn pixel_to_led(&self, x: u8, y: u8) -> Result<u8, Ht16k33Error<E>> {
        if x >= WIDTH {
            warn!("Rejected pixel x {}", x);
            return Err(Ht16k33Error::OutOfRange { parameter: "x", max: WIDTH - 1 });
        }

        if y >= HEIGHT {
            warn!("Rejected pixel y {}", y);
            return Err(Ht16k33Error::OutOfRange { parameter: "y", max: HEIGHT - 1 });
        }

        let (x, y) = self.rotation.apply(x, y);

        // Column 0 is wired to the last bit of the row
        Ok(y * ROW_STRIDE + (x + WIDTH - 1) % WIDTH)
    }
}
