//! Byte-level access to a single device on an I2C bus.
//!
//! Drivers in this crate talk to their device through [`I2cDeviceConnection`]
//! rather than a raw bus, so they never deal with addressing. Any
//! `embedded_hal::i2c::I2c` bus can be bound to one device address with
//! [`I2cConnection`].
use embedded_hal::i2c::I2c;

/// Default address of the HT16K33 when none of its address pins are tied high.
pub const HT16K33_BASE_ADDRESS: u8 = 0x70;
/// Highest address the HT16K33 can be strapped to (A0, A1 and A2 all high).
pub const HT16K33_MAX_ADDRESS: u8 = 0x77;

/// Connection to one device on an I2C bus.
pub trait I2cDeviceConnection {
    type Error: core::fmt::Debug;

    /// Writes a single byte to the device.
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Writes `bytes` to the device in one transfer.
    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Reads a single byte from the device.
    fn read_byte(&mut self) -> Result<u8, Self::Error>;

    /// Fills `buffer` with bytes read from the device in one transfer.
    fn read(&mut self, buffer: &mut [u8]) -> Result<(), Self::Error>;
}

/// An `I2c` bus bound to the device at `address`.
pub struct I2cConnection<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C, E> I2cConnection<I2C>
where
    I2C: I2c<Error = E>,
{
    /// Creates a connection that will communicate using `i2c` as the I2C bus
    /// to the device at `address`, which must be a 7-bit address.
    /// This function does not communicate with the device.
    pub fn new(i2c: I2C, address: u8) -> Self {
        assert!(address & 0b1000_0000 == 0);

        Self {
            i2c,
            address,
        }
    }

    /// The 7-bit address of the device.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Consumes `self` and returns the `i2c` that it owned so it can be reused.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C, E> I2cDeviceConnection for I2cConnection<I2C>
where
    I2C: I2c<Error = E>,
    E: core::fmt::Debug,
{
    type Error = E;

    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.i2c.write(self.address, &[byte])
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.i2c.write(self.address, bytes)
    }

    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        let data = &mut [0u8; 1];
        self.i2c.read(self.address, data)?;
        Ok(data[0])
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<(), Self::Error> {
        self.i2c.read(self.address, buffer)
    }
}
