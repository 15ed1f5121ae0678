//! ICM-42670-P 6-axis IMU driver (accelerometer only)
//!
//! I2C control, polled reads.
//! Reference: ICM-42670-P datasheet, DS-000451

use embedded_hal::i2c::I2c;

use crate::sampler::{Acceleration, OrientationSensor};

/// ICM-42670-P I2C address (AD0 = HIGH)
pub const ICM42670_ADDR: u8 = 0x69;

/// Expected WHO_AM_I value
pub const WHO_AM_I_VALUE: u8 = 0x67;

/// ICM-42670-P register addresses (bank 0)
mod regs {
    pub const ACCEL_DATA_X1: u8 = 0x0B;
    pub const PWR_MGMT0: u8 = 0x1F;
    pub const ACCEL_CONFIG0: u8 = 0x21;
    pub const WHO_AM_I: u8 = 0x75;
}

/// PWR_MGMT0: accelerometer in low-noise mode, gyro off
const ACCEL_MODE_LN: u8 = 0b11;

/// ACCEL_CONFIG0: ±4 g full scale, 100 Hz ODR
const ACCEL_FS_4G_ODR_100HZ: u8 = (0b10 << 5) | 0b1001;

/// Counts per g at ±4 g
const LSB_PER_G: f32 = 8192.0;

/// ICM-42670 driver error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// I2C communication error
    Bus,
    /// Chip answered with an unexpected WHO_AM_I
    WrongChip(u8),
}

impl core::fmt::Display for SensorError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Bus => write!(f, "I2C bus error"),
            Self::WrongChip(id) => write!(
                f,
                "WHO_AM_I 0x{:02X}, expected 0x{:02X}",
                id, WHO_AM_I_VALUE
            ),
        }
    }
}

/// ICM-42670 driver
pub struct Icm42670<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> Icm42670<I2C> {
    /// Create driver; no bus traffic until [`Icm42670::init`]
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Probe the chip and start the accelerometer
    pub fn init(&mut self) -> Result<(), SensorError> {
        let id = self.read_reg(regs::WHO_AM_I)?;
        if id != WHO_AM_I_VALUE {
            return Err(SensorError::WrongChip(id));
        }

        self.write_reg(regs::ACCEL_CONFIG0, ACCEL_FS_4G_ODR_100HZ)?;
        self.write_reg(regs::PWR_MGMT0, ACCEL_MODE_LN)?;
        Ok(())
    }

    /// Raw accelerometer counts (x, y, z)
    pub fn read_raw(&mut self) -> Result<[i16; 3], SensorError> {
        let mut buf = [0u8; 6];
        self.i2c
            .write_read(self.address, &[regs::ACCEL_DATA_X1], &mut buf)
            .map_err(|_| SensorError::Bus)?;

        Ok([
            i16::from_be_bytes([buf[0], buf[1]]),
            i16::from_be_bytes([buf[2], buf[3]]),
            i16::from_be_bytes([buf[4], buf[5]]),
        ])
    }

    /// Give the bus back
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn read_reg(&mut self, reg: u8) -> Result<u8, SensorError> {
        let mut val = [0u8; 1];
        self.i2c
            .write_read(self.address, &[reg], &mut val)
            .map_err(|_| SensorError::Bus)?;
        Ok(val[0])
    }

    fn write_reg(&mut self, reg: u8, val: u8) -> Result<(), SensorError> {
        self.i2c
            .write(self.address, &[reg, val])
            .map_err(|_| SensorError::Bus)
    }
}

impl<I2C: I2c> OrientationSensor for Icm42670<I2C> {
    type Error = SensorError;

    fn read(&mut self) -> Result<Acceleration, SensorError> {
        let [x, y, z] = self.read_raw()?;
        Ok(Acceleration {
            ax: f32::from(x) / LSB_PER_G,
            ay: f32::from(y) / LSB_PER_G,
            az: f32::from(z) / LSB_PER_G,
        })
    }
}
