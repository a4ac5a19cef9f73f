//! MPU-6050 I2C Driver Implementation

use super::registers;
use crate::devices::traits::{AttitudeSensor, AttitudeSensorError};
use crate::platform::traits::I2cInterface;
use glider_core::attitude::RawMotion;
use glider_core::parameters::SystemParams;

/// Maximum consecutive errors before marking sensor unhealthy
const MAX_CONSECUTIVE_ERRORS: u32 = 3;

/// MPU-6050 driver generic over the I2C bus
pub struct Mpu6050<I: I2cInterface> {
    i2c: I,
    address: u8,
    bus_frequency_hz: Option<u32>,
    healthy: bool,
    error_count: u32,
    initialized: bool,
}

impl<I: I2cInterface> Mpu6050<I> {
    /// Driver at the default address; call [`AttitudeSensor::probe`] before reading
    pub fn new(i2c: I) -> Self {
        Self::with_address(i2c, registers::MPU6050_ADDR)
    }

    pub fn with_address(i2c: I, address: u8) -> Self {
        Self {
            i2c,
            address,
            bus_frequency_hz: None,
            healthy: false,
            error_count: 0,
            initialized: false,
        }
    }

    /// Driver at the default address that sets the bus to
    /// `i2c_frequency_hz` when probed
    pub fn from_config(i2c: I, params: &SystemParams) -> Self {
        Self::new(i2c).with_bus_frequency(params.i2c_frequency_hz)
    }

    /// Bus clock applied at the start of [`AttitudeSensor::probe`]
    pub fn with_bus_frequency(mut self, frequency_hz: u32) -> Self {
        self.bus_frequency_hz = Some(frequency_hz);
        self
    }

    fn apply_bus_frequency(&mut self) -> Result<(), AttitudeSensorError> {
        match self.bus_frequency_hz {
            Some(frequency_hz) => self
                .i2c
                .set_frequency(frequency_hz)
                .map_err(|_| AttitudeSensorError::Unavailable),
            None => Ok(()),
        }
    }

    /// Read and check the identity register
    pub fn check_identity(&mut self) -> Result<(), AttitudeSensorError> {
        let who_am_i = self
            .i2c
            .read_register(self.address, registers::WHO_AM_I)
            .map_err(|_| AttitudeSensorError::Unavailable)?;
        if who_am_i != registers::WHO_AM_I_VALUE {
            return Err(AttitudeSensorError::WrongDevice(who_am_i));
        }
        Ok(())
    }

    /// Wake the sensor and set ranges and filter
    pub fn configure(&mut self) -> Result<(), AttitudeSensorError> {
        let writes = [
            (registers::PWR_MGMT_1, registers::PWR_MGMT_1_WAKE),
            (registers::ACCEL_CONFIG, registers::ACCEL_FS_2G),
            (registers::GYRO_CONFIG, registers::GYRO_FS_250),
            (registers::CONFIG, registers::DLPF_CFG_94HZ),
        ];
        for (register, value) in writes {
            self.i2c
                .write_register(self.address, register, value)
                .map_err(|_| AttitudeSensorError::Unavailable)?;
        }
        self.initialized = true;
        self.healthy = true;
        self.error_count = 0;
        Ok(())
    }

    /// Decode the measurement block
    pub fn decode(block: &[u8; registers::MEASUREMENT_BLOCK_LEN]) -> RawMotion {
        let word = |offset: usize| i16::from_be_bytes([block[offset], block[offset + 1]]);
        RawMotion {
            ax: word(registers::OFFSET_ACCEL_X),
            ay: word(registers::OFFSET_ACCEL_Y),
            az: word(registers::OFFSET_ACCEL_Z),
            gz: word(registers::OFFSET_GYRO_Z),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.healthy
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Release the bus
    pub fn into_inner(self) -> I {
        self.i2c
    }
}

impl<I: I2cInterface> AttitudeSensor for Mpu6050<I> {
    fn probe(&mut self) -> bool {
        let result = self
            .apply_bus_frequency()
            .and_then(|_| self.check_identity())
            .and_then(|_| self.configure());
        match result {
            Ok(()) => {
                crate::log_info!("MPU-6050 detected at address {}", self.address);
                true
            }
            Err(e) => {
                crate::log_warn!("MPU-6050 probe failed: {}", e.as_str());
                self.healthy = false;
                false
            }
        }
    }

    fn read_raw(&mut self) -> Result<RawMotion, AttitudeSensorError> {
        if !self.initialized {
            return Err(AttitudeSensorError::Unavailable);
        }

        let mut block = [0u8; registers::MEASUREMENT_BLOCK_LEN];
        self.i2c
            .read_registers(self.address, registers::ACCEL_XOUT_H, &mut block)
            .map_err(|_| {
                self.error_count += 1;
                if self.error_count >= MAX_CONSECUTIVE_ERRORS {
                    self.healthy = false;
                }
                AttitudeSensorError::ReadFailed
            })?;
        self.error_count = 0;
        Ok(Self::decode(&block))
    }

    fn name(&self) -> &'static str {
        "MPU-6050"
    }
}
