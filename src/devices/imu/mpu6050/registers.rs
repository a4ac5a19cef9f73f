//! MPU-6050 Register Definitions
//!
//! Based on the MPU-6000/MPU-6050 Register Map (RM-MPU-6000A-00).

/// I2C address when AD0 is low
pub const MPU6050_ADDR: u8 = 0x68;

/// I2C address when AD0 is high
pub const MPU6050_ADDR_ALT: u8 = 0x69;

/// Configuration register (DLPF, FSYNC)
pub const CONFIG: u8 = 0x1A;

/// Gyroscope configuration (full-scale range)
pub const GYRO_CONFIG: u8 = 0x1B;

/// Accelerometer configuration (full-scale range)
pub const ACCEL_CONFIG: u8 = 0x1C;

/// First register of the measurement block
pub const ACCEL_XOUT_H: u8 = 0x3B;

/// Power management 1 (sleep, clock source)
pub const PWR_MGMT_1: u8 = 0x6B;

/// Identity register
pub const WHO_AM_I: u8 = 0x75;

/// Expected WHO_AM_I value
pub const WHO_AM_I_VALUE: u8 = 0x68;

/// Clear sleep bit, internal oscillator
pub const PWR_MGMT_1_WAKE: u8 = 0x00;

/// ±250 deg/s full scale
pub const GYRO_FS_250: u8 = 0x00;

/// ±2 g full scale
pub const ACCEL_FS_2G: u8 = 0x00;

/// DLPF 94 Hz accel / 98 Hz gyro
pub const DLPF_CFG_94HZ: u8 = 0x02;

/// Accel XYZ, temperature, gyro XYZ: seven big-endian words
pub const MEASUREMENT_BLOCK_LEN: usize = 14;

/// Byte offsets inside the measurement block
pub const OFFSET_ACCEL_X: usize = 0;
pub const OFFSET_ACCEL_Y: usize = 2;
pub const OFFSET_ACCEL_Z: usize = 4;
pub const OFFSET_GYRO_Z: usize = 12;
