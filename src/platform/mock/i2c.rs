//! Mock I2C implementation for testing

use crate::platform::{
    error::{I2cError, PlatformError},
    traits::{I2cConfig, I2cInterface},
    Result,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

/// I2C transaction type for logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum I2cTransaction {
    /// Write transaction
    Write { addr: u8, data: Vec<u8> },
    /// Read transaction
    Read { addr: u8, len: usize },
    /// Write-Read transaction
    WriteRead {
        addr: u8,
        write_data: Vec<u8>,
        read_len: usize,
    },
}

#[derive(Debug)]
struct BusState {
    config: I2cConfig,
    device_addr: u8,
    registers: [u8; 256],
    transactions: Vec<I2cTransaction>,
    /// Error returned by every transaction while set
    failure: Option<I2cError>,
    /// Transactions left before `failure` takes effect
    fail_after: usize,
}

/// Mock I2C bus with a single register-mapped device
///
/// Writes of `[reg, value, ...]` store into consecutive registers; reads
/// after a one-byte register write return consecutive registers. Any other
/// address NACKs. Every transaction is logged.
#[derive(Debug, Clone)]
pub struct MockI2c {
    state: Rc<RefCell<BusState>>,
}

impl MockI2c {
    /// Bus with a device answering at `device_addr`
    pub fn new(config: I2cConfig, device_addr: u8) -> Self {
        Self {
            state: Rc::new(RefCell::new(BusState {
                config,
                device_addr,
                registers: [0; 256],
                transactions: Vec::new(),
                failure: None,
                fail_after: 0,
            })),
        }
    }

    /// Preload device registers starting at `register`
    pub fn set_registers(&self, register: u8, values: &[u8]) {
        let mut state = self.state.borrow_mut();
        for (offset, value) in values.iter().enumerate() {
            let index = (usize::from(register) + offset) & 0xFF;
            state.registers[index] = *value;
        }
    }

    pub fn register(&self, register: u8) -> u8 {
        self.state.borrow().registers[usize::from(register)]
    }

    /// Fail every transaction after `after` more have succeeded
    pub fn fail_after(&self, after: usize, error: I2cError) {
        let mut state = self.state.borrow_mut();
        state.failure = Some(error);
        state.fail_after = after;
    }

    pub fn clear_failure(&self) {
        self.state.borrow_mut().failure = None;
    }

    /// Get transaction log (for test verification)
    pub fn transactions(&self) -> Vec<I2cTransaction> {
        self.state.borrow().transactions.clone()
    }

    pub fn clear_transactions(&self) {
        self.state.borrow_mut().transactions.clear();
    }

    pub fn frequency(&self) -> u32 {
        self.state.borrow().config.frequency
    }

    fn begin(&self, addr: u8, transaction: I2cTransaction) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.transactions.push(transaction);

        if let Some(error) = state.failure {
            if state.fail_after == 0 {
                return Err(PlatformError::I2c(error));
            }
            state.fail_after -= 1;
        }

        if addr != state.device_addr {
            return Err(PlatformError::I2c(I2cError::Nack));
        }
        Ok(())
    }
}

impl I2cInterface for MockI2c {
    fn write(&mut self, addr: u8, data: &[u8]) -> Result<()> {
        self.begin(
            addr,
            I2cTransaction::Write {
                addr,
                data: data.to_vec(),
            },
        )?;

        if let Some((register, values)) = data.split_first() {
            self.set_registers(*register, values);
        }
        Ok(())
    }

    fn read(&mut self, addr: u8, buffer: &mut [u8]) -> Result<()> {
        self.begin(
            addr,
            I2cTransaction::Read {
                addr,
                len: buffer.len(),
            },
        )?;
        buffer.fill(0);
        Ok(())
    }

    fn write_read(&mut self, addr: u8, write_data: &[u8], read_buffer: &mut [u8]) -> Result<()> {
        self.begin(
            addr,
            I2cTransaction::WriteRead {
                addr,
                write_data: write_data.to_vec(),
                read_len: read_buffer.len(),
            },
        )?;

        let start = usize::from(write_data.first().copied().unwrap_or(0));
        let state = self.state.borrow();
        for (offset, byte) in read_buffer.iter_mut().enumerate() {
            *byte = state.registers[(start + offset) & 0xFF];
        }
        Ok(())
    }

    fn set_frequency(&mut self, frequency: u32) -> Result<()> {
        self.state.borrow_mut().config.frequency = frequency;
        Ok(())
    }
}
