//! Mock I2C implementation for testing

use crate::platform::{
    Result,
    error::{I2cError, PlatformError},
    traits::{I2cConfig, I2cInterface},
};
use std::collections::VecDeque;
use std::vec::Vec;

/// I2C transaction type for logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum I2cTransaction {
    /// Write transaction
    Write { addr: u8, data: Vec<u8> },
    /// Write-Read transaction
    WriteRead {
        addr: u8,
        write_data: Vec<u8>,
        read_len: usize,
    },
}

/// Scripted result for an upcoming transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scripted {
    Fail(I2cError),
    Short(usize),
}

/// Mock I2C implementation
///
/// Records every transaction and lets tests script failures for the next
/// transactions (NACK, timeout, short write). Reads return zeros. Failed
/// transactions are not recorded.
#[derive(Debug)]
pub struct MockI2c {
    config: I2cConfig,
    transactions: Vec<I2cTransaction>,
    script: VecDeque<Scripted>,
    absent: Vec<u8>,
}

impl MockI2c {
    /// Create a new mock I2C
    pub fn new(config: I2cConfig) -> Self {
        Self {
            config,
            transactions: Vec::new(),
            script: VecDeque::new(),
            absent: Vec::new(),
        }
    }

    /// Get transaction log (for test verification)
    pub fn transactions(&self) -> &[I2cTransaction] {
        &self.transactions
    }

    /// Payloads of all writes to `addr`, oldest first
    pub fn writes_to(&self, addr: u8) -> Vec<Vec<u8>> {
        self.transactions
            .iter()
            .filter_map(|t| match t {
                I2cTransaction::Write { addr: a, data } if *a == addr => Some(data.clone()),
                _ => None,
            })
            .collect()
    }

    /// Clear transaction log
    pub fn clear_transactions(&mut self) {
        self.transactions.clear();
    }

    /// Fail the next transaction with `error`
    pub fn fail_next(&mut self, error: I2cError) {
        self.script.push_back(Scripted::Fail(error));
    }

    /// Acknowledge only `written` bytes of the next write
    pub fn short_write_next(&mut self, written: usize) {
        self.script.push_back(Scripted::Short(written));
    }

    /// NACK every transaction to `addr` until cleared
    pub fn set_absent(&mut self, addr: u8) {
        self.absent.push(addr);
    }

    /// Undo `set_absent`
    pub fn set_present(&mut self, addr: u8) {
        self.absent.retain(|a| *a != addr);
    }

    /// Current bus frequency
    pub fn frequency(&self) -> u32 {
        self.config.frequency
    }

    /// Current transaction timeout
    pub fn timeout_us(&self) -> u32 {
        self.config.timeout_us
    }

    fn precheck(&mut self, addr: u8) -> Result<Option<usize>> {
        if addr > 0x7F {
            return Err(PlatformError::I2c(I2cError::InvalidAddress));
        }
        if self.absent.contains(&addr) {
            return Err(PlatformError::I2c(I2cError::Nack));
        }
        match self.script.pop_front() {
            Some(Scripted::Fail(e)) => Err(PlatformError::I2c(e)),
            Some(Scripted::Short(n)) => Ok(Some(n)),
            None => Ok(None),
        }
    }
}

impl I2cInterface for MockI2c {
    fn write(&mut self, addr: u8, data: &[u8]) -> Result<usize> {
        let written = self
            .precheck(addr)?
            .map_or(data.len(), |n| n.min(data.len()));
        self.transactions.push(I2cTransaction::Write {
            addr,
            data: data[..written].to_vec(),
        });
        Ok(written)
    }

    fn write_read(&mut self, addr: u8, write_data: &[u8], read_buffer: &mut [u8]) -> Result<()> {
        self.precheck(addr)?;
        self.transactions.push(I2cTransaction::WriteRead {
            addr,
            write_data: write_data.to_vec(),
            read_len: read_buffer.len(),
        });
        read_buffer.fill(0);
        Ok(())
    }

    fn set_frequency(&mut self, frequency: u32) -> Result<()> {
        self.config.frequency = frequency;
        Ok(())
    }

    fn set_timeout(&mut self, timeout_us: u32) -> Result<()> {
        self.config.timeout_us = timeout_us;
        Ok(())
    }
}
