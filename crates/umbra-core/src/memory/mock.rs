//! Canned memory for tests.

use std::cell::RefCell;

use crate::error::{Error, Result};
use crate::memory::ReadMemory;

/// Fixed-capacity memory image whose contents tests can rewrite between
/// polls to simulate the host mutating RAM.
pub struct MockMemoryReader {
    bytes: RefCell<Vec<u8>>,
}

impl MockMemoryReader {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: RefCell::new(vec![0u8; capacity]),
        }
    }

    pub fn set_u8(&self, address: u64, value: u8) {
        self.bytes.borrow_mut()[address as usize] = value;
    }

    pub fn set_u16(&self, address: u64, value: u16) {
        self.set_raw(address, &value.to_le_bytes());
    }

    pub fn set_u32(&self, address: u64, value: u32) {
        self.set_raw(address, &value.to_le_bytes());
    }

    pub fn set_f32(&self, address: u64, value: f32) {
        self.set_raw(address, &value.to_le_bytes());
    }

    fn set_raw(&self, address: u64, bytes: &[u8]) {
        let start = address as usize;
        self.bytes.borrow_mut()[start..start + bytes.len()].copy_from_slice(bytes);
    }
}

impl ReadMemory for MockMemoryReader {
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>> {
        let bytes = self.bytes.borrow();
        let end = address.checked_add(size as u64);
        match end {
            Some(end) if end <= bytes.len() as u64 => {
                let start = address as usize;
                Ok(bytes[start..start + size].to_vec())
            }
            _ => Err(Error::InvalidAddress {
                address,
                size,
                capacity: bytes.len(),
            }),
        }
    }
}

/// Builder for a [`MockMemoryReader`] pre-seeded with typed values.
pub struct MockMemoryBuilder {
    reader: MockMemoryReader,
}

impl MockMemoryBuilder {
    pub fn new(capacity: usize) -> Self {
        Self {
            reader: MockMemoryReader::with_capacity(capacity),
        }
    }

    pub fn with_u8(self, address: u64, value: u8) -> Self {
        self.reader.set_u8(address, value);
        self
    }

    pub fn with_u16(self, address: u64, value: u16) -> Self {
        self.reader.set_u16(address, value);
        self
    }

    pub fn with_u32(self, address: u64, value: u32) -> Self {
        self.reader.set_u32(address, value);
        self
    }

    pub fn with_f32(self, address: u64, value: f32) -> Self {
        self.reader.set_f32(address, value);
        self
    }

    pub fn build(self) -> MockMemoryReader {
        self.reader
    }
}
