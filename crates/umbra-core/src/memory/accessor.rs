//! Bounds-checked access to the host's RAM image.
//!
//! The byte buffer is owned by the emulator host, which may resize,
//! reallocate, or drop it between calls. [`AddressSpace`] is therefore a
//! weak, non-owning view: every access re-resolves the reference and
//! re-reads the capacity, and nothing is cached across calls. Reads may
//! still observe stale or torn data mid-mutation; callers are expected
//! to validate what they get.
//!
//! All access is confined to the render/poll thread. There is no
//! internal locking and no retry: every call is a single attempt.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::error::{Error, Result};
use crate::memory::layout::sentinel;

/// Check whether a raw 32-bit value matches a known allocator fill
/// pattern, distinguishing "freed/uninitialized" from a legitimate zero.
pub fn is_sentinel(value: u32) -> bool {
    value == sentinel::UNMAPPED_FILL || value == sentinel::DEBUG_FILL
}

/// Weak, non-owning view onto the host's RAM image.
pub struct AddressSpace {
    buffer: Weak<RefCell<Vec<u8>>>,
}

impl AddressSpace {
    /// Attach to the host's buffer without taking ownership.
    pub fn attach(buffer: &Rc<RefCell<Vec<u8>>>) -> Self {
        Self {
            buffer: Rc::downgrade(buffer),
        }
    }

    /// An address space with no backing buffer; every access fails with
    /// [`Error::NullSource`].
    pub fn detached() -> Self {
        Self {
            buffer: Weak::new(),
        }
    }

    fn resolve(&self) -> Result<Rc<RefCell<Vec<u8>>>> {
        self.buffer.upgrade().ok_or(Error::NullSource)
    }
}

/// Read access to game memory.
///
/// Implemented by [`MemoryAccessor`] for the live RAM image and by the
/// test mock; the tracker and capture engine are generic over this so
/// they can run against canned memory in tests.
pub trait ReadMemory {
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>>;

    fn read_u8(&self, address: u64) -> Result<u8> {
        let bytes = self.read_bytes(address, 1)?;
        Ok(bytes[0])
    }

    fn read_u16(&self, address: u64) -> Result<u16> {
        let bytes = self.read_bytes(address, 2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    fn read_u32(&self, address: u64) -> Result<u32> {
        let bytes = self.read_bytes(address, 4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_i32(&self, address: u64) -> Result<i32> {
        Ok(self.read_u32(address)? as i32)
    }

    fn read_f32(&self, address: u64) -> Result<f32> {
        Ok(f32::from_bits(self.read_u32(address)?))
    }
}

/// Bounds-checked reader/writer over an [`AddressSpace`].
pub struct MemoryAccessor {
    space: AddressSpace,
}

impl MemoryAccessor {
    pub fn new(space: AddressSpace) -> Self {
        Self { space }
    }

    /// Current capacity of the backing buffer. Re-resolved on every
    /// call; the host may have resized the buffer since the last one.
    pub fn capacity(&self) -> Result<usize> {
        let buffer = self.space.resolve()?;
        let len = buffer.borrow().len();
        Ok(len)
    }

    /// Write bytes at `address`. Fails without touching the buffer if
    /// any part of the range falls outside the current capacity.
    pub fn write(&self, address: u64, bytes: &[u8]) -> Result<()> {
        let buffer = self.space.resolve()?;
        let mut ram = buffer.borrow_mut();
        check_range(address, bytes.len(), ram.len())?;
        let start = address as usize;
        ram[start..start + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }
}

impl ReadMemory for MemoryAccessor {
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>> {
        let buffer = self.space.resolve()?;
        let ram = buffer.borrow();
        check_range(address, size, ram.len())?;
        let start = address as usize;
        Ok(ram[start..start + size].to_vec())
    }
}

fn check_range(address: u64, size: usize, capacity: usize) -> Result<()> {
    let oob = Error::InvalidAddress {
        address,
        size,
        capacity,
    };
    match address.checked_add(size as u64) {
        Some(end) if end <= capacity as u64 => Ok(()),
        _ => Err(oob),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::layout::RAM_SIZE;

    fn ram_of(size: usize) -> Rc<RefCell<Vec<u8>>> {
        Rc::new(RefCell::new(vec![0u8; size]))
    }

    #[test]
    fn test_read_succeeds_iff_in_range() {
        let ram = ram_of(RAM_SIZE);
        let accessor = MemoryAccessor::new(AddressSpace::attach(&ram));

        assert!(accessor.read_bytes(8_388_604, 4).is_ok());
        assert!(matches!(
            accessor.read_bytes(8_388_605, 4),
            Err(Error::InvalidAddress { .. })
        ));
        assert!(accessor.read_bytes(0, RAM_SIZE).is_ok());
        assert!(accessor.read_bytes(RAM_SIZE as u64, 1).is_err());
    }

    #[test]
    fn test_read_offset_overflow_is_invalid() {
        let ram = ram_of(64);
        let accessor = MemoryAccessor::new(AddressSpace::attach(&ram));
        assert!(matches!(
            accessor.read_bytes(u64::MAX - 1, 4),
            Err(Error::InvalidAddress { .. })
        ));
    }

    #[test]
    fn test_failed_write_leaves_buffer_untouched() {
        let ram = ram_of(8);
        let accessor = MemoryAccessor::new(AddressSpace::attach(&ram));

        assert!(accessor.write(6, &[1, 2, 3, 4]).is_err());
        assert_eq!(*ram.borrow(), vec![0u8; 8]);

        accessor.write(4, &[9, 9, 9, 9]).unwrap();
        assert_eq!(&ram.borrow()[4..], &[9, 9, 9, 9]);
    }

    #[test]
    fn test_dropped_buffer_is_null_source() {
        let ram = ram_of(16);
        let accessor = MemoryAccessor::new(AddressSpace::attach(&ram));
        assert!(accessor.read_u32(0).is_ok());

        drop(ram);
        assert!(matches!(accessor.read_u32(0), Err(Error::NullSource)));
        assert!(matches!(accessor.capacity(), Err(Error::NullSource)));
    }

    #[test]
    fn test_capacity_tracks_host_resize() {
        let ram = ram_of(32);
        let accessor = MemoryAccessor::new(AddressSpace::attach(&ram));
        assert!(accessor.read_u32(28).is_ok());

        ram.borrow_mut().truncate(16);
        assert_eq!(accessor.capacity().unwrap(), 16);
        assert!(accessor.read_u32(28).is_err());
        assert!(accessor.read_u32(12).is_ok());
    }

    #[test]
    fn test_detached_space() {
        let accessor = MemoryAccessor::new(AddressSpace::detached());
        assert!(matches!(accessor.read_u8(0), Err(Error::NullSource)));
    }

    #[test]
    fn test_typed_reads_little_endian() {
        let ram = ram_of(8);
        ram.borrow_mut()[0..4].copy_from_slice(&0x1234_5678u32.to_le_bytes());
        ram.borrow_mut()[4..8].copy_from_slice(&1.5f32.to_le_bytes());
        let accessor = MemoryAccessor::new(AddressSpace::attach(&ram));

        assert_eq!(accessor.read_u32(0).unwrap(), 0x1234_5678);
        assert_eq!(accessor.read_u16(0).unwrap(), 0x5678);
        assert_eq!(accessor.read_u8(3).unwrap(), 0x12);
        assert_eq!(accessor.read_f32(4).unwrap(), 1.5);
    }

    #[test]
    fn test_is_sentinel() {
        assert!(is_sentinel(0xFFFF_FFFF));
        assert!(is_sentinel(0xCDCD_CDCD));
        assert!(!is_sentinel(0));
        assert!(!is_sentinel(55));
    }
}
