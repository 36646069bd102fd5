//! Backing-store devices and the registration contract between a device and the bus.
//!
//! A device owns its memory; the bus only borrows it. Memory is exposed as `[Cell<u8>]` so the
//! device can keep reading and writing its own bytes while the bus holds a shared borrow, and so
//! the borrow checker guarantees every mapped device outlives the bus it is mapped into.

use core::cell::Cell;

use crate::addr::Address;
use crate::bus::Bus;
use crate::error::{DeviceError, MapResult};

mod ram;
mod sram;

pub use ram::Ram;
pub use sram::Sram;

/// Anything that can be registered with a [`Bus`].
pub trait Device {
    /// Human-readable name used in diagnostics.
    fn name(&self) -> &str;

    /// Registers this device's backing region with `bus` at `address`.
    ///
    /// Only callable on concrete device types; a `&dyn Device` can be an owner but cannot register
    /// itself.
    fn map<'a, const ADDRESS_BITS: u32>(
        &'a self,
        bus: &mut Bus<'a, ADDRESS_BITS>,
        address: Address,
    ) -> MapResult<()>
    where
        Self: Sized;
}

/// A device backed by one contiguous block of bytes.
pub trait MemoryMappedDevice: Device {
    fn memory(&self) -> &[Cell<u8>];

    fn size(&self) -> usize {
        self.memory().len()
    }

    fn fill(&self, value: u8) {
        for cell in self.memory() {
            cell.set(value);
        }
    }

    /// Copies `bytes` into the device starting at `offset`.
    fn load(&self, offset: usize, bytes: &[u8]) -> Result<(), DeviceError> {
        let memory = self.memory();
        let dst = offset
            .checked_add(bytes.len())
            .and_then(|end| memory.get(offset..end))
            .ok_or(DeviceError::OutOfRange {
                offset,
                len: bytes.len(),
                size: memory.len(),
            })?;
        for (cell, &byte) in dst.iter().zip(bytes) {
            cell.set(byte);
        }
        Ok(())
    }

    fn get(&self, offset: usize) -> Option<u8> {
        self.memory().get(offset).map(Cell::get)
    }

    /// Snapshot of the current contents.
    fn to_vec(&self) -> Vec<u8> {
        self.memory().iter().map(Cell::get).collect()
    }
}
