use core::cell::Cell;

use crate::addr::Address;
use crate::bus::Bus;
use crate::device::{Device, MemoryMappedDevice};
use crate::error::MapResult;

/// Fixed-size static RAM with inline storage, zero-initialised.
pub struct Sram<const N: usize> {
    name: &'static str,
    mem: [Cell<u8>; N],
}

impl<const N: usize> Sram<N> {
    pub fn new() -> Self {
        Self::named("sram")
    }

    pub fn named(name: &'static str) -> Self {
        Self {
            name,
            mem: core::array::from_fn(|_| Cell::new(0)),
        }
    }

    pub fn data(&self) -> &[Cell<u8>] {
        &self.mem
    }

    pub const fn size(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for Sram<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Device for Sram<N> {
    fn name(&self) -> &str {
        self.name
    }

    fn map<'a, const ADDRESS_BITS: u32>(
        &'a self,
        bus: &mut Bus<'a, ADDRESS_BITS>,
        address: Address,
    ) -> MapResult<()> {
        bus.map_memory(self, address, &self.mem)
    }
}

impl<const N: usize> MemoryMappedDevice for Sram<N> {
    fn memory(&self) -> &[Cell<u8>] {
        &self.mem
    }
}
