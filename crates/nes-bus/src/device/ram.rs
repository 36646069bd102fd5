use core::cell::Cell;

use crate::addr::Address;
use crate::bus::Bus;
use crate::device::{Device, MemoryMappedDevice};
use crate::error::MapResult;

/// Heap-backed RAM whose size is chosen at runtime.
pub struct Ram {
    name: String,
    mem: Box<[Cell<u8>]>,
}

impl Ram {
    pub fn new(name: impl Into<String>, len: usize) -> Self {
        Self {
            name: name.into(),
            mem: (0..len).map(|_| Cell::new(0)).collect(),
        }
    }
}

impl Device for Ram {
    fn name(&self) -> &str {
        &self.name
    }

    fn map<'a, const ADDRESS_BITS: u32>(
        &'a self,
        bus: &mut Bus<'a, ADDRESS_BITS>,
        address: Address,
    ) -> MapResult<()> {
        bus.map_memory(self, address, &self.mem)
    }
}

impl MemoryMappedDevice for Ram {
    fn memory(&self) -> &[Cell<u8>] {
        &self.mem
    }
}
