use core::cell::Cell;
use core::fmt;

use crate::addr::{Address, AddressSpace};
use crate::device::Device;
use crate::error::{MapError, MapResult};

/// One page's view of a registration.
///
/// Every page a registration spans holds its own entry, but all of them record the *whole*
/// registration's base address and length so that an access landing mid-page can still be checked
/// against the true extent of the mapping.
#[derive(Clone, Copy)]
pub struct MappingEntry<'a> {
    owner: &'a dyn Device,
    /// Device memory from `start` up to the end of the registration.
    memory: &'a [Cell<u8>],
    /// First address backed on this page; only differs from the page base on the first page of a
    /// registration that starts mid-page.
    start: Address,
    address: Address,
    len: usize,
}

impl<'a> MappingEntry<'a> {
    pub fn owner(&self) -> &'a dyn Device {
        self.owner
    }

    /// Base address of the registration this entry belongs to.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Total length of the registration this entry belongs to.
    pub fn registration_len(&self) -> usize {
        self.len
    }

    /// Exclusive end of the registration.
    pub fn end(&self) -> u64 {
        u64::from(self.address) + self.len as u64
    }

    pub fn contains(&self, address: Address) -> bool {
        address >= self.address && u64::from(address) < self.end()
    }

    /// Device memory from `address` to the end of the registration, or `None` when `address`
    /// lies outside the registration's extent (before a mid-page start, or at or past its end).
    pub(crate) fn window(&self, address: Address) -> Option<&'a [Cell<u8>]> {
        if address < self.start || u64::from(address) >= self.end() {
            return None;
        }
        let memory: &'a [Cell<u8>] = self.memory;
        memory.get((address - self.start) as usize..)
    }
}

impl fmt::Debug for MappingEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappingEntry")
            .field("owner", &self.owner.name())
            .field("start", &format_args!("{:#x}", self.start))
            .field("address", &format_args!("{:#x}", self.address))
            .field("len", &format_args!("{:#x}", self.len))
            .finish()
    }
}

/// Dense page table: one slot per page of the address space.
pub struct PageTable<'a, const ADDRESS_BITS: u32> {
    slots: Box<[Option<MappingEntry<'a>>]>,
}

impl<'a, const ADDRESS_BITS: u32> PageTable<'a, ADDRESS_BITS> {
    pub fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = AddressSpace::<ADDRESS_BITS>::VALID;

        Self {
            slots: (0..AddressSpace::<ADDRESS_BITS>::PAGE_COUNT)
                .map(|_| None)
                .collect(),
        }
    }

    /// The entry for the page holding `address`, if that page is occupied.
    pub fn get(&self, address: Address) -> Option<&MappingEntry<'a>> {
        let page = AddressSpace::<ADDRESS_BITS>::page_index(address)?;
        self.slots[page].as_ref()
    }

    /// Occupied slots in page order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &MappingEntry<'a>)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(page, slot)| slot.as_ref().map(|entry| (page, entry)))
    }

    /// Registers `memory` at `address`.
    ///
    /// All-or-nothing: every page in the span is checked before any slot is written.
    pub fn map(
        &mut self,
        owner: &'a dyn Device,
        address: Address,
        memory: &'a [Cell<u8>],
    ) -> MapResult<()> {
        let len = memory.len();
        if len == 0 {
            return Err(MapError::EmptyRegion { address });
        }
        let end = AddressSpace::<ADDRESS_BITS>::range_end(address, len).ok_or(
            MapError::OutOfRange {
                address,
                len,
                size: AddressSpace::<ADDRESS_BITS>::SIZE,
            },
        )?;

        let first = (address >> crate::PAGE_BITS) as usize;
        let last = ((end - 1) >> crate::PAGE_BITS) as usize;

        if let Some(page) = (first..=last).find(|&page| self.slots[page].is_some()) {
            return Err(MapError::AlreadyMapped { address, len, page });
        }

        for page in first..=last {
            let start = if page == first {
                address
            } else {
                AddressSpace::<ADDRESS_BITS>::page_base(page)
            };
            self.slots[page] = Some(MappingEntry {
                owner,
                memory: &memory[(start - address) as usize..],
                start,
                address,
                len,
            });
        }

        Ok(())
    }
}

impl<const ADDRESS_BITS: u32> Default for PageTable<'_, ADDRESS_BITS> {
    fn default() -> Self {
        Self::new()
    }
}
