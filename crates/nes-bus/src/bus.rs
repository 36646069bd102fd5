use core::cell::Cell;

use tracing::{debug, trace};

use crate::addr::{Address, PAGE_SIZE};
use crate::device::Device;
use crate::dump::{MapDump, MappingRecord};
use crate::error::MapResult;
use crate::fault::{BusAccessKind, BusFault, FaultNotifier};
use crate::page_table::{MappingEntry, PageTable};

/// Flat address space routing byte loads and stores to registered device memory.
///
/// The bus never owns device memory: every registration borrows the device's bytes for `'a`, so
/// all mapped devices must outlive the bus. There is no unmap.
///
/// Transfers stop at the first fault. Bytes moved before the fault stay moved and destination
/// bytes past it are left as they were; the notifier is told the first address that could not be
/// reached.
pub struct Bus<'a, const ADDRESS_BITS: u32> {
    table: PageTable<'a, ADDRESS_BITS>,
    notifier: Option<FaultNotifier<'a>>,
}

/// The 16-bit address space of the reference system.
pub type Bus16<'a> = Bus<'a, 16>;

impl<'a, const ADDRESS_BITS: u32> Bus<'a, ADDRESS_BITS> {
    pub fn new(notifier: impl FnMut(Address, BusAccessKind) + 'a) -> Self {
        Self {
            table: PageTable::new(),
            notifier: Some(Box::new(notifier)),
        }
    }

    /// A bus whose faults are only logged.
    pub fn without_notifier() -> Self {
        Self {
            table: PageTable::new(),
            notifier: None,
        }
    }

    /// Registers `memory`, owned by `owner`, at `address`.
    ///
    /// Fails without touching the page table if the range is empty, does not fit in the address
    /// space, or shares a page with an existing mapping.
    pub fn map_memory(
        &mut self,
        owner: &'a dyn Device,
        address: Address,
        memory: &'a [Cell<u8>],
    ) -> MapResult<()> {
        let len = memory.len();
        match self.table.map(owner, address, memory) {
            Ok(()) => {
                debug!(
                    device = owner.name(),
                    "mapped 0x{address:04x}..0x{:04x}",
                    u64::from(address) + len as u64
                );
                Ok(())
            }
            Err(err) => {
                debug!(device = owner.name(), "mapping rejected: {err}");
                Err(err)
            }
        }
    }

    /// The page-table entry for the page holding `address`.
    ///
    /// An entry being present does not mean `address` itself is backed; see [`Bus::is_mapped`].
    pub fn entry(&self, address: Address) -> Option<&MappingEntry<'a>> {
        self.table.get(address)
    }

    pub fn is_mapped(&self, address: Address) -> bool {
        self.table
            .get(address)
            .is_some_and(|entry| entry.contains(address))
    }

    pub fn read(&mut self, address: Address, dst: &mut [u8]) {
        let _ = self.try_read(address, dst);
    }

    pub fn write(&mut self, address: Address, src: &[u8]) {
        let _ = self.try_write(address, src);
    }

    /// Like [`Bus::read`], also returning the fault that stopped the transfer.
    ///
    /// The notifier is invoked either way.
    pub fn try_read(&mut self, address: Address, dst: &mut [u8]) -> Result<(), BusFault> {
        let mut done = 0usize;
        while done < dst.len() {
            let window = self.resolve(address, done, BusAccessKind::Read)?;
            let n = window.len().min(dst.len() - done);
            for (byte, cell) in dst[done..done + n].iter_mut().zip(window) {
                *byte = cell.get();
            }
            done += n;
        }
        Ok(())
    }

    /// Like [`Bus::write`], also returning the fault that stopped the transfer.
    pub fn try_write(&mut self, address: Address, src: &[u8]) -> Result<(), BusFault> {
        let mut done = 0usize;
        while done < src.len() {
            let window = self.resolve(address, done, BusAccessKind::Write)?;
            let n = window.len().min(src.len() - done);
            for (cell, &byte) in window.iter().zip(&src[done..done + n]) {
                cell.set(byte);
            }
            done += n;
        }
        Ok(())
    }

    /// Device memory from `address + done` to the end of the mapping covering it.
    fn resolve(
        &mut self,
        address: Address,
        done: usize,
        kind: BusAccessKind,
    ) -> Result<&'a [Cell<u8>], BusFault> {
        // Only the first step can start outside the address space; later steps are at most one
        // past the end of a mapping, which always fits in `Address`.
        let cur = Address::try_from(u64::from(address) + done as u64).unwrap_or(Address::MAX);
        let window = self.table.get(cur).and_then(|entry| entry.window(cur));
        match window {
            Some(window) => Ok(window),
            None => Err(self.fault(cur, kind)),
        }
    }

    fn fault(&mut self, address: Address, kind: BusAccessKind) -> BusFault {
        trace!("bus {kind} fault at 0x{address:04x}");
        if let Some(notify) = self.notifier.as_mut() {
            notify(address, kind);
        }
        BusFault { address, kind }
    }

    pub fn read_u8(&mut self, address: Address) -> u8 {
        let mut buf = [0u8; 1];
        self.read(address, &mut buf);
        buf[0]
    }

    pub fn read_u16(&mut self, address: Address) -> u16 {
        let mut buf = [0u8; 2];
        self.read(address, &mut buf);
        u16::from_le_bytes(buf)
    }

    pub fn read_u32(&mut self, address: Address) -> u32 {
        let mut buf = [0u8; 4];
        self.read(address, &mut buf);
        u32::from_le_bytes(buf)
    }

    pub fn read_u64(&mut self, address: Address) -> u64 {
        let mut buf = [0u8; 8];
        self.read(address, &mut buf);
        u64::from_le_bytes(buf)
    }

    pub fn write_u8(&mut self, address: Address, value: u8) {
        self.write(address, &[value]);
    }

    pub fn write_u16(&mut self, address: Address, value: u16) {
        self.write(address, &value.to_le_bytes());
    }

    pub fn write_u32(&mut self, address: Address, value: u32) {
        self.write(address, &value.to_le_bytes());
    }

    pub fn write_u64(&mut self, address: Address, value: u64) {
        self.write(address, &value.to_le_bytes());
    }

    /// Occupied page slots in page order. A registration spanning several pages shows up once
    /// per page.
    pub fn mappings(&self) -> impl Iterator<Item = MappingRecord<'a>> + '_ {
        self.table.iter().map(|(page, entry)| MappingRecord {
            page,
            address: entry.address(),
            len: entry.registration_len(),
            owner: entry.owner().name(),
        })
    }

    pub fn dump_map(&self) -> MapDump<'a> {
        MapDump::new(PAGE_SIZE, self.mappings().collect())
    }

    /// Emits the map dump at `debug` level.
    pub fn log_map(&self) {
        for record in self.mappings() {
            debug!(
                page = record.page,
                device = record.owner,
                "0x{:04x}+0x{:x}",
                record.address,
                record.len
            );
        }
    }
}

impl<const ADDRESS_BITS: u32> Default for Bus<'_, ADDRESS_BITS> {
    fn default() -> Self {
        Self::without_notifier()
    }
}
