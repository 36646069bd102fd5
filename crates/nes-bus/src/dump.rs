use core::fmt;

use crate::addr::Address;

/// One occupied page-table slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingRecord<'a> {
    pub page: usize,
    /// Base address of the whole registration occupying the slot.
    pub address: Address,
    /// Length of the whole registration occupying the slot.
    pub len: usize,
    pub owner: &'a str,
}

/// Snapshot of the page table for debugging.
///
/// Formats as a `dump map(<page size>)` header followed by one `address<TAB>len` line (hex) per
/// occupied page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapDump<'a> {
    page_size: usize,
    records: Vec<MappingRecord<'a>>,
}

impl<'a> MapDump<'a> {
    pub(crate) fn new(page_size: usize, records: Vec<MappingRecord<'a>>) -> Self {
        Self { page_size, records }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn records(&self) -> &[MappingRecord<'a>] {
        &self.records
    }
}

impl fmt::Display for MapDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "dump map({})", self.page_size)?;
        writeln!(f, "--------")?;
        for record in &self.records {
            writeln!(f, "{:x}\t{:x}", record.address, record.len)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::device::{Device, Sram};
    use crate::Bus16;

    #[test]
    fn dump_repeats_multi_page_registrations() {
        let vram = Sram::<0x800>::named("vram");
        let wram = Sram::<0x100>::named("wram");
        let mut bus = Bus16::without_notifier();
        vram.map(&mut bus, 0x2000).unwrap();
        wram.map(&mut bus, 0x0100).unwrap();

        let dump = bus.dump_map();
        assert_eq!(dump.page_size(), 1024);
        let pages: Vec<_> = dump
            .records()
            .iter()
            .map(|r| (r.page, r.address, r.len, r.owner))
            .collect();
        assert_eq!(
            pages,
            vec![
                (0, 0x0100, 0x100, "wram"),
                (8, 0x2000, 0x800, "vram"),
                (9, 0x2000, 0x800, "vram"),
            ]
        );

        assert_eq!(
            dump.to_string(),
            "dump map(1024)\n--------\n100\t100\n2000\t800\n2000\t800\n"
        );
    }

    #[test]
    fn empty_bus_dumps_only_the_header() {
        let bus = Bus16::without_notifier();
        assert_eq!(bus.dump_map().to_string(), "dump map(1024)\n--------\n");
        bus.log_map();
    }
}
