//! Page-table based address-space multiplexer for an emulated system bus.
//!
//! [`Bus`] presents a flat `ADDRESS_BITS`-wide address space and routes byte loads and stores to
//! device memory registered at arbitrary addresses. Registrations are tracked per 1 KiB page; a
//! page belongs to at most one registration and registration is all-or-nothing.
//!
//! Accesses that hit an unmapped page, or run past the extent of the registration covering a
//! page, are reported to the caller-supplied fault notifier and stop the transfer.

#![forbid(unsafe_code)]

mod addr;
mod bus;
pub mod device;
mod dump;
mod error;
mod fault;
mod page_table;

pub use addr::{Address, AddressSpace, PAGE_BITS, PAGE_SIZE};
pub use bus::{Bus, Bus16};
pub use device::{Device, MemoryMappedDevice, Ram, Sram};
pub use dump::{MapDump, MappingRecord};
pub use error::{DeviceError, MapError, MapResult};
pub use fault::{BusAccessKind, BusFault, FaultNotifier};
pub use page_table::{MappingEntry, PageTable};

#[cfg(test)]
mod tests;
