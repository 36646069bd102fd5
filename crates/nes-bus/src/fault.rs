use core::fmt;

use thiserror::Error;

use crate::addr::Address;

/// Direction of the access that faulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BusAccessKind {
    Read,
    Write,
}

impl fmt::Display for BusAccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusAccessKind::Read => f.write_str("read"),
            BusAccessKind::Write => f.write_str("write"),
        }
    }
}

/// The first address a transfer could not reach.
///
/// For an unmapped page this is the address being accessed; for a transfer that ran off the end
/// of a mapping it is the address one past that mapping's extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("bus {kind} fault at 0x{address:04x}")]
pub struct BusFault {
    pub address: Address,
    pub kind: BusAccessKind,
}

/// Caller-supplied hook invoked synchronously, once per fault, before the transfer stops.
pub type FaultNotifier<'a> = Box<dyn FnMut(Address, BusAccessKind) + 'a>;
