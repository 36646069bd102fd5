use thiserror::Error;

use crate::addr::Address;

pub type MapResult<T> = std::result::Result<T, MapError>;

/// Errors returned when registering a mapping. A failed registration leaves the page table
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("mapping at 0x{address:04x} is empty")]
    EmptyRegion { address: Address },

    #[error("mapping 0x{address:04x}+0x{len:x} does not fit in the 0x{size:x}-byte address space")]
    OutOfRange {
        address: Address,
        len: usize,
        size: u64,
    },

    #[error("address range 0x{address:04x}+0x{len:x} already mapped (page {page} is occupied)")]
    AlreadyMapped {
        address: Address,
        len: usize,
        page: usize,
    },
}

impl MapError {
    /// Whether the registration collided with an existing mapping (as opposed to being malformed).
    pub fn is_already_mapped(&self) -> bool {
        matches!(self, MapError::AlreadyMapped { .. })
    }
}

/// Errors returned by the backing-store helpers on devices.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    #[error("device access out of range: offset=0x{offset:x} len={len} size=0x{size:x}")]
    OutOfRange {
        offset: usize,
        len: usize,
        size: usize,
    },
}
