/// A bus address. Every supported address width fits, including the one-past-the-end address of
/// the whole space.
pub type Address = u32;

/// log2 of the mapping granularity.
pub const PAGE_BITS: u32 = 10;

/// Size of one page (1 KiB).
pub const PAGE_SIZE: usize = 1 << PAGE_BITS;

/// Geometry of an `ADDRESS_BITS`-wide address space split into [`PAGE_SIZE`] pages.
///
/// Widths outside `PAGE_BITS..=31` are rejected when the type is instantiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressSpace<const ADDRESS_BITS: u32>;

impl<const ADDRESS_BITS: u32> AddressSpace<ADDRESS_BITS> {
    pub(crate) const VALID: () = assert!(
        ADDRESS_BITS >= PAGE_BITS && ADDRESS_BITS <= 31,
        "address width must be between PAGE_BITS and 31 bits"
    );

    /// Number of addressable bytes.
    pub const SIZE: u64 = 1u64 << ADDRESS_BITS;

    /// Number of page slots in the page table.
    pub const PAGE_COUNT: usize = 1usize << (ADDRESS_BITS - PAGE_BITS);

    /// Returns the page holding `address`, or `None` when the address lies outside the space.
    #[inline]
    pub fn page_index(address: Address) -> Option<usize> {
        if u64::from(address) >= Self::SIZE {
            return None;
        }
        Some((address >> PAGE_BITS) as usize)
    }

    /// First address of `page`.
    #[inline]
    pub fn page_base(page: usize) -> Address {
        (page << PAGE_BITS) as Address
    }

    /// Exclusive end of `[address, address + len)`, if the whole range lies inside the space.
    #[inline]
    pub fn range_end(address: Address, len: usize) -> Option<u64> {
        let end = u64::from(address).checked_add(u64::try_from(len).ok()?)?;
        (end <= Self::SIZE).then_some(end)
    }
}
