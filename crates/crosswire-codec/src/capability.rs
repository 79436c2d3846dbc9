//! Capabilities the codec borrows from the bound guest instance.

use crate::CodecResult;

/// Read/write access to guest linear memory.
///
/// Implementations must consult the live memory on every call. The guest's
/// own allocator may grow or move the backing buffer between boundary
/// calls, so a cached base pointer or length would go stale.
pub trait MemoryAccess {
    /// Read `buf.len()` bytes starting at `addr`.
    fn read_bytes(&self, addr: u32, buf: &mut [u8]) -> CodecResult<()>;

    /// Write `bytes` starting at `addr`.
    fn write_bytes(&mut self, addr: u32, bytes: &[u8]) -> CodecResult<()>;
}

/// The guest's allocation primitives.
///
/// These correspond to the required `allocate`/`release` exports; a guest
/// missing either is rejected at bind time.
pub trait Allocator {
    /// Allocate `size` bytes of guest memory, returning the address.
    fn allocate(&mut self, size: u32) -> CodecResult<u32>;

    /// Release an allocation previously obtained from [`allocate`].
    ///
    /// [`allocate`]: Allocator::allocate
    fn release(&mut self, addr: u32, size: u32) -> CodecResult<()>;
}

/// Combined memory + allocation view, the full capability [`encode`]
/// requires. Blanket-implemented; use it where a single trait object has
/// to carry both halves across a call boundary.
///
/// [`encode`]: crate::encode
pub trait GuestHeap: MemoryAccess + Allocator {}

impl<T: MemoryAccess + Allocator> GuestHeap for T {}
