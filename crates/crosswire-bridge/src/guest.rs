//! The guest-instance seam and the fixed import surface.

use crosswire_codec::{Allocator, GuestHeap, MemoryAccess};
use crosswire_types::Wire;

use crate::BridgeResult;

/// Name of the required allocation export.
pub const EXPORT_ALLOCATE: &str = "allocate";

/// Name of the required release export.
pub const EXPORT_RELEASE: &str = "release";

/// Export names owned by the protocol itself. These are never exposed as
/// user-callable entry points.
pub const RESERVED_EXPORTS: [&str; 4] = [EXPORT_ALLOCATE, EXPORT_RELEASE, "memory", "call"];

/// One bound guest instance: named callable exports, linear memory, and
/// the allocation primitives.
///
/// The [`MemoryAccess`] and [`Allocator`] supertraits are the capability
/// halves the codec borrows; an adapter over a real WASM runtime
/// implements them against the live instance (allocation typically by
/// invoking the `allocate`/`release` exports).
pub trait GuestInstance: MemoryAccess + Allocator {
    /// Every name in the guest's export table, including the reserved
    /// ones. Verified at bind time.
    fn export_names(&self) -> Vec<String>;

    /// Invoke an exported function with raw 64-bit words (encoded register
    /// pairs concatenated positionally) and return the raw result words:
    /// empty for a void return, two for a wire value.
    ///
    /// `imports` is the host surface the guest may re-enter mid-call;
    /// passing it here keeps guest→host→guest recursion an ordinary call
    /// stack.
    fn invoke(
        &mut self,
        name: &str,
        args: &[u64],
        imports: &mut dyn ImportSurface,
    ) -> BridgeResult<Vec<u64>>;
}

/// The fixed guest→host import surface (`log` and `call`).
///
/// The guest hands back views of its own memory/allocator on each entry,
/// so the host never holds a stale capability across the re-entrant edge.
pub trait ImportSurface {
    /// `log(wire_lo, wire_hi)`: decode a wire value and print it.
    fn log(&mut self, mem: &dyn MemoryAccess, value: Wire) -> BridgeResult<()>;

    /// `call(func, args) → result`: dispatch a host-registered function.
    /// `func` must decode to a host-origin reference and `args` to an
    /// array; the result is encoded back into guest memory as needed.
    fn call(&mut self, heap: &mut dyn GuestHeap, func: Wire, args: Wire) -> BridgeResult<Wire>;
}
