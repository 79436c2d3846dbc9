//! Test support: a scripted in-memory guest.
//!
//! `ScriptedGuest` plays the part of a real WASM instance for tests: a
//! [`TestHeap`] provides linear memory plus the allocation primitives, and
//! each export is a Rust closure over raw argument words. Scripts receive
//! the import surface, so guest→host re-entry (the `call` and `log`
//! imports) is exercised exactly the way a real guest would.

use std::collections::BTreeMap;

use crosswire_codec::testing::TestHeap;
use crosswire_codec::{Allocator, CodecResult, MemoryAccess};

use crate::guest::{GuestInstance, ImportSurface};
use crate::{BridgeError, BridgeResult};

/// A scripted guest export: raw words in, raw words out, with the heap and
/// the host import surface available for the duration of the call.
pub type ScriptFn =
    Box<dyn FnMut(&mut TestHeap, &[u64], &mut dyn ImportSurface) -> BridgeResult<Vec<u64>>>;

/// An in-memory guest whose exports are Rust closures.
pub struct ScriptedGuest {
    heap: TestHeap,
    scripts: BTreeMap<String, ScriptFn>,
    names: Vec<String>,
}

impl ScriptedGuest {
    /// A guest with the reserved exports present and no user entry points.
    pub fn new() -> Self {
        Self {
            heap: TestHeap::new(),
            scripts: BTreeMap::new(),
            names: vec![
                "allocate".to_string(),
                "release".to_string(),
                "memory".to_string(),
            ],
        }
    }

    /// Add a scripted export (builder style).
    pub fn export<F>(mut self, name: &str, f: F) -> Self
    where
        F: FnMut(&mut TestHeap, &[u64], &mut dyn ImportSurface) -> BridgeResult<Vec<u64>> + 'static,
    {
        self.names.push(name.to_string());
        self.scripts.insert(name.to_string(), Box::new(f));
        self
    }

    /// Remove a name from the export table (for bind-failure tests).
    pub fn drop_export(&mut self, name: &str) {
        self.names.retain(|n| n != name);
        self.scripts.remove(name);
    }

    /// The backing heap.
    pub fn heap(&self) -> &TestHeap {
        &self.heap
    }

    /// Mutable access to the backing heap.
    pub fn heap_mut(&mut self) -> &mut TestHeap {
        &mut self.heap
    }
}

impl Default for ScriptedGuest {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryAccess for ScriptedGuest {
    fn read_bytes(&self, addr: u32, buf: &mut [u8]) -> CodecResult<()> {
        self.heap.read_bytes(addr, buf)
    }

    fn write_bytes(&mut self, addr: u32, bytes: &[u8]) -> CodecResult<()> {
        self.heap.write_bytes(addr, bytes)
    }
}

impl Allocator for ScriptedGuest {
    fn allocate(&mut self, size: u32) -> CodecResult<u32> {
        self.heap.allocate(size)
    }

    fn release(&mut self, addr: u32, size: u32) -> CodecResult<()> {
        self.heap.release(addr, size)
    }
}

impl GuestInstance for ScriptedGuest {
    fn export_names(&self) -> Vec<String> {
        self.names.clone()
    }

    fn invoke(
        &mut self,
        name: &str,
        args: &[u64],
        imports: &mut dyn ImportSurface,
    ) -> BridgeResult<Vec<u64>> {
        let Self { heap, scripts, .. } = self;
        let script = scripts
            .get_mut(name)
            .ok_or_else(|| BridgeError::Guest(format!("no script for export `{name}`")))?;
        script(heap, args, imports)
    }
}
