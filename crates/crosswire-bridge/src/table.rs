//! The bridge's registry of host functions exposed to the guest.

use std::fmt;

use crosswire_types::Value;

/// A host-native function callable from the guest. Arguments arrive
/// decoded and spread positionally; the returned value is encoded back
/// across the boundary.
pub type HostFn = Box<dyn FnMut(&[Value]) -> Result<Value, String>>;

/// An append-only arena of host functions.
///
/// Indices are handed to the guest inside host-origin function references
/// and stay stable for the life of the bridge. Entries are never removed,
/// so a closure registered once per call grows the table monotonically —
/// a known resource limitation of the protocol, not a correctness defect.
#[derive(Default)]
pub struct FunctionTable {
    entries: Vec<HostFn>,
}

impl FunctionTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a function and return its stable index.
    pub fn register(&mut self, f: HostFn) -> u32 {
        let index = self.entries.len() as u32;
        self.entries.push(f);
        index
    }

    /// Look up an entry by index.
    pub fn get_mut(&mut self, index: u32) -> Option<&mut HostFn> {
        self.entries.get_mut(index as usize)
    }

    /// Number of registered functions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for FunctionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionTable")
            .field("len", &self.entries.len())
            .finish()
    }
}
