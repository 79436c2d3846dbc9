//! Test support: an in-memory guest heap.
//!
//! `TestHeap` stands in for a guest's linear memory plus its
//! `allocate`/`release` exports. It bump-allocates, keeps address 0
//! reserved as a null address, and records allocator traffic so tests can
//! assert on it (e.g. that zero-length values never allocate).

use crate::{Allocator, CodecError, CodecResult, MemoryAccess};

/// Alignment for bump allocations.
const ALIGN: u32 = 8;

/// An in-memory guest heap for tests.
#[derive(Debug, Default)]
pub struct TestHeap {
    memory: Vec<u8>,
    next: u32,
    /// Number of `allocate` calls observed.
    pub alloc_count: usize,
    /// Every `(addr, size)` passed to `release`, in call order.
    pub released: Vec<(u32, u32)>,
}

impl TestHeap {
    /// Create an empty heap. The first allocation lands at [`ALIGN`], never
    /// at address 0.
    pub fn new() -> Self {
        Self {
            memory: vec![0; ALIGN as usize],
            next: ALIGN,
            alloc_count: 0,
            released: Vec::new(),
        }
    }

    /// The current bump pointer (useful for asserting nothing allocated).
    pub fn high_water(&self) -> u32 {
        self.next
    }
}

impl MemoryAccess for TestHeap {
    fn read_bytes(&self, addr: u32, buf: &mut [u8]) -> CodecResult<()> {
        let end = addr as usize + buf.len();
        if end > self.memory.len() {
            return Err(CodecError::OutOfBounds {
                addr,
                len: buf.len() as u32,
            });
        }
        buf.copy_from_slice(&self.memory[addr as usize..end]);
        Ok(())
    }

    fn write_bytes(&mut self, addr: u32, bytes: &[u8]) -> CodecResult<()> {
        let end = addr as usize + bytes.len();
        if end > self.memory.len() {
            return Err(CodecError::OutOfBounds {
                addr,
                len: bytes.len() as u32,
            });
        }
        self.memory[addr as usize..end].copy_from_slice(bytes);
        Ok(())
    }
}

impl Allocator for TestHeap {
    fn allocate(&mut self, size: u32) -> CodecResult<u32> {
        self.alloc_count += 1;
        let addr = self.next;
        let padded = (size as u64).div_ceil(ALIGN as u64) * ALIGN as u64;
        let next = addr as u64 + padded;
        if next > u32::MAX as u64 {
            return Err(CodecError::AllocFailed(size));
        }
        self.next = next as u32;
        self.memory.resize(self.next as usize, 0);
        Ok(addr)
    }

    fn release(&mut self, addr: u32, size: u32) -> CodecResult<()> {
        self.released.push((addr, size));
        Ok(())
    }
}
