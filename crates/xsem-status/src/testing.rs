use std::cell::RefCell;
use std::collections::HashMap;

use xsem_transport::{MemoryRegion, TransportError};

/// Word-addressed memory backed by a map; records every address read.
#[derive(Default)]
pub(crate) struct FakeMemory {
    words: HashMap<u64, u32>,
    pub(crate) reads: RefCell<Vec<u64>>,
}

impl FakeMemory {
    /// Zero every word of `[base, base + len)`.
    pub(crate) fn zeroed(base: u64, len: usize) -> Self {
        let mut mem = Self::default();
        for addr in (base..base + len as u64).step_by(4) {
            mem.words.insert(addr, 0);
        }
        mem
    }

    pub(crate) fn set(&mut self, addr: u64, value: u32) -> &mut Self {
        self.words.insert(addr, value);
        self
    }
}

impl MemoryRegion for FakeMemory {
    fn read32(&self, addr: u64) -> xsem_transport::Result<u32> {
        self.reads.borrow_mut().push(addr);
        self.words
            .get(&addr)
            .copied()
            .ok_or(TransportError::Unmapped { addr })
    }
}
