//! Nullable chain: a block height that only moves when told to.

use bridge_types::BlockNumber;
use std::sync::atomic::{AtomicU64, Ordering};

pub struct NullChain {
    height: AtomicU64,
}

impl NullChain {
    pub fn new(initial: u64) -> Self {
        Self {
            height: AtomicU64::new(initial),
        }
    }

    pub fn current(&self) -> BlockNumber {
        BlockNumber::new(self.height.load(Ordering::SeqCst))
    }

    /// Advance by `blocks` and return the new height.
    pub fn advance(&self, blocks: u64) -> BlockNumber {
        let previous = self.height.fetch_add(blocks, Ordering::SeqCst);
        BlockNumber::new(previous + blocks)
    }

    pub fn set(&self, height: u64) {
        self.height.store(height, Ordering::SeqCst);
    }
}

impl Default for NullChain {
    fn default() -> Self {
        Self::new(0)
    }
}
