//! Nullable voting-power oracle: checkpointed balances set by the test.

use bridge_governance::{OracleError, VotingPowerOracle};
use bridge_types::{Address, BlockNumber};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Weights and supply are step functions of the block number: a checkpoint
/// written at block `b` applies to `b` and every later block until the next
/// checkpoint.
pub struct NullVotingPower {
    weights: Mutex<HashMap<Address, BTreeMap<BlockNumber, u128>>>,
    supply: Mutex<BTreeMap<BlockNumber, u128>>,
    unavailable: AtomicBool,
}

impl NullVotingPower {
    pub fn new() -> Self {
        Self {
            weights: Mutex::new(HashMap::new()),
            supply: Mutex::new(BTreeMap::new()),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Fixed supply from genesis and fixed weights from genesis.
    pub fn with_balances(supply: u128, balances: &[(Address, u128)]) -> Self {
        let oracle = Self::new();
        oracle.set_supply(BlockNumber::GENESIS, supply);
        for (account, weight) in balances {
            oracle.set_weight(*account, BlockNumber::GENESIS, *weight);
        }
        oracle
    }

    pub fn set_weight(&self, account: Address, from: BlockNumber, weight: u128) {
        self.weights
            .lock()
            .unwrap()
            .entry(account)
            .or_default()
            .insert(from, weight);
    }

    pub fn set_supply(&self, from: BlockNumber, supply: u128) {
        self.supply.lock().unwrap().insert(from, supply);
    }

    /// Make every lookup fail with `SnapshotUnavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

impl Default for NullVotingPower {
    fn default() -> Self {
        Self::new()
    }
}

fn value_at(checkpoints: &BTreeMap<BlockNumber, u128>, block: BlockNumber) -> u128 {
    checkpoints
        .range(..=block)
        .next_back()
        .map_or(0, |(_, value)| *value)
}

impl VotingPowerOracle for NullVotingPower {
    fn weight_of(&self, account: &Address, block: BlockNumber) -> Result<u128, OracleError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(OracleError::SnapshotUnavailable(block));
        }
        Ok(self
            .weights
            .lock()
            .unwrap()
            .get(account)
            .map_or(0, |checkpoints| value_at(checkpoints, block)))
    }

    fn total_supply_at(&self, block: BlockNumber) -> Result<u128, OracleError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(OracleError::SnapshotUnavailable(block));
        }
        Ok(value_at(&self.supply.lock().unwrap(), block))
    }
}
