//! Voting-power oracle interface.

use bridge_types::{Address, BlockNumber};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    #[error("no snapshot available for {0}")]
    SnapshotUnavailable(BlockNumber),

    #[error("{0}")]
    Other(String),
}

/// Snapshot source of voting weight on the home chain.
///
/// Both lookups must be answerable for past blocks. Zero weight means "no
/// power"; the oracle never reports negative weight.
pub trait VotingPowerOracle {
    fn weight_of(&self, account: &Address, block: BlockNumber) -> Result<u128, OracleError>;

    fn total_supply_at(&self, block: BlockNumber) -> Result<u128, OracleError>;
}

impl<O: VotingPowerOracle + ?Sized> VotingPowerOracle for &O {
    fn weight_of(&self, account: &Address, block: BlockNumber) -> Result<u128, OracleError> {
        (**self).weight_of(account, block)
    }

    fn total_supply_at(&self, block: BlockNumber) -> Result<u128, OracleError> {
        (**self).total_supply_at(block)
    }
}
