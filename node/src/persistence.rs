//! Loading and saving relay state through `bridge-store`.

use std::path::Path;

use bridge_executor::RemoteState;
use bridge_governance::HomeState;
use bridge_store::{load_snapshot, save_snapshot, FileStateStore, Migrator, StateStore};

use crate::NodeError;

pub const HOME_STATE_KEY: &str = "home_state";
pub const REMOTE_STATE_KEY: &str = "remote_state";

/// Open the state directory and bring its schema up to date.
pub fn open_store(dir: &Path) -> Result<FileStateStore, NodeError> {
    let store = FileStateStore::open(dir)?;
    let version = Migrator::run(&store)?;
    tracing::info!(dir = %dir.display(), version, "state store ready");
    Ok(store)
}

pub fn load_home(store: &impl StateStore) -> Result<Option<HomeState>, NodeError> {
    Ok(load_snapshot(store, HOME_STATE_KEY)?)
}

pub fn save_home(store: &impl StateStore, state: &HomeState) -> Result<(), NodeError> {
    save_snapshot(store, HOME_STATE_KEY, state)?;
    tracing::debug!(proposals = state.table.len(), next_nonce = state.next_nonce.get(), "home state saved");
    Ok(())
}

pub fn load_remote(store: &impl StateStore) -> Result<Option<RemoteState>, NodeError> {
    Ok(load_snapshot(store, REMOTE_STATE_KEY)?)
}

pub fn save_remote(store: &impl StateStore, state: &RemoteState) -> Result<(), NodeError> {
    save_snapshot(store, REMOTE_STATE_KEY, state)?;
    tracing::debug!(executions = state.ledger.execution_count(), "remote state saved");
    Ok(())
}
