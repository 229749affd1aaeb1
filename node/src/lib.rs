//! Mirror bridge node.
//!
//! Wires a home relay and a remote executor together in one process:
//! - TOML configuration for both sides ([`BridgeConfig`])
//! - an async relayer standing in for the cross-chain transport
//! - snapshot persistence of both state machines
//! - scripted scenarios for end-to-end simulation

pub mod config;
pub mod error;
pub mod persistence;
pub mod relayer;
pub mod simulation;

pub use config::{BridgeConfig, HomeConfig, LoggingConfig, RelayerConfig, RemoteConfig};
pub use error::NodeError;
pub use persistence::{load_home, load_remote, open_store, save_home, save_remote};
pub use relayer::{
    BlockSource, ChannelTransport, RelayShutdown, RelayStats, Relayer, RelayerHandle,
};
pub use simulation::{run_scenario, Scenario, SimulationOutcome, SimulationReport};
