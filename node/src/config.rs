//! Bridge configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use bridge_authority::{AuthorityConfig, Counterpart, BPS_DENOMINATOR};
use bridge_executor::RemoteState;
use bridge_governance::{HomeState, DEFAULT_MIRROR_TOLERANCE};
use bridge_types::{Address, ChainId};
use bridge_utils::LogFormat;

use crate::NodeError;

/// Configuration for a home/remote relay pair.
///
/// Each side's counterpart is the other side's chain and address, so the
/// pair cannot be configured to distrust itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Directory holding state snapshots.
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub relayer: RelayerConfig,

    #[serde(default)]
    pub home: HomeConfig,

    #[serde(default)]
    pub remote: RemoteConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,

    /// Filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayerConfig {
    /// How often deferred deliveries are retried.
    #[serde(default = "default_retry_interval_ms")]
    pub retry_interval_ms: u64,

    /// Deliveries deferred this many times are dropped.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeConfig {
    #[serde(default = "default_home_chain")]
    pub chain_id: u64,

    /// Address of the home relay instance; the transport attests it as sender.
    #[serde(default = "default_home_address")]
    pub address: Address,

    #[serde(default = "default_owner")]
    pub owner: Address,

    #[serde(default = "default_quorum_bps")]
    pub quorum_bps: u16,

    #[serde(default = "default_mirror_tolerance")]
    pub mirror_tolerance: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default = "default_remote_chain")]
    pub chain_id: u64,

    /// Address of the remote relay instance; it votes as this address.
    #[serde(default = "default_remote_address")]
    pub address: Address,

    #[serde(default = "default_owner")]
    pub owner: Address,

    /// Remote governance contract.
    #[serde(default = "default_governor")]
    pub governor: Address,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_state_dir() -> PathBuf {
    PathBuf::from("./bridge_state")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_retry_interval_ms() -> u64 {
    500
}

fn default_max_attempts() -> u32 {
    20
}

fn default_home_chain() -> u64 {
    8453
}

fn default_remote_chain() -> u64 {
    1
}

fn default_owner() -> Address {
    Address::from_low_u64(0x01)
}

fn default_home_address() -> Address {
    Address::from_low_u64(0x0a)
}

fn default_remote_address() -> Address {
    Address::from_low_u64(0x14)
}

fn default_governor() -> Address {
    Address::from_low_u64(0x1e)
}

fn default_quorum_bps() -> u16 {
    2000
}

fn default_mirror_tolerance() -> u64 {
    DEFAULT_MIRROR_TOLERANCE
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: default_log_level(),
        }
    }
}

impl Default for RelayerConfig {
    fn default() -> Self {
        Self {
            retry_interval_ms: default_retry_interval_ms(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl Default for HomeConfig {
    fn default() -> Self {
        Self {
            chain_id: default_home_chain(),
            address: default_home_address(),
            owner: default_owner(),
            quorum_bps: default_quorum_bps(),
            mirror_tolerance: default_mirror_tolerance(),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            chain_id: default_remote_chain(),
            address: default_remote_address(),
            owner: default_owner(),
            governor: default_governor(),
        }
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            state_dir: default_state_dir(),
            logging: LoggingConfig::default(),
            relayer: RelayerConfig::default(),
            home: HomeConfig::default(),
            remote: RemoteConfig::default(),
        }
    }
}

// ── Impl ───────────────────────────────────────────────────────────────

impl BridgeConfig {
    /// Load and validate configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, NodeError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| NodeError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        let config: Self = toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), NodeError> {
        if self.home.chain_id == self.remote.chain_id {
            return Err(NodeError::Config(format!(
                "home and remote share chain id {}",
                self.home.chain_id
            )));
        }
        for (name, address) in [
            ("home.address", self.home.address),
            ("remote.address", self.remote.address),
            ("remote.governor", self.remote.governor),
        ] {
            if address.is_zero() {
                return Err(NodeError::Config(format!("{name} must not be zero")));
            }
        }
        if self.relayer.retry_interval_ms == 0 {
            return Err(NodeError::Config("relayer.retry_interval_ms must be positive".into()));
        }
        // Owner and quorum checks live with the authority.
        self.home_authority()?;
        self.remote_authority()?;
        Ok(())
    }

    pub fn home_chain(&self) -> ChainId {
        ChainId::new(self.home.chain_id)
    }

    pub fn remote_chain(&self) -> ChainId {
        ChainId::new(self.remote.chain_id)
    }

    fn home_authority(&self) -> Result<AuthorityConfig, NodeError> {
        Ok(AuthorityConfig::new(
            self.home.owner,
            Counterpart::new(self.remote_chain(), self.remote.address),
            self.home.quorum_bps,
        )?)
    }

    fn remote_authority(&self) -> Result<AuthorityConfig, NodeError> {
        // The remote side never evaluates quorum.
        Ok(AuthorityConfig::new(
            self.remote.owner,
            Counterpart::new(self.home_chain(), self.home.address),
            BPS_DENOMINATOR,
        )?)
    }

    /// Fresh home-side state for this configuration.
    pub fn home_state(&self) -> Result<HomeState, NodeError> {
        Ok(HomeState::new(
            self.home_chain(),
            self.home_authority()?,
            self.home.mirror_tolerance,
        ))
    }

    /// Fresh remote-side state for this configuration.
    pub fn remote_state(&self) -> Result<RemoteState, NodeError> {
        Ok(RemoteState::new(
            self.remote_chain(),
            self.remote_authority()?,
            self.remote.governor,
            self.remote.address,
        ))
    }
}
