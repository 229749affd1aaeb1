use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("config error: {0}")]
    Config(String),

    #[error("authority error: {0}")]
    Authority(#[from] bridge_authority::AuthorityError),

    #[error("governance error: {0}")]
    Governance(#[from] bridge_governance::GovernanceError),

    #[error("executor error: {0}")]
    Executor(#[from] bridge_executor::ExecutorError),

    #[error("store error: {0}")]
    Store(#[from] bridge_store::StoreError),

    #[error("scenario error: {0}")]
    Scenario(String),

    #[error("relayer stopped unexpectedly")]
    RelayerStopped,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
