//! Scripted end-to-end runs of a home/remote pair.
//!
//! A [`Scenario`] (usually loaded from TOML) lists token holders, proposals
//! and votes. [`run_scenario`] mirrors every proposal, casts the votes in
//! block order, finalizes each proposal once its window closes and relays the
//! resulting instructions through a [`Relayer`] to the remote side.

use std::path::Path;
use std::sync::Arc;

use bridge_executor::{ExecutionRecord, ExecutorError, ManualProof, RemoteExecutor, RemoteState};
use bridge_governance::{HomeState, MirrorGovernor};
use bridge_messages::RelayInstruction;
use bridge_nullables::{NullChain, NullGovernor, NullVotingPower};
use bridge_types::{Address, BlockNumber, Nonce, Outcome, ProposalId, Support, Tally};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::Instrument;

use crate::relayer::{ChannelTransport, RelayStats, Relayer};
use crate::{BridgeConfig, NodeError};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub total_supply: u128,
    #[serde(default)]
    pub holders: Vec<Holder>,
    pub proposals: Vec<ScenarioProposal>,
    #[serde(default)]
    pub votes: Vec<ScenarioVote>,
    #[serde(default)]
    pub delivery: DeliveryPlan,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Holder {
    pub address: Address,
    pub weight: u128,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ScenarioProposal {
    pub id: u64,
    pub start: u64,
    pub end: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ScenarioVote {
    pub proposal: u64,
    pub voter: Address,
    pub support: Support,
    pub block: u64,
    #[serde(default)]
    pub reason: String,
}

/// Faults injected on the remote side.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct DeliveryPlan {
    /// Pause the executor for the first relay pass.
    #[serde(default)]
    pub pause_remote: bool,
    /// Number of remote vote calls that fail before the governor recovers.
    #[serde(default)]
    pub fail_remote_calls: u32,
    /// Replay retained instructions manually after relaying.
    #[serde(default)]
    pub manual_retry: bool,
}

impl Scenario {
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Scenario(e.to_string()))
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, NodeError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| NodeError::Scenario(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProposalReport {
    pub id: ProposalId,
    pub outcome: Outcome,
    pub tally: Tally,
    pub nonce: Option<Nonce>,
    pub executed: bool,
    pub executor: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SimulationReport {
    pub scenario: String,
    pub proposals: Vec<ProposalReport>,
    /// Votes the home relay refused, with the reason.
    pub rejected_votes: Vec<String>,
    pub relay: RelayStats,
    /// Messages the relayer handed back unsettled and nobody replayed.
    pub undelivered: usize,
}

/// Report plus the final state of both sides, ready to persist.
pub struct SimulationOutcome {
    pub report: SimulationReport,
    pub home: HomeState,
    pub remote: RemoteState,
}

pub async fn run_scenario(
    config: &BridgeConfig,
    scenario: &Scenario,
) -> Result<SimulationOutcome, NodeError> {
    let span = bridge_utils::spans::simulate_span(&scenario.name);
    run(config, scenario).instrument(span).await
}

async fn run(config: &BridgeConfig, scenario: &Scenario) -> Result<SimulationOutcome, NodeError> {
    let balances: Vec<_> = scenario
        .holders
        .iter()
        .map(|h| (h.address, h.weight))
        .collect();
    let oracle = NullVotingPower::with_balances(scenario.total_supply, &balances);
    let (transport, inbox) = ChannelTransport::channel(config.home_chain(), config.home.address);
    let mut home = MirrorGovernor::new(config.home_state()?, oracle, transport);

    let governor = NullGovernor::new(config.remote.address);
    governor.fail_next(scenario.delivery.fail_remote_calls);
    let executor = Arc::new(Mutex::new(RemoteExecutor::new(config.remote_state()?, governor)));
    let remote_chain = Arc::new(NullChain::new(0));
    let mut relayer = Relayer::new(
        inbox,
        Arc::clone(&executor),
        remote_chain.clone(),
        config.relayer.max_attempts,
    );

    let owner = config.home.owner;
    for proposal in &scenario.proposals {
        let mirrored_at = BlockNumber::new(proposal.start.saturating_sub(1));
        home.mirror_proposal(
            &owner,
            ProposalId::new(proposal.id),
            BlockNumber::new(proposal.start),
            BlockNumber::new(proposal.end),
            mirrored_at,
        )?;
    }

    let mut votes: Vec<_> = scenario.votes.iter().collect();
    votes.sort_by_key(|v| v.block);
    let mut rejected_votes = Vec::new();
    for vote in votes {
        let result = home.cast_vote_with_reason(
            &vote.voter,
            ProposalId::new(vote.proposal),
            vote.support,
            &vote.reason,
            BlockNumber::new(vote.block),
        );
        if let Err(e) = result {
            tracing::info!(proposal = vote.proposal, voter = %vote.voter, "vote refused: {e}");
            rejected_votes.push(format!("{} on {}: {e}", vote.voter, vote.proposal));
        }
    }

    let mut closing: Vec<_> = scenario.proposals.iter().collect();
    closing.sort_by_key(|p| (p.end, p.id));
    for proposal in closing {
        let id = ProposalId::new(proposal.id);
        let _span = bridge_utils::spans::finalize_span(proposal.id).entered();
        home.finalize(id, BlockNumber::new(proposal.end).next())?;
    }

    let remote_owner = config.remote.owner;
    if scenario.delivery.pause_remote {
        executor.lock().await.pause(&remote_owner)?;
    }
    remote_chain.advance(1);
    relayer.drain().await;
    if scenario.delivery.pause_remote {
        executor.lock().await.unpause(&remote_owner)?;
        remote_chain.advance(1);
        relayer.drain().await;
    }

    let relay = relayer.stats();
    let mut undelivered = relayer.take_undelivered();
    if scenario.delivery.manual_retry {
        remote_chain.advance(1);
        let mut executor = executor.lock().await;
        let mut unsettled = Vec::new();
        for message in undelivered {
            let id = match RelayInstruction::decode(&message.payload) {
                Ok(instruction) => instruction.proposal_id,
                Err(e) => {
                    tracing::warn!("undelivered payload unreadable: {e}");
                    unsettled.push(message);
                    continue;
                }
            };
            let replay = ManualProof::Attested(message.clone());
            match executor.execute_manually(&remote_owner, id, replay, remote_chain.current()) {
                Ok(_) | Err(ExecutorError::NotSucceeded { .. }) => {}
                Err(e) => {
                    tracing::warn!(proposal = id.get(), "replay of undelivered message failed: {e}");
                    unsettled.push(message);
                }
            }
        }
        undelivered = unsettled;

        let pending: Vec<_> = executor
            .state()
            .ledger
            .pending_instructions()
            .map(|p| p.instruction.proposal_id)
            .collect();
        for id in pending {
            if let Err(e) = executor.execute_manually(
                &remote_owner,
                id,
                ManualProof::Retained,
                remote_chain.current(),
            ) {
                tracing::warn!(proposal = id.get(), "manual retry failed: {e}");
            }
        }
    }

    drop(relayer);
    let executor = Arc::try_unwrap(executor)
        .map_err(|_| NodeError::RelayerStopped)?
        .into_inner();

    let proposals = home
        .state()
        .table
        .proposals()
        .map(|p| {
            let record: Option<&ExecutionRecord> = executor.execution(p.id);
            ProposalReport {
                id: p.id,
                outcome: p.outcome,
                tally: p.tally,
                nonce: p.nonce,
                executed: record.is_some_and(|r| r.executed),
                executor: record.map(|r| r.executor.to_string()),
            }
        })
        .collect();

    let report = SimulationReport {
        scenario: scenario.name.clone(),
        proposals,
        rejected_votes,
        relay,
        undelivered: undelivered.len(),
    };
    tracing::info!(
        proposals = report.proposals.len(),
        executed = report.relay.executed,
        "simulation finished"
    );
    Ok(SimulationOutcome {
        report,
        home: home.into_state(),
        remote: executor.into_state(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"
        name = "two proposals"
        total_supply = 1000

        [[holders]]
        address = "0x0000000000000000000000000000000000000101"
        weight = 500

        [[holders]]
        address = "0x0000000000000000000000000000000000000102"
        weight = 100

        [[proposals]]
        id = 1
        start = 100
        end = 200

        [[proposals]]
        id = 2
        start = 100
        end = 150

        [[votes]]
        proposal = 1
        voter = "0x0000000000000000000000000000000000000101"
        support = "For"
        block = 120

        [[votes]]
        proposal = 1
        voter = "0x0000000000000000000000000000000000000102"
        support = "Against"
        block = 130
        reason = "too expensive"
    "#;

    #[test]
    fn scenario_parses_with_defaults() {
        let scenario = Scenario::from_toml_str(SCENARIO).unwrap();
        assert_eq!(scenario.proposals.len(), 2);
        assert_eq!(scenario.votes[1].support, Support::Against);
        assert_eq!(scenario.votes[0].reason, "");
        assert_eq!(scenario.delivery, DeliveryPlan::default());
    }

    #[test]
    fn scenario_without_proposals_is_rejected() {
        assert!(matches!(
            Scenario::from_toml_str("name = \"x\"\ntotal_supply = 1\n"),
            Err(NodeError::Scenario(_))
        ));
    }

    #[tokio::test]
    async fn only_succeeded_proposals_execute() {
        let scenario = Scenario::from_toml_str(SCENARIO).unwrap();
        let outcome = run_scenario(&BridgeConfig::default(), &scenario).await.unwrap();
        let report = outcome.report;

        assert_eq!(report.proposals[0].outcome, Outcome::Succeeded);
        assert!(report.proposals[0].executed);
        assert_eq!(report.proposals[1].outcome, Outcome::NotReachedQuorum);
        assert!(!report.proposals[1].executed);
        assert_eq!(report.relay.executed, 1);
        assert_eq!(report.relay.observed, 1);
        assert_eq!(outcome.home.next_nonce, Nonce::new(3));
    }

    #[tokio::test]
    async fn pause_and_failures_are_recovered() {
        let mut scenario = Scenario::from_toml_str(SCENARIO).unwrap();
        scenario.delivery = DeliveryPlan {
            pause_remote: true,
            fail_remote_calls: 1,
            manual_retry: true,
        };
        let outcome = run_scenario(&BridgeConfig::default(), &scenario).await.unwrap();
        let first = &outcome.report.proposals[0];
        assert!(first.executed);
        assert!(first.executor.as_deref().unwrap().starts_with("manual"));
        assert_eq!(outcome.report.relay.failed, 1);
        assert!(outcome.remote.ledger.pending(ProposalId::new(1)).is_none());
    }

    #[tokio::test]
    async fn messages_set_aside_during_pause_are_reported() {
        let mut config = BridgeConfig::default();
        config.relayer.max_attempts = 1;
        let mut scenario = Scenario::from_toml_str(SCENARIO).unwrap();
        scenario.delivery.pause_remote = true;

        let outcome = run_scenario(&config, &scenario).await.unwrap();
        assert_eq!(outcome.report.relay.abandoned, 2);
        assert_eq!(outcome.report.undelivered, 2);
        assert!(!outcome.report.proposals[0].executed);
    }

    #[tokio::test]
    async fn manual_retry_replays_messages_set_aside() {
        let mut config = BridgeConfig::default();
        config.relayer.max_attempts = 1;
        let mut scenario = Scenario::from_toml_str(SCENARIO).unwrap();
        scenario.delivery.pause_remote = true;
        scenario.delivery.manual_retry = true;

        let outcome = run_scenario(&config, &scenario).await.unwrap();
        assert_eq!(outcome.report.undelivered, 0);
        let first = &outcome.report.proposals[0];
        assert!(first.executed);
        assert!(first.executor.as_deref().unwrap().starts_with("manual"));
        assert!(outcome.remote.ledger.observed(ProposalId::new(2)).is_some());
    }

    #[tokio::test]
    async fn votes_outside_window_are_reported() {
        let mut scenario = Scenario::from_toml_str(SCENARIO).unwrap();
        scenario.votes.push(ScenarioVote {
            proposal: 2,
            voter: Address::from_low_u64(0x101),
            support: Support::For,
            block: 151,
            reason: String::new(),
        });
        let outcome = run_scenario(&BridgeConfig::default(), &scenario).await.unwrap();
        assert_eq!(outcome.report.rejected_votes.len(), 1);
    }
}
