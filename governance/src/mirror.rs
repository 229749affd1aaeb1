//! Home relay state machine.
//!
//! Per proposal: Unmirrored → Mirrored(Pending) → Mirrored(Finalized). Only
//! the owner may mirror; anyone may vote inside the window with their
//! snapshot weight; anyone may finalize once the window has closed, which
//! seals the outcome and sends exactly one instruction to the counterpart.

use crate::error::GovernanceError;
use crate::event::HomeEvent;
use crate::oracle::VotingPowerOracle;
use crate::proposal::{MirroredProposal, ProposalState, VoteReceipt};
use crate::quorum;
use crate::table::ProposalTable;
use bridge_authority::{AuthorityConfig, Counterpart};
use bridge_messages::{InstructionDigest, MessageTransport, RelayInstruction};
use bridge_types::{Address, BlockNumber, ChainId, EventBus, Nonce, ProposalId, Support};
use serde::{Deserialize, Serialize};

/// How far in the past (in blocks) a mirrored window may start.
pub const DEFAULT_MIRROR_TOLERANCE: u64 = 100;

/// Everything the home relay persists between restarts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeState {
    /// Chain this instance runs on; stamped into every instruction.
    pub chain_id: ChainId,
    pub authority: AuthorityConfig,
    pub mirror_tolerance: u64,
    pub table: ProposalTable,
    pub next_nonce: Nonce,
}

impl HomeState {
    pub fn new(chain_id: ChainId, authority: AuthorityConfig, mirror_tolerance: u64) -> Self {
        Self {
            chain_id,
            authority,
            mirror_tolerance,
            table: ProposalTable::new(),
            next_nonce: Nonce::FIRST,
        }
    }
}

/// The home-side relay: mirrors remote proposals and relays their outcome.
pub struct MirrorGovernor<O, T> {
    state: HomeState,
    oracle: O,
    transport: T,
    events: EventBus<HomeEvent>,
}

impl<O, T> MirrorGovernor<O, T>
where
    O: VotingPowerOracle,
    T: MessageTransport,
{
    pub fn new(state: HomeState, oracle: O, transport: T) -> Self {
        Self {
            state,
            oracle,
            transport,
            events: EventBus::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&HomeEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    pub fn state(&self) -> &HomeState {
        &self.state
    }

    pub fn into_state(self) -> HomeState {
        self.state
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // ── Proposal lifecycle ─────────────────────────────────────────────

    /// Mirror a remote proposal with its home-chain voting window.
    pub fn mirror_proposal(
        &mut self,
        caller: &Address,
        id: ProposalId,
        start_block: BlockNumber,
        end_block: BlockNumber,
        current: BlockNumber,
    ) -> Result<(), GovernanceError> {
        self.state.authority.ensure_not_paused()?;
        self.state.authority.ensure_owner(caller)?;
        if self.state.table.contains(id) {
            return Err(GovernanceError::AlreadyMirrored(id));
        }
        if end_block <= start_block
            || start_block.saturating_add(self.state.mirror_tolerance) < current
        {
            return Err(GovernanceError::InvalidWindow {
                start: start_block,
                end: end_block,
                current,
            });
        }

        self.state
            .table
            .insert(MirroredProposal::new(id, start_block, end_block, current))?;

        tracing::info!(
            proposal = id.get(),
            start = start_block.get(),
            end = end_block.get(),
            "proposal mirrored"
        );
        self.emit(HomeEvent::ProposalMirrored {
            proposal: id,
            start_block,
            end_block,
        });
        Ok(())
    }

    /// Cast a vote with the caller's weight at the proposal's snapshot block.
    /// Returns the weight that was counted.
    pub fn cast_vote(
        &mut self,
        caller: &Address,
        id: ProposalId,
        support: Support,
        current: BlockNumber,
    ) -> Result<u128, GovernanceError> {
        self.cast_vote_with_reason(caller, id, support, "", current)
    }

    pub fn cast_vote_with_reason(
        &mut self,
        caller: &Address,
        id: ProposalId,
        support: Support,
        reason: &str,
        current: BlockNumber,
    ) -> Result<u128, GovernanceError> {
        self.state.authority.ensure_not_paused()?;
        let proposal = self
            .state
            .table
            .get(id)
            .ok_or(GovernanceError::UnknownProposal(id))?;
        if !proposal.is_open_at(current) {
            return Err(GovernanceError::VotingClosed {
                proposal: id,
                current,
            });
        }
        if self.state.table.receipt(id, caller).is_some() {
            return Err(GovernanceError::AlreadyVoted {
                proposal: id,
                voter: *caller,
            });
        }

        let snapshot = proposal.snapshot_block;
        let weight = self.oracle.weight_of(caller, snapshot)?;
        if weight == 0 {
            return Err(GovernanceError::NoVotingPower {
                voter: *caller,
                block: snapshot,
            });
        }

        let tally = self.state.table.record_vote(VoteReceipt {
            proposal_id: id,
            voter: *caller,
            support,
            weight,
            cast_block: current,
        })?;

        tracing::info!(
            proposal = id.get(),
            voter = %caller,
            %support,
            weight,
            %tally,
            "vote cast"
        );
        self.emit(HomeEvent::VoteCast {
            proposal: id,
            voter: *caller,
            support,
            weight,
            reason: reason.to_string(),
        });
        Ok(weight)
    }

    /// Seal a closed proposal and send its outcome to the counterpart.
    ///
    /// Permissionless. If the transport refuses the instruction nothing is
    /// sealed and the call can simply be repeated.
    pub fn finalize(
        &mut self,
        id: ProposalId,
        current: BlockNumber,
    ) -> Result<RelayInstruction, GovernanceError> {
        self.state.authority.ensure_not_paused()?;
        let proposal = self
            .state
            .table
            .get(id)
            .ok_or(GovernanceError::UnknownProposal(id))?;
        if current <= proposal.end_block {
            return Err(GovernanceError::VotingStillActive {
                proposal: id,
                end: proposal.end_block,
                current,
            });
        }
        if proposal.finalized {
            return Err(GovernanceError::AlreadyFinalized(id));
        }

        let tally = proposal.tally;
        let total_supply = self.oracle.total_supply_at(proposal.end_block)?;
        let quorum_bps = self.state.authority.quorum_bps();
        let outcome = quorum::evaluate(total_supply, &tally, quorum_bps);

        let nonce = self.state.next_nonce;
        let following = nonce.checked_next().ok_or(GovernanceError::NonceExhausted)?;
        let instruction = RelayInstruction {
            source_chain: self.state.chain_id,
            proposal_id: id,
            outcome,
            tally,
            nonce,
            finalized_at: current,
        };
        let payload = instruction.encode()?;
        let digest = InstructionDigest::of(&payload);

        let destination = self.state.authority.counterpart();
        if let Err(e) = self
            .transport
            .send(destination.chain_id, destination.address, payload)
        {
            tracing::warn!(
                proposal = id.get(),
                digest = %digest.short(),
                "transport refused instruction: {e}"
            );
            return Err(e.into());
        }

        self.state.table.seal(id, outcome, current, nonce)?;
        self.state.next_nonce = following;

        tracing::info!(
            proposal = id.get(),
            %outcome,
            %tally,
            total_supply,
            quorum_bps,
            nonce = nonce.get(),
            digest = %digest.short(),
            "proposal finalized"
        );
        self.emit(HomeEvent::ProposalFinalized {
            proposal: id,
            outcome,
            tally,
            nonce,
            digest,
        });
        Ok(instruction)
    }

    // ── Views ──────────────────────────────────────────────────────────

    pub fn proposal(&self, id: ProposalId) -> Option<&MirroredProposal> {
        self.state.table.get(id)
    }

    pub fn receipt(&self, id: ProposalId, voter: &Address) -> Option<&VoteReceipt> {
        self.state.table.receipt(id, voter)
    }

    pub fn has_voted(&self, id: ProposalId, voter: &Address) -> bool {
        self.receipt(id, voter).is_some()
    }

    pub fn state_of(&self, id: ProposalId, current: BlockNumber) -> ProposalState {
        self.state
            .table
            .get(id)
            .map_or(ProposalState::Unmirrored, |p| p.state_at(current))
    }

    /// Participation a proposal needs, based on supply at its end block.
    pub fn quorum_threshold_for(&self, id: ProposalId) -> Result<u128, GovernanceError> {
        let proposal = self
            .state
            .table
            .get(id)
            .ok_or(GovernanceError::UnknownProposal(id))?;
        let supply = self.oracle.total_supply_at(proposal.end_block)?;
        Ok(quorum::quorum_threshold(
            supply,
            self.state.authority.quorum_bps(),
        ))
    }

    pub fn config(&self) -> &AuthorityConfig {
        &self.state.authority
    }

    pub fn chain_id(&self) -> ChainId {
        self.state.chain_id
    }

    pub fn next_nonce(&self) -> Nonce {
        self.state.next_nonce
    }

    pub fn proposal_count(&self) -> usize {
        self.state.table.len()
    }

    // ── Administration ─────────────────────────────────────────────────

    pub fn propose_owner(&mut self, caller: &Address, new_owner: Address) -> Result<(), GovernanceError> {
        let event = self.state.authority.propose_owner(caller, new_owner)?;
        self.emit(HomeEvent::Admin(event));
        Ok(())
    }

    pub fn accept_owner(&mut self, caller: &Address) -> Result<(), GovernanceError> {
        let event = self.state.authority.accept_owner(caller)?;
        self.emit(HomeEvent::Admin(event));
        Ok(())
    }

    pub fn cancel_transfer(&mut self, caller: &Address) -> Result<(), GovernanceError> {
        let event = self.state.authority.cancel_transfer(caller)?;
        self.emit(HomeEvent::Admin(event));
        Ok(())
    }

    pub fn set_quorum_bps(&mut self, caller: &Address, quorum_bps: u16) -> Result<(), GovernanceError> {
        let event = self.state.authority.set_quorum_bps(caller, quorum_bps)?;
        self.emit(HomeEvent::Admin(event));
        Ok(())
    }

    pub fn set_counterpart(
        &mut self,
        caller: &Address,
        counterpart: Counterpart,
    ) -> Result<(), GovernanceError> {
        let event = self.state.authority.set_counterpart(caller, counterpart)?;
        self.emit(HomeEvent::Admin(event));
        Ok(())
    }

    pub fn pause(&mut self, caller: &Address) -> Result<(), GovernanceError> {
        let event = self.state.authority.pause(caller)?;
        self.emit(HomeEvent::Admin(event));
        Ok(())
    }

    pub fn unpause(&mut self, caller: &Address) -> Result<(), GovernanceError> {
        let event = self.state.authority.unpause(caller)?;
        self.emit(HomeEvent::Admin(event));
        Ok(())
    }

    fn emit(&self, event: HomeEvent) {
        self.events.emit(&event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::OracleError;
    use bridge_authority::{AdminEvent, AuthorityError};
    use bridge_messages::{OutboundMessage, TransportError};
    use bridge_types::{ErrorClass, Outcome, Tally};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    const HOME: u64 = 8453;
    const REMOTE: u64 = 1;

    struct FixedOracle {
        weights: HashMap<Address, u128>,
        supply: u128,
        asked: Mutex<Vec<BlockNumber>>,
    }

    impl VotingPowerOracle for FixedOracle {
        fn weight_of(&self, account: &Address, block: BlockNumber) -> Result<u128, OracleError> {
            self.asked.lock().unwrap().push(block);
            Ok(self.weights.get(account).copied().unwrap_or(0))
        }

        fn total_supply_at(&self, _block: BlockNumber) -> Result<u128, OracleError> {
            Ok(self.supply)
        }
    }

    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<OutboundMessage>>,
        refuse: AtomicBool,
    }

    impl MessageTransport for RecordingTransport {
        fn send(
            &self,
            destination_chain: ChainId,
            destination: Address,
            payload: Vec<u8>,
        ) -> Result<(), TransportError> {
            if self.refuse.load(Ordering::SeqCst) {
                return Err(TransportError::Rejected("fee too low".into()));
            }
            self.sent.lock().unwrap().push(OutboundMessage {
                destination_chain,
                destination,
                payload,
            });
            Ok(())
        }
    }

    type Governor = MirrorGovernor<FixedOracle, RecordingTransport>;

    fn owner() -> Address {
        Address::from_low_u64(1)
    }

    fn executor_address() -> Address {
        Address::from_low_u64(500)
    }

    fn voter(n: u64) -> Address {
        Address::from_low_u64(100 + n)
    }

    fn id() -> ProposalId {
        ProposalId::new(1)
    }

    fn governor(weights: &[(u64, u128)], supply: u128) -> (Governor, Arc<Mutex<Vec<HomeEvent>>>) {
        let authority = AuthorityConfig::new(
            owner(),
            Counterpart::new(ChainId::new(REMOTE), executor_address()),
            2000,
        )
        .unwrap();
        let state = HomeState::new(ChainId::new(HOME), authority, DEFAULT_MIRROR_TOLERANCE);
        let oracle = FixedOracle {
            weights: weights.iter().map(|(n, w)| (voter(*n), *w)).collect(),
            supply,
            asked: Mutex::new(Vec::new()),
        };
        let mut governor = MirrorGovernor::new(state, oracle, RecordingTransport::default());
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        governor.subscribe(Box::new(move |e| sink.lock().unwrap().push(e.clone())));
        (governor, events)
    }

    fn mirrored(weights: &[(u64, u128)], supply: u128) -> (Governor, Arc<Mutex<Vec<HomeEvent>>>) {
        let (mut governor, events) = governor(weights, supply);
        governor
            .mirror_proposal(&owner(), id(), BlockNumber::new(100), BlockNumber::new(200), BlockNumber::new(90))
            .unwrap();
        events.lock().unwrap().clear();
        (governor, events)
    }

    fn b(n: u64) -> BlockNumber {
        BlockNumber::new(n)
    }

    // ── Mirroring ──────────────────────────────────────────────────────

    #[test]
    fn mirror_creates_pending_proposal_and_emits_once() {
        let (mut governor, events) = governor(&[], 1000);
        governor
            .mirror_proposal(&owner(), id(), b(100), b(200), b(90))
            .unwrap();

        let proposal = governor.proposal(id()).unwrap();
        assert_eq!(proposal.start_block, b(100));
        assert_eq!(proposal.end_block, b(200));
        assert_eq!(proposal.outcome, Outcome::Pending);
        assert_eq!(proposal.tally, Tally::EMPTY);
        assert_eq!(
            *events.lock().unwrap(),
            vec![HomeEvent::ProposalMirrored {
                proposal: id(),
                start_block: b(100),
                end_block: b(200),
            }]
        );
    }

    #[test]
    fn mirror_twice_is_rejected_and_original_kept() {
        let (mut governor, events) = mirrored(&[(1, 10)], 1000);
        governor.cast_vote(&voter(1), id(), Support::For, b(150)).unwrap();
        events.lock().unwrap().clear();

        let err = governor
            .mirror_proposal(&owner(), id(), b(300), b(400), b(150))
            .unwrap_err();
        assert!(matches!(err, GovernanceError::AlreadyMirrored(_)));
        assert_eq!(err.class(), ErrorClass::Precondition);

        let proposal = governor.proposal(id()).unwrap();
        assert_eq!((proposal.start_block, proposal.end_block), (b(100), b(200)));
        assert_eq!(proposal.tally, Tally::new(10, 0, 0));
        assert!(events.lock().unwrap().is_empty());
    }

    #[test]
    fn mirror_requires_owner() {
        let (mut governor, events) = governor(&[], 1000);
        let err = governor
            .mirror_proposal(&voter(1), id(), b(100), b(200), b(90))
            .unwrap_err();
        assert!(matches!(
            err,
            GovernanceError::Authority(AuthorityError::NotAuthorized { .. })
        ));
        assert_eq!(err.class(), ErrorClass::Authorization);
        assert_eq!(governor.proposal_count(), 0);
        assert!(events.lock().unwrap().is_empty());
    }

    #[test]
    fn mirror_rejects_empty_or_inverted_window() {
        let (mut governor, _) = governor(&[], 1000);
        for (start, end) in [(100, 100), (200, 100)] {
            assert!(matches!(
                governor.mirror_proposal(&owner(), id(), b(start), b(end), b(90)),
                Err(GovernanceError::InvalidWindow { .. })
            ));
        }
    }

    #[test]
    fn mirror_tolerates_recent_start_but_not_stale_start() {
        let (mut governor, _) = governor(&[], 1000);
        // start + tolerance == current is still accepted.
        governor
            .mirror_proposal(&owner(), id(), b(100), b(400), b(100 + DEFAULT_MIRROR_TOLERANCE))
            .unwrap();
        assert!(matches!(
            governor.mirror_proposal(
                &owner(),
                ProposalId::new(2),
                b(100),
                b(400),
                b(101 + DEFAULT_MIRROR_TOLERANCE)
            ),
            Err(GovernanceError::InvalidWindow { .. })
        ));
    }

    // ── Voting ─────────────────────────────────────────────────────────

    #[test]
    fn vote_on_unknown_proposal_fails() {
        let (mut governor, _) = governor(&[(1, 10)], 1000);
        assert!(matches!(
            governor.cast_vote(&voter(1), id(), Support::For, b(150)),
            Err(GovernanceError::UnknownProposal(_))
        ));
    }

    #[test]
    fn vote_outside_window_is_closed() {
        let (mut governor, _) = mirrored(&[(1, 10)], 1000);
        for block in [99, 201] {
            assert!(matches!(
                governor.cast_vote(&voter(1), id(), Support::For, b(block)),
                Err(GovernanceError::VotingClosed { .. })
            ));
        }
        governor.cast_vote(&voter(1), id(), Support::For, b(200)).unwrap();
    }

    #[test]
    fn second_vote_is_rejected_and_tally_unchanged() {
        let (mut governor, events) = mirrored(&[(1, 40)], 1000);
        governor.cast_vote(&voter(1), id(), Support::For, b(120)).unwrap();
        let err = governor
            .cast_vote(&voter(1), id(), Support::Against, b(121))
            .unwrap_err();
        assert!(matches!(err, GovernanceError::AlreadyVoted { .. }));
        assert_eq!(governor.proposal(id()).unwrap().tally, Tally::new(40, 0, 0));
        assert_eq!(events.lock().unwrap().len(), 1);
    }

    #[test]
    fn zero_weight_has_no_voting_power() {
        let (mut governor, events) = mirrored(&[], 1000);
        let err = governor
            .cast_vote(&voter(9), id(), Support::For, b(150))
            .unwrap_err();
        assert!(matches!(err, GovernanceError::NoVotingPower { .. }));
        assert_eq!(err.class(), ErrorClass::Resource);
        assert!(!governor.has_voted(id(), &voter(9)));
        assert!(events.lock().unwrap().is_empty());
    }

    #[test]
    fn weight_is_read_at_snapshot_block_and_stored_on_receipt() {
        let (mut governor, events) = mirrored(&[(1, 77)], 1000);
        let weight = governor
            .cast_vote_with_reason(&voter(1), id(), Support::Abstain, "conflicted", b(180))
            .unwrap();
        assert_eq!(weight, 77);
        assert_eq!(*governor.oracle().asked.lock().unwrap(), vec![b(100)]);

        let receipt = governor.receipt(id(), &voter(1)).unwrap();
        assert_eq!(receipt.weight, 77);
        assert_eq!(receipt.support, Support::Abstain);
        assert_eq!(receipt.cast_block, b(180));
        assert_eq!(
            events.lock().unwrap()[0],
            HomeEvent::VoteCast {
                proposal: id(),
                voter: voter(1),
                support: Support::Abstain,
                weight: 77,
                reason: "conflicted".into(),
            }
        );
    }

    // ── Finalization ───────────────────────────────────────────────────

    #[test]
    fn finalize_waits_for_window_then_succeeds_once() {
        let (mut governor, _) = mirrored(&[(1, 500)], 1000);
        governor.cast_vote(&voter(1), id(), Support::For, b(150)).unwrap();

        for block in [0, 99, 100, 150, 199, 200] {
            assert!(matches!(
                governor.finalize(id(), b(block)),
                Err(GovernanceError::VotingStillActive { .. })
            ));
        }
        governor.finalize(id(), b(201)).unwrap();
        for block in [201, 202, 10_000] {
            assert!(matches!(
                governor.finalize(id(), b(block)),
                Err(GovernanceError::AlreadyFinalized(_))
            ));
        }
        assert_eq!(governor.transport().sent.lock().unwrap().len(), 1);
    }

    #[test]
    fn finalize_unknown_proposal_fails() {
        let (mut governor, _) = governor(&[], 1000);
        assert!(matches!(
            governor.finalize(id(), b(500)),
            Err(GovernanceError::UnknownProposal(_))
        ));
    }

    #[test]
    fn finalize_is_permissionless_and_targets_counterpart() {
        let (mut governor, events) = mirrored(&[(1, 500), (2, 100)], 1000);
        governor.cast_vote(&voter(1), id(), Support::For, b(150)).unwrap();
        governor.cast_vote(&voter(2), id(), Support::Against, b(150)).unwrap();
        events.lock().unwrap().clear();

        let instruction = governor.finalize(id(), b(201)).unwrap();
        assert_eq!(instruction.outcome, Outcome::Succeeded);
        assert_eq!(instruction.source_chain, ChainId::new(HOME));
        assert_eq!(instruction.nonce, Nonce::FIRST);
        assert_eq!(instruction.tally, Tally::new(500, 100, 0));

        let sent = governor.transport().sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].destination_chain, ChainId::new(REMOTE));
        assert_eq!(sent[0].destination, executor_address());
        assert_eq!(RelayInstruction::decode(&sent[0].payload).unwrap(), instruction);

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            HomeEvent::ProposalFinalized { outcome: Outcome::Succeeded, .. }
        ));
        assert_eq!(governor.next_nonce(), Nonce::new(2));
        assert_eq!(
            governor.state_of(id(), b(300)),
            ProposalState::Finalized(Outcome::Succeeded)
        );
    }

    #[test]
    fn refused_send_leaves_proposal_open_for_retry() {
        let (mut governor, events) = mirrored(&[(1, 500)], 1000);
        governor.cast_vote(&voter(1), id(), Support::For, b(150)).unwrap();
        events.lock().unwrap().clear();

        governor.transport().refuse.store(true, Ordering::SeqCst);
        let err = governor.finalize(id(), b(201)).unwrap_err();
        assert!(matches!(err, GovernanceError::Transport(_)));
        assert!(err.class().is_retryable());
        assert!(!governor.proposal(id()).unwrap().finalized);
        assert_eq!(governor.next_nonce(), Nonce::FIRST);
        assert!(events.lock().unwrap().is_empty());

        governor.transport().refuse.store(false, Ordering::SeqCst);
        let instruction = governor.finalize(id(), b(202)).unwrap();
        assert_eq!(instruction.nonce, Nonce::FIRST);
    }

    #[test]
    fn nonces_increase_across_proposals() {
        let (mut governor, _) = mirrored(&[], 1000);
        governor
            .mirror_proposal(&owner(), ProposalId::new(2), b(100), b(150), b(90))
            .unwrap();
        let first = governor.finalize(ProposalId::new(2), b(151)).unwrap();
        let second = governor.finalize(id(), b(201)).unwrap();
        assert_eq!(first.nonce, Nonce::new(1));
        assert_eq!(second.nonce, Nonce::new(2));
    }

    #[test]
    fn scenario_low_turnout_does_not_reach_quorum() {
        let (mut governor, _) = mirrored(&[(1, 50), (2, 30), (3, 10)], 1000);
        governor.cast_vote(&voter(1), id(), Support::For, b(110)).unwrap();
        governor.cast_vote(&voter(2), id(), Support::Against, b(120)).unwrap();
        governor.cast_vote(&voter(3), id(), Support::Abstain, b(130)).unwrap();
        assert_eq!(governor.quorum_threshold_for(id()).unwrap(), 200);

        let instruction = governor.finalize(id(), b(201)).unwrap();
        assert_eq!(instruction.outcome, Outcome::NotReachedQuorum);
        assert_eq!(instruction.tally, Tally::new(50, 30, 10));
    }

    #[test]
    fn scenario_clear_majority_succeeds() {
        let (mut governor, _) = mirrored(&[(1, 500), (2, 100)], 1000);
        governor.cast_vote(&voter(1), id(), Support::For, b(110)).unwrap();
        governor.cast_vote(&voter(2), id(), Support::Against, b(120)).unwrap();
        let instruction = governor.finalize(id(), b(201)).unwrap();
        assert_eq!(instruction.outcome, Outcome::Succeeded);
    }

    // ── Pause & administration ─────────────────────────────────────────

    #[test]
    fn pause_blocks_mutations_but_not_views_or_unpause() {
        let (mut governor, events) = mirrored(&[(1, 500), (2, 100)], 1000);
        governor.cast_vote(&voter(1), id(), Support::For, b(150)).unwrap();
        governor.pause(&owner()).unwrap();

        let paused = |r: Result<(), GovernanceError>| {
            assert!(r.unwrap_err().is_paused());
        };
        paused(governor.mirror_proposal(&owner(), ProposalId::new(2), b(100), b(200), b(150)));
        paused(governor.cast_vote(&voter(2), id(), Support::Against, b(150)).map(|_| ()));
        paused(governor.finalize(id(), b(201)).map(|_| ()));

        // Views still answer.
        assert_eq!(governor.proposal(id()).unwrap().tally, Tally::new(500, 0, 0));
        assert!(governor.has_voted(id(), &voter(1)));
        // Admin still works.
        governor.set_quorum_bps(&owner(), 2500).unwrap();

        governor.unpause(&owner()).unwrap();
        assert_eq!(governor.proposal(id()).unwrap().tally, Tally::new(500, 0, 0));
        governor.cast_vote(&voter(2), id(), Support::Against, b(160)).unwrap();
        assert_eq!(governor.proposal(id()).unwrap().tally, Tally::new(500, 100, 0));

        let names: Vec<_> = events.lock().unwrap().iter().map(|e| e.name()).collect();
        assert_eq!(
            names,
            vec!["vote_cast", "pause_changed", "quorum_updated", "pause_changed", "vote_cast"]
        );
    }

    #[test]
    fn admin_changes_are_published_with_old_and_new() {
        let (mut governor, events) = governor(&[], 1000);
        let next = Address::from_low_u64(2);
        governor.set_quorum_bps(&owner(), 3000).unwrap();
        governor.propose_owner(&owner(), next).unwrap();
        governor.accept_owner(&next).unwrap();

        let events = events.lock().unwrap();
        assert_eq!(
            events[0],
            HomeEvent::Admin(AdminEvent::QuorumUpdated { old: 2000, new: 3000 })
        );
        assert_eq!(
            events[2],
            HomeEvent::Admin(AdminEvent::OwnershipTransferred { old: owner(), new: next })
        );
        assert_eq!(governor.config().owner(), next);
    }

    #[test]
    fn failed_admin_call_emits_nothing() {
        let (mut governor, events) = governor(&[], 1000);
        assert!(governor.set_quorum_bps(&owner(), 0).is_err());
        assert!(governor.pause(&voter(1)).is_err());
        assert!(events.lock().unwrap().is_empty());
    }
}
