//! Remote relay state machine.
//!
//! Per proposal ID: NotExecuted → Executed (terminal). Every path into
//! execution, relayed or manual, runs through [`RemoteExecutor::deliver`],
//! which consults the ledger before touching the remote governor.

use crate::error::ExecutorError;
use crate::event::RemoteEvent;
use crate::governor::{RemoteGovernor, RemoteProposal, RemoteReceipt};
use crate::ledger::{
    ExecutionLedger, ExecutionRecord, Executor, ObservedOutcome, Origin, PendingInstruction,
};
use bridge_authority::{AdminEvent, AuthorityConfig, AuthorityError, Counterpart};
use bridge_messages::{InboundMessage, RelayInstruction};
use bridge_types::{Address, BlockNumber, ChainId, EventBus, ProposalId, Support};
use serde::{Deserialize, Serialize};

/// Result of a delivery that did not fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    Executed,
    /// The proposal was executed earlier; nothing happened.
    AlreadyExecuted,
}

/// Evidence for a manual execution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ManualProof {
    /// Replay the instruction retained after a failed remote call.
    Retained,
    /// An attested payload obtained out of band. Owner only.
    Attested(InboundMessage),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteState {
    pub chain_id: ChainId,
    pub authority: AuthorityConfig,
    /// Address of the remote governance contract votes are cast on.
    pub governor: Address,
    /// Address this executor votes as.
    pub voter: Address,
    pub ledger: ExecutionLedger,
}

impl RemoteState {
    pub fn new(chain_id: ChainId, authority: AuthorityConfig, governor: Address, voter: Address) -> Self {
        Self {
            chain_id,
            authority,
            governor,
            voter,
            ledger: ExecutionLedger::new(),
        }
    }
}

pub struct RemoteExecutor<G> {
    state: RemoteState,
    governor: G,
    events: EventBus<RemoteEvent>,
}

impl<G: RemoteGovernor> RemoteExecutor<G> {
    pub fn new(state: RemoteState, governor: G) -> Self {
        Self {
            state,
            governor,
            events: EventBus::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&RemoteEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    pub fn state(&self) -> &RemoteState {
        &self.state
    }

    pub fn into_state(self) -> RemoteState {
        self.state
    }

    pub fn governor(&self) -> &G {
        &self.governor
    }

    /// Entry point for the message transport.
    pub fn on_instruction_received(
        &mut self,
        message: &InboundMessage,
        current: BlockNumber,
    ) -> Result<Delivery, ExecutorError> {
        self.state.authority.ensure_not_paused()?;
        let (origin, instruction) = self.authenticate(message)?;
        self.deliver(origin, instruction, Executor::Relayed, current)
    }

    /// Fallback when relayed execution failed or never arrived.
    pub fn execute_manually(
        &mut self,
        caller: &Address,
        id: ProposalId,
        proof: ManualProof,
        current: BlockNumber,
    ) -> Result<Delivery, ExecutorError> {
        self.state.authority.ensure_not_paused()?;
        let (origin, instruction) = match proof {
            ManualProof::Retained => {
                if self.state.ledger.is_executed(id) {
                    return Ok(Delivery::AlreadyExecuted);
                }
                let pending = self
                    .state
                    .ledger
                    .pending(id)
                    .ok_or(ExecutorError::NoPendingInstruction(id))?;
                (pending.origin, pending.instruction.clone())
            }
            ManualProof::Attested(message) => {
                self.state.authority.ensure_owner(caller)?;
                self.authenticate(&message)?
            }
        };
        if instruction.proposal_id != id {
            return Err(ExecutorError::ProofMismatch {
                expected: id,
                found: instruction.proposal_id,
            });
        }
        tracing::info!(proposal = id.get(), by = %caller, "manual execution requested");
        self.deliver(origin, instruction, Executor::Manual(*caller), current)
    }

    /// Check the transport attestation, then decode.
    fn authenticate(
        &self,
        message: &InboundMessage,
    ) -> Result<(Origin, RelayInstruction), ExecutorError> {
        if !self
            .state
            .authority
            .is_trusted_origin(message.source_chain, &message.sender)
        {
            tracing::warn!(
                chain = message.source_chain.get(),
                sender = %message.sender,
                "instruction from untrusted origin dropped"
            );
            return Err(ExecutorError::UntrustedOrigin {
                chain: message.source_chain,
                sender: message.sender,
            });
        }
        let instruction = RelayInstruction::decode(&message.payload)?;
        if instruction.source_chain != message.source_chain {
            tracing::warn!(
                attested = message.source_chain.get(),
                claimed = instruction.source_chain.get(),
                "instruction source chain disagrees with attestation"
            );
            return Err(ExecutorError::UntrustedOrigin {
                chain: instruction.source_chain,
                sender: message.sender,
            });
        }
        Ok((Origin::from(message), instruction))
    }

    fn deliver(
        &mut self,
        origin: Origin,
        instruction: RelayInstruction,
        executor: Executor,
        current: BlockNumber,
    ) -> Result<Delivery, ExecutorError> {
        let id = instruction.proposal_id;
        if self.state.ledger.is_executed(id) {
            tracing::debug!(proposal = id.get(), %executor, "already executed, ignoring");
            return Ok(Delivery::AlreadyExecuted);
        }

        if !instruction.is_executable() {
            self.state.ledger.observe(ObservedOutcome {
                proposal_id: id,
                outcome: instruction.outcome,
                tally: instruction.tally,
                nonce: instruction.nonce,
                observed_at: current,
            });
            tracing::info!(proposal = id.get(), outcome = %instruction.outcome, "non-executable outcome observed");
            return Err(ExecutorError::NotSucceeded {
                proposal: id,
                outcome: instruction.outcome,
            });
        }

        if let Some(consumed_by) = self.state.ledger.nonce_owner(origin, instruction.nonce) {
            return Err(ExecutorError::StaleNonce {
                nonce: instruction.nonce,
                consumed_by,
            });
        }

        let digest = instruction.digest()?;
        let reason = format!(
            "Voting from chain {} via relay (nonce {})",
            instruction.source_chain, instruction.nonce
        );
        if let Err(source) = self.governor.cast_vote(id, Support::For, &reason) {
            let attempts = self
                .state
                .ledger
                .retain(origin, instruction, source.to_string(), current);
            tracing::warn!(
                proposal = id.get(),
                digest = %digest.short(),
                attempts,
                "remote vote failed, instruction retained: {source}"
            );
            return Err(ExecutorError::RemoteCall {
                proposal: id,
                source,
            });
        }

        let nonce = instruction.nonce;
        let first = self.state.ledger.mark_executed(ExecutionRecord {
            proposal_id: id,
            executed: true,
            executed_at: current,
            executor,
            origin,
            nonce,
            digest,
        });
        debug_assert!(first, "proposal {id} executed twice");
        tracing::info!(
            proposal = id.get(),
            nonce = nonce.get(),
            %executor,
            digest = %digest.short(),
            "instruction executed"
        );
        self.events.emit(&RemoteEvent::InstructionExecuted {
            proposal: id,
            nonce,
            executor,
            digest,
        });
        Ok(Delivery::Executed)
    }

    // ── Views ──────────────────────────────────────────────────────────

    pub fn is_executed(&self, id: ProposalId) -> bool {
        self.state.ledger.is_executed(id)
    }

    pub fn execution(&self, id: ProposalId) -> Option<&ExecutionRecord> {
        self.state.ledger.execution(id)
    }

    pub fn pending(&self, id: ProposalId) -> Option<&PendingInstruction> {
        self.state.ledger.pending(id)
    }

    pub fn observed(&self, id: ProposalId) -> Option<&ObservedOutcome> {
        self.state.ledger.observed(id)
    }

    pub fn remote_proposal(&self, id: ProposalId) -> Option<RemoteProposal> {
        self.governor.proposal(id)
    }

    /// This executor's own receipt on the remote governor.
    pub fn remote_receipt(&self, id: ProposalId) -> Option<RemoteReceipt> {
        self.governor.receipt(id, &self.state.voter)
    }

    pub fn config(&self) -> &AuthorityConfig {
        &self.state.authority
    }

    pub fn governor_address(&self) -> Address {
        self.state.governor
    }

    pub fn chain_id(&self) -> ChainId {
        self.state.chain_id
    }

    // ── Administration ─────────────────────────────────────────────────

    pub fn propose_owner(&mut self, caller: &Address, new_owner: Address) -> Result<(), ExecutorError> {
        let event = self.state.authority.propose_owner(caller, new_owner)?;
        self.emit_admin(event);
        Ok(())
    }

    pub fn accept_owner(&mut self, caller: &Address) -> Result<(), ExecutorError> {
        let event = self.state.authority.accept_owner(caller)?;
        self.emit_admin(event);
        Ok(())
    }

    pub fn cancel_transfer(&mut self, caller: &Address) -> Result<(), ExecutorError> {
        let event = self.state.authority.cancel_transfer(caller)?;
        self.emit_admin(event);
        Ok(())
    }

    pub fn set_counterpart(&mut self, caller: &Address, counterpart: Counterpart) -> Result<(), ExecutorError> {
        let event = self.state.authority.set_counterpart(caller, counterpart)?;
        self.emit_admin(event);
        Ok(())
    }

    /// Re-point the remote governance address.
    pub fn set_governor(&mut self, caller: &Address, governor: Address) -> Result<(), ExecutorError> {
        self.state.authority.ensure_owner(caller)?;
        if governor.is_zero() {
            return Err(AuthorityError::ZeroAddress.into());
        }
        let old = self.state.governor;
        self.state.governor = governor;
        tracing::info!(%old, new = %governor, "remote governor updated");
        self.emit_admin(AdminEvent::GovernorUpdated { old, new: governor });
        Ok(())
    }

    pub fn pause(&mut self, caller: &Address) -> Result<(), ExecutorError> {
        let event = self.state.authority.pause(caller)?;
        self.emit_admin(event);
        Ok(())
    }

    pub fn unpause(&mut self, caller: &Address) -> Result<(), ExecutorError> {
        let event = self.state.authority.unpause(caller)?;
        self.emit_admin(event);
        Ok(())
    }

    fn emit_admin(&self, event: AdminEvent) {
        self.events.emit(&RemoteEvent::Admin(event));
    }
}
