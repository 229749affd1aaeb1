//! In-process relayer between the home and remote state machines.
//!
//! [`ChannelTransport`] is the home side's [`MessageTransport`]: every send
//! becomes an attested [`InboundMessage`] on an unbounded channel. The
//! [`Relayer`] drains that channel into a shared [`RemoteExecutor`]. Paused
//! deliveries are deferred and retried; everything else is settled by the
//! executor itself. Nothing is dropped: messages the relayer gives up on, or
//! still holds at shutdown, are handed back by [`Relayer::take_undelivered`].

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use bridge_executor::{Delivery, ExecutorError, RemoteExecutor, RemoteGovernor};
use bridge_messages::{InboundMessage, MessageTransport, TransportError};
use bridge_nullables::NullChain;
use bridge_types::{Address, BlockNumber, ChainId, ErrorClass};
use serde::Serialize;
use tokio::sync::{broadcast, mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::Instrument;

/// Source of the remote chain's current block height.
pub trait BlockSource: Send + Sync {
    fn current_block(&self) -> BlockNumber;
}

impl BlockSource for NullChain {
    fn current_block(&self) -> BlockNumber {
        self.current()
    }
}

/// Sending half of the in-process channel.
pub struct ChannelTransport {
    source_chain: ChainId,
    sender: Address,
    tx: mpsc::UnboundedSender<InboundMessage>,
}

impl ChannelTransport {
    /// Create the transport and the receiver the relayer drains.
    ///
    /// `source_chain` and `sender` are attested on every message.
    pub fn channel(
        source_chain: ChainId,
        sender: Address,
    ) -> (Self, mpsc::UnboundedReceiver<InboundMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                source_chain,
                sender,
                tx,
            },
            rx,
        )
    }
}

impl MessageTransport for ChannelTransport {
    fn send(
        &self,
        destination_chain: ChainId,
        destination: Address,
        payload: Vec<u8>,
    ) -> Result<(), TransportError> {
        tracing::debug!(
            destination_chain = destination_chain.get(),
            %destination,
            bytes = payload.len(),
            "instruction queued for relay"
        );
        self.tx
            .send(InboundMessage::new(self.source_chain, self.sender, payload))
            .map_err(|_| TransportError::Closed)
    }
}

/// Counters for what the relayer has done so far.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RelayStats {
    pub executed: u64,
    pub duplicates: u64,
    /// Authenticated but not executable (outcome was not Succeeded).
    pub observed: u64,
    /// Failed authentication or decoding; dropped.
    pub rejected: u64,
    /// Remote call failed; retained by the executor for manual replay.
    pub failed: u64,
    /// Currently waiting for the executor to be unpaused.
    pub deferred: u64,
    /// Deferred too many times; set aside for [`Relayer::take_undelivered`].
    pub abandoned: u64,
}

/// Final state of a stopped relayer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelayShutdown {
    pub stats: RelayStats,
    /// Messages never settled by the executor, oldest first.
    pub undelivered: Vec<InboundMessage>,
}

struct Deferred {
    message: InboundMessage,
    attempts: u32,
}

pub struct Relayer<G> {
    inbox: mpsc::UnboundedReceiver<InboundMessage>,
    executor: Arc<Mutex<RemoteExecutor<G>>>,
    blocks: Arc<dyn BlockSource>,
    deferred: VecDeque<Deferred>,
    abandoned: Vec<InboundMessage>,
    max_attempts: u32,
    stats: RelayStats,
}

impl<G> Relayer<G>
where
    G: RemoteGovernor + Send + 'static,
{
    pub fn new(
        inbox: mpsc::UnboundedReceiver<InboundMessage>,
        executor: Arc<Mutex<RemoteExecutor<G>>>,
        blocks: Arc<dyn BlockSource>,
        max_attempts: u32,
    ) -> Self {
        Self {
            inbox,
            executor,
            blocks,
            deferred: VecDeque::new(),
            abandoned: Vec::new(),
            max_attempts,
            stats: RelayStats::default(),
        }
    }

    pub fn stats(&self) -> RelayStats {
        RelayStats {
            deferred: self.deferred.len() as u64,
            ..self.stats
        }
    }

    /// Deliver everything currently queued, retrying deferred messages first.
    pub async fn drain(&mut self) -> RelayStats {
        let span = bridge_utils::spans::relay_drain_span(self.deferred.len());
        async {
            self.retry_deferred().await;
            while let Ok(message) = self.inbox.try_recv() {
                self.deliver(message, 1).await;
            }
        }
        .instrument(span)
        .await;
        self.stats()
    }

    /// Hand back every message not yet settled: abandoned deliveries, then
    /// deferred ones, then whatever is still queued on the inbox.
    ///
    /// The caller can replay them with `ManualProof::Attested`.
    pub fn take_undelivered(&mut self) -> Vec<InboundMessage> {
        let mut undelivered = std::mem::take(&mut self.abandoned);
        undelivered.extend(self.deferred.drain(..).map(|d| d.message));
        while let Ok(message) = self.inbox.try_recv() {
            undelivered.push(message);
        }
        undelivered
    }

    /// Retry every deferred delivery once.
    pub async fn retry_deferred(&mut self) {
        let batch: Vec<_> = self.deferred.drain(..).collect();
        for item in batch {
            self.deliver(item.message, item.attempts + 1).await;
        }
    }

    async fn deliver(&mut self, message: InboundMessage, attempt: u32) {
        let span = bridge_utils::spans::deliver_span(message.source_chain.get(), attempt);
        let result = {
            let mut executor = self.executor.lock().await;
            let current = self.blocks.current_block();
            span.in_scope(|| executor.on_instruction_received(&message, current))
        };
        match result {
            Ok(Delivery::Executed) => self.stats.executed += 1,
            Ok(Delivery::AlreadyExecuted) => self.stats.duplicates += 1,
            Err(e) if e.is_paused() => {
                if attempt >= self.max_attempts {
                    tracing::warn!(attempt, "delivery set aside after repeated pauses");
                    self.stats.abandoned += 1;
                    self.abandoned.push(message);
                } else {
                    tracing::info!(attempt, "executor paused, delivery deferred");
                    self.deferred.push_back(Deferred {
                        message,
                        attempts: attempt,
                    });
                }
            }
            Err(ExecutorError::NotSucceeded { proposal, outcome }) => {
                tracing::info!(proposal = proposal.get(), %outcome, "outcome observed, nothing to execute");
                self.stats.observed += 1;
            }
            Err(e) if e.class() == ErrorClass::Execution => {
                tracing::warn!("remote execution failed: {e}");
                self.stats.failed += 1;
            }
            Err(e) => {
                tracing::warn!(class = e.class().as_str(), "delivery rejected: {e}");
                self.stats.rejected += 1;
            }
        }
    }

    /// Run until shutdown is signalled or every sender is gone.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>, retry_every: Duration) -> RelayShutdown {
        let mut ticker = tokio::time::interval(retry_every);
        loop {
            tokio::select! {
                message = self.inbox.recv() => match message {
                    Some(message) => self.deliver(message, 1).await,
                    None => break,
                },
                _ = ticker.tick() => {
                    if !self.deferred.is_empty() {
                        self.retry_deferred().await;
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("relayer shutting down");
                    break;
                }
            }
        }
        let stats = self.stats();
        let undelivered = self.take_undelivered();
        if undelivered.is_empty() {
            tracing::info!(?stats, "relayer stopped");
        } else {
            tracing::warn!(?stats, undelivered = undelivered.len(), "relayer stopped with undelivered messages");
        }
        RelayShutdown { stats, undelivered }
    }

    /// Spawn [`Relayer::run`] on the current runtime.
    pub fn spawn(self, retry_every: Duration) -> RelayerHandle {
        let (shutdown, rx) = broadcast::channel(1);
        let join = tokio::spawn(self.run(rx, retry_every));
        RelayerHandle { shutdown, join }
    }
}

pub struct RelayerHandle {
    shutdown: broadcast::Sender<()>,
    join: JoinHandle<RelayShutdown>,
}

impl RelayerHandle {
    /// Signal shutdown and wait for the final counters and leftovers.
    pub async fn stop(self) -> Result<RelayShutdown, crate::NodeError> {
        let _ = self.shutdown.send(());
        self.join.await.map_err(|_| crate::NodeError::RelayerStopped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_authority::{AuthorityConfig, Counterpart};
    use bridge_executor::{ManualProof, RemoteState};
    use bridge_messages::RelayInstruction;
    use bridge_nullables::NullGovernor;
    use bridge_types::{Nonce, Outcome, ProposalId, Tally};

    const HOME: u64 = 8453;

    fn home_address() -> Address {
        Address::from_low_u64(10)
    }

    fn owner() -> Address {
        Address::from_low_u64(1)
    }

    fn setup() -> (
        ChannelTransport,
        Relayer<NullGovernor>,
        Arc<Mutex<RemoteExecutor<NullGovernor>>>,
    ) {
        let (transport, rx) = ChannelTransport::channel(ChainId::new(HOME), home_address());
        let authority = AuthorityConfig::new(
            owner(),
            Counterpart::new(ChainId::new(HOME), home_address()),
            10_000,
        )
        .unwrap();
        let voter = Address::from_low_u64(20);
        let state = RemoteState::new(ChainId::new(1), authority, Address::from_low_u64(30), voter);
        let executor = Arc::new(Mutex::new(RemoteExecutor::new(state, NullGovernor::new(voter))));
        let relayer = Relayer::new(rx, Arc::clone(&executor), Arc::new(NullChain::new(7)), 3);
        (transport, relayer, executor)
    }

    fn payload(id: u64, outcome: Outcome) -> Vec<u8> {
        RelayInstruction {
            source_chain: ChainId::new(HOME),
            proposal_id: ProposalId::new(id),
            outcome,
            tally: Tally::new(1, 0, 0),
            nonce: Nonce::new(id),
            finalized_at: BlockNumber::new(3),
        }
        .encode()
        .unwrap()
    }

    fn send(transport: &ChannelTransport, payload: Vec<u8>) {
        transport
            .send(ChainId::new(1), Address::from_low_u64(20), payload)
            .unwrap();
    }

    #[tokio::test]
    async fn duplicates_are_counted_not_executed() {
        let (transport, mut relayer, executor) = setup();
        send(&transport, payload(1, Outcome::Succeeded));
        send(&transport, payload(1, Outcome::Succeeded));
        send(&transport, payload(2, Outcome::Defeated));

        let stats = relayer.drain().await;
        assert_eq!(stats.executed, 1);
        assert_eq!(stats.duplicates, 1);
        assert_eq!(stats.observed, 1);
        let executor = executor.lock().await;
        assert_eq!(executor.governor().votes().len(), 1);
        assert_eq!(
            executor.execution(ProposalId::new(1)).unwrap().executed_at,
            BlockNumber::new(7)
        );
    }

    #[tokio::test]
    async fn paused_deliveries_wait_for_unpause() {
        let (transport, mut relayer, executor) = setup();
        executor.lock().await.pause(&owner()).unwrap();
        send(&transport, payload(1, Outcome::Succeeded));

        let stats = relayer.drain().await;
        assert_eq!(stats.deferred, 1);
        assert_eq!(stats.executed, 0);

        executor.lock().await.unpause(&owner()).unwrap();
        let stats = relayer.drain().await;
        assert_eq!(stats.deferred, 0);
        assert_eq!(stats.executed, 1);
    }

    #[tokio::test]
    async fn deferral_gives_up_after_max_attempts() {
        let (transport, mut relayer, executor) = setup();
        executor.lock().await.pause(&owner()).unwrap();
        send(&transport, payload(1, Outcome::Succeeded));

        for _ in 0..3 {
            relayer.drain().await;
        }
        let stats = relayer.stats();
        assert_eq!(stats.deferred, 0);
        assert_eq!(stats.abandoned, 1);

        // The payload is handed back, not lost, and can still be executed.
        let undelivered = relayer.take_undelivered();
        assert_eq!(undelivered.len(), 1);
        assert!(relayer.take_undelivered().is_empty());

        let mut executor = executor.lock().await;
        executor.unpause(&owner()).unwrap();
        assert!(matches!(
            executor.execute_manually(&owner(), ProposalId::new(1), ManualProof::Retained, BlockNumber::new(8)),
            Err(ExecutorError::NoPendingInstruction(_))
        ));
        let message = undelivered.into_iter().next().unwrap();
        assert_eq!(
            executor
                .execute_manually(&owner(), ProposalId::new(1), ManualProof::Attested(message), BlockNumber::new(8))
                .unwrap(),
            Delivery::Executed
        );
        assert_eq!(executor.governor().vote_count(ProposalId::new(1)), 1);
    }

    #[tokio::test]
    async fn shutdown_hands_back_deferred_messages() {
        let (transport, relayer, executor) = setup();
        executor.lock().await.pause(&owner()).unwrap();
        let handle = relayer.spawn(Duration::from_secs(60));
        send(&transport, payload(1, Outcome::Succeeded));
        send(&transport, payload(2, Outcome::Succeeded));

        let shutdown = handle.stop().await.unwrap();
        assert_eq!(shutdown.stats.executed, 0);
        assert_eq!(shutdown.undelivered.len(), 2);
        assert!(!executor.lock().await.is_executed(ProposalId::new(1)));
    }

    #[tokio::test]
    async fn remote_failure_is_left_to_the_executor() {
        let (transport, mut relayer, executor) = setup();
        executor.lock().await.governor().fail_next(1);
        send(&transport, payload(1, Outcome::Succeeded));

        let stats = relayer.drain().await;
        assert_eq!(stats.failed, 1);
        assert!(executor.lock().await.pending(ProposalId::new(1)).is_some());
    }

    #[tokio::test]
    async fn spawned_relayer_stops_on_signal() {
        let (transport, relayer, executor) = setup();
        let handle = relayer.spawn(Duration::from_millis(10));
        send(&transport, payload(1, Outcome::Succeeded));

        for _ in 0..100 {
            if executor.lock().await.is_executed(ProposalId::new(1)) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        let shutdown = handle.stop().await.unwrap();
        assert_eq!(shutdown.stats.executed, 1);
        assert!(shutdown.undelivered.is_empty());
    }

    #[tokio::test]
    async fn closed_channel_is_a_transport_error() {
        let (transport, relayer, _executor) = setup();
        drop(relayer);
        assert_eq!(
            transport.send(ChainId::new(1), Address::from_low_u64(20), vec![1]),
            Err(TransportError::Closed)
        );
    }
}
