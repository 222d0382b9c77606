use futures::future::join_all;
use reqwest::StatusCode;
use tracing::{debug, info, warn};

use super::inventory_client::InventoryClient;
use super::outbox_models::{MutationKind, PendingMutation, QueuedMutation};
use super::outbox_store::Outbox;

/// What replaying one queued mutation amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayOutcome {
    Applied,
    /// The server already reflects the change (409 on add, 404 on delete).
    AlreadyApplied,
    /// Not terminal; the entry stays queued.
    Retained,
}

impl ReplayOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ReplayOutcome::Retained)
    }
}

/// Map a server response status to a replay outcome.
pub fn classify(kind: MutationKind, status: StatusCode) -> ReplayOutcome {
    if status.is_success() {
        return ReplayOutcome::Applied;
    }
    match (kind, status) {
        (MutationKind::Add, StatusCode::CONFLICT) => ReplayOutcome::AlreadyApplied,
        (MutationKind::Delete, StatusCode::NOT_FOUND) => ReplayOutcome::AlreadyApplied,
        _ => ReplayOutcome::Retained,
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    pub applied: usize,
    pub already_applied: usize,
    pub retained: usize,
}

impl SyncReport {
    fn record(&mut self, outcome: ReplayOutcome) {
        match outcome {
            ReplayOutcome::Applied => self.applied += 1,
            ReplayOutcome::AlreadyApplied => self.already_applied += 1,
            ReplayOutcome::Retained => self.retained += 1,
        }
    }
}

/// Replays the outbox against the server.
///
/// Entries are replayed concurrently so one stalled request does not hold
/// up the rest. There is no backoff or retry cap: a retained entry waits
/// for the next drain.
#[derive(Clone)]
pub struct SyncCoordinator {
    outbox: Outbox,
    client: InventoryClient,
}

impl SyncCoordinator {
    pub fn new(outbox: Outbox, client: InventoryClient) -> Self {
        Self { outbox, client }
    }

    pub fn outbox(&self) -> &Outbox {
        &self.outbox
    }

    /// Replay every queued mutation of `kind`.
    pub async fn drain(&self, kind: MutationKind) -> SyncReport {
        let entries = self.outbox.list_kind(kind).await;
        self.replay_all(entries).await
    }

    pub async fn drain_all(&self) -> SyncReport {
        let entries = self.outbox.list_all().await;
        self.replay_all(entries).await
    }

    async fn replay_all(&self, entries: Vec<QueuedMutation>) -> SyncReport {
        if entries.is_empty() {
            return SyncReport::default();
        }
        debug!("Replaying {} queued mutations", entries.len());

        let outcomes = join_all(entries.iter().map(|entry| self.replay(entry))).await;

        let mut report = SyncReport::default();
        for outcome in outcomes {
            report.record(outcome);
        }

        info!(
            "Sync finished: {} applied, {} already applied, {} retained",
            report.applied, report.already_applied, report.retained
        );
        report
    }

    async fn replay(&self, entry: &QueuedMutation) -> ReplayOutcome {
        let kind = entry.mutation.kind();
        let sent = match &entry.mutation {
            PendingMutation::Add { item } => self.client.send_add(item).await,
            PendingMutation::Delete { name } => self.client.send_delete(name).await,
        };

        let outcome = match sent {
            Ok(response) => classify(kind, response.status()),
            Err(e) => {
                warn!("Replay of {} failed: {}", entry.key, e);
                ReplayOutcome::Retained
            }
        };

        if outcome.is_terminal() {
            if let Err(e) = self.outbox.remove(&entry.key).await {
                warn!("Could not drop {} from outbox: {}", entry.key, e);
            }
        }

        debug!("Replayed {}: {:?}", entry.key, outcome);
        outcome
    }
}
