use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::storage;
use super::outbox_models::{MutationKind, PendingMutation, QueuedMutation};

/// Durable pending-change queue kept on the client.
///
/// Entries are keyed by [`PendingMutation::key`]; enqueueing an existing key
/// replaces that entry in place. A failed write is returned to the caller and
/// leaves the queue as it was.
#[derive(Clone)]
pub struct Outbox {
    path: Arc<PathBuf>,
    entries: Arc<Mutex<Vec<QueuedMutation>>>,
}

impl Outbox {
    pub async fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries: Vec<QueuedMutation> = storage::load_json_records(&path).await;
        if !entries.is_empty() {
            tracing::info!("Outbox has {} pending mutations", entries.len());
        }

        Self {
            path: Arc::new(path),
            entries: Arc::new(Mutex::new(entries)),
        }
    }

    pub async fn enqueue(&self, mutation: PendingMutation) -> io::Result<String> {
        let queued = QueuedMutation::from(mutation);
        let key = queued.key.clone();

        let mut entries = self.entries.lock().await;
        let previous = entries.clone();
        match entries.iter_mut().find(|e| e.key == key) {
            Some(existing) => *existing = queued,
            None => entries.push(queued),
        }
        if let Err(e) = storage::write_json_atomic(&self.path, entries.as_slice()).await {
            *entries = previous;
            return Err(e);
        }

        tracing::debug!("Queued {} for sync", key);
        Ok(key)
    }

    pub async fn list_all(&self) -> Vec<QueuedMutation> {
        self.entries.lock().await.clone()
    }

    pub async fn list_kind(&self, kind: MutationKind) -> Vec<QueuedMutation> {
        self.entries
            .lock()
            .await
            .iter()
            .filter(|e| e.mutation.kind() == kind)
            .cloned()
            .collect()
    }

    /// Returns whether an entry was removed.
    pub async fn remove(&self, key: &str) -> io::Result<bool> {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|e| e.key != key);

        if entries.len() == before {
            return Ok(false);
        }
        storage::write_json_atomic(&self.path, entries.as_slice()).await?;
        Ok(true)
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
