use std::sync::Arc;
use tokio::sync::{watch, Mutex, Notify};
use tracing::{debug, info};

use super::outbox_models::SyncTag;
use super::sync_coordinator::SyncCoordinator;

#[derive(Default)]
struct Registrations {
    // registration order
    tags: Mutex<Vec<SyncTag>>,
    wake: Notify,
}

/// Deferred replay requests, fired once the device is online.
///
/// Registrations fire in the order they were made, and each fires at most
/// once. If a drain leaves entries behind, that tag and every tag after it
/// stay registered until the next connectivity change. A registration
/// revoked before it fires replays nothing.
#[derive(Clone, Default)]
pub struct BackgroundSync {
    inner: Arc<Registrations>,
}

impl BackgroundSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, tag: SyncTag) {
        let mut tags = self.inner.tags.lock().await;
        if !tags.contains(&tag) {
            tags.push(tag);
        }
        drop(tags);
        self.inner.wake.notify_one();
        debug!("Registered background sync '{}'", tag.as_str());
    }

    /// Returns whether the tag was pending.
    pub async fn unregister(&self, tag: SyncTag) -> bool {
        let mut tags = self.inner.tags.lock().await;
        let before = tags.len();
        tags.retain(|t| *t != tag);
        tags.len() != before
    }

    pub async fn is_registered(&self, tag: SyncTag) -> bool {
        self.inner.tags.lock().await.contains(&tag)
    }

    async fn take_all(&self) -> Vec<SyncTag> {
        std::mem::take(&mut *self.inner.tags.lock().await)
    }

    // Put unfired tags back ahead of anything registered meanwhile.
    async fn requeue(&self, unfired: impl Iterator<Item = SyncTag>) {
        let mut tags = self.inner.tags.lock().await;
        let mut restored: Vec<SyncTag> = unfired.collect();
        let later: Vec<SyncTag> = tags
            .iter()
            .copied()
            .filter(|t| !restored.contains(t))
            .collect();
        restored.extend(later);
        *tags = restored;
    }

    /// Drive registrations until the connectivity sender is dropped.
    pub async fn run(self, coordinator: SyncCoordinator, mut online: watch::Receiver<bool>) {
        info!("Background sync started");

        loop {
            if self.inner.tags.lock().await.is_empty() {
                tokio::select! {
                    _ = self.inner.wake.notified() => {}
                    changed = online.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }
                continue;
            }

            if !*online.borrow_and_update() {
                if online.changed().await.is_err() {
                    break;
                }
                continue;
            }

            let mut pending = self.take_all().await.into_iter();
            let mut retry = false;
            while let Some(tag) = pending.next() {
                info!("Background sync '{}' fired", tag.as_str());
                let report = coordinator.drain(tag.kind()).await;
                if report.retained > 0 {
                    self.requeue(std::iter::once(tag).chain(pending)).await;
                    retry = true;
                    break;
                }
            }

            if retry && online.changed().await.is_err() {
                break;
            }
        }

        info!("Background sync stopped");
    }
}
