use crate::storage;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::subscription_models::PushSubscription;

/// Append-only registry of push subscriptions backed by a JSON file.
///
/// Subscriptions are never deduplicated or pruned; a device that subscribes
/// twice is notified twice.
#[derive(Clone)]
pub struct SubscriptionRepository {
    path: Arc<PathBuf>,
    subscriptions: Arc<Mutex<Vec<PushSubscription>>>,
}

impl SubscriptionRepository {
    pub async fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let subscriptions: Vec<PushSubscription> = storage::load_json_records(&path).await;
        tracing::info!(
            "Loaded {} push subscriptions from {}",
            subscriptions.len(),
            path.display()
        );

        Self {
            path: Arc::new(path),
            subscriptions: Arc::new(Mutex::new(subscriptions)),
        }
    }

    pub async fn find_all(&self) -> Vec<PushSubscription> {
        self.subscriptions.lock().await.clone()
    }

    pub async fn append(&self, subscription: PushSubscription) {
        let mut subscriptions = self.subscriptions.lock().await;
        subscriptions.push(subscription);

        if let Err(e) = storage::write_json_atomic(&self.path, subscriptions.as_slice()).await {
            tracing::error!("Error writing subscriptions to file: {}", e);
        }
    }
}
