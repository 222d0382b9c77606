use tokio::sync::watch;

use crate::item::{ActionResponse, AddItemRequest};
use super::background_sync::BackgroundSync;
use super::inventory_client::{ClientError, InventoryClient};
use super::outbox_models::{PendingMutation, SyncTag};
use super::outbox_store::Outbox;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// The server answered directly.
    Applied(ActionResponse),
    /// Stored in the outbox for replay; holds the outbox key.
    Queued(String),
}

/// Entry point for UI-driven mutations.
///
/// Online mutations go straight to the server. Offline ones are written to
/// the outbox and a background sync is registered for their kind.
#[derive(Clone)]
pub struct MutationGateway {
    client: InventoryClient,
    outbox: Outbox,
    sync: BackgroundSync,
    online: watch::Receiver<bool>,
}

impl MutationGateway {
    pub fn new(
        client: InventoryClient,
        outbox: Outbox,
        sync: BackgroundSync,
        online: watch::Receiver<bool>,
    ) -> Self {
        Self {
            client,
            outbox,
            sync,
            online,
        }
    }

    pub async fn add_item(&self, item: AddItemRequest) -> Result<Submission, ClientError> {
        self.submit(PendingMutation::Add { item }).await
    }

    pub async fn delete_item(&self, name: &str) -> Result<Submission, ClientError> {
        self.submit(PendingMutation::delete(name)).await
    }

    async fn submit(&self, mutation: PendingMutation) -> Result<Submission, ClientError> {
        if *self.online.borrow() {
            let response = match &mutation {
                PendingMutation::Add { item } => self.client.add_item(item).await?,
                PendingMutation::Delete { name } => self.client.delete_item(name).await?,
            };
            return Ok(Submission::Applied(response));
        }

        let tag = SyncTag::for_kind(mutation.kind());
        let key = self.outbox.enqueue(mutation).await?;
        self.sync.register(tag).await;

        Ok(Submission::Queued(key))
    }
}
