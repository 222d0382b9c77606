//! Client side of offline sync: a durable outbox of pending mutations and
//! the machinery that replays it once the server is reachable again.

pub mod outbox_models;
pub mod outbox_store;
pub mod inventory_client;
pub mod sync_coordinator;
pub mod background_sync;
pub mod gateway;

pub use outbox_models::{MutationKind, PendingMutation, QueuedMutation, SyncTag};
pub use outbox_store::Outbox;
pub use inventory_client::{ClientError, InventoryClient};
pub use sync_coordinator::{classify, ReplayOutcome, SyncCoordinator, SyncReport};
pub use background_sync::BackgroundSync;
pub use gateway::{MutationGateway, Submission};
