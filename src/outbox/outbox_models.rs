use serde::{Deserialize, Serialize};
use std::fmt;

use crate::item::AddItemRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Add,
    Delete,
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationKind::Add => write!(f, "add"),
            MutationKind::Delete => write!(f, "delete"),
        }
    }
}

/// A change made while offline, waiting to be replayed against the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PendingMutation {
    Add {
        #[serde(rename = "newItem")]
        item: AddItemRequest,
    },
    Delete {
        #[serde(rename = "itemName")]
        name: String,
    },
}

impl PendingMutation {
    pub fn add(name: impl Into<String>, exp_date: impl Into<String>) -> Self {
        PendingMutation::Add {
            item: AddItemRequest {
                name: name.into(),
                exp_date: exp_date.into(),
            },
        }
    }

    pub fn delete(name: impl Into<String>) -> Self {
        PendingMutation::Delete { name: name.into() }
    }

    pub fn kind(&self) -> MutationKind {
        match self {
            PendingMutation::Add { .. } => MutationKind::Add,
            PendingMutation::Delete { .. } => MutationKind::Delete,
        }
    }

    pub fn item_name(&self) -> &str {
        match self {
            PendingMutation::Add { item } => &item.name,
            PendingMutation::Delete { name } => name,
        }
    }

    /// Outbox key, e.g. `add-Milk`.
    pub fn key(&self) -> String {
        format!("{}-{}", self.kind(), self.item_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedMutation {
    pub key: String,
    #[serde(flatten)]
    pub mutation: PendingMutation,
}

impl From<PendingMutation> for QueuedMutation {
    fn from(mutation: PendingMutation) -> Self {
        Self {
            key: mutation.key(),
            mutation,
        }
    }
}

/// Deferred replay registrations, one per mutation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncTag {
    NewItems,
    DeleteItems,
}

impl SyncTag {
    pub fn for_kind(kind: MutationKind) -> Self {
        match kind {
            MutationKind::Add => SyncTag::NewItems,
            MutationKind::Delete => SyncTag::DeleteItems,
        }
    }

    pub fn kind(&self) -> MutationKind {
        match self {
            SyncTag::NewItems => MutationKind::Add,
            SyncTag::DeleteItems => MutationKind::Delete,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SyncTag::NewItems => "sync-new-items",
            SyncTag::DeleteItems => "sync-delete-items",
        }
    }
}
