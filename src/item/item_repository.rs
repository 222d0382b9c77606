use crate::error::{AppError, Result};
use crate::storage;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::item_models::Item;

/// In-memory item collection mirrored to a JSON file.
///
/// Every mutation rewrites the whole file while the collection lock is held,
/// so successive rewrites land in mutation order.
#[derive(Clone)]
pub struct ItemRepository {
    path: Arc<PathBuf>,
    items: Arc<Mutex<Vec<Item>>>,
}

impl ItemRepository {
    /// Open the store at `path`, loading whatever it already holds.
    pub async fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let items: Vec<Item> = storage::load_json_records(&path).await;
        tracing::info!("Loaded {} items from {}", items.len(), path.display());

        Self {
            path: Arc::new(path),
            items: Arc::new(Mutex::new(items)),
        }
    }

    pub async fn find_all(&self) -> Vec<Item> {
        self.items.lock().await.clone()
    }

    pub async fn find_by_name(&self, name: &str) -> Option<Item> {
        self.items
            .lock()
            .await
            .iter()
            .find(|item| item.name == name)
            .cloned()
    }

    pub async fn create(&self, item: Item) -> Result<Item> {
        let mut items = self.items.lock().await;

        if items.iter().any(|existing| existing.name == item.name) {
            return Err(AppError::Conflict("Name must be unique".to_string()));
        }

        items.push(item.clone());
        self.persist(&items).await;

        Ok(item)
    }

    /// Returns the number of removed items, 0 or 1.
    pub async fn delete(&self, name: &str) -> u64 {
        let mut items = self.items.lock().await;

        let Some(index) = items.iter().position(|item| item.name == name) else {
            return 0;
        };

        items.remove(index);
        self.persist(&items).await;

        1
    }

    // A failed write is logged only; memory keeps the mutation.
    async fn persist(&self, items: &[Item]) {
        if let Err(e) = storage::write_json_atomic(&self.path, items).await {
            tracing::error!("Error writing items to {}: {}", self.path.display(), e);
        }
    }
}
