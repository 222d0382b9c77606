use crate::error::{AppError, Result};
use crate::item::item_dto::AddItemRequest;
use crate::item::item_models::{ExpirationDate, Item};
use crate::item::item_repository::ItemRepository;
use validator::Validate;

/// Service layer for item-related business logic.
#[derive(Clone)]
pub struct ItemService {
    repo: ItemRepository,
}

impl ItemService {
    pub fn new(repo: ItemRepository) -> Self {
        Self { repo }
    }

    pub async fn list_items(&self) -> Vec<Item> {
        self.repo.find_all().await
    }

    pub async fn add_item(&self, payload: AddItemRequest) -> Result<Item> {
        payload.validate()?;

        let exp_date = ExpirationDate::parse(&payload.exp_date)
            .map_err(|e| AppError::Validation(e.to_string()))?;

        self.repo.create(Item::new(payload.name, exp_date)).await
    }

    pub async fn remove_item(&self, name: &str) -> Result<()> {
        if self.repo.delete(name).await == 0 {
            return Err(AppError::NotFound("Item not found".into()));
        }
        Ok(())
    }
}
