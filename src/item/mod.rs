pub mod item_models;
pub mod item_dto;
pub mod item_repository;
pub mod item_handlers;
pub mod item_service;

pub use item_models::{ExpirationDate, Item};
pub use item_dto::{ActionResponse, AddItemRequest};
pub use item_repository::ItemRepository;
pub use item_handlers::{add_item, delete_item, get_items};
pub use item_service::ItemService;
