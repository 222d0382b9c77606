use axum::{
    extract::{Path, State},
    Json,
};

use crate::{error::Result, notification::ItemAlert, state::AppState};
use super::{
    item_dto::{ActionResponse, AddItemRequest},
    item_models::Item,
};

/// Get every item in the fridge
#[utoipa::path(
    get,
    path = "/getData",
    responses(
        (status = 200, description = "All stored items", body = Vec<Item>)
    ),
    tag = "items"
)]
pub async fn get_items(State(state): State<AppState>) -> Json<Vec<Item>> {
    Json(state.item_service.list_items().await)
}

/// Add an item to the fridge
#[utoipa::path(
    post,
    path = "/add",
    request_body = AddItemRequest,
    responses(
        (status = 200, description = "Item added", body = ActionResponse),
        (status = 400, description = "Invalid name or expiration date", body = ActionResponse),
        (status = 409, description = "Name already in use", body = ActionResponse)
    ),
    tag = "items"
)]
pub async fn add_item(
    State(state): State<AppState>,
    Json(payload): Json<AddItemRequest>,
) -> Result<Json<ActionResponse>> {
    let item = state.item_service.add_item(payload).await?;
    tracing::debug!("Added item {} expiring {}", item.name, item.exp_date);

    let notifier = state.notification_service.clone();
    tokio::spawn(async move {
        notifier.notify_item(ItemAlert::Added, &item.name).await;
    });

    Ok(Json(ActionResponse::ok("Item added successfully")))
}

/// Delete an item by name
#[utoipa::path(
    delete,
    path = "/delete/{name}",
    params(
        ("name" = String, Path, description = "Item name")
    ),
    responses(
        (status = 200, description = "Item deleted", body = ActionResponse),
        (status = 404, description = "Item not found", body = ActionResponse)
    ),
    tag = "items"
)]
pub async fn delete_item(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ActionResponse>> {
    state.item_service.remove_item(&name).await?;
    tracing::debug!("Deleted item {}", name);

    Ok(Json(ActionResponse::ok("Item deleted successfully")))
}
