use axum::{extract::State, Json};

use crate::{item::ActionResponse, state::AppState};
use super::subscription_models::PushSubscription;

/// Register a device for push notifications
#[utoipa::path(
    post,
    path = "/subscribe",
    request_body = PushSubscription,
    responses(
        (status = 200, description = "Subscription stored", body = ActionResponse)
    ),
    tag = "notifications"
)]
pub async fn subscribe(
    State(state): State<AppState>,
    Json(subscription): Json<PushSubscription>,
) -> Json<ActionResponse> {
    tracing::info!("New push subscription for {}", subscription.endpoint);
    state.subscription_repository.append(subscription).await;

    Json(ActionResponse::ok("Subscription added successfully"))
}
