use crate::{
    item::{self, ActionResponse, AddItemRequest, Item},
    notification::{self, PushMessage},
    state::AppState,
    subscription::{self, PushSubscription, SubscriptionKeys},
    upc,
};
use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        item::item_handlers::get_items,
        item::item_handlers::add_item,
        item::item_handlers::delete_item,
        upc::upc_handlers::lookup_product,
        subscription::subscription_handlers::subscribe,
        notification::notification_handlers::notification_stream,
    ),
    components(
        schemas(
            Item,
            AddItemRequest,
            ActionResponse,
            PushSubscription,
            SubscriptionKeys,
            PushMessage,
        )
    ),
    tags(
        (name = "items", description = "Fridge inventory endpoints"),
        (name = "upc", description = "Barcode lookup proxy"),
        (name = "notifications", description = "Push subscription and notification endpoints")
    )
)]
struct ApiDoc;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/getData", get(item::get_items))
        .route("/add", post(item::add_item))
        .route("/delete/:name", delete(item::delete_item))
        .route("/proxy/:id", get(upc::lookup_product))
        .route("/subscribe", post(subscription::subscribe))
        .route("/notifications/stream", get(notification::notification_stream))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ActionResponse {
            success: false,
            message: "Not found".to_string(),
        }),
    )
}
