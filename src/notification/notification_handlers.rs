use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::Stream;
use std::convert::Infallible;
use tokio_stream::{wrappers::BroadcastStream, StreamExt};

use crate::state::AppState;

/// Live feed of every push message the server broadcasts (SSE)
#[utoipa::path(
    get,
    path = "/notifications/stream",
    responses(
        (status = 200, description = "SSE stream of push messages")
    ),
    tag = "notifications"
)]
pub async fn notification_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let rx = state.notification_tx.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(message) => {
            let json = serde_json::to_string(&message).ok()?;
            Some(Ok(Event::default().event("push").data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
