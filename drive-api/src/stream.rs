use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Extension, Router,
};
use futures_util::{Stream, StreamExt};
use tokio_stream::wrappers::BroadcastStream;

use crate::auth::Claims;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/notifications/stream", get(notification_stream))
}

/// Live notifications for the signed-in user, delivered as SSE.
///
/// Subscription lives entirely outside the ledger's atomic operations;
/// closing the connection drops the receiver and cancels it.
async fn notification_stream(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let rx = state.notifier.subscribe();
    let user_id = claims.sub;

    let stream = BroadcastStream::new(rx).filter_map(move |result| {
        let user_id = user_id.clone();
        async move {
            match result {
                Ok(notification) if notification.recipient_id == user_id => {
                    serde_json::to_string(&notification).ok().map(|payload| {
                        Ok::<_, axum::Error>(
                            Event::default().event("notification").data(payload),
                        )
                    })
                }
                // Lagged receivers and other users' messages are skipped.
                _ => None,
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
