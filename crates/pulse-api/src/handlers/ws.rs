//! WebSocket upgrade handler for the live toast stream.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};
use uuid::Uuid;

use pulse_realtime::LiveSession;

use crate::state::AppState;

/// Query parameters for the WebSocket upgrade.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WsQuery {
    /// Tenant whose insertion events this session consumes.
    pub business_id: Uuid,
}

/// Lifecycle messages the client sends back over the socket.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum ClientMessage {
    /// The user explicitly dismissed a toast.
    Dismiss {
        #[serde(rename = "notificationId")]
        notification_id: Uuid,
    },
    /// A toast's auto-dismiss timer fired.
    Expired {
        #[serde(rename = "notificationId")]
        notification_id: Uuid,
    },
}

/// GET /ws?businessId={uuid} — WebSocket upgrade
pub async fn ws_upgrade(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
) -> Response {
    ws.on_upgrade(move |socket| handle_ws_connection(state, query.business_id, socket))
}

/// Handles an established WebSocket connection.
///
/// One feed subscription and one live session per socket; the session owns
/// the dedup sets and the mark-read lifecycle, this loop only moves bytes.
async fn handle_ws_connection(state: AppState, business_id: Uuid, socket: WebSocket) {
    let mut feed_rx = state.feed.subscribe(business_id);
    let mut session = LiveSession::new(
        business_id,
        Arc::clone(&state.store),
        &state.config.realtime,
    );
    let (mut ws_tx, mut ws_rx) = socket.split();

    info!(business_id = %business_id, "WebSocket connection established");

    loop {
        tokio::select! {
            event = feed_rx.recv() => match event {
                Ok(event) => {
                    let Some(toast) = session.handle_event(&event).await else {
                        continue;
                    };
                    match serde_json::to_string(&toast) {
                        Ok(text) => {
                            if ws_tx.send(Message::Text(text.into())).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            error!(error = %e, "failed to serialize toast");
                        }
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(business_id = %business_id, skipped, "feed receiver lagged");
                }
                Err(RecvError::Closed) => break,
            },
            msg = ws_rx.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<ClientMessage>(&text) {
                        Ok(ClientMessage::Dismiss { notification_id }) => {
                            session.dismiss(notification_id).await;
                        }
                        Ok(ClientMessage::Expired { notification_id }) => {
                            session.toast_expired(notification_id).await;
                        }
                        Err(e) => {
                            warn!(error = %e, "unrecognized client message");
                        }
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(business_id = %business_id, error = %e, "WebSocket error");
                    break;
                }
            }
        }
    }

    drop(feed_rx);
    state.feed.prune(business_id);
    info!(business_id = %business_id, "WebSocket connection closed");
}
