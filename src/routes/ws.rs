//! WebSocket handler: realtime ad feed.
//!
//! DESIGN
//! ======
//! The feed is one-way. On upgrade the connection subscribes to the ad event
//! channel and sends a `snapshot` of the current list, then forwards every
//! `created` / `deleted` event as a JSON text message. Inbound messages are
//! ignored apart from close.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → subscribe + send `snapshot`
//! 2. Event published → forward to client
//! 3. Feed lagged behind the channel → send a fresh `snapshot`
//! 4. Close, send failure, or channel closed → drop the subscription

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use uuid::Uuid;

use crate::services::ads::{self, AdEvent};
use crate::state::AppState;

/// `GET /api/ws`: open the realtime feed. No auth; the feed is public.
pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state))
}

async fn run_ws(mut socket: WebSocket, state: AppState) {
    let client_id = Uuid::new_v4();
    let (ads, mut events) = ads::subscribe(&state).await;

    if send_event(&mut socket, &AdEvent::Snapshot { ads }).await.is_err() {
        return;
    }
    info!(%client_id, "ws: feed opened");

    loop {
        tokio::select! {
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_)) | Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
            event = events.recv() => {
                let event = match event {
                    Ok(event) => event,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(%client_id, skipped, "ws: feed lagged; resending snapshot");
                        AdEvent::Snapshot { ads: ads::list_ads(&state).await }
                    }
                    Err(RecvError::Closed) => break,
                };
                if send_event(&mut socket, &event).await.is_err() {
                    break;
                }
            }
        }
    }

    info!(%client_id, "ws: feed closed");
}

async fn send_event(socket: &mut WebSocket, event: &AdEvent) -> Result<(), axum::Error> {
    let text = match serde_json::to_string(event) {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "ws: event serialization failed");
            return Ok(());
        }
    };
    socket.send(Message::Text(text.into())).await
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
