//! `/ws/telemetry`: WebSocket sessions fed by the broadcast loop.
//!
//! A session registers with the subscriber set, forwards every frame it
//! receives to the socket, and ends on the first failed write or when the
//! client closes. Inbound frames are only read to notice the disconnect.

use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::State,
    response::Response,
    routing::get,
    Router,
};
use tracing::{debug, info};

use crate::AppState;

// ---

pub fn router() -> Router<AppState> {
    Router::new().route("/ws/telemetry", get(upgrade))
}

async fn upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| session(socket, state))
}

async fn session(mut socket: WebSocket, state: AppState) {
    // ---
    let mut subscription = state.subscribers.register();
    let id = subscription.id();

    loop {
        tokio::select! {
            frame = subscription.recv() => {
                let Some(frame) = frame else {
                    break;
                };
                if let Err(e) = socket.send(Message::Text(frame.to_string().into())).await {
                    debug!(subscriber = id, "send failed: {}", e);
                    break;
                }
            }
            inbound = socket.recv() => {
                match inbound {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(Message::Ping(payload))) => {
                        if socket.send(Message::Pong(payload)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    info!(subscriber = id, "websocket session closed");
    // Dropping the subscription removes it from the set.
    drop(subscription);
}
