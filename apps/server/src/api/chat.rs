//! Support chat WebSocket endpoint.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
    routing::get,
    Router,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};

use crate::chat_hub::ChatHub;
use crate::main_lib::AppState;

async fn chat_ws(State(state): State<Arc<AppState>>, ws: WebSocketUpgrade) -> Response {
    // Subscribe before the upgrade completes so a client that sees the
    // handshake finish never misses a frame.
    let feed = state.chat_hub.subscribe();
    let hub = state.chat_hub.clone();
    ws.on_upgrade(move |socket| relay_socket(socket, hub, feed))
}

/// Publish every inbound text frame and forward every hub frame to this socket.
async fn relay_socket(socket: WebSocket, hub: ChatHub, mut feed: broadcast::Receiver<String>) {
    let (mut sender, mut receiver) = socket.split();
    debug!("Chat client connected ({} listening)", hub.subscriber_count());

    loop {
        tokio::select! {
            inbound = receiver.next() => match inbound {
                Some(Ok(Message::Text(text))) => {
                    hub.publish(text.as_str().to_owned());
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    debug!("Chat socket error: {}", err);
                    break;
                }
            },
            outbound = feed.recv() => match outbound {
                Ok(text) => {
                    if sender.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Chat client lagging, skipped {} frames", skipped);
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    let _ = sender.close().await;
    debug!("Chat client disconnected");
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/chat/ws", get(chat_ws))
}
