use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{sink::SinkExt, stream::StreamExt};
use tracing::debug;

use crate::state::AppState;

/// Upgrade handler for the live-update channel. Every connection joins the
/// process-wide broadcast hub; frames received from a client are fanned out
/// to all subscribers. No protocol beyond that lives here.
pub async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sink, mut stream) = socket.split();
    let mut events = state.events.subscribe();
    let hub = state.events.clone();

    let mut forward = tokio::spawn(async move {
        while let Ok(msg) = events.recv().await {
            if sink.send(Message::Text(msg)).await.is_err() {
                break;
            }
        }
    });

    let mut publish = tokio::spawn(async move {
        while let Some(Ok(msg)) = stream.next().await {
            if let Message::Text(text) = msg {
                // Errors only mean there are no subscribers right now
                let _ = hub.send(text);
            }
        }
    });

    tokio::select! {
        _ = &mut forward => publish.abort(),
        _ = &mut publish => forward.abort(),
    }
    debug!("websocket closed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hub_delivers_to_subscribers() {
        let state = AppState::fake();
        let mut rx = state.events.subscribe();
        state.events.send("consultation-update".to_string()).expect("send");
        assert_eq!(rx.recv().await.expect("recv"), "consultation-update");
    }

    #[tokio::test]
    async fn hub_send_without_subscribers_is_not_fatal() {
        let state = AppState::fake();
        // No receiver attached; the publish side must tolerate it
        assert!(state.events.send("ping".to_string()).is_err());
        let mut rx = state.events.subscribe();
        state.events.send("pong".to_string()).expect("send");
        assert_eq!(rx.recv().await.expect("recv"), "pong");
    }
}
