use std::sync::Arc;

use abrowser_events::{task_group, ClientMessage, Notification};
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};

use crate::state::AppState;
use crate::ws::manager::WsManager;

/// HTTP handler that upgrades the connection to WebSocket.
///
/// After the upgrade the connection is registered with `WsManager` and
/// managed by two spawned tasks (sender + receiver).
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.ws_manager))
}

/// Manage a single WebSocket connection after upgrade.
///
/// Splits the socket into a sink (outbound) and stream (inbound), then:
///   1. Registers the connection with `WsManager` and sends the one-time
///      welcome ack carrying the assigned connection id.
///   2. Spawns a sender task that forwards messages from the manager channel.
///   3. Processes inbound subscription frames on the current task.
///   4. Cleans up on disconnect (group memberships drop with the entry).
async fn handle_socket(socket: WebSocket, ws_manager: Arc<WsManager>) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, "WebSocket connected");

    // Register and get the receiver for outbound messages.
    let mut rx = ws_manager.add(conn_id.clone()).await;

    send_frame(&ws_manager, &conn_id, Notification::connection_ack(&conn_id)).await;

    let (mut sink, mut stream) = socket.split();

    // Sender task: forward channel messages to the WebSocket sink.
    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    // Receiver loop: process inbound messages.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(Message::Text(text)) => {
                handle_client_frame(&ws_manager, &conn_id, text.as_str()).await;
            }
            Ok(_msg) => {
                // Binary and ping frames carry nothing we act on.
            }
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    // Clean up: remove connection and abort sender task.
    ws_manager.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, "WebSocket disconnected");
}

/// Process one inbound text frame.
///
/// Malformed frames are logged and dropped; they never close the socket.
async fn handle_client_frame(ws_manager: &WsManager, conn_id: &str, text: &str) {
    let msg = match ClientMessage::parse(text) {
        Ok(msg) => msg,
        Err(e) => {
            tracing::debug!(conn_id = %conn_id, error = %e, "Ignoring malformed client frame");
            return;
        }
    };

    match msg {
        ClientMessage::JoinTask(task) => {
            let group = task_group(task.task_id);
            if ws_manager.join(conn_id, &group).await {
                tracing::info!(conn_id = %conn_id, group = %group, "Client joined task group");
                // Ack goes to the joining connection only, never the group.
                send_frame(ws_manager, conn_id, Notification::joined_task(task.task_id)).await;
            }
        }
        ClientMessage::LeaveTask(task) => {
            let group = task_group(task.task_id);
            ws_manager.leave(conn_id, &group).await;
            tracing::info!(conn_id = %conn_id, group = %group, "Client left task group");
        }
    }
}

/// Serialize a notification and push it to a single connection.
async fn send_frame(ws_manager: &WsManager, conn_id: &str, notification: Notification) {
    match notification.to_text() {
        Ok(text) => {
            ws_manager.send_to(conn_id, Message::Text(text.into())).await;
        }
        Err(e) => {
            tracing::error!(conn_id = %conn_id, error = %e, "Failed to serialize frame");
        }
    }
}
