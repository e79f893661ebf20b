//! WebSocket handler: live snapshot push for one session.
//!
//! DESIGN
//! ======
//! On upgrade, the current snapshot is sent immediately, then the handler
//! enters a `select!` loop:
//! - Snapshot published by the session runner → serialize and forward
//! - Incoming client messages → only `Close` is meaningful
//!
//! Actions still go through the HTTP routes; the socket exists so the
//! presentation layer can render delayed prompts and advisor results as
//! they land.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::Response;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::services::session::SessionSnapshot;
use crate::state::AppState;

pub async fn handle_ws(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ws: WebSocketUpgrade,
) -> Result<Response, ApiError> {
    let handle = state.sessions.get(id).await?;
    let updates = handle.subscribe();
    Ok(ws.on_upgrade(move |socket| run_ws(socket, id, updates)))
}

async fn run_ws(mut socket: WebSocket, session_id: Uuid, mut updates: watch::Receiver<SessionSnapshot>) {
    info!(%session_id, "ws: client connected");

    let initial = updates.borrow_and_update().clone();
    if send_snapshot(&mut socket, &initial).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(Ok(msg)) = msg else { break };
                match msg {
                    Message::Close(_) => break,
                    Message::Text(_) | Message::Binary(_) => {
                        debug!(%session_id, "ws: ignoring inbound message");
                    }
                    _ => {}
                }
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    // Runner stopped; nothing more will be published.
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                if send_snapshot(&mut socket, &snapshot).await.is_err() {
                    break;
                }
            }
        }
    }

    info!(%session_id, "ws: client disconnected");
}

async fn send_snapshot(socket: &mut WebSocket, snapshot: &SessionSnapshot) -> Result<(), ()> {
    let Some(json) = snapshot_text(snapshot) else {
        return Err(());
    };
    socket
        .send(Message::Text(json.into()))
        .await
        .map_err(|_| ())
}

fn snapshot_text(snapshot: &SessionSnapshot) -> Option<String> {
    match serde_json::to_string(snapshot) {
        Ok(json) => Some(json),
        Err(e) => {
            warn!(session_id = %snapshot.id, error = %e, "ws: snapshot serialization failed");
            None
        }
    }
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
