//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single WebSocket connection,
//! dispatching incoming events and forwarding room-filtered updates.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use tracing::Instrument;

use super::messages::{ClientEvent, ServerEvent};
use super::subscription::RoomMembership;
use crate::domain::{TimerEvent, TournamentId};
use crate::service::TimerService;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads client events and dispatches them to the [`TimerService`].
/// - Forwards `timer:update` for joined rooms from the
///   [`broadcast::Receiver`].
///
/// Closing the connection never touches a clock.
pub async fn run_connection(
    socket: WebSocket,
    event_rx: broadcast::Receiver<TimerEvent>,
    timer_service: Arc<TimerService>,
) {
    let connection_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("ws", %connection_id);
    drive(socket, event_rx, timer_service).instrument(span).await;
}

async fn drive(
    socket: WebSocket,
    mut event_rx: broadcast::Receiver<TimerEvent>,
    timer_service: Arc<TimerService>,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut rooms = RoomMembership::new();
    tracing::debug!("ws connection opened");

    loop {
        tokio::select! {
            // Incoming message from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let reply = handle_text_message(&text, &mut rooms, &timer_service).await;
                        if let Some(frame) = reply
                            && ws_tx.send(Message::text(frame)).await.is_err() {
                                break;
                            }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(error = %e, "ws receive failed");
                        break;
                    }
                    _ => {}
                }
            }
            // Event from EventBus
            event = event_rx.recv() => {
                match event {
                    Ok(timer_event) => {
                        if !rooms.contains(timer_event.tournament_id) {
                            continue;
                        }
                        let Some(frame) = ServerEvent::Update(timer_event.state.as_ref()).to_frame() else {
                            continue;
                        };
                        if ws_tx.send(Message::text(frame)).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "ws client lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!(rooms = rooms.len(), "ws connection closed");
}

/// Handles a text frame from the client, returning an optional reply frame
/// for this client only.
async fn handle_text_message(
    text: &str,
    rooms: &mut RoomMembership,
    timer_service: &TimerService,
) -> Option<String> {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::debug!(error = %e, "unparseable ws event");
            return ServerEvent::error(format!("invalid event: {e}")).to_frame();
        }
    };

    match event {
        ClientEvent::JoinRoom(key) => {
            let tournament_id = key.0;
            rooms.join(tournament_id);
            tracing::debug!(%tournament_id, "joined room");
            sync_frame(timer_service, tournament_id).await
        }
        ClientEvent::LeaveRoom(key) => {
            rooms.leave(key.0);
            tracing::debug!(tournament_id = %key.0, "left room");
            None
        }
        ClientEvent::RequestSync(payload) => {
            sync_frame(timer_service, payload.tournament_id.0).await
        }
        other => {
            let (tournament_id, action) = other.into_action()?;
            match timer_service.control(tournament_id, action).await {
                Ok(_) => None,
                Err(e) => ServerEvent::error(e.to_string()).to_frame(),
            }
        }
    }
}

async fn sync_frame(timer_service: &TimerService, tournament_id: TournamentId) -> Option<String> {
    match timer_service.sync(tournament_id).await {
        Ok(state) => ServerEvent::Sync(&state).to_frame(),
        Err(e) => {
            tracing::warn!(%tournament_id, error = %e, "sync refused");
            ServerEvent::error(e.to_string()).to_frame()
        }
    }
}
