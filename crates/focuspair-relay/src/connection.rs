//! Per-connection handler: register, then pump frames both ways until the
//! socket closes.

use std::net::SocketAddr;

use axum::extract::ws::{Message, WebSocket};
use focuspair_common::{ClientMessage, ServerMessage};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::store::RoomStore;

/// Handle a single WebSocket connection.
pub async fn handle_connection(ws: WebSocket, addr: SocketAddr, store: RoomStore, capacity: usize) {
    let (mut sink, mut stream) = ws.split();

    // 1. Create our receive channel and register.
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(capacity);
    let conn = store.register(tx).await;

    tracing::info!(peer = %addr, conn = %conn, "Client connected");

    // 2. Pump loop.
    loop {
        tokio::select! {
            // Deliveries for this client → its WebSocket
            Some(msg) = rx.recv() => {
                if send_message(&mut sink, &msg).await.is_err() {
                    break;
                }
            }

            // Frames from this client → pairing handler
            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => match ClientMessage::decode(&text) {
                        Ok(msg) => store.dispatch(conn, msg).await,
                        Err(e) => {
                            tracing::debug!(conn = %conn, error = %e, "Malformed message");
                            let reply = ServerMessage::Error("Malformed message".into());
                            if send_message(&mut sink, &reply).await.is_err() {
                                break;
                            }
                        }
                    },
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(peer = %addr, error = %e, "WS error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    // 3. Cleanup.
    tracing::info!(peer = %addr, conn = %conn, "Client disconnected");
    store.disconnect(conn).await;
}

/// Send a ServerMessage as a JSON text frame.
async fn send_message(
    sink: &mut SplitSink<WebSocket, Message>,
    message: &ServerMessage,
) -> Result<(), axum::Error> {
    let json = match message.encode() {
        Ok(json) => json,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to encode outbound message");
            return Ok(());
        }
    };
    sink.send(Message::Text(json.into())).await
}
