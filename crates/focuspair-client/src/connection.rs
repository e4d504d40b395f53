//! WebSocket connection to the relay.

use std::time::Duration;

use focuspair_common::{ClientError, ClientMessage, ServerMessage};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// An open connection to the relay.
pub struct RelayConnection {
    sink: SplitSink<WsStream, WsMessage>,
    stream: SplitStream<WsStream>,
}

impl RelayConnection {
    /// Connect to `url`, giving up after `timeout`.
    pub async fn connect(url: &str, timeout: Duration) -> Result<Self, ClientError> {
        info!(url = %url, "Connecting to relay");

        match tokio::time::timeout(timeout, tokio_tungstenite::connect_async(url)).await {
            Ok(Ok((ws, _))) => {
                let (sink, stream) = ws.split();
                info!("Connected to relay");
                Ok(Self { sink, stream })
            }
            Ok(Err(e)) => Err(ClientError::Connection(format!("Connection failed: {e}"))),
            Err(_elapsed) => Err(ClientError::Connection(format!(
                "Connection timed out after {}s",
                timeout.as_secs()
            ))),
        }
    }

    /// Send one message as a JSON text frame.
    pub async fn send(&mut self, message: &ClientMessage) -> Result<(), ClientError> {
        let json = message
            .encode()
            .map_err(|e| ClientError::Protocol(e.to_string()))?;
        self.sink
            .send(WsMessage::Text(json.into()))
            .await
            .map_err(|e| ClientError::Connection(e.to_string()))
    }

    /// Next message from the relay. `None` once the connection is closed.
    ///
    /// Frames that are not valid relay messages are logged and skipped.
    pub async fn recv(&mut self) -> Option<ServerMessage> {
        while let Some(frame) = self.stream.next().await {
            match frame {
                Ok(WsMessage::Text(text)) => match ServerMessage::decode(&text) {
                    Ok(message) => return Some(message),
                    Err(e) => debug!(error = %e, text = %text.as_str(), "Unrecognized message from relay"),
                },
                Ok(WsMessage::Close(_)) => {
                    info!("Relay closed connection");
                    return None;
                }
                Err(e) => {
                    warn!(error = %e, "WebSocket error");
                    return None;
                }
                _ => {}
            }
        }
        None
    }

    /// Close the connection politely.
    pub async fn close(mut self) {
        if let Err(e) = self.sink.close().await {
            debug!(error = %e, "Error closing relay connection");
        }
    }
}
