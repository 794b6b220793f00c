use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite};
use tracing::{debug, error, info, warn};

use super::messages::{RealtimeInput, ServerMessage};
use super::{ConnectConfig, SpeechTransport, TransportEvent};

/// WebSocket implementation of the duplex speech channel
///
/// Outbound frames and inbound messages are JSON text frames. The setup
/// message goes out before `Opened` is reported, so the remote sees the
/// session configuration ahead of any audio.
pub struct WsTransport;

impl WsTransport {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WsTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechTransport for WsTransport {
    fn connect(&self, config: ConnectConfig) -> mpsc::Receiver<TransportEvent> {
        let (event_tx, event_rx) = mpsc::channel(64);
        tokio::spawn(run_connection(config, event_tx));
        event_rx
    }
}

async fn run_connection(config: ConnectConfig, events: mpsc::Sender<TransportEvent>) {
    info!("Connecting to speech model at {}", config.url);

    let ws_stream = match connect_async(config.url.as_str()).await {
        Ok((stream, _)) => stream,
        Err(e) => {
            error!("Speech channel connect failed: {}", e);
            let _ = events
                .send(TransportEvent::Failed(format!("connect failed: {}", e)))
                .await;
            return;
        }
    };

    let (mut ws_tx, mut ws_rx) = ws_stream.split();

    // Session configuration must precede any audio frame.
    let setup = serde_json::json!({ "setup": config.setup });
    if let Err(e) = ws_tx
        .send(tungstenite::Message::Text(setup.to_string()))
        .await
    {
        error!("Failed to send session setup: {}", e);
        let _ = events
            .send(TransportEvent::Failed(format!("setup failed: {}", e)))
            .await;
        return;
    }

    let (out_tx, mut out_rx) = mpsc::channel::<RealtimeInput>(64);

    if events.send(TransportEvent::Opened(out_tx)).await.is_err() {
        // Session side went away before the channel opened.
        let _ = ws_tx.close().await;
        return;
    }

    info!("Speech channel open");

    // Forward outbound frames until the session drops its sender.
    let send_task = tokio::spawn(async move {
        while let Some(input) = out_rx.recv().await {
            let frame = serde_json::json!({ "realtimeInput": input });
            if let Err(e) = ws_tx
                .send(tungstenite::Message::Text(frame.to_string()))
                .await
            {
                warn!("Failed to send audio frame: {}", e);
                break;
            }
        }
        let _ = ws_tx.close().await;
    });

    while let Some(msg) = ws_rx.next().await {
        match msg {
            Ok(tungstenite::Message::Text(text)) => {
                match serde_json::from_str::<ServerMessage>(&text) {
                    Ok(message) => {
                        if events.send(TransportEvent::Message(message)).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        // A malformed message is fatal to that message only.
                        warn!("Skipping unparseable server message: {}", e);
                    }
                }
            }
            Ok(tungstenite::Message::Close(frame)) => {
                debug!("Speech channel closed by remote: {:?}", frame);
                let _ = events.send(TransportEvent::Closed).await;
                send_task.abort();
                return;
            }
            Ok(_) => {}
            Err(e) => {
                error!("Speech channel error: {}", e);
                let _ = events.send(TransportEvent::Failed(e.to_string())).await;
                send_task.abort();
                return;
            }
        }
    }

    // Stream ended without an explicit close frame.
    let _ = events.send(TransportEvent::Closed).await;
    send_task.abort();
}
