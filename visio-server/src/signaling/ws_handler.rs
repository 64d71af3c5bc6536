use crate::signaling::SignalingService;
use crate::transport::{self, Outbound};
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tracing::{error, info, warn};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(service): State<SignalingService>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, service))
}

async fn handle_socket(socket: WebSocket, service: SignalingService) {
    let (mut sender, mut receiver) = socket.split();
    let (outbound, mut rx) = Outbound::channel();

    let connection_id = service.connect(outbound);
    info!("New WebSocket connection: {}", connection_id);

    let mut send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let msg = match transport::encode(&event) {
                Ok(msg) => msg,
                Err(e) => {
                    error!("Failed to encode event for {}: {}", connection_id, e);
                    continue;
                }
            };
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let service = service.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => match transport::decode(text.as_str()) {
                        Ok(event) => service.dispatch(connection_id, event),
                        Err(e) => warn!("Discarding event from {}: {}", connection_id, e),
                    },
                    Message::Binary(_) => {
                        warn!("Discarding binary frame from {}", connection_id);
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    service.disconnect(connection_id);
    info!("WebSocket disconnected: {}", connection_id);
}
