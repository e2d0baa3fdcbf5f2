use std::{
    borrow::Cow,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use async_trait::async_trait;
use axum::extract::ws::{CloseFrame, Message, WebSocket};
use futures_util::{future, stream::SplitSink, SinkExt, StreamExt};
use tokio::{sync::Mutex, time::timeout};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{domain::traits::Connection, error::AppError};

use super::broadcaster::{ConnectionRef, ConnectionRegistry};

const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Write half of an upgraded axum websocket.
pub struct WsConnection {
    id: Uuid,
    sink: Mutex<SplitSink<WebSocket, Message>>,
    closed: AtomicBool,
}

impl WsConnection {
    pub fn new(sink: SplitSink<WebSocket, Message>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sink: Mutex::new(sink),
            closed: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl Connection for WsConnection {
    fn id(&self) -> Uuid {
        self.id
    }

    async fn send_text(&self, text: &str) -> Result<(), AppError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(AppError::Connection(format!("connection {} closed", self.id)));
        }
        let mut sink = self.sink.lock().await;
        sink.send(Message::Text(text.to_owned()))
            .await
            .map_err(|err| AppError::Connection(err.to_string()))
    }

    async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        let shutdown = async {
            let mut sink = self.sink.lock().await;
            let _ = sink
                .send(Message::Close(Some(CloseFrame {
                    code: 1000,
                    reason: Cow::from("connection closed"),
                })))
                .await;
            let _ = sink.close().await;
        };
        if timeout(CLOSE_TIMEOUT, shutdown).await.is_err() {
            warn!(connection_id = %self.id, "websocket close timed out");
        }
    }
}

/// Runs one upgraded socket for `user_id`: register, read until the peer goes
/// away, unregister.
pub async fn handle_connection_upgrade(
    registry: ConnectionRegistry,
    user_id: String,
    socket: WebSocket,
) {
    let (sink, stream) = socket.split();
    let connection: ConnectionRef = Arc::new(WsConnection::new(sink));

    if let Err(err) = registry.register(&user_id, Arc::clone(&connection)) {
        warn!(user_id = %user_id, error = %err, "rejecting websocket");
        connection.close().await;
        return;
    }

    // a close frame ends the session just like the stream ending
    let inbound = Box::pin(
        stream.take_while(|frame| future::ready(!matches!(frame, Ok(Message::Close(_))))),
    );
    registry.read_loop(&user_id, connection, inbound).await;

    info!(user_id = %user_id, "websocket disconnected");
}
