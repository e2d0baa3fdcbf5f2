// src/infra/ws/broadcaster.rs
use std::{collections::HashMap, fmt, sync::Arc, time::Duration};

use futures_util::{future::join_all, Stream, StreamExt};
use parking_lot::RwLock;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::{
    domain::{events::ChatEvent, traits::Connection},
    error::AppError,
};

pub type ConnectionRef = Arc<dyn Connection>;

/// Result of one fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: usize,
    pub failed: usize,
}

/// Live connections per user plus the fan-out over them.
///
/// The map lock is only taken for traversal and mutation. Broadcast copies the
/// current connection list out of the lock and writes after releasing it, so a
/// stalled client can delay the broadcast that targets it (up to
/// `send_timeout`) but never registration or other broadcasts' snapshots.
#[derive(Clone)]
pub struct ConnectionRegistry {
    clients: Arc<RwLock<HashMap<String, Vec<ConnectionRef>>>>,
    send_timeout: Duration,
}

impl ConnectionRegistry {
    pub fn new(send_timeout: Duration) -> Self {
        Self {
            clients: Arc::new(RwLock::new(HashMap::new())),
            send_timeout,
        }
    }

    /// Adds `connection` under `user_id`. Returns how many connections the user now holds.
    pub fn register(&self, user_id: &str, connection: ConnectionRef) -> Result<usize, AppError> {
        if user_id.is_empty() {
            return Err(AppError::Validation("user id is required".into()));
        }
        let count = {
            let mut guard = self.clients.write();
            let connections = guard.entry(user_id.to_string()).or_default();
            connections.push(connection);
            connections.len()
        };
        info!(user_id = %user_id, connections = count, "client registered");
        Ok(count)
    }

    /// Removes exactly `connection` (matched by id) and closes it.
    ///
    /// Returns `false` when it was not registered under `user_id`.
    pub async fn unregister(&self, user_id: &str, connection: &ConnectionRef) -> bool {
        let connection_id = connection.id();
        let (removed, remaining) = {
            let mut guard = self.clients.write();
            let Some(connections) = guard.get_mut(user_id) else {
                return false;
            };
            let removed = connections
                .iter()
                .position(|c| c.id() == connection_id)
                .map(|index| connections.remove(index));
            let remaining = connections.len();
            if remaining == 0 {
                guard.remove(user_id);
            }
            (removed, remaining)
        };

        match removed {
            Some(connection) => {
                connection.close().await;
                info!(user_id = %user_id, remaining, "client unregistered");
                true
            }
            None => false,
        }
    }

    /// Drops every connection held by `user_id` and closes them.
    pub async fn disconnect_user(&self, user_id: &str) -> usize {
        let removed = self.clients.write().remove(user_id).unwrap_or_default();
        let count = removed.len();
        join_all(removed.iter().map(|connection| connection.close())).await;
        if count > 0 {
            info!(user_id = %user_id, connections = count, "user disconnected");
        }
        count
    }

    /// Serializes `event` once and writes it to every live connection.
    ///
    /// Failed or timed-out writes are logged and counted. The connection stays
    /// registered; its own read loop removes it.
    pub async fn broadcast(&self, event: &ChatEvent) -> Result<BroadcastReport, AppError> {
        let frame = serde_json::to_string(event)
            .map_err(|err| AppError::Internal(format!("event serialization failed: {err}")))?;
        let targets = self.snapshot();
        if targets.is_empty() {
            return Ok(BroadcastReport::default());
        }

        let frame = frame.as_str();
        let sends = targets.iter().map(|(user_id, connection)| async move {
            match timeout(self.send_timeout, connection.send_text(frame)).await {
                Ok(Ok(())) => true,
                Ok(Err(err)) => {
                    warn!(user_id = %user_id, error = %err, "failed to deliver event");
                    false
                }
                Err(_) => {
                    warn!(
                        user_id = %user_id,
                        timeout_ms = self.send_timeout.as_millis() as u64,
                        "event delivery timed out"
                    );
                    false
                }
            }
        });
        let outcomes = join_all(sends).await;

        let delivered = outcomes.iter().filter(|ok| **ok).count();
        let report = BroadcastReport {
            delivered,
            failed: outcomes.len() - delivered,
        };
        debug!(
            event = event.event_name(),
            delivered = report.delivered,
            failed = report.failed,
            "event broadcast"
        );
        Ok(report)
    }

    /// Drains inbound frames until the peer closes or errors, then unregisters.
    ///
    /// Inbound frames carry no meaning yet; the loop exists to notice disconnects.
    pub async fn read_loop<S, T, E>(&self, user_id: &str, connection: ConnectionRef, mut inbound: S)
    where
        S: Stream<Item = Result<T, E>> + Unpin,
        E: fmt::Display,
    {
        loop {
            match inbound.next().await {
                Some(Ok(_)) => {
                    debug!(user_id = %user_id, "ignoring inbound frame");
                }
                Some(Err(err)) => {
                    warn!(user_id = %user_id, error = %err, "websocket receive error");
                    break;
                }
                None => {
                    debug!(user_id = %user_id, "websocket stream ended");
                    break;
                }
            }
        }
        self.unregister(user_id, &connection).await;
    }

    pub fn connection_count(&self) -> usize {
        self.clients.read().values().map(Vec::len).sum()
    }

    pub fn user_count(&self) -> usize {
        self.clients.read().len()
    }

    pub fn connections_for(&self, user_id: &str) -> usize {
        self.clients.read().get(user_id).map(Vec::len).unwrap_or(0)
    }

    fn snapshot(&self) -> Vec<(String, ConnectionRef)> {
        let guard = self.clients.read();
        guard
            .iter()
            .flat_map(|(user_id, connections)| {
                connections
                    .iter()
                    .map(move |connection| (user_id.clone(), Arc::clone(connection)))
            })
            .collect()
    }
}
