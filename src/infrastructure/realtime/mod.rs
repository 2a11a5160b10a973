//! Live updates over the server's WebSocket
//!
//! The connection is retried with capped exponential backoff until the
//! shutdown signal flips. Events the client does not know are skipped.

use futures_util::StreamExt;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::Message as WsMessage;

use crate::application::errors::RealtimeError;
use crate::domain::entities::ServerEvent;

/// Backoff bounds for reconnect attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub initial: Duration,
    pub max: Duration,
}

impl ReconnectPolicy {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self { initial, max: max.max(initial) }
    }

    /// Delay before retry number `attempt` (0-based): initial * 2^attempt, capped
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.min(16));
        self.initial.saturating_mul(factor).min(self.max)
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(5), Duration::from_secs(60))
    }
}

/// Tracks consecutive failures for a [`ReconnectPolicy`]
#[derive(Debug)]
pub struct Backoff {
    policy: ReconnectPolicy,
    attempt: u32,
}

impl Backoff {
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self { policy, attempt: 0 }
    }

    pub fn next_delay(&mut self) -> Duration {
        let delay = self.policy.delay(self.attempt);
        self.attempt = self.attempt.saturating_add(1);
        delay
    }

    pub fn reset(&mut self) {
        self.attempt = 0;
    }
}

/// Why a connection ended
#[derive(Debug, PartialEq, Eq)]
enum Disconnect {
    Closed,
    Shutdown,
}

/// Build `ws://host/path` (or `wss://`) from the server's http base URL
pub fn websocket_url(base_url: &str, path: &str) -> Result<String, RealtimeError> {
    let base_url = base_url.trim_end_matches('/');
    let rest = if let Some(rest) = base_url.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = base_url.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        return Err(RealtimeError::Connect(format!("unsupported server URL: {}", base_url)));
    };

    if path.starts_with('/') {
        Ok(format!("{}{}", rest, path))
    } else {
        Ok(format!("{}/{}", rest, path))
    }
}

/// Decode one text frame. `Ok(None)` for well-formed events of unknown type.
pub fn parse_event(text: &str) -> Result<Option<ServerEvent>, RealtimeError> {
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| RealtimeError::Decode(e.to_string()))?;

    let kind = value.get("type").and_then(|v| v.as_str()).unwrap_or("");
    if !ServerEvent::KINDS.iter().any(|known| *known == kind) {
        tracing::debug!(kind, "ignoring unknown live event");
        return Ok(None);
    }

    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| RealtimeError::Decode(e.to_string()))
}

/// WebSocket listener feeding [`ServerEvent`]s into a channel
pub struct LiveUpdates {
    url: String,
    policy: ReconnectPolicy,
}

impl LiveUpdates {
    pub fn new(url: impl Into<String>, policy: ReconnectPolicy) -> Self {
        Self {
            url: url.into(),
            policy,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Connect, forward events, and reconnect until `shutdown` becomes true
    /// (or its sender is dropped, or the event receiver goes away).
    pub async fn run(self, events: mpsc::UnboundedSender<ServerEvent>, mut shutdown: watch::Receiver<bool>) {
        let mut backoff = Backoff::new(self.policy);

        loop {
            if *shutdown.borrow() {
                break;
            }

            match self.connect_once(&events, &mut shutdown, &mut backoff).await {
                Ok(Disconnect::Shutdown) => break,
                Ok(Disconnect::Closed) => {
                    tracing::info!(url = %self.url, "live updates disconnected");
                }
                Err(e) => {
                    tracing::warn!(error = %e, url = %self.url, "live updates unavailable");
                }
            }

            let delay = backoff.next_delay();
            tracing::debug!(?delay, "reconnecting live updates");
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = shutdown.changed() => break,
            }
        }

        tracing::debug!("live updates stopped");
    }

    async fn connect_once(
        &self,
        events: &mpsc::UnboundedSender<ServerEvent>,
        shutdown: &mut watch::Receiver<bool>,
        backoff: &mut Backoff,
    ) -> Result<Disconnect, RealtimeError> {
        let (mut stream, _) = tokio::select! {
            result = tokio_tungstenite::connect_async(self.url.as_str()) => {
                result.map_err(|e| RealtimeError::Connect(e.to_string()))?
            }
            _ = shutdown.changed() => return Ok(Disconnect::Shutdown),
        };

        backoff.reset();
        tracing::info!(url = %self.url, "live updates connected");

        loop {
            tokio::select! {
                frame = stream.next() => match frame {
                    Some(Ok(WsMessage::Text(text))) => match parse_event(&text) {
                        Ok(Some(event)) => {
                            if events.send(event).is_err() {
                                return Ok(Disconnect::Shutdown);
                            }
                        }
                        Ok(None) => {}
                        Err(e) => tracing::warn!(error = %e, "dropping malformed live event"),
                    },
                    Some(Ok(WsMessage::Close(_))) | None => return Ok(Disconnect::Closed),
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(RealtimeError::Protocol(e.to_string())),
                },
                _ = shutdown.changed() => return Ok(Disconnect::Shutdown),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_doubles_and_caps() {
        let policy = ReconnectPolicy::new(Duration::from_secs(5), Duration::from_secs(60));
        let delays: Vec<u64> = (0..6).map(|n| policy.delay(n).as_secs()).collect();
        assert_eq!(delays, vec![5, 10, 20, 40, 60, 60]);
        assert_eq!(policy.delay(u32::MAX), Duration::from_secs(60));
    }

    #[test]
    fn test_backoff_resets() {
        let mut backoff = Backoff::new(ReconnectPolicy::default());
        assert_eq!(backoff.next_delay(), Duration::from_secs(5));
        assert_eq!(backoff.next_delay(), Duration::from_secs(10));
        backoff.reset();
        assert_eq!(backoff.next_delay(), Duration::from_secs(5));
    }

    #[test]
    fn test_websocket_url() {
        assert_eq!(websocket_url("http://localhost:5000/", "/ws").unwrap(), "ws://localhost:5000/ws");
        assert_eq!(websocket_url("https://naira.app", "ws").unwrap(), "wss://naira.app/ws");
        assert!(websocket_url("ftp://x", "/ws").is_err());
    }

    #[test]
    fn test_parse_known_events() {
        assert_eq!(
            parse_event(r#"{"type": "task_update", "task_id": 4, "completed": true}"#).unwrap(),
            Some(ServerEvent::TaskUpdate { task_id: 4, completed: true })
        );
        assert_eq!(
            parse_event(r#"{"type": "notification", "title": "Due soon", "message": "Essay"}"#).unwrap(),
            Some(ServerEvent::Notification { title: "Due soon".to_string(), message: "Essay".to_string() })
        );
        assert_eq!(
            parse_event(r#"{"type": "new_message", "content": "hi"}"#).unwrap(),
            Some(ServerEvent::NewMessage { content: "hi".to_string(), sender: None })
        );
    }

    #[test]
    fn test_parse_unknown_and_malformed() {
        assert_eq!(parse_event(r#"{"type": "presence", "user": 1}"#).unwrap(), None);
        assert!(parse_event("not json").is_err());
        assert!(parse_event(r#"{"type": "task_update"}"#).is_err());
    }

    #[tokio::test]
    async fn test_run_returns_when_already_shut_down() {
        let (events, _rx) = mpsc::unbounded_channel();
        let (_tx, shutdown) = watch::channel(true);
        let live = LiveUpdates::new("ws://127.0.0.1:9/ws", ReconnectPolicy::default());
        tokio::time::timeout(Duration::from_secs(1), live.run(events, shutdown))
            .await
            .expect("run should stop immediately");
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_stops_during_backoff() {
        let (events, _rx) = mpsc::unbounded_channel();
        let (tx, shutdown) = watch::channel(false);
        let live = LiveUpdates::new("ws://127.0.0.1:9/ws", ReconnectPolicy::default());
        let task = tokio::spawn(live.run(events, shutdown));

        tokio::time::sleep(Duration::from_millis(100)).await;
        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("run should observe shutdown")
            .unwrap();
    }
}
