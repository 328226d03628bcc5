//! Chat delivery
//!
//! A single `ChatSession` owns the backend connection and is driven by one
//! event loop task. Pipelines talk to it through a cloneable
//! `PublisherHandle`, so sends to the backend are serialized by the queue.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::errors::RelayError;

/// Channel as reported by the chat backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedChannel {
    pub id: String,
    pub name: Option<String>,
}

/// Operations the chat session needs from a chat system.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Authenticates and returns a printable identity of the bot.
    async fn connect(&self) -> Result<String, RelayError>;

    async fn resolve_channel(&self, channel_id: &str) -> Result<ResolvedChannel, RelayError>;

    async fn send(&self, channel: &ResolvedChannel, text: &str) -> Result<(), RelayError>;

    async fn disconnect(&self) {}
}

/// Delivery of a formatted message to a channel.
#[async_trait]
pub trait ChatPublisher: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the message could not be delivered. Callers log it;
    /// nothing is retried.
    async fn publish(&self, channel_id: &str, message: &str) -> Result<(), RelayError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Ready,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => f.write_str("disconnected"),
            Self::Connecting => f.write_str("connecting"),
            Self::Ready => f.write_str("ready"),
        }
    }
}

#[derive(Debug)]
pub struct PublishRequest {
    pub channel_id: String,
    pub text: String,
    pub enqueued_at: Instant,
    /// Past `enqueued_at + timeout` the caller has given up on the request.
    pub timeout: Duration,
    pub reply: oneshot::Sender<Result<(), RelayError>>,
}

impl PublishRequest {
    #[must_use]
    pub fn deadline(&self) -> Instant {
        self.enqueued_at + self.timeout
    }

    fn expired(&self) -> bool {
        self.reply.is_closed() || Instant::now() >= self.deadline()
    }
}

/// Chat connection driven by a single event loop.
///
/// `Ready` means the bot credentials were verified and the pooled HTTP client
/// is live; there is no long-lived socket behind it.
pub struct ChatSession<B> {
    backend: B,
    state: ConnectionState,
}

impl<B: ChatBackend> ChatSession<B> {
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: ConnectionState::Disconnected,
        }
    }

    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// # Errors
    ///
    /// Returns the backend error; the session goes back to `Disconnected`.
    pub async fn connect(&mut self) -> Result<String, RelayError> {
        self.state = ConnectionState::Connecting;
        match self.backend.connect().await {
            Ok(identity) => {
                self.state = ConnectionState::Ready;
                info!("Chat bot connected as {}", identity);
                Ok(identity)
            }
            Err(e) => {
                self.state = ConnectionState::Disconnected;
                error!("Failed to connect chat bot: {}", e);
                Err(e)
            }
        }
    }

    /// Resolves the channel on every call and sends the text once.
    ///
    /// # Errors
    ///
    /// Returns `NotReady` outside the `Ready` state, `ChannelNotFound` when the
    /// channel cannot be resolved, or the backend's send error.
    pub async fn publish(&self, channel_id: &str, text: &str) -> Result<(), RelayError> {
        if self.state != ConnectionState::Ready {
            return Err(RelayError::NotReady(self.state.to_string()));
        }

        let channel = self.backend.resolve_channel(channel_id).await.map_err(|e| match e {
            RelayError::ChannelNotFound(_) => e,
            other => RelayError::ChannelNotFound(format!("{channel_id}: {other}")),
        })?;
        debug!(
            channel_id = %channel.id,
            channel_name = channel.name.as_deref().unwrap_or_default(),
            "Posting notification"
        );

        self.backend.send(&channel, text).await
    }

    pub async fn shutdown(&mut self) {
        if self.state != ConnectionState::Disconnected {
            self.backend.disconnect().await;
            self.state = ConnectionState::Disconnected;
            info!("Chat bot disconnected");
        }
    }

    /// Event loop: serves publish requests until every handle is dropped,
    /// then disconnects.
    ///
    /// Each delivery is bounded by the request deadline. Requests whose caller
    /// already gave up are skipped, so a timed-out message is never posted.
    pub async fn run(mut self, mut requests: mpsc::Receiver<PublishRequest>) {
        while let Some(request) = requests.recv().await {
            if request.expired() {
                warn!(channel_id = %request.channel_id, "Skipping notification whose publish timed out");
                continue;
            }

            let result = tokio::time::timeout_at(
                request.deadline(),
                self.publish(&request.channel_id, &request.text),
            )
            .await
            .unwrap_or_else(|_| {
                Err(RelayError::Timeout(
                    request.timeout.as_secs(),
                    format!("publish to {}", request.channel_id),
                ))
            });

            match &result {
                Ok(()) => info!(channel_id = %request.channel_id, "Notification delivered"),
                Err(e) => error!(channel_id = %request.channel_id, "Failed to deliver notification: {}", e),
            }
            if request.reply.send(result).is_err() {
                warn!("Publisher dropped before delivery result was reported");
            }
        }
        self.shutdown().await;
    }
}

/// Cloneable sender side of the chat event loop.
#[derive(Debug, Clone)]
pub struct PublisherHandle {
    requests: mpsc::Sender<PublishRequest>,
    timeout: Duration,
}

/// Creates the publish queue shared by a `ChatSession` loop and its handles.
#[must_use]
pub fn publish_queue(
    capacity: usize,
    timeout: Duration,
) -> (PublisherHandle, mpsc::Receiver<PublishRequest>) {
    let (tx, rx) = mpsc::channel(capacity);
    (
        PublisherHandle {
            requests: tx,
            timeout,
        },
        rx,
    )
}

impl PublisherHandle {
    async fn deliver(
        &self,
        request: PublishRequest,
        outcome: oneshot::Receiver<Result<(), RelayError>>,
    ) -> Result<(), RelayError> {
        self.requests
            .send(request)
            .await
            .map_err(|_| RelayError::QueueClosed("chat publish queue".to_string()))?;
        outcome
            .await
            .map_err(|_| RelayError::QueueClosed("chat session stopped".to_string()))?
    }
}

#[async_trait]
impl ChatPublisher for PublisherHandle {
    async fn publish(&self, channel_id: &str, message: &str) -> Result<(), RelayError> {
        let (reply, outcome) = oneshot::channel();
        let request = PublishRequest {
            channel_id: channel_id.to_string(),
            text: message.to_string(),
            enqueued_at: Instant::now(),
            timeout: self.timeout,
            reply,
        };

        tokio::time::timeout(self.timeout, self.deliver(request, outcome))
            .await
            .map_err(|_| {
                RelayError::Timeout(self.timeout.as_secs(), format!("publish to {channel_id}"))
            })?
    }
}
