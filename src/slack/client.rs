//! Slack API client module
//!
//! Wraps slack-morphism behind the `ChatBackend` seam used by the chat session.

use async_trait::async_trait;
use slack_morphism::hyper_tokio::{SlackClientHyperConnector, SlackHyperClient};
use slack_morphism::prelude::{SlackApiChatPostMessageRequest, SlackApiConversationsInfoRequest};
use slack_morphism::{SlackApiToken, SlackApiTokenValue, SlackChannelId, SlackMessageContent};
use tracing::{debug, warn};

use super::publisher::{ChatBackend, ResolvedChannel};
use crate::errors::RelayError;

/// Slack Web API client authenticated with a bot token
pub struct SlackClient {
    client: SlackHyperClient,
    token: SlackApiToken,
}

impl SlackClient {
    /// # Errors
    ///
    /// Returns an error if the HTTPS connector cannot be created.
    pub fn new(token: String) -> Result<Self, RelayError> {
        let connector = SlackClientHyperConnector::new().map_err(|e| {
            RelayError::ApiError(format!("Failed to create Slack HTTP connector: {e}"))
        })?;
        Ok(Self {
            client: SlackHyperClient::new(connector),
            token: SlackApiToken::new(SlackApiTokenValue::new(token)),
        })
    }
}

#[async_trait]
impl ChatBackend for SlackClient {
    async fn connect(&self) -> Result<String, RelayError> {
        let session = self.client.open_session(&self.token);
        let test_resp = session.auth_test().await?;
        let identity = test_resp
            .user
            .map_or_else(|| test_resp.user_id.0.clone(), |name| {
                format!("{name} ({})", test_resp.user_id.0)
            });
        Ok(identity)
    }

    async fn resolve_channel(&self, channel_id: &str) -> Result<ResolvedChannel, RelayError> {
        let session = self.client.open_session(&self.token);
        let info_req = SlackApiConversationsInfoRequest::new(SlackChannelId(channel_id.to_string()));

        match session.conversations_info(&info_req).await {
            Ok(info) => {
                debug!(channel_id, "Resolved Slack channel");
                Ok(ResolvedChannel {
                    id: info.channel.id.0,
                    name: info.channel.name,
                })
            }
            Err(e) => {
                warn!("Failed to resolve Slack channel {}: {}", channel_id, e);
                Err(RelayError::ChannelNotFound(format!("{channel_id}: {e}")))
            }
        }
    }

    async fn send(&self, channel: &ResolvedChannel, text: &str) -> Result<(), RelayError> {
        let session = self.client.open_session(&self.token);
        let post_req = SlackApiChatPostMessageRequest::new(
            SlackChannelId(channel.id.clone()),
            SlackMessageContent::new().with_text(text.to_string()),
        );

        session.chat_post_message(&post_req).await?;
        Ok(())
    }
}
