//! Send orchestration: validate, then token → user → chat → message.

mod error;
mod platform;

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::email::EmailAddress;

pub use error::{CallError, RelayError};
pub use platform::{
    AccessToken, ConversationId, DeliveryStatus, MessagingPlatform, SendResult, UserId,
};

/// Progress of a single send.
///
/// Transitions only move forward; any failure moves to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendStage {
    Idle,
    TokenAcquired,
    UserResolved,
    ConversationEstablished,
    MessageSent,
    Failed,
}

impl SendStage {
    pub fn is_terminal(self) -> bool {
        matches!(self, SendStage::MessageSent | SendStage::Failed)
    }
}

impl fmt::Display for SendStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SendStage::Idle => "idle",
            SendStage::TokenAcquired => "token_acquired",
            SendStage::UserResolved => "user_resolved",
            SendStage::ConversationEstablished => "conversation_established",
            SendStage::MessageSent => "message_sent",
            SendStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Drives a send through a [`MessagingPlatform`].
///
/// Holds no per-request state; clones share the platform.
#[derive(Clone)]
pub struct Relay {
    platform: Arc<dyn MessagingPlatform>,
}

impl Relay {
    pub fn new(platform: Arc<dyn MessagingPlatform>) -> Self {
        Self { platform }
    }

    /// Deliver `content` to the user whose email is `recipient`.
    ///
    /// Stops at the first failing stage and returns its error unchanged. A chat
    /// created before a failed dispatch is left in place.
    pub async fn send_message(
        &self,
        recipient: &str,
        content: &str,
    ) -> Result<SendResult, RelayError> {
        let email = EmailAddress::parse(recipient)?;
        if content.is_empty() {
            return Err(RelayError::Validation("message must not be empty".into()));
        }

        let result = self.run(&email, content).await;
        if let Err(ref e) = result {
            warn!(
                recipient = %email,
                kind = e.kind(),
                failed_at = %e.failed_at(),
                stage = %SendStage::Failed,
                error = %e,
                "send failed"
            );
            if let Some(body) = e.upstream_body() {
                debug!(kind = e.kind(), body, "upstream error body");
            }
        }
        result
    }

    async fn run(&self, email: &EmailAddress, content: &str) -> Result<SendResult, RelayError> {
        let token = self.platform.acquire_token().await?;
        info!(stage = %SendStage::TokenAcquired, "access token acquired");

        let user = self.platform.resolve_user(&token, email).await?;
        info!(
            stage = %SendStage::UserResolved,
            recipient = %email,
            user_id = %user,
            "user resolved"
        );

        let conversation = self.platform.establish_conversation(&token, &user).await?;
        info!(
            stage = %SendStage::ConversationEstablished,
            chat_id = %conversation,
            "conversation established"
        );

        let sent = self
            .platform
            .dispatch(&token, &conversation, content)
            .await?;
        info!(stage = %SendStage::MessageSent, chat_id = %conversation, "message sent");

        Ok(sent)
    }
}

// ============================================================================
// Tests
// ============================================================================
