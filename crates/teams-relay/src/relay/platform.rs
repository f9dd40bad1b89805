//! The messaging platform seam and the values that flow through it.

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

use super::error::RelayError;
use crate::email::EmailAddress;
use crate::secret::Secret;

/// The four outbound stages of a send.
///
/// Each method consumes the previous stage's output, so the chain can only be
/// driven in order.
#[async_trait]
pub trait MessagingPlatform: Send + Sync {
    /// Exchange the service identity for a bearer token.
    async fn acquire_token(&self) -> Result<AccessToken, RelayError>;

    /// Look up the platform id of the user with this email.
    async fn resolve_user(
        &self,
        token: &AccessToken,
        email: &EmailAddress,
    ) -> Result<UserId, RelayError>;

    /// Create (or let the platform reuse) a one-to-one chat with `user`.
    async fn establish_conversation(
        &self,
        token: &AccessToken,
        user: &UserId,
    ) -> Result<ConversationId, RelayError>;

    /// Post `content` into the chat.
    async fn dispatch(
        &self,
        token: &AccessToken,
        conversation: &ConversationId,
        content: &str,
    ) -> Result<SendResult, RelayError>;
}

// ============================================================================
// Values
// ============================================================================

/// Bearer token for one send. Never printed.
#[derive(Debug, Clone)]
pub struct AccessToken(Secret);

impl AccessToken {
    pub fn new(bearer: impl Into<String>) -> Self {
        Self(Secret::new(bearer))
    }

    pub fn bearer(&self) -> &str {
        self.0.expose()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationId(String);

impl ConversationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Sent,
}

/// What the caller gets back from a successful send.
#[derive(Debug, Clone, Serialize)]
pub struct SendResult {
    pub status: DeliveryStatus,
    /// The platform's message resource, passed through untouched.
    pub data: serde_json::Value,
}

impl SendResult {
    pub fn sent(data: serde_json::Value) -> Self {
        Self {
            status: DeliveryStatus::Sent,
            data,
        }
    }
}
