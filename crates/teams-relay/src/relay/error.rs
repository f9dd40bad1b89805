//! Relay error types.

use axum::http::StatusCode;
use thiserror::Error;

use super::SendStage;

/// Why a single outbound call failed.
#[derive(Debug, Error)]
pub enum CallError {
    /// HTTP request failed before a response arrived
    #[error("http request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Upstream returned a non-success status
    #[error("upstream returned status {status}")]
    Status { status: u16, body: String },

    /// Response body could not be decoded
    #[error("failed to decode response body: {0}")]
    Decode(#[source] reqwest::Error),

    /// Response was successful but lacked a required field
    #[error("response is missing `{0}`")]
    MissingField(&'static str),
}

impl CallError {
    /// Read a failed response into a `Status` error.
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        CallError::Status { status, body }
    }
}

/// Errors that can end a send.
///
/// Each outbound stage has its own variant so the HTTP layer can map it to a
/// status code without inspecting messages.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("token exchange failed: {0}")]
    Auth(#[source] CallError),

    #[error("user lookup failed: {0}")]
    Resolution(#[source] CallError),

    #[error("chat creation failed: {0}")]
    Conversation(#[source] CallError),

    #[error("message dispatch failed: {0}")]
    Dispatch(#[source] CallError),

    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

impl RelayError {
    /// Last stage reached before this error ended the send.
    pub fn failed_at(&self) -> SendStage {
        match self {
            RelayError::Validation(_) | RelayError::Auth(_) | RelayError::Unexpected(_) => {
                SendStage::Idle
            }
            RelayError::Resolution(_) => SendStage::TokenAcquired,
            RelayError::Conversation(_) => SendStage::UserResolved,
            RelayError::Dispatch(_) => SendStage::ConversationEstablished,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short machine-readable label used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::Validation(_) => "validation",
            RelayError::Auth(_) => "auth",
            RelayError::Resolution(_) => "resolution",
            RelayError::Conversation(_) => "conversation",
            RelayError::Dispatch(_) => "dispatch",
            RelayError::Unexpected(_) => "unexpected",
        }
    }

    /// Upstream response body, if the failure carried one.
    pub fn upstream_body(&self) -> Option<&str> {
        match self {
            RelayError::Auth(CallError::Status { body, .. })
            | RelayError::Resolution(CallError::Status { body, .. })
            | RelayError::Conversation(CallError::Status { body, .. })
            | RelayError::Dispatch(CallError::Status { body, .. }) => Some(body),
            _ => None,
        }
    }
}
