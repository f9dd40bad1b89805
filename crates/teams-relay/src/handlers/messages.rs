//! Message relay HTTP handler.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::response;
use crate::server::AppState;

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    /// Recipient email. `user_email` is accepted for older clients.
    #[serde(alias = "user_email")]
    recipient: String,
    message: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /send_message
pub async fn send_message(
    State(state): State<AppState>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            warn!(error = %rejection, "rejected malformed send request");
            return response::bad_request();
        }
    };

    if req.recipient.trim().is_empty() || req.message.is_empty() {
        warn!("rejected send request with empty fields");
        return response::bad_request();
    }

    info!(recipient = %req.recipient, "send request received");

    match state.relay.send_message(&req.recipient, &req.message).await {
        Ok(result) => {
            info!(recipient = %req.recipient, "send request completed");
            (StatusCode::OK, Json(result)).into_response()
        }
        Err(e) if e.status_code() == StatusCode::BAD_REQUEST => {
            warn!(recipient = %req.recipient, error = %e, "send request rejected");
            response::bad_request()
        }
        Err(e) => {
            error!(
                recipient = %req.recipient,
                kind = e.kind(),
                error = %e,
                "send request failed"
            );
            response::internal_error()
        }
    }
}
