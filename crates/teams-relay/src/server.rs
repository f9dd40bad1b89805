use std::time::{Duration, Instant};

use axum::Router;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use tower_http::timeout::TimeoutLayer;
use tracing::info;

use crate::handlers;
use crate::relay::Relay;
use crate::response;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub relay: Relay,
}

pub fn build_app(state: AppState, request_timeout_secs: u64) -> Router {
    let router = Router::new()
        .route("/send_message", post(handlers::send_message))
        .with_state(state)
        .route("/livez", get(handlers::livez))
        .route("/readyz", get(handlers::readyz))
        .route("/version", get(handlers::version));
    with_layers(router, Duration::from_secs(request_timeout_secs))
}

fn with_layers(router: Router, timeout: Duration) -> Router {
    router
        .layer(middleware::from_fn(log_requests))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(middleware::map_response(timeout_body))
}

/// The timeout layer answers with an empty body; give it the usual error shape.
async fn timeout_body(res: Response) -> Response {
    if res.status() == StatusCode::REQUEST_TIMEOUT {
        return response::error(StatusCode::REQUEST_TIMEOUT, response::TIMED_OUT);
    }
    res
}

async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    info!(%method, %uri, "request received");

    let started = Instant::now();
    let response = next.run(request).await;

    info!(
        %method,
        %uri,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "response sent"
    );
    response
}
