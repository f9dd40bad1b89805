//! teams-relay - send a direct Teams message to a user by email.
//!
//! One inbound endpoint, `POST /send_message`, drives four outbound calls:
//! a client-credentials token exchange, a Graph user lookup, one-to-one chat
//! creation, and the message post.

pub mod config;
pub mod email;
pub mod graph;
pub mod handlers;
pub mod relay;
pub mod response;
pub mod secret;
pub mod server;
