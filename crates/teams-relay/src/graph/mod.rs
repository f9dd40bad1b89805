//! Microsoft Graph client for one-to-one Teams chats.

mod client;
mod types;

pub use client::{GraphClient, build_http_client};
