//! HTTP request handlers.

mod health;
mod messages;
mod version;

pub use health::{livez, readyz};
pub use messages::send_message;
pub use version::version;
