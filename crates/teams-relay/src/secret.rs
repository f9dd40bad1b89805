//! Redacting wrapper for credentials.

use std::fmt;

use serde::Deserialize;

const REDACTED: &str = "[REDACTED]";

/// A string that never prints its contents.
///
/// `Debug` and `Display` both render `[REDACTED]`, so a secret that ends up in a
/// `tracing` field or an error message is masked at the sink. Use [`Secret::expose`]
/// at the single point where the raw value goes on the wire.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}
