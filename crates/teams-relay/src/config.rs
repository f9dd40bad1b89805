use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use tokio::fs;

use serde::Deserialize;
use thiserror::Error;

use crate::secret::Secret;

// ============================================================================
// Config (root)
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub graph: GraphConfig,
}

impl Config {
    /// Read the YAML config file. A missing file yields the defaults.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = match fs::read_to_string(path).await {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(ConfigError::Io(e)),
        };
        Ok(serde_saphyr::from_str(&contents)?)
    }

    /// Overlay values from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Overlay values from `lookup`. Empty values are ignored.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let graph = &mut self.graph;

        if let Some(v) = get(ENV_CLIENT_ID) {
            graph.client_id = Some(v);
        }
        if let Some(v) = get(ENV_CLIENT_SECRET) {
            graph.client_secret = Some(Secret::new(v));
        }
        if let Some(v) = get(ENV_TENANT_ID) {
            graph.tenant_id = Some(v);
        }
        if let Some(v) = get(ENV_SCOPE) {
            graph.scope = v;
        }
        if let Some(v) = get(ENV_AUTHORITY) {
            graph.authority_url = v;
        }
        if let Some(v) = get(ENV_GRAPH_API_ENDPOINT) {
            graph.api_base_url = v;
        }
    }
}

pub const ENV_CLIENT_ID: &str = "CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "CLIENT_SECRET";
pub const ENV_TENANT_ID: &str = "TENANT_ID";
pub const ENV_SCOPE: &str = "SCOPE";
/// Authority host, with or without the tenant as its last path segment.
pub const ENV_AUTHORITY: &str = "AUTHORITY";
pub const ENV_GRAPH_API_ENDPOINT: &str = "GRAPH_API_ENDPOINT";

// ============================================================================
// ServerConfig
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    300
}

// ============================================================================
// GraphConfig
// ============================================================================

/// Microsoft identity and Graph API settings.
#[derive(Debug, Deserialize)]
pub struct GraphConfig {
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<Secret>,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default = "default_scope")]
    pub scope: String,
    #[serde(default = "default_authority_url")]
    pub authority_url: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Per-call timeout for outbound requests. Unset means no timeout.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            tenant_id: None,
            scope: default_scope(),
            authority_url: default_authority_url(),
            api_base_url: default_api_base_url(),
            timeout_seconds: None,
        }
    }
}

impl GraphConfig {
    /// Freeze the service identity. Fails if a required field is missing.
    pub fn credentials(&self) -> Result<ServiceCredentials, ConfigError> {
        let client_id = required(self.client_id.as_deref(), "graph.client_id")?;
        let tenant_id = required(self.tenant_id.as_deref(), "graph.tenant_id")?;
        let client_secret = match &self.client_secret {
            Some(s) if !s.is_empty() => s.clone(),
            _ => return Err(ConfigError::Missing("graph.client_secret")),
        };

        Ok(ServiceCredentials {
            client_id,
            client_secret,
            tenant_id,
            scope: self.scope.clone(),
            authority_url: self.authority_url.clone(),
        })
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

fn required(value: Option<&str>, field: &'static str) -> Result<String, ConfigError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ConfigError::Missing(field)),
    }
}

fn default_scope() -> String {
    "https://graph.microsoft.com/.default".to_string()
}

fn default_authority_url() -> String {
    "https://login.microsoftonline.com".to_string()
}

fn default_api_base_url() -> String {
    "https://graph.microsoft.com/v1.0".to_string()
}

// ============================================================================
// ServiceCredentials
// ============================================================================

/// The service identity used for the client-credentials exchange.
///
/// Built once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct ServiceCredentials {
    pub client_id: String,
    pub client_secret: Secret,
    pub tenant_id: String,
    pub scope: String,
    pub authority_url: String,
}

// ============================================================================
// ConfigError
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Yaml(#[from] serde_saphyr::Error),

    #[error("missing required setting: {0}")]
    Missing(&'static str),
}

// ============================================================================
// Tests
// ============================================================================
