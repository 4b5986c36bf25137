//! Configuration management for LaunchCore.
//!
//! The configuration is assembled once at process start from built-in
//! defaults, an optional TOML file, and environment variables (in that
//! order of precedence), and is read-only afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::debug;

use crate::error::{CoreError, Result};

/// Environment variable naming an optional TOML configuration file.
pub const CONFIG_PATH_VAR: &str = "LAUNCH_API_CONFIG";

/// Complete service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Backing table settings
    pub store: StoreConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// TCP port to listen on
    pub port: u16,
    /// Log output format
    pub log_format: LogFormat,
    /// Deployment environment label
    pub environment: String,
    /// Debug mode flag
    pub debug: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            log_format: LogFormat::Pretty,
            environment: "development".to_string(),
            debug: true,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    Pretty,
    /// One JSON object per line
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(CoreError::Config(format!("unknown log format '{other}'"))),
        }
    }
}

/// Backing table connection settings
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Table holding launch records
    pub table_name: String,
    /// AWS region
    pub region: String,
    /// Endpoint override, e.g. DynamoDB Local
    pub endpoint_url: Option<String>,
    /// Static access key id
    pub access_key_id: Option<String>,
    /// Static secret access key
    pub secret_access_key: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            table_name: "spacex-launches-dev".to_string(),
            region: "us-east-1".to_string(),
            endpoint_url: None,
            access_key_id: None,
            secret_access_key: None,
        }
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("table_name", &self.table_name)
            .field("region", &self.region)
            .field("endpoint_url", &self.endpoint_url)
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// How the store client obtains credentials
#[derive(Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Fixed key pair
    Static {
        /// Access key id
        access_key_id: String,
        /// Secret access key
        secret_access_key: String,
    },
    /// The AWS default provider chain (env, profile, IMDS, ...)
    DefaultChain,
}

impl fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Static { access_key_id, .. } => f
                .debug_struct("Static")
                .field("access_key_id", access_key_id)
                .finish_non_exhaustive(),
            CredentialSource::DefaultChain => f.write_str("DefaultChain"),
        }
    }
}

/// Placeholder key used against a local endpoint when none is configured.
const LOCAL_DUMMY_KEY: &str = "dummy";

impl StoreConfig {
    /// Resolve the credential source.
    ///
    /// A local endpoint override always gets static credentials, with
    /// `dummy` standing in for missing keys. Against AWS proper, static
    /// credentials are used only when both keys are present.
    pub fn credentials(&self) -> CredentialSource {
        if self.endpoint_url.is_some() {
            return CredentialSource::Static {
                access_key_id: self
                    .access_key_id
                    .clone()
                    .unwrap_or_else(|| LOCAL_DUMMY_KEY.to_string()),
                secret_access_key: self
                    .secret_access_key
                    .clone()
                    .unwrap_or_else(|| LOCAL_DUMMY_KEY.to_string()),
            };
        }

        match (&self.access_key_id, &self.secret_access_key) {
            (Some(access_key_id), Some(secret_access_key)) => CredentialSource::Static {
                access_key_id: access_key_id.clone(),
                secret_access_key: secret_access_key.clone(),
            },
            _ => CredentialSource::DefaultChain,
        }
    }
}

impl AppConfig {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match non_empty(lookup(CONFIG_PATH_VAR)) {
            Some(path) => {
                debug!(path = %path, "Loading configuration file");
                Self::from_file(path)?
            }
            None => Self::default(),
        };
        config.apply_overrides(&lookup)?;
        Ok(config)
    }

    /// Load a TOML configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse a TOML document. Missing sections and keys take defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn apply_overrides<F>(&mut self, lookup: &F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| non_empty(lookup(key));

        if let Some(host) = get("BIND_HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| CoreError::Config(format!("PORT must be a port number, got '{port}'")))?;
        }
        if let Some(format) = get("LOG_FORMAT") {
            self.server.log_format = format.parse()?;
        }
        if let Some(environment) = get("ENVIRONMENT") {
            self.server.environment = environment;
        }
        if let Some(debug) = get("DEBUG") {
            self.server.debug = debug.eq_ignore_ascii_case("true");
        }

        if let Some(table_name) = get("DYNAMODB_TABLE_NAME") {
            self.store.table_name = table_name;
        }
        if let Some(region) = get("AWS_REGION") {
            self.store.region = region;
        }
        if let Some(endpoint_url) = get("DYNAMODB_ENDPOINT_URL") {
            self.store.endpoint_url = Some(endpoint_url);
        }
        if let Some(access_key_id) = get("AWS_ACCESS_KEY_ID") {
            self.store.access_key_id = Some(access_key_id);
        }
        if let Some(secret_access_key) = get("AWS_SECRET_ACCESS_KEY") {
            self.store.secret_access_key = Some(secret_access_key);
        }

        if self.store.table_name.is_empty() {
            return Err(CoreError::Config("table name must not be empty".to_string()));
        }
        Ok(())
    }

    /// Socket address string the server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
