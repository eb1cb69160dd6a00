//! Connection configuration
//!
//! Settings are gathered raw from the environment (and CLI flags on top),
//! then validated once into an immutable [`WeaviateConfig`]. Local and cloud
//! parameters live in separate [`Connection`] variants, so a validated config
//! never carries parameters of the mode it is not using.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use core_config::{ConfigError, FromEnv, env_optional, env_parse};
use reqwest::header::{HeaderName, HeaderValue};
use serde::Serialize;
use thiserror::Error;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_GRPC_PORT: u16 = 50051;
pub const DEFAULT_TIMEOUT_INIT_SECS: u64 = 30;
pub const DEFAULT_TIMEOUT_QUERY_SECS: u64 = 60;
pub const DEFAULT_TIMEOUT_INSERT_SECS: u64 = 120;
pub const DEFAULT_STARTUP_PERIOD_SECS: u64 = 5;

pub const OPENAI_KEY_HEADER: &str = "X-OpenAI-Api-Key";
pub const COHERE_KEY_HEADER: &str = "X-Cohere-Api-Key";

const MASK: &str = "***";

/// Which kind of deployment to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionType {
    Local,
    Cloud,
}

impl fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionType::Local => write!(f, "local"),
            ConnectionType::Cloud => write!(f, "cloud"),
        }
    }
}

impl FromStr for ConnectionType {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(ConnectionType::Local),
            "cloud" => Ok(ConnectionType::Cloud),
            _ => Err(SettingsError::InvalidConnectionType(s.to_string())),
        }
    }
}

/// A parameter that cloud connections cannot do without
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredParameter {
    ClusterUrl,
    ApiKey,
}

impl RequiredParameter {
    pub fn env_var(&self) -> &'static str {
        match self {
            RequiredParameter::ClusterUrl => "WEAVIATE_CLUSTER_URL",
            RequiredParameter::ApiKey => "WEAVIATE_API_KEY",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RequiredParameter::ClusterUrl => "Weaviate Cloud Services cluster URL",
            RequiredParameter::ApiKey => "API key for Weaviate Cloud Services",
        }
    }
}

/// Configuration validation failure. Rendered for humans: this is what the
/// binary prints before exiting when startup configuration is unusable.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(
        "Configuration Error: WEAVIATE_CONNECTION_TYPE: Connection type (local or cloud), got '{0}'"
    )]
    InvalidConnectionType(String),

    #[error("{}", missing_parameters_message(.connection, .missing))]
    MissingParameters {
        connection: ConnectionType,
        missing: Vec<RequiredParameter>,
    },

    #[error("Configuration Error: {key}: {details}")]
    InvalidValue { key: &'static str, details: String },

    #[error("Configuration Error: invalid header '{name}': {details}")]
    InvalidHeader { name: String, details: String },
}

fn missing_parameters_message(
    connection: &ConnectionType,
    missing: &[RequiredParameter],
) -> String {
    let mut message = format!(
        "Configuration Error: Missing required parameters for {} connection:",
        connection
    );
    for param in missing {
        message.push_str(&format!("\n  - {}: {}", param.env_var(), param.description()));
    }
    message
}

/// Raw, unvalidated settings. Every field is optional so that sources can be
/// layered (environment first, CLI flags over it) before validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeaviateSettings {
    pub connection_type: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub grpc_port: Option<u16>,
    pub cluster_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_init: Option<u64>,
    pub timeout_query: Option<u64>,
    pub timeout_insert: Option<u64>,
    pub startup_period: Option<u64>,
    pub openai_api_key: Option<String>,
    pub cohere_api_key: Option<String>,
    pub additional_headers: BTreeMap<String, String>,
}

impl FromEnv for WeaviateSettings {
    /// Reads the `WEAVIATE_*` variables plus `OPENAI_API_KEY` and
    /// `COHERE_API_KEY`. Nothing is required at this stage.
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            connection_type: env_optional("WEAVIATE_CONNECTION_TYPE"),
            host: env_optional("WEAVIATE_HOST"),
            port: env_parse("WEAVIATE_PORT")?,
            grpc_port: env_parse("WEAVIATE_GRPC_PORT")?,
            cluster_url: env_optional("WEAVIATE_CLUSTER_URL"),
            api_key: env_optional("WEAVIATE_API_KEY"),
            timeout_init: env_parse("WEAVIATE_TIMEOUT_INIT")?,
            timeout_query: env_parse("WEAVIATE_TIMEOUT_QUERY")?,
            timeout_insert: env_parse("WEAVIATE_TIMEOUT_INSERT")?,
            startup_period: env_parse("WEAVIATE_STARTUP_PERIOD")?,
            openai_api_key: env_optional("OPENAI_API_KEY"),
            cohere_api_key: env_optional("COHERE_API_KEY"),
            additional_headers: BTreeMap::new(),
        })
    }
}

impl WeaviateSettings {
    /// Overlay `overrides` on top of `self`; set values in `overrides` win
    pub fn merge(self, overrides: WeaviateSettings) -> WeaviateSettings {
        let mut additional_headers = self.additional_headers;
        additional_headers.extend(overrides.additional_headers);

        WeaviateSettings {
            connection_type: overrides.connection_type.or(self.connection_type),
            host: overrides.host.or(self.host),
            port: overrides.port.or(self.port),
            grpc_port: overrides.grpc_port.or(self.grpc_port),
            cluster_url: overrides.cluster_url.or(self.cluster_url),
            api_key: overrides.api_key.or(self.api_key),
            timeout_init: overrides.timeout_init.or(self.timeout_init),
            timeout_query: overrides.timeout_query.or(self.timeout_query),
            timeout_insert: overrides.timeout_insert.or(self.timeout_insert),
            startup_period: overrides.startup_period.or(self.startup_period),
            openai_api_key: overrides.openai_api_key.or(self.openai_api_key),
            cohere_api_key: overrides.cohere_api_key.or(self.cohere_api_key),
            additional_headers,
        }
    }

    /// Validate into a usable configuration.
    ///
    /// Connection type defaults to local, and local parameters default to
    /// `localhost:8080` (gRPC 50051). Cloud requires both a cluster URL and an
    /// API key; all missing values are reported together.
    pub fn validate(self) -> Result<WeaviateConfig, SettingsError> {
        let connection_type = match non_empty(self.connection_type) {
            Some(raw) => raw.parse()?,
            None => ConnectionType::Local,
        };

        let connection = match connection_type {
            ConnectionType::Local => Connection::Local {
                host: non_empty(self.host).unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port: valid_port("WEAVIATE_PORT", self.port.unwrap_or(DEFAULT_PORT))?,
                grpc_port: valid_port(
                    "WEAVIATE_GRPC_PORT",
                    self.grpc_port.unwrap_or(DEFAULT_GRPC_PORT),
                )?,
            },
            ConnectionType::Cloud => {
                match (non_empty(self.cluster_url), non_empty(self.api_key)) {
                    (Some(cluster_url), Some(api_key)) => Connection::Cloud {
                        cluster_url,
                        api_key,
                    },
                    (cluster_url, api_key) => {
                        let mut missing = Vec::new();
                        if cluster_url.is_none() {
                            missing.push(RequiredParameter::ClusterUrl);
                        }
                        if api_key.is_none() {
                            missing.push(RequiredParameter::ApiKey);
                        }
                        return Err(SettingsError::MissingParameters {
                            connection: ConnectionType::Cloud,
                            missing,
                        });
                    }
                }
            }
        };

        for (name, value) in &self.additional_headers {
            validate_header(name, value)?;
        }

        Ok(WeaviateConfig {
            connection,
            timeout_init: self.timeout_init.unwrap_or(DEFAULT_TIMEOUT_INIT_SECS),
            timeout_query: self.timeout_query.unwrap_or(DEFAULT_TIMEOUT_QUERY_SECS),
            timeout_insert: self.timeout_insert.unwrap_or(DEFAULT_TIMEOUT_INSERT_SECS),
            startup_period: self.startup_period.unwrap_or(DEFAULT_STARTUP_PERIOD_SECS),
            openai_api_key: non_empty(self.openai_api_key),
            cohere_api_key: non_empty(self.cohere_api_key),
            additional_headers: self.additional_headers,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn valid_port(key: &'static str, port: u16) -> Result<u16, SettingsError> {
    if port == 0 {
        return Err(SettingsError::InvalidValue {
            key,
            details: "port must be between 1 and 65535".to_string(),
        });
    }
    Ok(port)
}

fn validate_header(name: &str, value: &str) -> Result<(), SettingsError> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|e| SettingsError::InvalidHeader {
        name: name.to_string(),
        details: e.to_string(),
    })?;
    HeaderValue::from_str(value).map_err(|e| SettingsError::InvalidHeader {
        name: name.to_string(),
        details: e.to_string(),
    })?;
    Ok(())
}

/// Connection target, one variant per deployment kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Connection {
    Local {
        host: String,
        port: u16,
        grpc_port: u16,
    },
    Cloud {
        cluster_url: String,
        api_key: String,
    },
}

/// Validated configuration, shared read-only for the process lifetime
#[derive(Debug, Clone, PartialEq)]
pub struct WeaviateConfig {
    pub connection: Connection,
    pub timeout_init: u64,
    pub timeout_query: u64,
    pub timeout_insert: u64,
    pub startup_period: u64,
    pub openai_api_key: Option<String>,
    pub cohere_api_key: Option<String>,
    pub additional_headers: BTreeMap<String, String>,
}

impl WeaviateConfig {
    /// Local configuration with default ports and timeouts
    pub fn local(host: impl Into<String>, port: u16, grpc_port: u16) -> Self {
        Self::with_connection(Connection::Local {
            host: host.into(),
            port,
            grpc_port,
        })
    }

    /// Cloud configuration with default timeouts
    pub fn cloud(cluster_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_connection(Connection::Cloud {
            cluster_url: cluster_url.into(),
            api_key: api_key.into(),
        })
    }

    fn with_connection(connection: Connection) -> Self {
        Self {
            connection,
            timeout_init: DEFAULT_TIMEOUT_INIT_SECS,
            timeout_query: DEFAULT_TIMEOUT_QUERY_SECS,
            timeout_insert: DEFAULT_TIMEOUT_INSERT_SECS,
            startup_period: DEFAULT_STARTUP_PERIOD_SECS,
            openai_api_key: None,
            cohere_api_key: None,
            additional_headers: BTreeMap::new(),
        }
    }

    pub fn connection_type(&self) -> ConnectionType {
        match self.connection {
            Connection::Local { .. } => ConnectionType::Local,
            Connection::Cloud { .. } => ConnectionType::Cloud,
        }
    }

    /// REST base URL, without trailing slash
    pub fn base_url(&self) -> String {
        match &self.connection {
            Connection::Local { host, port, .. } => format!("http://{}:{}", host, port),
            Connection::Cloud { cluster_url, .. } => {
                let url = cluster_url.trim_end_matches('/');
                if url.contains("://") {
                    url.to_string()
                } else {
                    format!("https://{}", url)
                }
            }
        }
    }

    /// gRPC endpoint as `host:port`. Cloud clusters expose gRPC on the
    /// `grpc-` prefixed hostname, port 443.
    pub fn grpc_target(&self) -> String {
        match &self.connection {
            Connection::Local {
                host, grpc_port, ..
            } => format!("{}:{}", host, grpc_port),
            Connection::Cloud { cluster_url, .. } => {
                let host = cluster_url
                    .split_once("://")
                    .map_or(cluster_url.as_str(), |(_, rest)| rest)
                    .trim_end_matches('/');
                format!("grpc-{}:443", host)
            }
        }
    }

    pub fn api_key(&self) -> Option<&str> {
        match &self.connection {
            Connection::Cloud { api_key, .. } => Some(api_key),
            Connection::Local { .. } => None,
        }
    }

    /// Headers sent with every request: provider keys first, explicit
    /// headers on top.
    pub fn headers(&self) -> BTreeMap<String, String> {
        let mut headers = BTreeMap::new();
        if let Some(key) = &self.openai_api_key {
            headers.insert(OPENAI_KEY_HEADER.to_string(), key.clone());
        }
        if let Some(key) = &self.cohere_api_key {
            headers.insert(COHERE_KEY_HEADER.to_string(), key.clone());
        }
        headers.extend(self.additional_headers.clone());
        headers
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        seconds(self.timeout_init)
    }

    pub fn query_timeout(&self) -> Option<Duration> {
        seconds(self.timeout_query)
    }

    pub fn startup_period(&self) -> Duration {
        Duration::from_secs(self.startup_period)
    }

    /// Masked view, safe to log or hand to a model
    pub fn summary(&self) -> ConfigSummary {
        let (host, port, grpc_port, cluster_url) = match &self.connection {
            Connection::Local {
                host,
                port,
                grpc_port,
            } => (Some(host.clone()), Some(*port), Some(*grpc_port), None),
            Connection::Cloud { cluster_url, .. } => (None, None, None, Some(cluster_url.clone())),
        };

        ConfigSummary {
            connection_type: self.connection_type(),
            host,
            port,
            grpc_port,
            cluster_url,
            api_key: self.api_key().map(|_| MASK),
            timeout_init: self.timeout_init,
            timeout_query: self.timeout_query,
            timeout_insert: self.timeout_insert,
            startup_period: self.startup_period,
            cohere_api_key: self.cohere_api_key.as_ref().map(|_| MASK),
            openai_api_key: self.openai_api_key.as_ref().map(|_| MASK),
            additional_headers: self.headers().into_keys().map(|k| (k, MASK)).collect(),
        }
    }
}

fn seconds(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// Configuration with every secret replaced by `***`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigSummary {
    pub connection_type: ConnectionType,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub grpc_port: Option<u16>,
    pub cluster_url: Option<String>,
    pub api_key: Option<&'static str>,
    pub timeout_init: u64,
    pub timeout_query: u64,
    pub timeout_insert: u64,
    pub startup_period: u64,
    pub cohere_api_key: Option<&'static str>,
    pub openai_api_key: Option<&'static str>,
    pub additional_headers: BTreeMap<String, &'static str>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEAVIATE_VARS: [&str; 12] = [
        "WEAVIATE_CONNECTION_TYPE",
        "WEAVIATE_HOST",
        "WEAVIATE_PORT",
        "WEAVIATE_GRPC_PORT",
        "WEAVIATE_CLUSTER_URL",
        "WEAVIATE_API_KEY",
        "WEAVIATE_TIMEOUT_INIT",
        "WEAVIATE_TIMEOUT_QUERY",
        "WEAVIATE_TIMEOUT_INSERT",
        "WEAVIATE_STARTUP_PERIOD",
        "OPENAI_API_KEY",
        "COHERE_API_KEY",
    ];

    /// Run `f` with all config variables unset except the given ones
    fn with_env<F: FnOnce()>(set: &[(&str, &str)], f: F) {
        let vars: Vec<(&str, Option<&str>)> = WEAVIATE_VARS
            .iter()
            .map(|key| {
                let value = set.iter().find(|(k, _)| k == key).map(|(_, v)| *v);
                (*key, value)
            })
            .collect();
        temp_env::with_vars(vars, f);
    }

    fn cloud_settings() -> WeaviateSettings {
        WeaviateSettings {
            connection_type: Some("cloud".to_string()),
            cluster_url: Some("https://test.weaviate.network".to_string()),
            api_key: Some("test-api-key".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_settings_default_to_local() {
        let config = WeaviateSettings::default().validate().unwrap();

        assert_eq!(config.connection_type(), ConnectionType::Local);
        assert_eq!(
            config.connection,
            Connection::Local {
                host: "localhost".to_string(),
                port: 8080,
                grpc_port: 50051,
            }
        );
        assert_eq!(config.timeout_init, 30);
        assert_eq!(config.timeout_query, 60);
        assert_eq!(config.timeout_insert, 120);
        assert_eq!(config.startup_period, 5);
        assert_eq!(config.base_url(), "http://localhost:8080");
        assert_eq!(config.grpc_target(), "localhost:50051");
    }

    #[test]
    fn test_cloud_config_valid() {
        let config = cloud_settings().validate().unwrap();

        assert_eq!(config.connection_type(), ConnectionType::Cloud);
        assert_eq!(config.api_key(), Some("test-api-key"));
        assert_eq!(config.base_url(), "https://test.weaviate.network");
        assert_eq!(config.grpc_target(), "grpc-test.weaviate.network:443");
    }

    #[test]
    fn test_cloud_url_without_scheme_gets_https() {
        let settings = WeaviateSettings {
            cluster_url: Some("my-cluster.weaviate.cloud/".to_string()),
            ..cloud_settings()
        };
        let config = settings.validate().unwrap();
        assert_eq!(config.base_url(), "https://my-cluster.weaviate.cloud");
    }

    #[test]
    fn test_cloud_config_missing_cluster_url() {
        let settings = WeaviateSettings {
            cluster_url: None,
            ..cloud_settings()
        };
        let err = settings.validate().unwrap_err();

        let message = err.to_string();
        assert!(message.contains("Missing required parameters for cloud connection"));
        assert!(message.contains("WEAVIATE_CLUSTER_URL: Weaviate Cloud Services cluster URL"));
        assert!(!message.contains("WEAVIATE_API_KEY"));
    }

    #[test]
    fn test_cloud_config_missing_api_key() {
        let settings = WeaviateSettings {
            api_key: Some("   ".to_string()),
            ..cloud_settings()
        };
        let err = settings.validate().unwrap_err();

        match err {
            SettingsError::MissingParameters {
                connection,
                missing,
            } => {
                assert_eq!(connection, ConnectionType::Cloud);
                assert_eq!(missing, vec![RequiredParameter::ApiKey]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_cloud_config_reports_every_missing_parameter() {
        let settings = WeaviateSettings {
            connection_type: Some("cloud".to_string()),
            ..Default::default()
        };
        let message = settings.validate().unwrap_err().to_string();

        assert!(message.contains("WEAVIATE_CLUSTER_URL"));
        assert!(message.contains("WEAVIATE_API_KEY"));
    }

    #[test]
    fn test_invalid_connection_type() {
        let settings = WeaviateSettings {
            connection_type: Some("hybrid".to_string()),
            ..Default::default()
        };
        let message = settings.validate().unwrap_err().to_string();
        assert!(message.contains("WEAVIATE_CONNECTION_TYPE: Connection type (local or cloud)"));
        assert!(message.contains("hybrid"));
    }

    #[test]
    fn test_connection_type_is_case_sensitive() {
        assert_eq!("cloud".parse::<ConnectionType>().unwrap(), ConnectionType::Cloud);
        assert_eq!("local".parse::<ConnectionType>().unwrap(), ConnectionType::Local);

        for raw in ["LOCAL", "Local", "CLOUD", "Cloud"] {
            assert!(
                matches!(
                    raw.parse::<ConnectionType>(),
                    Err(SettingsError::InvalidConnectionType(ref got)) if got == raw
                ),
                "{raw} should be rejected"
            );
        }

        let settings = WeaviateSettings {
            connection_type: Some("LOCAL".to_string()),
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_grpc_target() {
        let local = WeaviateConfig::local("weaviate", 8080, 50052);
        assert_eq!(local.grpc_target(), "weaviate:50052");

        let cloud = WeaviateConfig::cloud("https://my-cluster.weaviate.network/", "key");
        assert_eq!(cloud.grpc_target(), "grpc-my-cluster.weaviate.network:443");

        let bare = WeaviateConfig::cloud("my-cluster.weaviate.network", "key");
        assert_eq!(bare.grpc_target(), "grpc-my-cluster.weaviate.network:443");
    }

    #[test]
    fn test_local_config_discards_cloud_params() {
        let settings = WeaviateSettings {
            connection_type: Some("local".to_string()),
            cluster_url: Some("https://should-be-cleared.com".to_string()),
            api_key: Some("should-be-cleared".to_string()),
            ..Default::default()
        };
        let config = settings.validate().unwrap();

        assert_eq!(config.api_key(), None);
        let summary = config.summary();
        assert_eq!(summary.cluster_url, None);
        assert_eq!(summary.api_key, None);
    }

    #[test]
    fn test_cloud_config_discards_local_params() {
        let settings = WeaviateSettings {
            host: Some("should-be-cleared".to_string()),
            port: Some(9999),
            grpc_port: Some(9998),
            ..cloud_settings()
        };
        let summary = settings.validate().unwrap().summary();

        assert_eq!(summary.host, None);
        assert_eq!(summary.port, None);
        assert_eq!(summary.grpc_port, None);
    }

    #[test]
    fn test_port_zero_rejected() {
        let settings = WeaviateSettings {
            port: Some(0),
            ..Default::default()
        };
        let message = settings.validate().unwrap_err().to_string();
        assert!(message.contains("WEAVIATE_PORT"));
    }

    #[test]
    fn test_port_edge_values_accepted() {
        for port in [1u16, 65535] {
            let settings = WeaviateSettings {
                port: Some(port),
                grpc_port: Some(port),
                ..Default::default()
            };
            let config = settings.validate().unwrap();
            assert_eq!(config.base_url(), format!("http://localhost:{}", port));
        }
    }

    #[test]
    fn test_zero_timeouts_disable_timeouts() {
        let settings = WeaviateSettings {
            timeout_init: Some(0),
            timeout_query: Some(0),
            timeout_insert: Some(0),
            ..Default::default()
        };
        let config = settings.validate().unwrap();

        assert_eq!(config.timeout_init, 0);
        assert_eq!(config.connect_timeout(), None);
        assert_eq!(config.query_timeout(), None);
        assert_eq!(config.summary().timeout_insert, 0);
    }

    #[test]
    fn test_invalid_header_name_rejected() {
        let mut settings = WeaviateSettings::default();
        settings
            .additional_headers
            .insert("Bad Header".to_string(), "value".to_string());

        let err = settings.validate().unwrap_err();
        assert!(matches!(err, SettingsError::InvalidHeader { .. }));
    }

    #[test]
    fn test_headers_merge_provider_keys_and_explicit_headers() {
        let mut settings = WeaviateSettings {
            openai_api_key: Some("openai-key".to_string()),
            cohere_api_key: Some("cohere-key".to_string()),
            ..Default::default()
        };
        settings
            .additional_headers
            .insert("X-Custom".to_string(), "value".to_string());
        let config = settings.validate().unwrap();

        assert_eq!(config.additional_headers.len(), 1);
        let headers = config.headers();
        assert_eq!(headers.get(OPENAI_KEY_HEADER).map(String::as_str), Some("openai-key"));
        assert_eq!(headers.get(COHERE_KEY_HEADER).map(String::as_str), Some("cohere-key"));
        assert_eq!(headers.get("X-Custom").map(String::as_str), Some("value"));
    }

    #[test]
    fn test_summary_masks_every_secret() {
        let mut settings = WeaviateSettings {
            cohere_api_key: Some("secret-cohere-key".to_string()),
            ..cloud_settings()
        };
        settings
            .additional_headers
            .insert("X-Test".to_string(), "value".to_string());
        let summary = settings.validate().unwrap().summary();

        assert_eq!(summary.api_key, Some("***"));
        assert_eq!(summary.cohere_api_key, Some("***"));
        assert_eq!(summary.openai_api_key, None);
        assert_eq!(summary.cluster_url.as_deref(), Some("https://test.weaviate.network"));

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["additional_headers"]["X-Test"], "***");
        assert_eq!(json["additional_headers"]["X-Cohere-Api-Key"], "***");
        assert_eq!(json["connection_type"], "cloud");
        assert!(json["host"].is_null());
        assert!(!json.to_string().contains("secret"));
        assert!(!json.to_string().contains("test-api-key"));
    }

    #[test]
    fn test_merge_prefers_overrides() {
        let base = WeaviateSettings {
            host: Some("env-host".to_string()),
            port: Some(9080),
            ..Default::default()
        };
        let overrides = WeaviateSettings {
            host: Some("cli-host".to_string()),
            ..Default::default()
        };
        let merged = base.merge(overrides);

        assert_eq!(merged.host.as_deref(), Some("cli-host"));
        assert_eq!(merged.port, Some(9080));
    }

    #[test]
    fn test_load_local_settings_from_env() {
        with_env(
            &[
                ("WEAVIATE_CONNECTION_TYPE", "local"),
                ("WEAVIATE_HOST", "test-host"),
                ("WEAVIATE_PORT", "9080"),
                ("WEAVIATE_GRPC_PORT", "51051"),
                ("WEAVIATE_TIMEOUT_INIT", "45"),
                ("WEAVIATE_TIMEOUT_QUERY", "90"),
                ("WEAVIATE_TIMEOUT_INSERT", "180"),
            ],
            || {
                let config = WeaviateSettings::from_env().unwrap().validate().unwrap();

                assert_eq!(
                    config.connection,
                    Connection::Local {
                        host: "test-host".to_string(),
                        port: 9080,
                        grpc_port: 51051,
                    }
                );
                assert_eq!(config.timeout_init, 45);
                assert_eq!(config.timeout_query, 90);
                assert_eq!(config.timeout_insert, 180);
            },
        );
    }

    #[test]
    fn test_load_cloud_settings_with_provider_keys_from_env() {
        with_env(
            &[
                ("WEAVIATE_CONNECTION_TYPE", "cloud"),
                ("WEAVIATE_CLUSTER_URL", "https://env-test.weaviate.network"),
                ("WEAVIATE_API_KEY", "env-api-key"),
                ("OPENAI_API_KEY", "env-openai-key"),
                ("COHERE_API_KEY", "env-cohere-key"),
            ],
            || {
                let config = WeaviateSettings::from_env().unwrap().validate().unwrap();

                assert_eq!(config.api_key(), Some("env-api-key"));
                assert_eq!(config.base_url(), "https://env-test.weaviate.network");
                let headers = config.headers();
                assert_eq!(headers[OPENAI_KEY_HEADER], "env-openai-key");
                assert_eq!(headers[COHERE_KEY_HEADER], "env-cohere-key");
            },
        );
    }

    #[test]
    fn test_load_settings_invalid_number_from_env() {
        with_env(&[("WEAVIATE_TIMEOUT_QUERY", "soon")], || {
            let err = WeaviateSettings::from_env().unwrap_err();
            assert!(err.to_string().contains("WEAVIATE_TIMEOUT_QUERY"));
        });
    }

    #[test]
    fn test_load_cloud_without_credentials_fails_validation() {
        with_env(&[("WEAVIATE_CONNECTION_TYPE", "cloud")], || {
            let result = WeaviateSettings::from_env().unwrap().validate();
            assert!(matches!(
                result,
                Err(SettingsError::MissingParameters { .. })
            ));
        });
    }
}
