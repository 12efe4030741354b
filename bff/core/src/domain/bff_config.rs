// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// BFF Configuration Types
//
// Defines the configuration schema for a process BFF node, including:
// - Kubernetes-style manifest format (apiVersion/kind/metadata/spec)
// - Process engine, object storage and form validator endpoints
// - Network and observability settings
// - Display title overrides for status messages

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const API_VERSION: &str = "process-bff/v1";
pub const KIND: &str = "BffConfig";

/// Top-level Kubernetes-style configuration manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BffConfigManifest {
    /// API version (must be "process-bff/v1")
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Resource kind (must be "BffConfig")
    pub kind: String,

    pub metadata: ManifestMetadata,

    pub spec: BffConfigSpec,
}

/// Manifest metadata (Kubernetes-style)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestMetadata {
    /// Human-readable instance name
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
}

/// Configuration specification (content under spec:)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BffConfigSpec {
    /// Process engine REST endpoint
    #[serde(default)]
    pub engine: EngineConfig,

    /// Object storage for start-form payloads
    #[serde(default)]
    pub storage: StorageConfig,

    /// Remote form validator
    #[serde(default)]
    pub form_validation: FormValidationConfig,

    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub observability: Option<ObservabilityConfig>,

    /// Display title overrides, keyed by message key
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub messages: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Base URL of the engine REST API (e.g. "http://localhost:8080/engine-rest")
    #[serde(default = "default_engine_url")]
    pub url: String,

    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Bearer token for the engine (supports "env:VAR_NAME")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            url: default_engine_url(),
            timeout_seconds: default_timeout(),
            auth_token: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorageBackendKind {
    Http,
    InMemory,
}

impl StorageBackendKind {
    /// Whether stored payloads outlive the process and are readable by the
    /// engine's workers.
    pub fn is_durable(&self) -> bool {
        matches!(self, StorageBackendKind::Http)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_backend")]
    pub backend: StorageBackendKind,

    /// Object store base URL (required for the http backend)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default = "default_bucket")]
    pub bucket: String,

    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            url: None,
            bucket: default_bucket(),
            timeout_seconds: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormValidationConfig {
    #[serde(default = "default_form_validation_url")]
    pub url: String,

    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for FormValidationConfig {
    fn default() -> Self {
        Self {
            url: default_form_validation_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Network bind address (e.g. "0.0.0.0" or "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// HTTP API port
    #[serde(default = "default_api_port")]
    pub port: u16,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_api_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (e.g., "info", "debug", "trace")
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format ("json" or "text")
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_engine_url() -> String {
    "http://localhost:8080/engine-rest".to_string()
}

fn default_form_validation_url() -> String {
    "http://localhost:7070".to_string()
}

fn default_storage_backend() -> StorageBackendKind {
    StorageBackendKind::InMemory
}

fn default_bucket() -> String {
    "form-data".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_api_port() -> u16 {
    8000
}

impl Default for BffConfigSpec {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            storage: StorageConfig::default(),
            form_validation: FormValidationConfig::default(),
            network: NetworkConfig::default(),
            observability: None,
            messages: HashMap::new(),
        }
    }
}

impl Default for BffConfigManifest {
    fn default() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: ManifestMetadata {
                name: "process-bff".to_string(),
                version: Some("1.0.0".to_string()),
                labels: None,
            },
            spec: BffConfigSpec::default(),
        }
    }
}

impl BffConfigManifest {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to YAML file
    pub fn to_yaml_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Parse configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Discover configuration file using precedence order
    /// 1. PROCESS_BFF_CONFIG_PATH environment variable
    /// 2. ./process-bff.yaml (working directory)
    /// 3. ~/.process-bff/config.yaml (user home)
    /// 4. /etc/process-bff/config.yaml (Unix only)
    pub fn discover_config() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("PROCESS_BFF_CONFIG_PATH") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let cwd = PathBuf::from("./process-bff.yaml");
        if cwd.exists() {
            return Some(cwd);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".process-bff").join("config.yaml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        #[cfg(unix)]
        {
            let system_config = PathBuf::from("/etc/process-bff/config.yaml");
            if system_config.exists() {
                return Some(system_config);
            }
        }

        None
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // Explicit CLI path fails if missing/invalid
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path).map_err(|e| {
                anyhow::anyhow!("Failed to load config at {:?}: {}", path, e)
            })?;
            config.apply_env_overrides();
            return Ok(config);
        }

        if let Some(config_path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", config_path);
            let mut config = Self::from_yaml_file(config_path)?;
            config.apply_env_overrides();
            Ok(config)
        } else {
            tracing::warn!("No configuration file found in standard locations. Using defaults.");
            let mut config = Self::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("PROCESS_BFF_ENGINE_URL") {
            tracing::info!("Environment override: PROCESS_BFF_ENGINE_URL={}", url);
            self.spec.engine.url = url;
        }

        if let Ok(url) = std::env::var("PROCESS_BFF_STORAGE_URL") {
            tracing::info!("Environment override: PROCESS_BFF_STORAGE_URL={}", url);
            self.spec.storage.url = Some(url);
            self.spec.storage.backend = StorageBackendKind::Http;
        }

        if let Ok(url) = std::env::var("PROCESS_BFF_FORM_VALIDATION_URL") {
            tracing::info!("Environment override: PROCESS_BFF_FORM_VALIDATION_URL={}", url);
            self.spec.form_validation.url = url;
        }

        if let Ok(val) = std::env::var("PROCESS_BFF_PORT") {
            match val.parse::<u16>() {
                Ok(port) => {
                    tracing::info!("Environment override: PROCESS_BFF_PORT={}", port);
                    self.spec.network.port = port;
                }
                Err(_) => {
                    tracing::warn!(
                        "Invalid value for PROCESS_BFF_PORT: '{}'. Expected a port number. Ignoring.",
                        val
                    );
                }
            }
        }
    }

    /// Resolve the engine token, following "env:VAR_NAME" indirection
    pub fn engine_auth_token(&self) -> Option<String> {
        let raw = self.spec.engine.auth_token.as_ref()?;
        match raw.strip_prefix("env:") {
            Some(var) => std::env::var(var).ok(),
            None => Some(raw.clone()),
        }
    }

    /// Log level from observability settings, if configured
    pub fn log_level(&self) -> Option<&str> {
        self.spec
            .observability
            .as_ref()
            .and_then(|o| o.logging.as_ref())
            .map(|l| l.level.as_str())
    }

    /// True when JSON log output is configured
    pub fn json_logs(&self) -> bool {
        self.spec
            .observability
            .as_ref()
            .and_then(|o| o.logging.as_ref())
            .map(|l| l.format.eq_ignore_ascii_case("json"))
            .unwrap_or(false)
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_version != API_VERSION {
            anyhow::bail!(
                "Invalid apiVersion: '{}'. Must be '{}'",
                self.api_version,
                API_VERSION
            );
        }

        if self.kind != KIND {
            anyhow::bail!("Invalid kind: '{}'. Must be '{}'", self.kind, KIND);
        }

        if self.metadata.name.is_empty() {
            anyhow::bail!("metadata.name cannot be empty");
        }

        if self.spec.engine.url.is_empty() {
            anyhow::bail!("spec.engine.url cannot be empty");
        }

        if self.spec.form_validation.url.is_empty() {
            anyhow::bail!("spec.form_validation.url cannot be empty");
        }

        if self.spec.storage.backend == StorageBackendKind::Http {
            match &self.spec.storage.url {
                Some(url) if !url.is_empty() => {}
                _ => anyhow::bail!("spec.storage.url is required for the http storage backend"),
            }
            if self.spec.storage.bucket.is_empty() {
                anyhow::bail!("spec.storage.bucket cannot be empty");
            }
        }

        if self.spec.network.port == 0 {
            anyhow::bail!("spec.network.port cannot be 0");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_manifest() {
        let manifest = BffConfigManifest::default();
        assert_eq!(manifest.api_version, "process-bff/v1");
        assert_eq!(manifest.kind, "BffConfig");
        assert_eq!(manifest.spec.storage.backend, StorageBackendKind::InMemory);
        assert!(!manifest.spec.storage.backend.is_durable());
        assert_eq!(manifest.spec.network.port, 8000);
        assert!(manifest.validate().is_ok());
    }

    #[test]
    fn test_parse_minimal_yaml() {
        let yaml = r#"
apiVersion: process-bff/v1
kind: BffConfig
metadata:
  name: registry-bff
spec:
  engine:
    url: http://engine:8080/engine-rest
  storage:
    backend: http
    url: http://minio:9000
    bucket: start-forms
  observability:
    logging:
      level: debug
      format: json
  messages:
    process-instance.status.pending: "Waiting for officer"
"#;
        let config = BffConfigManifest::from_yaml_str(yaml).unwrap();
        assert_eq!(config.metadata.name, "registry-bff");
        assert_eq!(config.spec.engine.url, "http://engine:8080/engine-rest");
        assert_eq!(config.spec.engine.timeout_seconds, 30);
        assert_eq!(config.spec.storage.backend, StorageBackendKind::Http);
        assert_eq!(config.spec.storage.bucket, "start-forms");
        assert_eq!(config.log_level(), Some("debug"));
        assert!(config.json_logs());
        assert_eq!(
            config.spec.messages.get("process-instance.status.pending").map(String::as_str),
            Some("Waiting for officer")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("process-bff.yaml");

        let mut manifest = BffConfigManifest::default();
        manifest.metadata.name = "roundtrip".to_string();
        manifest.to_yaml_file(&path).unwrap();

        let loaded = BffConfigManifest::from_yaml_file(&path).unwrap();
        assert_eq!(loaded.metadata.name, "roundtrip");
        assert_eq!(loaded.spec.engine.url, manifest.spec.engine.url);
    }

    #[test]
    fn test_validation() {
        let mut manifest = BffConfigManifest::default();

        manifest.api_version = "wrong/v1".to_string();
        assert!(manifest.validate().is_err());
        manifest.api_version = API_VERSION.to_string();

        manifest.kind = "NodeConfig".to_string();
        assert!(manifest.validate().is_err());
        manifest.kind = KIND.to_string();

        manifest.spec.engine.url = "".to_string();
        assert!(manifest.validate().is_err());
        manifest.spec.engine.url = "http://engine".to_string();

        // http backend needs a url
        manifest.spec.storage.backend = StorageBackendKind::Http;
        assert!(manifest.validate().is_err());
        manifest.spec.storage.url = Some("http://minio:9000".to_string());
        assert!(manifest.validate().is_ok());
    }

    #[test]
    fn test_engine_token_literal() {
        let mut manifest = BffConfigManifest::default();
        assert_eq!(manifest.engine_auth_token(), None);
        manifest.spec.engine.auth_token = Some("secret".to_string());
        assert_eq!(manifest.engine_auth_token().as_deref(), Some("secret"));
    }
}
