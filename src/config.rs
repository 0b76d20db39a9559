//! Configuration loading and validation

use std::path::Path;

use axum::http::HeaderValue;
use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::OxilinkError;
use crate::service::ServiceRegistry;
use crate::Result;

/// HTTP client settings plus the endpoints it knows credentials for.
///
/// Loadable from a TOML file with `OXILINK_`-prefixed environment
/// overrides, or constructed directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// User-Agent header
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Per-endpoint service entries
    #[serde(default)]
    pub services: Vec<ServiceEntry>,
}

/// One endpoint the client holds configuration for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceEntry {
    pub endpoint: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            services: Vec::new(),
        }
    }
}

impl ClientConfig {
    /// Load from a TOML file, then apply `OXILINK_*` environment overrides.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let config: Self = Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("OXILINK_"))
            .extract()
            .map_err(|e| OxilinkError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(OxilinkError::Config(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        for service in &self.services {
            if service.endpoint.is_empty() {
                return Err(OxilinkError::Config(
                    "service endpoint must be non-empty".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Freeze the service entries into a registry snapshot.
    pub fn registry(&self) -> ServiceRegistry {
        let mut builder = ServiceRegistry::builder();
        for service in &self.services {
            builder = match (&service.username, &service.password) {
                (None, None) => builder.endpoint(&service.endpoint),
                (username, password) => builder.credentials(
                    &service.endpoint,
                    username.clone().unwrap_or_default(),
                    password.clone().unwrap_or_default(),
                ),
            };
        }
        builder.build()
    }
}

/// Settings for content-negotiated Linked Data responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// `Cache-Control` header value attached to responses, or none at all.
    #[serde(default)]
    pub cache_control: Option<String>,
}

impl ResourceConfig {
    /// Load from a TOML file, then apply `OXILINK_*` environment overrides.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let config: Self = Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("OXILINK_"))
            .extract()
            .map_err(|e| OxilinkError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the cache-control value parses into a header.
    pub fn validate(&self) -> Result<()> {
        if let Some(value) = &self.cache_control {
            HeaderValue::from_str(value).map_err(|e| {
                OxilinkError::Config(format!("invalid cache-control value {value:?}: {e}"))
            })?;
        }
        Ok(())
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("oxilink/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout_secs, 30);
        assert!(config.user_agent.starts_with("oxilink/"));
        assert!(config.services.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_registry_from_entries() {
        let config = ClientConfig {
            services: vec![
                ServiceEntry {
                    endpoint: "http://example.org/sparql".to_string(),
                    username: Some("user".to_string()),
                    password: Some("secret".to_string()),
                },
                ServiceEntry {
                    endpoint: "http://open.example/sparql".to_string(),
                    username: None,
                    password: None,
                },
            ],
            ..ClientConfig::default()
        };

        let registry = config.registry();
        assert!(registry
            .get("http://example.org/sparql")
            .unwrap()
            .has_credentials());
        assert!(!registry
            .get("http://open.example/sparql")
            .unwrap()
            .has_credentials());
    }

    #[test]
    fn test_empty_endpoint_rejected() {
        let config = ClientConfig {
            services: vec![ServiceEntry {
                endpoint: String::new(),
                username: None,
                password: None,
            }],
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_extraction() {
        let config: ClientConfig = Figment::new()
            .merge(Toml::string(
                r#"
                timeout_secs = 5

                [[services]]
                endpoint = "http://example.org/sparql"
                username = "user"
                password = "secret"
                "#,
            ))
            .extract()
            .unwrap();
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.services.len(), 1);
    }

    #[test]
    fn test_cache_control_validation() {
        let config = ResourceConfig {
            cache_control: Some("max-age=3600, public".to_string()),
        };
        assert!(config.validate().is_ok());

        let config = ResourceConfig {
            cache_control: Some("max-age=3600\u{0}".to_string()),
        };
        assert!(config.validate().is_err());
    }
}
