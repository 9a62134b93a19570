//! Client configuration: api key and endpoint.
//!
//! Explicit builder settings win; anything left unset is read from the
//! process environment (`PDFMONKEY_API_KEY`, `PDFMONKEY_API_ENDPOINT`).

use std::fmt;

use config::{Config, Environment};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::error::ApiError;

/// Production endpoint of the PDFMonkey API.
pub const DEFAULT_ENDPOINT: &str = "https://api.pdfmonkey.io/api/v1";

const ENV_PREFIX: &str = "PDFMONKEY";

/// Resolved, immutable client configuration.
#[derive(Clone)]
pub struct ClientConfig {
    api_key: SecretString,
    endpoint: String,
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Configuration taken entirely from the environment.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::builder().build()
    }

    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Base URL without a trailing slash.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &self.api_key)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// Builder for `ClientConfig`. Setters may be called repeatedly; the last
/// call wins.
#[derive(Default)]
pub struct ClientConfigBuilder {
    api_key: Option<String>,
    endpoint: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct EnvSettings {
    api_key: Option<String>,
    api_endpoint: Option<String>,
}

impl ClientConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Resolve the configuration, consulting the process environment for
    /// any field not set explicitly.
    pub fn build(self) -> Result<ClientConfig, ApiError> {
        self.resolve(Environment::with_prefix(ENV_PREFIX))
    }

    pub(crate) fn resolve(self, env: Environment) -> Result<ClientConfig, ApiError> {
        let needs_env = self.api_key.is_none() || self.endpoint.is_none();
        let settings = if needs_env {
            load_env(env)?
        } else {
            EnvSettings::default()
        };

        let api_key = self
            .api_key
            .or(settings.api_key)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                ApiError::Configuration(format!(
                    "api key is empty; set it on the builder or via {ENV_PREFIX}_API_KEY"
                ))
            })?;

        let endpoint = self
            .endpoint
            .or(settings.api_endpoint.filter(|e| !e.is_empty()))
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        if endpoint.is_empty() {
            return Err(ApiError::Configuration("endpoint is empty".to_string()));
        }

        Ok(ClientConfig {
            api_key: SecretString::new(api_key),
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }
}

fn load_env(env: Environment) -> Result<EnvSettings, ApiError> {
    Config::builder()
        .add_source(env)
        .build()
        .and_then(|c| c.try_deserialize())
        .map_err(|e| ApiError::Configuration(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<config::Map<String, String>>();
        Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    #[test]
    fn explicit_key_uses_default_endpoint() {
        let config = ClientConfig::builder().api_key("k").resolve(env(&[])).unwrap();
        assert_eq!(config.endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(config.api_key(), "k");
    }

    #[test]
    fn no_builder_settings_yields_default_endpoint() {
        let config = ClientConfig::builder()
            .resolve(env(&[("PDFMONKEY_API_KEY", "k")]))
            .unwrap();
        assert_eq!(config.endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(config.api_key(), "k");
    }

    #[test]
    fn missing_key_is_a_configuration_error() {
        let err = ClientConfig::builder().resolve(env(&[])).unwrap_err();
        assert!(matches!(err, ApiError::Configuration(_)));
    }

    #[test]
    fn empty_key_is_a_configuration_error() {
        let err = ClientConfig::builder()
            .api_key("")
            .resolve(env(&[("PDFMONKEY_API_KEY", "from-env")]))
            .unwrap_err();
        assert!(matches!(err, ApiError::Configuration(_)));
    }

    #[test]
    fn empty_env_key_is_a_configuration_error() {
        let err = ClientConfig::builder()
            .resolve(env(&[("PDFMONKEY_API_KEY", "")]))
            .unwrap_err();
        assert!(matches!(err, ApiError::Configuration(_)));
    }

    #[test]
    fn environment_fills_unset_fields() {
        let config = ClientConfig::builder()
            .resolve(env(&[
                ("PDFMONKEY_API_KEY", "env-key"),
                ("PDFMONKEY_API_ENDPOINT", "http://localhost:3000/api/v1"),
            ]))
            .unwrap();
        assert_eq!(config.api_key(), "env-key");
        assert_eq!(config.endpoint(), "http://localhost:3000/api/v1");
    }

    #[test]
    fn explicit_settings_override_environment() {
        let config = ClientConfig::builder()
            .api_key("explicit")
            .endpoint("http://example.test")
            .resolve(env(&[
                ("PDFMONKEY_API_KEY", "env-key"),
                ("PDFMONKEY_API_ENDPOINT", "http://localhost:3000"),
            ]))
            .unwrap();
        assert_eq!(config.api_key(), "explicit");
        assert_eq!(config.endpoint(), "http://example.test");
    }

    #[test]
    fn later_setters_win() {
        let config = ClientConfig::builder()
            .api_key("first")
            .endpoint("http://one.test")
            .api_key("second")
            .endpoint("http://two.test/")
            .resolve(env(&[]))
            .unwrap();
        assert_eq!(config.api_key(), "second");
        assert_eq!(config.endpoint(), "http://two.test");
    }

    #[test]
    fn debug_output_redacts_key() {
        let config = ClientConfig::builder()
            .api_key("super-secret")
            .resolve(env(&[]))
            .unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains(DEFAULT_ENDPOINT));
    }
}
