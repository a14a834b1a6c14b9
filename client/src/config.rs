//! Client configuration.
//!
//! # Design
//! Explicit builder values win; anything left unset falls back to the
//! `SIREN_API_KEY` and `SIREN_ENV` environment variables. Every problem is
//! reported by [`ClientConfigBuilder::build`], so a misconfigured client
//! never exists and no request is ever attempted with it.

use std::fmt;

use siren_core::{RequestExecutor, SdkError};
use url::Url;

pub const API_KEY_VAR: &str = "SIREN_API_KEY";
pub const ENV_VAR: &str = "SIREN_ENV";

/// Deployment target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Environment {
    Dev,
    #[default]
    Prod,
}

impl Environment {
    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Dev => "https://api.dev.trysiren.io",
            Environment::Prod => "https://api.trysiren.io",
        }
    }
}

/// Resolved, validated configuration shared by both facades.
#[derive(Clone)]
pub struct ClientConfig {
    api_key: String,
    environment: Environment,
    base_url: Url,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("environment", &self.environment)
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Configuration taken entirely from the environment variables.
    pub fn from_env() -> Result<Self, SdkError> {
        Self::builder().build()
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn executor(&self) -> RequestExecutor {
        RequestExecutor::new(self.base_url.clone(), self.api_key.clone())
    }
}

#[derive(Debug, Default, Clone)]
pub struct ClientConfigBuilder {
    api_key: Option<String>,
    environment: Option<String>,
    base_url: Option<String>,
}

impl ClientConfigBuilder {
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment.to_string());
        self
    }

    /// Environment given by name (`"dev"` or `"prod"`), checked at build time.
    pub fn environment_name(mut self, name: impl Into<String>) -> Self {
        self.environment = Some(name.into());
        self
    }

    /// Overrides the environment's base URL, e.g. for a local stand-in.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn build(self) -> Result<ClientConfig, SdkError> {
        self.build_with(|name| std::env::var(name).ok())
    }

    /// Like [`build`](Self::build), reading fallbacks through `lookup`.
    pub fn build_with<F>(self, lookup: F) -> Result<ClientConfig, SdkError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = self
            .api_key
            .or_else(|| lookup(API_KEY_VAR))
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                SdkError::config(format!(
                    "an API key is required: pass one to the builder or set {API_KEY_VAR}"
                ))
            })?;

        let environment = match self.environment.or_else(|| lookup(ENV_VAR)) {
            Some(name) => name.trim().parse::<Environment>().map_err(|_| {
                SdkError::config(format!("invalid environment {name:?}: expected \"dev\" or \"prod\""))
            })?,
            None => Environment::default(),
        };

        let raw_url = self.base_url.as_deref().unwrap_or(environment.base_url());
        let base_url = Url::parse(raw_url)
            .map_err(|e| SdkError::config(format!("invalid base URL {raw_url:?}: {e}")).with_source(e))?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(SdkError::config(format!("base URL {raw_url:?} must be an http(s) URL")));
        }

        tracing::debug!(%environment, base_url = %base_url, "client configured");
        Ok(ClientConfig {
            api_key,
            environment,
            base_url,
        })
    }
}
