//! Configuration management for flightstatus.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default configuration directory name.
const CONFIG_DIR_NAME: &str = "flightstatus";

/// Environment variable prefix.
const ENV_PREFIX: &str = "FLIGHTSTATUS_";

/// Largest accepted token expiry margin.
const MAX_EXPIRY_MARGIN_SECS: u64 = 24 * 60 * 60;

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `FLIGHTSTATUS_`, sections separated
///    by `__`, e.g. `FLIGHTSTATUS_PROVIDER__CLIENT_SECRET`)
/// 2. TOML config file at `~/.config/flightstatus/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Flight-data provider configuration.
    pub provider: ProviderConfig,
    /// Token handling configuration.
    pub auth: AuthConfig,
    /// HTTP client configuration.
    pub http: HttpConfig,
}

/// Provider endpoints and client credentials.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL of the provider API.
    pub base_url: String,
    /// Path of the OAuth2 token endpoint.
    pub token_path: String,
    /// Path of the flight-status collection.
    pub status_path: String,
    /// Path of the route collection; a route id is appended.
    pub routes_path: String,
    /// OAuth2 client id.
    pub client_id: Option<String>,
    /// OAuth2 client secret. Never written back out.
    #[serde(skip_serializing)]
    pub client_secret: Option<String>,
}

/// Token handling configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Seconds subtracted from the provider's advertised token lifetime.
    pub expiry_margin_secs: u64,
}

/// HTTP client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds. Set to 0 for no timeout.
    pub timeout_secs: u64,
    /// `User-Agent` header value.
    pub user_agent: String,
}

/// Fully resolved provider endpoint URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Token endpoint.
    pub token_url: String,
    /// Flight-status endpoint.
    pub status_url: String,
    /// Route collection; append `/<id>`.
    pub routes_url: String,
}

/// Client id and secret for the token exchange.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    /// OAuth2 client id.
    pub client_id: String,
    /// OAuth2 client secret.
    pub client_secret: String,
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_url", &self.base_url)
            .field("token_path", &self.token_path)
            .field("status_path", &self.status_path)
            .field("routes_path", &self.routes_path)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.flightstatus.example".to_string(),
            token_path: "/oauth/token".to_string(),
            status_path: "/flight-status".to_string(),
            routes_path: "/routes".to_string(),
            client_id: None,
            client_secret: None,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            expiry_margin_secs: 60,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: concat!("fltstat/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ProviderConfig {
    /// Resolve endpoint paths against the base URL.
    #[must_use]
    pub fn endpoints(&self) -> Endpoints {
        let base = self.base_url.trim_end_matches('/');
        Endpoints {
            token_url: format!("{base}{}", self.token_path),
            status_url: format!("{base}{}", self.status_path),
            routes_url: format!("{base}{}", self.routes_path.trim_end_matches('/')),
        }
    }

    /// The configured client credentials.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCredentials`] if either value is unset or empty.
    pub fn credentials(&self) -> Result<ClientCredentials> {
        let client_id = non_empty(self.client_id.as_ref()).ok_or(Error::MissingCredentials {
            field: "client_id",
            env: "CLIENT_ID",
        })?;
        let client_secret =
            non_empty(self.client_secret.as_ref()).ok_or(Error::MissingCredentials {
                field: "client_secret",
                env: "CLIENT_SECRET",
            })?;
        Ok(ClientCredentials {
            client_id,
            client_secret,
        })
    }
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).cloned()
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// Credentials are not checked here; see [`ProviderConfig::credentials`].
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let base = &self.provider.base_url;
        match reqwest::Url::parse(base) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => {
                return Err(Error::ConfigValidation {
                    message: format!("base_url must be http or https, got {}", url.scheme()),
                });
            }
            Err(e) => {
                return Err(Error::ConfigValidation {
                    message: format!("invalid base_url {base:?}: {e}"),
                });
            }
        }

        for (name, path) in [
            ("token_path", &self.provider.token_path),
            ("status_path", &self.provider.status_path),
            ("routes_path", &self.provider.routes_path),
        ] {
            if !path.starts_with('/') {
                return Err(Error::ConfigValidation {
                    message: format!("{name} must start with '/', got {path:?}"),
                });
            }
        }

        if self.auth.expiry_margin_secs > MAX_EXPIRY_MARGIN_SECS {
            return Err(Error::ConfigValidation {
                message: format!(
                    "expiry_margin_secs ({}) cannot exceed {MAX_EXPIRY_MARGIN_SECS}",
                    self.auth.expiry_margin_secs
                ),
            });
        }

        Ok(())
    }

    /// Get the expiry margin as a chrono duration.
    #[must_use]
    pub fn expiry_margin(&self) -> chrono::Duration {
        // Bounded by validate(); the fallback only guards unvalidated configs.
        i64::try_from(self.auth.expiry_margin_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or_else(|| chrono::Duration::seconds(60))
    }

    /// Get the request timeout, if one is configured.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        if self.http.timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.http.timeout_secs))
        }
    }
}
