//! Error types for flightstatus.
//!
//! This module defines all error types used throughout the flightstatus crate.
//! A flight that the provider does not know about is *not* an error: lookups
//! return `Ok(None)` for that case.

use thiserror::Error;

use crate::transport::TransportError;

/// Why a single provider request failed.
#[derive(Error, Debug)]
pub enum RequestFailure {
    /// The provider answered with a non-success HTTP status.
    #[error("provider returned HTTP {code}: {text}")]
    Status {
        /// HTTP status code.
        code: u16,
        /// Status reason phrase or response body, whichever is more useful.
        text: String,
    },

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The response body could not be decoded.
    #[error("invalid response body: {0}")]
    Decode(#[source] serde_json::Error),
}

impl RequestFailure {
    /// The HTTP status code, if the provider produced one.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { code, .. } => Some(*code),
            Self::Transport(_) | Self::Decode(_) => None,
        }
    }
}

/// The main error type for flightstatus operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Provider Errors ===
    /// The client-credentials token exchange failed.
    #[error("authentication failed: {failure}")]
    Authentication {
        /// What went wrong with the token request.
        #[source]
        failure: RequestFailure,
    },

    /// The primary flight-status lookup failed.
    #[error("flight status lookup failed: {failure}")]
    Tracking {
        /// What went wrong with the status request.
        #[source]
        failure: RequestFailure,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// A provider credential is not configured.
    #[error("missing provider credential: {field} (set it in the config file or FLIGHTSTATUS_PROVIDER__{env})")]
    MissingCredentials {
        /// Name of the configuration field.
        field: &'static str,
        /// Environment variable suffix for the field.
        env: &'static str,
    },

    /// Failed to build the HTTP transport.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for flightstatus operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create an authentication error.
    #[must_use]
    pub fn authentication(failure: impl Into<RequestFailure>) -> Self {
        Self::Authentication {
            failure: failure.into(),
        }
    }

    /// Create a tracking error.
    #[must_use]
    pub fn tracking(failure: impl Into<RequestFailure>) -> Self {
        Self::Tracking {
            failure: failure.into(),
        }
    }

    /// Check if this error came from the token exchange.
    #[must_use]
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Check if this error came from the status lookup.
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        matches!(self, Self::Tracking { .. })
    }

    /// The provider's HTTP status code, for provider errors that have one.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Authentication { failure } | Self::Tracking { failure } => failure.status_code(),
            _ => None,
        }
    }
}
