//! Bearer credentials obtained from the client-credentials exchange.
//!
//! A [`Credential`] is valid only while `now < expires_at`. The expiry is
//! computed from the instant the token request was *sent*, minus a safety
//! margin, so it always falls before the provider's real expiry.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

/// Token type assumed when the provider omits `token_type`.
const DEFAULT_TOKEN_TYPE: &str = "Bearer";

/// Body of a successful token endpoint response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenResponse {
    /// The bearer token.
    pub access_token: String,
    /// Lifetime in seconds.
    pub expires_in: u64,
    /// Token type, normally `Bearer`.
    #[serde(default)]
    pub token_type: Option<String>,
}

/// A cached bearer token and the instant it stops being usable.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    access_token: String,
    token_type: String,
    expires_at: DateTime<Utc>,
}

impl Credential {
    /// Create a credential directly.
    #[must_use]
    pub fn new(access_token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: DEFAULT_TOKEN_TYPE.to_string(),
            expires_at,
        }
    }

    /// Build a credential from a token response.
    ///
    /// `issued_at` must be read before the token request was sent. A negative
    /// `margin` is treated as zero so the expiry never moves past the
    /// provider's.
    #[must_use]
    pub fn from_response(
        response: TokenResponse,
        issued_at: DateTime<Utc>,
        margin: Duration,
    ) -> Self {
        let lifetime = i64::try_from(response.expires_in)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX);
        let usable = lifetime
            .checked_sub(&margin.max(Duration::zero()))
            .unwrap_or(Duration::zero());
        let expires_at = issued_at
            .checked_add_signed(usable)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            access_token: response.access_token,
            token_type: response
                .token_type
                .unwrap_or_else(|| DEFAULT_TOKEN_TYPE.to_string()),
            expires_at,
        }
    }

    /// The bearer token.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Token type reported by the provider.
    #[must_use]
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// When this credential stops being valid.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// The token with all but the last four characters masked.
    #[must_use]
    pub fn masked_token(&self) -> String {
        let chars: Vec<char> = self.access_token.chars().collect();
        let keep = chars.len().min(4);
        let tail: String = chars[chars.len() - keep..].iter().collect();
        format!("{}{tail}", "*".repeat(chars.len() - keep))
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Whether a cached credential may still be presented to the provider.
#[must_use]
pub fn is_token_valid(credential: Option<&Credential>, now: DateTime<Utc>) -> bool {
    credential.is_some_and(|c| now < c.expires_at)
}
