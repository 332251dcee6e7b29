//! Session credentials.
//!
//! A [`Credential`] is an opaque bearer token whose payload self-describes
//! its expiry. The payload is decoded locally (base64url JSON, no
//! signature verification; the backend is the authority on validity and
//! local decoding only drives expiry scheduling). Parsing is
//! all-or-nothing: a credential is either fully present with a valid
//! structure and an `exp` claim, or it does not exist.

use crate::clock::Clock;
use crate::error::{ApiError, ErrorKind};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How close to `exp` a credential is already treated as expired.
pub const DEFAULT_EXPIRY_BUFFER: Duration = Duration::from_secs(60);

/// Claims decoded from a credential's payload segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Expiry, seconds since the UNIX epoch. Required.
    pub exp: u64,
    /// Issued-at, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
    /// Subject (typically the username), when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Granted roles, when present.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    /// Any further claims, kept opaque.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Bearer token plus its decoded claims.
#[derive(Debug, Clone)]
pub struct Credential {
    raw: String,
    claims: Claims,
}

impl Credential {
    /// Decode a raw token string.
    ///
    /// Fails with an authentication-kind error when the token is not a
    /// three-segment base64url structure, the payload is not JSON, or
    /// the `exp` claim is missing.
    pub fn parse(raw: impl Into<String>) -> Result<Self, ApiError> {
        let raw = raw.into();
        let segments: Vec<&str> = raw.split('.').collect();
        if segments.len() != 3 {
            return Err(invalid_token("token must have three segments"));
        }
        // Tolerate padded producers; the alphabet itself must be URL-safe.
        let payload = segments[1].trim_end_matches('=');
        let bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|e| invalid_token("token payload is not base64url").with_source(e))?;
        let claims: Claims = serde_json::from_slice(&bytes)
            .map_err(|e| invalid_token("token payload is not a claims object").with_source(e))?;
        Ok(Self { raw, claims })
    }

    /// The raw token string.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The decoded claims.
    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    /// Expiry as seconds since the UNIX epoch.
    pub fn expires_at(&self) -> u64 {
        self.claims.exp
    }

    /// Whether the credential is expired, judging `exp` against
    /// `now + buffer` so near-expiry tokens are retired before the
    /// backend starts rejecting them mid-flight.
    pub fn is_expired(&self, clock: &dyn Clock, buffer: Duration) -> bool {
        let horizon = clock.now_unix().saturating_add(buffer.as_secs());
        self.claims.exp <= horizon
    }

    /// Seconds until expiry (0 when already expired).
    pub fn seconds_until_expiry(&self, clock: &dyn Clock) -> u64 {
        self.claims.exp.saturating_sub(clock.now_unix())
    }

    /// `Authorization` header value for this credential.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.raw)
    }
}

fn invalid_token(detail: &str) -> ApiError {
    ApiError::new(ErrorKind::Authentication).with_detail(detail)
}
