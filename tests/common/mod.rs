//! Shared helpers for integration tests.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time in UNIX seconds.
pub fn now_unix() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
}

/// Build an unsigned bearer token whose payload carries the given
/// claims.
pub fn fake_token(claims: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string().as_bytes());
    format!("{}.{}.sig", header, payload)
}

/// A token that expires `offset_secs` from now (may be negative).
pub fn token_expiring_in(offset_secs: i64) -> String {
    let exp = if offset_secs >= 0 {
        now_unix() + offset_secs as u64
    } else {
        now_unix().saturating_sub(offset_secs.unsigned_abs())
    };
    fake_token(&serde_json::json!({"sub": "chef_amara", "exp": exp}))
}
