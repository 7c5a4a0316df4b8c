//! JWT payload decoding
//!
//! The client never verifies signatures; it only reads the payload to learn
//! who is logged in. Any malformed token decodes to `None`.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::services::Role;

/// Decoded token payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Primary id claim (number or numeric string)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    /// Alternate id claim used by some token issuers
    #[serde(default, rename = "userId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Expiry, seconds since the Unix epoch. Issuers differ: integer,
    /// fractional or numeric string are all accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<Value>,

    /// Everything else the issuer put in the payload
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    /// The logged-in user's id, from `id` or else `userId`
    pub fn user_id(&self) -> Option<i64> {
        self.id
            .as_ref()
            .and_then(as_i64)
            .or_else(|| self.user_id.as_ref().and_then(as_i64))
    }

    /// The role claim, if it names a known role
    pub fn role(&self) -> Option<Role> {
        self.role.as_deref().and_then(|r| r.parse().ok())
    }

    /// Expiry as seconds; `None` when absent or not numeric
    pub fn expires_at(&self) -> Option<f64> {
        self.exp.as_ref().and_then(as_f64)
    }

    /// True when `exp` lies strictly before `now` (seconds)
    pub fn is_expired_at(&self, now: i64) -> bool {
        matches!(self.expires_at(), Some(exp) if exp < now as f64)
    }

    /// True when the token has expired as of the current wall clock
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(chrono::Utc::now().timestamp())
    }
}

fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Decode the payload segment of a three-part JWT
///
/// Accepts both URL-safe and standard alphabets, with or without padding.
pub fn decode_claims(token: &str) -> Option<Claims> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        debug!(segments = parts.len(), "Token is not a three-part JWT");
        return None;
    }

    let normalized: String = parts[1]
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();

    let bytes = match URL_SAFE_NO_PAD.decode(normalized.as_bytes()) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!(error = %e, "Failed to decode token payload");
            return None;
        }
    };

    match serde_json::from_slice::<Claims>(&bytes) {
        Ok(claims) => Some(claims),
        Err(e) => {
            debug!(error = %e, "Token payload is not a JSON object");
            None
        }
    }
}
