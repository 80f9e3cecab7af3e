//! Credential token payload decoding.
//!
//! Tokens are issued by the backend API as `header.payload.signature`. Only the
//! payload is read here; the signature is NOT verified. Identity and role claims
//! are trusted because the backend issued the cookie value, so a hand-crafted
//! token with a well-formed payload is accepted as-is.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use serde_json::{Map, Value};
use tracing::debug;

use crate::auth::identity::Role;

// Backends differ on alphabet and padding; accept both.
const LENIENT: GeneralPurposeConfig = GeneralPurposeConfig::new()
    .with_encode_padding(false)
    .with_decode_padding_mode(DecodePaddingMode::Indifferent)
    .with_decode_allow_trailing_bits(true);
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);

/// Decoded claims of a credential token.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenPayload {
    claims: Map<String, Value>,
}

impl TokenPayload {
    /// `userEmail`, when present as a non-empty string.
    pub fn user_email(&self) -> Option<&str> {
        self.claims
            .get("userEmail")
            .and_then(Value::as_str)
            .filter(|email| !email.is_empty())
    }

    /// `userRole`, normalized; unknown or non-string values are `None`.
    pub fn user_role(&self) -> Option<Role> {
        self.claims
            .get("userRole")
            .and_then(Value::as_str)
            .and_then(Role::parse)
    }

    /// `exp` in seconds since the epoch. A missing, zero or non-numeric value
    /// means the token never expires.
    pub fn expires_at(&self) -> Option<f64> {
        self.claims
            .get("exp")
            .and_then(Value::as_f64)
            .filter(|exp| *exp != 0.0)
    }

    /// Expired when `now_secs` is strictly past `exp`.
    pub fn is_expired_at(&self, now_secs: f64) -> bool {
        self.expires_at().is_some_and(|exp| now_secs > exp)
    }
}

/// Decode the payload segment of `token`.
///
/// Returns `None` unless the token has exactly three segments and the middle
/// one is base64-encoded JSON object.
pub fn decode(token: &str) -> Option<TokenPayload> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        debug!(segments = segments.len(), "credential token is not in three parts");
        return None;
    }

    let raw = segments[1];
    let bytes = match URL_SAFE_LENIENT
        .decode(raw)
        .or_else(|_| STANDARD_LENIENT.decode(raw))
    {
        Ok(bytes) => bytes,
        Err(err) => {
            debug!(error = %err, "credential token payload is not base64");
            return None;
        }
    };

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(claims)) => Some(TokenPayload { claims }),
        Ok(_) => {
            debug!("credential token payload is not a JSON object");
            None
        }
        Err(err) => {
            debug!(error = %err, "credential token payload is not JSON");
            None
        }
    }
}

/// Role claim of `token`, if it decodes and names a known role.
pub fn role(token: &str) -> Option<Role> {
    decode(token).and_then(|payload| payload.user_role())
}

/// Email claim of `token`, if it decodes and carries one.
pub fn email(token: &str) -> Option<String> {
    decode(token).and_then(|payload| payload.user_email().map(str::to_owned))
}

/// Whether `token` is past its `exp` at the current wall-clock time.
///
/// Undecodable tokens and tokens without `exp` are not expired.
pub fn is_expired(token: &str) -> bool {
    is_expired_at(token, now_secs())
}

pub fn is_expired_at(token: &str, now_secs: f64) -> bool {
    decode(token).is_some_and(|payload| payload.is_expired_at(now_secs))
}

/// Current time in fractional seconds since the epoch.
pub fn now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs_f64())
        .unwrap_or(0.0)
}
