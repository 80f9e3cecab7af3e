//! Credential tokens in the backend's compact `header.payload.signature` form.
//!
//! Only the payload matters to the front-end, so the signature is a dummy.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde_json::{json, Value};

const HEADER: &str = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9";

/// A far-future `exp`, in seconds.
pub const FAR_FUTURE: i64 = 32_503_680_000;

pub fn token_with_claims(claims: Value) -> String {
    format!(
        "{HEADER}.{}.dummy-signature",
        URL_SAFE_NO_PAD.encode(claims.to_string())
    )
}

pub fn token_for(email: &str, role: &str) -> String {
    token_with_claims(json!({
        "userId": 1,
        "userEmail": email,
        "userRole": role,
        "exp": FAR_FUTURE
    }))
}

pub fn applicant_token(email: &str) -> String {
    token_for(email, "applicant")
}

pub fn admin_token(email: &str) -> String {
    token_for(email, "admin")
}

/// Expired an hour after the epoch.
pub fn expired_token(email: &str) -> String {
    token_with_claims(json!({
        "userEmail": email,
        "userRole": "applicant",
        "exp": 3600
    }))
}
