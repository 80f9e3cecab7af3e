//! Security-relevant events, logged with a stable `event` field so they can be
//! filtered out of the request log.

use tracing::{info, warn};

use crate::logging::pii::Redacted;
use crate::trace_ctx;

/// The backend rejected a login, or could not be reached.
///
/// `reason` is the raw backend message; it never reaches the user.
pub fn login_failed(reason: &str, status: Option<u16>, email: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_LOGIN_FAILED",
        %trace_id,
        email = %Redacted(email),
        status = ?status,
        reason,
        "Authentication failure"
    );
}

/// The backend refused a registration.
pub fn registration_failed(reason: &str, status: Option<u16>, email: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_REGISTRATION_FAILED",
        %trace_id,
        email = %Redacted(email),
        status = ?status,
        reason,
        "Registration failure"
    );
}

/// An authorization guard turned a request away.
pub fn access_denied(path: &str, authenticated: bool, redirect_to: &str) {
    let trace_id = trace_ctx::trace_id();

    info!(
        event = "SECURITY_ACCESS_DENIED",
        %trace_id,
        path,
        authenticated,
        redirect_to,
        "Access denied"
    );
}

/// A credential cookie carried an expired token and was cleared.
pub fn session_expired(email: Option<&str>) {
    let trace_id = trace_ctx::trace_id();

    info!(
        event = "SECURITY_SESSION_EXPIRED",
        %trace_id,
        email = %Redacted(email.unwrap_or("")),
        "Expired session cookie cleared"
    );
}
