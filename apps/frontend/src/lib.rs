#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod api_client;
pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod features;
pub mod logging;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod trace_ctx;
pub mod validation;
pub mod views;

// Re-exports for public API
pub use api_client::{ApiFailure, ApiResult, BackendClient};
pub use auth::cookie::{AuthCookies, AUTH_COOKIE_NAME};
pub use auth::identity::{Identity, Role};
pub use config::{Config, RuntimeEnv};
pub use error::AppError;
pub use extractors::session_token::SessionToken;
pub use features::FeatureFlagCache;
pub use middleware::guard::RequireAccess;
pub use middleware::request_trace::RequestTrace;
pub use middleware::security_headers::SecurityHeaders;
pub use middleware::session::SessionResolver;
pub use middleware::structured_logger::StructuredLogger;
pub use middleware::trace_span::TraceSpan;
pub use state::app_state::AppState;
pub use state::builder::build_state;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    frontend_test_support::logging::init();
}
