#![allow(dead_code)]

// tests/common/mod.rs
use actix_web::http::header::HeaderMap;


// Logging is auto-installed for every test binary that declares `mod common`.
#[ctor::ctor]
fn init_logging() {
    frontend_test_support::logging::init();
}

/// The `x-request-id` header set by `RequestTrace`.
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get("x-request-id")
        .expect("x-request-id header should be present")
        .to_str()
        .expect("x-request-id should be valid UTF-8")
        .to_string()
}
