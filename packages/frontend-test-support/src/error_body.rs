//! Assertions for the JSON error envelope (`{success, message, code, traceId}`).

use actix_web::http::header::HeaderMap;
use actix_web::http::StatusCode;
use serde::Deserialize;

/// Local mirror of the envelope, so tests don't depend on crate internals.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBodyLike {
    pub success: bool,
    pub message: String,
    pub code: String,
    pub trace_id: String,
}

/// Assert status, envelope fields and that the body trace id matches the
/// `x-trace-id` header.
pub fn assert_error_body(
    status: StatusCode,
    headers: &HeaderMap,
    body: &[u8],
    expected_status: StatusCode,
    expected_code: &str,
    expected_message: &str,
) -> ErrorBodyLike {
    assert_eq!(status, expected_status);

    let parsed: ErrorBodyLike =
        serde_json::from_slice(body).expect("response body should be the JSON error envelope");
    assert!(!parsed.success);
    assert_eq!(parsed.code, expected_code);
    assert_eq!(parsed.message, expected_message);

    let header = headers
        .get("x-trace-id")
        .expect("x-trace-id header should be present")
        .to_str()
        .expect("x-trace-id header should be valid UTF-8");
    assert_eq!(parsed.trace_id, header, "trace id in body and header should match");

    parsed
}
