//! Assertions on redirects and `Set-Cookie` headers.

use actix_web::http::header::{HeaderMap, LOCATION, SET_COOKIE};
use actix_web::http::StatusCode;

/// Assert a `302 Found` to `expected_location`.
pub fn assert_redirect(status: StatusCode, headers: &HeaderMap, expected_location: &str) {
    assert_eq!(status, StatusCode::FOUND, "expected a redirect to {expected_location}");
    let location = headers
        .get(LOCATION)
        .expect("redirect should carry a Location header")
        .to_str()
        .expect("Location header should be valid UTF-8");
    assert_eq!(location, expected_location);
}

/// All `Set-Cookie` values for cookie `name`.
pub fn set_cookies_named(headers: &HeaderMap, name: &str) -> Vec<String> {
    let prefix = format!("{name}=");
    headers
        .get_all(SET_COOKIE)
        .filter_map(|value| value.to_str().ok())
        .filter(|value| value.starts_with(&prefix))
        .map(str::to_owned)
        .collect()
}

/// The single `Set-Cookie` header for `name`; panics if absent or repeated.
pub fn single_set_cookie(headers: &HeaderMap, name: &str) -> String {
    let mut found = set_cookies_named(headers, name);
    assert_eq!(found.len(), 1, "expected exactly one Set-Cookie for {name}: {found:?}");
    found.remove(0)
}

/// Assert the response removes cookie `name` (empty value, zero max-age).
pub fn assert_cookie_cleared(headers: &HeaderMap, name: &str) {
    let cookie = single_set_cookie(headers, name);
    assert!(
        cookie.starts_with(&format!("{name}=;")),
        "cookie should be emptied: {cookie}"
    );
    assert!(cookie.contains("Max-Age=0"), "cookie should expire now: {cookie}");
}

/// Assert no `Set-Cookie` for `name` was sent.
pub fn assert_no_cookie(headers: &HeaderMap, name: &str) {
    let found = set_cookies_named(headers, name);
    assert!(found.is_empty(), "unexpected Set-Cookie for {name}: {found:?}");
}
