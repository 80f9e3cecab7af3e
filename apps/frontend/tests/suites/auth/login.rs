use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::test;
use frontend::routes::auth::{CORRECT_ERRORS, INVALID_CREDENTIALS, SERVER_ERROR};
use frontend::validation::{EMAIL_INVALID, PASSWORD_REQUIRED};
use frontend::AUTH_COOKIE_NAME;
use frontend_test_support::responses::{assert_no_cookie, assert_redirect, single_set_cookie};
use frontend_test_support::unique_email;
use mockito::Matcher;
use serde_json::json;

use crate::support::log_capture::CapturedLogs;
use crate::support::tokens::{applicant_token, expired_token};
use crate::support::{create_test_app, BackendStub};

#[actix_web::test]
async fn successful_login_sets_cookie_and_redirects_to_jobs() -> Result<(), Box<dyn std::error::Error>> {
    let mut backend = BackendStub::start().await;
    let email = unique_email("login");
    let token = applicant_token(&email);

    let mock = backend
        .server
        .mock("POST", "/api/login")
        .match_body(Matcher::Json(json!({ "email": email, "password": "secret!1" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "token": token }).to_string())
        .expect(1)
        .create_async()
        .await;

    let app = create_test_app(backend.state()).build().await;
    let req = test::TestRequest::post()
        .uri("/api/login")
        .set_form([("email", email.as_str()), ("password", "secret!1")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_redirect(resp.status(), resp.headers(), "/jobs");
    let cookie = single_set_cookie(resp.headers(), AUTH_COOKIE_NAME);
    assert!(cookie.starts_with(&format!("{AUTH_COOKIE_NAME}={token}")));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Strict"));
    assert!(!cookie.contains("Secure"), "test runtime should not mark cookies secure");

    mock.assert_async().await;
    Ok(())
}

#[actix_web::test]
async fn json_login_body_is_accepted() -> Result<(), Box<dyn std::error::Error>> {
    let mut backend = BackendStub::start().await;
    let email = unique_email("json-login");
    let token = applicant_token(&email);
    let mock = backend
        .json("POST", "/api/login", 200, json!({ "token": token }))
        .await;

    let app = create_test_app(backend.state()).build().await;
    let req = test::TestRequest::post()
        .uri("/api/login")
        .set_json(json!({ "email": email, "password": "secret!1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_redirect(resp.status(), resp.headers(), "/jobs");
    mock.assert_async().await;
    Ok(())
}

#[actix_web::test]
async fn login_with_expired_cookie_keeps_fresh_credential() -> Result<(), Box<dyn std::error::Error>> {
    let mut backend = BackendStub::start().await;
    let email = unique_email("relogin");
    let token = applicant_token(&email);
    let mock = backend
        .json("POST", "/api/login", 200, json!({ "token": token }))
        .await;

    let app = create_test_app(backend.state()).build().await;
    let req = test::TestRequest::post()
        .uri("/api/login")
        .cookie(Cookie::new(AUTH_COOKIE_NAME, expired_token(&email)))
        .set_form([("email", email.as_str()), ("password", "secret!1")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_redirect(resp.status(), resp.headers(), "/jobs");
    // Only the fresh credential; no trailing removal that would log the user out.
    let cookie = single_set_cookie(resp.headers(), AUTH_COOKIE_NAME);
    assert!(cookie.starts_with(&format!("{AUTH_COOKIE_NAME}={token}")), "{cookie}");
    assert!(cookie.contains("Max-Age=86400"), "{cookie}");

    mock.assert_async().await;
    Ok(())
}

// ============================================================================
// Validation failures never reach the backend
// ============================================================================

#[actix_web::test]
async fn empty_password_renders_form_without_backend_call() -> Result<(), Box<dyn std::error::Error>> {
    let mut backend = BackendStub::start().await;
    let mock = backend
        .server
        .mock("POST", "/api/login")
        .expect(0)
        .create_async()
        .await;

    let app = create_test_app(backend.state()).build().await;
    let req = test::TestRequest::post()
        .uri("/api/login")
        .set_form([("email", "test@example.com"), ("password", "")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_no_cookie(resp.headers(), AUTH_COOKIE_NAME);
    let body = String::from_utf8(test::read_body(resp).await.to_vec())?;
    assert!(body.contains(CORRECT_ERRORS));
    assert!(body.contains(PASSWORD_REQUIRED));
    assert!(body.contains("value=\"test@example.com\""), "email should be restored");

    mock.assert_async().await;
    Ok(())
}

#[actix_web::test]
async fn malformed_email_is_reported_per_field() -> Result<(), Box<dyn std::error::Error>> {
    let mut backend = BackendStub::start().await;
    let mock = backend
        .server
        .mock("POST", "/api/login")
        .expect(0)
        .create_async()
        .await;

    let app = create_test_app(backend.state()).build().await;
    let req = test::TestRequest::post()
        .uri("/api/login")
        .set_form([("email", "not-an-email"), ("password", "whatever")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    let body = String::from_utf8(test::read_body(resp).await.to_vec())?;
    assert!(body.contains(EMAIL_INVALID));
    assert!(!body.contains(PASSWORD_REQUIRED));

    mock.assert_async().await;
    Ok(())
}

// ============================================================================
// Backend failures
// ============================================================================

#[actix_web::test]
async fn rejected_credentials_show_generic_message() -> Result<(), Box<dyn std::error::Error>> {
    let mut backend = BackendStub::start().await;
    let mock = backend
        .json(
            "POST",
            "/api/login",
            401,
            json!({ "message": "Invalid credentials: no such user" }),
        )
        .await;

    let app = create_test_app(backend.state()).build().await;
    let req = test::TestRequest::post()
        .uri("/api/login")
        .set_form([("email", "who@example.com"), ("password", "wrong")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_no_cookie(resp.headers(), AUTH_COOKIE_NAME);
    let body = String::from_utf8(test::read_body(resp).await.to_vec())?;
    assert!(body.contains(INVALID_CREDENTIALS));
    assert!(!body.contains("no such user"), "backend detail must not leak");
    assert!(body.contains("value=\"who@example.com\""));

    mock.assert_async().await;
    Ok(())
}

#[actix_web::test]
async fn rejected_credentials_are_logged_with_backend_detail() -> Result<(), Box<dyn std::error::Error>> {
    let mut backend = BackendStub::start().await;
    let mock = backend
        .json("POST", "/api/login", 401, json!({ "message": "Invalid credentials" }))
        .await;

    let app = create_test_app(backend.state()).build().await;
    let logs = CapturedLogs::start();
    let req = test::TestRequest::post()
        .uri("/api/login")
        .set_form([("email", "who@example.com"), ("password", "wrong")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body = String::from_utf8(test::read_body(resp).await.to_vec())?;

    let captured = logs.contents();
    assert!(captured.contains("SECURITY_LOGIN_FAILED"), "{captured}");
    assert!(captured.contains("Invalid credentials"), "{captured}");
    assert!(!captured.contains("who@example.com"), "email must be redacted: {captured}");

    assert!(body.contains(INVALID_CREDENTIALS));
    assert!(!body.contains("Invalid credentials"), "backend detail must not leak");

    mock.assert_async().await;
    Ok(())
}

#[actix_web::test]
async fn unreachable_backend_shows_server_error() -> Result<(), Box<dyn std::error::Error>> {
    // Nothing listens on the discard port.
    let backend = BackendStub::start().await;
    let state = backend.state_with(frontend::Config::for_backend("http://127.0.0.1:9"));

    let app = create_test_app(state).build().await;
    let req = test::TestRequest::post()
        .uri("/api/login")
        .set_form([("email", "who@example.com"), ("password", "secret")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(resp).await.to_vec())?;
    assert!(body.contains(SERVER_ERROR));
    assert!(!body.contains(INVALID_CREDENTIALS));
    Ok(())
}
