use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::test;
use frontend::AUTH_COOKIE_NAME;
use frontend_test_support::responses::{assert_cookie_cleared, assert_no_cookie};

use crate::support::tokens::{applicant_token, expired_token};
use crate::support::{create_test_app, BackendStub};

#[actix_web::test]
async fn valid_session_shows_email_and_logout() -> Result<(), Box<dyn std::error::Error>> {
    let backend = BackendStub::start().await;
    let app = create_test_app(backend.state()).build().await;

    let req = test::TestRequest::get()
        .uri("/")
        .cookie(Cookie::new(AUTH_COOKIE_NAME, applicant_token("me@example.com")))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_no_cookie(resp.headers(), AUTH_COOKIE_NAME);
    let body = String::from_utf8(test::read_body(resp).await.to_vec())?;
    assert!(body.contains("me@example.com"));
    assert!(body.contains("action=\"/api/logout\""));
    assert!(!body.contains("href=\"/login\""));
    Ok(())
}

#[actix_web::test]
async fn expired_session_is_anonymous_and_cleared() -> Result<(), Box<dyn std::error::Error>> {
    let backend = BackendStub::start().await;
    let app = create_test_app(backend.state()).build().await;

    let req = test::TestRequest::get()
        .uri("/")
        .cookie(Cookie::new(AUTH_COOKIE_NAME, expired_token("old@example.com")))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_cookie_cleared(resp.headers(), AUTH_COOKIE_NAME);
    let body = String::from_utf8(test::read_body(resp).await.to_vec())?;
    assert!(!body.contains("old@example.com"));
    assert!(body.contains("href=\"/login\""));
    Ok(())
}

#[actix_web::test]
async fn garbage_cookie_is_ignored() -> Result<(), Box<dyn std::error::Error>> {
    let backend = BackendStub::start().await;
    let app = create_test_app(backend.state()).build().await;

    let req = test::TestRequest::get()
        .uri("/api/auth-status")
        .cookie(Cookie::new(AUTH_COOKIE_NAME, "not-a-token"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_no_cookie(resp.headers(), AUTH_COOKIE_NAME);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["isAuthenticated"], false);
    Ok(())
}

#[actix_web::test]
async fn every_response_carries_request_id() -> Result<(), Box<dyn std::error::Error>> {
    let backend = BackendStub::start().await;
    let app = create_test_app(backend.state()).build().await;

    let first = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    let second = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

    let first_id = crate::common::request_id(first.headers());
    let second_id = crate::common::request_id(second.headers());
    assert!(!first_id.is_empty());
    assert_ne!(first_id, second_id);
    Ok(())
}
