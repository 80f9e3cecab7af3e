use actix_web::http::StatusCode;
use actix_web::test;

use crate::support::{create_test_app, BackendStub};

#[actix_web::test]
async fn home_page_renders_without_backend() -> Result<(), Box<dyn std::error::Error>> {
    let mut backend = BackendStub::start().await;
    let mock = backend
        .server
        .mock("GET", mockito::Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let app = create_test_app(backend.state()).build().await;
    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/html"));
    let body = String::from_utf8(test::read_body(resp).await.to_vec())?;
    assert!(body.contains("<title>Kainos Job Roles</title>"));
    assert!(body.contains("Find your dream job with us!"));

    mock.assert_async().await;
    Ok(())
}

#[actix_web::test]
async fn login_and_register_pages_render_empty_forms() -> Result<(), Box<dyn std::error::Error>> {
    let backend = BackendStub::start().await;
    let app = create_test_app(backend.state()).build().await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/login").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(resp).await.to_vec())?;
    assert!(body.contains("action=\"/api/login\""));
    assert!(!body.contains("confirmPassword"));

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/register").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(resp).await.to_vec())?;
    assert!(body.contains("action=\"/api/register\""));
    assert!(body.contains("name=\"confirmPassword\""));
    Ok(())
}

#[actix_web::test]
async fn failure_pages_use_their_statuses() -> Result<(), Box<dyn std::error::Error>> {
    let backend = BackendStub::start().await;
    let app = create_test_app(backend.state()).build().await;

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/login-failed").to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/register-failed").to_request())
            .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/error").to_request()).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = String::from_utf8(test::read_body(resp).await.to_vec())?;
    assert!(body.contains("Something went wrong"));
    Ok(())
}

#[actix_web::test]
async fn health_is_plain_and_uncached() -> Result<(), Box<dyn std::error::Error>> {
    let backend = BackendStub::start().await;
    let app = create_test_app(backend.state()).build().await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("cache-control").and_then(|v| v.to_str().ok()),
        Some("no-store")
    );
    assert!(resp.headers().contains_key("content-security-policy"));
    assert_eq!(test::read_body(resp).await.as_ref(), b"ok");
    Ok(())
}
