use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::test;
use frontend::routes::applications::{APPLICATION_SUBMITTED, NOT_AN_APPLICANT};
use frontend::validation::{CV_INVALID_FORMAT, CV_REQUIRED, CV_TOO_LARGE, JOB_ROLE_ID_NOT_POSITIVE};
use frontend::AUTH_COOKIE_NAME;
use frontend_test_support::error_body::assert_error_body;
use mockito::Matcher;
use serde_json::{json, Value};

use super::multipart::{self, pdf, FilePart};
use crate::support::tokens::{admin_token, applicant_token};
use crate::support::{create_test_app, BackendStub};

const PDF_BYTES: &[u8] = b"%PDF-1.4 minimal";

fn with_session(req: test::TestRequest, token: &str) -> test::TestRequest {
    req.cookie(Cookie::new(AUTH_COOKIE_NAME, token.to_string()))
}

#[actix_web::test]
async fn applicant_upload_is_forwarded() -> Result<(), Box<dyn std::error::Error>> {
    let mut backend = BackendStub::start().await;
    let token = applicant_token("applicant@example.com");
    let mock = backend
        .server
        .mock("POST", "/api/apply")
        .match_header("authorization", format!("Bearer {token}").as_str())
        .match_header("content-type", Matcher::Regex("^multipart/form-data".to_string()))
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("name=\"jobRoleId\"\r\n\r\n5".to_string()),
            Matcher::Regex("filename=\"cv.pdf\"".to_string()),
            Matcher::Regex("%PDF-1.4 minimal".to_string()),
        ]))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(json!({ "id": 99 }).to_string())
        .expect(1)
        .create_async()
        .await;

    let app = create_test_app(backend.state()).build().await;
    let req = with_session(
        multipart::post("/job-roles/5/apply", multipart::body(&[pdf(PDF_BYTES)], &[])),
        &token,
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "success": true, "message": APPLICATION_SUBMITTED }));

    mock.assert_async().await;
    Ok(())
}

// ============================================================================
// Who may apply
// ============================================================================

#[actix_web::test]
async fn anonymous_upload_is_unauthorized() -> Result<(), Box<dyn std::error::Error>> {
    let mut backend = BackendStub::start().await;
    let mock = backend
        .server
        .mock("POST", "/api/apply")
        .expect(0)
        .create_async()
        .await;

    let app = create_test_app(backend.state()).build().await;
    let req = multipart::post("/job-roles/5/apply", multipart::body(&[pdf(PDF_BYTES)], &[]))
        .to_request();
    let resp = test::call_service(&app, req).await;

    let status = resp.status();
    let headers = resp.headers().clone();
    let body = test::read_body(resp).await;
    assert_error_body(
        status,
        &headers,
        &body,
        StatusCode::UNAUTHORIZED,
        "UNAUTHORIZED",
        NOT_AN_APPLICANT,
    );

    mock.assert_async().await;
    Ok(())
}

#[actix_web::test]
async fn admin_cannot_apply() -> Result<(), Box<dyn std::error::Error>> {
    let backend = BackendStub::start().await;
    let app = create_test_app(backend.state()).build().await;

    let req = with_session(
        multipart::post("/job-roles/5/apply", multipart::body(&[pdf(PDF_BYTES)], &[])),
        &admin_token("boss@example.com"),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

// ============================================================================
// Upload validation
// ============================================================================

async fn rejected_with(
    backend: &BackendStub,
    uri: &str,
    payload: Vec<u8>,
    expected_message: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(backend.state()).build().await;
    let req = with_session(
        multipart::post(uri, payload),
        &applicant_token("applicant@example.com"),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    let status = resp.status();
    let headers = resp.headers().clone();
    let body = test::read_body(resp).await;
    assert_error_body(
        status,
        &headers,
        &body,
        StatusCode::BAD_REQUEST,
        "INVALID_UPLOAD",
        expected_message,
    );
    Ok(())
}

#[actix_web::test]
async fn missing_cv_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let mut backend = BackendStub::start().await;
    let mock = backend
        .server
        .mock("POST", "/api/apply")
        .expect(0)
        .create_async()
        .await;

    // Only an unrelated text field.
    rejected_with(
        &backend,
        "/job-roles/5/apply",
        multipart::body(&[], &[("note", "hello")]),
        CV_REQUIRED,
    )
    .await?;

    // A browser posting an empty file input.
    let empty = FilePart {
        name: "cv",
        file_name: "",
        content_type: "application/octet-stream",
        data: b"",
    };
    rejected_with(
        &backend,
        "/job-roles/5/apply",
        multipart::body(&[empty], &[]),
        CV_REQUIRED,
    )
    .await?;

    mock.assert_async().await;
    Ok(())
}

#[actix_web::test]
async fn wrong_format_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let backend = BackendStub::start().await;
    let image = FilePart {
        name: "cv",
        file_name: "photo.png",
        content_type: "image/png",
        data: b"\x89PNG",
    };
    rejected_with(
        &backend,
        "/job-roles/5/apply",
        multipart::body(&[image], &[]),
        CV_INVALID_FORMAT,
    )
    .await
}

#[actix_web::test]
async fn oversized_cv_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let backend = BackendStub::start().await;
    let big = vec![b'a'; 5 * 1024 * 1024 + 1];
    rejected_with(
        &backend,
        "/job-roles/5/apply",
        multipart::body(&[pdf(&big)], &[]),
        CV_TOO_LARGE,
    )
    .await
}

#[actix_web::test]
async fn non_positive_job_id_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let backend = BackendStub::start().await;
    rejected_with(
        &backend,
        "/job-roles/0/apply",
        multipart::body(&[pdf(PDF_BYTES)], &[]),
        JOB_ROLE_ID_NOT_POSITIVE,
    )
    .await
}

// ============================================================================
// Backend outcome
// ============================================================================

#[actix_web::test]
async fn backend_rejection_keeps_status_and_message() -> Result<(), Box<dyn std::error::Error>> {
    let mut backend = BackendStub::start().await;
    let _mock = backend
        .json(
            "POST",
            "/api/apply",
            409,
            json!({ "message": "You have already applied for this role" }),
        )
        .await;

    let app = create_test_app(backend.state()).build().await;
    let req = with_session(
        multipart::post("/job-roles/5/apply", multipart::body(&[pdf(PDF_BYTES)], &[])),
        &applicant_token("applicant@example.com"),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    let status = resp.status();
    let headers = resp.headers().clone();
    let body = test::read_body(resp).await;
    assert_error_body(
        status,
        &headers,
        &body,
        StatusCode::CONFLICT,
        "UPSTREAM_ERROR",
        "You have already applied for this role",
    );
    Ok(())
}
