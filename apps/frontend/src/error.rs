use actix_web::error::{HttpError, ResponseError};
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::api_client::ApiFailure;
use crate::trace_ctx;
use crate::views::RenderError;

/// JSON error envelope returned by the `/api/*` and upload endpoints.
///
/// Mirrors the `{ success, message }` shape the browser scripts expect, with
/// the machine-readable code and trace id appended.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    pub code: String,
    pub trace_id: String,
}

const GENERIC_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {detail}")]
    BadRequest { code: &'static str, detail: String },
    #[error("Unauthorized: {detail}")]
    Unauthorized { detail: String },
    #[error("Upstream error: {detail}")]
    Upstream { detail: String, status: Option<u16> },
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
    #[error("Internal error: {detail}")]
    Internal { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
}

impl AppError {
    fn code(&self) -> &'static str {
        match self {
            AppError::BadRequest { code, .. } => code,
            AppError::Unauthorized { .. } => "UNAUTHORIZED",
            AppError::Upstream { .. } => "UPSTREAM_ERROR",
            AppError::Render(_) => "RENDER_ERROR",
            AppError::Internal { .. } => "INTERNAL",
            AppError::Config { .. } => "CONFIG_ERROR",
        }
    }

    /// Message that is safe to show to the end user.
    ///
    /// Internal details (render failures, misconfiguration) are replaced by a
    /// generic message; they are logged in `error_response` instead.
    pub fn user_message(&self) -> String {
        match self {
            AppError::BadRequest { detail, .. } => detail.clone(),
            AppError::Unauthorized { detail } => detail.clone(),
            AppError::Upstream { detail, .. } => detail.clone(),
            AppError::Render(_) | AppError::Internal { .. } | AppError::Config { .. } => {
                GENERIC_MESSAGE.to_string()
            }
        }
    }

    /// Get the HTTP status code for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            // Upstream failures keep the backend's status so the browser sees
            // the same 4xx the backend produced; transport failures become 500.
            AppError::Upstream { status, .. } => status
                .and_then(|code| StatusCode::from_u16(code).ok())
                .filter(|code| code.is_client_error() || code.is_server_error())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            AppError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn bad_request(code: &'static str, detail: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            detail: detail.into(),
        }
    }

    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::Unauthorized {
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }
}

impl From<ApiFailure> for AppError {
    fn from(failure: ApiFailure) -> Self {
        AppError::Upstream {
            detail: failure.message,
            status: failure.status,
        }
    }
}

/// Header construction failures, e.g. a cookie value that is not a valid
/// header value.
impl From<HttpError> for AppError {
    fn from(e: HttpError) -> Self {
        AppError::internal(format!("http error: {e}"))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let trace_id = trace_ctx::trace_id();

        if status.is_server_error() {
            error!(trace_id = %trace_id, code = self.code(), error = %self, "request failed");
        }

        let body = ErrorBody {
            success: false,
            message: self.user_message(),
            code: self.code().to_string(),
            trace_id: trace_id.clone(),
        };

        HttpResponse::build(status)
            .insert_header(("x-trace-id", trace_id))
            .json(body)
    }
}
