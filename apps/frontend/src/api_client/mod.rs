//! Outbound client for the backend REST API.
//!
//! Every operation is a single attempt with a fixed timeout. Failures are
//! normalized into [`ApiFailure`]: `status` carries the HTTP status of a
//! non-2xx answer and is `None` when no answer arrived at all. Callers decide
//! what a failure means for the page.

mod types;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

pub use types::{
    ApplicationReceipt, Credentials, FeatureFlags, JobApplication, JobRole, LoginResponse,
    RegisterResponse,
};
use types::BackendErrorBody;

use crate::features::FlagSource;

/// Applied to every outbound request; a timeout is reported like any other
/// transport failure.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ApiFailure {
    pub message: String,
    pub status: Option<u16>,
}

impl ApiFailure {
    /// No response was received (connection refused, DNS, timeout).
    pub fn is_transport(&self) -> bool {
        self.status.is_none()
    }
}

pub type ApiResult<T> = Result<T, ApiFailure>;

#[derive(Debug, Clone, Copy)]
enum Operation {
    Login,
    Register,
    JobRoles,
    JobRole,
    SubmitApplication,
    FeatureFlags,
}

impl Operation {
    fn name(self) -> &'static str {
        match self {
            Operation::Login => "login_user",
            Operation::Register => "register_user",
            Operation::JobRoles => "get_job_roles",
            Operation::JobRole => "get_job_role",
            Operation::SubmitApplication => "submit_job_application",
            Operation::FeatureFlags => "get_feature_flags",
        }
    }

    fn default_error(self) -> &'static str {
        match self {
            Operation::Login => "Login failed",
            Operation::Register => "Registration failed",
            Operation::JobRoles => "Failed to fetch job roles",
            Operation::JobRole => "Failed to fetch job role",
            Operation::SubmitApplication => "Failed to submit application",
            Operation::FeatureFlags => "Failed to fetch feature flags",
        }
    }

    fn failure(self, message: Option<String>, status: Option<StatusCode>) -> ApiFailure {
        let failure = ApiFailure {
            message: message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| self.default_error().to_string()),
            status: status.map(|s| s.as_u16()),
        };
        warn!(
            operation = self.name(),
            status = ?failure.status,
            error = %failure.message,
            "backend call failed"
        );
        failure
    }
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiFailure> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiFailure> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ApiFailure {
                message: format!("failed to build HTTP client: {err}"),
                status: None,
            })?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        op: Operation,
        request: RequestBuilder,
    ) -> ApiResult<T> {
        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                debug!(operation = op.name(), error = %err, timeout = err.is_timeout(), "no response from backend");
                return Err(op.failure(None, None));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let message = match response.bytes().await {
                Ok(body) => serde_json::from_slice::<BackendErrorBody>(&body)
                    .ok()
                    .and_then(|body| body.message),
                Err(_) => None,
            };
            return Err(op.failure(message, Some(status)));
        }

        match response.json::<T>().await {
            Ok(data) => Ok(data),
            Err(err) => {
                debug!(operation = op.name(), error = %err, "backend response did not decode");
                Err(op.failure(None, Some(status)))
            }
        }
    }

    pub async fn login_user(&self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        let body = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.execute(Operation::Login, self.http.post(self.url("/api/login")).json(&body))
            .await
    }

    pub async fn register_user(&self, email: &str, password: &str) -> ApiResult<RegisterResponse> {
        let body = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.execute(
            Operation::Register,
            self.http.post(self.url("/api/register")).json(&body),
        )
        .await
    }

    /// All job roles, sent with the caller's credential.
    pub async fn get_job_roles(&self, token: &str) -> ApiResult<Vec<JobRole>> {
        debug!(token_len = token.len(), "fetching job roles with credential");
        self.execute(
            Operation::JobRoles,
            self.http.get(self.url("/api/job-roles")).bearer_auth(token),
        )
        .await
    }

    pub async fn get_job_roles_public(&self) -> ApiResult<Vec<JobRole>> {
        self.execute(Operation::JobRoles, self.http.get(self.url("/api/job-roles")))
            .await
    }

    pub async fn get_job_role(&self, id: i64) -> ApiResult<JobRole> {
        self.execute(
            Operation::JobRole,
            self.http.get(self.url(&format!("/api/job-roles/{id}"))),
        )
        .await
    }

    pub async fn submit_job_application(
        &self,
        application: &JobApplication,
        token: &str,
    ) -> ApiResult<ApplicationReceipt> {
        let op = Operation::SubmitApplication;
        let part = Part::bytes(application.cv.to_vec()).file_name(application.file_name.clone());
        let part = match application.content_type.as_deref() {
            Some(mime) => part.mime_str(mime).map_err(|err| {
                debug!(error = %err, mime, "unusable CV content type");
                op.failure(None, None)
            })?,
            None => part,
        };
        let form = Form::new()
            .part("cv", part)
            .text("jobRoleId", application.job_role_id.to_string());

        self.execute(
            op,
            self.http
                .post(self.url("/api/apply"))
                .bearer_auth(token)
                .multipart(form),
        )
        .await
    }

    pub async fn get_feature_flags(&self) -> ApiResult<FeatureFlags> {
        self.execute(
            Operation::FeatureFlags,
            self.http.get(self.url("/api/feature-flags")),
        )
        .await
    }
}

#[async_trait]
impl FlagSource for BackendClient {
    async fn fetch(&self) -> ApiResult<FeatureFlags> {
        self.get_feature_flags().await
    }
}
