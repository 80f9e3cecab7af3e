//! Application configuration loaded from environment variables.
//!
//! `Config::from_env` is the only place the process environment is read for
//! application settings; everything downstream receives the parsed values.
//! Logging reads `RUST_LOG` and `LOG_FORMAT` itself, before config loads.

use std::collections::BTreeMap;
use std::env;

use crate::error::AppError;
use crate::features::{JOB_APPLY, JOB_DETAIL_VIEW};
use crate::validation::MAX_CV_SIZE_BYTES;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
/// Headroom on top of the CV limit for multipart boundaries and the other fields.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Deployment environment. Only `Production` changes behavior (secure cookies).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEnv {
    Development,
    Test,
    Production,
}

impl RuntimeEnv {
    /// Only the exact value `production` selects production.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "production" => RuntimeEnv::Production,
            "test" => RuntimeEnv::Test,
            _ => RuntimeEnv::Development,
        }
    }

    pub fn is_production(self) -> bool {
        self == RuntimeEnv::Production
    }
}

/// Environment-provided fallbacks for feature flags, used when the backend's
/// flag endpoint cannot be reached. The admin dashboard toggle is purely local.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureDefaults {
    pub job_detail_view: bool,
    pub job_apply: bool,
    pub admin_dashboard: bool,
}

impl FeatureDefaults {
    /// Flag map served when the backend flag fetch fails.
    pub fn to_flags(&self) -> BTreeMap<String, bool> {
        BTreeMap::from([
            (JOB_DETAIL_VIEW.to_string(), self.job_detail_view),
            (JOB_APPLY.to_string(), self.job_apply),
        ])
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    // Server configuration
    pub host: String,
    pub port: u16,
    pub runtime_env: RuntimeEnv,

    // Backend API
    pub api_base_url: String,

    // Feature toggles
    pub features: FeatureDefaults,

    // Request body limits
    pub max_upload_size: usize,
}

impl Config {
    /// Load and validate all configuration from the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("FRONTEND_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                AppError::config(format!("PORT must be a valid port number, got '{raw}'"))
            })?,
            None => DEFAULT_PORT,
        };

        // RUNTIME_ENV wins; NODE_ENV is honoured for deployments that still set it.
        let runtime_env = lookup("RUNTIME_ENV")
            .or_else(|| lookup("NODE_ENV"))
            .map(|raw| RuntimeEnv::parse(&raw))
            .unwrap_or(RuntimeEnv::Development);

        let api_base_url = lookup("API_BASE_URL")
            .map(|raw| raw.trim().trim_end_matches('/').to_string())
            .filter(|raw| !raw.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
            return Err(AppError::config(format!(
                "API_BASE_URL must start with http:// or https://, got '{api_base_url}'"
            )));
        }

        let flag = |name: &str| lookup(name).is_some_and(|value| value == "true");
        let features = FeatureDefaults {
            job_detail_view: flag("FEATURE_JOB_DETAIL_VIEW"),
            job_apply: flag("FEATURE_JOB_APPLY"),
            admin_dashboard: flag("FEATURE_ADMIN_DASHBOARD"),
        };

        let max_upload_size = lookup("MAX_UPLOAD_SIZE")
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .unwrap_or(MAX_CV_SIZE_BYTES + MULTIPART_OVERHEAD);

        Ok(Config {
            host,
            port,
            runtime_env,
            api_base_url,
            features,
            max_upload_size,
        })
    }

    /// Configuration pointing at a stub backend, for tests.
    pub fn for_backend(api_base_url: impl Into<String>) -> Self {
        Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            runtime_env: RuntimeEnv::Test,
            api_base_url: api_base_url.into(),
            features: FeatureDefaults::default(),
            max_upload_size: MAX_CV_SIZE_BYTES + MULTIPART_OVERHEAD,
        }
    }
}
