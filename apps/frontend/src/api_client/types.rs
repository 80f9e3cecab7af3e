use std::collections::BTreeMap;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/login` and `POST /api/register`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    pub token: String,
}

/// Registration may or may not sign the user in straight away.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct RegisterResponse {
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobRole {
    pub id: i64,
    pub role_name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub capability: String,
    #[serde(default)]
    pub band: String,
    #[serde(default)]
    pub closing_date: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    #[serde(default)]
    pub sharepoint_url: Option<String>,
    #[serde(default)]
    pub number_of_open_positions: Option<u32>,
}

impl JobRole {
    /// Only `open` roles (any casing) are listed to applicants.
    pub fn is_open(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|status| status.eq_ignore_ascii_case("open"))
    }
}

/// Flat `flagName -> enabled` map served by `GET /api/feature-flags`.
pub type FeatureFlags = BTreeMap<String, bool>;

/// A validated CV upload bound for `POST /api/apply`.
#[derive(Debug, Clone)]
pub struct JobApplication {
    pub job_role_id: i64,
    pub file_name: String,
    pub content_type: Option<String>,
    pub cv: Bytes,
}

/// Whatever the backend returns for an accepted application; not interpreted.
pub type ApplicationReceipt = serde_json::Value;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct BackendErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
