//! Server-side form validation.
//!
//! Every rule for a field is checked and the first failing message per field is
//! kept, so forms can show one message next to each input.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::api_client::Credentials;

pub const MAX_CV_SIZE_BYTES: usize = 5 * 1024 * 1024;
pub const ALLOWED_CV_EXTENSIONS: [&str; 3] = ["pdf", "doc", "docx"];
pub const ALLOWED_CV_MIME_TYPES: [&str; 3] = [
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

pub const EMAIL_REQUIRED: &str = "Email is required";
pub const EMAIL_INVALID: &str = "Enter a valid email address";
pub const PASSWORD_REQUIRED: &str = "Password is required";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters";
pub const PASSWORD_TOO_WEAK: &str = "Password must include a number and special character";
pub const CONFIRM_REQUIRED: &str = "Please confirm your password";
pub const PASSWORDS_DIFFER: &str = "Passwords do not match";
pub const CV_REQUIRED: &str = "CV file is required";
pub const CV_TOO_LARGE: &str = "File size must not exceed 5 MB";
pub const CV_INVALID_FORMAT: &str =
    "Invalid file format. Please upload a PDF or Word document (DOC/DOCX).";
pub const JOB_ROLE_ID_REQUIRED: &str = "Job role ID is required";
pub const JOB_ROLE_ID_NOT_POSITIVE: &str = "Job role ID must be a positive number";

const MIN_PASSWORD_LEN: usize = 6;
const PASSWORD_SPECIALS: &[char] = &['!', '@', '#', '$', '%', '^', '&', '*'];

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap()
});

/// Field name to first failing message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<&'static str, &'static str>);

impl FieldErrors {
    pub fn add(&mut self, field: &'static str, message: &'static str) {
        self.0.entry(field).or_insert(message);
    }

    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.0.get(field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The message to surface when only one can be shown.
    pub fn first(&self) -> Option<&'static str> {
        self.0.values().next().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    fn into_result<T>(self, ok: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(ok)
        } else {
            Err(self)
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrationForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, rename = "confirmPassword")]
    pub confirm_password: String,
}

/// Metadata of an uploaded CV; the bytes themselves are not needed to validate.
#[derive(Debug, Clone)]
pub struct CvUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub size: usize,
}

fn check_email(email: &str, errors: &mut FieldErrors) {
    if email.is_empty() {
        errors.add("email", EMAIL_REQUIRED);
    } else if !EMAIL_REGEX.is_match(email) {
        errors.add("email", EMAIL_INVALID);
    }
}

pub fn validate_login(form: &LoginForm) -> Result<Credentials, FieldErrors> {
    let mut errors = FieldErrors::default();
    check_email(&form.email, &mut errors);
    if form.password.is_empty() {
        errors.add("password", PASSWORD_REQUIRED);
    }
    errors.into_result(Credentials {
        email: form.email.clone(),
        password: form.password.clone(),
    })
}

pub fn validate_registration(form: &RegistrationForm) -> Result<Credentials, FieldErrors> {
    let mut errors = FieldErrors::default();
    check_email(&form.email, &mut errors);

    let password = &form.password;
    if password.is_empty() {
        errors.add("password", PASSWORD_REQUIRED);
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.add("password", PASSWORD_TOO_SHORT);
    } else if !password.chars().any(|c| c.is_ascii_digit())
        || !password.contains(PASSWORD_SPECIALS)
    {
        errors.add("password", PASSWORD_TOO_WEAK);
    }

    if form.confirm_password.is_empty() {
        errors.add("confirmPassword", CONFIRM_REQUIRED);
    } else if form.confirm_password != form.password {
        errors.add("confirmPassword", PASSWORDS_DIFFER);
    }

    errors.into_result(Credentials {
        email: form.email.clone(),
        password: form.password.clone(),
    })
}

fn extension(file_name: &str) -> Option<String> {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

/// Validate an application upload, returning the parsed job role id.
pub fn validate_cv(cv: Option<&CvUpload>, raw_job_role_id: &str) -> Result<i64, FieldErrors> {
    let mut errors = FieldErrors::default();

    match cv {
        None => errors.add("cv", CV_REQUIRED),
        Some(cv) => {
            if cv.size > MAX_CV_SIZE_BYTES {
                errors.add("cv", CV_TOO_LARGE);
            }
            let extension_ok = extension(&cv.file_name)
                .is_some_and(|ext| ALLOWED_CV_EXTENSIONS.contains(&ext.as_str()));
            let mime_ok = cv
                .content_type
                .as_deref()
                .filter(|mime| !mime.is_empty())
                .is_none_or(|mime| ALLOWED_CV_MIME_TYPES.contains(&mime));
            if !(extension_ok && mime_ok) {
                errors.add("cv", CV_INVALID_FORMAT);
            }
        }
    }

    let job_role_id = match raw_job_role_id.trim() {
        "" => {
            errors.add("jobRoleId", JOB_ROLE_ID_REQUIRED);
            0
        }
        raw => match raw.parse::<i64>() {
            Ok(id) if id > 0 => id,
            Ok(_) => {
                errors.add("jobRoleId", JOB_ROLE_ID_NOT_POSITIVE);
                0
            }
            Err(_) => {
                errors.add("jobRoleId", JOB_ROLE_ID_REQUIRED);
                0
            }
        },
    };

    errors.into_result(job_role_id)
}
