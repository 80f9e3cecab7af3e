//! Page models and the renderer seam.
//!
//! Handlers build a [`View`] and hand it to the [`PageRenderer`] held in
//! `AppState`. Rendering never panics or redirects on its own; a failure comes
//! back as [`RenderError`] and the handler picks the fallback.

mod html;

use std::fmt;

use thiserror::Error;

pub use html::{escape, HtmlRenderer};

use crate::api_client::JobRole;
use crate::auth::Identity;
use crate::validation::FieldErrors;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template '{template}' failed: {detail}")]
    Template {
        template: &'static str,
        detail: String,
    },
    #[error("formatting failed")]
    Fmt(#[from] fmt::Error),
}

/// Feature switches that change what a page shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureView {
    pub admin_dashboard: bool,
    pub job_detail_view: bool,
    pub job_apply_view: bool,
}

/// Values shared by every page: layout title, active nav entry, the visitor.
#[derive(Debug, Clone)]
pub struct PageContext {
    pub title: String,
    pub current_page: Option<&'static str>,
    pub user: Identity,
    pub features: FeatureView,
}

/// Login and registration form state, re-rendered after a failed submit.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub email: String,
    pub errors: FieldErrors,
    pub error_message: Option<String>,
}

impl FormState {
    pub fn with_message(email: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            errors: FieldErrors::default(),
            error_message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Page {
    Home,
    Jobs { roles: Vec<JobRole> },
    JobDetail { role: JobRole },
    Login { form: FormState },
    Register { form: FormState },
    Error,
    LoginFailed,
    RegisterFailed,
    AdminDashboard,
    AdminJobs { roles: Vec<JobRole> },
    AdminCreateJob,
    AdminCreateAdmin,
}

impl Page {
    pub fn template_name(&self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::Jobs { .. } => "jobs",
            Page::JobDetail { .. } => "job-detail",
            Page::Login { .. } => "login",
            Page::Register { .. } => "register",
            Page::Error => "error",
            Page::LoginFailed => "login-failed",
            Page::RegisterFailed => "register-failed",
            Page::AdminDashboard => "admin-dashboard",
            Page::AdminJobs { .. } => "admin-jobs",
            Page::AdminCreateJob => "admin-create-job",
            Page::AdminCreateAdmin => "admin-create-admin",
        }
    }

    pub fn title(&self) -> String {
        match self {
            Page::Home => "Kainos Job Roles".to_string(),
            Page::Jobs { .. } => "Available Job Roles - Kainos".to_string(),
            Page::JobDetail { role } => format!("{} - Kainos", role.role_name),
            Page::Login { .. } => "Login - Kainos".to_string(),
            Page::Register { .. } => "Register - Kainos".to_string(),
            Page::Error => "Error - Kainos".to_string(),
            Page::LoginFailed => "Login Failed - Kainos".to_string(),
            Page::RegisterFailed => "Registration Failed - Kainos".to_string(),
            Page::AdminDashboard => "Admin Dashboard - Kainos".to_string(),
            Page::AdminJobs { .. } => "Manage Job Listings - Kainos".to_string(),
            Page::AdminCreateJob => "Create New Job - Kainos".to_string(),
            Page::AdminCreateAdmin => "Create Admin Account - Kainos".to_string(),
        }
    }

    /// Nav entry highlighted for this page.
    pub fn current_page(&self) -> Option<&'static str> {
        match self {
            Page::Home => Some("home"),
            Page::Jobs { .. } | Page::JobDetail { .. } => Some("jobs"),
            Page::Login { .. } => Some("login"),
            Page::Register { .. } => Some("register"),
            Page::AdminDashboard
            | Page::AdminJobs { .. }
            | Page::AdminCreateJob
            | Page::AdminCreateAdmin => Some("admin"),
            Page::Error | Page::LoginFailed | Page::RegisterFailed => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct View {
    pub context: PageContext,
    pub page: Page,
}

impl View {
    pub fn new(page: Page, user: Identity, features: FeatureView) -> Self {
        Self {
            context: PageContext {
                title: page.title(),
                current_page: page.current_page(),
                user,
                features,
            },
            page,
        }
    }
}

pub trait PageRenderer: Send + Sync {
    fn render(&self, view: &View) -> Result<String, RenderError>;
}
