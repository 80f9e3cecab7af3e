//! HTTP surface: page controllers, auth endpoints, admin pages and the
//! application upload, plus the helpers they share for rendering and
//! redirects.

use actix_web::http::{header, StatusCode};
use actix_web::{web, HttpResponse};
use tracing::error;

use crate::features::{JOB_APPLY, JOB_DETAIL_VIEW};
use crate::middleware::RequireAccess;
use crate::state::app_state::AppState;
use crate::views::{FeatureView, View};

pub mod admin;
pub mod applications;
pub mod auth;
pub mod health;
pub mod pages;

pub const ERROR_ROUTE: &str = "/error";

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure_routes)
        .configure(auth::configure_routes)
        .configure(applications::configure_routes)
        .configure(pages::configure_routes)
        .service(
            web::scope("/admin")
                .wrap(RequireAccess::admin())
                .configure(admin::configure_routes),
        );
}

pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Render `view` with `status`; any render failure becomes a redirect to the
/// error page.
pub(crate) fn render_page(state: &AppState, view: &View, status: StatusCode) -> HttpResponse {
    match state.renderer.render(view) {
        Ok(html) => html_response(status, html),
        Err(err) => {
            error!(template = view.page.template_name(), error = %err, "failed to render page");
            redirect(ERROR_ROUTE)
        }
    }
}

pub(crate) fn html_response(status: StatusCode, html: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(html)
}

/// Feature switches for pages that do not depend on backend flags.
pub(crate) fn static_features(state: &AppState) -> FeatureView {
    FeatureView {
        admin_dashboard: state.config.features.admin_dashboard,
        ..FeatureView::default()
    }
}

/// Feature switches including the backend-driven job flags.
pub(crate) async fn live_features(state: &AppState) -> FeatureView {
    let flags = state.flags.load().await;
    FeatureView {
        admin_dashboard: state.config.features.admin_dashboard,
        job_detail_view: flags.get(JOB_DETAIL_VIEW).copied().unwrap_or(false),
        job_apply_view: flags.get(JOB_APPLY).copied().unwrap_or(false),
    }
}
