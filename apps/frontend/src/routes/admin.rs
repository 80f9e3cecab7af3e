use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use tracing::error;

use super::{redirect, render_page, static_features, ERROR_ROUTE};
use crate::auth::Identity;
use crate::state::app_state::AppState;
use crate::views::{Page, View};

fn admin_page(state: &AppState, user: Identity, page: Page) -> HttpResponse {
    let view = View::new(page, user, static_features(state));
    render_page(state, &view, StatusCode::OK)
}

async fn dashboard(state: web::Data<AppState>, user: Identity) -> HttpResponse {
    admin_page(&state, user, Page::AdminDashboard)
}

/// Every role regardless of status, for editing.
async fn jobs(state: web::Data<AppState>, user: Identity) -> HttpResponse {
    match state.api.get_job_roles_public().await {
        Ok(roles) => admin_page(&state, user, Page::AdminJobs { roles }),
        Err(failure) => {
            error!(error = %failure, status = ?failure.status, "error fetching jobs for admin");
            redirect(ERROR_ROUTE)
        }
    }
}

async fn create_job(state: web::Data<AppState>, user: Identity) -> HttpResponse {
    admin_page(&state, user, Page::AdminCreateJob)
}

async fn create_admin(state: web::Data<AppState>, user: Identity) -> HttpResponse {
    admin_page(&state, user, Page::AdminCreateAdmin)
}

/// Mounted under the `/admin` scope, behind `RequireAccess::admin()`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(dashboard))
        .route("/jobs", web::get().to(jobs))
        .route("/jobs/new", web::get().to(create_job))
        .route("/admins/new", web::get().to(create_admin));
}
