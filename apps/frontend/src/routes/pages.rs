use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use tracing::{debug, error};

use super::{html_response, live_features, redirect, render_page, static_features, ERROR_ROUTE};
use crate::auth::Identity;
use crate::state::app_state::AppState;
use crate::views::{FormState, Page, View};

/// Plain-text last resort when the error page itself cannot be rendered.
pub const ERROR_FALLBACK_TEXT: &str = "An unexpected error occurred. Please try again later.";

async fn home(state: web::Data<AppState>, user: Identity) -> HttpResponse {
    let view = View::new(Page::Home, user, static_features(&state));
    render_page(&state, &view, StatusCode::OK)
}

/// Open roles only.
async fn jobs(state: web::Data<AppState>, user: Identity) -> HttpResponse {
    let roles = match state.api.get_job_roles_public().await {
        Ok(roles) => roles,
        Err(failure) => {
            error!(error = %failure, status = ?failure.status, "error fetching jobs");
            return redirect(ERROR_ROUTE);
        }
    };
    let roles = roles.into_iter().filter(|role| role.is_open()).collect();

    let view = View::new(Page::Jobs { roles }, user, live_features(&state).await);
    render_page(&state, &view, StatusCode::OK)
}

async fn job_detail(
    state: web::Data<AppState>,
    user: Identity,
    path: web::Path<String>,
) -> HttpResponse {
    let raw_id = path.into_inner();
    let Ok(id) = raw_id.trim().parse::<i64>() else {
        error!(job_id = %raw_id, "invalid job id");
        return redirect(ERROR_ROUTE);
    };

    debug!(job_id = id, "fetching job role");
    let role = match state.api.get_job_role(id).await {
        Ok(role) => role,
        Err(failure) => {
            error!(job_id = id, error = %failure, status = ?failure.status, "error fetching job");
            return redirect(ERROR_ROUTE);
        }
    };

    let view = View::new(Page::JobDetail { role }, user, live_features(&state).await);
    render_page(&state, &view, StatusCode::OK)
}

async fn login_page(state: web::Data<AppState>, user: Identity) -> HttpResponse {
    let view = View::new(
        Page::Login {
            form: FormState::default(),
        },
        user,
        static_features(&state),
    );
    render_page(&state, &view, StatusCode::OK)
}

async fn register_page(state: web::Data<AppState>, user: Identity) -> HttpResponse {
    let view = View::new(
        Page::Register {
            form: FormState::default(),
        },
        user,
        static_features(&state),
    );
    render_page(&state, &view, StatusCode::OK)
}

/// Redirecting here on failure would loop, so the fallback is plain text.
async fn error_page(state: web::Data<AppState>, user: Identity) -> HttpResponse {
    let view = View::new(Page::Error, user, static_features(&state));
    match state.renderer.render(&view) {
        Ok(html) => html_response(StatusCode::INTERNAL_SERVER_ERROR, html),
        Err(err) => {
            error!(error = %err, "failed to render error page");
            HttpResponse::InternalServerError()
                .content_type("text/plain; charset=utf-8")
                .body(ERROR_FALLBACK_TEXT)
        }
    }
}

async fn login_failed_page(state: web::Data<AppState>, user: Identity) -> HttpResponse {
    let view = View::new(Page::LoginFailed, user, static_features(&state));
    render_page(&state, &view, StatusCode::UNAUTHORIZED)
}

async fn register_failed_page(state: web::Data<AppState>, user: Identity) -> HttpResponse {
    let view = View::new(Page::RegisterFailed, user, static_features(&state));
    render_page(&state, &view, StatusCode::BAD_REQUEST)
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home))
        .route("/jobs", web::get().to(jobs))
        .route("/job-roles/{id}", web::get().to(job_detail))
        .route("/login", web::get().to(login_page))
        .route("/register", web::get().to(register_page))
        .route("/error", web::get().to(error_page))
        .route("/login-failed", web::get().to(login_failed_page))
        .route("/register-failed", web::get().to(register_failed_page));
}
