//! Login, registration and logout.
//!
//! Form problems are rendered inline and never reach the backend. Backend
//! rejections are logged with the raw message, while the visitor only sees a
//! fixed message.

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use tracing::{error, info};

use super::{redirect, render_page, static_features, ERROR_ROUTE};
use crate::api_client::ApiFailure;
use crate::auth::Identity;
use crate::extractors::FormOrJson;
use crate::logging::pii::Redacted;
use crate::logging::security;
use crate::state::app_state::AppState;
use crate::validation::{validate_login, validate_registration, LoginForm, RegistrationForm};
use crate::views::{FormState, Page, View};

pub const CORRECT_ERRORS: &str = "Please correct the errors";
pub const INVALID_CREDENTIALS: &str = "Invalid email or password. Please try again.";
pub const REGISTRATION_ERROR: &str = "Error registering.";
pub const SERVER_ERROR: &str = "A server error occurred. Please try again later.";

const AFTER_LOGIN: &str = "/jobs";

fn login_view(state: &AppState, user: Identity, form: FormState) -> HttpResponse {
    let view = View::new(Page::Login { form }, user, static_features(state));
    render_page(state, &view, StatusCode::OK)
}

fn register_view(state: &AppState, user: Identity, form: FormState) -> HttpResponse {
    let view = View::new(Page::Register { form }, user, static_features(state));
    render_page(state, &view, StatusCode::OK)
}

/// Redirect to `location` carrying the credential cookie for `token`.
fn signed_in_redirect(state: &AppState, token: &str, location: &str) -> HttpResponse {
    let mut res = redirect(location);
    match state.cookies.set(&mut res, token) {
        Ok(()) => res,
        Err(err) => {
            error!(error = %err, "failed to set credential cookie");
            redirect(ERROR_ROUTE)
        }
    }
}

fn failure_message(failure: &ApiFailure, rejected: &'static str) -> &'static str {
    if failure.is_transport() {
        SERVER_ERROR
    } else {
        rejected
    }
}

async fn login(
    state: web::Data<AppState>,
    user: Identity,
    body: FormOrJson<LoginForm>,
) -> HttpResponse {
    let form = body.into_inner();

    let credentials = match validate_login(&form) {
        Ok(credentials) => credentials,
        Err(errors) => {
            return login_view(
                &state,
                user,
                FormState {
                    email: form.email,
                    errors,
                    error_message: Some(CORRECT_ERRORS.to_string()),
                },
            );
        }
    };

    match state
        .api
        .login_user(&credentials.email, &credentials.password)
        .await
    {
        Ok(response) => {
            info!(email = %Redacted(&credentials.email), "login succeeded");
            signed_in_redirect(&state, &response.token, AFTER_LOGIN)
        }
        Err(failure) => {
            security::login_failed(&failure.message, failure.status, &credentials.email);
            let message = failure_message(&failure, INVALID_CREDENTIALS);
            login_view(&state, user, FormState::with_message(credentials.email, message))
        }
    }
}

async fn register(
    state: web::Data<AppState>,
    user: Identity,
    body: FormOrJson<RegistrationForm>,
) -> HttpResponse {
    let form = body.into_inner();

    let credentials = match validate_registration(&form) {
        Ok(credentials) => credentials,
        Err(errors) => {
            return register_view(
                &state,
                user,
                FormState {
                    email: form.email,
                    errors,
                    error_message: Some(CORRECT_ERRORS.to_string()),
                },
            );
        }
    };

    match state
        .api
        .register_user(&credentials.email, &credentials.password)
        .await
    {
        Ok(response) => match response.token {
            Some(token) => signed_in_redirect(&state, &token, AFTER_LOGIN),
            None => redirect("/login"),
        },
        Err(failure) => {
            security::registration_failed(&failure.message, failure.status, &credentials.email);
            let message = failure_message(&failure, REGISTRATION_ERROR);
            register_view(&state, user, FormState::with_message(credentials.email, message))
        }
    }
}

async fn logout(state: web::Data<AppState>) -> HttpResponse {
    let mut res = redirect("/");
    match state.cookies.clear(&mut res) {
        Ok(()) => res,
        Err(err) => {
            error!(error = %err, "failed to clear credential cookie");
            redirect(ERROR_ROUTE)
        }
    }
}

async fn auth_status(user: Identity) -> HttpResponse {
    HttpResponse::Ok().json(user)
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/login").route(web::post().to(login)))
        .service(web::resource("/api/register").route(web::post().to(register)))
        .service(web::resource("/api/logout").route(web::post().to(logout)))
        .service(web::resource("/api/auth-status").route(web::get().to(auth_status)));
}
