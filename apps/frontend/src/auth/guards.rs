//! Route-level authorization predicates.
//!
//! Guards never raise errors: a denial is a redirect target. Admin denials
//! go to the generic error page whether or not the caller is signed in, so
//! the response does not reveal that a session exists.

use actix_web::http::header;
use actix_web::HttpResponse;

use crate::auth::identity::{Identity, Role};

pub const LOGIN_ROUTE: &str = "/login";
pub const ERROR_ROUTE: &str = "/error";

/// Access level a scope requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Authenticated,
    Admin,
}

impl Access {
    pub fn check(self, identity: &Identity) -> Result<(), Denial> {
        match self {
            Access::Authenticated => require_auth(identity),
            Access::Admin => require_admin(identity),
        }
    }
}

/// Outcome of a failed guard: where to send the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Denial {
    pub redirect_to: &'static str,
}

impl Denial {
    pub fn into_response(self) -> HttpResponse {
        HttpResponse::Found()
            .insert_header((header::LOCATION, self.redirect_to))
            .finish()
    }
}

pub fn require_auth(identity: &Identity) -> Result<(), Denial> {
    if identity.is_authenticated {
        Ok(())
    } else {
        Err(Denial {
            redirect_to: LOGIN_ROUTE,
        })
    }
}

pub fn require_admin(identity: &Identity) -> Result<(), Denial> {
    if identity.is_authenticated && identity.role == Some(Role::Admin) {
        Ok(())
    } else {
        Err(Denial {
            redirect_to: ERROR_ROUTE,
        })
    }
}
