//! Resolves the credential cookie into the request's [`Identity`].
//!
//! Runs on every request and never rejects one. An expired token leaves the
//! request anonymous and the response carries a removal cookie, whatever the
//! downstream pipeline answered (guard redirects included), unless the handler
//! issued a fresh credential of its own.

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::warn;

use crate::auth::token;
use crate::auth::{AuthCookies, Identity, AUTH_COOKIE_NAME};
use crate::extractors::session_token::SessionToken;
use crate::logging::security;

/// Outcome of reading the credential cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    /// No cookie, an empty one, or a value that is not a readable token.
    Anonymous,
    /// A readable token past its `exp`; the cookie must be cleared.
    Expired { email: Option<String> },
    Authenticated { identity: Identity, token: String },
}

impl Session {
    pub fn identity(&self) -> Identity {
        match self {
            Session::Authenticated { identity, .. } => identity.clone(),
            Session::Anonymous | Session::Expired { .. } => Identity::anonymous(),
        }
    }
}

/// Classify a raw cookie value at `now_secs`.
pub fn resolve(cookie: Option<&str>, now_secs: f64) -> Session {
    let Some(raw) = cookie.filter(|value| !value.is_empty()) else {
        return Session::Anonymous;
    };
    let Some(payload) = token::decode(raw) else {
        return Session::Anonymous;
    };

    if payload.is_expired_at(now_secs) {
        Session::Expired {
            email: payload.user_email().map(str::to_owned),
        }
    } else {
        Session::Authenticated {
            identity: Identity::from_payload(&payload),
            token: raw.to_string(),
        }
    }
}

/// Whether the handler already wrote a credential cookie (login, registration).
/// Browsers apply the last `Set-Cookie` for a name, so a removal appended after
/// it would undo the fresh credential.
fn sets_credential<B>(res: &ServiceResponse<B>) -> bool {
    res.response()
        .cookies()
        .any(|cookie| cookie.name() == AUTH_COOKIE_NAME)
}

pub struct SessionResolver {
    cookies: AuthCookies,
}

impl SessionResolver {
    pub fn new(cookies: AuthCookies) -> Self {
        Self { cookies }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionResolver
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionResolverMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionResolverMiddleware {
            service,
            cookies: self.cookies,
        }))
    }
}

pub struct SessionResolverMiddleware<S> {
    service: S,
    cookies: AuthCookies,
}

impl<S, B> Service<ServiceRequest> for SessionResolverMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let cookie = req.cookie(AUTH_COOKIE_NAME);
        let session = resolve(cookie.as_ref().map(|c| c.value()), token::now_secs());

        req.extensions_mut().insert(session.identity());

        let expired = match session {
            Session::Authenticated { token, .. } => {
                req.extensions_mut().insert(SessionToken::new(token));
                false
            }
            Session::Expired { email } => {
                security::session_expired(email.as_deref());
                true
            }
            Session::Anonymous => false,
        };

        let cookies = self.cookies;
        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = fut.await?;

            if expired && !sets_credential(&res) {
                if let Err(err) = res.response_mut().add_cookie(&cookies.removal_cookie()) {
                    warn!(error = %err, "failed to clear expired credential cookie");
                }
            }

            Ok(res)
        })
    }
}
