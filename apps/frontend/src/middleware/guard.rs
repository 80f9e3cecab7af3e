//! Scope-level authorization.
//!
//! Reads the [`Identity`] left by `SessionResolver` and either passes the
//! request through or answers with the guard's redirect without calling the
//! wrapped service.

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::auth::{Access, Identity};
use crate::logging::security;

#[derive(Debug, Clone, Copy)]
pub struct RequireAccess {
    access: Access,
}

impl RequireAccess {
    /// Any signed-in user; others go to `/login`.
    pub fn authenticated() -> Self {
        Self {
            access: Access::Authenticated,
        }
    }

    /// Admins only; everyone else goes to `/error`.
    pub fn admin() -> Self {
        Self {
            access: Access::Admin,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireAccess
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireAccessMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireAccessMiddleware {
            service,
            access: self.access,
        }))
    }
}

pub struct RequireAccessMiddleware<S> {
    service: S,
    access: Access,
}

impl<S, B> Service<ServiceRequest> for RequireAccessMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let identity = req
            .extensions()
            .get::<Identity>()
            .cloned()
            .unwrap_or_default();

        match self.access.check(&identity) {
            Ok(()) => {
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(denial) => {
                security::access_denied(req.path(), identity.is_authenticated, denial.redirect_to);
                let res = req
                    .into_response(denial.into_response())
                    .map_into_right_body();
                Box::pin(async move { Ok(res) })
            }
        }
    }
}
