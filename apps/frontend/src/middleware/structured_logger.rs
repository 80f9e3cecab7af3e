use std::future::{ready, Ready};
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error as ActixError, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::{debug, error, info, warn};

use crate::auth::Identity;

const HEALTH_PATH: &str = "/health";

/// One `request_completed` line per request, at a level chosen by status class.
/// Successful health probes drop to debug so they don't drown the access log.
///
/// The visitor's authentication state and role are read back from the
/// response's request, where the session middleware left them. `http.route` is
/// the matched pattern (`/job-roles/{id}`), so ids don't split aggregations.
pub struct StructuredLogger;

impl<S, B> Transform<S, ServiceRequest> for StructuredLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = StructuredLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(StructuredLoggerMiddleware { service }))
    }
}

pub struct StructuredLoggerMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for StructuredLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();

        let trace_id = req
            .extensions()
            .get::<String>()
            .cloned()
            .unwrap_or_else(|| "unknown".to_string());

        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;

            let (status, authenticated, role, route) = match &result {
                Ok(res) => {
                    let route = res.request().match_pattern();
                    let extensions = res.request().extensions();
                    let identity = extensions.get::<Identity>();
                    (
                        res.status(),
                        identity.is_some_and(|id| id.is_authenticated),
                        identity.and_then(|id| id.role).map(|role| role.as_str()),
                        route,
                    )
                }
                Err(err) => (err.as_response_error().status_code(), false, None, None),
            };

            let duration_us = start.elapsed().as_micros() as u64;
            let status_code = status.as_u16();
            let role = role.unwrap_or("none");
            let route = route.unwrap_or_else(|| path.clone());

            if status.is_server_error() {
                error!(http.method=%method, url.path=%path, http.route=%route, http.status_code=%status_code, duration_us=%duration_us, trace_id=%trace_id, user.authenticated=authenticated, user.role=role, message="request_completed");
            } else if status.is_client_error() {
                warn!(http.method=%method, url.path=%path, http.route=%route, http.status_code=%status_code, duration_us=%duration_us, trace_id=%trace_id, user.authenticated=authenticated, user.role=role, message="request_completed");
            } else if path == HEALTH_PATH {
                debug!(http.method=%method, url.path=%path, http.route=%route, http.status_code=%status_code, duration_us=%duration_us, trace_id=%trace_id, message="request_completed");
            } else {
                info!(http.method=%method, url.path=%path, http.route=%route, http.status_code=%status_code, duration_us=%duration_us, trace_id=%trace_id, user.authenticated=authenticated, user.role=role, message="request_completed");
            }

            result
        })
    }
}
