use std::ops::Deref;

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};
use futures_util::future::LocalBoxFuture;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::AppError;
use crate::trace_ctx;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Body extractor for the auth endpoints, which are posted both by plain HTML
/// forms and by scripts sending JSON.
///
/// `application/json` is read as JSON; anything else as urlencoded form data.
/// Parse failures become a 400 with a stable code.
#[derive(Debug)]
pub struct FormOrJson<T>(pub T);

impl<T> FormOrJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for FormOrJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

fn invalid_body(kind: &'static str, err: actix_web::Error) -> AppError {
    warn!(trace_id = %trace_ctx::trace_id(), kind, error = %err, "request body rejected");
    AppError::bad_request("INVALID_BODY", "Request body could not be read")
}

impl<T> FromRequest for FormOrJson<T>
where
    T: DeserializeOwned + 'static,
{
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        if req.content_type() == JSON_CONTENT_TYPE {
            let fut = web::Json::<T>::from_request(req, payload);
            Box::pin(async move {
                fut.await
                    .map(|json| FormOrJson(json.into_inner()))
                    .map_err(|err| invalid_body("json", err))
            })
        } else {
            let fut = web::Form::<T>::from_request(req, payload);
            Box::pin(async move {
                fut.await
                    .map(|form| FormOrJson(form.into_inner()))
                    .map_err(|err| invalid_body("form", err))
            })
        }
    }
}
