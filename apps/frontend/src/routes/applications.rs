//! CV upload for a job application.
//!
//! Answers JSON (`{success, message}`) since it is called from the job detail
//! page's script as well as by the plain form.

use actix_multipart::{Field, Multipart, MultipartError};
use actix_web::{web, HttpResponse};
use bytes::{Bytes, BytesMut};
use futures_util::TryStreamExt;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::api_client::JobApplication;
use crate::auth::Identity;
use crate::error::AppError;
use crate::extractors::SessionToken;
use crate::logging::pii::Redacted;
use crate::state::app_state::AppState;
use crate::validation::{validate_cv, CvUpload, CV_TOO_LARGE};

pub const CV_FIELD: &str = "cv";
pub const NOT_AN_APPLICANT: &str = "You must be logged in as an applicant to submit an application";
pub const APPLICATION_SUBMITTED: &str = "Application submitted successfully";

#[derive(Debug, Serialize)]
struct ApplicationResponse {
    success: bool,
    message: &'static str,
}

fn upload_error(err: MultipartError) -> AppError {
    warn!(error = %err, "could not read multipart upload");
    AppError::bad_request("INVALID_UPLOAD", "The upload could not be read")
}

/// Consume `field`, keeping at most `keep` bytes. Returns the kept bytes and
/// the full field size; fails once `budget` bytes have been read overall.
async fn read_field(
    field: &mut Field,
    keep: usize,
    budget: &mut usize,
) -> Result<(Bytes, usize), AppError> {
    let mut data = BytesMut::new();
    let mut size = 0usize;

    while let Some(chunk) = field.try_next().await.map_err(upload_error)? {
        size += chunk.len();
        *budget = budget.checked_sub(chunk.len()).ok_or_else(|| {
            warn!(size, "upload exceeds the request size limit");
            AppError::bad_request("INVALID_UPLOAD", CV_TOO_LARGE)
        })?;
        if data.len() < keep {
            let take = chunk.len().min(keep - data.len());
            data.extend_from_slice(&chunk[..take]);
        }
    }

    Ok((data.freeze(), size))
}

/// Pull the first `cv` file part out of the form; other parts are discarded.
///
/// A part with no file name and no content is what browsers send when no file
/// was chosen, so it counts as missing.
async fn read_cv(
    mut payload: Multipart,
    max_upload_size: usize,
) -> Result<Option<(CvUpload, Bytes)>, AppError> {
    let mut budget = max_upload_size;
    let mut upload = None;

    while let Some(mut field) = payload.try_next().await.map_err(upload_error)? {
        let wanted = upload.is_none() && field.name() == Some(CV_FIELD);
        if !wanted {
            read_field(&mut field, 0, &mut budget).await?;
            continue;
        }

        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .unwrap_or_default()
            .to_string();
        let content_type = field.content_type().map(|mime| mime.essence_str().to_string());

        let (data, size) = read_field(&mut field, max_upload_size, &mut budget).await?;
        if file_name.is_empty() && size == 0 {
            continue;
        }
        upload = Some((
            CvUpload {
                file_name,
                content_type,
                size,
            },
            data,
        ));
    }

    Ok(upload)
}

async fn submit_application(
    state: web::Data<AppState>,
    user: Identity,
    token: Option<SessionToken>,
    path: web::Path<String>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let token = match token {
        Some(token) if user.is_applicant() => token,
        _ => return Err(AppError::unauthorized(NOT_AN_APPLICANT)),
    };

    let upload = read_cv(payload, state.config.max_upload_size).await?;
    let raw_job_role_id = path.into_inner();

    let job_role_id = validate_cv(upload.as_ref().map(|(meta, _)| meta), &raw_job_role_id)
        .map_err(|errors| {
            let message = errors.first().unwrap_or(CV_TOO_LARGE);
            AppError::bad_request("INVALID_UPLOAD", message)
        })?;
    let Some((meta, cv)) = upload else {
        return Err(AppError::internal("validated upload without a file"));
    };

    info!(
        job_role_id,
        file_name = %meta.file_name,
        file_size = meta.size,
        email = %Redacted(user.email.as_deref().unwrap_or("")),
        "processing application"
    );

    let application = JobApplication {
        job_role_id,
        file_name: meta.file_name,
        content_type: meta.content_type,
        cv,
    };

    if let Err(failure) = state
        .api
        .submit_job_application(&application, token.as_str())
        .await
    {
        error!(job_role_id, error = %failure, status = ?failure.status, "application submission failed");
        return Err(failure.into());
    }

    info!(job_role_id, "application submitted");
    Ok(HttpResponse::Ok().json(ApplicationResponse {
        success: true,
        message: APPLICATION_SUBMITTED,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/job-roles/{id}/apply").route(web::post().to(submit_application)));
}
