//! Job board endpoints.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use eduhire_jobs::{Application, ApplicationDraft, ApplicationWithJob, Job, JobDraft};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{optional_json, required_json};
use crate::app::AppState;
use crate::auth::AuthUser;
use crate::error::ApiError;

#[derive(Serialize)]
pub struct ApplyReply {
    pub application: Application,
    pub is_verified: bool,
    pub message: String,
}

#[derive(Deserialize)]
pub struct JobStatusUpdate {
    pub is_active: bool,
}

/// GET /api/jobs: Active postings only.
pub async fn list_jobs(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Job>>, ApiError> {
    Ok(Json(state.jobs.list_active()?))
}

/// GET /api/jobs/{id}
pub async fn get_job(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Job>, ApiError> {
    Ok(Json(state.jobs.require(&id)?))
}

/// POST /api/jobs: Employers only.
pub async fn post_job(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    body: Bytes,
) -> Result<(StatusCode, Json<Job>), ApiError> {
    let draft: JobDraft = required_json(&body)?;
    let job = state.jobs.post_job(&user.id, draft)?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// PATCH /api/jobs/{id}: `{"is_active": false}` closes a posting. Only the
/// employer who posted it may change it.
pub async fn set_job_status(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Job>, ApiError> {
    let req: JobStatusUpdate = required_json(&body)?;
    Ok(Json(state.jobs.set_active(&user.id, &id, req.is_active)?))
}

/// POST /api/jobs/{id}/apply
///
/// Optional body `{"cover_letter", "resume_url"}`. The skill match is
/// computed once here and stored with the application.
pub async fn apply(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<ApplyReply>), ApiError> {
    let draft: ApplicationDraft = optional_json(&body)?;
    let application = state.jobs.apply(&id, &user.id, draft)?;
    let is_verified = application.is_verified;
    let message = if is_verified {
        "Application submitted with verified skills".to_string()
    } else {
        "Application submitted; some required skills are not verified yet".to_string()
    };
    Ok((
        StatusCode::CREATED,
        Json(ApplyReply {
            application,
            is_verified,
            message,
        }),
    ))
}

/// GET /api/jobs/user/applications
pub async fn my_applications(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<ApplicationWithJob>>, ApiError> {
    Ok(Json(state.jobs.applications_for_user(&user.id)?))
}
