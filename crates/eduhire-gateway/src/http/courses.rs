//! Catalog browsing and the learning loop: quiz submission, topic and
//! course completion.

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use eduhire_learning::{
    Course, CourseCompletion, CourseSummary, QuizOutcome, Topic, TopicCompletion,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{optional_json, required_json};
use crate::app::AppState;
use crate::auth::AuthUser;
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct QuizSubmission {
    /// Chosen option index per question, in quiz order.
    pub answers: Vec<u32>,
    #[serde(default)]
    pub current_video_style: Option<String>,
}

#[derive(Default, Deserialize)]
pub struct CourseCompletionRequest {
    #[serde(default)]
    pub score: Option<u32>,
}

/// GET /api/courses
pub async fn list_courses(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CourseSummary>>, ApiError> {
    Ok(Json(state.learning.catalog().list()?))
}

/// GET /api/courses/{id}
pub async fn get_course(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Course>, ApiError> {
    Ok(Json(state.learning.catalog().require(&id)?))
}

/// GET /api/courses/{id}/topics/{topic_id}
pub async fn get_topic(
    State(state): State<Arc<AppState>>,
    Path((course_id, topic_id)): Path<(String, String)>,
) -> Result<Json<Topic>, ApiError> {
    Ok(Json(state.learning.catalog().topic(&course_id, &topic_id)?))
}

/// POST /api/courses/{id}/topics/{topic_id}/quiz
///
/// Request: `{"answers": [0, 2, 1], "current_video_style": "visual"}`.
/// A failed quiz answers with the next teaching style to try.
pub async fn submit_quiz(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path((course_id, topic_id)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<QuizOutcome>, ApiError> {
    let req: QuizSubmission = required_json(&body)?;
    let outcome = state.learning.submit_quiz(
        &user.id,
        &course_id,
        &topic_id,
        &req.answers,
        req.current_video_style.as_deref(),
    )?;
    Ok(Json(outcome))
}

/// POST /api/courses/{id}/topics/{topic_id}/complete
pub async fn complete_topic(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path((course_id, topic_id)): Path<(String, String)>,
) -> Result<Json<TopicCompletion>, ApiError> {
    Ok(Json(
        state
            .learning
            .complete_topic(&user.id, &course_id, &topic_id)?,
    ))
}

/// POST /api/courses/{id}/complete
///
/// Optional body `{"score": 95}`; without one the course counts as
/// completed with full marks.
pub async fn complete_course(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<CourseCompletion>, ApiError> {
    let req: CourseCompletionRequest = optional_json(&body)?;
    Ok(Json(state.learning.complete_course(&user.id, &id, req.score)?))
}
