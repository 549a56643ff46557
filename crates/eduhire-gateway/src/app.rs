use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use eduhire_core::config::EduhireConfig;
use eduhire_jobs::JobBoard;
use eduhire_learning::LearningEngine;
use eduhire_users::UserStore;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::http::{courses, health, jobs, users};

/// Central shared state, passed as Arc<AppState> to all Axum handlers.
pub struct AppState {
    pub config: EduhireConfig,
    pub users: Arc<UserStore>,
    pub learning: LearningEngine,
    pub jobs: JobBoard,
}

impl AppState {
    pub fn new(
        config: EduhireConfig,
        users: Arc<UserStore>,
        learning: LearningEngine,
        jobs: JobBoard,
    ) -> Self {
        Self {
            config,
            users,
            learning,
            jobs,
        }
    }
}

/// Assemble the full Axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/users/register", post(users::register))
        .route("/api/users/login", post(users::login))
        .route("/api/users/profile", get(users::profile))
        .route("/api/users/leaderboard", get(users::leaderboard))
        .route("/api/users/skills", get(users::skills))
        .route("/api/courses", get(courses::list_courses))
        .route("/api/courses/{id}", get(courses::get_course))
        .route("/api/courses/{id}/complete", post(courses::complete_course))
        .route(
            "/api/courses/{id}/topics/{topic_id}",
            get(courses::get_topic),
        )
        .route(
            "/api/courses/{id}/topics/{topic_id}/quiz",
            post(courses::submit_quiz),
        )
        .route(
            "/api/courses/{id}/topics/{topic_id}/complete",
            post(courses::complete_topic),
        )
        .route("/api/jobs", get(jobs::list_jobs).post(jobs::post_job))
        .route("/api/jobs/user/applications", get(jobs::my_applications))
        .route(
            "/api/jobs/{id}",
            get(jobs::get_job).patch(jobs::set_job_status),
        )
        .route("/api/jobs/{id}/apply", post(jobs::apply))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}
