pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::analysis::handlers as analysis_handlers;
use crate::auth::handlers as auth_handlers;
use crate::jobs::handlers as job_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Auth
        .route("/api/v1/auth/signup", post(auth_handlers::handle_signup))
        .route("/api/v1/auth/login", post(auth_handlers::handle_login))
        .route("/api/v1/auth/logout", post(auth_handlers::handle_logout))
        .route("/api/v1/auth/me", get(auth_handlers::handle_me))
        // Job catalog (mutations are admin-only, enforced in handlers)
        .route(
            "/api/v1/jobs",
            get(job_handlers::handle_list_jobs).post(job_handlers::handle_create_job),
        )
        .route(
            "/api/v1/jobs/:id",
            patch(job_handlers::handle_update_job).delete(job_handlers::handle_delete_job),
        )
        .route("/api/v1/jobs/reset", post(job_handlers::handle_reset_jobs))
        // Analyses
        .route(
            "/api/v1/analyses",
            post(analysis_handlers::handle_create_analysis)
                .get(analysis_handlers::handle_list_analyses),
        )
        .route(
            "/api/v1/analyses/:id",
            get(analysis_handlers::handle_get_analysis)
                .delete(analysis_handlers::handle_delete_analysis),
        )
        .route(
            "/api/v1/analyses/:id/skill-gap",
            post(analysis_handlers::handle_skill_gap),
        )
        .with_state(state)
}
