pub mod health;
pub mod pull_request;
pub mod stats;
pub mod team;
pub mod user;

use actix_web::web;

use crate::error::ApiError;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::get))
        .route("/stats", web::get().to(stats::get))
        .route("/team/add", web::post().to(team::add))
        .route("/team/get", web::get().to(team::get))
        .route("/users/setIsActive", web::post().to(user::set_is_active))
        .route("/users/getReview", web::get().to(user::get_review))
        .route("/pullRequest/create", web::post().to(pull_request::create))
        .route("/pullRequest/merge", web::post().to(pull_request::merge))
        .route("/pullRequest/reassign", web::post().to(pull_request::reassign));
}

/// Unwrap a query parameter that must be present and non-blank.
fn required_param(value: Option<String>, name: &str) -> Result<String, ApiError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::InvalidRequest(format!("{name} is required")))
}
