use actix_web::{HttpResponse, web};
use prassign_server_models::StatsResponse;

use crate::{error::ApiError, state::AppState};

/// Number of pull requests each user is currently assigned to review.
pub async fn get(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let review_assignments = state.pull_requests.reviewer_stats().await?;

    Ok(HttpResponse::Ok().json(StatsResponse { review_assignments }))
}
