use actix_web::{HttpResponse, web};
use prassign_server_models::{
    PullRequestShortDto, ReviewerQuery, SetIsActiveRequest, UserDto, UserResponse,
    UserReviewsResponse, Validate,
};

use super::required_param;
use crate::{error::ApiError, state::AppState};

pub async fn set_is_active(
    state: web::Data<AppState>,
    body: web::Json<SetIsActiveRequest>,
) -> Result<HttpResponse, ApiError> {
    body.validate().map_err(ApiError::InvalidRequest)?;

    let user = state
        .users
        .set_is_active(&body.user_id, body.is_active)
        .await?;

    Ok(HttpResponse::Ok().json(UserResponse {
        user: UserDto::from(user),
    }))
}

pub async fn get_review(
    state: web::Data<AppState>,
    query: web::Query<ReviewerQuery>,
) -> Result<HttpResponse, ApiError> {
    let user_id = required_param(query.into_inner().user_id, "user_id")?;

    let pull_requests = state
        .pull_requests
        .get_by_reviewer_id(&user_id)
        .await?
        .into_iter()
        .map(PullRequestShortDto::from)
        .collect();

    Ok(HttpResponse::Ok().json(UserReviewsResponse {
        user_id,
        pull_requests,
    }))
}
