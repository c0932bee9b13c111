use actix_web::{HttpResponse, web};
use prassign_pull_request::PullRequestError;
use prassign_server_models::{
    CreatePullRequestRequest, MergePullRequestRequest, PullRequestDto, PullRequestResponse,
    ReassignPullRequestRequest, ReassignResponse, Validate,
};

use crate::{error::ApiError, state::AppState};

pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<CreatePullRequestRequest>,
) -> Result<HttpResponse, ApiError> {
    body.validate().map_err(ApiError::InvalidRequest)?;

    let pr = state
        .pull_requests
        .create(&body.pull_request_id, &body.pull_request_name, &body.author_id)
        .await?;

    Ok(HttpResponse::Created().json(PullRequestResponse {
        pr: PullRequestDto::from(pr),
    }))
}

/// Merge is the only endpoint that reports a missing pull request as 404.
pub async fn merge(
    state: web::Data<AppState>,
    body: web::Json<MergePullRequestRequest>,
) -> Result<HttpResponse, ApiError> {
    body.validate().map_err(ApiError::InvalidRequest)?;

    let pr = state
        .pull_requests
        .merge(&body.pull_request_id)
        .await
        .map_err(|e| match e {
            PullRequestError::NotFound(_) => ApiError::NotFound(e.to_string()),
            e => e.into(),
        })?;

    Ok(HttpResponse::Ok().json(PullRequestResponse {
        pr: PullRequestDto::from(pr),
    }))
}

pub async fn reassign(
    state: web::Data<AppState>,
    body: web::Json<ReassignPullRequestRequest>,
) -> Result<HttpResponse, ApiError> {
    body.validate().map_err(ApiError::InvalidRequest)?;

    let (pr, replaced_by) = state
        .pull_requests
        .reassign(&body.pull_request_id, &body.old_user_id)
        .await?;

    Ok(HttpResponse::Ok().json(ReassignResponse {
        pr: PullRequestDto::from(pr),
        replaced_by,
    }))
}
