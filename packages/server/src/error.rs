use actix_web::{
    HttpRequest, HttpResponse, ResponseError,
    error::{JsonPayloadError, QueryPayloadError},
    http::StatusCode,
};
use prassign_pull_request::PullRequestError;
use prassign_server_models::{ErrorCode, ErrorResponse};
use prassign_team::TeamError;
use prassign_user::UserError;
use thiserror::Error;

/// Failure returned by a handler, rendered as `{"error": {"code", "message"}}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidRequest(_) => ErrorCode::InvalidRequest,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::Internal(_) => ErrorCode::Internal,
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("Request failed: {self}");
        } else {
            log::warn!("Request rejected ({status}): {self}");
        }

        HttpResponse::build(status).json(ErrorResponse::new(self.code(), self.to_string()))
    }
}

// Lookup failures from the directories are reported as 500, not 404.
impl From<TeamError> for ApiError {
    fn from(value: TeamError) -> Self {
        Self::Internal(value.to_string())
    }
}

impl From<UserError> for ApiError {
    fn from(value: UserError) -> Self {
        Self::Internal(value.to_string())
    }
}

impl From<PullRequestError> for ApiError {
    fn from(value: PullRequestError) -> Self {
        Self::Internal(value.to_string())
    }
}

#[allow(clippy::needless_pass_by_value)]
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::InvalidRequest(format!("invalid request body: {err}")).into()
}

#[allow(clippy::needless_pass_by_value)]
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::InvalidRequest(format!("invalid query string: {err}")).into()
}

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;

    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::InvalidRequest(String::new()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound(String::new()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Internal(String::new()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_directory_not_found_is_internal() {
        let err = ApiError::from(UserError::NotFound("u9".to_string()));
        assert!(matches!(err, ApiError::Internal(_)));

        let err = ApiError::from(TeamError::NotFound("ghosts".to_string()));
        assert!(matches!(err, ApiError::Internal(_)));
    }

    #[tokio::test]
    async fn test_error_body() {
        let response = ApiError::NotFound("pr-1 not found".to_string()).error_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = to_bytes(response.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert_eq!(body["error"]["message"], "pr-1 not found");
    }
}
