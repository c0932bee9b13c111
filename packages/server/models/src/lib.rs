#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! JSON bodies exchanged by the `prassign` HTTP API.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use prassign_pull_request_models::{PullRequest, PullRequestShort, PullRequestStatus};
use prassign_team_models::Team;
use prassign_user_models::User;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidRequest,
    NotFound,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

impl ErrorResponse {
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                code,
                message: message.into(),
            },
        }
    }
}

/// Request bodies with required string fields.
pub trait Validate {
    /// # Errors
    ///
    /// Returns a message naming the first required field that is empty.
    fn validate(&self) -> Result<(), String>;
}

fn require(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{field} is required"))
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    #[must_use]
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsResponse {
    pub review_assignments: BTreeMap<String, u64>,
}

// === Teams ===

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMemberDto {
    pub user_id: String,
    pub username: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamDto {
    pub team_name: String,
    pub members: Vec<TeamMemberDto>,
}

impl TeamDto {
    #[must_use]
    pub fn into_team(self) -> Team {
        let team_name = self.team_name;
        let members = self
            .members
            .into_iter()
            .map(|m| User::new(m.user_id, m.username, team_name.clone(), m.is_active))
            .collect();

        Team { team_name, members }
    }
}

impl From<&Team> for TeamDto {
    fn from(team: &Team) -> Self {
        Self {
            team_name: team.team_name.clone(),
            members: team
                .members
                .iter()
                .map(|user| TeamMemberDto {
                    user_id: user.user_id.clone(),
                    username: user.username.clone(),
                    is_active: user.is_active,
                })
                .collect(),
        }
    }
}

impl Validate for TeamDto {
    fn validate(&self) -> Result<(), String> {
        require("team_name", &self.team_name)?;
        for member in &self.members {
            require("members.user_id", &member.user_id)?;
            require("members.username", &member.username)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamResponse {
    pub team: TeamDto,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamQuery {
    pub team_name: Option<String>,
}

// === Users ===

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetIsActiveRequest {
    pub user_id: String,
    #[serde(default)]
    pub is_active: bool,
}

impl Validate for SetIsActiveRequest {
    fn validate(&self) -> Result<(), String> {
        require("user_id", &self.user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDto {
    pub user_id: String,
    pub username: String,
    pub team_name: String,
    pub is_active: bool,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            username: user.username,
            team_name: user.team_name,
            is_active: user.is_active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub user: UserDto,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewerQuery {
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestShortDto {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: PullRequestStatus,
}

impl From<PullRequestShort> for PullRequestShortDto {
    fn from(pr: PullRequestShort) -> Self {
        Self {
            pull_request_id: pr.pull_request_id,
            pull_request_name: pr.pull_request_name,
            author_id: pr.author_id,
            status: pr.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserReviewsResponse {
    pub user_id: String,
    pub pull_requests: Vec<PullRequestShortDto>,
}

// === Pull requests ===

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePullRequestRequest {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
}

impl Validate for CreatePullRequestRequest {
    fn validate(&self) -> Result<(), String> {
        require("pull_request_id", &self.pull_request_id)?;
        require("pull_request_name", &self.pull_request_name)?;
        require("author_id", &self.author_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergePullRequestRequest {
    pub pull_request_id: String,
}

impl Validate for MergePullRequestRequest {
    fn validate(&self) -> Result<(), String> {
        require("pull_request_id", &self.pull_request_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReassignPullRequestRequest {
    pub pull_request_id: String,
    pub old_user_id: String,
}

impl Validate for ReassignPullRequestRequest {
    fn validate(&self) -> Result<(), String> {
        require("pull_request_id", &self.pull_request_id)?;
        require("old_user_id", &self.old_user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestDto {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: PullRequestStatus,
    pub assigned_reviewers: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
}

impl From<PullRequest> for PullRequestDto {
    fn from(pr: PullRequest) -> Self {
        Self {
            pull_request_id: pr.pull_request_id,
            pull_request_name: pr.pull_request_name,
            author_id: pr.author_id,
            status: pr.status,
            assigned_reviewers: pr.assigned_reviewers,
            created_at: pr.created_at,
            merged_at: pr.merged_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestResponse {
    pub pr: PullRequestDto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReassignResponse {
    pub pr: PullRequestDto,
    pub replaced_by: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_shape() {
        let body = ErrorResponse::new(ErrorCode::NotFound, "pr not found");
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["error"]["code"], "NOT_FOUND");
        assert_eq!(json["error"]["message"], "pr not found");
    }

    #[test]
    fn test_team_dto_into_team_sets_member_team() {
        let dto: TeamDto = serde_json::from_str(
            r#"{
                "team_name": "backend",
                "members": [
                    {"user_id": "u1", "username": "Alice", "is_active": true},
                    {"user_id": "u2", "username": "Bob", "is_active": false}
                ]
            }"#,
        )
        .unwrap();

        let team = dto.into_team();
        assert_eq!(team.team_name, "backend");
        assert_eq!(team.members.len(), 2);
        assert!(team.members.iter().all(|u| u.team_name == "backend"));
        assert!(!team.members[1].is_active);
    }

    #[test]
    fn test_set_is_active_defaults_to_false() {
        let req: SetIsActiveRequest = serde_json::from_str(r#"{"user_id": "u1"}"#).unwrap();
        assert!(!req.is_active);
    }

    #[test]
    fn test_validate_rejects_blank_fields() {
        let req = ReassignPullRequestRequest {
            pull_request_id: "pr-1".to_string(),
            old_user_id: "  ".to_string(),
        };
        assert_eq!(req.validate().unwrap_err(), "old_user_id is required");

        let req = MergePullRequestRequest {
            pull_request_id: "pr-1".to_string(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_open_pull_request_serializes_null_merged_at() {
        let pr = PullRequest::new("pr-1", "Test", "u1", Utc::now())
            .with_reviewers(vec!["u2".to_string()]);
        let json = serde_json::to_value(PullRequestDto::from(pr)).unwrap();

        assert_eq!(json["status"], "OPEN");
        assert!(json["merged_at"].is_null());
        assert_eq!(json["assigned_reviewers"][0], "u2");
    }
}
