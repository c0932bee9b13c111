use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PullRequestStatus {
    Open,
    Merged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: PullRequestStatus,
    pub assigned_reviewers: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
}

impl PullRequest {
    /// Create an open pull request with no reviewers.
    #[must_use]
    pub fn new(
        pull_request_id: impl Into<String>,
        pull_request_name: impl Into<String>,
        author_id: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            pull_request_id: pull_request_id.into(),
            pull_request_name: pull_request_name.into(),
            author_id: author_id.into(),
            status: PullRequestStatus::Open,
            assigned_reviewers: Vec::new(),
            created_at,
            merged_at: None,
        }
    }

    #[must_use]
    pub fn with_reviewers(mut self, reviewers: Vec<String>) -> Self {
        self.assigned_reviewers = reviewers;
        self
    }

    #[must_use]
    pub fn is_merged(&self) -> bool {
        self.status == PullRequestStatus::Merged
    }

    /// Transition to `Merged`.
    ///
    /// Returns `false` without touching `merged_at` if already merged.
    pub fn merge(&mut self, at: DateTime<Utc>) -> bool {
        if self.is_merged() {
            return false;
        }
        self.status = PullRequestStatus::Merged;
        self.merged_at = Some(at);
        true
    }

    /// Slot index of a reviewer in `assigned_reviewers`.
    #[must_use]
    pub fn reviewer_slot(&self, reviewer_id: &str) -> Option<usize> {
        self.assigned_reviewers
            .iter()
            .position(|id| id == reviewer_id)
    }

    #[must_use]
    pub fn has_reviewer(&self, reviewer_id: &str) -> bool {
        self.reviewer_slot(reviewer_id).is_some()
    }

    #[must_use]
    pub fn to_short(&self) -> PullRequestShort {
        PullRequestShort::from(self)
    }
}

/// Read projection of a pull request used by reviewer listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestShort {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: PullRequestStatus,
}

impl From<&PullRequest> for PullRequestShort {
    fn from(pr: &PullRequest) -> Self {
        Self {
            pull_request_id: pr.pull_request_id.clone(),
            pull_request_name: pr.pull_request_name.clone(),
            author_id: pr.author_id.clone(),
            status: pr.status,
        }
    }
}
