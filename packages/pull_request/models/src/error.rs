use prassign_team_models::TeamError;
use prassign_user_models::UserError;

/// Coarse classification of pull request failures.
#[derive(Debug, Copy, Clone, PartialEq, Eq, strum::Display)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    InvalidOperation,
    Infrastructure,
}

/// Errors returned by pull request store implementations.
#[derive(Debug, thiserror::Error)]
pub enum PullRequestStoreError {
    /// A pull request with this id is already stored.
    #[error("pull request already stored: {0}")]
    Duplicate(String),

    /// The backing store failed.
    #[error("{0}")]
    Backend(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PullRequestError {
    #[error("pr already exists: {0}")]
    AlreadyExists(String),

    #[error("pr not found: {0}")]
    NotFound(String),

    #[error("pr already merged: {0}")]
    AlreadyMerged(String),

    #[error("reviewer {reviewer_id} not assigned to pr {pull_request_id}")]
    NotAssigned {
        pull_request_id: String,
        reviewer_id: String,
    },

    #[error("no active replacement user for reviewer {reviewer_id} on pr {pull_request_id}")]
    NoCandidate {
        pull_request_id: String,
        reviewer_id: String,
    },

    #[error("{context}: {source}")]
    User {
        context: &'static str,
        #[source]
        source: UserError,
    },

    #[error("{context}: {source}")]
    Team {
        context: &'static str,
        #[source]
        source: TeamError,
    },

    #[error("{context}: {source}")]
    Store {
        context: &'static str,
        #[source]
        source: PullRequestStoreError,
    },
}

impl PullRequestError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_)
            | Self::User {
                source: UserError::NotFound(_),
                ..
            }
            | Self::Team {
                source: TeamError::NotFound(_),
                ..
            } => ErrorKind::NotFound,
            Self::AlreadyExists(_) | Self::AlreadyMerged(_) => ErrorKind::Conflict,
            Self::NotAssigned { .. } | Self::NoCandidate { .. } => ErrorKind::InvalidOperation,
            Self::User { .. } | Self::Team { .. } | Self::Store { .. } => {
                ErrorKind::Infrastructure
            }
        }
    }

    pub fn user(context: &'static str) -> impl Fn(UserError) -> Self {
        move |source| Self::User { context, source }
    }

    pub fn team(context: &'static str) -> impl Fn(TeamError) -> Self {
        move |source| Self::Team { context, source }
    }

    pub fn store(context: &'static str) -> impl Fn(PullRequestStoreError) -> Self {
        move |source| Self::Store { context, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            PullRequestError::NotFound("pr-1".to_string()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            PullRequestError::AlreadyMerged("pr-1".to_string()).kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            PullRequestError::NoCandidate {
                pull_request_id: "pr-1".to_string(),
                reviewer_id: "u2".to_string(),
            }
            .kind(),
            ErrorKind::InvalidOperation
        );
    }

    #[test]
    fn test_wrapped_lookup_kind_follows_source() {
        let missing = PullRequestError::user("get author")(UserError::NotFound("u1".to_string()));
        assert_eq!(missing.kind(), ErrorKind::NotFound);
        assert_eq!(missing.to_string(), "get author: user not found: u1");

        let broken = PullRequestError::team("get team")(TeamError::Storage("down".to_string()));
        assert_eq!(broken.kind(), ErrorKind::Infrastructure);
    }
}
