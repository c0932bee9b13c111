use prassign_pull_request_models::{
    PullRequest, PullRequestShort, PullRequestStoreError, ReviewerStats,
};

/// Persistence for pull request records.
///
/// Implementations store exactly what they are given; all lifecycle rules live
/// in `PullRequestService`.
#[async_trait::async_trait]
pub trait PullRequestStore: Send + Sync {
    /// Insert a new pull request.
    ///
    /// # Errors
    ///
    /// Returns `PullRequestStoreError::Duplicate` if the id is already stored.
    async fn create(&self, pr: &PullRequest) -> Result<(), PullRequestStoreError>;

    /// # Errors
    ///
    /// Returns an error only if the backend fails; absence is `Ok(None)`.
    async fn get_by_id(&self, id: &str) -> Result<Option<PullRequest>, PullRequestStoreError>;

    /// Overwrite status, reviewers and `merged_at` of an existing record.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    async fn update(&self, pr: &PullRequest) -> Result<(), PullRequestStoreError>;

    /// Pull requests that list `reviewer_id` among their reviewers, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    async fn get_by_reviewer_id(
        &self,
        reviewer_id: &str,
    ) -> Result<Vec<PullRequestShort>, PullRequestStoreError>;

    /// Assignment count per reviewer across open and merged pull requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    async fn reviewer_stats(&self) -> Result<ReviewerStats, PullRequestStoreError>;
}
