use std::sync::Arc;

use chrono::Utc;
use prassign_pull_request_models::{
    PullRequest, PullRequestError, PullRequestShort, PullRequestStoreError, ReviewerStats,
};
use prassign_team::TeamDirectory;
use prassign_user::UserDirectory;

use crate::{
    KeyedLocks, PullRequestStore, RandomSource, SeededRandom, pick_replacement, pick_reviewers,
};

/// Pull request lifecycle: create with reviewers, reassign, merge.
///
/// Mutations of the same pull request id are serialized inside this service;
/// the store itself is a plain read/write collaborator.
#[derive(Clone)]
pub struct PullRequestService {
    store: Arc<dyn PullRequestStore>,
    users: Arc<dyn UserDirectory>,
    teams: Arc<dyn TeamDirectory>,
    random: Arc<dyn RandomSource>,
    locks: Arc<KeyedLocks>,
}

impl PullRequestService {
    /// Create a service whose random source is seeded from the current time.
    #[must_use]
    pub fn new(
        store: Arc<dyn PullRequestStore>,
        users: Arc<dyn UserDirectory>,
        teams: Arc<dyn TeamDirectory>,
    ) -> Self {
        Self::with_random(store, users, teams, Arc::new(SeededRandom::from_time()))
    }

    #[must_use]
    pub fn with_random(
        store: Arc<dyn PullRequestStore>,
        users: Arc<dyn UserDirectory>,
        teams: Arc<dyn TeamDirectory>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            store,
            users,
            teams,
            random,
            locks: Arc::new(KeyedLocks::new()),
        }
    }

    /// Create an open pull request and assign up to two reviewers from the
    /// author's team.
    ///
    /// # Errors
    ///
    /// * `AlreadyExists` if the id is taken
    /// * `User`/`Team` if the author or their team cannot be resolved
    /// * `Store` if persistence fails
    pub async fn create(
        &self,
        id: &str,
        name: &str,
        author_id: &str,
    ) -> Result<PullRequest, PullRequestError> {
        let _guard = self.locks.lock(id).await;

        if self
            .store
            .get_by_id(id)
            .await
            .map_err(PullRequestError::store("get pr by id"))?
            .is_some()
        {
            return Err(PullRequestError::AlreadyExists(id.to_string()));
        }

        let author = self
            .users
            .get_by_id(author_id)
            .await
            .map_err(PullRequestError::user("get author"))?;

        let team = self
            .teams
            .get_by_team_name(&author.team_name)
            .await
            .map_err(PullRequestError::team("get team"))?;

        let reviewers = pick_reviewers(&team, author_id, self.random.as_ref());
        log::debug!(
            "Selected reviewers {reviewers:?} for pr {id} from team {}",
            team.team_name
        );

        let pr = PullRequest::new(id, name, author_id, Utc::now()).with_reviewers(reviewers);

        self.store.create(&pr).await.map_err(|e| match e {
            PullRequestStoreError::Duplicate(_) => PullRequestError::AlreadyExists(id.to_string()),
            e @ PullRequestStoreError::Backend(_) => PullRequestError::Store {
                context: "create pr",
                source: e,
            },
        })?;

        log::info!(
            "Created pr {id} by {author_id} with {} reviewer(s)",
            pr.assigned_reviewers.len()
        );

        Ok(pr)
    }

    /// Merge a pull request. Merging an already merged pull request returns it
    /// unchanged.
    ///
    /// # Errors
    ///
    /// * `NotFound` if the pull request does not exist
    /// * `Store` if persistence fails
    pub async fn merge(&self, id: &str) -> Result<PullRequest, PullRequestError> {
        let _guard = self.locks.lock(id).await;

        let mut pr = self.get_existing(id).await?;

        if !pr.merge(Utc::now()) {
            log::debug!("pr {id} already merged");
            return Ok(pr);
        }

        self.store
            .update(&pr)
            .await
            .map_err(PullRequestError::store("update pr on merge"))?;

        log::info!("Merged pr {id}");

        Ok(pr)
    }

    /// Replace `old_reviewer_id` with another active member of their team,
    /// keeping the slot position.
    ///
    /// Returns the updated pull request and the id of the new reviewer.
    ///
    /// # Errors
    ///
    /// * `NotFound` if the pull request does not exist
    /// * `AlreadyMerged` if it is merged
    /// * `NotAssigned` if `old_reviewer_id` is not one of its reviewers
    /// * `User`/`Team` if the old reviewer or their team cannot be resolved
    /// * `NoCandidate` if nobody is eligible
    /// * `Store` if persistence fails
    pub async fn reassign(
        &self,
        id: &str,
        old_reviewer_id: &str,
    ) -> Result<(PullRequest, String), PullRequestError> {
        let _guard = self.locks.lock(id).await;

        let mut pr = self.get_existing(id).await?;

        if pr.is_merged() {
            return Err(PullRequestError::AlreadyMerged(id.to_string()));
        }

        let slot = pr
            .reviewer_slot(old_reviewer_id)
            .ok_or_else(|| PullRequestError::NotAssigned {
                pull_request_id: id.to_string(),
                reviewer_id: old_reviewer_id.to_string(),
            })?;

        let old_reviewer = self
            .users
            .get_by_id(old_reviewer_id)
            .await
            .map_err(PullRequestError::user("get old reviewer"))?;

        let team = self
            .teams
            .get_by_team_name(&old_reviewer.team_name)
            .await
            .map_err(PullRequestError::team("get team for old reviewer"))?;

        let replacement = pick_replacement(
            &team,
            &pr.author_id,
            old_reviewer_id,
            &pr.assigned_reviewers,
            self.random.as_ref(),
        )
        .ok_or_else(|| PullRequestError::NoCandidate {
            pull_request_id: id.to_string(),
            reviewer_id: old_reviewer_id.to_string(),
        })?;

        pr.assigned_reviewers[slot].clone_from(&replacement);

        self.store
            .update(&pr)
            .await
            .map_err(PullRequestError::store("update pr on reassign"))?;

        log::info!("Reassigned pr {id}: {old_reviewer_id} -> {replacement}");

        Ok((pr, replacement))
    }

    /// Pull requests where `user_id` is a reviewer, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `Store` if the query fails.
    pub async fn get_by_reviewer_id(
        &self,
        user_id: &str,
    ) -> Result<Vec<PullRequestShort>, PullRequestError> {
        self.store
            .get_by_reviewer_id(user_id)
            .await
            .map_err(PullRequestError::store("get prs by reviewer"))
    }

    /// # Errors
    ///
    /// Returns `Store` if the query fails.
    pub async fn reviewer_stats(&self) -> Result<ReviewerStats, PullRequestError> {
        self.store
            .reviewer_stats()
            .await
            .map_err(PullRequestError::store("get reviewer stats"))
    }

    async fn get_existing(&self, id: &str) -> Result<PullRequest, PullRequestError> {
        self.store
            .get_by_id(id)
            .await
            .map_err(PullRequestError::store("get pr by id"))?
            .ok_or_else(|| PullRequestError::NotFound(id.to_string()))
    }
}
