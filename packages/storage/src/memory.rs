//! In-process storage backed by hash maps.

use std::collections::{BTreeSet, HashMap};

use prassign_pull_request::{
    PullRequest, PullRequestShort, PullRequestStore, PullRequestStoreError, ReviewerStats,
};
use prassign_team::{Team, TeamDirectory, TeamError};
use prassign_user::{User, UserDirectory, UserError};
use tokio::sync::RwLock;

/// Storage that lives for the lifetime of the process.
///
/// Used for tests and for running the server without a database.
#[derive(Default)]
pub struct MemoryStorage {
    teams: RwLock<BTreeSet<String>>,
    users: RwLock<HashMap<String, User>>,
    pull_requests: RwLock<HashMap<String, PullRequest>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl UserDirectory for MemoryStorage {
    async fn get_by_id(&self, user_id: &str) -> Result<User, UserError> {
        self.users
            .read()
            .await
            .get(user_id)
            .cloned()
            .ok_or_else(|| UserError::NotFound(user_id.to_string()))
    }

    async fn set_is_active(&self, user_id: &str, is_active: bool) -> Result<User, UserError> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(user_id)
            .ok_or_else(|| UserError::NotFound(user_id.to_string()))?;
        user.is_active = is_active;
        Ok(user.clone())
    }
}

#[async_trait::async_trait]
impl TeamDirectory for MemoryStorage {
    async fn create(&self, team: &Team) -> Result<(), TeamError> {
        let mut teams = self.teams.write().await;
        let mut users = self.users.write().await;

        teams.insert(team.team_name.clone());
        for member in &team.members {
            users.insert(
                member.user_id.clone(),
                User {
                    team_name: team.team_name.clone(),
                    ..member.clone()
                },
            );
        }

        Ok(())
    }

    async fn get_by_team_name(&self, team_name: &str) -> Result<Team, TeamError> {
        if !self.teams.read().await.contains(team_name) {
            return Err(TeamError::NotFound(team_name.to_string()));
        }

        let mut members: Vec<User> = self
            .users
            .read()
            .await
            .values()
            .filter(|user| user.team_name == team_name)
            .cloned()
            .collect();
        members.sort_by(|a, b| a.user_id.cmp(&b.user_id));

        Ok(Team {
            team_name: team_name.to_string(),
            members,
        })
    }
}

#[async_trait::async_trait]
impl PullRequestStore for MemoryStorage {
    async fn create(&self, pr: &PullRequest) -> Result<(), PullRequestStoreError> {
        let mut pull_requests = self.pull_requests.write().await;
        if pull_requests.contains_key(&pr.pull_request_id) {
            return Err(PullRequestStoreError::Duplicate(pr.pull_request_id.clone()));
        }
        pull_requests.insert(pr.pull_request_id.clone(), pr.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<PullRequest>, PullRequestStoreError> {
        Ok(self.pull_requests.read().await.get(id).cloned())
    }

    async fn update(&self, pr: &PullRequest) -> Result<(), PullRequestStoreError> {
        let mut pull_requests = self.pull_requests.write().await;
        let stored = pull_requests.get_mut(&pr.pull_request_id).ok_or_else(|| {
            PullRequestStoreError::Backend(format!(
                "update pull_request: {} not stored",
                pr.pull_request_id
            ))
        })?;

        stored.status = pr.status;
        stored.assigned_reviewers.clone_from(&pr.assigned_reviewers);
        stored.merged_at = pr.merged_at;

        Ok(())
    }

    async fn get_by_reviewer_id(
        &self,
        reviewer_id: &str,
    ) -> Result<Vec<PullRequestShort>, PullRequestStoreError> {
        let pull_requests = self.pull_requests.read().await;
        let mut matching: Vec<&PullRequest> = pull_requests
            .values()
            .filter(|pr| pr.has_reviewer(reviewer_id))
            .collect();
        matching.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.pull_request_id.cmp(&b.pull_request_id))
        });

        Ok(matching.into_iter().map(PullRequest::to_short).collect())
    }

    async fn reviewer_stats(&self) -> Result<ReviewerStats, PullRequestStoreError> {
        let mut stats = ReviewerStats::new();
        for pr in self.pull_requests.read().await.values() {
            for reviewer in &pr.assigned_reviewers {
                *stats.entry(reviewer.clone()).or_default() += 1;
            }
        }
        Ok(stats)
    }
}
