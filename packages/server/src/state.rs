use std::sync::Arc;

use prassign_pull_request::{PullRequestService, PullRequestStore};
use prassign_team::{TeamDirectory, TeamService};
use prassign_user::{UserDirectory, UserService};

/// Services shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub teams: TeamService,
    pub users: UserService,
    pub pull_requests: PullRequestService,
}

impl AppState {
    #[must_use]
    pub const fn new(
        teams: TeamService,
        users: UserService,
        pull_requests: PullRequestService,
    ) -> Self {
        Self {
            teams,
            users,
            pull_requests,
        }
    }

    /// Build every service over one storage backend.
    #[must_use]
    pub fn from_storage<S>(storage: Arc<S>) -> Self
    where
        S: UserDirectory + TeamDirectory + PullRequestStore + 'static,
    {
        let users: Arc<dyn UserDirectory> = storage.clone();
        let teams: Arc<dyn TeamDirectory> = storage.clone();
        let store: Arc<dyn PullRequestStore> = storage;

        Self::new(
            TeamService::new(teams.clone()),
            UserService::new(users.clone()),
            PullRequestService::new(store, users, teams),
        )
    }
}
