use std::sync::Arc;

use prassign_team_models::{Team, TeamError};

use crate::TeamDirectory;

#[derive(Clone)]
pub struct TeamService {
    directory: Arc<dyn TeamDirectory>,
}

impl TeamService {
    #[must_use]
    pub fn new(directory: Arc<dyn TeamDirectory>) -> Self {
        Self { directory }
    }

    /// # Errors
    ///
    /// Returns a storage error if the upsert fails.
    pub async fn create(&self, team: &Team) -> Result<(), TeamError> {
        self.directory.create(team).await?;
        log::info!(
            "Upserted team {} with {} member(s)",
            team.team_name,
            team.members.len()
        );
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `TeamError::NotFound` if the team does not exist.
    pub async fn get_by_team_name(&self, team_name: &str) -> Result<Team, TeamError> {
        self.directory.get_by_team_name(team_name).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use prassign_user_models::User;
    use tokio::sync::RwLock;

    use super::*;

    #[derive(Default)]
    struct StubDirectory {
        teams: RwLock<HashMap<String, Team>>,
    }

    #[async_trait::async_trait]
    impl TeamDirectory for StubDirectory {
        async fn create(&self, team: &Team) -> Result<(), TeamError> {
            self.teams
                .write()
                .await
                .insert(team.team_name.clone(), team.clone());
            Ok(())
        }

        async fn get_by_team_name(&self, team_name: &str) -> Result<Team, TeamError> {
            self.teams
                .read()
                .await
                .get(team_name)
                .cloned()
                .ok_or_else(|| TeamError::NotFound(team_name.to_string()))
        }
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let service = TeamService::new(Arc::new(StubDirectory::default()));
        let team = Team::new("backend").with_member(User::new("u1", "Alice", "", true));

        service.create(&team).await.unwrap();

        let fetched = service.get_by_team_name("backend").await.unwrap();
        assert_eq!(fetched, team);
    }

    #[tokio::test]
    async fn test_missing_team_is_not_found() {
        let service = TeamService::new(Arc::new(StubDirectory::default()));

        let err = service.get_by_team_name("nope").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
