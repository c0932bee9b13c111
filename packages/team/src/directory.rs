use prassign_team_models::{Team, TeamError};

#[async_trait::async_trait]
pub trait TeamDirectory: Send + Sync {
    /// Upsert the team and every one of its members.
    ///
    /// Existing members have their username, team and active flag overwritten.
    ///
    /// # Errors
    ///
    /// Returns `TeamError::Storage` if the write fails.
    async fn create(&self, team: &Team) -> Result<(), TeamError>;

    /// Fetch a team with its full current member set.
    ///
    /// # Errors
    ///
    /// Returns `TeamError::NotFound` if no team has this name.
    async fn get_by_team_name(&self, team_name: &str) -> Result<Team, TeamError>;
}
