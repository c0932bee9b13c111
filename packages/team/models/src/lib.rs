#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

use prassign_user_models::User;
use serde::{Deserialize, Serialize};

/// A team and its current members.
///
/// Members read back from storage are ordered by `user_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub team_name: String,
    pub members: Vec<User>,
}

impl Team {
    #[must_use]
    pub fn new(team_name: impl Into<String>) -> Self {
        Self {
            team_name: team_name.into(),
            members: Vec::new(),
        }
    }

    /// Add a member, forcing its `team_name` to this team.
    #[must_use]
    pub fn with_member(mut self, mut user: User) -> Self {
        user.team_name.clone_from(&self.team_name);
        self.members.push(user);
        self
    }

    /// Members that are active, in member order.
    pub fn active_members(&self) -> impl Iterator<Item = &User> {
        self.members.iter().filter(|user| user.is_active)
    }
}

/// Errors returned by team directory implementations.
#[derive(Debug, thiserror::Error)]
pub enum TeamError {
    /// No team with the given name exists.
    #[error("team not found: {0}")]
    NotFound(String),

    /// The backing store failed.
    #[error("team storage failure: {0}")]
    Storage(String),
}

impl TeamError {
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_member_overrides_team_name() {
        let team = Team::new("backend").with_member(User::new("u1", "Alice", "frontend", true));

        assert_eq!(team.members[0].team_name, "backend");
    }

    #[test]
    fn test_active_members_skips_inactive() {
        let team = Team::new("backend")
            .with_member(User::new("u1", "Alice", "", true))
            .with_member(User::new("u2", "Bob", "", false))
            .with_member(User::new("u3", "Carol", "", true));

        let ids: Vec<&str> = team.active_members().map(|u| u.user_id.as_str()).collect();
        assert_eq!(ids, vec!["u1", "u3"]);
    }
}
