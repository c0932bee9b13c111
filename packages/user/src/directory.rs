//! User directory trait.

use prassign_user_models::{User, UserError};

/// Lookup and activation of users.
///
/// Team membership is written through the team directory; this trait only
/// covers reads by id and the active flag.
#[async_trait::async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetch a user by id.
    ///
    /// # Errors
    ///
    /// Returns `UserError::NotFound` if no user has this id.
    async fn get_by_id(&self, user_id: &str) -> Result<User, UserError>;

    /// Set the active flag of a user and return the updated record.
    ///
    /// # Errors
    ///
    /// Returns `UserError::NotFound` if no user has this id.
    async fn set_is_active(&self, user_id: &str, is_active: bool) -> Result<User, UserError>;
}
