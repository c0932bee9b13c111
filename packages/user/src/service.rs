use std::sync::Arc;

use prassign_user_models::{User, UserError};

use crate::UserDirectory;

#[derive(Clone)]
pub struct UserService {
    directory: Arc<dyn UserDirectory>,
}

impl UserService {
    #[must_use]
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self { directory }
    }

    /// # Errors
    ///
    /// Returns `UserError::NotFound` if the user does not exist, or a storage
    /// error from the directory.
    pub async fn set_is_active(&self, user_id: &str, is_active: bool) -> Result<User, UserError> {
        let user = self.directory.set_is_active(user_id, is_active).await?;
        log::info!("User {user_id} is_active set to {is_active}");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use tokio::sync::RwLock;

    use super::*;

    struct StubDirectory {
        users: RwLock<HashMap<String, User>>,
    }

    #[async_trait::async_trait]
    impl UserDirectory for StubDirectory {
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

    fn directory() -> Arc<StubDirectory> {
        let mut users = HashMap::new();
        users.insert("u1".to_string(), User::new("u1", "Alice", "backend", true));
        Arc::new(StubDirectory {
            users: RwLock::new(users),
        })
    }

    #[tokio::test]
    async fn test_set_is_active_returns_updated_user() {
        let directory = directory();
        let service = UserService::new(directory.clone());

        let user = service.set_is_active("u1", false).await.unwrap();
        assert!(!user.is_active);

        let reread = directory.get_by_id("u1").await.unwrap();
        assert!(!reread.is_active);
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let service = UserService::new(directory());

        let err = service.set_is_active("ghost", true).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
