use async_trait::async_trait;
use models::{user::User, RecordId};

use crate::errors::ServiceError;

/// User persistence as seen by the auth workflows.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, ServiceError>;
    async fn create_user(&self, email: &str) -> Result<User, ServiceError>;
    async fn update_user(&self, id: RecordId, email: &str, hashed_password: &str) -> Result<User, ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockUserRepository {
        users: Mutex<BTreeMap<RecordId, User>>,
    }

    #[async_trait]
    impl UserRepository for MockUserRepository {
        async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, ServiceError> {
            let users = self.users.lock().unwrap();
            Ok(users.values().find(|u| u.email == email).cloned())
        }

        async fn create_user(&self, email: &str) -> Result<User, ServiceError> {
            let mut users = self.users.lock().unwrap();
            let id = users.keys().next_back().copied().unwrap_or(0) + 1;
            let user = User { id, email: email.to_string(), hashed_password: String::new() };
            users.insert(id, user.clone());
            Ok(user)
        }

        async fn update_user(&self, id: RecordId, email: &str, hashed_password: &str) -> Result<User, ServiceError> {
            let mut users = self.users.lock().unwrap();
            let user = users.get_mut(&id).ok_or_else(|| ServiceError::not_found("user", id))?;
            user.email = email.to_string();
            user.hashed_password = hashed_password.to_string();
            Ok(user.clone())
        }
    }
}
