use std::{collections::BTreeMap, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use models::{chirp::Post, user::User, RecordId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::auth::repository::UserRepository;
use crate::errors::ServiceError;
use crate::storage::json_document_store::{Document, JsonDocumentStore};

/// Everything persisted: both collections, keyed by id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreDocument {
    #[serde(default)]
    pub posts: BTreeMap<RecordId, Post>,
    #[serde(default)]
    pub users: BTreeMap<RecordId, User>,
}

impl Document for StoreDocument {
    fn normalize(&mut self) -> Result<(), ServiceError> {
        // id 0 is left over from older files and never valid
        if self.posts.remove(&0).is_some() {
            warn!("scrubbed post with id 0");
        }
        if self.users.remove(&0).is_some() {
            warn!("scrubbed user with id 0");
        }
        if let Some((k, p)) = self.posts.iter().find(|(k, p)| **k != p.id) {
            return Err(ServiceError::Internal(format!("corrupt store: post key {k} holds id {}", p.id)));
        }
        if let Some((k, u)) = self.users.iter().find(|(k, u)| **k != u.id) {
            return Err(ServiceError::Internal(format!("corrupt store: user key {k} holds id {}", u.id)));
        }
        Ok(())
    }
}

/// Max existing key plus one, or 1 for an empty collection.
fn next_id<V>(map: &BTreeMap<RecordId, V>) -> Result<RecordId, ServiceError> {
    let max = map.keys().next_back().copied().unwrap_or(0);
    max.checked_add(1)
        .ok_or_else(|| ServiceError::Internal("record id space exhausted".into()))
}

/// Handle on the chirp/user store file.
pub struct Database {
    store: JsonDocumentStore<StoreDocument>,
}

impl Database {
    /// Open the store at `path`, creating an empty one if the file is missing.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let store = JsonDocumentStore::open(path).await?;
        info!(path = %store.path().display(), "database opened");
        Ok(Arc::new(Self { store }))
    }

    pub fn path(&self) -> &std::path::Path {
        self.store.path()
    }

    #[instrument(skip(self, body), fields(body_len = body.len()))]
    pub async fn create_post(&self, body: &str) -> Result<Post, ServiceError> {
        let post = self
            .store
            .update(|doc| {
                let post = Post { id: next_id(&doc.posts)?, body: body.to_string() };
                doc.posts.insert(post.id, post.clone());
                Ok(post)
            })
            .await?;
        debug!(post_id = post.id, "post_created");
        Ok(post)
    }

    #[instrument(skip(self, email))]
    pub async fn create_user(&self, email: &str) -> Result<User, ServiceError> {
        let user = self
            .store
            .update(|doc| {
                let user = User { id: next_id(&doc.users)?, email: email.to_string(), hashed_password: String::new() };
                doc.users.insert(user.id, user.clone());
                Ok(user)
            })
            .await?;
        debug!(user_id = user.id, "user_created");
        Ok(user)
    }

    #[instrument(skip(self, email, hashed_password))]
    pub async fn update_user(&self, id: RecordId, email: &str, hashed_password: &str) -> Result<User, ServiceError> {
        self.store
            .update(|doc| {
                let user = doc.users.get_mut(&id).ok_or_else(|| ServiceError::not_found("user", id))?;
                user.email = email.to_string();
                user.hashed_password = hashed_password.to_string();
                Ok(user.clone())
            })
            .await
    }

    /// All posts by ascending id, freshly loaded.
    pub async fn get_posts(&self) -> Result<Vec<Post>, ServiceError> {
        self.store.read(|doc| Ok(doc.posts.into_values().collect())).await
    }

    pub async fn get_post(&self, id: RecordId) -> Result<Post, ServiceError> {
        self.store
            .read(|mut doc| doc.posts.remove(&id).ok_or_else(|| ServiceError::not_found("post", id)))
            .await
    }

    pub async fn get_user(&self, id: RecordId) -> Result<User, ServiceError> {
        self.store
            .read(|mut doc| doc.users.remove(&id).ok_or_else(|| ServiceError::not_found("user", id)))
            .await
    }

    /// Lowest-id user with exactly this email.
    pub async fn get_user_by_email(&self, email: &str) -> Result<User, ServiceError> {
        self.store
            .read(|doc| {
                doc.users
                    .into_values()
                    .find(|u| u.email == email)
                    .ok_or_else(|| ServiceError::NotFound(format!("user with email {email}")))
            })
            .await
    }

    /// Drop every post and user.
    #[instrument(skip(self))]
    pub async fn reset(&self) -> Result<(), ServiceError> {
        self.store.reset().await?;
        info!("database reset");
        Ok(())
    }
}

#[async_trait]
impl UserRepository for Database {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, ServiceError> {
        match self.get_user_by_email(email).await {
            Ok(u) => Ok(Some(u)),
            Err(ServiceError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn create_user(&self, email: &str) -> Result<User, ServiceError> {
        Database::create_user(self, email).await
    }

    async fn update_user(&self, id: RecordId, email: &str, hashed_password: &str) -> Result<User, ServiceError> {
        Database::update_user(self, id, email, hashed_password).await
    }
}
