use std::sync::Arc;

use models::{chirp::{ChirpPolicy, Post}, RecordId};
use tracing::{info, instrument};

use crate::errors::ServiceError;
use crate::storage::Database;

/// Applies the content policy in front of the post collection.
pub struct ChirpService {
    db: Arc<Database>,
    policy: ChirpPolicy,
}

impl ChirpService {
    pub fn new(db: Arc<Database>, policy: ChirpPolicy) -> Self { Self { db, policy } }

    pub fn policy(&self) -> &ChirpPolicy { &self.policy }

    /// Reject over-long bodies, censor banned words, store.
    #[instrument(skip(self, body))]
    pub async fn create(&self, body: &str) -> Result<Post, ServiceError> {
        let cleaned = self.policy.apply(body)?;
        let post = self.db.create_post(&cleaned).await?;
        info!(post_id = post.id, "chirp_created");
        Ok(post)
    }

    pub async fn list(&self) -> Result<Vec<Post>, ServiceError> {
        self.db.get_posts().await
    }

    pub async fn get(&self, id: RecordId) -> Result<Post, ServiceError> {
        self.db.get_post(id).await
    }

    /// Path segment to post id, as a transport would hand it over.
    pub async fn get_by_path(&self, raw_id: &str) -> Result<Post, ServiceError> {
        let id = raw_id
            .trim()
            .parse::<RecordId>()
            .map_err(|_| ServiceError::Validation(format!("invalid chirp id: {raw_id:?}")))?;
        self.get(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn svc() -> Result<(ChirpService, std::path::PathBuf), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("chirp_service_{}.json", uuid::Uuid::new_v4()));
        let db = Database::open(&tmp).await?;
        Ok((ChirpService::new(db, ChirpPolicy::default()), tmp))
    }

    #[tokio::test]
    async fn create_filters_and_stores() -> Result<(), anyhow::Error> {
        let (svc, tmp) = svc().await?;
        let post = svc.create("This is a kerfuffle opinion I need to share").await?;
        assert_eq!(post.body, "This is a **** opinion I need to share");
        assert_eq!(svc.get(post.id).await?, post);
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn length_boundary_through_service() -> Result<(), anyhow::Error> {
        let (svc, tmp) = svc().await?;
        svc.create(&"x".repeat(140)).await?;
        let err = svc.create(&"x".repeat(141)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(err.status_code(), 400);
        // the rejected chirp was never stored
        assert_eq!(svc.list().await?.len(), 1);
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn get_by_path_parses_ids() -> Result<(), anyhow::Error> {
        let (svc, tmp) = svc().await?;
        let post = svc.create("hello").await?;
        assert_eq!(svc.get_by_path("1").await?, post);
        assert!(matches!(svc.get_by_path("abc").await, Err(ServiceError::Validation(_))));
        let missing = svc.get_by_path("2").await.unwrap_err();
        assert_eq!(missing.status_code(), 404);
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }
}
