//! Process-wide state, built once at startup and shared read-only afterwards.

use std::sync::Arc;

use chrono::Duration;
use common::metrics::HitCounter;
use configs::AppConfig;
use models::chirp::ChirpPolicy;

use crate::auth::{AuthService, TokenConfig};
use crate::chirp_service::ChirpService;
use crate::errors::ServiceError;
use crate::storage::Database;

pub struct AppContext {
    pub db: Arc<Database>,
    pub chirps: ChirpService,
    pub auth: AuthService<Database>,
    pub hits: HitCounter,
}

impl AppContext {
    pub async fn open<P: Into<std::path::PathBuf>>(
        db_path: P,
        tokens: TokenConfig,
        policy: ChirpPolicy,
    ) -> Result<Self, ServiceError> {
        let db = Database::open(db_path).await?;
        let hits = HitCounter::new().map_err(|e| ServiceError::Internal(format!("metrics: {e}")))?;
        Ok(Self {
            chirps: ChirpService::new(Arc::clone(&db), policy),
            auth: AuthService::new(Arc::clone(&db), tokens),
            db,
            hits,
        })
    }

    pub async fn from_config(cfg: &AppConfig) -> Result<Self, ServiceError> {
        let ttl = Duration::try_seconds(cfg.auth.default_token_ttl_secs)
            .filter(|ttl| *ttl > Duration::zero())
            .ok_or_else(|| {
                ServiceError::Internal(format!("token ttl out of range: {}s", cfg.auth.default_token_ttl_secs))
            })?;
        let tokens = TokenConfig::new(cfg.auth.jwt_secret.as_bytes(), ttl);
        let policy = ChirpPolicy::new(cfg.chirps.max_length, &cfg.chirps.banned_words);
        Self::open(&cfg.storage.path, tokens, policy).await
    }

    /// Clear hits and every stored record.
    pub async fn reset(&self) -> Result<(), ServiceError> {
        self.hits.reset();
        self.db.reset().await
    }
}
