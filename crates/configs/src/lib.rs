use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

/// Fallback secret for local development only.
pub const DEV_JWT_SECRET: &str = "dev-secret-change-me";

/// Upper bound for `auth.default_token_ttl_secs` (one year).
pub const MAX_TOKEN_TTL_SECS: i64 = 365 * 24 * 60 * 60;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub chirps: ChirpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub worker_threads: Option<usize>,
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self { worker_threads: Some(4), log_format: default_log_format() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { path: default_db_path() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl")]
    pub default_token_ttl_secs: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { jwt_secret: String::new(), default_token_ttl_secs: default_token_ttl() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChirpConfig {
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    #[serde(default = "default_banned_words")]
    pub banned_words: Vec<String>,
}

impl Default for ChirpConfig {
    fn default() -> Self {
        Self { max_length: default_max_length(), banned_words: default_banned_words() }
    }
}

fn default_log_format() -> String { "compact".into() }
fn default_db_path() -> String { "data/database.json".into() }
fn default_token_ttl() -> i64 { 24 * 60 * 60 }
fn default_max_length() -> usize { 140 }
fn default_banned_words() -> Vec<String> {
    vec!["kerfuffle".into(), "sharbert".into(), "fornax".into()]
}

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    load_from_str(&content)
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`), falling back to defaults when the
    /// file is missing, then apply environment overrides and validate.
    pub fn load_and_validate() -> Result<Self> {
        let _ = dotenvy::dotenv();
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(e) if is_not_found(&e) => AppConfig::default(),
            Err(e) => return Err(e),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.runtime.normalize();
        self.storage.normalize_from_env();
        self.auth.normalize_from_env();
        self.storage.validate()?;
        self.auth.validate()?;
        self.chirps.validate()?;
        Ok(())
    }
}

fn is_not_found(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .map(|io| io.kind() == std::io::ErrorKind::NotFound)
        .unwrap_or(false)
}

impl RuntimeConfig {
    fn normalize(&mut self) {
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        if self.log_format.trim().is_empty() {
            self.log_format = default_log_format();
        }
    }
}

impl StorageConfig {
    pub fn normalize_from_env(&mut self) {
        if let Ok(path) = std::env::var("CHIRPY_DB_PATH") {
            if !path.trim().is_empty() {
                self.path = path;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.path.trim().is_empty() {
            return Err(anyhow!("storage.path must not be empty"));
        }
        Ok(())
    }
}

impl AuthConfig {
    /// `JWT_SECRET` wins over the file; an absent secret falls back to the dev one.
    pub fn normalize_from_env(&mut self) {
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            if !secret.trim().is_empty() {
                self.jwt_secret = secret;
            }
        }
        if self.jwt_secret.trim().is_empty() {
            self.jwt_secret = DEV_JWT_SECRET.to_string();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_token_ttl_secs <= 0 {
            return Err(anyhow!("auth.default_token_ttl_secs must be positive"));
        }
        if self.default_token_ttl_secs > MAX_TOKEN_TTL_SECS {
            return Err(anyhow!("auth.default_token_ttl_secs must be <= {MAX_TOKEN_TTL_SECS}"));
        }
        Ok(())
    }
}

impl ChirpConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_length == 0 {
            return Err(anyhow!("chirps.max_length must be >= 1"));
        }
        if self.banned_words.iter().any(|w| w.trim().is_empty() || w.contains(' ')) {
            return Err(anyhow!("chirps.banned_words entries must be single non-empty words"));
        }
        Ok(())
    }
}
