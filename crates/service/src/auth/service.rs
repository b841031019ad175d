use std::sync::Arc;

use models::{user::{self, PublicUser}, RecordId};
use tracing::{debug, info, instrument, warn};

use super::bearer::extract_bearer_token;
use super::domain::{AuthSession, LoginInput, RegisterInput, UpdateCredentialsInput};
use super::errors::AuthError;
use super::password::{hash_password, verify_password};
use super::repository::UserRepository;
use super::token::{parse_subject, requested_ttl_secs, TokenConfig};
use crate::errors::ServiceError;

/// Auth business service independent of any transport
pub struct AuthService<R: UserRepository> {
    repo: Arc<R>,
    tokens: TokenConfig,
}

impl<R: UserRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, tokens: TokenConfig) -> Self { Self { repo, tokens } }

    pub fn tokens(&self) -> &TokenConfig { &self.tokens }

    /// Register a new user with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, TokenConfig, repository::mock::MockUserRepository};
    /// use service::auth::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockUserRepository::default());
    /// let svc = AuthService::new(repo, TokenConfig::with_secret("secret"));
    /// let input = RegisterInput { email: "user@example.com".into(), password: "Secret123".into() };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.email, "user@example.com");
    /// assert_eq!(user.id, 1);
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<PublicUser, ServiceError> {
        user::validate_email(&input.email)?;
        user::validate_password(&input.password)?;
        if let Some(existing) = self.repo.find_user_by_email(&input.email).await? {
            debug!(user_id = existing.id, "email already registered");
            return Err(ServiceError::Validation("email already registered".into()));
        }

        // hash before creating so a hashing failure leaves no half-made user
        let hash = hash_password(&input.password)?;
        let created = self.repo.create_user(&input.email).await?;
        let user = self.repo.update_user(created.id, &created.email, &hash).await?;
        info!(user_id = user.id, "user_registered");
        Ok(user.into())
    }

    /// Check the password and issue a token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, TokenConfig, repository::mock::MockUserRepository};
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockUserRepository::default());
    /// let svc = AuthService::new(repo, TokenConfig::with_secret("secret"));
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { email: "u@e.com".into(), password: "Passw0rd".into() }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd".into(), expires_in_seconds: None })).unwrap();
    /// assert_eq!(session.user.email, "u@e.com");
    /// assert_eq!(svc.tokens().validate(&session.token).unwrap(), "1");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, ServiceError> {
        // an unknown email looks exactly like a wrong password
        let user = self.repo
            .find_user_by_email(&input.email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if let Err(e) = verify_password(&input.password, &user.hashed_password) {
            warn!(user_id = user.id, "login_rejected");
            return Err(e.into());
        }

        let token = self.tokens.issue(user.id, requested_ttl_secs(input.expires_in_seconds))?;
        info!(user_id = user.id, "user_logged_in");
        Ok(AuthSession { user: user.into(), token })
    }

    /// User id behind an `Authorization` header value.
    pub fn authenticate(&self, authorization: Option<&str>) -> Result<RecordId, ServiceError> {
        let token = extract_bearer_token(authorization)?;
        let subject = self.tokens.validate(token)?;
        parse_subject(&subject)
    }

    /// Replace email and password of the user the bearer token belongs to.
    #[instrument(skip_all)]
    pub async fn update_credentials(
        &self,
        authorization: Option<&str>,
        input: UpdateCredentialsInput,
    ) -> Result<PublicUser, ServiceError> {
        let user_id = self.authenticate(authorization)?;
        user::validate_email(&input.email)?;
        user::validate_password(&input.password)?;
        let hash = hash_password(&input.password)?;
        let user = self.repo.update_user(user_id, &input.email, &hash).await?;
        info!(user_id, "user_credentials_updated");
        Ok(user.into())
    }
}
