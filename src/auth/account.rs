//! Account operations for corkboard.
//!
//! Registration, login/logout and account updates. Every operation that
//! changes the logged-in user's record refreshes the session snapshot before
//! returning.

use std::sync::Arc;

use tracing::{info, warn};

use super::password::{hash_password, verify_password};
use super::permission::AuthorizationError;
use super::session::{SessionId, SessionStore};
use super::validation::{
    normalize_email, validate_password, validate_username, ValidationError,
};
use crate::db::{NewUser, User, UserRepositoryTrait, UserUpdate};
use crate::{CorkboardError, Result};

/// Registration request data.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    /// Desired username (4-16 alphanumeric + underscore).
    pub username: String,
    /// Password (8-128 characters).
    pub password: String,
    /// Optional email address.
    pub email: Option<String>,
}

impl RegistrationRequest {
    /// Create a new registration request.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            email: None,
        }
    }

    /// Set the email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Account update request.
///
/// `None` leaves a field unchanged. A blank email clears it.
#[derive(Debug, Clone, Default)]
pub struct AccountUpdateRequest {
    /// New password.
    pub password: Option<String>,
    /// New email address.
    pub email: Option<String>,
}

impl AccountUpdateRequest {
    /// Create an empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a new password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set or clear the email address.
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Check if any fields are set.
    pub fn is_empty(&self) -> bool {
        self.password.is_none() && self.email.is_none()
    }
}

/// Service for user accounts.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepositoryTrait>,
    sessions: SessionStore,
}

impl AccountService {
    /// Create a new AccountService.
    pub fn new(users: Arc<dyn UserRepositoryTrait>, sessions: SessionStore) -> Self {
        Self { users, sessions }
    }

    /// Register a new user.
    pub async fn register(&self, request: RegistrationRequest) -> Result<User> {
        validate_username(&request.username)?;
        validate_password(&request.password, Some(request.username.as_str()))?;
        let email = normalize_email(request.email.as_deref())?;

        if self.users.username_exists(&request.username).await? {
            return Err(ValidationError::UsernameTaken.into());
        }

        let mut new_user = NewUser::new(&request.username, hash_password(&request.password)?);
        if let Some(email) = email {
            new_user = new_user.with_email(email);
        }

        let user = self.users.create(&new_user).await?;
        info!(user_id = user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Authenticate and attach the user to the session.
    pub async fn login(&self, session: &SessionId, username: &str, password: &str) -> Result<User> {
        let mut guard = self.sessions.lock(session).await?;

        let Some(user) = self.users.find_by_username(username).await? else {
            info!(username, "Login failed: unknown user");
            return Err(AuthorizationError::InvalidCredentials.into());
        };

        if let Err(e) = verify_password(password, &user.password_hash) {
            info!(user_id = user.id, error = %e, "Login failed");
            return Err(AuthorizationError::InvalidCredentials.into());
        }

        guard.replace(user.clone());
        info!(session_id = %session, user_id = user.id, "User logged in");
        Ok(user)
    }

    /// Clear the session. Returns false if it did not exist.
    pub async fn logout(&self, session: &SessionId) -> bool {
        let cleared = self.sessions.clear(session).await;
        if cleared {
            info!(session_id = %session, "User logged out");
        }
        cleared
    }

    /// Read the logged-in user's persisted record, for the update form.
    pub async fn get_account(&self, session: &SessionId) -> Result<User> {
        let principal = self.sessions.get(session).await;
        let user_id = principal
            .user_id()
            .ok_or(AuthorizationError::NotAuthenticated)?;

        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| CorkboardError::not_found("user", user_id))
    }

    /// Update the logged-in user's password and/or email.
    pub async fn update_account(
        &self,
        session: &SessionId,
        request: AccountUpdateRequest,
    ) -> Result<User> {
        if request.is_empty() {
            return Err(ValidationError::EmptyUpdate.into());
        }

        let mut guard = self.sessions.lock(session).await?;
        let user_id = guard.user()?.id;
        let username = self
            .users
            .find_by_id(user_id)
            .await?
            .map(|u| u.username)
            .ok_or_else(|| {
                warn!(user_id, "Logged-in user no longer exists");
                CorkboardError::not_found("user", user_id)
            })?;

        let mut update = UserUpdate::new();
        if let Some(ref password) = request.password {
            validate_password(password, Some(username.as_str()))?;
            update = update.password_hash(hash_password(password)?);
        }
        if let Some(ref email) = request.email {
            update = update.email(normalize_email(Some(email.as_str()))?);
        }

        let updated = self
            .users
            .update(user_id, &update)
            .await?
            .ok_or_else(|| CorkboardError::not_found("user", user_id))?;

        guard.replace(updated.clone());
        info!(user_id, "Account updated");
        Ok(updated)
    }
}

impl std::fmt::Debug for AccountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountService").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Database, UserRepository};
    use async_trait::async_trait;

    async fn setup() -> (AccountService, SessionStore) {
        let db = Database::open_in_memory().await.unwrap();
        let sessions = SessionStore::new();
        let users = Arc::new(UserRepository::new(db.pool().clone()));
        (AccountService::new(users, sessions.clone()), sessions)
    }

    #[tokio::test]
    async fn test_register() {
        let (service, _) = setup().await;
        let user = service
            .register(RegistrationRequest::new("alice", "password123").with_email("a@example.com"))
            .await
            .unwrap();

        assert_eq!(user.username, "alice");
        assert_eq!(user.email.as_deref(), Some("a@example.com"));
        assert!(user.password_hash.starts_with("$argon2id$"));
        assert!(verify_password("password123", &user.password_hash).is_ok());
    }

    #[tokio::test]
    async fn test_register_duplicate_rejected() {
        let (service, _) = setup().await;
        service
            .register(RegistrationRequest::new("alice", "password123"))
            .await
            .unwrap();

        let result = service
            .register(RegistrationRequest::new("ALICE", "password456"))
            .await;
        assert!(matches!(result, Err(CorkboardError::Validation(msg)) if msg.contains("taken")));
    }

    #[tokio::test]
    async fn test_register_invalid_input() {
        let (service, _) = setup().await;

        let result = service.register(RegistrationRequest::new("ab", "password123")).await;
        assert!(matches!(result, Err(CorkboardError::Validation(_))));

        let result = service.register(RegistrationRequest::new("alice", "short")).await;
        assert!(matches!(result, Err(CorkboardError::Validation(_))));

        let result = service
            .register(RegistrationRequest::new("alice", "password123").with_email("nope"))
            .await;
        assert!(matches!(result, Err(CorkboardError::Validation(_))));
    }

    #[tokio::test]
    async fn test_login_sets_snapshot() {
        let (service, sessions) = setup().await;
        let registered = service
            .register(RegistrationRequest::new("alice", "password123"))
            .await
            .unwrap();
        let session = sessions.open().await;

        let user = service.login(&session, "alice", "password123").await.unwrap();
        assert_eq!(user.id, registered.id);
        assert_eq!(sessions.get(&session).await.user_id(), Some(registered.id));
    }

    #[tokio::test]
    async fn test_login_invalid_credentials() {
        let (service, sessions) = setup().await;
        service
            .register(RegistrationRequest::new("alice", "password123"))
            .await
            .unwrap();
        let session = sessions.open().await;

        let wrong = service.login(&session, "alice", "password124").await;
        assert!(matches!(
            wrong,
            Err(CorkboardError::Authorization(AuthorizationError::InvalidCredentials))
        ));

        let unknown = service.login(&session, "nobody", "password123").await;
        assert!(matches!(
            unknown,
            Err(CorkboardError::Authorization(AuthorizationError::InvalidCredentials))
        ));

        assert!(!sessions.get(&session).await.is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_is_terminal() {
        let (service, sessions) = setup().await;
        service
            .register(RegistrationRequest::new("alice", "password123"))
            .await
            .unwrap();
        let session = sessions.open().await;
        service.login(&session, "alice", "password123").await.unwrap();

        assert!(service.logout(&session).await);
        assert!(!service.logout(&session).await);

        let result = service.login(&session, "alice", "password123").await;
        assert!(matches!(result, Err(CorkboardError::Session(_))));
    }

    #[tokio::test]
    async fn test_get_account_requires_login() {
        let (service, sessions) = setup().await;
        let session = sessions.open().await;

        let result = service.get_account(&session).await;
        assert!(matches!(
            result,
            Err(CorkboardError::Authorization(AuthorizationError::NotAuthenticated))
        ));
    }

    #[tokio::test]
    async fn test_update_account_resyncs_snapshot() {
        let (service, sessions) = setup().await;
        service
            .register(RegistrationRequest::new("alice", "password123"))
            .await
            .unwrap();
        let session = sessions.open().await;
        service.login(&session, "alice", "password123").await.unwrap();

        let updated = service
            .update_account(
                &session,
                AccountUpdateRequest::new()
                    .password("newpassword456")
                    .email("new@example.com"),
            )
            .await
            .unwrap();

        let principal = sessions.get(&session).await;
        let snapshot = principal.user().unwrap();
        assert_eq!(snapshot, &updated);
        assert_eq!(snapshot.email.as_deref(), Some("new@example.com"));
        assert_eq!(service.get_account(&session).await.unwrap(), updated);

        assert!(service.logout(&session).await);
        let session = sessions.open().await;
        assert!(service.login(&session, "alice", "newpassword456").await.is_ok());
    }

    #[tokio::test]
    async fn test_update_account_clears_email() {
        let (service, sessions) = setup().await;
        service
            .register(RegistrationRequest::new("alice", "password123").with_email("a@example.com"))
            .await
            .unwrap();
        let session = sessions.open().await;
        service.login(&session, "alice", "password123").await.unwrap();

        let updated = service
            .update_account(&session, AccountUpdateRequest::new().email(""))
            .await
            .unwrap();
        assert!(updated.email.is_none());
    }

    #[tokio::test]
    async fn test_update_account_rejects_empty_and_invalid() {
        let (service, sessions) = setup().await;
        service
            .register(RegistrationRequest::new("alice", "password123"))
            .await
            .unwrap();
        let session = sessions.open().await;
        let before = service.login(&session, "alice", "password123").await.unwrap();

        let empty = service
            .update_account(&session, AccountUpdateRequest::new())
            .await;
        assert!(matches!(empty, Err(CorkboardError::Validation(_))));

        let same = service
            .update_account(&session, AccountUpdateRequest::new().password("alice"))
            .await;
        assert!(matches!(same, Err(CorkboardError::Validation(_))));

        assert_eq!(sessions.get(&session).await.user().unwrap(), &before);
    }

    #[tokio::test]
    async fn test_update_account_rereads_persisted_user() {
        let (service, sessions) = setup().await;
        let session = sessions.open().await;
        let ghost = User {
            id: 999,
            username: "ghost".to_string(),
            password_hash: "hash".to_string(),
            email: None,
            image_path: None,
            created_at: "2024-01-01 00:00:00".to_string(),
        };
        sessions.set(&session, ghost.clone()).await.unwrap();

        let result = service
            .update_account(&session, AccountUpdateRequest::new().email("g@example.com"))
            .await;
        assert!(matches!(result, Err(CorkboardError::NotFound(msg)) if msg == "user 999"));
        assert_eq!(sessions.get(&session).await.user().unwrap(), &ghost);
    }

    struct FailingUpdates {
        inner: UserRepository,
    }

    #[async_trait]
    impl UserRepositoryTrait for FailingUpdates {
        async fn create(&self, new_user: &NewUser) -> Result<User> {
            self.inner.create(new_user).await
        }

        async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
            self.inner.find_by_id(id).await
        }

        async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
            self.inner.find_by_username(username).await
        }

        async fn update(&self, _id: i64, _update: &UserUpdate) -> Result<Option<User>> {
            Err(CorkboardError::Persistence("disk full".to_string()))
        }

        async fn swap_image_path(
            &self,
            id: i64,
            expected: Option<&str>,
            new: Option<&str>,
        ) -> Result<bool> {
            self.inner.swap_image_path(id, expected, new).await
        }

        async fn username_exists(&self, username: &str) -> Result<bool> {
            self.inner.username_exists(username).await
        }
    }

    #[tokio::test]
    async fn test_failed_update_leaves_snapshot() {
        let db = Database::open_in_memory().await.unwrap();
        let sessions = SessionStore::new();
        let users = Arc::new(FailingUpdates {
            inner: UserRepository::new(db.pool().clone()),
        });
        let service = AccountService::new(users, sessions.clone());

        service
            .register(RegistrationRequest::new("alice", "password123").with_email("a@example.com"))
            .await
            .unwrap();
        let session = sessions.open().await;
        let before = service.login(&session, "alice", "password123").await.unwrap();

        let result = service
            .update_account(&session, AccountUpdateRequest::new().email("b@example.com"))
            .await;
        assert!(matches!(result, Err(CorkboardError::Persistence(_))));
        assert_eq!(sessions.get(&session).await.user().unwrap(), &before);
    }
}
