//! User model for corkboard.

/// User entity representing a registered user.
///
/// A session caches an immutable copy of this record; see
/// [`crate::auth::SessionStore`].
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: i64,
    /// Login handle (unique, case-insensitive).
    pub username: String,
    /// Password hash (Argon2id PHC string).
    pub password_hash: String,
    /// Email address (optional).
    pub email: Option<String>,
    /// Stored profile image name (optional).
    pub image_path: Option<String>,
    /// Account creation timestamp.
    pub created_at: String,
}

impl User {
    /// Whether a profile image is set.
    pub fn has_image(&self) -> bool {
        self.image_path.is_some()
    }
}

/// Data for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Login handle.
    pub username: String,
    /// Password hash (pre-hashed with Argon2).
    pub password_hash: String,
    /// Email address (optional).
    pub email: Option<String>,
}

impl NewUser {
    /// Create a new user with the required fields.
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
            email: None,
        }
    }

    /// Set the email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Data for updating an existing user.
///
/// `None` leaves a field unchanged; `Some(None)` clears a nullable field.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    /// New password hash.
    pub password_hash: Option<String>,
    /// New email address.
    pub email: Option<Option<String>>,
    /// New profile image name.
    pub image_path: Option<Option<String>>,
}

impl UserUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a new password hash.
    pub fn password_hash(mut self, hash: impl Into<String>) -> Self {
        self.password_hash = Some(hash.into());
        self
    }

    /// Set or clear the email address.
    pub fn email(mut self, email: Option<String>) -> Self {
        self.email = Some(email);
        self
    }

    /// Set or clear the profile image name.
    pub fn image_path(mut self, path: Option<String>) -> Self {
        self.image_path = Some(path);
        self
    }

    /// Check if any fields are set.
    pub fn is_empty(&self) -> bool {
        self.password_hash.is_none() && self.email.is_none() && self.image_path.is_none()
    }
}
