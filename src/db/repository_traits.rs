//! Repository trait definitions for corkboard.
//!
//! Services depend on these traits rather than on the SQLite repositories, so
//! a different backend (or a test double) can be injected as
//! `Arc<dyn UserRepositoryTrait>` / `Arc<dyn BoardRepositoryTrait>`.
//!
//! Implementations must make each single-record write atomic.

use async_trait::async_trait;

use crate::board::{Board, BoardUpdate, NewBoard};
use crate::db::{NewUser, User, UserUpdate};
use crate::Result;

/// Trait for user repository operations.
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    /// Create a new user.
    ///
    /// A username that collides with an existing one (case-insensitive) is a
    /// `Validation` error.
    async fn create(&self, new_user: &NewUser) -> Result<User>;

    /// Get a user by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;

    /// Get a user by username (case-insensitive).
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Update a user, returning the persisted record, or `None` if not found.
    async fn update(&self, id: i64, update: &UserUpdate) -> Result<Option<User>>;

    /// Set the profile image path to `new` only if it still equals `expected`.
    ///
    /// Returns false when the user is missing or the stored path differs.
    async fn swap_image_path(
        &self,
        id: i64,
        expected: Option<&str>,
        new: Option<&str>,
    ) -> Result<bool>;

    /// Check if a username is already taken (case-insensitive).
    async fn username_exists(&self, username: &str) -> Result<bool>;
}

/// Trait for board repository operations.
#[async_trait]
pub trait BoardRepositoryTrait: Send + Sync {
    /// Create a new board.
    async fn create(&self, new_board: &NewBoard) -> Result<Board>;

    /// Get a board by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<Board>>;

    /// Fetch one page of boards, newest first, with the total board count.
    async fn find_page_recent_first(&self, offset: i64, limit: i64) -> Result<(Vec<Board>, i64)>;

    /// Update title/body, returning the persisted record, or `None` if not found.
    async fn update(&self, id: i64, update: &BoardUpdate) -> Result<Option<Board>>;

    /// Delete a board by ID. Returns false if it did not exist.
    async fn delete(&self, id: i64) -> Result<bool>;
}
