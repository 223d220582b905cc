//! Board model for corkboard.

use serde::Serialize;

use crate::auth::Owned;

/// Board entity: a post authored by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Board {
    /// Unique board ID.
    pub id: i64,
    /// Board title.
    pub title: String,
    /// Board body.
    pub body: String,
    /// ID of the owning user, fixed at creation.
    pub owner_id: i64,
    /// Creation timestamp.
    pub created_at: String,
}

impl Board {
    /// Check whether the given user owns this board.
    pub fn is_owner(&self, user_id: i64) -> bool {
        self.owner_id == user_id
    }
}

impl Owned for Board {
    const KIND: &'static str = "board";

    fn resource_id(&self) -> i64 {
        self.id
    }

    fn owner_id(&self) -> i64 {
        self.owner_id
    }
}

/// Data for creating a new board.
#[derive(Debug, Clone)]
pub struct NewBoard {
    /// ID of the owning user.
    pub owner_id: i64,
    /// Board title.
    pub title: String,
    /// Board body.
    pub body: String,
}

impl NewBoard {
    /// Create a new board with required fields.
    pub fn new(owner_id: i64, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            owner_id,
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Data for updating an existing board.
///
/// Ownership is never reassigned, so there is no owner field.
#[derive(Debug, Clone)]
pub struct BoardUpdate {
    /// New title.
    pub title: String,
    /// New body.
    pub body: String,
}

impl BoardUpdate {
    /// Create an update replacing title and body.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// A board prepared for display.
#[derive(Debug, Clone, Serialize)]
pub struct BoardDetail {
    /// The board itself.
    pub board: Board,
    /// Handle of the owning user.
    pub author: String,
    /// Whether the viewer owns the board (gates edit/delete affordances).
    pub is_owner: bool,
}
