//! Board service for corkboard.
//!
//! High-level board operations with ownership checks and paginated listings.
//! Every write path runs [`BoardContentService::check_owner_or_deny`] before
//! touching the record.

use std::num::NonZeroUsize;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::auth::authorize_owner;
use crate::db::{BoardRepositoryTrait, UserRepositoryTrait};
use crate::{CorkboardError, Result};

use super::pagination::PagePlan;
use super::types::{Board, BoardDetail, BoardUpdate, NewBoard};

/// Maximum length for board titles (in characters).
pub const MAX_TITLE_LENGTH: usize = 100;

/// Maximum length for board bodies (in characters).
pub const MAX_BODY_LENGTH: usize = 10_000;

/// Validate a title string.
fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(CorkboardError::Validation("title is required".to_string()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(CorkboardError::Validation(format!(
            "title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a board body string.
fn validate_body(body: &str) -> Result<()> {
    if body.trim().is_empty() {
        return Err(CorkboardError::Validation("body is required".to_string()));
    }
    if body.chars().count() > MAX_BODY_LENGTH {
        return Err(CorkboardError::Validation(format!(
            "body must be at most {MAX_BODY_LENGTH} characters"
        )));
    }
    Ok(())
}

/// One page of the board listing.
#[derive(Debug, Clone, Serialize)]
pub struct BoardPage {
    /// Boards on the resolved page, newest first.
    pub items: Vec<Board>,
    /// Navigation for the listing.
    pub plan: PagePlan,
}

/// Service for board content.
#[derive(Clone)]
pub struct BoardContentService {
    boards: Arc<dyn BoardRepositoryTrait>,
    users: Arc<dyn UserRepositoryTrait>,
    default_page_size: NonZeroUsize,
}

impl BoardContentService {
    /// Create a new BoardContentService.
    pub fn new(
        boards: Arc<dyn BoardRepositoryTrait>,
        users: Arc<dyn UserRepositoryTrait>,
        default_page_size: NonZeroUsize,
    ) -> Self {
        Self {
            boards,
            users,
            default_page_size,
        }
    }

    /// Configured page size for [`Self::list_default_page`].
    pub fn default_page_size(&self) -> NonZeroUsize {
        self.default_page_size
    }

    /// Create a board owned by `author_id`.
    pub async fn create(&self, author_id: i64, title: &str, body: &str) -> Result<Board> {
        validate_title(title)?;
        validate_body(body)?;

        if self.users.find_by_id(author_id).await?.is_none() {
            return Err(CorkboardError::not_found("user", author_id));
        }

        let board = self
            .boards
            .create(&NewBoard::new(author_id, title, body))
            .await?;
        info!(board_id = board.id, owner_id = author_id, "Board created");
        Ok(board)
    }

    /// Get a board by ID.
    pub async fn get(&self, id: i64) -> Result<Board> {
        self.boards
            .find_by_id(id)
            .await?
            .ok_or_else(|| CorkboardError::not_found("board", id))
    }

    /// Get a board with its author's handle and the viewer's ownership flag.
    pub async fn get_detail(&self, id: i64, viewer: Option<i64>) -> Result<BoardDetail> {
        let board = self.get(id).await?;

        let author = self
            .users
            .find_by_id(board.owner_id)
            .await?
            .map(|u| u.username)
            .ok_or_else(|| CorkboardError::not_found("user", board.owner_id))?;

        let is_owner = match viewer {
            Some(viewer_id) => board.is_owner(viewer_id),
            None => false,
        };

        Ok(BoardDetail {
            board,
            author,
            is_owner,
        })
    }

    /// List one page of boards, newest first.
    ///
    /// Out-of-range page indexes are clamped to the last page.
    pub async fn list_page(&self, page_index: usize, page_size: usize) -> Result<BoardPage> {
        let page_size = NonZeroUsize::new(page_size).ok_or_else(|| {
            CorkboardError::Validation("page size must be at least 1".to_string())
        })?;

        let requested_offset = page_index.saturating_mul(page_size.get());
        let (mut items, total) = self
            .boards
            .find_page_recent_first(to_i64(requested_offset), to_i64(page_size.get()))
            .await?;

        let total = usize::try_from(total).unwrap_or(0);
        let plan = PagePlan::new(total, page_size, page_index);

        if plan.was_clamped(page_index) {
            debug!(
                requested = page_index,
                resolved = plan.current_index,
                "Page index clamped"
            );
            let (resolved, _) = self
                .boards
                .find_page_recent_first(to_i64(plan.offset()), to_i64(plan.limit()))
                .await?;
            items = resolved;
        }

        Ok(BoardPage { items, plan })
    }

    /// List one page using the configured page size.
    pub async fn list_default_page(&self, page_index: usize) -> Result<BoardPage> {
        self.list_page(page_index, self.default_page_size.get())
            .await
    }

    /// Load a board and require `caller_id` to own it.
    ///
    /// Shared by the edit form and the write paths.
    pub async fn check_owner_or_deny(&self, id: i64, caller_id: i64) -> Result<Board> {
        let board = self.get(id).await?;
        authorize_owner(&board, caller_id)?;
        Ok(board)
    }

    /// Replace a board's title and body.
    pub async fn update(&self, id: i64, caller_id: i64, title: &str, body: &str) -> Result<Board> {
        self.check_owner_or_deny(id, caller_id).await?;
        validate_title(title)?;
        validate_body(body)?;

        let board = self
            .boards
            .update(id, &BoardUpdate::new(title, body))
            .await?
            .ok_or_else(|| CorkboardError::not_found("board", id))?;
        info!(board_id = id, caller_id, "Board updated");
        Ok(board)
    }

    /// Delete a board.
    pub async fn delete(&self, id: i64, caller_id: i64) -> Result<()> {
        self.check_owner_or_deny(id, caller_id).await?;

        if !self.boards.delete(id).await? {
            return Err(CorkboardError::not_found("board", id));
        }
        info!(board_id = id, caller_id, "Board deleted");
        Ok(())
    }
}

impl std::fmt::Debug for BoardContentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardContentService")
            .field("default_page_size", &self.default_page_size)
            .finish_non_exhaustive()
    }
}

fn to_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
