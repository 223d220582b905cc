//! Board repository for corkboard.
//!
//! SQLite implementation of [`BoardRepositoryTrait`]. Listings are ordered
//! newest first by id, which is monotonic with creation order.

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::types::{Board, BoardUpdate, NewBoard};
use crate::db::BoardRepositoryTrait;
use crate::{CorkboardError, Result};

/// Repository for board CRUD operations.
#[derive(Debug, Clone)]
pub struct BoardRepository {
    pool: SqlitePool,
}

impl BoardRepository {
    /// Create a new BoardRepository over the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BoardRepositoryTrait for BoardRepository {
    async fn create(&self, new_board: &NewBoard) -> Result<Board> {
        let result = sqlx::query("INSERT INTO boards (title, body, owner_id) VALUES (?, ?, ?)")
            .bind(&new_board.title)
            .bind(&new_board.body)
            .bind(new_board.owner_id)
            .execute(&self.pool)
            .await?;

        let id = result.last_insert_rowid();
        self.find_by_id(id)
            .await?
            .ok_or_else(|| CorkboardError::not_found("board", id))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Board>> {
        let board = sqlx::query_as::<_, Board>(
            "SELECT id, title, body, owner_id, created_at FROM boards WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(board)
    }

    async fn find_page_recent_first(&self, offset: i64, limit: i64) -> Result<(Vec<Board>, i64)> {
        // Count and page inside one read transaction so both see the same snapshot.
        let mut tx = self.pool.begin().await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM boards")
            .fetch_one(&mut *tx)
            .await?;

        let items = sqlx::query_as::<_, Board>(
            "SELECT id, title, body, owner_id, created_at FROM boards
             ORDER BY id DESC LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((items, total))
    }

    async fn update(&self, id: i64, update: &BoardUpdate) -> Result<Option<Board>> {
        let affected = sqlx::query("UPDATE boards SET title = ?, body = ? WHERE id = ?")
            .bind(&update.title)
            .bind(&update.body)
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if affected == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let affected = sqlx::query("DELETE FROM boards WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Database, NewUser, UserRepository, UserRepositoryTrait};

    async fn setup() -> (BoardRepository, i64) {
        let db = Database::open_in_memory().await.unwrap();
        let users = UserRepository::new(db.pool().clone());
        let owner = users.create(&NewUser::new("alice", "hash")).await.unwrap();
        (BoardRepository::new(db.pool().clone()), owner.id)
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let (repo, owner_id) = setup().await;
        let board = repo
            .create(&NewBoard::new(owner_id, "Title", "Body"))
            .await
            .unwrap();

        assert_eq!(board.title, "Title");
        assert_eq!(board.body, "Body");
        assert_eq!(board.owner_id, owner_id);

        let found = repo.find_by_id(board.id).await.unwrap().unwrap();
        assert_eq!(found, board);
    }

    #[tokio::test]
    async fn test_create_with_unknown_owner_fails() {
        let (repo, _) = setup().await;
        let result = repo.create(&NewBoard::new(999, "Title", "Body")).await;
        assert!(matches!(result, Err(CorkboardError::Persistence(_))));
    }

    #[tokio::test]
    async fn test_page_is_newest_first() {
        let (repo, owner_id) = setup().await;
        for i in 1..=5 {
            repo.create(&NewBoard::new(owner_id, format!("Board {i}"), "Body"))
                .await
                .unwrap();
        }

        let (first, total) = repo.find_page_recent_first(0, 2).await.unwrap();
        assert_eq!(total, 5);
        let titles: Vec<_> = first.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Board 5", "Board 4"]);

        let (last, _) = repo.find_page_recent_first(4, 2).await.unwrap();
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].title, "Board 1");
    }

    #[tokio::test]
    async fn test_update_keeps_owner_and_created_at() {
        let (repo, owner_id) = setup().await;
        let board = repo
            .create(&NewBoard::new(owner_id, "Old", "Old body"))
            .await
            .unwrap();

        let updated = repo
            .update(board.id, &BoardUpdate::new("New", "New body"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "New");
        assert_eq!(updated.body, "New body");
        assert_eq!(updated.owner_id, board.owner_id);
        assert_eq!(updated.created_at, board.created_at);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing() {
        let (repo, _) = setup().await;
        assert!(repo
            .update(7, &BoardUpdate::new("t", "b"))
            .await
            .unwrap()
            .is_none());
        assert!(!repo.delete(7).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_updates_total() {
        let (repo, owner_id) = setup().await;
        let board = repo
            .create(&NewBoard::new(owner_id, "Title", "Body"))
            .await
            .unwrap();
        assert_eq!(repo.find_page_recent_first(0, 10).await.unwrap().1, 1);

        assert!(repo.delete(board.id).await.unwrap());
        assert_eq!(repo.find_page_recent_first(0, 10).await.unwrap().1, 0);
        assert!(repo.find_by_id(board.id).await.unwrap().is_none());
    }
}
