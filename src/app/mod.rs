//! Application wiring.
//!
//! Builds the database, file storage, session store and services from a
//! [`Config`] and hands them out as shared handles.

use std::num::NonZeroUsize;
use std::sync::Arc;

use tracing::info;

use crate::auth::{AccountService, SessionStore};
use crate::board::{BoardContentService, BoardRepository};
use crate::config::Config;
use crate::db::{Database, UserRepository, UserRepositoryTrait};
use crate::file::{FileStore, LocalFileStorage, ProfileMediaManager};
use crate::{CorkboardError, Result};

/// Main application holding every shared service.
#[derive(Clone)]
pub struct Application {
    /// Database connection.
    db: Database,
    /// Application configuration.
    config: Arc<Config>,
    /// Active sessions.
    sessions: SessionStore,
    accounts: AccountService,
    boards: BoardContentService,
    profile_images: ProfileMediaManager,
}

impl Application {
    /// Open the database and storage named in `config` and build the services.
    pub async fn open(config: Config) -> Result<Self> {
        config.validate()?;

        let db = Database::open(&config.database.path).await?;
        let storage: Arc<dyn FileStore> =
            Arc::new(LocalFileStorage::new(&config.files.storage_path)?);

        let app = Self::with_parts(db, storage, config)?;
        info!(
            database = %app.config.database.path,
            storage = %app.config.files.storage_path,
            page_size = app.config.board.page_size,
            "Application ready"
        );
        Ok(app)
    }

    /// Build the services over an already opened database and storage.
    pub fn with_parts(db: Database, storage: Arc<dyn FileStore>, config: Config) -> Result<Self> {
        let page_size = NonZeroUsize::new(config.board.page_size).ok_or_else(|| {
            CorkboardError::Config("board.page_size must be greater than zero".to_string())
        })?;

        let sessions = SessionStore::new();
        let users: Arc<dyn UserRepositoryTrait> = Arc::new(UserRepository::new(db.pool().clone()));
        let board_repo = Arc::new(BoardRepository::new(db.pool().clone()));

        let accounts = AccountService::new(users.clone(), sessions.clone());
        let boards = BoardContentService::new(board_repo, users.clone(), page_size);
        let profile_images = ProfileMediaManager::new(
            users,
            storage,
            sessions.clone(),
            config.files.max_image_size_bytes(),
        );

        Ok(Self {
            db,
            config: Arc::new(config),
            sessions,
            accounts,
            boards,
            profile_images,
        })
    }

    /// Get the database.
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Get the configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Get the session store.
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Get the account service.
    pub fn accounts(&self) -> &AccountService {
        &self.accounts
    }

    /// Get the board service.
    pub fn boards(&self) -> &BoardContentService {
        &self.boards
    }

    /// Get the profile image manager.
    pub fn profile_images(&self) -> &ProfileMediaManager {
        &self.profile_images
    }
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
