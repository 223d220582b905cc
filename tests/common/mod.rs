//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::path::Path;

use tempfile::TempDir;

use corkboard::db::IN_MEMORY_PATH;
use corkboard::{Application, Config, RegistrationRequest, SessionId, User};

/// Default test password.
pub const PASSWORD: &str = "password123";

/// Minimal PNG-looking payload.
pub const PNG: &[u8] = b"\x89PNG\r\n\x1a\ntest";

/// An application over an in-memory database and a temporary image directory.
pub struct TestApp {
    pub app: Application,
    pub temp_dir: TempDir,
}

impl TestApp {
    /// Image storage directory.
    pub fn storage_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Register a user and log them in on a fresh session.
    pub async fn login_new_user(&self, username: &str) -> (User, SessionId) {
        let user = self
            .app
            .accounts()
            .register(RegistrationRequest::new(username, PASSWORD))
            .await
            .unwrap();
        let session = self.app.sessions().open().await;
        self.app
            .accounts()
            .login(&session, username, PASSWORD)
            .await
            .unwrap();
        (user, session)
    }

    /// Open another session for an existing user.
    pub async fn login_again(&self, username: &str) -> SessionId {
        let session = self.app.sessions().open().await;
        self.app
            .accounts()
            .login(&session, username, PASSWORD)
            .await
            .unwrap();
        session
    }

    /// Number of files in the image store.
    pub fn stored_file_count(&self) -> usize {
        std::fs::read_dir(self.storage_dir())
            .unwrap()
            .flatten()
            .filter(|e| e.path().is_dir())
            .map(|shard| std::fs::read_dir(shard.path()).unwrap().count())
            .sum()
    }
}

/// Build a test application with the given listing page size.
pub async fn setup_app_with_page_size(page_size: usize) -> TestApp {
    let temp_dir = TempDir::new().unwrap();

    let mut config = Config::default();
    config.database.path = IN_MEMORY_PATH.to_string();
    config.files.storage_path = temp_dir.path().display().to_string();
    config.files.max_image_size_mb = 1;
    config.board.page_size = page_size;

    let app = Application::open(config).await.unwrap();
    TestApp { app, temp_dir }
}

/// Build a test application with default settings.
pub async fn setup_app() -> TestApp {
    setup_app_with_page_size(3).await
}
