//! Profile image management for corkboard.
//!
//! Keeps the stored image file and the user's `image_path` field consistent.
//! Ordering on upload is: write the new file, persist the new path, then
//! remove the old file. A user therefore never points at a missing file, and
//! at worst an old file is left behind when its removal fails.
//!
//! The path update is a compare-and-set against the value last read, so
//! concurrent uploads from different sessions of one user each remove exactly
//! the file they displaced.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::storage::FileStore;
use crate::auth::{SessionGuard, SessionId, SessionStore};
use crate::db::{User, UserRepositoryTrait};
use crate::{CorkboardError, Result};

const MAX_SWAP_ATTEMPTS: u32 = 8;

/// An uploaded profile image.
#[derive(Debug, Clone)]
pub struct ProfileImageUpload {
    /// Client-side filename; only its extension is kept.
    pub filename: String,
    /// Declared content type.
    pub content_type: String,
    /// File content.
    pub bytes: Vec<u8>,
}

impl ProfileImageUpload {
    /// Create a new upload.
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }
}

/// Manager for the logged-in user's profile image.
#[derive(Clone)]
pub struct ProfileMediaManager {
    users: Arc<dyn UserRepositoryTrait>,
    storage: Arc<dyn FileStore>,
    sessions: SessionStore,
    max_size: u64,
}

impl ProfileMediaManager {
    /// Create a new ProfileMediaManager.
    pub fn new(
        users: Arc<dyn UserRepositoryTrait>,
        storage: Arc<dyn FileStore>,
        sessions: SessionStore,
        max_size: u64,
    ) -> Self {
        Self {
            users,
            storage,
            sessions,
            max_size,
        }
    }

    /// Maximum accepted upload size in bytes.
    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    /// Replace the logged-in user's profile image.
    pub async fn upload(&self, session: &SessionId, upload: ProfileImageUpload) -> Result<User> {
        self.validate(&upload)?;

        let mut guard = self.sessions.lock(session).await?;
        let current = self.load_current(&guard).await?;

        let stored = self.storage.write_file(&upload.bytes, &upload.filename)?;

        let replaced = match self
            .swap_path(current.id, current.image_path, Some(stored.as_str()))
            .await
        {
            Ok(replaced) => replaced,
            Err(e) => {
                self.remove_best_effort(&stored, current.id);
                return Err(e);
            }
        };

        if let Some(old) = replaced.as_deref() {
            if old != stored {
                self.remove_best_effort(old, current.id);
            }
        }

        let updated = self.load_user(current.id).await?;
        guard.replace(updated.clone());
        info!(user_id = updated.id, image = %stored, "Profile image uploaded");
        Ok(updated)
    }

    /// Remove the logged-in user's profile image. No image is a no-op.
    pub async fn delete(&self, session: &SessionId) -> Result<User> {
        let mut guard = self.sessions.lock(session).await?;
        let current = self.load_current(&guard).await?;

        if current.image_path.is_none() {
            return Ok(current);
        }

        let replaced = self
            .swap_path(current.id, current.image_path, None)
            .await?;
        if let Some(old) = replaced.as_deref() {
            self.remove_best_effort(old, current.id);
        }

        let updated = self.load_user(current.id).await?;
        guard.replace(updated.clone());
        info!(user_id = updated.id, "Profile image removed");
        Ok(updated)
    }

    /// On-disk location of a user's profile image, if one is set.
    pub async fn image_path_for(&self, user_id: i64) -> Result<Option<PathBuf>> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| CorkboardError::not_found("user", user_id))?;

        user.image_path
            .as_deref()
            .map(|name| self.storage.resolve(name))
            .transpose()
    }

    fn validate(&self, upload: &ProfileImageUpload) -> Result<()> {
        if upload.bytes.is_empty() {
            return Err(CorkboardError::Validation("image file is empty".to_string()));
        }
        if upload.bytes.len() as u64 > self.max_size {
            return Err(CorkboardError::Validation(format!(
                "image must be at most {} bytes",
                self.max_size
            )));
        }

        let declared = upload.content_type.trim().to_ascii_lowercase();
        if !declared.starts_with("image/") {
            return Err(CorkboardError::Validation(format!(
                "unsupported content type: {}",
                upload.content_type
            )));
        }

        let guessed = mime_guess::from_path(&upload.filename).first();
        match guessed {
            Some(mime) if mime.type_().as_str() == "image" => Ok(()),
            _ => Err(CorkboardError::Validation(format!(
                "not an image file: {}",
                upload.filename
            ))),
        }
    }

    /// Fresh persisted record for the session's user.
    async fn load_current(&self, guard: &SessionGuard) -> Result<User> {
        self.load_user(guard.user()?.id).await
    }

    async fn load_user(&self, user_id: i64) -> Result<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| CorkboardError::not_found("user", user_id))
    }

    /// Compare-and-set the image path, re-reading after a lost race.
    ///
    /// Other sessions of the same user may change the path concurrently.
    /// Returns the path that was actually replaced.
    async fn swap_path(
        &self,
        user_id: i64,
        mut expected: Option<String>,
        new: Option<&str>,
    ) -> Result<Option<String>> {
        for attempt in 1..=MAX_SWAP_ATTEMPTS {
            if self
                .users
                .swap_image_path(user_id, expected.as_deref(), new)
                .await?
            {
                return Ok(expected);
            }
            debug!(user_id, attempt, "Image path changed concurrently, retrying");
            expected = self.load_user(user_id).await?.image_path;
        }

        warn!(user_id, "Gave up updating image path after repeated conflicts");
        Err(CorkboardError::Persistence(format!(
            "image path for user {user_id} kept changing"
        )))
    }

    fn remove_best_effort(&self, stored_name: &str, user_id: i64) {
        if let Err(e) = self.storage.delete_file(stored_name) {
            warn!(user_id, image = %stored_name, error = %e, "Failed to remove image file");
        }
    }
}

impl std::fmt::Debug for ProfileMediaManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileMediaManager")
            .field("max_size", &self.max_size)
            .finish_non_exhaustive()
    }
}
