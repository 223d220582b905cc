//! File management for corkboard.
//!
//! - UUID-named file storage sharded by name prefix
//! - Profile image upload and removal kept in step with the user record

mod profile_image;
mod storage;

pub use profile_image::{ProfileImageUpload, ProfileMediaManager};
pub use storage::{FileStore, LocalFileStorage};
