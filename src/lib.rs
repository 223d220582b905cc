//! corkboard - a multi-user board platform core.
//!
//! Users register, log in, post boards they alone may edit, and keep a
//! profile image. Sessions cache a snapshot of the logged-in user that is
//! refreshed after every change to that user.

pub mod app;
pub mod auth;
pub mod board;
pub mod config;
pub mod db;
pub mod error;
pub mod file;
pub mod logging;

pub use app::Application;
pub use auth::{
    authorize_owner, hash_password, verify_password, AccountService, AccountUpdateRequest,
    AuthorizationError, Principal, RegistrationRequest, SessionError, SessionId, SessionStore,
};
pub use board::{Board, BoardContentService, BoardDetail, BoardPage, PageLink, PagePlan};
pub use config::Config;
pub use db::{Database, User};
pub use error::{CorkboardError, Result};
pub use file::{FileStore, LocalFileStorage, ProfileImageUpload, ProfileMediaManager};
