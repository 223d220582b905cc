//! Authentication and authorization for corkboard.
//!
//! This module provides password hashing, the session store, ownership
//! checks and account operations.

mod account;
mod password;
mod permission;
mod session;
pub mod validation;

pub use account::{AccountService, AccountUpdateRequest, RegistrationRequest};
pub use password::{hash_password, verify_password, PasswordError};
pub use permission::{authorize_owner, require_authenticated, AuthorizationError, Owned};
pub use session::{Principal, SessionError, SessionGuard, SessionId, SessionStore};
pub use validation::ValidationError;
