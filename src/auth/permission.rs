//! Ownership checks for corkboard.
//!
//! Every mutation of owned content, and every view that exposes an owner-only
//! affordance, goes through [`authorize_owner`]. The check is a pure
//! comparison; loading the resource is the caller's job.

use thiserror::Error;
use tracing::warn;

use super::session::Principal;
use crate::db::User;

/// Authorization-related errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationError {
    /// Caller does not own the target resource.
    #[error("user {caller_id} does not own {kind} {resource_id}")]
    NotOwner {
        /// Kind of resource (e.g. "board").
        kind: &'static str,
        /// ID of the resource.
        resource_id: i64,
        /// ID of the rejected caller.
        caller_id: i64,
    },

    /// The operation requires a logged-in user.
    #[error("authentication required")]
    NotAuthenticated,

    /// Username or password did not match.
    #[error("invalid credentials")]
    InvalidCredentials,
}

/// A resource with exactly one owning user.
pub trait Owned {
    /// Resource kind used in audit messages.
    const KIND: &'static str;

    /// ID of the resource itself.
    fn resource_id(&self) -> i64;

    /// ID of the owning user.
    fn owner_id(&self) -> i64;
}

/// Allow the call only if `caller_id` owns `resource`.
///
/// # Examples
///
/// ```
/// use corkboard::auth::{authorize_owner, AuthorizationError};
/// use corkboard::board::Board;
///
/// let board = Board {
///     id: 1,
///     title: "t".into(),
///     body: "b".into(),
///     owner_id: 7,
///     created_at: String::new(),
/// };
/// assert!(authorize_owner(&board, 7).is_ok());
/// assert!(matches!(
///     authorize_owner(&board, 8),
///     Err(AuthorizationError::NotOwner { resource_id: 1, caller_id: 8, .. })
/// ));
/// ```
pub fn authorize_owner<R: Owned>(resource: &R, caller_id: i64) -> Result<(), AuthorizationError> {
    if resource.owner_id() == caller_id {
        return Ok(());
    }

    warn!(
        kind = R::KIND,
        resource_id = resource.resource_id(),
        owner_id = resource.owner_id(),
        caller_id,
        "Ownership check denied"
    );
    Err(AuthorizationError::NotOwner {
        kind: R::KIND,
        resource_id: resource.resource_id(),
        caller_id,
    })
}

/// Require an authenticated principal, returning its user snapshot.
pub fn require_authenticated(principal: &Principal) -> Result<&User, AuthorizationError> {
    principal.user().ok_or(AuthorizationError::NotAuthenticated)
}
