//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Store contract for links.
///
/// Code uniqueness is the store's job: `insert` must fail atomically with
/// [`AppError::CodeConflict`] when the code is taken, so callers never need a
/// separate existence check.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryLinkRepository`] - in-process map
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link with `clicks = 0`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::CodeConflict`] if the code already exists.
    /// Returns [`AppError::StoreUnavailable`] on database errors.
    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by its exact short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on database errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Lists every link, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on database errors.
    async fn list_recent(&self) -> Result<Vec<Link>, AppError>;

    /// Atomically adds one to the click counter and bumps `updated_at`.
    ///
    /// Returns the updated link, or `Ok(None)` without touching the store
    /// when the code does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on database errors.
    async fn increment_clicks(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Deletes a link by code and returns the removed record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on database errors.
    async fn delete(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Verifies the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] if the store cannot be queried.
    async fn ping(&self) -> Result<(), AppError>;
}
