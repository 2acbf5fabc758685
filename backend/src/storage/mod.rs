//! Subscription storage
//!
//! The service depends only on the [`SubscriptionRepository`] port. Two
//! adapters implement it: SQLite, which computes totals in SQL, and an
//! in-memory store that computes them in-process.

pub mod memory;
pub mod sqlite;

use crate::domain::{ListFilter, Subscription, TotalFilter};
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

pub use memory::InMemorySubscriptionRepository;
pub use sqlite::SqliteSubscriptionRepository;

/// Errors raised by storage adapters
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// No subscription with the requested id
    #[error("subscription not found")]
    NotFound,

    /// Database driver failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row no longer satisfies the domain invariants
    #[error("Corrupt subscription row: {0}")]
    CorruptRow(String),

    /// Any other storage failure
    #[error("Storage error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Storage port consumed by the subscription service
///
/// Implementations receive already-validated values only.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Persist a new subscription and return its freshly assigned id
    async fn create(&self, sub: &Subscription) -> Result<Uuid, RepositoryError>;

    /// Fetch one subscription
    async fn get_by_id(&self, id: Uuid) -> Result<Subscription, RepositoryError>;

    /// Subscriptions matching `filter`, most recently created first
    async fn list(&self, filter: &ListFilter) -> Result<Vec<Subscription>, RepositoryError>;

    /// Replace every mutable field of the subscription with id `id`
    async fn update(&self, id: Uuid, sub: &Subscription) -> Result<(), RepositoryError>;

    /// Remove one subscription
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;

    /// Prorated cost of the subscriptions matching `filter`
    async fn total(&self, filter: &TotalFilter) -> Result<i64, RepositoryError>;

    /// Check that the backend is reachable
    async fn ping(&self) -> Result<(), RepositoryError>;
}
