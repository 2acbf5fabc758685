//! Subscription use cases
//!
//! Every use case validates its input first and only then touches storage.

use crate::domain::{
    RawListFilter, RawTotalFilter, Subscription, SubscriptionInput, ValidationError,
};
use crate::service::validation;
use crate::storage::{RepositoryError, SubscriptionRepository};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Errors returned by [`SubscriptionService`]
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Client input was rejected
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No subscription with the requested id
    #[error("subscription not found")]
    NotFound,

    /// Storage failed; details are for logs only
    #[error("storage failure: {0}")]
    Storage(RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            other => ServiceError::Storage(other),
        }
    }
}

/// Subscription use cases over an injected storage port
#[derive(Clone)]
pub struct SubscriptionService {
    repo: Arc<dyn SubscriptionRepository>,
}

impl SubscriptionService {
    /// Create a service backed by `repo`
    pub fn new(repo: Arc<dyn SubscriptionRepository>) -> Self {
        Self { repo }
    }

    /// Validate and store a new subscription
    pub async fn create(&self, input: &SubscriptionInput) -> Result<Uuid, ServiceError> {
        let normalized = validation::validate_create_or_update(input)?;
        let id = self.repo.create(&normalized).await?;
        debug!(subscription_id = %id, user_id = %normalized.user_id, "Subscription created");
        Ok(id)
    }

    /// Fetch one subscription by its textual id
    pub async fn get_by_id(&self, id: &str) -> Result<Subscription, ServiceError> {
        let id = validation::validate_id(id)?;
        Ok(self.repo.get_by_id(id).await?)
    }

    /// List subscriptions, newest first
    pub async fn list(&self, filter: &RawListFilter) -> Result<Vec<Subscription>, ServiceError> {
        let filter = validation::validate_list_filter(filter)?;
        Ok(self.repo.list(&filter).await?)
    }

    /// Replace every mutable field of an existing subscription
    ///
    /// The id is checked before the payload.
    pub async fn update(&self, id: &str, input: &SubscriptionInput) -> Result<(), ServiceError> {
        let id = validation::validate_id(id)?;
        let normalized = validation::validate_create_or_update(input)?;
        self.repo.update(id, &normalized).await?;
        debug!(subscription_id = %id, "Subscription updated");
        Ok(())
    }

    /// Remove a subscription
    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let id = validation::validate_id(id)?;
        self.repo.delete(id).await?;
        debug!(subscription_id = %id, "Subscription deleted");
        Ok(())
    }

    /// Prorated cost of matching subscriptions over a month range
    pub async fn total(&self, filter: &RawTotalFilter) -> Result<i64, ServiceError> {
        let filter = validation::validate_total_filter(filter)?;
        let total = self.repo.total(&filter).await?;
        debug!(
            from = %filter.period.from,
            to = %filter.period.to,
            total,
            "Subscription total calculated"
        );
        Ok(total)
    }

    /// Check that storage is reachable
    pub async fn ping(&self) -> Result<(), ServiceError> {
        Ok(self.repo.ping().await?)
    }
}
