//! In-memory subscription storage
//!
//! Keeps subscriptions in creation order and computes totals in-process with
//! the same calculator the SQL query mirrors. Useful for tests and for running
//! the service without a database file.

use super::{RepositoryError, SubscriptionRepository};
use crate::domain::{ListFilter, Subscription, TotalFilter};
use crate::service::calculator;
use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Subscription store backed by a `Vec` in creation order
#[derive(Default)]
pub struct InMemorySubscriptionRepository {
    subscriptions: RwLock<Vec<Subscription>>,
}

impl InMemorySubscriptionRepository {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn create(&self, sub: &Subscription) -> Result<Uuid, RepositoryError> {
        let id = Uuid::new_v4();
        self.subscriptions
            .write()
            .await
            .push(sub.clone().with_id(id));
        Ok(id)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Subscription, RepositoryError> {
        self.subscriptions
            .read()
            .await
            .iter()
            .find(|sub| sub.id == Some(id))
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn list(&self, filter: &ListFilter) -> Result<Vec<Subscription>, RepositoryError> {
        Ok(self
            .subscriptions
            .read()
            .await
            .iter()
            .rev()
            .filter(|sub| filter.matches(sub))
            .cloned()
            .collect())
    }

    async fn update(&self, id: Uuid, sub: &Subscription) -> Result<(), RepositoryError> {
        let mut subscriptions = self.subscriptions.write().await;
        let slot = subscriptions
            .iter_mut()
            .find(|existing| existing.id == Some(id))
            .ok_or(RepositoryError::NotFound)?;
        *slot = sub.clone().with_id(id);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let mut subscriptions = self.subscriptions.write().await;
        let position = subscriptions
            .iter()
            .position(|sub| sub.id == Some(id))
            .ok_or(RepositoryError::NotFound)?;
        subscriptions.remove(position);
        Ok(())
    }

    async fn total(&self, filter: &TotalFilter) -> Result<i64, RepositoryError> {
        let subscriptions = self.subscriptions.read().await;
        calculator::prorated_total(subscriptions.iter(), filter).ok_or_else(|| {
            RepositoryError::Internal(anyhow::anyhow!("subscription total overflowed i64"))
        })
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
