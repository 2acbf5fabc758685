//! Subscription business logic
//!
//! Validation, prorated total calculation and the use cases that tie them to
//! storage.

pub mod calculator;
pub mod subscriptions;
pub mod validation;

pub use subscriptions::{ServiceError, SubscriptionService};
