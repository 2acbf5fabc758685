//! Subscription Service Library
//!
//! Subscription records with validation, storage and prorated cost totals.
//! The HTTP binary is in `src/main.rs`.

pub mod api;
pub mod config;
/// Subscription records, month-year values and filters
pub mod domain;
pub mod error;
pub mod service;
pub mod storage;
