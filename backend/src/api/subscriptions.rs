//! Subscription API handlers
//!
//! Contains HTTP request handlers for subscription CRUD operations and the
//! total-cost query.

use crate::domain::{RawListFilter, RawTotalFilter, Subscription, SubscriptionInput};
use crate::error::AppError;
use crate::service::{ServiceError, SubscriptionService};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

/// Shared handler state
pub type ServiceState = Arc<SubscriptionService>;

/// Response carrying a newly created id
#[derive(Debug, Serialize, Deserialize)]
pub struct IdResponse {
    /// Identifier assigned by storage
    pub id: Uuid,
}

/// Plain status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Human-readable status
    pub status: String,
}

/// Total cost response
#[derive(Debug, Serialize, Deserialize)]
pub struct TotalResponse {
    /// Sum in minor currency units
    pub total: i64,
}

/// Convert a service error, logging storage failures with the operation name
fn service_error(operation: &'static str) -> impl FnOnce(ServiceError) -> AppError {
    move |err| {
        if let ServiceError::Storage(source) = &err {
            error!(operation, error = %source, "Operation failed");
        }
        AppError::from(err)
    }
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|_| AppError::InvalidJson)
}

/// Decoded query pairs in request order
type QueryPairs = Vec<(String, String)>;

fn query_pairs(
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<QueryPairs, AppError> {
    query
        .map(|Query(pairs)| pairs)
        .map_err(|_| AppError::InvalidQuery)
}

/// POST /api/v1/subscriptions - Create a subscription
pub async fn create_subscription(
    State(service): State<ServiceState>,
    payload: Result<Json<SubscriptionInput>, JsonRejection>,
) -> Result<(StatusCode, Json<IdResponse>), AppError> {
    let input = json_body(payload)?;
    let id = service
        .create(&input)
        .await
        .map_err(service_error("create subscription"))?;

    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

/// GET /api/v1/subscriptions/:id - Get a specific subscription
pub async fn get_subscription(
    State(service): State<ServiceState>,
    Path(id): Path<String>,
) -> Result<Json<Subscription>, AppError> {
    let sub = service
        .get_by_id(&id)
        .await
        .map_err(service_error("get subscription"))?;

    Ok(Json(sub))
}

/// GET /api/v1/subscriptions - List subscriptions, optionally filtered
pub async fn list_subscriptions(
    State(service): State<ServiceState>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Json<Vec<Subscription>>, AppError> {
    let filter = RawListFilter::from_query_pairs(&query_pairs(query)?);
    let items = service
        .list(&filter)
        .await
        .map_err(service_error("list subscriptions"))?;

    Ok(Json(items))
}

/// PUT /api/v1/subscriptions/:id - Replace a subscription
pub async fn update_subscription(
    State(service): State<ServiceState>,
    Path(id): Path<String>,
    payload: Result<Json<SubscriptionInput>, JsonRejection>,
) -> Result<Json<StatusResponse>, AppError> {
    let input = json_body(payload)?;
    service
        .update(&id, &input)
        .await
        .map_err(service_error("update subscription"))?;

    Ok(Json(StatusResponse {
        status: "updated successfully".to_string(),
    }))
}

/// DELETE /api/v1/subscriptions/:id - Delete a subscription
pub async fn delete_subscription(
    State(service): State<ServiceState>,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse>, AppError> {
    service
        .delete(&id)
        .await
        .map_err(service_error("delete subscription"))?;

    Ok(Json(StatusResponse {
        status: "ok".to_string(),
    }))
}

/// GET /api/v1/subscriptions/total - Prorated cost over a month range
pub async fn total_subscriptions(
    State(service): State<ServiceState>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Json<TotalResponse>, AppError> {
    let filter = RawTotalFilter::from_query_pairs(&query_pairs(query)?);
    let total = service
        .total(&filter)
        .await
        .map_err(service_error("calculate subscriptions total"))?;

    Ok(Json(TotalResponse { total }))
}
