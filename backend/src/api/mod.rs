//! API module
//!
//! Router construction, request-id middleware and the HTTP handlers for
//! subscription endpoints.

pub mod health;
pub mod subscriptions;

use crate::error::AppError;
use axum::{
    error_handling::HandleErrorLayer,
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
    routing::get,
    BoxError, Router,
};
use std::any::Any;
use std::time::{Duration, Instant};
use subscriptions::ServiceState;
use tower::{timeout::error::Elapsed, timeout::TimeoutLayer, ServiceBuilder};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

/// Tag each request with an id and log its outcome
async fn request_id_middleware(request: Request, next: Next) -> Response {
    let span = info_span!(
        "request",
        request_id = %Uuid::new_v4(),
        method = %request.method(),
        uri = %request.uri(),
    );

    async move {
        let start = Instant::now();
        let response = next.run(request).await;
        info!(
            status = response.status().as_u16(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Request completed"
        );
        response
    }
    .instrument(span)
    .await
}

/// Errors raised by the tower middleware stack
async fn handle_middleware_error(err: BoxError) -> AppError {
    if err.is::<Elapsed>() {
        AppError::Timeout
    } else {
        AppError::Internal(anyhow::anyhow!(err))
    }
}

/// Turn a handler panic into a plain 500
fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = detail, "Handler panicked");

    AppError::Internal(anyhow::anyhow!("handler panicked: {}", detail)).into_response()
}

/// Wrap routes in the shared middleware stack
fn with_middleware<S>(routes: Router<S>, request_timeout: Duration) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    // Innermost first: panics are caught before the request is logged
    routes
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Build the application router
///
/// # Arguments
/// * `state` - Shared subscription service
/// * `request_timeout` - Upper bound on handling a single request
pub fn router(state: ServiceState, request_timeout: Duration) -> Router {
    let routes = Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/api/v1/subscriptions",
            get(subscriptions::list_subscriptions).post(subscriptions::create_subscription),
        )
        .route(
            "/api/v1/subscriptions/total",
            get(subscriptions::total_subscriptions),
        )
        .route(
            "/api/v1/subscriptions/:id",
            get(subscriptions::get_subscription)
                .put(subscriptions::update_subscription)
                .delete(subscriptions::delete_subscription),
        );

    with_middleware(routes, request_timeout).with_state(state)
}
