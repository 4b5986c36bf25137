//! Launch API - read-only HTTP facade over the launch table
//!
//! Routes live under `/api/v1`; the service root answers with a banner.
//! The router is generic over the session factory so the same handlers
//! serve DynamoDB in production and an in-memory store in tests.

use axum::{routing::get, Router};
use launchcore_query::SessionFactory;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod dynamo;
pub mod handlers;
pub mod state;

pub use dynamo::{DynamoSession, DynamoSessionFactory, FilterExpression};
pub use handlers::ApiError;
pub use state::AppState;

/// Prefix for every versioned route
pub const API_PREFIX: &str = "/api/v1";

/// Build the application router.
pub fn router<F>(state: Arc<AppState<F>>) -> Router
where
    F: SessionFactory + 'static,
{
    let api = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/launches", get(handlers::list_launches::<F>))
        .route("/launches/date-range", get(handlers::launches_by_date_range::<F>))
        .route(
            "/launches/filter",
            get(handlers::get_launch_named_filter::<F>).post(handlers::filter_launches::<F>),
        )
        .route("/launches/stats/summary", get(handlers::launch_summary::<F>))
        .route("/launches/:launch_id", get(handlers::get_launch::<F>));

    Router::new()
        .route("/", get(handlers::root))
        .nest(API_PREFIX, api)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}
