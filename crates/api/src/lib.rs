//! HTTP API server with observability for the product catalog.
//!
//! Provides REST endpoints for products, category tagging and stock, with
//! structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::routing::{delete, get, post};
use domain::{ProductRepository, ProductService};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<R: ProductRepository + 'static>(
    state: Arc<AppState<R>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    use routes::{categories, products};

    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/products",
            post(products::create::<R>).get(products::list::<R>),
        )
        .route(
            "/products/{id}",
            get(products::get::<R>)
                .put(products::update::<R>)
                .delete(products::delete::<R>),
        )
        .route(
            "/products/{id}/categories",
            post(products::add_category::<R>),
        )
        .route(
            "/products/{id}/categories/{category_id}",
            delete(products::remove_category::<R>),
        )
        .route(
            "/products/{id}/stock/increase",
            post(products::increase_stock::<R>),
        )
        .route(
            "/products/{id}/stock/decrease",
            post(products::decrease_stock::<R>),
        )
        .route("/categories/{id}/products", get(categories::products::<R>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = uuid::Uuid::new_v4();
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    %request_id,
                )
            }),
        )
}

/// Creates the application state over a repository.
///
/// Cancelling `shutdown` interrupts every in-flight request.
pub fn create_state<R: ProductRepository + 'static>(
    repository: R,
    request_timeout: Duration,
    shutdown: CancellationToken,
) -> Arc<AppState<R>> {
    Arc::new(AppState {
        product_service: ProductService::new(repository),
        request_timeout,
        shutdown,
    })
}
