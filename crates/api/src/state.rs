//! Shared application state.

use std::time::Duration;

use common::Context;
use domain::{ProductRepository, ProductService};
use tokio_util::sync::CancellationToken;

/// Shared application state accessible from all handlers.
pub struct AppState<R: ProductRepository> {
    pub product_service: ProductService<R>,
    /// Deadline applied to every request.
    pub request_timeout: Duration,
    /// Cancelled when the server starts shutting down.
    pub shutdown: CancellationToken,
}

impl<R: ProductRepository> AppState<R> {
    /// Builds the context for one request: a child of the shutdown token
    /// with the configured deadline.
    pub fn request_context(&self) -> Context {
        Context::with_token(self.shutdown.child_token()).with_timeout(self.request_timeout)
    }
}
