//! Category lookups.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use domain::{CategoryId, ProductRepository};

use crate::error::ApiError;
use crate::routes::products::ProductResponse;
use crate::state::AppState;

/// GET /categories/{id}/products — list products tagged with a category.
#[tracing::instrument(skip(state))]
pub async fn products<R: ProductRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let category_id = CategoryId::new(id)?;
    let products = state
        .product_service
        .get_products_by_category(&state.request_context(), &category_id)
        .await?;

    Ok(Json(products.iter().map(ProductResponse::from).collect()))
}
