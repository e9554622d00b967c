//! Product CRUD, category tagging and stock endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use domain::{
    AddCategoryToProduct, AdjustStock, Category, CreateProduct, Product, ProductId,
    ProductRepository, RemoveCategoryFromProduct, UpdateProduct,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

// -- Request types --

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: u64,
    pub currency: String,
    #[serde(default)]
    pub stock: u64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: u64,
    pub currency: String,
    #[serde(default)]
    pub stock: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCategoryRequest {
    pub category_id: String,
    pub category_name: String,
}

#[derive(Debug, Deserialize)]
pub struct StockRequest {
    pub quantity: u64,
}

// -- Response types --

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: String,
    pub name: String,
}

impl From<&Category> for CategoryResponse {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id().to_string(),
            name: category.name().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: u64,
    pub currency: String,
    pub stock: u64,
    pub categories: Vec<CategoryResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: u64,
}

impl From<&Product> for ProductResponse {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id().to_string(),
            name: product.name().to_string(),
            description: product.description().to_string(),
            price: product.price().amount(),
            currency: product.price().currency().to_string(),
            stock: product.stock().quantity(),
            categories: product.categories().iter().map(Into::into).collect(),
            created_at: product.created_at(),
            updated_at: product.updated_at(),
            version: product.version().as_u64(),
        }
    }
}

// -- Handlers --

/// POST /products — create a product.
#[tracing::instrument(skip(state, payload))]
pub async fn create<R: ProductRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    payload: Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    let Json(req) = payload?;
    let cmd = CreateProduct::parse(
        &req.id,
        &req.name,
        &req.description,
        req.price,
        &req.currency,
        req.stock,
    )?;

    let product = state
        .product_service
        .create_product(&state.request_context(), cmd)
        .await?;

    Ok((StatusCode::CREATED, Json(ProductResponse::from(&product))))
}

/// GET /products — list every product, ordered by id.
#[tracing::instrument(skip(state))]
pub async fn list<R: ProductRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let products = state
        .product_service
        .get_all_products(&state.request_context())
        .await?;

    Ok(Json(products.iter().map(ProductResponse::from).collect()))
}

/// GET /products/{id} — load one product.
#[tracing::instrument(skip(state))]
pub async fn get<R: ProductRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, ApiError> {
    let id = ProductId::new(id)?;
    let product = state
        .product_service
        .get_product_by_id(&state.request_context(), &id)
        .await?;

    Ok(Json(ProductResponse::from(&product)))
}

/// PUT /products/{id} — replace name, description, price and stock.
#[tracing::instrument(skip(state, payload))]
pub async fn update<R: ProductRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateProductRequest>, JsonRejection>,
) -> Result<Json<ProductResponse>, ApiError> {
    let Json(req) = payload?;
    let cmd = UpdateProduct::parse(
        &id,
        &req.name,
        &req.description,
        req.price,
        &req.currency,
        req.stock,
    )?;

    let product = state
        .product_service
        .update_product(&state.request_context(), cmd)
        .await?;

    Ok(Json(ProductResponse::from(&product)))
}

/// DELETE /products/{id} — remove a product.
#[tracing::instrument(skip(state))]
pub async fn delete<R: ProductRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = ProductId::new(id)?;
    state
        .product_service
        .delete_product(&state.request_context(), &id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /products/{id}/categories — tag a product.
#[tracing::instrument(skip(state, payload))]
pub async fn add_category<R: ProductRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
    payload: Result<Json<AddCategoryRequest>, JsonRejection>,
) -> Result<Json<ProductResponse>, ApiError> {
    let Json(req) = payload?;
    let cmd = AddCategoryToProduct::parse(&id, &req.category_id, &req.category_name)?;

    let product = state
        .product_service
        .add_category_to_product(&state.request_context(), cmd)
        .await?;

    Ok(Json(ProductResponse::from(&product)))
}

/// DELETE /products/{id}/categories/{category_id} — untag a product.
#[tracing::instrument(skip(state))]
pub async fn remove_category<R: ProductRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path((id, category_id)): Path<(String, String)>,
) -> Result<Json<ProductResponse>, ApiError> {
    let cmd = RemoveCategoryFromProduct::parse(&id, &category_id)?;

    let product = state
        .product_service
        .remove_category_from_product(&state.request_context(), cmd)
        .await?;

    Ok(Json(ProductResponse::from(&product)))
}

/// POST /products/{id}/stock/increase — add units.
#[tracing::instrument(skip(state, payload))]
pub async fn increase_stock<R: ProductRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
    payload: Result<Json<StockRequest>, JsonRejection>,
) -> Result<Json<ProductResponse>, ApiError> {
    let Json(req) = payload?;
    let cmd = AdjustStock::parse(&id, req.quantity)?;

    let product = state
        .product_service
        .increase_stock(&state.request_context(), cmd)
        .await?;

    Ok(Json(ProductResponse::from(&product)))
}

/// POST /products/{id}/stock/decrease — remove units.
#[tracing::instrument(skip(state, payload))]
pub async fn decrease_stock<R: ProductRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
    payload: Result<Json<StockRequest>, JsonRejection>,
) -> Result<Json<ProductResponse>, ApiError> {
    let Json(req) = payload?;
    let cmd = AdjustStock::parse(&id, req.quantity)?;

    let product = state
        .product_service
        .decrease_stock(&state.request_context(), cmd)
        .await?;

    Ok(Json(ProductResponse::from(&product)))
}
