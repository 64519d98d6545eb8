//! services/api/src/web/inventory.rs
//!
//! The inventory page and product CRUD.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use backoffice_core::domain::{NewProduct, Product, ProductPatch};
use backoffice_core::outcome::MutationOutcome;
use backoffice_core::products::ProductStore;
use backoffice_core::session::Session;
use backoffice_core::views::InventoryPage;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::web::outcome_status;
use crate::web::state::AppState;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct InventoryQuery {
    /// Case-insensitive match against name or SKU.
    pub search: Option<String>,
    /// Exact category, or `all`.
    pub category: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct ProductMutationResponse {
    pub outcome: MutationOutcome,
    pub products: Vec<Product>,
}

type MutationReply = (StatusCode, Json<ProductMutationResponse>);

/// GET /inventory - Filtered products, low-stock list and stock value
#[utoipa::path(
    get,
    path = "/inventory",
    params(InventoryQuery),
    responses(
        (status = 200, description = "Inventory page", body = InventoryPage),
        (status = 401, description = "Not signed in"),
        (status = 503, description = "Products could not be loaded")
    )
)]
pub async fn inventory_page_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<InventoryQuery>,
) -> Result<Json<InventoryPage>, (StatusCode, String)> {
    let store = ProductStore::load(state.backend.clone()).await;
    if let Some(message) = store.error() {
        warn!("Inventory page served without data: {}", message);
        return Err((StatusCode::SERVICE_UNAVAILABLE, message.to_string()));
    }

    let category = query
        .category
        .as_deref()
        .filter(|c| !c.is_empty() && *c != "all");
    let page = InventoryPage::derive(
        store.products(),
        query.search.as_deref().unwrap_or(""),
        category,
    );
    Ok(Json(page))
}

/// POST /products - Add a product
#[utoipa::path(
    post,
    path = "/products",
    request_body = NewProduct,
    responses(
        (status = 200, description = "Product added", body = ProductMutationResponse),
        (status = 400, description = "Product could not be added", body = ProductMutationResponse),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn add_product_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Json(data): Json<NewProduct>,
) -> MutationReply {
    let mut store = ProductStore::new(state.backend.clone());
    let outcome = store.add_product(Some(&session), data).await;
    respond(outcome, store).await
}

/// PATCH /products/{id} - Update some fields of a product
#[utoipa::path(
    patch,
    path = "/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = ProductPatch,
    responses(
        (status = 200, description = "Product updated", body = ProductMutationResponse),
        (status = 400, description = "Product could not be updated", body = ProductMutationResponse),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn update_product_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
    Json(patch): Json<ProductPatch>,
) -> MutationReply {
    let mut store = ProductStore::new(state.backend.clone());
    let outcome = store.update_product(Some(&session), id, patch).await;
    respond(outcome, store).await
}

/// DELETE /products/{id} - Remove a product
#[utoipa::path(
    delete,
    path = "/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product deleted", body = ProductMutationResponse),
        (status = 400, description = "Product could not be deleted", body = ProductMutationResponse),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn delete_product_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
) -> MutationReply {
    let mut store = ProductStore::new(state.backend.clone());
    let outcome = store.delete_product(Some(&session), id).await;
    respond(outcome, store).await
}

// A successful mutation has already refetched; a failed one has not.
async fn respond(outcome: MutationOutcome, mut store: ProductStore) -> MutationReply {
    if !outcome.success {
        store.fetch().await;
    }
    (
        outcome_status(&outcome),
        Json(ProductMutationResponse {
            outcome,
            products: store.products().to_vec(),
        }),
    )
}
