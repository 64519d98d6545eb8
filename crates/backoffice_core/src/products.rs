//! crates/backoffice_core/src/products.rs
//!
//! The products store: owns the inventory collection and its CRUD mutations.
//! Like the attendance store it refetches everything after each write.

use crate::domain::{NewActivity, NewProduct, Product, ProductPatch};
use crate::outcome::{MutationOutcome, StoreError};
use crate::ports::BackendService;
use crate::session::Session;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

const UNKNOWN_PRODUCT: &str = "Unknown";

pub struct ProductStore {
    backend: Arc<dyn BackendService>,
    products: Vec<Product>,
    loading: bool,
    error: Option<String>,
}

impl ProductStore {
    pub fn new(backend: Arc<dyn BackendService>) -> Self {
        Self {
            backend,
            products: Vec::new(),
            loading: false,
            error: None,
        }
    }

    /// Creates a store and performs its initial fetch.
    pub async fn load(backend: Arc<dyn BackendService>) -> Self {
        let mut store = Self::new(backend);
        store.fetch().await;
        store
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub async fn fetch(&mut self) {
        self.loading = true;
        match self.backend.list_products().await {
            Ok(products) => {
                self.products = products;
                self.error = None;
            }
            Err(e) => {
                warn!("Failed to fetch products: {}", e);
                self.error = Some(e.to_string());
            }
        }
        self.loading = false;
    }

    pub async fn add_product(
        &mut self,
        session: Option<&Session>,
        data: NewProduct,
    ) -> MutationOutcome {
        self.try_add(session, data).await.into()
    }

    pub async fn update_product(
        &mut self,
        session: Option<&Session>,
        product_id: Uuid,
        patch: ProductPatch,
    ) -> MutationOutcome {
        self.try_update(session, product_id, patch).await.into()
    }

    pub async fn delete_product(
        &mut self,
        session: Option<&Session>,
        product_id: Uuid,
    ) -> MutationOutcome {
        self.try_delete(session, product_id).await.into()
    }

    async fn try_add(
        &mut self,
        session: Option<&Session>,
        data: NewProduct,
    ) -> Result<(), StoreError> {
        let session = session.ok_or(StoreError::NotAuthenticated)?;
        let name = data.name.clone();

        let product = self.backend.insert_product(data).await?;
        info!("Added product {} ({})", product.id, product.sku);

        self.log(NewActivity::new(
            session.user.id,
            "Add Product",
            format!("Added product: {}", name),
        ))
        .await;

        self.fetch().await;
        Ok(())
    }

    async fn try_update(
        &mut self,
        session: Option<&Session>,
        product_id: Uuid,
        patch: ProductPatch,
    ) -> Result<(), StoreError> {
        let session = session.ok_or(StoreError::NotAuthenticated)?;
        // The log names the product only when the patch renames it.
        let name = patch
            .name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string());

        let matched = self.backend.update_product(product_id, patch).await?;
        if matched == 0 {
            warn!("Update matched no product with id {}", product_id);
        }

        self.log(NewActivity::new(
            session.user.id,
            "Update Product",
            format!("Updated product: {}", name),
        ))
        .await;

        self.fetch().await;
        Ok(())
    }

    async fn try_delete(
        &mut self,
        session: Option<&Session>,
        product_id: Uuid,
    ) -> Result<(), StoreError> {
        let session = session.ok_or(StoreError::NotAuthenticated)?;

        // Read the name first so the log stays readable after the row is gone.
        let name = match self.backend.get_product_name(product_id).await {
            Ok(Some(name)) => name,
            Ok(None) => UNKNOWN_PRODUCT.to_string(),
            Err(e) => {
                warn!("Could not read name of product {}: {}", product_id, e);
                UNKNOWN_PRODUCT.to_string()
            }
        };

        let removed = self.backend.delete_product(product_id).await?;
        info!("Deleted product {} ({} row(s))", product_id, removed);

        self.log(NewActivity::new(
            session.user.id,
            "Delete Product",
            format!("Deleted product: {}", name),
        ))
        .await;

        self.fetch().await;
        Ok(())
    }

    async fn log(&self, activity: NewActivity) {
        if let Err(e) = self.backend.insert_activity(activity).await {
            warn!("Failed to write activity log: {}", e);
        }
    }
}
