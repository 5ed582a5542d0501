use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{NewProduct, Product, ProductChanges, ProductFilter};

/// Repository trait for Product persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a product; `DuplicateCode` if the code is already taken
    async fn create(&self, input: NewProduct) -> ProductResult<Product>;

    /// Get a product by ID
    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>>;

    /// List products matching the filter, oldest first
    async fn list(&self, filter: ProductFilter) -> ProductResult<Vec<Product>>;

    /// Replace the editable fields; the code never changes
    async fn update(&self, id: Uuid, changes: ProductChanges) -> ProductResult<Product>;

    /// Delete a product; false if it did not exist
    async fn delete(&self, id: Uuid) -> ProductResult<bool>;

    /// Every code that contains `needle` as a substring
    async fn codes_containing(&self, needle: &str) -> ProductResult<Vec<String>>;
}

/// Case-insensitive match of `search` against name or code
pub(crate) fn matches_search(product: &Product, search: &str) -> bool {
    let needle = search.to_lowercase();
    product.name.to_lowercase().contains(&needle) || product.code.to_lowercase().contains(&needle)
}

/// In-memory implementation for tests and local runs without Postgres
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<HashMap<Uuid, Product>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, input: NewProduct) -> ProductResult<Product> {
        let mut products = self.products.write().await;

        if products.values().any(|p| p.code == input.code) {
            return Err(ProductError::DuplicateCode(input.code));
        }

        let now = Utc::now();
        let product = Product {
            id: Uuid::now_v7(),
            name: input.name,
            code: input.code,
            brand: input.brand,
            categories: input.categories,
            price: input.price,
            image: input.image,
            created_at: now,
            updated_at: now,
        };
        products.insert(product.id, product.clone());

        tracing::info!(product_id = %product.id, code = %product.code, "Created product");
        Ok(product)
    }

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.get(&id).cloned())
    }

    async fn list(&self, filter: ProductFilter) -> ProductResult<Vec<Product>> {
        let products = self.products.read().await;

        let mut matched: Vec<Product> = products
            .values()
            .filter(|p| {
                filter
                    .search
                    .as_deref()
                    .is_none_or(|search| matches_search(p, search))
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        let skip = filter.skip.unwrap_or(0) as usize;
        let take = filter.take.map_or(usize::MAX, |t| t as usize);
        Ok(matched.into_iter().skip(skip).take(take).collect())
    }

    async fn update(&self, id: Uuid, changes: ProductChanges) -> ProductResult<Product> {
        let mut products = self.products.write().await;
        let product = products.get_mut(&id).ok_or(ProductError::NotFound(id))?;

        product.name = changes.name;
        product.brand = changes.brand;
        product.categories = changes.categories;
        product.price = changes.price;
        if let Some(image) = changes.image {
            product.image = image;
        }
        product.updated_at = Utc::now();

        tracing::info!(product_id = %id, "Updated product");
        Ok(product.clone())
    }

    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        let mut products = self.products.write().await;
        let removed = products.remove(&id).is_some();
        if removed {
            tracing::info!(product_id = %id, "Deleted product");
        }
        Ok(removed)
    }

    async fn codes_containing(&self, needle: &str) -> ProductResult<Vec<String>> {
        let products = self.products.read().await;
        Ok(products
            .values()
            .filter(|p| p.code.contains(needle))
            .map(|p| p.code.clone())
            .collect())
    }
}
