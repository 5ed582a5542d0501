//! Product Service - Business logic layer

use std::sync::Arc;

use axum_helpers::title_case;
use core_storage::ContentStore;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::code::{CodeGenerator, Clock, MAX_CODE_ATTEMPTS, next_in_bucket};
use crate::error::{ProductError, ProductResult};
use crate::image::ImageSource;
use crate::models::{NewProduct, Product, ProductChanges, ProductFilter, ProductInput};
use crate::repository::ProductRepository;

/// Product service providing business logic operations
///
/// Validates input, stores images through the [`ContentStore`], and assigns
/// product codes before handing rows to the repository.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
    store: Arc<dyn ContentStore>,
    codes: CodeGenerator,
}

/// Validated fields with surrounding whitespace removed
struct CleanInput {
    name: String,
    brand: String,
    categories: Vec<String>,
    price: f64,
    image: Option<ImageSource>,
}

fn clean(input: ProductInput) -> ProductResult<CleanInput> {
    let input = ProductInput {
        name: input.name.trim().to_string(),
        brand: input.brand.trim().to_string(),
        categories: input
            .categories
            .into_iter()
            .map(|c| c.trim().to_string())
            .collect(),
        ..input
    };
    if !input.malformed.is_empty() {
        return Err(ProductError::Validation(input.malformed.join(", ")));
    }
    input.validate()?;

    Ok(CleanInput {
        name: title_case(&input.name),
        brand: input.brand,
        categories: input.categories,
        price: input.price.unwrap_or_default(),
        image: input.image,
    })
}

impl<R: ProductRepository> ProductService<R> {
    /// Create a new ProductService using the system clock for codes
    pub fn new(repository: R, store: Arc<dyn ContentStore>) -> Self {
        Self {
            repository: Arc::new(repository),
            store,
            codes: CodeGenerator::default(),
        }
    }

    /// Replace the clock used to date product codes
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.codes = CodeGenerator::new(clock);
        self
    }

    /// List products
    #[instrument(skip(self))]
    pub async fn list_products(&self, filter: ProductFilter) -> ProductResult<Vec<Product>> {
        self.repository.list(filter).await
    }

    /// Get a product by ID
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: Uuid) -> ProductResult<Product> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// Next free code for today's bucket, optionally under a prefix
    #[instrument(skip(self))]
    pub async fn next_product_code(&self, prefix: Option<&str>) -> ProductResult<String> {
        let initial = self.codes.initial(prefix);
        let existing = self.repository.codes_containing(&initial).await?;
        Ok(next_in_bucket(&initial, &existing))
    }

    /// Create a new product with a freshly generated code
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn create_product(&self, input: ProductInput) -> ProductResult<Product> {
        let input = clean(input)?;
        let image = input
            .image
            .ok_or_else(|| ProductError::Validation("image: is required".into()))?;
        let image_url = self.store_image(image).await?;

        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let code = self
                .next_product_code(None)
                .await
                .map_err(|e| ProductError::persistence("add", e))?;

            let row = NewProduct {
                name: input.name.clone(),
                code,
                brand: input.brand.clone(),
                categories: input.categories.clone(),
                price: input.price,
                image: image_url.clone(),
            };

            match self.repository.create(row).await {
                Ok(product) => return Ok(product),
                Err(ProductError::DuplicateCode(code)) => {
                    tracing::warn!(%code, attempt, "Product code taken concurrently, retrying");
                }
                Err(e) => return Err(ProductError::persistence("add", e)),
            }
        }

        Err(ProductError::Persistence {
            operation: "add",
            message: format!("no free product code after {} attempts", MAX_CODE_ATTEMPTS),
        })
    }

    /// Update a product; the image is replaced only when a new one is given
    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: Uuid, input: ProductInput) -> ProductResult<Product> {
        self.get_product(id).await?;

        let input = clean(input)?;
        let image = match input.image {
            Some(source) => Some(self.store_image(source).await?),
            None => None,
        };

        let changes = ProductChanges {
            name: input.name,
            brand: input.brand,
            categories: input.categories,
            price: input.price,
            image,
        };

        self.repository
            .update(id, changes)
            .await
            .map_err(|e| ProductError::persistence("update", e))
    }

    /// Delete a product and return what was removed
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> ProductResult<Product> {
        let product = self.get_product(id).await?;

        let deleted = self
            .repository
            .delete(id)
            .await
            .map_err(|e| ProductError::persistence("delete", e))?;
        if !deleted {
            return Err(ProductError::NotFound(id));
        }

        Ok(product)
    }

    async fn store_image(&self, source: ImageSource) -> ProductResult<String> {
        let image = source.into_stored()?;
        let url = self.store.put(&image.path, image.bytes).await?;
        tracing::debug!(path = %image.path, "Stored product image");
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::FixedClock;
    use crate::repository::{InMemoryProductRepository, MockProductRepository};
    use base64::{Engine, engine::general_purpose::STANDARD};
    use chrono::{NaiveDate, Utc};
    use core_storage::InMemoryContentStore;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, 19).unwrap()
    }

    fn data_uri() -> ImageSource {
        ImageSource::DataUri(format!("data:image/png;base64,{}", STANDARD.encode(b"png")))
    }

    fn input() -> ProductInput {
        ProductInput {
            name: "perfume 04".into(),
            brand: "Axe".into(),
            categories: vec!["Fragrance".into(), "Soft".into()],
            price: Some(30000.0),
            image: Some(data_uri()),
            malformed: Vec::new(),
        }
    }

    fn service_with(
        repo: InMemoryProductRepository,
    ) -> (ProductService<InMemoryProductRepository>, Arc<InMemoryContentStore>) {
        let store = Arc::new(InMemoryContentStore::new("/storage"));
        let service = ProductService::new(repo, store.clone()).with_clock(Arc::new(FixedClock(day())));
        (service, store)
    }

    fn stored_product(code: &str) -> Product {
        let now = Utc::now();
        Product {
            id: Uuid::now_v7(),
            name: "Perfume 01".into(),
            code: code.into(),
            brand: "Axe".into(),
            categories: vec!["Fragrance".into()],
            price: 1.0,
            image: "/storage/products/x.webp".into(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_codes() {
        let (service, store) = service_with(InMemoryProductRepository::new());

        let first = service.create_product(input()).await.unwrap();
        let second = service.create_product(input()).await.unwrap();

        assert_eq!(first.code, "PRD-241019-0001");
        assert_eq!(second.code, "PRD-241019-0002");
        assert_eq!(first.name, "Perfume 04");
        assert!(first.image.starts_with("/storage/products/"));
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_create_requires_image() {
        let (service, _) = service_with(InMemoryProductRepository::new());
        let err = service
            .create_product(ProductInput {
                image: None,
                ..input()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ProductError::Validation(msg) if msg.contains("image")));
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let (service, store) = service_with(InMemoryProductRepository::new());
        let err = service
            .create_product(ProductInput {
                name: "   ".into(),
                ..input()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ProductError::Validation(_)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_create_retries_on_duplicate_code() {
        let mut repo = MockProductRepository::new();
        repo.expect_codes_containing().returning(|_| Ok(vec![]));

        let mut calls = 0;
        repo.expect_create().times(2).returning(move |row| {
            calls += 1;
            if calls == 1 {
                Err(ProductError::DuplicateCode(row.code))
            } else {
                Ok(stored_product(&row.code))
            }
        });

        let store = Arc::new(InMemoryContentStore::new("/storage"));
        let service = ProductService::new(repo, store).with_clock(Arc::new(FixedClock(day())));

        let product = service.create_product(input()).await.unwrap();
        assert_eq!(product.code, "PRD-241019-0001");
    }

    #[tokio::test]
    async fn test_create_gives_up_after_max_attempts() {
        let mut repo = MockProductRepository::new();
        repo.expect_codes_containing().returning(|_| Ok(vec![]));
        repo.expect_create()
            .times(MAX_CODE_ATTEMPTS)
            .returning(|row| Err(ProductError::DuplicateCode(row.code)));

        let store = Arc::new(InMemoryContentStore::new("/storage"));
        let service = ProductService::new(repo, store);

        let err = service.create_product(input()).await.unwrap_err();
        assert!(matches!(err, ProductError::Persistence { operation: "add", .. }));
    }

    #[tokio::test]
    async fn test_next_code_continues_after_deletion() {
        let (service, _) = service_with(InMemoryProductRepository::new());
        service.create_product(input()).await.unwrap();
        let second = service.create_product(input()).await.unwrap();
        let third = service.create_product(input()).await.unwrap();
        service.delete_product(second.id).await.unwrap();

        assert_eq!(third.code, "PRD-241019-0003");
        assert_eq!(service.next_product_code(None).await.unwrap(), "PRD-241019-0004");
        assert_eq!(
            service.next_product_code(Some("VIP")).await.unwrap(),
            "PRD-241019-VIP-0001"
        );
    }

    #[tokio::test]
    async fn test_update_checks_existence_first() {
        let (service, _) = service_with(InMemoryProductRepository::new());
        let err = service
            .update_product(Uuid::now_v7(), ProductInput::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProductError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_without_image_keeps_url_and_code() {
        let (service, store) = service_with(InMemoryProductRepository::new());
        let created = service.create_product(input()).await.unwrap();

        let updated = service
            .update_product(
                created.id,
                ProductInput {
                    name: "perfume 05".into(),
                    image: None,
                    ..input()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Perfume 05");
        assert_eq!(updated.image, created.image);
        assert_eq!(updated.code, created.code);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_update_persistence_failure() {
        let existing = stored_product("PRD-241019-0001");
        let id = existing.id;

        let mut repo = MockProductRepository::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_update()
            .returning(|_, _| Err(ProductError::Database("connection reset".into())));

        let store = Arc::new(InMemoryContentStore::new("/storage"));
        let service = ProductService::new(repo, store);

        let err = service
            .update_product(id, ProductInput { image: None, ..input() })
            .await
            .unwrap_err();
        assert!(matches!(err, ProductError::Persistence { operation: "update", .. }));
    }

    #[tokio::test]
    async fn test_delete_returns_record() {
        let (service, _) = service_with(InMemoryProductRepository::new());
        let created = service.create_product(input()).await.unwrap();

        let deleted = service.delete_product(created.id).await.unwrap();
        assert_eq!(deleted.id, created.id);

        let err = service.get_product(created.id).await.unwrap_err();
        assert!(matches!(err, ProductError::NotFound(_)));
    }
}
