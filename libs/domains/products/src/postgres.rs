use async_trait::async_trait;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, SqlErr,
};
use uuid::Uuid;

use crate::{
    entity,
    error::{ProductError, ProductResult},
    models::{NewProduct, Product, ProductChanges, ProductFilter},
    repository::ProductRepository,
};

pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn db_error(e: DbErr) -> ProductError {
    ProductError::Database(format!("Database error: {}", e))
}

/// Escape LIKE wildcards so user input only ever matches literally
fn like_pattern(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, input: NewProduct) -> ProductResult<Product> {
        let code = input.code.clone();
        let active_model: entity::ActiveModel = input.into();

        let model = active_model.insert(&self.db).await.map_err(|e| {
            match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => ProductError::DuplicateCode(code),
                _ => db_error(e),
            }
        })?;

        tracing::info!(product_id = %model.id, code = %model.code, "Created product");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error)?;

        Ok(model.map(|m| m.into()))
    }

    async fn list(&self, filter: ProductFilter) -> ProductResult<Vec<Product>> {
        let mut query = entity::Entity::find();

        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            let pattern = like_pattern(search);
            query = query.filter(Expr::cust_with_values(
                "(name ILIKE ? OR code ILIKE ?)",
                [pattern.clone(), pattern],
            ));
        }

        query = query
            .order_by_asc(entity::Column::CreatedAt)
            .order_by_asc(entity::Column::Id);

        if let Some(take) = filter.take {
            query = query.limit(take);
        }
        if let Some(skip) = filter.skip {
            query = query.offset(skip);
        }

        let models = query.all(&self.db).await.map_err(db_error)?;
        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn update(&self, id: Uuid, changes: ProductChanges) -> ProductResult<Product> {
        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error)?
            .ok_or(ProductError::NotFound(id))?;

        let mut active_model: entity::ActiveModel = model.into();
        active_model.name = Set(changes.name);
        active_model.brand = Set(changes.brand);
        active_model.categories = Set(serde_json::Value::from(changes.categories));
        active_model.price = Set(changes.price);
        if let Some(image) = changes.image {
            active_model.image = Set(image);
        }
        active_model.updated_at = Set(chrono::Utc::now().into());

        let updated = active_model.update(&self.db).await.map_err(db_error)?;

        tracing::info!(product_id = %id, "Updated product");
        Ok(updated.into())
    }

    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        let result = entity::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error)?;

        if result.rows_affected > 0 {
            tracing::info!(product_id = %id, "Deleted product");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn codes_containing(&self, needle: &str) -> ProductResult<Vec<String>> {
        entity::Entity::find()
            .select_only()
            .column(entity::Column::Code)
            .filter(entity::Column::Code.contains(needle))
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .map_err(db_error)
    }
}
