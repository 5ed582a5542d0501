use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sea-ORM Entity for the products table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub code: String,
    pub brand: String,
    pub categories: Json, // JSONB array of strings
    #[sea_orm(column_type = "Double")]
    pub price: f64,
    #[sea_orm(column_type = "Text")]
    pub image: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::models::Product {
    fn from(model: Model) -> Self {
        let categories: Vec<String> = serde_json::from_value(model.categories).unwrap_or_default();

        Self {
            id: model.id,
            name: model.name,
            code: model.code,
            brand: model.brand,
            categories,
            price: model.price,
            image: model.image,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<crate::models::NewProduct> for ActiveModel {
    fn from(input: crate::models::NewProduct) -> Self {
        let now = chrono::Utc::now();

        ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(input.name),
            code: Set(input.code),
            brand: Set(input.brand),
            categories: Set(serde_json::Value::from(input.categories)),
            price: Set(input.price),
            image: Set(input.image),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Product;

    #[test]
    fn test_model_into_product_reads_categories() {
        let now = chrono::Utc::now();
        let model = Model {
            id: Uuid::now_v7(),
            name: "Perfume 01".into(),
            code: "PRD-241019-0001".into(),
            brand: "The Body Shop".into(),
            categories: serde_json::json!(["Fragrance", "Soft"]),
            price: 200000.0,
            image: "https://picsum.photos/200".into(),
            created_at: now.into(),
            updated_at: now.into(),
        };

        let product: Product = model.into();
        assert_eq!(product.categories, vec!["Fragrance", "Soft"]);
        assert_eq!(product.created_at, now);
    }
}
