use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{DbBackend, Statement};

/// Password shared by the seeded accounts
const SEED_PASSWORD: &str = "vascomm123";
const SEED_IMAGE: &str = "https://picsum.photos/200";

const SEED_USERS: &[(&str, &str, &str, &str)] = &[
    (
        "0192a0c0-0000-7000-8000-000000000001",
        "Super Admin",
        "superadmin@vascomm.co.id",
        "ADMIN",
    ),
    (
        "0192a0c0-0000-7000-8000-000000000002",
        "User",
        "user@vascomm.co.id",
        "USER",
    ),
];

const SEED_PRODUCTS: &[(&str, &str, &str, f64)] = &[
    ("0192a0c0-0000-7000-8000-000000000101", "Perfume 01", "The Body Shop", 200000.0),
    ("0192a0c0-0000-7000-8000-000000000102", "Perfume 02", "The Face Shop", 150000.0),
    ("0192a0c0-0000-7000-8000-000000000103", "Perfume 03", "Axe", 30000.0),
];

#[derive(DeriveMigrationName)]
pub struct Migration;

fn hash_seed_password() -> Result<String, DbErr> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(SEED_PASSWORD.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DbErr::Custom(format!("Failed to hash seed password: {}", e)))
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let password_hash = hash_seed_password()?;

        for (id, name, email, role) in SEED_USERS {
            db.execute_raw(Statement::from_sql_and_values(
                DbBackend::Postgres,
                r#"
                INSERT INTO users (id, name, email, password_hash, role, created_at, updated_at)
                VALUES ($1::UUID, $2, $3, $4, $5, NOW(), NOW())
                ON CONFLICT (id) DO NOTHING
                "#,
                [
                    (*id).into(),
                    (*name).into(),
                    (*email).into(),
                    password_hash.clone().into(),
                    (*role).into(),
                ],
            ))
            .await?;
        }

        // Codes continue the day bucket the running API would use
        let day = chrono::Utc::now().format("%y%m%d").to_string();
        for (index, (id, name, brand, price)) in SEED_PRODUCTS.iter().enumerate() {
            let code = format!("PRD-{}-{:04}", day, index + 1);
            db.execute_raw(Statement::from_sql_and_values(
                DbBackend::Postgres,
                r#"
                INSERT INTO products (id, name, code, brand, categories, price, image, created_at, updated_at)
                VALUES ($1::UUID, $2, $3, $4, '["Fragrance", "Soft"]'::JSONB, $5, $6, NOW(), NOW())
                ON CONFLICT DO NOTHING
                "#,
                [
                    (*id).into(),
                    (*name).into(),
                    code.into(),
                    (*brand).into(),
                    (*price).into(),
                    SEED_IMAGE.into(),
                ],
            ))
            .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        let product_ids: Vec<&str> = SEED_PRODUCTS.iter().map(|(id, ..)| *id).collect();
        db.execute_unprepared(&format!(
            "DELETE FROM products WHERE id IN ('{}')",
            product_ids.join("', '")
        ))
        .await?;

        let user_ids: Vec<&str> = SEED_USERS.iter().map(|(id, ..)| *id).collect();
        db.execute_unprepared(&format!(
            "DELETE FROM users WHERE id IN ('{}')",
            user_ids.join("', '")
        ))
        .await?;

        Ok(())
    }
}
