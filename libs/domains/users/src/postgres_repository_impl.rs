use super::{User, UserError, UserFilter, UserRepository, UserResult};
use crate::models::Role;
use async_trait::async_trait;
use sea_orm::{DbBackend, DbErr, FromQueryResult, Statement, Value};
use uuid::Uuid;

/// PostgreSQL implementation of UserRepository using raw SeaORM statements
#[derive(Clone)]
pub struct PostgresUserRepository {
    db: sea_orm::DatabaseConnection,
}

impl PostgresUserRepository {
    pub fn new(db: sea_orm::DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Helper struct for deserializing user rows from the database
#[derive(Debug, FromQueryResult)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
    deleted_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        let role = row.role.parse::<Role>().unwrap_or_else(|e| {
            tracing::warn!(user_id = %row.id, "{}; treating as USER", e);
            Role::User
        });

        User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            role,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

#[derive(Debug, FromQueryResult)]
struct ExistsRow {
    found: bool,
}

fn db_error(e: DbErr) -> UserError {
    UserError::Database(format!("Database error: {}", e))
}

fn like_pattern(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

impl PostgresUserRepository {
    async fn fetch_one(&self, sql: &str, values: Vec<Value>) -> UserResult<Option<User>> {
        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, values);
        let row = UserRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(db_error)?;
        Ok(row.map(|r| r.into()))
    }

    async fn exists(&self, sql: &str, values: Vec<Value>) -> UserResult<bool> {
        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, values);
        let row = ExistsRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(db_error)?;
        Ok(row.is_some_and(|r| r.found))
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> UserResult<User> {
        let sql = r#"
            INSERT INTO users (id, name, email, password_hash, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
        "#;

        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [
                user.id.into(),
                user.name.clone().into(),
                user.email.clone().into(),
                user.password_hash.clone().into(),
                user.role.as_str().into(),
                user.created_at.into(),
                user.updated_at.into(),
            ],
        );

        let row = UserRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(|e| {
                let err_str = e.to_string();
                if err_str.contains("duplicate key") || err_str.contains("unique constraint") {
                    UserError::DuplicateEmail(user.email.clone())
                } else {
                    db_error(e)
                }
            })?
            .ok_or_else(|| UserError::Database("Insert returned no row".to_string()))?;

        tracing::info!(user_id = %row.id, "Created user");
        Ok(row.into())
    }

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        self.fetch_one(
            "SELECT * FROM users WHERE id = $1 AND deleted_at IS NULL",
            vec![id.into()],
        )
        .await
    }

    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        self.fetch_one(
            "SELECT * FROM users WHERE LOWER(email) = LOWER($1) AND deleted_at IS NULL",
            vec![email.into()],
        )
        .await
    }

    async fn list(&self, filter: UserFilter) -> UserResult<Vec<User>> {
        let mut sql = String::from("SELECT * FROM users WHERE deleted_at IS NULL");
        let mut values: Vec<Value> = Vec::new();

        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            values.push(like_pattern(search).into());
            sql.push_str(&format!(
                " AND (name ILIKE ${0} OR email ILIKE ${0})",
                values.len()
            ));
        }

        sql.push_str(" ORDER BY created_at ASC, id ASC");

        if let Some(take) = filter.take {
            values.push((take as i64).into());
            sql.push_str(&format!(" LIMIT ${}", values.len()));
        }
        if let Some(skip) = filter.skip {
            values.push((skip as i64).into());
            sql.push_str(&format!(" OFFSET ${}", values.len()));
        }

        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, &sql, values);
        let rows = UserRow::find_by_statement(stmt)
            .all(&self.db)
            .await
            .map_err(db_error)?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn update(&self, user: User) -> UserResult<User> {
        let sql = r#"
            UPDATE users
            SET name = $2, email = $3, password_hash = $4, role = $5, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
        "#;

        let updated = self
            .fetch_one(
                sql,
                vec![
                    user.id.into(),
                    user.name.into(),
                    user.email.into(),
                    user.password_hash.into(),
                    user.role.as_str().into(),
                ],
            )
            .await?
            .ok_or(UserError::NotFound(user.id))?;

        tracing::info!(user_id = %updated.id, "Updated user");
        Ok(updated)
    }

    async fn soft_delete(&self, id: Uuid) -> UserResult<Option<User>> {
        let sql = r#"
            UPDATE users
            SET deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
        "#;

        let deleted = self.fetch_one(sql, vec![id.into()]).await?;
        if deleted.is_some() {
            tracing::info!(user_id = %id, "Soft-deleted user");
        }
        Ok(deleted)
    }

    async fn email_exists(&self, email: &str) -> UserResult<bool> {
        self.exists(
            "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1)) AS found",
            vec![email.into()],
        )
        .await
    }

    async fn email_taken_by_other(&self, email: &str, exclude: Uuid) -> UserResult<bool> {
        self.exists(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM users
                WHERE LOWER(email) = LOWER($1) AND deleted_at IS NULL AND id <> $2
            ) AS found
            "#,
            vec![email.into(), exclude.into()],
        )
        .await
    }
}
