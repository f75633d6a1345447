use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DbBackend, FromQueryResult, Statement};
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::User;
use crate::repository::UserRepository;

/// PostgreSQL implementation of UserRepository using SeaORM
#[derive(Clone)]
pub struct PgUserRepository {
    db: sea_orm::DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: sea_orm::DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Helper struct for deserializing user rows
#[derive(Debug, FromQueryResult)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    is_admin: bool,
    is_active: bool,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            is_admin: row.is_admin,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Map unique-constraint violations onto the matching domain error.
///
/// The constraints are the authoritative uniqueness guard; the service's
/// pre-checks only exist for friendlier messages without contention.
fn map_unique_violation(err: sea_orm::DbErr, user: &User) -> UserError {
    let msg = err.to_string();
    if msg.contains("duplicate key") || msg.contains("unique constraint") {
        if msg.contains("username") {
            UserError::DuplicateUsername(user.username.clone())
        } else {
            UserError::DuplicateEmail(user.email.clone())
        }
    } else {
        UserError::Internal(format!("Database error: {}", err))
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: User) -> UserResult<User> {
        let sql = r#"
            INSERT INTO users (id, username, email, password_hash, is_admin, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
        "#;

        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [
                user.id.into(),
                user.username.clone().into(),
                user.email.clone().into(),
                user.password_hash.clone().into(),
                user.is_admin.into(),
                user.is_active.into(),
                user.created_at.into(),
                user.updated_at.into(),
            ],
        );

        let row = UserRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(|e| map_unique_violation(e, &user))?
            .ok_or_else(|| UserError::Internal("Failed to create user".to_string()))?;

        tracing::info!(user_id = %user.id, username = %user.username, "Created user");
        Ok(row.into())
    }

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            "SELECT * FROM users WHERE id = $1",
            [id.into()],
        );

        let row = UserRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(|e| UserError::Internal(format!("Database error: {}", e)))?;

        Ok(row.map(|r| r.into()))
    }

    async fn get_by_username(&self, username: &str) -> UserResult<Option<User>> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            "SELECT * FROM users WHERE username = $1",
            [username.into()],
        );

        let row = UserRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(|e| UserError::Internal(format!("Database error: {}", e)))?;

        Ok(row.map(|r| r.into()))
    }

    async fn list(&self) -> UserResult<Vec<User>> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            "SELECT * FROM users ORDER BY created_at DESC",
            [],
        );

        let rows = UserRow::find_by_statement(stmt)
            .all(&self.db)
            .await
            .map_err(|e| UserError::Internal(format!("Database error: {}", e)))?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn update(&self, user: User) -> UserResult<User> {
        let sql = r#"
            UPDATE users
            SET username = $2, email = $3, password_hash = $4, is_admin = $5,
                is_active = $6, updated_at = $7
            WHERE id = $1
            RETURNING *
        "#;

        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [
                user.id.into(),
                user.username.clone().into(),
                user.email.clone().into(),
                user.password_hash.clone().into(),
                user.is_admin.into(),
                user.is_active.into(),
                user.updated_at.into(),
            ],
        );

        let row = UserRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(|e| map_unique_violation(e, &user))?
            .ok_or(UserError::NotFound(user.id))?;

        tracing::info!(user_id = %user.id, "Updated user");
        Ok(row.into())
    }

    async fn delete(&self, id: Uuid) -> UserResult<bool> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            "DELETE FROM users WHERE id = $1",
            [id.into()],
        );

        let result = self
            .db
            .execute_raw(stmt)
            .await
            .map_err(|e| UserError::Internal(format!("Database error: {}", e)))?;

        if result.rows_affected() > 0 {
            tracing::info!(user_id = %id, "Deleted user");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn email_exists(&self, email: &str, exclude: Option<Uuid>) -> UserResult<bool> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND ($2::uuid IS NULL OR id != $2)) AS found",
            [email.into(), exclude.into()],
        );

        exists_query(&self.db, stmt).await
    }

    async fn username_exists(&self, username: &str, exclude: Option<Uuid>) -> UserResult<bool> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 AND ($2::uuid IS NULL OR id != $2)) AS found",
            [username.into(), exclude.into()],
        );

        exists_query(&self.db, stmt).await
    }

    async fn has_active_orders(&self, user_id: Uuid) -> UserResult<bool> {
        // Active means not yet completed or canceled. An order whose
        // status reference is somehow missing counts as active.
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"
            SELECT EXISTS(
                SELECT 1
                FROM orders o
                LEFT JOIN order_statuses s ON o.status_id = s.id
                WHERE o.user_id = $1
                  AND (s.name IS NULL OR s.name NOT IN ('completed', 'canceled'))
            ) AS found
            "#,
            [user_id.into()],
        );

        exists_query(&self.db, stmt).await
    }
}

async fn exists_query(
    db: &sea_orm::DatabaseConnection,
    stmt: Statement,
) -> UserResult<bool> {
    let row = db
        .query_one_raw(stmt)
        .await
        .map_err(|e| UserError::Internal(format!("Database error: {}", e)))?;

    row.map(|r| r.try_get("", "found"))
        .transpose()
        .map_err(|e| UserError::Internal(format!("Database error: {}", e)))
        .map(|found| found.unwrap_or(false))
}
