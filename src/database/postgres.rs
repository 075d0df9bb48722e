use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::types::Json;
use sqlx::{Postgres, Row};
use tracing::{debug, info};
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::Account;
use crate::database::repository::{AccountRepository, ACCOUNTS_TABLE};
use crate::filter::{Filter, SqlParam, SqlResult};

const SCHEMA: [&str; 3] = [
    r#"CREATE TABLE IF NOT EXISTS "accounts" (
        "id" UUID PRIMARY KEY,
        "email" TEXT NOT NULL,
        "role" TEXT NOT NULL,
        "password_hash" TEXT NOT NULL,
        "document" JSONB NOT NULL,
        "created_at" TIMESTAMPTZ NOT NULL,
        "updated_at" TIMESTAMPTZ NOT NULL
    )"#,
    r#"CREATE UNIQUE INDEX IF NOT EXISTS "accounts_email_key" ON "accounts" (lower("email"))"#,
    r#"CREATE INDEX IF NOT EXISTS "accounts_role_idx" ON "accounts" ("role")"#,
];

/// Account documents stored as JSONB rows.
pub struct PostgresAccountRepository {
    manager: DatabaseManager,
    debug_logging: bool,
}

impl PostgresAccountRepository {
    pub fn new(manager: DatabaseManager, debug_logging: bool) -> Self {
        Self { manager, debug_logging }
    }

    /// Create the accounts table and its indexes when missing.
    pub async fn ensure_schema(&self) -> Result<(), DatabaseError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(self.manager.pool()).await?;
        }
        info!("Schema ready: {}", ACCOUNTS_TABLE);
        Ok(())
    }

    fn log_query(&self, sql: &SqlResult) {
        if self.debug_logging {
            debug!(query = %sql.query, params = sql.params.len(), "compiled filter");
        }
    }
}

fn bind_params<'q>(
    mut q: sqlx::query::Query<'q, Postgres, PgArguments>,
    params: &[SqlParam],
) -> sqlx::query::Query<'q, Postgres, PgArguments> {
    for param in params {
        q = match param {
            SqlParam::Json(value) => q.bind(Json(value.clone())),
            SqlParam::Text(text) => q.bind(text.clone()),
        };
    }
    q
}

fn document(row: &PgRow) -> Result<Account, DatabaseError> {
    let Json(account) = row.try_get::<Json<Account>, _>("document")?;
    Ok(account)
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn insert(&self, account: &Account, password_hash: &str) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"INSERT INTO "accounts" ("id", "email", "role", "password_hash", "document", "created_at", "updated_at")
               VALUES ($1, $2, $3, $4, $5, $6, $7)"#,
        )
        .bind(account.id)
        .bind(&account.email)
        .bind(account.role.as_str())
        .bind(password_hash)
        .bind(Json(account))
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(self.manager.pool())
        .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, DatabaseError> {
        let row = sqlx::query(r#"SELECT "document" FROM "accounts" WHERE "id" = $1"#)
            .bind(id)
            .fetch_optional(self.manager.pool())
            .await?;
        row.as_ref().map(document).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DatabaseError> {
        let row = sqlx::query(r#"SELECT "document" FROM "accounts" WHERE lower("email") = lower($1)"#)
            .bind(email)
            .fetch_optional(self.manager.pool())
            .await?;
        row.as_ref().map(document).transpose()
    }

    async fn find_credentials(&self, email: &str) -> Result<Option<(Account, String)>, DatabaseError> {
        let row = sqlx::query(r#"SELECT "document", "password_hash" FROM "accounts" WHERE lower("email") = lower($1)"#)
            .bind(email)
            .fetch_optional(self.manager.pool())
            .await?;
        match row {
            Some(row) => {
                let hash: String = row.try_get("password_hash")?;
                Ok(Some((document(&row)?, hash)))
            }
            None => Ok(None),
        }
    }

    async fn find_password_hash(&self, id: Uuid) -> Result<Option<String>, DatabaseError> {
        let hash = sqlx::query_scalar::<_, String>(r#"SELECT "password_hash" FROM "accounts" WHERE "id" = $1"#)
            .bind(id)
            .fetch_optional(self.manager.pool())
            .await?;
        Ok(hash)
    }

    async fn replace(&self, account: &Account) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            r#"UPDATE "accounts" SET "email" = $2, "role" = $3, "document" = $4, "updated_at" = $5 WHERE "id" = $1"#,
        )
        .bind(account.id)
        .bind(&account.email)
        .bind(account.role.as_str())
        .bind(Json(account))
        .bind(account.updated_at)
        .execute(self.manager.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query(r#"UPDATE "accounts" SET "password_hash" = $2 WHERE "id" = $1"#)
            .bind(id)
            .bind(password_hash)
            .execute(self.manager.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query(r#"DELETE FROM "accounts" WHERE "id" = $1"#)
            .bind(id)
            .execute(self.manager.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn select(&self, filter: &Filter) -> Result<Vec<Account>, DatabaseError> {
        let sql = filter.to_sql()?;
        self.log_query(&sql);
        let rows = bind_params(sqlx::query(&sql.query), &sql.params)
            .fetch_all(self.manager.pool())
            .await?;
        rows.iter().map(document).collect()
    }

    async fn count(&self, filter: &Filter) -> Result<i64, DatabaseError> {
        let sql = filter.to_count_sql()?;
        self.log_query(&sql);
        let row = bind_params(sqlx::query(&sql.query), &sql.params)
            .fetch_one(self.manager.pool())
            .await?;
        let count: i64 = row.try_get("count")?;
        Ok(count)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.manager.health_check().await
    }

    async fn close(&self) {
        self.manager.close().await;
    }
}
