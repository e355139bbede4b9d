//! SQLite repository adapter.
#![allow(clippy::collapsible_if)]

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::str::FromStr;

use currency_types::{
    ConversionId, ConversionRecord, HistoryRepository, HistorySession, NewConversion, RepoError,
    domain::ensure_positive_count,
};

use crate::types::{CONVERSION_COLUMNS, DbConversionText, timestamp_text};

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Repository
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite repository implementation.
pub struct SqliteRepo {
    pool: SqlitePool,
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

impl SqliteRepo {
    /// Creates a new SQLite repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            // Remove query parameters
            let path = path.split('?').next().unwrap_or(path);
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        // An in-memory database lives exactly as long as its connection.
        let pool = if is_in_memory(database_url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePool::connect_with(options).await?
        };

        let repo = Self { pool };
        repo.create_schema().await?;
        Ok(repo)
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates the database schema (idempotent).
    pub async fn create_schema(&self) -> Result<(), RepoError> {
        let ddl = include_str!("../migrations/0001_create_conversion_history.sql");
        sqlx::query(ddl)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(())
    }

    async fn fetch(&self, sql: &str, limit: Option<i64>) -> Result<Vec<ConversionRecord>, RepoError> {
        let mut query = sqlx::query_as::<_, DbConversionText>(sql);
        if let Some(limit) = limit {
            query = query.bind(limit);
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        rows.into_iter().map(DbConversionText::into_domain).collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Write session
// ─────────────────────────────────────────────────────────────────────────────

/// A SQLite transaction that rows are staged into.
pub struct SqliteSession {
    tx: Transaction<'static, Sqlite>,
    added: u64,
}

#[async_trait]
impl HistorySession for SqliteSession {
    async fn add(&mut self, record: NewConversion) -> Result<ConversionRecord, RepoError> {
        let sql = "INSERT INTO conversion_history \
             (from_currency, to_currency, amount, converted_amount, exchange_rate, conversion_date, client_ip) \
             VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING id";

        let (id,): (i64,) = sqlx::query_as(sql)
            .bind(record.from_currency.code())
            .bind(record.to_currency.code())
            .bind(record.amount.to_string())
            .bind(record.converted_amount.to_string())
            .bind(record.exchange_rate.to_string())
            .bind(timestamp_text(&record.conversion_date))
            .bind(&record.client_ip)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        self.added += 1;
        Ok(ConversionRecord::from_new(ConversionId::new(id), record))
    }

    async fn commit(self) -> Result<u64, RepoError> {
        self.tx
            .commit()
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;
        Ok(self.added)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl HistoryRepository for SqliteRepo {
    type Session = SqliteSession;

    async fn begin(&self) -> Result<SqliteSession, RepoError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;
        Ok(SqliteSession { tx, added: 0 })
    }

    async fn get_by_id(&self, id: ConversionId) -> Result<Option<ConversionRecord>, RepoError> {
        let sql = format!(
            "SELECT {} FROM conversion_history WHERE id = ?",
            CONVERSION_COLUMNS
        );

        let row: Option<DbConversionText> = sqlx::query_as(&sql)
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(DbConversionText::into_domain).transpose()
    }

    async fn get_all(&self) -> Result<Vec<ConversionRecord>, RepoError> {
        let sql = format!(
            "SELECT {} FROM conversion_history ORDER BY conversion_date DESC, id DESC",
            CONVERSION_COLUMNS
        );
        self.fetch(&sql, None).await
    }

    async fn get_recent(&self, count: i64) -> Result<Vec<ConversionRecord>, RepoError> {
        let count = ensure_positive_count(count)?;
        let sql = format!(
            "SELECT {} FROM conversion_history ORDER BY conversion_date DESC, id DESC LIMIT ?",
            CONVERSION_COLUMNS
        );
        self.fetch(&sql, Some(count)).await
    }
}
