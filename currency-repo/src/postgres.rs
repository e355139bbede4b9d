//! PostgreSQL repository adapter.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use currency_types::{
    ConversionId, ConversionRecord, HistoryRepository, HistorySession, NewConversion, RepoError,
    domain::ensure_positive_count,
};

use crate::types::{CONVERSION_COLUMNS, DbConversion};

// ─────────────────────────────────────────────────────────────────────────────
// PostgreSQL Repository
// ─────────────────────────────────────────────────────────────────────────────

/// PostgreSQL history repository.
pub struct PostgresRepo {
    pool: PgPool,
}

/// Executes SQL statements from a migration file, splitting by semicolons.
async fn execute_migration(pool: &PgPool, sql: &str, name: &str) -> Result<(), anyhow::Error> {
    for statement in sql.split(';') {
        let stmt = statement.trim();
        if !stmt.is_empty() {
            sqlx::query(stmt)
                .execute(pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration {} failed: {}", name, e))?;
        }
    }
    Ok(())
}

/// Runs all database migrations.
async fn run_migrations(pool: &PgPool) -> Result<(), anyhow::Error> {
    execute_migration(
        pool,
        include_str!("../migrations/0001_create_conversion_history_pg.sql"),
        "0001",
    )
    .await
}

impl PostgresRepo {
    /// Creates a new PostgreSQL repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the database schema (for testing with existing pool).
    pub async fn create_schema(&self) -> Result<(), RepoError> {
        run_migrations(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Write session
// ─────────────────────────────────────────────────────────────────────────────

/// A PostgreSQL transaction that rows are staged into.
pub struct PostgresSession {
    tx: Transaction<'static, Postgres>,
    added: u64,
}

#[async_trait]
impl HistorySession for PostgresSession {
    async fn add(&mut self, record: NewConversion) -> Result<ConversionRecord, RepoError> {
        let sql = "INSERT INTO conversion_history \
             (from_currency, to_currency, amount, converted_amount, exchange_rate, conversion_date, client_ip) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id";

        let (id,): (i64,) = sqlx::query_as(sql)
            .bind(record.from_currency.code())
            .bind(record.to_currency.code())
            .bind(record.amount)
            .bind(record.converted_amount)
            .bind(record.exchange_rate)
            .bind(record.conversion_date)
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
impl HistoryRepository for PostgresRepo {
    type Session = PostgresSession;

    async fn begin(&self) -> Result<PostgresSession, RepoError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;
        Ok(PostgresSession { tx, added: 0 })
    }

    async fn get_by_id(&self, id: ConversionId) -> Result<Option<ConversionRecord>, RepoError> {
        let sql = format!(
            "SELECT {} FROM conversion_history WHERE id = $1",
            CONVERSION_COLUMNS
        );

        let row: Option<DbConversion> = sqlx::query_as(&sql)
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(DbConversion::into_domain).transpose()
    }

    async fn get_all(&self) -> Result<Vec<ConversionRecord>, RepoError> {
        let sql = format!(
            "SELECT {} FROM conversion_history ORDER BY conversion_date DESC, id DESC",
            CONVERSION_COLUMNS
        );

        let rows: Vec<DbConversion> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        rows.into_iter().map(DbConversion::into_domain).collect()
    }

    async fn get_recent(&self, count: i64) -> Result<Vec<ConversionRecord>, RepoError> {
        let count = ensure_positive_count(count)?;
        let sql = format!(
            "SELECT {} FROM conversion_history ORDER BY conversion_date DESC, id DESC LIMIT $1",
            CONVERSION_COLUMNS
        );

        let rows: Vec<DbConversion> = sqlx::query_as(&sql)
            .bind(count)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        rows.into_iter().map(DbConversion::into_domain).collect()
    }
}
