//! History store port traits.
//!
//! Adapters (Postgres, SQLite, in-memory) implement these traits.

use crate::domain::{ConversionId, ConversionRecord, NewConversion};
use crate::error::RepoError;

/// Read access to stored conversions, plus the entry point for writes.
///
/// Listings are ordered newest first; records sharing a timestamp are
/// ordered by descending id.
#[async_trait::async_trait]
pub trait HistoryRepository: Send + Sync + 'static {
    type Session: HistorySession;

    /// Opens a write session. Nothing it adds is visible until commit.
    async fn begin(&self) -> Result<Self::Session, RepoError>;

    /// Gets a record by ID.
    async fn get_by_id(&self, id: ConversionId) -> Result<Option<ConversionRecord>, RepoError>;

    /// Lists every record.
    async fn get_all(&self) -> Result<Vec<ConversionRecord>, RepoError>;

    /// Lists at most `count` records. Fails with `InvalidArgument` when `count <= 0`.
    async fn get_recent(&self, count: i64) -> Result<Vec<ConversionRecord>, RepoError>;
}

/// A unit of work over the history store.
///
/// Dropping a session without calling [`HistorySession::commit`] discards
/// everything it added.
#[async_trait::async_trait]
pub trait HistorySession: Send {
    /// Stages a record and returns it with its assigned id.
    async fn add(&mut self, record: NewConversion) -> Result<ConversionRecord, RepoError>;

    /// Makes staged records durable. Returns the number of rows written.
    async fn commit(self) -> Result<u64, RepoError>;
}
