//! Database dialect abstraction consumed by the chunk splitter.
//!
//! The splitter never talks to a driver directly; it issues a small set of
//! boundary queries through this trait. Implementations own the physical
//! connection and must hand every call within one splitter pass to the same
//! live connection (stateful server-side cursors need affinity).

use crate::tablestream::source::split::error::SplitResult;
use crate::tablestream::source::split::key::KeyValue;
use crate::tablestream::source::table::{SourceTable, TablePath};
use async_trait::async_trait;

/// Boundary query operations the splitter depends on
///
/// All fallible operations surface adapter failures as
/// [`SplitError::Driver`](crate::tablestream::source::split::SplitError);
/// the splitter propagates them unchanged and never retries.
#[async_trait]
pub trait SourceDialect: Send + Sync {
    /// Query the minimum and maximum value of the split column
    ///
    /// Either bound is `None` when the table is empty.
    async fn query_min_max(
        &self,
        table: &SourceTable,
        column: &str,
    ) -> SplitResult<(Option<KeyValue>, Option<KeyValue>)>;

    /// Approximate row count of the table, from statistics rather than a scan
    async fn approximate_row_count(&self, table: &SourceTable) -> SplitResult<i64>;

    /// Query the largest value among the next `chunk_size` rows strictly after `after`
    ///
    /// The equivalent of
    /// `SELECT MAX(col) FROM (SELECT col FROM t WHERE col > after ORDER BY col LIMIT chunk_size)`.
    /// Rows equal to `after` belong to the previous chunk and must be
    /// excluded from the window. Returns `None` when no rows remain.
    async fn query_next_chunk_max(
        &self,
        table: &SourceTable,
        column: &str,
        chunk_size: usize,
        after: Option<&KeyValue>,
    ) -> SplitResult<Option<KeyValue>>;

    /// Query the smallest column value strictly greater than the given one
    ///
    /// Used to skip past a run of duplicate keys when the chunk max makes no
    /// progress.
    async fn query_min(
        &self,
        table: &SourceTable,
        column: &str,
        strictly_greater_than: &KeyValue,
    ) -> SplitResult<Option<KeyValue>>;

    /// Sample the column at a rate of one row in `inverse_rate`, sorted ascending
    async fn sample_column(
        &self,
        table: &SourceTable,
        column: &str,
        inverse_rate: usize,
    ) -> SplitResult<Vec<KeyValue>>;

    /// Quote a table path into a SQL identifier for this dialect
    fn table_identifier(&self, table_path: &TablePath) -> String;
}
