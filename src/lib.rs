//! Library for parallel relational-table ingest
//!
//! This library partitions source tables into independently readable chunks
//! and generates the parameterized range queries downstream readers execute.

pub mod tablestream;

// Re-export main API
pub use tablestream::source::split::{
    split_query, ChunkRange, DynamicChunkSplitter, KeyType, KeyValue, SourceDialect, SourceSplit,
    SplitConfig, SplitError, SplitQuery, SplitResult,
};
pub use tablestream::source::{SourceTable, TablePath};
