//! Chunk ranges and the splits composed from them.

use crate::tablestream::source::split::error::{SplitError, SplitResult};
use crate::tablestream::source::split::key::{KeyType, KeyValue};
use crate::tablestream::source::table::TablePath;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A half-open interval of split key values assigned to one reader
///
/// `None` endpoints are sentinels: `start == None` means unbounded below
/// (first chunk), `end == None` means unbounded above (last chunk), both
/// `None` means a full table scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRange {
    start: Option<KeyValue>,
    end: Option<KeyValue>,
}

impl ChunkRange {
    /// The fully unbounded range: a full table scan as one chunk
    pub fn all() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    /// Create a range, enforcing endpoint distinctness
    ///
    /// When both endpoints are present they must compare unequal; a chunk
    /// with `start == end` would match no rows under the generated
    /// predicates.
    pub fn of(start: Option<KeyValue>, end: Option<KeyValue>) -> SplitResult<Self> {
        if let (Some(s), Some(e)) = (&start, &end) {
            if s == e {
                return Err(SplitError::config_error(format!(
                    "Chunk start {} shouldn't be equal to chunk end {}",
                    s, e
                )));
            }
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> Option<&KeyValue> {
        self.start.as_ref()
    }

    pub fn end(&self) -> Option<&KeyValue> {
        self.end.as_ref()
    }

    /// Consume the range into its endpoints
    pub fn into_bounds(self) -> (Option<KeyValue>, Option<KeyValue>) {
        (self.start, self.end)
    }
}

impl fmt::Display for ChunkRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fmt_bound = |b: &Option<KeyValue>| match b {
            Some(v) => v.to_string(),
            None => "null".to_string(),
        };
        write!(f, "[{}, {})", fmt_bound(&self.start), fmt_bound(&self.end))
    }
}

/// One unit of parallel table reading, handed to the enumerator
///
/// Serializable so the enumerator can checkpoint pending splits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSplit {
    pub table_path: TablePath,
    pub split_id: String,
    pub query: Option<String>,
    pub key_name: String,
    pub key_type: KeyType,
    pub start: Option<KeyValue>,
    pub end: Option<KeyValue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_endpoints_rejected() {
        let result = ChunkRange::of(Some(KeyValue::Integer(7)), Some(KeyValue::Integer(7)));
        assert!(matches!(result, Err(SplitError::ConfigError { .. })));
    }

    #[test]
    fn test_unbounded_endpoints_allowed() {
        assert_eq!(ChunkRange::all(), ChunkRange::of(None, None).unwrap());
        let first = ChunkRange::of(None, Some(KeyValue::Integer(10))).unwrap();
        assert!(first.start().is_none());
        assert_eq!(first.end(), Some(&KeyValue::Integer(10)));
    }
}
