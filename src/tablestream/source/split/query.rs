//! Range predicate generation for split queries.
//!
//! Turns a [`SourceSplit`] into the SQL a downstream reader executes: the
//! base query plus a WHERE clause with `?` placeholders, and the ordered
//! values to bind to them.

use crate::tablestream::source::split::chunk::SourceSplit;
use crate::tablestream::source::split::dialect::SourceDialect;
use crate::tablestream::source::split::key::KeyValue;

/// A parameterized split query: SQL with `?` placeholders plus the bind
/// values in placeholder order
#[derive(Debug, Clone, PartialEq)]
pub struct SplitQuery {
    pub sql: String,
    pub params: Vec<KeyValue>,
}

/// Generate the range query for one split
///
/// Predicate shape by case:
///
/// | start | end | WHERE clause |
/// |---|---|---|
/// | null  | null | (none) |
/// | null  | E    | `col <= ? AND NOT (col = ?)` |
/// | S     | null | `col >= ?` |
/// | S     | E    | `col >= ? AND NOT (col = ?) AND col <= ?` |
///
/// The `<= ? AND NOT (= ?)` idiom replaces `< ?` so the server can plan an
/// index equality probe on the boundary value; paired with the next chunk's
/// `>=`, every boundary row lands in exactly one chunk.
pub fn split_query(split: &SourceSplit, dialect: &dyn SourceDialect) -> SplitQuery {
    let column = split.key_name.as_str();
    let mut condition = String::new();
    let mut params = Vec::new();

    match (&split.start, &split.end) {
        (None, None) => {}
        (None, Some(end)) => {
            condition.push_str(column);
            condition.push_str(" <= ? AND NOT (");
            condition.push_str(column);
            condition.push_str(" = ?)");
            params.push(end.clone());
            params.push(end.clone());
        }
        (Some(start), None) => {
            condition.push_str(column);
            condition.push_str(" >= ?");
            params.push(start.clone());
        }
        (Some(start), Some(end)) => {
            condition.push_str(column);
            condition.push_str(" >= ? AND NOT (");
            condition.push_str(column);
            condition.push_str(" = ?) AND ");
            condition.push_str(column);
            condition.push_str(" <= ?");
            params.push(start.clone());
            params.push(end.clone());
            params.push(end.clone());
        }
    }

    let base = match &split.query {
        Some(query) if !query.trim().is_empty() => format!("SELECT * FROM ({}) tmp", query),
        _ => format!(
            "SELECT * FROM {}",
            dialect.table_identifier(&split.table_path)
        ),
    };

    let sql = if condition.is_empty() {
        base
    } else {
        format!("{} WHERE {}", base, condition)
    };

    SplitQuery { sql, params }
}
