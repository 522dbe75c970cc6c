//! Split query generation and checkpoint serialization tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tablestream::{
    split_query, KeyType, KeyValue, SourceDialect, SourceSplit, SourceTable, SplitResult,
    TablePath,
};

/// Dialect stub: split query generation only needs identifier quoting.
struct QuotingDialect;

#[async_trait]
impl SourceDialect for QuotingDialect {
    async fn query_min_max(
        &self,
        _table: &SourceTable,
        _column: &str,
    ) -> SplitResult<(Option<KeyValue>, Option<KeyValue>)> {
        unimplemented!("not used by query generation")
    }

    async fn approximate_row_count(&self, _table: &SourceTable) -> SplitResult<i64> {
        unimplemented!("not used by query generation")
    }

    async fn query_next_chunk_max(
        &self,
        _table: &SourceTable,
        _column: &str,
        _chunk_size: usize,
        _after: Option<&KeyValue>,
    ) -> SplitResult<Option<KeyValue>> {
        unimplemented!("not used by query generation")
    }

    async fn query_min(
        &self,
        _table: &SourceTable,
        _column: &str,
        _strictly_greater_than: &KeyValue,
    ) -> SplitResult<Option<KeyValue>> {
        unimplemented!("not used by query generation")
    }

    async fn sample_column(
        &self,
        _table: &SourceTable,
        _column: &str,
        _inverse_rate: usize,
    ) -> SplitResult<Vec<KeyValue>> {
        unimplemented!("not used by query generation")
    }

    fn table_identifier(&self, table_path: &TablePath) -> String {
        format!("`{}`.`{}`", table_path.database.as_deref().unwrap_or(""), table_path.table)
    }
}

fn split(start: Option<KeyValue>, end: Option<KeyValue>) -> SourceSplit {
    SourceSplit {
        table_path: TablePath::of("shop", "orders"),
        split_id: "shop.orders-0".to_string(),
        query: None,
        key_name: "id".to_string(),
        key_type: KeyType::BigInt,
        start,
        end,
    }
}

fn placeholder_count(sql: &str) -> usize {
    sql.matches('?').count()
}

#[test]
fn test_full_scan_split_has_no_predicate() {
    let query = split_query(&split(None, None), &QuotingDialect);
    assert_eq!(query.sql, "SELECT * FROM `shop`.`orders`");
    assert!(query.params.is_empty());
    assert_eq!(placeholder_count(&query.sql), query.params.len());
}

#[test]
fn test_first_split_excludes_boundary_equality() {
    let query = split_query(&split(None, Some(KeyValue::Integer(10))), &QuotingDialect);
    assert_eq!(
        query.sql,
        "SELECT * FROM `shop`.`orders` WHERE id <= ? AND NOT (id = ?)"
    );
    assert_eq!(
        query.params,
        vec![KeyValue::Integer(10), KeyValue::Integer(10)]
    );
    assert_eq!(placeholder_count(&query.sql), query.params.len());
}

#[test]
fn test_last_split_is_closed_below() {
    let query = split_query(&split(Some(KeyValue::Integer(91)), None), &QuotingDialect);
    assert_eq!(query.sql, "SELECT * FROM `shop`.`orders` WHERE id >= ?");
    assert_eq!(query.params, vec![KeyValue::Integer(91)]);
    assert_eq!(placeholder_count(&query.sql), query.params.len());
}

#[test]
fn test_middle_split_binds_start_then_end_twice() {
    let query = split_query(
        &split(Some(KeyValue::Integer(5)), Some(KeyValue::Integer(10))),
        &QuotingDialect,
    );
    assert_eq!(
        query.sql,
        "SELECT * FROM `shop`.`orders` WHERE id >= ? AND NOT (id = ?) AND id <= ?"
    );
    assert_eq!(
        query.params,
        vec![
            KeyValue::Integer(5),
            KeyValue::Integer(10),
            KeyValue::Integer(10)
        ]
    );
    assert_eq!(placeholder_count(&query.sql), query.params.len());
}

#[test]
fn test_user_query_is_wrapped_as_subquery() {
    let mut with_query = split(Some(KeyValue::Integer(5)), None);
    with_query.query = Some("SELECT id, amount FROM orders WHERE amount > 100".to_string());
    let query = split_query(&with_query, &QuotingDialect);
    assert_eq!(
        query.sql,
        "SELECT * FROM (SELECT id, amount FROM orders WHERE amount > 100) tmp WHERE id >= ?"
    );
    assert_eq!(query.params, vec![KeyValue::Integer(5)]);
}

#[test]
fn test_blank_user_query_falls_back_to_table_scan() {
    let mut with_query = split(None, None);
    with_query.query = Some("   ".to_string());
    let query = split_query(&with_query, &QuotingDialect);
    assert_eq!(query.sql, "SELECT * FROM `shop`.`orders`");
}

#[test]
fn test_splits_round_trip_through_checkpoint_json() {
    let splits = vec![
        split(None, Some(KeyValue::Integer(10))),
        SourceSplit {
            table_path: TablePath::full("shop", "public", "ledger"),
            split_id: "shop.public.ledger-3".to_string(),
            query: Some("SELECT * FROM ledger".to_string()),
            key_name: "balance".to_string(),
            key_type: KeyType::Decimal {
                precision: 12,
                scale: 4,
            },
            start: Some(KeyValue::Decimal(Decimal::new(123_456, 2))),
            end: Some(KeyValue::Decimal(Decimal::new(987_654, 2))),
        },
        SourceSplit {
            table_path: TablePath::of("shop", "shipments"),
            split_id: "shop.shipments-1".to_string(),
            query: None,
            key_name: "shipped_on".to_string(),
            key_type: KeyType::Date,
            start: Some(KeyValue::Date(
                NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            )),
            end: None,
        },
    ];

    let encoded = serde_json::to_string(&splits).unwrap();
    let decoded: Vec<SourceSplit> = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, splits);
}
