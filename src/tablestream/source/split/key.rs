//! Split key value and type system.
//!
//! This module contains the value types used by the chunk splitter:
//! - [`KeyValue`] - a value drawn from the split column's domain
//! - [`KeyType`] - the declared SQL domain of the split column
//!
//! Unbounded chunk endpoints are expressed with `Option<KeyValue>`; there is
//! no NULL variant, so "unbounded" and "absent" are never conflated.

use crate::tablestream::source::split::error::{SplitError, SplitResult};
use chrono::{Days, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A value in the split column's domain
///
/// Integer columns narrower than 64 bits widen into `Integer`; unsigned
/// 64-bit columns surface as `Decimal`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum KeyValue {
    /// 64-bit signed integer
    Integer(i64),
    /// 64-bit floating point number
    Float(f64),
    /// Decimal value for precise arithmetic
    Decimal(Decimal),
    /// UTF-8 string
    String(String),
    /// Date (YYYY-MM-DD)
    Date(NaiveDate),
    /// Timestamp (YYYY-MM-DD HH:MM:SS[.nnn])
    Timestamp(NaiveDateTime),
}

impl KeyValue {
    /// Get the domain name for error messages and logging
    pub fn type_name(&self) -> &'static str {
        match self {
            KeyValue::Integer(_) => "INTEGER",
            KeyValue::Float(_) => "FLOAT",
            KeyValue::Decimal(_) => "DECIMAL",
            KeyValue::String(_) => "STRING",
            KeyValue::Date(_) => "DATE",
            KeyValue::Timestamp(_) => "TIMESTAMP",
        }
    }

    /// Compare two key values
    ///
    /// Values of the same domain compare directly. Within the numeric family
    /// (`Integer`, `Float`, `Decimal`) mixed comparison is supported; any
    /// other mixed comparison is a type error.
    pub fn compare(&self, other: &KeyValue) -> SplitResult<Ordering> {
        match (self, other) {
            (KeyValue::Integer(a), KeyValue::Integer(b)) => Ok(a.cmp(b)),
            (KeyValue::Float(a), KeyValue::Float(b)) => Ok(a.total_cmp(b)),
            (KeyValue::Decimal(a), KeyValue::Decimal(b)) => Ok(a.cmp(b)),
            (KeyValue::Integer(a), KeyValue::Decimal(b)) => Ok(Decimal::from(*a).cmp(b)),
            (KeyValue::Decimal(a), KeyValue::Integer(b)) => Ok(a.cmp(&Decimal::from(*b))),
            (KeyValue::Integer(a), KeyValue::Float(b)) => Ok((*a as f64).total_cmp(b)),
            (KeyValue::Float(a), KeyValue::Integer(b)) => Ok(a.total_cmp(&(*b as f64))),
            (KeyValue::String(a), KeyValue::String(b)) => Ok(a.cmp(b)),
            (KeyValue::Date(a), KeyValue::Date(b)) => Ok(a.cmp(b)),
            (KeyValue::Timestamp(a), KeyValue::Timestamp(b)) => Ok(a.cmp(b)),
            _ => Err(SplitError::type_error(
                format!("a value comparable to {}", self.type_name()),
                other.type_name(),
            )),
        }
    }

    /// Subtract another key value, yielding an exact decimal difference
    ///
    /// Used for the distribution factor calculation, where floating point
    /// is not precise enough when the difference approaches 2^63.
    pub fn minus(&self, other: &KeyValue) -> SplitResult<Decimal> {
        match (self, other) {
            (KeyValue::Integer(a), KeyValue::Integer(b)) => {
                Ok(Decimal::from(*a) - Decimal::from(*b))
            }
            (KeyValue::Decimal(a), KeyValue::Decimal(b)) => Ok(a - b),
            (KeyValue::Integer(a), KeyValue::Decimal(b)) => Ok(Decimal::from(*a) - b),
            (KeyValue::Decimal(a), KeyValue::Integer(b)) => Ok(a - Decimal::from(*b)),
            (KeyValue::Float(a), KeyValue::Float(b)) => Decimal::from_f64_retain(a - b)
                .ok_or_else(|| SplitError::type_error("a finite float difference", "FLOAT")),
            (KeyValue::Date(a), KeyValue::Date(b)) => {
                Ok(Decimal::from(a.signed_duration_since(*b).num_days()))
            }
            _ => Err(SplitError::type_error(
                format!("a value subtractable from {}", self.type_name()),
                other.type_name(),
            )),
        }
    }

    /// Advance this key by `stride`, yielding the next chunk boundary
    ///
    /// Integers and decimals advance by the numeric stride, dates advance by
    /// `stride` days. An advance past the domain maximum reports
    /// [`SplitError::Overflow`] so the chunking loop can terminate early.
    pub fn plus(&self, stride: i64) -> SplitResult<KeyValue> {
        match self {
            KeyValue::Integer(v) => v
                .checked_add(stride)
                .map(KeyValue::Integer)
                .ok_or_else(|| SplitError::overflow(self.type_name())),
            KeyValue::Decimal(v) => v
                .checked_add(Decimal::from(stride))
                .map(KeyValue::Decimal)
                .ok_or_else(|| SplitError::overflow(self.type_name())),
            KeyValue::Float(v) => {
                let next = v + stride as f64;
                if next.is_finite() {
                    Ok(KeyValue::Float(next))
                } else {
                    Err(SplitError::overflow(self.type_name()))
                }
            }
            KeyValue::Date(v) => {
                let next = if stride >= 0 {
                    v.checked_add_days(Days::new(stride as u64))
                } else {
                    v.checked_sub_days(Days::new(stride.unsigned_abs()))
                };
                next.map(KeyValue::Date)
                    .ok_or_else(|| SplitError::overflow(self.type_name()))
            }
            KeyValue::String(_) | KeyValue::Timestamp(_) => Err(SplitError::type_error(
                "an evenly-splittable key domain",
                self.type_name(),
            )),
        }
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyValue::Integer(v) => write!(f, "{}", v),
            KeyValue::Float(v) => write!(f, "{}", v),
            KeyValue::Decimal(v) => write!(f, "{}", v),
            KeyValue::String(v) => write!(f, "{}", v),
            KeyValue::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            KeyValue::Timestamp(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S%.3f")),
        }
    }
}

/// Declared SQL domain of the split column
///
/// Parsed from the column's type name when the source table is configured.
/// Domains that admit no total ordering are rejected at parse time, so a
/// splitter never sees them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum KeyType {
    TinyInt,
    SmallInt,
    Int,
    BigInt,
    UnsignedTinyInt,
    UnsignedSmallInt,
    UnsignedInt,
    UnsignedBigInt,
    Decimal { precision: u8, scale: u8 },
    Float,
    Double,
    Char,
    Varchar,
    Date,
    Timestamp,
}

impl KeyType {
    /// Parse a SQL type name into a key type
    ///
    /// Accepts common spellings (`INT`, `INTEGER`, `NUMERIC(10,2)`,
    /// `DOUBLE PRECISION`, ...). Length and precision arguments are parsed
    /// where they matter and stripped where they do not. Unsupported
    /// domains are a configuration error.
    pub fn parse(type_name: &str) -> SplitResult<KeyType> {
        let normalized = type_name.trim().to_uppercase();
        let (base, args) = match normalized.split_once('(') {
            Some((base, rest)) => (base.trim().to_string(), rest.trim_end_matches(')').to_string()),
            None => (normalized.clone(), String::new()),
        };

        match base.as_str() {
            "TINYINT" => Ok(KeyType::TinyInt),
            "SMALLINT" => Ok(KeyType::SmallInt),
            "INT" | "INTEGER" => Ok(KeyType::Int),
            "BIGINT" => Ok(KeyType::BigInt),
            "TINYINT UNSIGNED" => Ok(KeyType::UnsignedTinyInt),
            "SMALLINT UNSIGNED" => Ok(KeyType::UnsignedSmallInt),
            "INT UNSIGNED" | "INTEGER UNSIGNED" => Ok(KeyType::UnsignedInt),
            "BIGINT UNSIGNED" => Ok(KeyType::UnsignedBigInt),
            "DECIMAL" | "NUMERIC" => {
                let mut parts = args.split(',').filter(|p| !p.trim().is_empty());
                let precision = match parts.next() {
                    Some(p) => p.trim().parse::<u8>().map_err(|_| {
                        SplitError::config_error(format!(
                            "Invalid decimal precision in split key type '{}'",
                            type_name
                        ))
                    })?,
                    None => 10,
                };
                let scale = match parts.next() {
                    Some(s) => s.trim().parse::<u8>().map_err(|_| {
                        SplitError::config_error(format!(
                            "Invalid decimal scale in split key type '{}'",
                            type_name
                        ))
                    })?,
                    None => 0,
                };
                Ok(KeyType::Decimal { precision, scale })
            }
            "FLOAT" | "REAL" => Ok(KeyType::Float),
            "DOUBLE" | "DOUBLE PRECISION" => Ok(KeyType::Double),
            "CHAR" => Ok(KeyType::Char),
            "VARCHAR" | "TEXT" | "STRING" => Ok(KeyType::Varchar),
            "DATE" => Ok(KeyType::Date),
            "TIMESTAMP" | "DATETIME" => Ok(KeyType::Timestamp),
            _ => Err(SplitError::config_error(format!(
                "Unsupported split key type '{}', the split key must have an ordered domain",
                type_name
            ))),
        }
    }

    /// Whether the domain supports a finite arithmetic stride
    ///
    /// True for the numeric family and `DATE`. Strings and wide temporal
    /// types cannot be advanced by a stride, so their tables are chunked
    /// with server-computed boundaries instead.
    pub fn is_evenly_splittable(&self) -> bool {
        !matches!(
            self,
            KeyType::Char | KeyType::Varchar | KeyType::Timestamp
        )
    }

    /// Get the domain name for error messages and logging
    pub fn type_name(&self) -> &'static str {
        match self {
            KeyType::TinyInt => "TINYINT",
            KeyType::SmallInt => "SMALLINT",
            KeyType::Int => "INT",
            KeyType::BigInt => "BIGINT",
            KeyType::UnsignedTinyInt => "TINYINT UNSIGNED",
            KeyType::UnsignedSmallInt => "SMALLINT UNSIGNED",
            KeyType::UnsignedInt => "INT UNSIGNED",
            KeyType::UnsignedBigInt => "BIGINT UNSIGNED",
            KeyType::Decimal { .. } => "DECIMAL",
            KeyType::Float => "FLOAT",
            KeyType::Double => "DOUBLE",
            KeyType::Char => "CHAR",
            KeyType::Varchar => "VARCHAR",
            KeyType::Date => "DATE",
            KeyType::Timestamp => "TIMESTAMP",
        }
    }
}
