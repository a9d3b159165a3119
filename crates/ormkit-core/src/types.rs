//! SQL type tags for model fields.
//!
//! Each field descriptor carries a semantic type tag that downstream layers
//! (DDL generation, drivers) translate into a concrete database type.

use serde::Serialize;

/// Semantic SQL type of a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SqlType {
    /// 16-bit integer.
    SmallInt,
    /// 32-bit integer.
    Integer,
    /// 64-bit integer.
    BigInt,
    /// 32-bit floating point.
    Float,
    /// 64-bit floating point.
    Double,
    /// Fixed-point decimal with precision (total digits) and scale.
    Decimal { precision: u8, scale: u8 },
    /// Unbounded text.
    Text,
    /// Bounded text.
    Varchar { length: u32 },
    /// Boolean.
    Boolean,
    /// Calendar date.
    Date,
    /// Date and time.
    DateTime,
    /// JSON document.
    Json,
    /// UUID.
    Uuid,
    /// Raw bytes.
    Blob,
}

impl SqlType {
    /// The SQL name of this type, suitable for DDL output.
    #[must_use]
    pub fn sql_name(&self) -> String {
        match self {
            SqlType::SmallInt => "SMALLINT".to_string(),
            SqlType::Integer => "INTEGER".to_string(),
            SqlType::BigInt => "BIGINT".to_string(),
            SqlType::Float => "REAL".to_string(),
            SqlType::Double => "DOUBLE PRECISION".to_string(),
            SqlType::Decimal { precision, scale } => {
                format!("DECIMAL({}, {})", precision, scale)
            }
            SqlType::Text => "TEXT".to_string(),
            SqlType::Varchar { length } => format!("VARCHAR({})", length),
            SqlType::Boolean => "BOOLEAN".to_string(),
            SqlType::Date => "DATE".to_string(),
            SqlType::DateTime => "TIMESTAMP".to_string(),
            SqlType::Json => "JSON".to_string(),
            SqlType::Uuid => "UUID".to_string(),
            SqlType::Blob => "BLOB".to_string(),
        }
    }

    /// Whether values of this type are numeric.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(
            self,
            SqlType::SmallInt
                | SqlType::Integer
                | SqlType::BigInt
                | SqlType::Float
                | SqlType::Double
                | SqlType::Decimal { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_name_scalar() {
        assert_eq!(SqlType::Integer.sql_name(), "INTEGER");
        assert_eq!(SqlType::Text.sql_name(), "TEXT");
        assert_eq!(SqlType::Boolean.sql_name(), "BOOLEAN");
    }

    #[test]
    fn test_sql_name_parameterized() {
        assert_eq!(
            SqlType::Decimal {
                precision: 10,
                scale: 2
            }
            .sql_name(),
            "DECIMAL(10, 2)"
        );
        assert_eq!(SqlType::Varchar { length: 255 }.sql_name(), "VARCHAR(255)");
    }

    #[test]
    fn test_is_numeric() {
        assert!(SqlType::BigInt.is_numeric());
        assert!(
            SqlType::Decimal {
                precision: 8,
                scale: 2
            }
            .is_numeric()
        );
        assert!(!SqlType::Text.is_numeric());
    }
}
