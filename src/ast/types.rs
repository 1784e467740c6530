use serde::{Deserialize, Serialize};

/// Declared value type of an expression node.
///
/// Fixed when the node is built; the compiler uses it for literal formatting,
/// `CAST` targets and parameter bindings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SqlType {
    Boolean,
    Int,
    BigInt,
    Float,
    Decimal,
    Text,
    Date,
    DateTime,
    Binary,
    /// Store type name passed through verbatim (e.g. `nvarchar(50)`).
    Custom(String),
}

impl SqlType {
    /// Whether values of this type are whole numbers.
    pub fn is_integer(&self) -> bool {
        matches!(self, SqlType::Int | SqlType::BigInt)
    }
}

impl std::fmt::Display for SqlType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SqlType::Boolean => write!(f, "BOOLEAN"),
            SqlType::Int => write!(f, "INTEGER"),
            SqlType::BigInt => write!(f, "BIGINT"),
            SqlType::Float => write!(f, "DOUBLE PRECISION"),
            SqlType::Decimal => write!(f, "DECIMAL"),
            SqlType::Text => write!(f, "VARCHAR"),
            SqlType::Date => write!(f, "DATE"),
            SqlType::DateTime => write!(f, "TIMESTAMP"),
            SqlType::Binary => write!(f, "VARBINARY"),
            SqlType::Custom(name) => write!(f, "{}", name),
        }
    }
}
