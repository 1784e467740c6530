use crate::ast::{SqlType, Value};
use crate::error::RelSqlResult;
use crate::transpiler::traits::{SqlGenerator, hex, standard_literal};

pub struct PostgresGenerator;

impl SqlGenerator for PostgresGenerator {
    fn name(&self) -> &str {
        "postgres"
    }

    fn placeholder(&self, index: usize) -> String {
        format!("${}", index)
    }

    fn literal_sql(&self, value: &Value, ty: &SqlType) -> RelSqlResult<String> {
        match value {
            Value::Bytes(b) => Ok(format!("'\\x{}'::bytea", hex(b))),
            _ => standard_literal(self, value, ty),
        }
    }

    fn type_name(&self, ty: &SqlType) -> String {
        match ty {
            SqlType::Boolean => "boolean".to_string(),
            SqlType::Int => "integer".to_string(),
            SqlType::BigInt => "bigint".to_string(),
            SqlType::Float => "double precision".to_string(),
            SqlType::Decimal => "numeric".to_string(),
            SqlType::Text => "text".to_string(),
            SqlType::Date => "date".to_string(),
            SqlType::DateTime => "timestamp".to_string(),
            SqlType::Binary => "bytea".to_string(),
            SqlType::Custom(name) => name.clone(),
        }
    }
}
