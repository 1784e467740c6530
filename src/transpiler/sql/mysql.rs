use crate::ast::{SqlExpr, SqlType};
use crate::error::RelSqlResult;
use crate::transpiler::generator::Compilation;
use crate::transpiler::traits::SqlGenerator;

/// Largest row count MySQL accepts; stands in for "no limit" before OFFSET.
const UNBOUNDED_LIMIT: &str = "18446744073709551615";

pub struct MysqlGenerator;

impl SqlGenerator for MysqlGenerator {
    fn name(&self) -> &str {
        "mysql"
    }

    fn quote_identifier(&self, id: &str) -> String {
        format!("`{}`", id.replace('`', "``"))
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn string_literal(&self, s: &str) -> String {
        format!("'{}'", s.replace('\\', "\\\\").replace('\'', "''"))
    }

    fn type_name(&self, ty: &SqlType) -> String {
        match ty {
            SqlType::Boolean | SqlType::Int | SqlType::BigInt => "SIGNED".to_string(),
            SqlType::Float => "DOUBLE".to_string(),
            SqlType::Decimal => "DECIMAL(65, 30)".to_string(),
            SqlType::Text => "CHAR".to_string(),
            SqlType::Date => "DATE".to_string(),
            SqlType::DateTime => "DATETIME".to_string(),
            SqlType::Binary => "BINARY".to_string(),
            SqlType::Custom(name) => name.clone(),
        }
    }

    // || is logical OR in MySQL
    fn concat_operator(&self) -> Option<&str> {
        None
    }

    fn render_limit_offset_clause(
        &self,
        cx: &mut Compilation<'_>,
        limit: Option<&SqlExpr>,
        offset: Option<&SqlExpr>,
    ) -> RelSqlResult<()> {
        cx.append(" LIMIT ");
        match limit {
            Some(limit) => cx.visit(limit)?,
            None => cx.append(UNBOUNDED_LIMIT),
        }
        if let Some(offset) = offset {
            cx.append(" OFFSET ");
            cx.visit(offset)?;
        }
        Ok(())
    }
}
