use crate::ast::{SetOpKind, SqlExpr, SqlType, Value};
use crate::error::RelSqlResult;
use crate::transpiler::generator::Compilation;
use crate::transpiler::traits::{SqlGenerator, standard_literal};

pub struct SqliteGenerator;

impl SqlGenerator for SqliteGenerator {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn bool_literal(&self, val: bool) -> String {
        if val {
            "1".to_string()
        } else {
            "0".to_string()
        }
    }

    // Dates are stored as ISO-8601 text
    fn literal_sql(&self, value: &Value, ty: &SqlType) -> RelSqlResult<String> {
        match value {
            Value::Date(d) => Ok(format!("'{}'", d.format("%Y-%m-%d"))),
            Value::DateTime(dt) => Ok(format!("'{}'", dt.format("%Y-%m-%d %H:%M:%S%.f"))),
            _ => standard_literal(self, value, ty),
        }
    }

    fn type_name(&self, ty: &SqlType) -> String {
        match ty {
            SqlType::Boolean | SqlType::Int | SqlType::BigInt => "INTEGER".to_string(),
            SqlType::Float => "REAL".to_string(),
            SqlType::Decimal => "NUMERIC".to_string(),
            SqlType::Text | SqlType::Date | SqlType::DateTime => "TEXT".to_string(),
            SqlType::Binary => "BLOB".to_string(),
            SqlType::Custom(name) => name.clone(),
        }
    }

    fn supports_set_operation(&self, kind: SetOpKind, distinct: bool) -> bool {
        kind == SetOpKind::Union || distinct
    }

    // Compound operands cannot be parenthesized
    fn set_operand_prefix(&self) -> &str {
        "SELECT * FROM ("
    }

    // OFFSET needs a LIMIT in front of it; -1 means unbounded.
    fn render_limit_offset_clause(
        &self,
        cx: &mut Compilation<'_>,
        limit: Option<&SqlExpr>,
        offset: Option<&SqlExpr>,
    ) -> RelSqlResult<()> {
        cx.append(" LIMIT ");
        match limit {
            Some(limit) => cx.visit(limit)?,
            None => cx.append("-1"),
        }
        if let Some(offset) = offset {
            cx.append(" OFFSET ");
            cx.visit(offset)?;
        }
        Ok(())
    }
}
