use crate::ast::{SetOpKind, SqlExpr, SqlType};
use crate::error::RelSqlResult;
use crate::transpiler::generator::Compilation;
use crate::transpiler::traits::SqlGenerator;

pub struct OracleGenerator;

impl SqlGenerator for OracleGenerator {
    fn name(&self) -> &str {
        "oracle"
    }

    fn placeholder(&self, index: usize) -> String {
        format!(":{}", index)
    }

    fn bool_literal(&self, val: bool) -> String {
        if val { "1".to_string() } else { "0".to_string() }
    }

    fn type_name(&self, ty: &SqlType) -> String {
        match ty {
            SqlType::Boolean => "NUMBER(1)".to_string(),
            SqlType::Int => "NUMBER(10)".to_string(),
            SqlType::BigInt => "NUMBER(19)".to_string(),
            SqlType::Float => "BINARY_DOUBLE".to_string(),
            SqlType::Decimal => "NUMBER".to_string(),
            SqlType::Text => "NVARCHAR2(2000)".to_string(),
            SqlType::Date => "DATE".to_string(),
            SqlType::DateTime => "TIMESTAMP".to_string(),
            SqlType::Binary => "BLOB".to_string(),
            SqlType::Custom(name) => name.clone(),
        }
    }

    // Oracle rejects AS before a table alias
    fn table_alias_keyword(&self) -> &str {
        " "
    }

    fn empty_from_source(&self) -> Option<&str> {
        Some("DUAL")
    }

    fn supports_set_operation(&self, kind: SetOpKind, distinct: bool) -> bool {
        kind == SetOpKind::Union || distinct
    }

    fn set_operation_keyword(&self, kind: SetOpKind) -> String {
        match kind {
            SetOpKind::Except => "MINUS".to_string(),
            _ => kind.to_string(),
        }
    }

    fn supports_apply(&self) -> bool {
        true
    }

    fn render_limit_offset_clause(
        &self,
        cx: &mut Compilation<'_>,
        limit: Option<&SqlExpr>,
        offset: Option<&SqlExpr>,
    ) -> RelSqlResult<()> {
        match offset {
            None => {
                if let Some(limit) = limit {
                    cx.append(" FETCH FIRST ");
                    cx.visit(limit)?;
                    cx.append(" ROWS ONLY");
                }
            }
            Some(offset) => {
                cx.append(" OFFSET ");
                cx.visit(offset)?;
                cx.append(" ROWS");
                if let Some(limit) = limit {
                    cx.append(" FETCH NEXT ");
                    cx.visit(limit)?;
                    cx.append(" ROWS ONLY");
                }
            }
        }
        Ok(())
    }
}
