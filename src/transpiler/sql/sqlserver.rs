use std::borrow::Cow;

use crate::ast::{FunctionCall, SelectExpr, SetOpKind, SqlExpr, SqlType, TableFunctionRef, Value};
use crate::error::RelSqlResult;
use crate::transpiler::generator::Compilation;
use crate::transpiler::traits::{
    PagingPlan, SqlGenerator, hex, qualify_function_call, qualify_table_function,
    standard_literal,
};

/// Schema SQL Server resolves unqualified user functions against.
pub const DEFAULT_SCHEMA: &str = "dbo";

pub struct SqlServerGenerator {
    default_schema: String,
}

impl SqlServerGenerator {
    pub fn new(default_schema: impl Into<String>) -> Self {
        Self {
            default_schema: default_schema.into(),
        }
    }

    pub fn default_schema(&self) -> &str {
        &self.default_schema
    }
}

impl Default for SqlServerGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_SCHEMA)
    }
}

impl SqlGenerator for SqlServerGenerator {
    fn name(&self) -> &str {
        "sqlserver"
    }

    fn quote_identifier(&self, id: &str) -> String {
        format!("[{}]", id.replace(']', "]]"))
    }

    fn placeholder(&self, index: usize) -> String {
        format!("@p{}", index)
    }

    fn bool_literal(&self, val: bool) -> String {
        if val { "1".to_string() } else { "0".to_string() }
    }

    fn literal_sql(&self, value: &Value, ty: &SqlType) -> RelSqlResult<String> {
        Ok(match value {
            // nvarchar constants need the N prefix
            Value::Text(s) if *ty == SqlType::Text => format!("N{}", self.string_literal(s)),
            Value::Date(d) => format!("'{}'", d.format("%Y-%m-%d")),
            Value::DateTime(dt) => format!("'{}'", dt.format("%Y-%m-%dT%H:%M:%S%.3f")),
            Value::Bytes(b) => format!("0x{}", hex(b)),
            _ => standard_literal(self, value, ty)?,
        })
    }

    fn type_name(&self, ty: &SqlType) -> String {
        match ty {
            SqlType::Boolean => "bit".to_string(),
            SqlType::Int => "int".to_string(),
            SqlType::BigInt => "bigint".to_string(),
            SqlType::Float => "float".to_string(),
            SqlType::Decimal => "decimal(18, 2)".to_string(),
            SqlType::Text => "nvarchar(max)".to_string(),
            SqlType::Date => "date".to_string(),
            SqlType::DateTime => "datetime2".to_string(),
            SqlType::Binary => "varbinary(max)".to_string(),
            SqlType::Custom(name) => name.clone(),
        }
    }

    fn concat_operator(&self) -> Option<&str> {
        Some("+")
    }

    // No ALL variant for INTERSECT / EXCEPT
    fn supports_set_operation(&self, kind: SetOpKind, distinct: bool) -> bool {
        kind == SetOpKind::Union || distinct
    }

    fn supports_apply(&self) -> bool {
        true
    }

    fn paging_plan<'a>(&self, select: &'a SelectExpr) -> PagingPlan<'a> {
        PagingPlan::top_unless_offset(select)
    }

    fn render_top_clause(&self, cx: &mut Compilation<'_>, limit: &SqlExpr) -> RelSqlResult<()> {
        cx.append("TOP(");
        cx.visit(limit)?;
        cx.append(") ");
        Ok(())
    }

    // A bare limit is rendered as TOP, so this only runs with an offset.
    fn render_limit_offset_clause(
        &self,
        cx: &mut Compilation<'_>,
        limit: Option<&SqlExpr>,
        offset: Option<&SqlExpr>,
    ) -> RelSqlResult<()> {
        if let Some(offset) = offset {
            cx.append(" OFFSET ");
            cx.visit(offset)?;
            cx.append(" ROWS");
            if let Some(limit) = limit {
                cx.append(" FETCH NEXT ");
                cx.visit(limit)?;
                cx.append(" ROWS ONLY");
            }
        }
        Ok(())
    }

    // OFFSET is only legal after ORDER BY
    fn fallback_ordering(&self) -> Option<&str> {
        Some("(SELECT 1)")
    }

    fn normalize_function_call<'a>(&self, call: &'a FunctionCall) -> Cow<'a, FunctionCall> {
        qualify_function_call(call, &self.default_schema)
    }

    fn normalize_table_function_ref<'a>(
        &self,
        function: &'a TableFunctionRef,
    ) -> Cow<'a, TableFunctionRef> {
        qualify_table_function(function, &self.default_schema)
    }
}
