//! The dialect extension table.
//!
//! [`SqlGenerator`] is the set of named slots the generic traversal calls
//! into. Every slot has a default, so a dialect overrides only the points
//! where its syntax differs; the clause order itself is owned by
//! [`Compilation`] and cannot be changed from here.

use std::borrow::Cow;

use crate::ast::{FunctionCall, SelectExpr, SetOpKind, SqlExpr, SqlType, TableFunctionRef, Value};
use crate::error::{RelSqlError, RelSqlResult};
use crate::transpiler::generator::Compilation;

/// Which clause owns the rendering of a SELECT's paging.
///
/// Computed once per SELECT by [`SqlGenerator::paging_plan`] and handed to
/// exactly one of the two paging slots, so a limit can never be emitted twice
/// or dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PagingPlan<'a> {
    /// No paging.
    None,
    /// Row limit right after `SELECT` (`TOP(n)`).
    Top { limit: &'a SqlExpr },
    /// Everything in the final clause.
    Trailing {
        limit: Option<&'a SqlExpr>,
        offset: Option<&'a SqlExpr>,
    },
}

impl<'a> PagingPlan<'a> {
    /// Plan that puts any paging in the trailing clause.
    pub fn trailing(select: &'a SelectExpr) -> Self {
        match (select.limit.as_ref(), select.offset.as_ref()) {
            (None, None) => PagingPlan::None,
            (limit, offset) => PagingPlan::Trailing { limit, offset },
        }
    }

    /// Limit-only goes to the top clause; anything with an offset trails.
    pub fn top_unless_offset(select: &'a SelectExpr) -> Self {
        match (select.limit.as_ref(), select.offset.as_ref()) {
            (Some(limit), None) => PagingPlan::Top { limit },
            _ => Self::trailing(select),
        }
    }
}

/// Trait for dialect-specific SQL generation.
pub trait SqlGenerator: Send + Sync {
    /// Registry identifier of the dialect.
    fn name(&self) -> &str;

    /// Quote an identifier (table, column, alias or schema name).
    fn quote_identifier(&self, name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    /// Generate the parameter placeholder for a 1-based position.
    fn placeholder(&self, index: usize) -> String {
        let _ = index;
        "?".to_string()
    }

    /// Get the boolean literal (TRUE/FALSE vs 1/0).
    fn bool_literal(&self, val: bool) -> String {
        if val { "TRUE".to_string() } else { "FALSE".to_string() }
    }

    /// Quote a string constant.
    fn string_literal(&self, s: &str) -> String {
        format!("'{}'", s.replace('\'', "''"))
    }

    /// Render a constant inline.
    fn literal_sql(&self, value: &Value, ty: &SqlType) -> RelSqlResult<String> {
        standard_literal(self, value, ty)
    }

    /// Store type name used as a CAST target.
    fn type_name(&self, ty: &SqlType) -> String {
        ty.to_string()
    }

    /// Infix string concatenation operator; `None` renders `CONCAT(a, b)`.
    fn concat_operator(&self) -> Option<&str> {
        Some("||")
    }

    /// Text between a row source and its alias.
    fn table_alias_keyword(&self) -> &str {
        " AS "
    }

    /// Source to select from when a SELECT has no FROM entries (e.g. `DUAL`).
    fn empty_from_source(&self) -> Option<&str> {
        None
    }

    /// Whether `kind` can be rendered; `distinct == false` asks for the
    /// `ALL` variant.
    fn supports_set_operation(&self, kind: SetOpKind, distinct: bool) -> bool {
        let _ = (kind, distinct);
        true
    }

    /// Keyword joining the two operands (e.g. `MINUS` for Oracle's EXCEPT).
    fn set_operation_keyword(&self, kind: SetOpKind) -> String {
        kind.to_string()
    }

    /// Opening text for a set operand that carries its own ORDER BY or
    /// paging; the compiler closes it with `)`.
    fn set_operand_prefix(&self) -> &str {
        "("
    }

    /// Whether `CROSS APPLY` / `OUTER APPLY` can be rendered.
    fn supports_apply(&self) -> bool {
        false
    }

    /// Decide, once per SELECT, which paging slot renders the limit/offset.
    fn paging_plan<'a>(&self, select: &'a SelectExpr) -> PagingPlan<'a> {
        PagingPlan::trailing(select)
    }

    /// Row limit emitted right after `SELECT [DISTINCT]`, including its
    /// trailing space. Only called for [`PagingPlan::Top`].
    fn render_top_clause(&self, cx: &mut Compilation<'_>, limit: &SqlExpr) -> RelSqlResult<()> {
        let _ = (cx, limit);
        Err(RelSqlError::unsupported(format!(
            "dialect '{}' has no leading row-limit syntax",
            self.name()
        )))
    }

    /// Final clause of a SELECT, including its leading space. Only called for
    /// [`PagingPlan::Trailing`].
    ///
    /// Default: `LIMIT m` for a bare limit, `OFFSET n [LIMIT m]` once an offset
    /// is present.
    fn render_limit_offset_clause(
        &self,
        cx: &mut Compilation<'_>,
        limit: Option<&SqlExpr>,
        offset: Option<&SqlExpr>,
    ) -> RelSqlResult<()> {
        match offset {
            None => {
                if let Some(limit) = limit {
                    cx.append(" LIMIT ");
                    cx.visit(limit)?;
                }
            }
            Some(offset) => {
                cx.append(" OFFSET ");
                cx.visit(offset)?;
                if let Some(limit) = limit {
                    cx.append(" LIMIT ");
                    cx.visit(limit)?;
                }
            }
        }
        Ok(())
    }

    /// ORDER BY expression used when an offset is present without orderings.
    fn fallback_ordering(&self) -> Option<&str> {
        None
    }

    /// Rewrite a scalar function call before it is rendered.
    fn normalize_function_call<'a>(&self, call: &'a FunctionCall) -> Cow<'a, FunctionCall> {
        Cow::Borrowed(call)
    }

    /// Rewrite a table-valued function before it is rendered.
    fn normalize_table_function_ref<'a>(
        &self,
        function: &'a TableFunctionRef,
    ) -> Cow<'a, TableFunctionRef> {
        Cow::Borrowed(function)
    }
}

/// Qualify a non-built-in, unqualified function with `schema`.
pub fn qualify_function_call<'a>(call: &'a FunctionCall, schema: &str) -> Cow<'a, FunctionCall> {
    if call.is_built_in || call.schema().is_some() {
        Cow::Borrowed(call)
    } else {
        Cow::Owned(call.with_schema(schema))
    }
}

/// Row-source counterpart of [`qualify_function_call`].
pub fn qualify_table_function<'a>(
    function: &'a TableFunctionRef,
    schema: &str,
) -> Cow<'a, TableFunctionRef> {
    if function.is_built_in || function.schema().is_some() {
        Cow::Borrowed(function)
    } else {
        Cow::Owned(function.with_schema(schema))
    }
}

/// Literal formatting shared by the built-in dialects.
pub fn standard_literal<G: SqlGenerator + ?Sized>(
    generator: &G,
    value: &Value,
    ty: &SqlType,
) -> RelSqlResult<String> {
    Ok(match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => generator.bool_literal(*b),
        Value::Int(n) => n.to_string(),
        Value::Float(f) if !f.is_finite() => {
            return Err(RelSqlError::unsupported(format!(
                "non-finite float {} has no SQL literal",
                f
            )));
        }
        Value::Float(f) if ty.is_integer() && f.fract() != 0.0 => {
            return Err(RelSqlError::malformed(format!(
                "{} is not a whole number but is declared {}",
                f, ty
            )));
        }
        Value::Float(f) if ty.is_integer() => format!("{}", f),
        Value::Float(f) => format!("{:?}", f),
        Value::Text(s) => generator.string_literal(s),
        Value::Date(d) => format!("DATE '{}'", d.format("%Y-%m-%d")),
        Value::DateTime(dt) => format!("TIMESTAMP '{}'", dt.format("%Y-%m-%d %H:%M:%S%.f")),
        Value::Bytes(b) => format!("X'{}'", hex(b)),
    })
}

/// Upper-case hex digits, two per byte.
pub fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).collect()
}
