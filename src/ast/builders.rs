//! Ergonomic builder functions for expression trees.
//!
//! Upstream translators normally build nodes directly; these helpers keep
//! tests and hand-written trees short.
//!
//! # Example
//! ```
//! use relsql::ast::builders::*;
//! use relsql::ast::SelectExpr;
//!
//! let query = SelectExpr::new(table("Customers"))
//!     .project(col("Name"))
//!     .filter(eq(col("Active"), boolean(true)))
//!     .limit(int(10));
//! assert_eq!(query.projections.len(), 1);
//! ```

use crate::ast::{
    BinaryOp, ColumnRef, FunctionCall, InValues, Literal, Parameter, SelectExpr, SetOpKind,
    SetOperation, SqlExpr, SqlType, TableFunctionRef, TableSource, UnaryOp, Value,
};

// Columns

/// Unqualified column of unknown type.
pub fn col(name: &str) -> SqlExpr {
    typed_col(None, name, SqlType::Custom(String::new()))
}

/// Column qualified by the alias of its source: `alias.name`.
pub fn col_of(table_alias: &str, name: &str) -> SqlExpr {
    typed_col(Some(table_alias), name, SqlType::Custom(String::new()))
}

pub fn typed_col(table_alias: Option<&str>, name: &str, ty: SqlType) -> SqlExpr {
    SqlExpr::Column(ColumnRef {
        name: name.to_string(),
        table_alias: table_alias.map(str::to_string),
        ty,
        nullable: true,
    })
}

/// Raw `*`.
pub fn star() -> SqlExpr {
    SqlExpr::Fragment("*".to_string())
}

// Literals

/// Literal typed after its value.
pub fn lit(value: impl Into<Value>) -> SqlExpr {
    let value = value.into();
    let ty = value.natural_type();
    SqlExpr::Literal(Literal { value, ty })
}

pub fn typed_lit(value: impl Into<Value>, ty: SqlType) -> SqlExpr {
    SqlExpr::Literal(Literal {
        value: value.into(),
        ty,
    })
}

pub fn int(n: i64) -> SqlExpr {
    typed_lit(n, SqlType::Int)
}

pub fn text(s: &str) -> SqlExpr {
    typed_lit(s, SqlType::Text)
}

pub fn boolean(b: bool) -> SqlExpr {
    typed_lit(b, SqlType::Boolean)
}

pub fn null() -> SqlExpr {
    lit(Value::Null)
}

/// Parameter typed after its value.
pub fn param(name: &str, value: impl Into<Value>) -> SqlExpr {
    let value = value.into();
    let ty = value.natural_type();
    SqlExpr::Parameter(Parameter {
        name: name.to_string(),
        value,
        ty,
    })
}

// Functions

/// Built-in function call.
pub fn func(name: &str, args: Vec<SqlExpr>, ty: SqlType) -> SqlExpr {
    SqlExpr::Function(FunctionCall::built_in(name, args, ty))
}

/// User-defined function call, unqualified unless `schema` is given.
pub fn udf(schema: Option<&str>, name: &str, args: Vec<SqlExpr>, ty: SqlType) -> SqlExpr {
    SqlExpr::Function(FunctionCall::user_defined(schema, name, args, ty))
}

/// COUNT(*)
pub fn count_star() -> SqlExpr {
    func("COUNT", vec![star()], SqlType::Int)
}

// Sources

pub fn table(name: &str) -> TableSource {
    TableSource::Table {
        name: name.to_string(),
        schema: None,
        alias: None,
    }
}

pub fn table_as(name: &str, alias: &str) -> TableSource {
    TableSource::Table {
        name: name.to_string(),
        schema: None,
        alias: Some(alias.to_string()),
    }
}

pub fn schema_table(schema: &str, name: &str, alias: Option<&str>) -> TableSource {
    TableSource::Table {
        name: name.to_string(),
        schema: Some(schema.to_string()),
        alias: alias.map(str::to_string),
    }
}

pub fn derived(select: SelectExpr, alias: &str) -> TableSource {
    TableSource::Subquery {
        select: Box::new(select),
        alias: alias.to_string(),
    }
}

pub fn table_function(
    schema: Option<&str>,
    name: &str,
    args: Vec<SqlExpr>,
    alias: &str,
) -> TableSource {
    TableSource::TableFunction(TableFunctionRef::new(schema, name, args, alias))
}

pub fn set_operation(
    kind: SetOpKind,
    distinct: bool,
    left: SelectExpr,
    right: SelectExpr,
    alias: &str,
) -> TableSource {
    TableSource::SetOperation(SetOperation {
        kind,
        distinct,
        left: Box::new(left),
        right: Box::new(right),
        alias: alias.to_string(),
    })
}

// Operators

pub fn binary(left: SqlExpr, op: BinaryOp, right: SqlExpr) -> SqlExpr {
    let ty = if op.is_comparison() || matches!(op, BinaryOp::And | BinaryOp::Or) {
        SqlType::Boolean
    } else {
        left.ty()
    };
    SqlExpr::Binary {
        left: Box::new(left),
        op,
        right: Box::new(right),
        ty,
    }
}

pub fn eq(left: SqlExpr, right: SqlExpr) -> SqlExpr {
    binary(left, BinaryOp::Equal, right)
}

pub fn ne(left: SqlExpr, right: SqlExpr) -> SqlExpr {
    binary(left, BinaryOp::NotEqual, right)
}

pub fn gt(left: SqlExpr, right: SqlExpr) -> SqlExpr {
    binary(left, BinaryOp::GreaterThan, right)
}

pub fn lt(left: SqlExpr, right: SqlExpr) -> SqlExpr {
    binary(left, BinaryOp::LessThan, right)
}

pub fn and(left: SqlExpr, right: SqlExpr) -> SqlExpr {
    binary(left, BinaryOp::And, right)
}

pub fn or(left: SqlExpr, right: SqlExpr) -> SqlExpr {
    binary(left, BinaryOp::Or, right)
}

pub fn add(left: SqlExpr, right: SqlExpr) -> SqlExpr {
    binary(left, BinaryOp::Add, right)
}

pub fn concat(left: SqlExpr, right: SqlExpr) -> SqlExpr {
    binary(left, BinaryOp::Concat, right)
}

pub fn unary(op: UnaryOp, operand: SqlExpr) -> SqlExpr {
    let ty = match &op {
        UnaryOp::Negate => operand.ty(),
        UnaryOp::Cast(target) => target.clone(),
        UnaryOp::Not | UnaryOp::IsNull | UnaryOp::IsNotNull => SqlType::Boolean,
    };
    SqlExpr::Unary {
        op,
        operand: Box::new(operand),
        ty,
    }
}

pub fn not(operand: SqlExpr) -> SqlExpr {
    unary(UnaryOp::Not, operand)
}

pub fn is_null(operand: SqlExpr) -> SqlExpr {
    unary(UnaryOp::IsNull, operand)
}

pub fn cast(operand: SqlExpr, ty: SqlType) -> SqlExpr {
    unary(UnaryOp::Cast(ty), operand)
}

pub fn exists(subquery: SelectExpr) -> SqlExpr {
    SqlExpr::Exists {
        subquery: Box::new(subquery),
        negated: false,
    }
}

pub fn in_list(item: SqlExpr, values: Vec<SqlExpr>) -> SqlExpr {
    SqlExpr::In {
        item: Box::new(item),
        values: InValues::List(values),
        negated: false,
    }
}

pub fn in_subquery(item: SqlExpr, subquery: SelectExpr) -> SqlExpr {
    SqlExpr::In {
        item: Box::new(item),
        values: InValues::Subquery(Box::new(subquery)),
        negated: false,
    }
}

pub fn like(item: SqlExpr, pattern: SqlExpr) -> SqlExpr {
    SqlExpr::Like {
        item: Box::new(item),
        pattern: Box::new(pattern),
        escape: None,
        negated: false,
    }
}

pub fn scalar_subquery(select: SelectExpr) -> SqlExpr {
    SqlExpr::Subquery(Box::new(select))
}

/// Searched CASE: `CASE WHEN cond THEN value ... [ELSE otherwise] END`.
pub fn case_when(when_clauses: Vec<(SqlExpr, SqlExpr)>, otherwise: Option<SqlExpr>) -> SqlExpr {
    let ty = when_clauses
        .first()
        .map(|(_, then)| then.ty())
        .unwrap_or_else(|| SqlType::Custom(String::new()));
    SqlExpr::Case {
        operand: None,
        when_clauses,
        else_value: otherwise.map(Box::new),
        ty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparison_is_boolean() {
        assert_eq!(eq(col("a"), int(1)).ty(), SqlType::Boolean);
        assert_eq!(add(int(1), int(2)).ty(), SqlType::Int);
    }

    #[test]
    fn test_cast_takes_target_type() {
        assert_eq!(cast(col("a"), SqlType::Text).ty(), SqlType::Text);
    }

    #[test]
    fn test_param_type_follows_value() {
        assert!(matches!(param("p", "x"), SqlExpr::Parameter(Parameter { ty: SqlType::Text, .. })));
    }
}
