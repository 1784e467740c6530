//! Unsupported shapes and malformed trees

use crate::ast::builders::*;
use crate::ast::{FunctionCall, JoinKind, SelectExpr, SetOpKind, SqlExpr, SqlType, Value};
use crate::error::RelSqlError;
use crate::transpiler::{Dialect, PagingPlan, QuerySqlGenerator, SqlGenerator, ToSql};

fn is_malformed(result: Result<impl std::fmt::Debug, RelSqlError>) -> bool {
    matches!(result, Err(RelSqlError::MalformedTree(_)))
}

fn is_unsupported(result: Result<impl std::fmt::Debug, RelSqlError>) -> bool {
    matches!(result, Err(RelSqlError::UnsupportedShape(_)))
}

#[test]
fn test_duplicate_source_alias() {
    let q = SelectExpr::new(table_as("a", "x")).inner_join(table_as("b", "x"), col("k"));
    assert!(is_malformed(q.to_sql()));

    // same name in a nested SELECT is a separate scope
    let nested = SelectExpr::new(table_as("a", "x"))
        .filter(exists(SelectExpr::new(table_as("b", "x"))));
    assert!(nested.to_sql().is_ok());
}

#[test]
fn test_invalid_row_counts() {
    for dialect in Dialect::ALL {
        let negative = SelectExpr::new(table("t")).limit(int(-1));
        assert!(is_malformed(negative.to_sql_with_dialect(dialect)), "{}", dialect);

        let text_offset = SelectExpr::new(table("t")).offset(text("5"));
        assert!(is_malformed(text_offset.to_sql_with_dialect(dialect)), "{}", dialect);

        let bad_param = SelectExpr::new(table("t")).limit(param("n", 1.5));
        assert!(is_malformed(bad_param.to_sql_with_dialect(dialect)), "{}", dialect);
    }
}

#[test]
fn test_non_constant_limit_passes_through() {
    let q = SelectExpr::new(table("t")).limit(scalar_subquery(
        SelectExpr::new(table("settings")).project(col("page_size")),
    ));
    assert_eq!(
        q.to_sql_with_dialect(Dialect::SqlServer).unwrap().sql(),
        "SELECT TOP((SELECT [page_size] FROM [settings])) 1 FROM [t]"
    );
}

#[test]
fn test_set_operation_all_variants() {
    let left = SelectExpr::new(table("a")).project(col("id"));
    let right = SelectExpr::new(table("b")).project(col("id"));
    let intersect_all = SelectExpr::new(set_operation(
        SetOpKind::Intersect,
        false,
        left.clone(),
        right.clone(),
        "s",
    ));
    assert!(is_unsupported(intersect_all.to_sql_with_dialect(Dialect::SqlServer)));
    assert!(is_unsupported(intersect_all.to_sql_with_dialect(Dialect::SQLite)));
    assert!(intersect_all.to_sql_with_dialect(Dialect::Postgres).is_ok());

    let except = SelectExpr::new(set_operation(SetOpKind::Except, true, left, right, "s"));
    assert!(except.to_sql_with_dialect(Dialect::SqlServer).is_ok());
}

#[test]
fn test_apply_requires_dialect_support() {
    let q = SelectExpr::new(table_as("Orders", "o")).join(
        JoinKind::OuterApply,
        table_function(None, "Lines", vec![col_of("o", "Id")], "l"),
        None,
    );
    assert!(is_unsupported(q.to_sql_with_dialect(Dialect::Postgres)));
    assert!(is_unsupported(q.to_sql_with_dialect(Dialect::MySQL)));
    assert_eq!(
        q.to_sql_with_dialect(Dialect::SqlServer).unwrap().sql(),
        "SELECT 1 FROM [Orders] AS [o] OUTER APPLY [dbo].[Lines]([o].[Id]) AS [l]"
    );
}

#[test]
fn test_join_predicate_shape() {
    let missing = SelectExpr::new(table("a")).join(JoinKind::Inner, table("b"), None);
    assert!(is_malformed(missing.to_sql()));

    let extra = SelectExpr::new(table("a")).join(JoinKind::Cross, table("b"), Some(col("k")));
    assert!(is_malformed(extra.to_sql()));

    let orphan = SelectExpr {
        joins: SelectExpr::new(table("a"))
            .inner_join(table("b"), col("k"))
            .joins,
        ..SelectExpr::default()
    };
    assert!(is_malformed(orphan.to_sql()));
}

#[test]
fn test_malformed_functions() {
    let mut qualified_built_in = FunctionCall::built_in("LEN", vec![col("a")], SqlType::Int);
    qualified_built_in.schema = Some("dbo".into());
    let q = SelectExpr::new(table("t")).project(SqlExpr::Function(qualified_built_in));
    assert!(is_malformed(q.to_sql_with_dialect(Dialect::SqlServer)));

    let mut flags = FunctionCall::user_defined(None, "Total", vec![col("a"), col("b")], SqlType::Int);
    flags.arguments_propagate_nullability = vec![true];
    let q = SelectExpr::new(table("t")).project(SqlExpr::Function(flags));
    assert!(is_malformed(q.to_sql()));

    let mut niladic = FunctionCall::niladic("CURRENT_TIMESTAMP", SqlType::DateTime);
    niladic.arguments.push(int(1));
    let q = SelectExpr::new(table("t")).project(SqlExpr::Function(niladic));
    assert!(is_malformed(q.to_sql()));
}

#[test]
fn test_malformed_expressions() {
    let empty_in = SelectExpr::new(table("t")).filter(in_list(col("a"), vec![]));
    assert!(is_malformed(empty_in.to_sql()));

    let empty_case = SelectExpr::new(table("t")).project(case_when(vec![], None));
    assert!(is_malformed(empty_case.to_sql()));
}

#[test]
fn test_non_finite_literal_is_unsupported() {
    let q = SelectExpr::new(table("t")).filter(eq(col("a"), lit(f64::NAN)));
    assert!(is_unsupported(q.to_sql()));
}

#[test]
fn test_error_deep_in_tree_returns_no_output() {
    let inner = SelectExpr::new(table("u")).filter(in_list(col("a"), vec![]));
    let q = SelectExpr::new(table("t"))
        .project(col("a"))
        .filter(exists(inner))
        .limit(int(3));
    let result = q.to_sql_with_dialect(Dialect::SqlServer);
    assert!(is_malformed(result));
}

struct TopWithoutSyntax;

impl SqlGenerator for TopWithoutSyntax {
    fn name(&self) -> &str {
        "top-without-syntax"
    }

    fn paging_plan<'a>(&self, select: &'a SelectExpr) -> PagingPlan<'a> {
        PagingPlan::top_unless_offset(select)
    }
}

#[test]
fn test_top_plan_without_top_syntax() {
    let q = SelectExpr::new(table("t")).limit(int(1));
    let result = QuerySqlGenerator::new(&TopWithoutSyntax).compile(&q);
    assert!(is_unsupported(result));
}

#[test]
fn test_error_display() {
    let err = SelectExpr::new(table("t"))
        .filter(eq(col("a"), lit(Value::Float(f64::INFINITY))))
        .to_sql()
        .unwrap_err();
    assert!(err.to_string().contains("inf"));
}

#[test]
fn test_sources_needing_an_alias() {
    let inner = SelectExpr::new(table("users")).project(col("id"));
    let derived_table = SelectExpr::new(derived(inner.clone(), "")).project(col("id"));
    assert!(is_malformed(derived_table.to_sql_with_dialect(Dialect::SqlServer)));

    let function = SelectExpr::new(table_function(None, "GetOrders", vec![], ""));
    assert!(is_malformed(function.to_sql_with_dialect(Dialect::SqlServer)));

    let union = SelectExpr::new(set_operation(SetOpKind::Union, true, inner.clone(), inner, ""));
    assert!(is_malformed(union.to_sql()));
}

#[test]
fn test_built_in_table_function_with_schema() {
    let mut function = crate::ast::TableFunctionRef::new(Some("dbo"), "OPENJSON", vec![col("doc")], "j");
    function.is_built_in = true;
    let q = SelectExpr::new(crate::ast::TableSource::TableFunction(function));
    assert!(is_malformed(q.to_sql_with_dialect(Dialect::SqlServer)));
}

#[test]
fn test_fractional_float_declared_integer() {
    let q = SelectExpr::new(table("t")).filter(eq(col("a"), typed_lit(1.7, SqlType::Int)));
    assert!(is_malformed(q.to_sql()));
    assert!(is_malformed(q.to_sql_with_dialect(Dialect::SqlServer)));

    let whole = SelectExpr::new(table("t")).filter(eq(col("a"), typed_lit(2.0, SqlType::Int)));
    assert_eq!(
        whole.to_sql().unwrap().sql(),
        "SELECT 1 FROM \"t\" WHERE \"a\" = 2"
    );
}
