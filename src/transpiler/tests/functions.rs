//! Function schema normalization tests

use std::borrow::Cow;

use pretty_assertions::assert_eq;

use crate::ast::builders::*;
use crate::ast::{FunctionCall, SelectExpr, SqlType, TableFunctionRef};
use crate::transpiler::sql::sqlserver::SqlServerGenerator;
use crate::transpiler::{Dialect, QuerySqlGenerator, SqlGenerator, ToSql};

fn sqlserver(select: &SelectExpr) -> String {
    select
        .to_sql_with_dialect(Dialect::SqlServer)
        .unwrap()
        .sql()
        .to_string()
}

#[test]
fn test_unqualified_udf_gets_default_schema() {
    let q = SelectExpr::new(table("Orders"))
        .project(udf(None, "Total", vec![col("Id")], SqlType::Decimal))
        .project_as(count_star(), "Count");
    assert_eq!(
        sqlserver(&q),
        "SELECT [dbo].[Total]([Id]), COUNT(*) AS [Count] FROM [Orders]"
    );
}

#[test]
fn test_qualified_udf_keeps_schema() {
    let q = SelectExpr::new(table("Orders"))
        .project(udf(Some("sales"), "Total", vec![col("Id")], SqlType::Decimal));
    assert_eq!(sqlserver(&q), "SELECT [sales].[Total]([Id]) FROM [Orders]");
}

#[test]
fn test_empty_schema_counts_as_unqualified() {
    let q = SelectExpr::new(table("Orders"))
        .project(udf(Some(""), "Total", vec![], SqlType::Decimal));
    assert_eq!(sqlserver(&q), "SELECT [dbo].[Total]() FROM [Orders]");
}

#[test]
fn test_configured_default_schema() {
    let generator = SqlServerGenerator::new("app");
    let q = SelectExpr::new(table("Orders"))
        .project(udf(None, "Total", vec![col("Id")], SqlType::Decimal));
    let output = QuerySqlGenerator::new(&generator).compile(&q).unwrap();
    assert_eq!(output.sql(), "SELECT [app].[Total]([Id]) FROM [Orders]");
}

#[test]
fn test_nested_calls_are_normalized() {
    let inner = SelectExpr::new(table("Lines"))
        .project(udf(None, "LineTotal", vec![col("Qty")], SqlType::Decimal));
    let q = SelectExpr::new(table("Orders"))
        .project(func(
            "UPPER",
            vec![udf(None, "Label", vec![col("Id")], SqlType::Text)],
            SqlType::Text,
        ))
        .filter(gt(udf(None, "Score", vec![], SqlType::Int), scalar_subquery(inner)));
    assert_eq!(
        sqlserver(&q),
        "SELECT UPPER([dbo].[Label]([Id])) FROM [Orders] \
         WHERE [dbo].[Score]() > (SELECT [dbo].[LineTotal]([Qty]) FROM [Lines])"
    );
}

#[test]
fn test_table_function_source() {
    let q = SelectExpr::new(table_function(None, "GetOrders", vec![int(1)], "o"))
        .project(col_of("o", "Id"));
    assert_eq!(
        sqlserver(&q),
        "SELECT [o].[Id] FROM [dbo].[GetOrders](1) AS [o]"
    );

    let qualified = SelectExpr::new(table_function(Some("sales"), "GetOrders", vec![], "o"))
        .project(col_of("o", "Id"));
    assert_eq!(
        sqlserver(&qualified),
        "SELECT [o].[Id] FROM [sales].[GetOrders]() AS [o]"
    );
}

#[test]
fn test_other_dialects_leave_functions_unqualified() {
    let q = SelectExpr::new(table("Orders"))
        .project(udf(None, "Total", vec![col("Id")], SqlType::Decimal));
    assert_eq!(
        q.to_sql_with_dialect(Dialect::Postgres).unwrap().sql(),
        "SELECT \"Total\"(\"Id\") FROM \"Orders\""
    );
    assert_eq!(
        q.to_sql_with_dialect(Dialect::MySQL).unwrap().sql(),
        "SELECT `Total`(`Id`) FROM `Orders`"
    );
}

#[test]
fn test_normalize_slots() {
    let generator = SqlServerGenerator::default();

    let bare = FunctionCall::user_defined(None, "Total", vec![], SqlType::Int);
    match generator.normalize_function_call(&bare) {
        Cow::Owned(rewritten) => {
            assert_eq!(rewritten.schema(), Some("dbo"));
            assert_eq!(rewritten.name, "Total");
            assert!(!rewritten.is_built_in);
        }
        Cow::Borrowed(_) => panic!("expected a rewritten call"),
    }

    let built_in = FunctionCall::built_in("LEN", vec![col("Name")], SqlType::Int);
    assert!(matches!(
        generator.normalize_function_call(&built_in),
        Cow::Borrowed(_)
    ));

    let source = TableFunctionRef::new(None, "GetOrders", vec![], "o");
    let rewritten = generator.normalize_table_function_ref(&source);
    assert_eq!(rewritten.schema(), Some("dbo"));
    assert_eq!(rewritten.alias, "o");
    assert_eq!(source.schema(), None);
}
