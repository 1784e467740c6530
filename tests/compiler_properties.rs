use std::sync::Arc;

use relsql::prelude::*;
use relsql::transpiler::{Compilation, PagingPlan};

fn every_clause() -> SelectExpr {
    SelectExpr::new(table_as("orders", "o"))
        .project(col_of("o", "customer_id"))
        .project_as(count_star(), "n")
        .inner_join(
            table_as("customers", "c"),
            eq(col_of("c", "id"), col_of("o", "customer_id")),
        )
        .filter(gt(col_of("o", "total"), int(100)))
        .group_by(col_of("o", "customer_id"))
        .having(gt(count_star(), int(1)))
        .order_desc(col("n"))
        .limit(int(10))
        .offset(int(20))
}

#[test]
fn test_compilation_is_deterministic() {
    let registry = DialectRegistry::with_builtins();
    let query = every_clause();
    for id in registry.ids() {
        let first = registry
            .compile(id, &query, CompileOptions::default())
            .expect("compile");
        let second = registry
            .compile(id, &query, CompileOptions::default())
            .expect("compile");
        assert_eq!(first, second, "{}", id);
    }
}

#[test]
fn test_clause_order_is_fixed_for_every_dialect() {
    let registry = DialectRegistry::with_builtins();
    let query = every_clause();
    for id in registry.ids() {
        let output = registry
            .compile(id, &query, CompileOptions::default())
            .expect("compile");
        let sql = output.sql();
        let positions: Vec<usize> = [" FROM ", " INNER JOIN ", " WHERE ", " GROUP BY ", " HAVING ", " ORDER BY "]
            .iter()
            .map(|clause| sql.find(clause).unwrap_or_else(|| panic!("{}: no{} in {}", id, clause, sql)))
            .collect();
        assert!(
            positions.windows(2).all(|w| w[0] < w[1]),
            "{}: clauses out of order in {}",
            id,
            sql
        );
        assert!(sql.starts_with("SELECT "), "{}", sql);
    }
}

#[test]
fn test_sqlserver_paging_renders_each_value_once() {
    let limits = [None, Some(7)];
    let offsets = [None, Some(3)];
    for limit in limits {
        for offset in offsets {
            for ordered in [false, true] {
                let mut query = SelectExpr::new(table("t")).project(col("a"));
                if ordered {
                    query = query.order_asc(col("a"));
                }
                if let Some(n) = limit {
                    query = query.limit(int(n));
                }
                if let Some(n) = offset {
                    query = query.offset(int(n));
                }
                let output = query
                    .to_sql_with_dialect(Dialect::SqlServer)
                    .expect("compile");
                let sql = output.sql();

                let top = sql.contains("TOP(");
                let trailing = sql.contains(" OFFSET ");
                assert!(!(top && trailing), "both paging forms in {}", sql);
                assert_eq!(top, limit.is_some() && offset.is_none(), "{}", sql);
                assert_eq!(trailing, offset.is_some(), "{}", sql);
                assert_eq!(sql.matches('7').count(), usize::from(limit.is_some()), "{}", sql);
                assert_eq!(sql.matches('3').count(), usize::from(offset.is_some()), "{}", sql);
                if trailing {
                    assert!(sql.contains(" ORDER BY "), "{}", sql);
                }
            }
        }
    }
}

fn nested_parameters() -> SelectExpr {
    let counted = SelectExpr::new(table("u"))
        .project(count_star())
        .filter(eq(col("k"), param("b", 2)));
    SelectExpr::new(table("t"))
        .project_as(scalar_subquery(counted), "c")
        .filter(eq(col_of("t", "x"), param("c", 3)))
        .limit(param("a", 5))
}

fn binding_names(output: &CommandOutput) -> Vec<String> {
    output
        .parameters()
        .iter()
        .map(|p| p.name.clone().unwrap_or_default())
        .collect()
}

#[test]
fn test_bindings_follow_placeholder_order() {
    let output = nested_parameters()
        .to_sql_with_dialect(Dialect::SqlServer)
        .expect("compile");
    assert_eq!(
        output.sql(),
        "SELECT TOP(@p1) (SELECT COUNT(*) FROM [u] WHERE [k] = @p2) AS [c] FROM [t] WHERE [t].[x] = @p3"
    );
    assert_eq!(binding_names(&output), vec!["a", "b", "c"]);

    let output = nested_parameters()
        .to_sql_with_dialect(Dialect::Postgres)
        .expect("compile");
    assert_eq!(
        output.sql(),
        "SELECT (SELECT COUNT(*) FROM \"u\" WHERE \"k\" = $1) AS \"c\" FROM \"t\" WHERE \"t\".\"x\" = $2 LIMIT $3"
    );
    assert_eq!(binding_names(&output), vec!["b", "c", "a"]);
}

#[test]
fn test_concurrent_compiles_share_one_generator() {
    let registry = Arc::new(DialectRegistry::with_builtins());
    let query = Arc::new(nested_parameters());
    let expected = registry
        .compile("sqlserver", &query, CompileOptions::default())
        .expect("compile");

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let query = Arc::clone(&query);
                scope.spawn(move || {
                    (0..50)
                        .map(|_| {
                            registry
                                .compile("mssql", &query, CompileOptions::default())
                                .expect("compile")
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        for handle in handles {
            for output in handle.join().expect("thread panicked") {
                assert_eq!(output, expected);
            }
        }
    });
}

/// Informix-style `SELECT FIRST n`.
struct FirstRows;

impl SqlGenerator for FirstRows {
    fn name(&self) -> &str {
        "informix"
    }

    fn paging_plan<'a>(&self, select: &'a SelectExpr) -> PagingPlan<'a> {
        PagingPlan::top_unless_offset(select)
    }

    fn render_top_clause(&self, cx: &mut Compilation<'_>, limit: &SqlExpr) -> RelSqlResult<()> {
        cx.append("FIRST ");
        cx.visit(limit)?;
        cx.append(" ");
        Ok(())
    }

    fn render_limit_offset_clause(
        &self,
        cx: &mut Compilation<'_>,
        limit: Option<&SqlExpr>,
        offset: Option<&SqlExpr>,
    ) -> RelSqlResult<()> {
        if let Some(offset) = offset {
            cx.append(" SKIP ");
            cx.visit(offset)?;
        }
        if let Some(limit) = limit {
            cx.append(" LIMIT ");
            cx.visit(limit)?;
        }
        Ok(())
    }
}

#[test]
fn test_custom_dialect_registration() {
    let mut registry = DialectRegistry::with_builtins();
    assert!(registry.register("informix", Arc::new(FirstRows)).is_none());
    assert!(registry.ids().any(|id| id == "informix"));

    let query = SelectExpr::new(table("t")).project(col("a")).limit(int(4));
    let output = registry
        .compile("Informix", &query, CompileOptions::default())
        .expect("compile");
    assert_eq!(output.sql(), "SELECT FIRST 4 \"a\" FROM \"t\"");

    let paged = query.offset(int(8));
    let output = registry
        .compile("informix", &paged, CompileOptions::default())
        .expect("compile");
    assert_eq!(output.sql(), "SELECT \"a\" FROM \"t\" SKIP 8 LIMIT 4");
}

#[test]
fn test_unknown_dialect() {
    let registry = DialectRegistry::with_builtins();
    let err = registry
        .compile("db2", &SelectExpr::default(), CompileOptions::default())
        .unwrap_err();
    assert!(matches!(err, RelSqlError::UnknownDialect(ref id) if id == "db2"));
}

#[test]
fn test_tree_from_json() {
    let json = r#"{
        "projections": [
            {"expr": {"Column": {"name": "Name", "ty": "Text", "nullable": true}}, "alias": ""}
        ],
        "from": [{"Table": {"name": "Customers"}}],
        "limit": {"Literal": {"value": {"Int": 10}, "ty": "Int"}}
    }"#;
    let query: SelectExpr = serde_json::from_str(json).expect("valid tree");
    let output = RelSqlConfig::default()
        .registry()
        .compile("sqlserver", &query, CompileOptions::default())
        .expect("compile");
    assert_eq!(output.sql(), "SELECT TOP(10) [Name] FROM [Customers]");
    assert!(output.parameters().is_empty());
}

#[test]
fn test_config_drives_schema_and_literals() {
    let config = RelSqlConfig::from_toml(
        "[compiler]\nparameterize_literals = true\n\n[sqlserver]\ndefault_schema = \"app\"\n",
    )
    .expect("config");
    let query = SelectExpr::new(table("Orders"))
        .project(udf(None, "Total", vec![col("Id")], SqlType::Decimal))
        .filter(eq(col("Status"), text("open")));
    let output = config
        .registry()
        .compile(&config.compiler.dialect, &query, config.compile_options())
        .expect("compile");
    assert_eq!(
        output.sql(),
        "SELECT [app].[Total]([Id]) FROM [Orders] WHERE [Status] = @p1"
    );
    assert_eq!(output.parameters()[0].value, Value::Text("open".into()));
}
