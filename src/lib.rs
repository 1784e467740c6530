//! # relsql
//!
//! Compiles provider-agnostic relational expression trees into
//! dialect-specific SQL text plus positional parameter bindings.
//!
//! One traversal fixes the clause order for every database; a dialect
//! overrides only the handful of fragments where its syntax differs
//! (row limiting, paging, identifier quoting, function schema defaults).
//!
//! ## Quick Example
//!
//! ```
//! use relsql::prelude::*;
//!
//! let query = SelectExpr::new(table("Customers"))
//!     .project(col("Name"))
//!     .limit(int(10));
//!
//! let output = query.to_sql_with_dialect(Dialect::SqlServer).unwrap();
//! assert_eq!(output.sql(), "SELECT TOP(10) [Name] FROM [Customers]");
//! ```

pub mod ast;
pub mod config;
pub mod error;
pub mod transpiler;

pub mod prelude {
    pub use crate::ast::builders::*;
    pub use crate::ast::*;
    pub use crate::config::RelSqlConfig;
    pub use crate::error::*;
    pub use crate::transpiler::{
        CommandOutput, CompileOptions, Dialect, DialectRegistry, ParameterBinding,
        QuerySqlGenerator, SqlGenerator, ToSql,
    };
}

/// Compile `select` with `dialect` and default options.
///
/// # Example
///
/// ```
/// use relsql::prelude::*;
///
/// let query = SelectExpr::new(table("users")).project(col("id")).limit(int(5));
/// let output = relsql::compile(&query, Dialect::SQLite).unwrap();
/// assert_eq!(output.sql(), "SELECT \"id\" FROM \"users\" LIMIT 5");
/// ```
pub fn compile(
    select: &ast::SelectExpr,
    dialect: transpiler::Dialect,
) -> error::RelSqlResult<transpiler::CommandOutput> {
    let generator = dialect.generator();
    transpiler::QuerySqlGenerator::new(generator.as_ref()).compile(select)
}
