//! SQL Transpiler for relational expression trees.
//!
//! [`QuerySqlGenerator`] walks a [`SelectExpr`] in a fixed clause order and
//! asks the active [`SqlGenerator`] only for the fragments that differ
//! between databases.

pub mod dialect;
pub mod generator;
pub mod output;
pub mod sql;
pub mod traits;

#[cfg(test)]
mod tests;

use crate::ast::SelectExpr;
use crate::error::RelSqlResult;
pub use dialect::{Dialect, DialectRegistry};
pub use generator::{Compilation, CompileOptions, QuerySqlGenerator};
pub use output::{CommandOutput, ParameterBinding};
pub use traits::{PagingPlan, SqlGenerator};

/// Trait for converting a tree to SQL.
pub trait ToSql {
    /// Compile with the default dialect.
    fn to_sql(&self) -> RelSqlResult<CommandOutput> {
        self.to_sql_with_dialect(Dialect::default())
    }
    /// Compile with a specific dialect.
    fn to_sql_with_dialect(&self, dialect: Dialect) -> RelSqlResult<CommandOutput>;
}

impl ToSql for SelectExpr {
    fn to_sql_with_dialect(&self, dialect: Dialect) -> RelSqlResult<CommandOutput> {
        let generator = dialect.generator();
        QuerySqlGenerator::new(generator.as_ref()).compile(self)
    }
}
