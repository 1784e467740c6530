use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ast::SelectExpr;
use crate::error::{RelSqlError, RelSqlResult};
use crate::transpiler::generator::{CompileOptions, QuerySqlGenerator};
use crate::transpiler::output::CommandOutput;
use crate::transpiler::sql::mysql::MysqlGenerator;
use crate::transpiler::sql::oracle::OracleGenerator;
use crate::transpiler::sql::postgres::PostgresGenerator;
use crate::transpiler::sql::sqlite::SqliteGenerator;
use crate::transpiler::sql::sqlserver::SqlServerGenerator;
use crate::transpiler::traits::SqlGenerator;

/// Supported SQL Dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Postgres,
    MySQL,
    SQLite,
    SqlServer,
    Oracle,
}

impl Dialect {
    pub const ALL: [Dialect; 5] = [
        Dialect::Postgres,
        Dialect::MySQL,
        Dialect::SQLite,
        Dialect::SqlServer,
        Dialect::Oracle,
    ];

    /// Canonical registry identifier.
    pub fn id(&self) -> &'static str {
        match self {
            Dialect::Postgres => "postgres",
            Dialect::MySQL => "mysql",
            Dialect::SQLite => "sqlite",
            Dialect::SqlServer => "sqlserver",
            Dialect::Oracle => "oracle",
        }
    }

    pub fn generator(&self) -> Box<dyn SqlGenerator> {
        match self {
            Dialect::Postgres => Box::new(PostgresGenerator),
            Dialect::MySQL => Box::new(MysqlGenerator),
            Dialect::SQLite => Box::new(SqliteGenerator),
            Dialect::SqlServer => Box::new(SqlServerGenerator::default()),
            Dialect::Oracle => Box::new(OracleGenerator),
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for Dialect {
    type Err = RelSqlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Dialect::Postgres),
            "mysql" | "mariadb" => Ok(Dialect::MySQL),
            "sqlite" => Ok(Dialect::SQLite),
            "sqlserver" | "mssql" | "tsql" => Ok(Dialect::SqlServer),
            "oracle" => Ok(Dialect::Oracle),
            _ => Err(RelSqlError::UnknownDialect(s.to_string())),
        }
    }
}

/// Maps dialect identifiers to configured generators.
///
/// Selecting a dialect happens here, at configuration time; the compiler
/// itself only ever sees a `&dyn SqlGenerator`.
#[derive(Clone, Default)]
pub struct DialectRegistry {
    generators: BTreeMap<String, Arc<dyn SqlGenerator>>,
}

impl DialectRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in dialect under its canonical id.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for dialect in Dialect::ALL {
            registry.register(dialect.id(), Arc::from(dialect.generator()));
        }
        registry
    }

    /// Register `generator` under `id`, returning any generator it replaces.
    pub fn register(
        &mut self,
        id: &str,
        generator: Arc<dyn SqlGenerator>,
    ) -> Option<Arc<dyn SqlGenerator>> {
        self.generators.insert(id.to_ascii_lowercase(), generator)
    }

    /// Look up a generator by id or by a built-in alias such as `mssql`.
    pub fn get(&self, id: &str) -> RelSqlResult<Arc<dyn SqlGenerator>> {
        let key = id.to_ascii_lowercase();
        if let Some(generator) = self.generators.get(&key) {
            return Ok(Arc::clone(generator));
        }
        Dialect::from_str(&key)
            .ok()
            .and_then(|d| self.generators.get(d.id()))
            .cloned()
            .ok_or_else(|| RelSqlError::UnknownDialect(id.to_string()))
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.generators.keys().map(String::as_str)
    }

    /// Compile `select` with the dialect registered under `id`.
    pub fn compile(
        &self,
        id: &str,
        select: &SelectExpr,
        options: CompileOptions,
    ) -> RelSqlResult<CommandOutput> {
        let generator = self.get(id)?;
        QuerySqlGenerator::new(generator.as_ref())
            .with_options(options)
            .compile(select)
    }
}

impl std::fmt::Debug for DialectRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.generators.keys()).finish()
    }
}
