//! Configuration loaded from `relsql.toml`.
//!
//! ```toml
//! [compiler]
//! dialect = "sqlserver"
//! parameterize_literals = false
//!
//! [sqlserver]
//! default_schema = "dbo"
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{RelSqlError, RelSqlResult};
use crate::transpiler::sql::sqlserver::{DEFAULT_SCHEMA, SqlServerGenerator};
use crate::transpiler::{CompileOptions, DialectRegistry};

const LOCAL_CONFIG: &str = "relsql.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelSqlConfig {
    pub compiler: CompilerConfig,
    pub sqlserver: SqlServerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Registry id of the dialect used when none is given.
    pub dialect: String,
    pub parameterize_literals: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SqlServerConfig {
    /// Schema given to unqualified user-defined functions.
    pub default_schema: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            dialect: "sqlserver".to_string(),
            parameterize_literals: false,
        }
    }
}

impl Default for SqlServerConfig {
    fn default() -> Self {
        Self {
            default_schema: DEFAULT_SCHEMA.to_string(),
        }
    }
}

impl RelSqlConfig {
    /// Parse a TOML document.
    pub fn from_toml(content: &str) -> RelSqlResult<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| RelSqlError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or from `./relsql.toml`, or from the user config
    /// directory, falling back to defaults when none exists.
    pub fn load(path: Option<&Path>) -> RelSqlResult<Self> {
        if let Some(path) = path {
            return Self::load_file(path);
        }
        for candidate in Self::search_paths() {
            if candidate.exists() {
                return Self::load_file(&candidate);
            }
        }
        debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    fn load_file(path: &Path) -> RelSqlResult<Self> {
        debug!("loading config from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("relsql").join("config.toml"));
        }
        paths
    }

    fn validate(&self) -> RelSqlResult<()> {
        if self.sqlserver.default_schema.trim().is_empty() {
            return Err(RelSqlError::Config(
                "sqlserver.default_schema must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            parameterize_literals: self.compiler.parameterize_literals,
        }
    }

    /// Built-in dialects, with SQL Server using the configured schema.
    pub fn registry(&self) -> DialectRegistry {
        let mut registry = DialectRegistry::with_builtins();
        registry.register(
            "sqlserver",
            Arc::new(SqlServerGenerator::new(&self.sqlserver.default_schema)),
        );
        registry
    }
}
