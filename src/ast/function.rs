//! Function nodes: scalar calls and functions used as row sources.

use serde::{Deserialize, Serialize};

use crate::ast::{SqlExpr, SqlType};

/// A scalar function call.
///
/// Built-in functions are known natively to the target database and are never
/// schema-qualified. User-defined functions may carry a schema; when they do
/// not, the active dialect decides which schema they resolve against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    /// Empty or absent means unqualified.
    pub schema: Option<String>,
    pub is_built_in: bool,
    /// Rendered without parentheses (e.g. `CURRENT_TIMESTAMP`).
    pub is_niladic: bool,
    pub is_nullable: bool,
    /// One flag per argument.
    pub arguments_propagate_nullability: Vec<bool>,
    pub arguments: Vec<SqlExpr>,
    pub ty: SqlType,
}

impl FunctionCall {
    /// A built-in function whose nullability follows its arguments.
    pub fn built_in(name: impl Into<String>, arguments: Vec<SqlExpr>, ty: SqlType) -> Self {
        Self {
            name: name.into(),
            schema: None,
            is_built_in: true,
            is_niladic: false,
            is_nullable: true,
            arguments_propagate_nullability: vec![true; arguments.len()],
            arguments,
            ty,
        }
    }

    /// A built-in function rendered without an argument list.
    pub fn niladic(name: impl Into<String>, ty: SqlType) -> Self {
        Self {
            is_niladic: true,
            ..Self::built_in(name, Vec::new(), ty)
        }
    }

    /// A user-defined function, optionally schema-qualified.
    pub fn user_defined(
        schema: Option<&str>,
        name: impl Into<String>,
        arguments: Vec<SqlExpr>,
        ty: SqlType,
    ) -> Self {
        Self {
            schema: schema.map(str::to_string),
            is_built_in: false,
            ..Self::built_in(name, arguments, ty)
        }
    }

    /// The schema qualifier, treating an empty string as none.
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref().filter(|s| !s.is_empty())
    }

    /// Rebuild with `schema` as qualifier; every other field is copied.
    pub fn with_schema(&self, schema: &str) -> Self {
        Self {
            schema: Some(schema.to_string()),
            ..self.clone()
        }
    }
}

/// A function used as a row source in FROM or JOIN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableFunctionRef {
    pub name: String,
    pub schema: Option<String>,
    pub is_built_in: bool,
    pub arguments: Vec<SqlExpr>,
    pub alias: String,
}

impl TableFunctionRef {
    pub fn new(
        schema: Option<&str>,
        name: impl Into<String>,
        arguments: Vec<SqlExpr>,
        alias: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            schema: schema.map(str::to_string),
            is_built_in: false,
            arguments,
            alias: alias.into(),
        }
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref().filter(|s| !s.is_empty())
    }

    /// Rebuild with `schema` as qualifier; name, arguments and alias are kept.
    pub fn with_schema(&self, schema: &str) -> Self {
        Self {
            schema: Some(schema.to_string()),
            ..self.clone()
        }
    }
}
