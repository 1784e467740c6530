//! The artifact handed to the execution layer.

use serde::{Deserialize, Serialize};

use crate::ast::{SqlType, Value};

/// One positional binding. `name` is set for parameter nodes and empty for
/// literals that were parameterized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterBinding {
    pub name: Option<String>,
    pub value: Value,
    pub ty: SqlType,
}

/// SQL text plus its parameter bindings, in placeholder order.
///
/// Produced once per compile and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandOutput {
    sql: String,
    parameters: Vec<ParameterBinding>,
}

impl CommandOutput {
    pub(crate) fn new(sql: String, parameters: Vec<ParameterBinding>) -> Self {
        Self { sql, parameters }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Bindings in the order their placeholders appear in [`sql`](Self::sql).
    pub fn parameters(&self) -> &[ParameterBinding] {
        &self.parameters
    }

    pub fn into_parts(self) -> (String, Vec<ParameterBinding>) {
        (self.sql, self.parameters)
    }
}

impl std::fmt::Display for CommandOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.sql)
    }
}
