//! Relational expression tree.
//!
//! Nodes are plain values: nothing in the compiler mutates them, and any
//! dialect rewrite produces a new node.

pub mod builders;
pub mod expr;
pub mod function;
pub mod select;
pub mod types;
pub mod values;

pub use self::expr::{BinaryOp, ColumnRef, InValues, Literal, Parameter, SqlExpr, UnaryOp};
pub use self::function::{FunctionCall, TableFunctionRef};
pub use self::select::{
    Join, JoinKind, OrderingTerm, Projection, SelectExpr, SetOpKind, SetOperation, TableSource,
};
pub use self::types::SqlType;
pub use self::values::Value;
