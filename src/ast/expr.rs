use serde::{Deserialize, Serialize};

use crate::ast::{FunctionCall, SelectExpr, SqlType, Value};

/// Unary operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    /// NOT operand
    Not,
    /// -operand
    Negate,
    /// operand IS NULL
    IsNull,
    /// operand IS NOT NULL
    IsNotNull,
    /// CAST(operand AS type)
    Cast(SqlType),
}

/// Binary operators for expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    /// Addition (+)
    Add,
    /// Subtraction (-)
    Subtract,
    /// Multiplication (*)
    Multiply,
    /// Division (/)
    Divide,
    /// Modulo (%)
    Modulo,
    /// String concatenation (|| or + depending on dialect)
    Concat,
    And,
    Or,
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    BitwiseAnd,
    BitwiseOr,
}

impl BinaryOp {
    /// Binding strength; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Or => 1,
            BinaryOp::And => 2,
            BinaryOp::Equal
            | BinaryOp::NotEqual
            | BinaryOp::LessThan
            | BinaryOp::LessThanOrEqual
            | BinaryOp::GreaterThan
            | BinaryOp::GreaterThanOrEqual => 4,
            BinaryOp::Concat | BinaryOp::BitwiseAnd | BinaryOp::BitwiseOr => 5,
            BinaryOp::Add | BinaryOp::Subtract => 6,
            BinaryOp::Multiply | BinaryOp::Divide | BinaryOp::Modulo => 7,
        }
    }

    /// `||`, `&` and `|` rank differently against `+`/`-` across databases.
    pub fn is_string_or_bitwise(self) -> bool {
        matches!(self, BinaryOp::Concat | BinaryOp::BitwiseAnd | BinaryOp::BitwiseOr)
    }

    /// Arithmetic, string or bitwise: anything binding tighter than a comparison.
    pub fn is_value_operator(self) -> bool {
        self.precedence() > 4
    }

    /// `a op (b op c)` may drop its parentheses.
    pub fn is_associative(self) -> bool {
        matches!(
            self,
            BinaryOp::Add
                | BinaryOp::Multiply
                | BinaryOp::Concat
                | BinaryOp::And
                | BinaryOp::Or
                | BinaryOp::BitwiseAnd
                | BinaryOp::BitwiseOr
        )
    }

    pub fn is_comparison(self) -> bool {
        self.precedence() == 4
    }
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinaryOp::Add => write!(f, "+"),
            BinaryOp::Subtract => write!(f, "-"),
            BinaryOp::Multiply => write!(f, "*"),
            BinaryOp::Divide => write!(f, "/"),
            BinaryOp::Modulo => write!(f, "%"),
            BinaryOp::Concat => write!(f, "||"),
            BinaryOp::And => write!(f, "AND"),
            BinaryOp::Or => write!(f, "OR"),
            BinaryOp::Equal => write!(f, "="),
            BinaryOp::NotEqual => write!(f, "<>"),
            BinaryOp::LessThan => write!(f, "<"),
            BinaryOp::LessThanOrEqual => write!(f, "<="),
            BinaryOp::GreaterThan => write!(f, ">"),
            BinaryOp::GreaterThanOrEqual => write!(f, ">="),
            BinaryOp::BitwiseAnd => write!(f, "&"),
            BinaryOp::BitwiseOr => write!(f, "|"),
        }
    }
}

/// Reference to a column, optionally qualified by the alias of its source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRef {
    pub name: String,
    pub table_alias: Option<String>,
    pub ty: SqlType,
    pub nullable: bool,
}

/// A constant rendered inline (or bound, when literals are parameterized).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Literal {
    pub value: Value,
    pub ty: SqlType,
}

/// A value always sent out-of-band as a positional binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub value: Value,
    pub ty: SqlType,
}

/// Right-hand side of an IN test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InValues {
    List(Vec<SqlExpr>),
    Subquery(Box<SelectExpr>),
}

/// A scalar expression node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SqlExpr {
    Column(ColumnRef),
    Literal(Literal),
    Parameter(Parameter),
    Unary {
        op: UnaryOp,
        operand: Box<SqlExpr>,
        ty: SqlType,
    },
    Binary {
        left: Box<SqlExpr>,
        op: BinaryOp,
        right: Box<SqlExpr>,
        ty: SqlType,
    },
    Function(FunctionCall),
    /// Scalar subquery: `(SELECT ...)`
    Subquery(Box<SelectExpr>),
    /// `[NOT] EXISTS (SELECT ...)`
    Exists {
        subquery: Box<SelectExpr>,
        negated: bool,
    },
    /// `item [NOT] IN (...)`
    In {
        item: Box<SqlExpr>,
        values: InValues,
        negated: bool,
    },
    /// `item [NOT] LIKE pattern [ESCAPE escape]`
    Like {
        item: Box<SqlExpr>,
        pattern: Box<SqlExpr>,
        escape: Option<Box<SqlExpr>>,
        negated: bool,
    },
    /// `CASE [operand] WHEN .. THEN .. [ELSE ..] END`
    Case {
        operand: Option<Box<SqlExpr>>,
        when_clauses: Vec<(SqlExpr, SqlExpr)>,
        else_value: Option<Box<SqlExpr>>,
        ty: SqlType,
    },
    /// Raw SQL text, emitted verbatim (e.g. `*` in `COUNT(*)`).
    Fragment(String),
}

impl SqlExpr {
    /// Declared value type of this node.
    pub fn ty(&self) -> SqlType {
        match self {
            SqlExpr::Column(c) => c.ty.clone(),
            SqlExpr::Literal(l) => l.ty.clone(),
            SqlExpr::Parameter(p) => p.ty.clone(),
            SqlExpr::Unary { ty, .. } | SqlExpr::Binary { ty, .. } | SqlExpr::Case { ty, .. } => {
                ty.clone()
            }
            SqlExpr::Function(f) => f.ty.clone(),
            SqlExpr::Subquery(select) => select
                .projections
                .first()
                .map(|p| p.expr.ty())
                .unwrap_or(SqlType::Int),
            SqlExpr::Exists { .. } | SqlExpr::In { .. } | SqlExpr::Like { .. } => SqlType::Boolean,
            SqlExpr::Fragment(_) => SqlType::Custom(String::new()),
        }
    }

    /// Binding strength of the rendered node, used to decide parentheses.
    pub fn precedence(&self) -> u8 {
        match self {
            SqlExpr::Binary { op, .. } => op.precedence(),
            SqlExpr::Unary { op: UnaryOp::Not, .. } => 3,
            SqlExpr::Unary {
                op: UnaryOp::IsNull | UnaryOp::IsNotNull,
                ..
            }
            | SqlExpr::In { .. }
            | SqlExpr::Like { .. } => 4,
            SqlExpr::Unary {
                op: UnaryOp::Negate,
                ..
            } => 8,
            _ => 9,
        }
    }
}
