//! The SELECT node and the row sources it draws from.

use serde::{Deserialize, Serialize};

use crate::ast::{SqlExpr, TableFunctionRef};

/// One entry of the projection list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub expr: SqlExpr,
    /// Empty means no alias.
    pub alias: String,
}

/// One ORDER BY term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderingTerm {
    pub expr: SqlExpr,
    pub ascending: bool,
}

/// Set operation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetOpKind {
    Union,
    Intersect,
    Except,
}

impl std::fmt::Display for SetOpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SetOpKind::Union => write!(f, "UNION"),
            SetOpKind::Intersect => write!(f, "INTERSECT"),
            SetOpKind::Except => write!(f, "EXCEPT"),
        }
    }
}

/// `left <kind> [ALL] right`, used as an aliased row source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetOperation {
    pub kind: SetOpKind,
    /// `false` renders `ALL`.
    pub distinct: bool,
    pub left: Box<SelectExpr>,
    pub right: Box<SelectExpr>,
    pub alias: String,
}

/// A row source in FROM or JOIN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TableSource {
    Table {
        name: String,
        schema: Option<String>,
        alias: Option<String>,
    },
    Subquery {
        select: Box<SelectExpr>,
        alias: String,
    },
    TableFunction(TableFunctionRef),
    SetOperation(SetOperation),
}

impl TableSource {
    /// The name other nodes use to reference rows of this source.
    pub fn alias(&self) -> Option<&str> {
        let alias: &str = match self {
            TableSource::Table { name, alias, .. } => alias.as_deref().unwrap_or(name.as_str()),
            TableSource::Subquery { alias, .. } => alias.as_str(),
            TableSource::TableFunction(f) => f.alias.as_str(),
            TableSource::SetOperation(op) => op.alias.as_str(),
        };
        Some(alias).filter(|a| !a.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinKind {
    Inner,
    Left,
    Cross,
    /// Lateral inner join (`CROSS APPLY`)
    CrossApply,
    /// Lateral outer join (`OUTER APPLY`)
    OuterApply,
}

impl JoinKind {
    /// Inner and left joins take an ON predicate; the others must not.
    pub fn takes_predicate(self) -> bool {
        matches!(self, JoinKind::Inner | JoinKind::Left)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Join {
    pub kind: JoinKind,
    pub source: TableSource,
    pub predicate: Option<SqlExpr>,
}

/// The root of one query block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectExpr {
    pub distinct: bool,
    pub projections: Vec<Projection>,
    /// Sources rendered comma separated after FROM.
    pub from: Vec<TableSource>,
    pub joins: Vec<Join>,
    pub predicate: Option<SqlExpr>,
    pub group_by: Vec<SqlExpr>,
    pub having: Option<SqlExpr>,
    pub orderings: Vec<OrderingTerm>,
    pub limit: Option<SqlExpr>,
    pub offset: Option<SqlExpr>,
}

impl SelectExpr {
    /// SELECT from a single source.
    pub fn new(source: TableSource) -> Self {
        Self {
            from: vec![source],
            ..Self::default()
        }
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Project an expression under its own name.
    pub fn project(mut self, expr: SqlExpr) -> Self {
        self.projections.push(Projection {
            expr,
            alias: String::new(),
        });
        self
    }

    /// Project an expression `AS alias`.
    pub fn project_as(mut self, expr: SqlExpr, alias: &str) -> Self {
        self.projections.push(Projection {
            expr,
            alias: alias.to_string(),
        });
        self
    }

    /// Add another comma-separated source.
    pub fn also_from(mut self, source: TableSource) -> Self {
        self.from.push(source);
        self
    }

    pub fn join(mut self, kind: JoinKind, source: TableSource, predicate: Option<SqlExpr>) -> Self {
        self.joins.push(Join {
            kind,
            source,
            predicate,
        });
        self
    }

    pub fn inner_join(self, source: TableSource, on: SqlExpr) -> Self {
        self.join(JoinKind::Inner, source, Some(on))
    }

    pub fn left_join(self, source: TableSource, on: SqlExpr) -> Self {
        self.join(JoinKind::Left, source, Some(on))
    }

    /// Add a predicate; repeated calls are combined with AND.
    pub fn filter(mut self, predicate: SqlExpr) -> Self {
        self.predicate = Some(match self.predicate.take() {
            Some(existing) => crate::ast::builders::and(existing, predicate),
            None => predicate,
        });
        self
    }

    pub fn group_by(mut self, key: SqlExpr) -> Self {
        self.group_by.push(key);
        self
    }

    pub fn having(mut self, predicate: SqlExpr) -> Self {
        self.having = Some(predicate);
        self
    }

    pub fn order_asc(mut self, expr: SqlExpr) -> Self {
        self.orderings.push(OrderingTerm {
            expr,
            ascending: true,
        });
        self
    }

    pub fn order_desc(mut self, expr: SqlExpr) -> Self {
        self.orderings.push(OrderingTerm {
            expr,
            ascending: false,
        });
        self
    }

    pub fn limit(mut self, limit: SqlExpr) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: SqlExpr) -> Self {
        self.offset = Some(offset);
        self
    }

    /// All sources in scope of this block, FROM entries first, then joins.
    pub fn sources(&self) -> impl Iterator<Item = &TableSource> {
        self.from.iter().chain(self.joins.iter().map(|j| &j.source))
    }
}
