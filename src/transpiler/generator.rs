//! Generic SELECT traversal.
//!
//! Clause order is fixed here for every dialect:
//! `SELECT [DISTINCT] [top] projections FROM sources joins WHERE GROUP BY
//! HAVING ORDER BY [trailing paging]`. Dialects only fill in the slots of
//! [`SqlGenerator`].

use std::borrow::Cow;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::ast::*;
use crate::error::{RelSqlError, RelSqlResult};
use crate::transpiler::output::{CommandOutput, ParameterBinding};
use crate::transpiler::traits::{PagingPlan, SqlGenerator};

/// Per-compile switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileOptions {
    /// Send literal nodes as bindings instead of inlining them.
    #[serde(default)]
    pub parameterize_literals: bool,
}

/// Compiles SELECT trees with one dialect.
///
/// Holds no mutable state, so a single instance can compile from many
/// threads at once.
#[derive(Clone, Copy)]
pub struct QuerySqlGenerator<'d> {
    dialect: &'d dyn SqlGenerator,
    options: CompileOptions,
}

impl<'d> QuerySqlGenerator<'d> {
    pub fn new(dialect: &'d dyn SqlGenerator) -> Self {
        Self {
            dialect,
            options: CompileOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    pub fn dialect(&self) -> &'d dyn SqlGenerator {
        self.dialect
    }

    /// Compile `select` into SQL text and positional bindings.
    ///
    /// On error nothing is returned; the partial buffer is dropped.
    pub fn compile(&self, select: &SelectExpr) -> RelSqlResult<CommandOutput> {
        let mut cx = Compilation::new(self.dialect, self.options);
        if let Err(e) = cx.generate_select(select) {
            debug!("{} compile failed: {}", self.dialect.name(), e);
            return Err(e);
        }
        let output = cx.finish();
        debug!(
            "{} compiled {} bytes of SQL with {} parameters",
            self.dialect.name(),
            output.sql().len(),
            output.parameters().len()
        );
        Ok(output)
    }
}

/// State of one compile: the SQL buffer and the bindings collected so far.
///
/// Dialect slots receive it to emit text and to visit child expressions, so
/// that parameters they render are bound in output order.
pub struct Compilation<'d> {
    dialect: &'d dyn SqlGenerator,
    options: CompileOptions,
    sql: String,
    parameters: Vec<ParameterBinding>,
}

impl<'d> Compilation<'d> {
    fn new(dialect: &'d dyn SqlGenerator, options: CompileOptions) -> Self {
        Self {
            dialect,
            options,
            sql: String::with_capacity(256),
            parameters: Vec::new(),
        }
    }

    fn finish(self) -> CommandOutput {
        CommandOutput::new(self.sql, self.parameters)
    }

    pub fn dialect(&self) -> &'d dyn SqlGenerator {
        self.dialect
    }

    /// Append raw SQL text.
    pub fn append(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    /// Append a quoted identifier.
    pub fn append_identifier(&mut self, name: &str) {
        let quoted = self.dialect.quote_identifier(name);
        self.sql.push_str(&quoted);
    }

    fn bind(&mut self, name: Option<&str>, value: &Value, ty: &SqlType) {
        self.parameters.push(ParameterBinding {
            name: name.map(str::to_string),
            value: value.clone(),
            ty: ty.clone(),
        });
        let placeholder = self.dialect.placeholder(self.parameters.len());
        self.sql.push_str(&placeholder);
    }

    fn comma_separated<T>(
        &mut self,
        items: &[T],
        mut emit: impl FnMut(&mut Self, &T) -> RelSqlResult<()>,
    ) -> RelSqlResult<()> {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.sql.push_str(", ");
            }
            emit(self, item)?;
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // SELECT
    // ---------------------------------------------------------------------

    pub(crate) fn generate_select(&mut self, select: &SelectExpr) -> RelSqlResult<()> {
        check_scope(select)?;

        let dialect = self.dialect;
        let paging = dialect.paging_plan(select);

        self.append("SELECT ");
        if select.distinct {
            self.append("DISTINCT ");
        }

        if let PagingPlan::Top { limit } = paging {
            check_row_count(limit, "limit")?;
            dialect.render_top_clause(self, limit)?;
        }

        if select.projections.is_empty() {
            self.append("1");
        } else {
            self.comma_separated(&select.projections, |cx, p| cx.generate_projection(p))?;
        }

        if !select.from.is_empty() {
            self.append(" FROM ");
            self.comma_separated(&select.from, |cx, s| cx.generate_source(s))?;
        } else if !select.joins.is_empty() {
            return Err(RelSqlError::malformed("JOIN without a FROM source"));
        } else if let Some(source) = dialect.empty_from_source() {
            self.append(" FROM ");
            self.append(source);
        }

        for join in &select.joins {
            self.generate_join(join)?;
        }

        if let Some(predicate) = &select.predicate {
            self.append(" WHERE ");
            self.visit(predicate)?;
        }

        if !select.group_by.is_empty() {
            self.append(" GROUP BY ");
            self.comma_separated(&select.group_by, |cx, e| cx.visit(e))?;
        }

        if let Some(having) = &select.having {
            self.append(" HAVING ");
            self.visit(having)?;
        }

        if !select.orderings.is_empty() {
            self.append(" ORDER BY ");
            self.comma_separated(&select.orderings, |cx, o| cx.generate_ordering(o))?;
        } else if select.offset.is_some() {
            if let Some(fallback) = dialect.fallback_ordering() {
                self.append(" ORDER BY ");
                self.append(fallback);
            }
        }

        match paging {
            PagingPlan::None | PagingPlan::Top { .. } => {}
            PagingPlan::Trailing { limit, offset } => {
                if let Some(limit) = limit {
                    check_row_count(limit, "limit")?;
                }
                if let Some(offset) = offset {
                    check_row_count(offset, "offset")?;
                }
                dialect.render_limit_offset_clause(self, limit, offset)?;
            }
        }

        Ok(())
    }

    fn generate_projection(&mut self, projection: &Projection) -> RelSqlResult<()> {
        self.visit(&projection.expr)?;
        let same_name = matches!(&projection.expr, SqlExpr::Column(c) if c.name == projection.alias);
        if !projection.alias.is_empty() && !same_name {
            self.append(" AS ");
            self.append_identifier(&projection.alias);
        }
        Ok(())
    }

    fn generate_ordering(&mut self, ordering: &OrderingTerm) -> RelSqlResult<()> {
        self.visit(&ordering.expr)?;
        if !ordering.ascending {
            self.append(" DESC");
        }
        Ok(())
    }

    fn generate_alias(&mut self, alias: &str) {
        let dialect = self.dialect;
        self.sql.push_str(dialect.table_alias_keyword());
        self.append_identifier(alias);
    }

    fn generate_source(&mut self, source: &TableSource) -> RelSqlResult<()> {
        match source {
            TableSource::Table {
                name,
                schema,
                alias,
            } => {
                if let Some(schema) = schema.as_deref().filter(|s| !s.is_empty()) {
                    self.append_identifier(schema);
                    self.append(".");
                }
                self.append_identifier(name);
                if let Some(alias) = alias.as_deref().filter(|a| !a.is_empty()) {
                    self.generate_alias(alias);
                }
            }
            TableSource::Subquery { select, alias } => {
                require_alias(alias, "derived table")?;
                self.append("(");
                self.generate_select(select)?;
                self.append(")");
                self.generate_alias(alias);
            }
            TableSource::TableFunction(function) => {
                require_alias(&function.alias, "table function")?;
                let function = self.dialect.normalize_table_function_ref(function);
                if let Cow::Owned(rewritten) = &function {
                    trace!(
                        "table function {} qualified with schema {:?}",
                        rewritten.name,
                        rewritten.schema
                    );
                }
                if function.is_built_in && function.schema().is_some() {
                    return Err(RelSqlError::malformed(format!(
                        "built-in table function {} cannot be schema-qualified",
                        function.name
                    )));
                }
                self.generate_function_name(&function.name, function.schema(), function.is_built_in);
                self.append("(");
                self.comma_separated(&function.arguments, |cx, e| cx.visit(e))?;
                self.append(")");
                self.generate_alias(&function.alias);
            }
            TableSource::SetOperation(operation) => {
                require_alias(&operation.alias, "set operation")?;
                if !self
                    .dialect
                    .supports_set_operation(operation.kind, operation.distinct)
                {
                    return Err(RelSqlError::unsupported(format!(
                        "{}{} is not supported by dialect '{}'",
                        operation.kind,
                        if operation.distinct { "" } else { " ALL" },
                        self.dialect.name()
                    )));
                }
                let keyword = self.dialect.set_operation_keyword(operation.kind);
                self.append("(");
                self.generate_set_operand(&operation.left)?;
                self.append(" ");
                self.append(&keyword);
                if !operation.distinct {
                    self.append(" ALL");
                }
                self.append(" ");
                self.generate_set_operand(&operation.right)?;
                self.append(")");
                self.generate_alias(&operation.alias);
            }
        }
        Ok(())
    }

    /// An operand with its own ordering or paging is wrapped so those clauses
    /// stay with the operand instead of applying to the whole set operation.
    fn generate_set_operand(&mut self, operand: &SelectExpr) -> RelSqlResult<()> {
        let paged =
            !operand.orderings.is_empty() || operand.limit.is_some() || operand.offset.is_some();
        if !paged {
            return self.generate_select(operand);
        }
        let dialect = self.dialect;
        self.append(dialect.set_operand_prefix());
        self.generate_select(operand)?;
        self.append(")");
        Ok(())
    }

    fn generate_join(&mut self, join: &Join) -> RelSqlResult<()> {
        if join.kind.takes_predicate() != join.predicate.is_some() {
            return Err(RelSqlError::malformed(format!(
                "{:?} join {} an ON predicate",
                join.kind,
                if join.kind.takes_predicate() { "requires" } else { "must not have" }
            )));
        }
        let keyword = match join.kind {
            JoinKind::Inner => " INNER JOIN ",
            JoinKind::Left => " LEFT JOIN ",
            JoinKind::Cross => " CROSS JOIN ",
            JoinKind::CrossApply | JoinKind::OuterApply if !self.dialect.supports_apply() => {
                return Err(RelSqlError::unsupported(format!(
                    "{:?} is not supported by dialect '{}'",
                    join.kind,
                    self.dialect.name()
                )));
            }
            JoinKind::CrossApply => " CROSS APPLY ",
            JoinKind::OuterApply => " OUTER APPLY ",
        };
        self.append(keyword);
        self.generate_source(&join.source)?;
        if let Some(predicate) = &join.predicate {
            self.append(" ON ");
            self.visit(predicate)?;
        }
        Ok(())
    }

    fn generate_function_name(&mut self, name: &str, schema: Option<&str>, is_built_in: bool) {
        if let Some(schema) = schema {
            self.append_identifier(schema);
            self.append(".");
        }
        if is_built_in {
            self.append(name);
        } else {
            self.append_identifier(name);
        }
    }

    // ---------------------------------------------------------------------
    // Expressions
    // ---------------------------------------------------------------------

    /// Render a scalar expression, binding any parameters it contains.
    pub fn visit(&mut self, expr: &SqlExpr) -> RelSqlResult<()> {
        match expr {
            SqlExpr::Column(column) => {
                if let Some(table) = column.table_alias.as_deref().filter(|t| !t.is_empty()) {
                    self.append_identifier(table);
                    self.append(".");
                }
                self.append_identifier(&column.name);
            }
            SqlExpr::Literal(literal) => {
                if self.options.parameterize_literals {
                    self.bind(None, &literal.value, &literal.ty);
                } else {
                    let sql = self.dialect.literal_sql(&literal.value, &literal.ty)?;
                    self.append(&sql);
                }
            }
            SqlExpr::Parameter(parameter) => {
                self.bind(Some(&parameter.name), &parameter.value, &parameter.ty);
            }
            SqlExpr::Unary { op, operand, .. } => self.visit_unary(op, operand)?,
            SqlExpr::Binary {
                left, op, right, ..
            } => self.visit_binary(left, *op, right)?,
            SqlExpr::Function(call) => self.visit_function(call)?,
            SqlExpr::Subquery(select) => {
                self.append("(");
                self.generate_select(select)?;
                self.append(")");
            }
            SqlExpr::Exists { subquery, negated } => {
                if *negated {
                    self.append("NOT ");
                }
                self.append("EXISTS (");
                self.generate_select(subquery)?;
                self.append(")");
            }
            SqlExpr::In {
                item,
                values,
                negated,
            } => {
                self.visit_operand(item, item.precedence() <= 4)?;
                self.append(if *negated { " NOT IN (" } else { " IN (" });
                match values {
                    InValues::List(list) if list.is_empty() => {
                        return Err(RelSqlError::malformed("IN with an empty value list"));
                    }
                    InValues::List(list) => {
                        self.comma_separated(list, |cx, e| cx.visit(e))?;
                    }
                    InValues::Subquery(select) => self.generate_select(select)?,
                }
                self.append(")");
            }
            SqlExpr::Like {
                item,
                pattern,
                escape,
                negated,
            } => {
                self.visit_operand(item, item.precedence() <= 4)?;
                self.append(if *negated { " NOT LIKE " } else { " LIKE " });
                self.visit_operand(pattern, pattern.precedence() <= 4)?;
                if let Some(escape) = escape {
                    self.append(" ESCAPE ");
                    self.visit(escape)?;
                }
            }
            SqlExpr::Case {
                operand,
                when_clauses,
                else_value,
                ..
            } => {
                if when_clauses.is_empty() {
                    return Err(RelSqlError::malformed("CASE without WHEN clauses"));
                }
                self.append("CASE");
                if let Some(operand) = operand {
                    self.append(" ");
                    self.visit(operand)?;
                }
                for (condition, result) in when_clauses {
                    self.append(" WHEN ");
                    self.visit(condition)?;
                    self.append(" THEN ");
                    self.visit(result)?;
                }
                if let Some(else_value) = else_value {
                    self.append(" ELSE ");
                    self.visit(else_value)?;
                }
                self.append(" END");
            }
            SqlExpr::Fragment(sql) => self.append(sql),
        }
        Ok(())
    }

    fn visit_operand(&mut self, expr: &SqlExpr, parenthesize: bool) -> RelSqlResult<()> {
        if parenthesize {
            self.append("(");
            self.visit(expr)?;
            self.append(")");
        } else {
            self.visit(expr)?;
        }
        Ok(())
    }

    fn visit_unary(&mut self, op: &UnaryOp, operand: &SqlExpr) -> RelSqlResult<()> {
        match op {
            UnaryOp::Not => {
                self.append("NOT ");
                self.visit_operand(operand, operand.precedence() < 3)?;
            }
            UnaryOp::Negate => {
                self.append("-");
                let parenthesize = operand.precedence() < 8 || starts_with_minus(operand);
                self.visit_operand(operand, parenthesize)?;
            }
            UnaryOp::IsNull | UnaryOp::IsNotNull => {
                self.visit_operand(operand, operand.precedence() <= 4)?;
                self.append(if *op == UnaryOp::IsNull {
                    " IS NULL"
                } else {
                    " IS NOT NULL"
                });
            }
            UnaryOp::Cast(ty) => {
                self.append("CAST(");
                self.visit(operand)?;
                self.append(" AS ");
                let type_name = self.dialect.type_name(ty);
                self.append(&type_name);
                self.append(")");
            }
        }
        Ok(())
    }

    fn visit_binary(&mut self, left: &SqlExpr, op: BinaryOp, right: &SqlExpr) -> RelSqlResult<()> {
        if op == BinaryOp::Concat && self.dialect.concat_operator().is_none() {
            self.append("CONCAT(");
            self.visit(left)?;
            self.append(", ");
            self.visit(right)?;
            self.append(")");
            return Ok(());
        }

        let precedence = op.precedence();
        let left_parens = left.precedence() < precedence
            || (op.is_comparison() && left.precedence() == precedence)
            || mixes_string_or_bitwise(op, left);
        let right_parens = right.precedence() < precedence
            || (right.precedence() == precedence
                && !(op.is_associative() && matches!(right, SqlExpr::Binary { op: inner, .. } if *inner == op)))
            || mixes_string_or_bitwise(op, right);

        self.visit_operand(left, left_parens)?;
        self.append(" ");
        match op {
            BinaryOp::Concat => {
                let dialect = self.dialect;
                self.append(dialect.concat_operator().unwrap_or("||"));
            }
            _ => {
                let token = op.to_string();
                self.append(&token);
            }
        }
        self.append(" ");
        self.visit_operand(right, right_parens)
    }

    fn visit_function(&mut self, call: &FunctionCall) -> RelSqlResult<()> {
        let call = self.dialect.normalize_function_call(call);
        if let Cow::Owned(rewritten) = &call {
            trace!(
                "function {} qualified with schema {:?}",
                rewritten.name,
                rewritten.schema
            );
        }
        check_function(&call)?;

        self.generate_function_name(&call.name, call.schema(), call.is_built_in);
        if !call.is_niladic {
            self.append("(");
            self.comma_separated(&call.arguments, |cx, e| cx.visit(e))?;
            self.append(")");
        }
        Ok(())
    }
}

/// Derived tables, table functions and set operations are only reachable
/// through their alias.
fn require_alias(alias: &str, what: &str) -> RelSqlResult<()> {
    if alias.is_empty() {
        return Err(RelSqlError::malformed(format!("{} without an alias", what)));
    }
    Ok(())
}

/// Whether `expr` renders with a leading `-`; a second `-` in front of it
/// would open a line comment.
fn starts_with_minus(expr: &SqlExpr) -> bool {
    match expr {
        SqlExpr::Unary {
            op: UnaryOp::Negate,
            ..
        } => true,
        SqlExpr::Literal(literal) => match &literal.value {
            Value::Int(n) => *n < 0,
            Value::Float(f) => f.is_sign_negative(),
            _ => false,
        },
        SqlExpr::Fragment(sql) => sql.trim_start().starts_with('-'),
        _ => false,
    }
}

/// A string or bitwise operator next to a different value operator is always
/// parenthesized, since databases disagree on how those rank.
fn mixes_string_or_bitwise(op: BinaryOp, child: &SqlExpr) -> bool {
    match child {
        SqlExpr::Binary { op: inner, .. } => {
            *inner != op
                && op.is_value_operator()
                && inner.is_value_operator()
                && (op.is_string_or_bitwise() || inner.is_string_or_bitwise())
        }
        _ => false,
    }
}

/// Aliases of the sources of one SELECT must be distinct.
fn check_scope(select: &SelectExpr) -> RelSqlResult<()> {
    let mut seen = HashSet::new();
    for alias in select.sources().filter_map(TableSource::alias) {
        if !seen.insert(alias) {
            return Err(RelSqlError::malformed(format!(
                "duplicate source alias '{}' in one SELECT",
                alias
            )));
        }
    }
    Ok(())
}

/// Constant limits and offsets must be non-negative integers.
fn check_row_count(expr: &SqlExpr, what: &str) -> RelSqlResult<()> {
    let value = match expr {
        SqlExpr::Literal(literal) => &literal.value,
        SqlExpr::Parameter(parameter) => &parameter.value,
        _ => return Ok(()),
    };
    if value.as_row_count().is_none() {
        return Err(RelSqlError::malformed(format!(
            "{} must be a non-negative integer, got {}",
            what, value
        )));
    }
    Ok(())
}

fn check_function(call: &FunctionCall) -> RelSqlResult<()> {
    if call.is_built_in && call.schema().is_some() {
        return Err(RelSqlError::malformed(format!(
            "built-in function {} cannot be schema-qualified",
            call.name
        )));
    }
    if call.is_niladic && !call.arguments.is_empty() {
        return Err(RelSqlError::malformed(format!(
            "niladic function {} has arguments",
            call.name
        )));
    }
    if !call.is_niladic && call.arguments_propagate_nullability.len() != call.arguments.len() {
        return Err(RelSqlError::malformed(format!(
            "function {} has {} arguments but {} nullability flags",
            call.name,
            call.arguments.len(),
            call.arguments_propagate_nullability.len()
        )));
    }
    Ok(())
}
