//! Transpiler test modules.
//!
//! Tests are organized by category:
//! - `core`: clause order, projections, operators and subqueries
//! - `dialects`: per-dialect syntax (quoting, placeholders, paging)
//! - `functions`: schema normalization of scalar and table functions
//! - `errors`: unsupported shapes and malformed trees

mod errors;
mod functions;
