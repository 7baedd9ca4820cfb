//! Statement rendering for the five CRUD statements.
//!
//! Each statement is rendered once, at editor build time, from the
//! classified field subsets plus the dialect rules. PostgreSQL parameter
//! indices are threaded strictly sequentially across the clauses of a
//! single statement, in the exact order the binder supplies values at call
//! time.

mod delete;
mod insert;
mod select;
mod update;

pub(crate) use delete::delete_statement;
pub(crate) use insert::insert_statement;
pub(crate) use select::{bulk_select_statement, single_select_statement};
pub(crate) use update::update_statement;

use crate::dialect::Dialect;

/// Borrowed view of a table's classified, identifier-quoted field subsets.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TableMeta<'a> {
    /// Quoted table name.
    pub table: &'a str,
    pub dialect: Dialect,
    /// Quoted primary-key column.
    pub primary_key: &'a str,
    pub create_fields: &'a [String],
    pub read_fields: &'a [String],
    pub update_fields: &'a [String],
    pub filter_fields: &'a [String],
}
