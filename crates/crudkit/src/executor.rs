//! Abstract statement executor boundary.
//!
//! The editor never talks to a driver directly. It hands a prepared-text
//! statement and its positional arguments to an [`Executor`], which is
//! whatever the caller wraps around their connection or pool. Connection
//! management, transactions, timeouts and cancellation all live behind
//! this boundary.

use crate::error::CrudResult;
use crate::row::Row;
use crate::value::Value;

/// Outcome of a modifying statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecResult {
    /// Rows affected by the statement.
    pub rows_affected: u64,

    /// Driver-assigned identifier of the last inserted row, where the
    /// driver reports one (MySQL/SQLite).
    pub last_insert_id: Option<i64>,
}

/// A driver adapter capable of running one parameterized statement.
///
/// Implementations wrap a concrete driver connection or pool and scan
/// result columns into [`Row`]s, preserving engine-native value types
/// (see [`Value`]). Errors are surfaced unchanged through
/// [`CrudError::Execution`](crate::CrudError::Execution) or
/// [`CrudError::Decode`](crate::CrudError::Decode).
pub trait Executor: Send + Sync {
    /// Execute a modifying statement, returning the affected-row count and,
    /// when applicable, the driver-generated last-inserted identifier.
    fn execute(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = CrudResult<ExecResult>> + Send;

    /// Execute a query-style statement and return every result row with
    /// named columns.
    fn query(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = CrudResult<Vec<Row>>> + Send;
}
