//! Pagination strategies for bulk reads.

use crate::dialect::Dialect;
use crate::value::Value;

/// How bulk selection queries page through a table.
///
/// The default is [`PaginationMode::None`]: everything is selected at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PaginationMode {
    /// Do not paginate.
    #[default]
    None,

    /// `LIMIT`/`OFFSET` pagination. The engine scans up to the offset, so
    /// cost grows with the offset.
    Offset,

    /// Keyset pagination: an indexed column compared with `>` plus
    /// `ORDER BY ... LIMIT`. Faster than offset paging for deep pages.
    Keyset,
}

/// Page bounds passed to `read`. The variant must match the editor's
/// configured [`PaginationMode`].
#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    /// Offset bounds: skip `offset` rows, return at most `size`.
    Offset { offset: i64, size: i64 },

    /// Keyset bounds: rows with an ordering-column value greater than
    /// `after`, at most `size` of them.
    Keyset { after: Value, size: i64 },
}

impl Page {
    /// Offset page bounds for 0-based page number `page` of `size` rows.
    pub fn offset(page: i64, size: i64) -> Self {
        Page::Offset {
            offset: page * size,
            size,
        }
    }

    /// Keyset page bounds starting after the ordering-column value `after`.
    pub fn keyset(after: impl Into<Value>, size: i64) -> Self {
        Page::Keyset {
            after: after.into(),
            size,
        }
    }

    /// The mode this payload belongs to.
    pub fn mode(&self) -> PaginationMode {
        match self {
            Page::Offset { .. } => PaginationMode::Offset,
            Page::Keyset { .. } => PaginationMode::Keyset,
        }
    }

    /// The two trailing bound arguments of the bulk-read statement, in
    /// binding order.
    ///
    /// Offset mode depends on the dialect's clause order: `LIMIT ? OFFSET ?`
    /// (MySQL/SQLite) binds size first, `OFFSET $n FETCH NEXT $m ROWS ONLY`
    /// (PostgreSQL) binds offset first.
    pub(crate) fn bind_args(&self, dialect: Dialect) -> [Value; 2] {
        match self {
            Page::Offset { offset, size } => match dialect {
                Dialect::PostgreSql => [Value::BigInt(*offset), Value::BigInt(*size)],
                Dialect::MySql | Dialect::Sqlite => [Value::BigInt(*size), Value::BigInt(*offset)],
            },
            Page::Keyset { after, size } => [after.clone(), Value::BigInt(*size)],
        }
    }
}
