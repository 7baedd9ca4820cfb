use super::TableMeta;
use crate::dialect::placeholders;

/// Render the create statement.
///
/// `INSERT INTO <table>(<create-fields>) VALUES (<placeholders>)`, with a
/// `RETURNING <read-fields>` clause where the dialect can return the
/// inserted row inline.
pub(crate) fn insert_statement(meta: &TableMeta<'_>) -> String {
    let mut sql = format!(
        "INSERT INTO {}({}) VALUES ({})",
        meta.table,
        meta.create_fields.join(","),
        placeholders(meta.create_fields.len(), meta.dialect)
    );

    if meta.dialect.supports_returning() {
        sql.push_str(" RETURNING ");
        sql.push_str(&meta.read_fields.join(","));
    }

    sql
}
