use super::TableMeta;
use crate::dialect::{bound_params, parameterize};

/// Render the delete statement.
///
/// With soft deletion configured the statement is rewritten as an
/// `UPDATE <table> SET <soft-delete-columns>` instead of a
/// `DELETE FROM <table>`; either way it is keyed by primary key with the
/// filter conditions appended. Binding order at call time is soft-delete
/// column values (soft mode only), primary key, filter values.
pub(crate) fn delete_statement(meta: &TableMeta<'_>, soft_columns: Option<&[String]>) -> String {
    let mut param_count = 0;

    let mut sql = match soft_columns {
        Some(columns) => {
            param_count = bound_params(columns);
            format!(
                "UPDATE {} SET {}",
                meta.table,
                parameterize(columns, meta.dialect, false, 1)
            )
        }
        None => format!("DELETE FROM {}", meta.table),
    };

    sql.push_str(&format!(
        " WHERE {}={}",
        meta.primary_key,
        meta.dialect.placeholder(param_count + 1)
    ));

    if !meta.filter_fields.is_empty() {
        sql.push_str(" AND (");
        sql.push_str(&parameterize(
            meta.filter_fields,
            meta.dialect,
            true,
            param_count + 2,
        ));
        sql.push(')');
    }

    sql
}
