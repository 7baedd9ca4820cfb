use super::TableMeta;
use crate::dialect::{bound_params, parameterize};

/// Render the update statement.
///
/// `UPDATE <table> SET <update-fields>` parameterized from index 1, then
/// `WHERE <pk>=<next>` and the filter conditions, then `RETURNING
/// <read-fields>` where supported. Binding order at call time is update
/// values, primary key, filter values.
pub(crate) fn update_statement(meta: &TableMeta<'_>) -> String {
    let set_params = bound_params(meta.update_fields);

    let mut sql = format!(
        "UPDATE {} SET {} WHERE {}={}",
        meta.table,
        parameterize(meta.update_fields, meta.dialect, false, 1),
        meta.primary_key,
        meta.dialect.placeholder(set_params + 1)
    );

    if !meta.filter_fields.is_empty() {
        sql.push_str(" AND (");
        sql.push_str(&parameterize(
            meta.filter_fields,
            meta.dialect,
            true,
            set_params + 2,
        ));
        sql.push(')');
    }

    if meta.dialect.supports_returning() {
        sql.push_str(" RETURNING ");
        sql.push_str(&meta.read_fields.join(","));
    }

    sql
}
