use super::TableMeta;
use crate::dialect::{Dialect, bound_params, parameterize};
use crate::pagination::PaginationMode;

/// Render the single-row selection statement.
///
/// `SELECT <read-fields> FROM <table> WHERE (<pk>=<ph 1>)`, with the filter
/// conditions appended from parameter index 2.
pub(crate) fn single_select_statement(meta: &TableMeta<'_>) -> String {
    let mut sql = format!(
        "SELECT {} FROM {} WHERE ({}={})",
        meta.read_fields.join(","),
        meta.table,
        meta.primary_key,
        meta.dialect.placeholder(1)
    );

    if !meta.filter_fields.is_empty() {
        sql.push_str(" AND (");
        sql.push_str(&parameterize(meta.filter_fields, meta.dialect, true, 2));
        sql.push(')');
    }

    sql
}

/// Render the bulk selection statement with its pagination clause.
///
/// Filters come first (`WHERE (...)`), then the pagination bounds. The
/// keyset bound joins the filters with `AND`, or opens its own `WHERE`
/// when no filters are configured.
pub(crate) fn bulk_select_statement(
    meta: &TableMeta<'_>,
    mode: PaginationMode,
    keyset_field: Option<&str>,
) -> String {
    let mut sql = format!("SELECT {} FROM {}", meta.read_fields.join(","), meta.table);
    let has_filters = !meta.filter_fields.is_empty();
    let mut param_count = 0;

    if has_filters {
        sql.push_str(" WHERE (");
        sql.push_str(&parameterize(meta.filter_fields, meta.dialect, true, 1));
        sql.push(')');
        param_count = bound_params(meta.filter_fields);
    }

    match mode {
        PaginationMode::None => {}
        PaginationMode::Offset => match meta.dialect {
            Dialect::PostgreSql => {
                sql.push_str(&format!(
                    " OFFSET ${} FETCH NEXT ${} ROWS ONLY",
                    param_count + 1,
                    param_count + 2
                ));
            }
            Dialect::MySql | Dialect::Sqlite => sql.push_str(" LIMIT ? OFFSET ?"),
        },
        PaginationMode::Keyset => {
            // Presence of the ordering column is validated at build time.
            let col = keyset_field.unwrap_or_default();
            sql.push_str(if has_filters { " AND (" } else { " WHERE (" });
            sql.push_str(&format!(
                "{col}>{}) ORDER BY {col} ASC LIMIT {}",
                meta.dialect.placeholder(param_count + 1),
                meta.dialect.placeholder(param_count + 2)
            ));
        }
    }

    sql
}
