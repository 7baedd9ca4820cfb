//! Table editor: build-time configuration and the five CRUD verbs.

use std::sync::Arc;

use tracing::debug;

use crate::dialect::{Dialect, quote_ident, takes_placeholder, unquote_ident};
use crate::error::{CrudError, CrudResult};
use crate::executor::Executor;
use crate::field::{Field, classify, primary_key};
use crate::form::Form;
use crate::pagination::{Page, PaginationMode};
use crate::row::Row;
use crate::stmt::{
    TableMeta, bulk_select_statement, delete_statement, insert_statement, single_select_statement,
    update_statement,
};
use crate::value::Value;

/// Invoked before an operation, with the editor and the input form.
///
/// Hooks are expected not to fail; anything fallible belongs in the
/// executor.
pub type PreHook = Arc<dyn Fn(&Editor, &mut dyn Form) + Send + Sync>;

/// Invoked after an operation, with the editor and the resulting rows.
pub type PostHook = Arc<dyn Fn(&Editor, &[Row]) + Send + Sync>;

impl std::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hooks").finish_non_exhaustive()
    }
}

#[derive(Clone, Default)]
struct Hooks {
    pre_create: Option<PreHook>,
    post_create: Option<PostHook>,
    pre_read: Option<PreHook>,
    post_read: Option<PostHook>,
    pre_update: Option<PreHook>,
    post_update: Option<PostHook>,
    pre_delete: Option<PreHook>,
    post_delete: Option<PostHook>,
}

/// Configuration value assembled before the validating [`build`] step.
///
/// All cross-field invariants (non-empty field set, unique names, primary
/// key present, keyset column named) are checked once in
/// [`EditorBuilder::build`], which returns the immutable [`Editor`].
///
/// ```
/// use crudkit::{Dialect, Editor, Field};
///
/// let editor = Editor::builder("students", Dialect::PostgreSql)
///     .field(Field::new("id").primary_key().on_read())
///     .field(Field::new("name").always())
///     .field(Field::new("age").always())
///     .field(Field::new("school_id").on_create().on_read().selection_filter())
///     .soft_delete(["deleted_at"])
///     .paginate_keyset("id")
///     .build()
///     .unwrap();
/// assert!(editor.uses_keyset_pagination());
/// ```
pub struct EditorBuilder {
    table: String,
    dialect: Dialect,
    fields: Vec<Field>,
    soft_delete_columns: Option<Vec<String>>,
    pagination: PaginationMode,
    keyset_field: Option<String>,
    hooks: Hooks,
}

impl EditorBuilder {
    /// Start configuring an editor for `table` in `dialect`.
    pub fn new(table: impl Into<String>, dialect: Dialect) -> Self {
        Self {
            table: table.into(),
            dialect,
            fields: Vec::new(),
            soft_delete_columns: None,
            pagination: PaginationMode::None,
            keyset_field: None,
            hooks: Hooks::default(),
        }
    }

    /// Declare one field. Declaration order is preserved in every derived
    /// field subset.
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Declare several fields at once.
    pub fn fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Replace physical deletion with an update setting `columns`.
    ///
    /// A call to `delete` then executes an `UPDATE <table> SET <columns>`
    /// instead of a `DELETE FROM <table>`, binding one form value per
    /// column.
    pub fn soft_delete<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.soft_delete_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Paginate bulk reads with `LIMIT`/`OFFSET` bounds.
    pub fn paginate_offset(mut self) -> Self {
        self.pagination = PaginationMode::Offset;
        self.keyset_field = None;
        self
    }

    /// Paginate bulk reads by keyset over the ordering column `field`.
    pub fn paginate_keyset(mut self, field: impl Into<String>) -> Self {
        self.pagination = PaginationMode::Keyset;
        self.keyset_field = Some(field.into());
        self
    }

    /// Run `hook` before every create.
    pub fn on_pre_create<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Editor, &mut dyn Form) + Send + Sync + 'static,
    {
        self.hooks.pre_create = Some(Arc::new(hook));
        self
    }

    /// Run `hook` after every create with the resulting row.
    pub fn on_post_create<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Editor, &[Row]) + Send + Sync + 'static,
    {
        self.hooks.post_create = Some(Arc::new(hook));
        self
    }

    /// Run `hook` before every bulk read.
    pub fn on_pre_read<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Editor, &mut dyn Form) + Send + Sync + 'static,
    {
        self.hooks.pre_read = Some(Arc::new(hook));
        self
    }

    /// Run `hook` after every bulk read with the result set.
    pub fn on_post_read<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Editor, &[Row]) + Send + Sync + 'static,
    {
        self.hooks.post_read = Some(Arc::new(hook));
        self
    }

    /// Run `hook` before every update.
    pub fn on_pre_update<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Editor, &mut dyn Form) + Send + Sync + 'static,
    {
        self.hooks.pre_update = Some(Arc::new(hook));
        self
    }

    /// Run `hook` after every update with the resulting row.
    pub fn on_post_update<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Editor, &[Row]) + Send + Sync + 'static,
    {
        self.hooks.post_update = Some(Arc::new(hook));
        self
    }

    /// Run `hook` before every delete.
    pub fn on_pre_delete<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Editor, &mut dyn Form) + Send + Sync + 'static,
    {
        self.hooks.pre_delete = Some(Arc::new(hook));
        self
    }

    /// Run `hook` after every delete.
    pub fn on_post_delete<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Editor, &[Row]) + Send + Sync + 'static,
    {
        self.hooks.post_delete = Some(Arc::new(hook));
        self
    }

    /// Validate the configuration, render the five statements and return
    /// the immutable editor.
    ///
    /// Fails with [`CrudError::Config`] if the field set is empty, a field
    /// name is duplicated, no field is marked primary key, the keyset
    /// ordering column is blank, or soft deletion names no columns.
    pub fn build(self) -> CrudResult<Editor> {
        if self.fields.is_empty() {
            return Err(CrudError::config("fields cannot be empty"));
        }
        // Pairwise scan; tables are narrow enough that O(n²) is fine.
        for (i, a) in self.fields.iter().enumerate() {
            for (j, b) in self.fields.iter().enumerate().skip(i + 1) {
                if a.name() == b.name() {
                    return Err(CrudError::config(format!(
                        "duplicate field '{}' at {i} and {j}",
                        a.name()
                    )));
                }
            }
        }

        let Some(pk) = primary_key(&self.fields) else {
            return Err(CrudError::config(format!(
                "table '{}' has no field marked as primary key",
                self.table
            )));
        };
        let primary_key = pk.name().to_string();

        let keyset_field = match (self.pagination, &self.keyset_field) {
            (PaginationMode::Keyset, Some(f)) if !f.trim().is_empty() => {
                Some(quote_ident(f, self.dialect))
            }
            (PaginationMode::Keyset, _) => {
                return Err(CrudError::config(
                    "keyset pagination requires a field to be specified",
                ));
            }
            _ => None,
        };

        let soft_delete_columns = match self.soft_delete_columns {
            Some(cols) if cols.is_empty() => {
                return Err(CrudError::config(
                    "soft deletion requires at least one column",
                ));
            }
            Some(cols) => Some(
                cols.iter()
                    .map(|c| quote_ident(c, self.dialect))
                    .collect::<Vec<_>>(),
            ),
            None => None,
        };

        let roles = classify(&self.fields, self.dialect);
        let table_quoted = quote_ident(&self.table, self.dialect);
        let primary_key_quoted = quote_ident(&primary_key, self.dialect);

        let meta = TableMeta {
            table: &table_quoted,
            dialect: self.dialect,
            primary_key: &primary_key_quoted,
            create_fields: &roles.create,
            read_fields: &roles.read,
            update_fields: &roles.update,
            filter_fields: &roles.filter,
        };

        let create_statement = insert_statement(&meta);
        let single_read_statement = single_select_statement(&meta);
        let read_statement =
            bulk_select_statement(&meta, self.pagination, keyset_field.as_deref());
        let update_statement = update_statement(&meta);
        let delete_statement = delete_statement(&meta, soft_delete_columns.as_deref());

        debug!(sql = %create_statement, "built create statement");
        debug!(sql = %single_read_statement, "built single selection statement");
        debug!(sql = %read_statement, "built read statement");
        debug!(sql = %update_statement, "built update statement");
        debug!(sql = %delete_statement, "built delete statement");

        Ok(Editor {
            table: self.table,
            dialect: self.dialect,
            primary_key,
            create_fields: roles.create,
            read_fields: roles.read,
            update_fields: roles.update,
            filter_fields: roles.filter,
            soft_delete_columns,
            pagination: self.pagination,
            create_statement,
            single_read_statement,
            read_statement,
            update_statement,
            delete_statement,
            hooks: self.hooks,
        })
    }
}

/// The built, immutable handle for CRUD operations on one table.
///
/// Holds only configuration fixed at build time, so one instance can be
/// shared and used concurrently without locking; every operation is a
/// function of (editor, form, executor).
///
/// On MySQL and SQLite, `create` and `update` execute two statements (the
/// write, then a re-select keyed by primary key) that are **not** atomic: a
/// concurrent mutation between them can make the follow-up read reflect a
/// later state, and a failure of the follow-up read does not roll back the
/// already-committed write.
#[derive(Clone, Debug)]
pub struct Editor {
    table: String,
    dialect: Dialect,
    primary_key: String,
    create_fields: Vec<String>,
    read_fields: Vec<String>,
    update_fields: Vec<String>,
    filter_fields: Vec<String>,
    soft_delete_columns: Option<Vec<String>>,
    pagination: PaginationMode,
    create_statement: String,
    single_read_statement: String,
    read_statement: String,
    update_statement: String,
    delete_statement: String,
    hooks: Hooks,
}

impl Editor {
    /// Start configuring an editor for `table` in `dialect`.
    pub fn builder(table: impl Into<String>, dialect: Dialect) -> EditorBuilder {
        EditorBuilder::new(table, dialect)
    }

    /// The unquoted table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// The configured dialect.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// The unquoted primary-key column name.
    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    /// Whether bulk reads use keyset pagination.
    pub fn uses_keyset_pagination(&self) -> bool {
        self.pagination == PaginationMode::Keyset
    }

    /// The rendered INSERT statement.
    pub fn create_sql(&self) -> &str {
        &self.create_statement
    }

    /// The rendered single-row SELECT statement.
    pub fn single_read_sql(&self) -> &str {
        &self.single_read_statement
    }

    /// The rendered bulk SELECT statement.
    pub fn read_sql(&self) -> &str {
        &self.read_statement
    }

    /// The rendered UPDATE statement.
    pub fn update_sql(&self) -> &str {
        &self.update_statement
    }

    /// The rendered DELETE (or soft-delete UPDATE) statement.
    pub fn delete_sql(&self) -> &str {
        &self.delete_statement
    }

    /// Insert a new record and return the stored row.
    ///
    /// On PostgreSQL the INSERT returns the row inline. On MySQL/SQLite
    /// the INSERT is executed, the driver-assigned identifier is written
    /// into the form under the primary-key name, and a follow-up
    /// [`single_read`](Editor::single_read) fetches the row.
    pub async fn create<E: Executor>(&self, form: &mut dyn Form, db: &E) -> CrudResult<Row> {
        self.run_pre(&self.hooks.pre_create, form);
        let args = self.field_values(&self.create_fields, form);

        let row = if self.dialect.supports_returning() {
            let rows = db.query(&self.create_statement, &args).await?;
            rows.into_iter().next().ok_or_else(|| {
                CrudError::execution("insert returned no row despite RETURNING clause")
            })?
        } else {
            let result = db.execute(&self.create_statement, &args).await?;
            let id = result.last_insert_id.ok_or_else(|| {
                CrudError::execution("driver reported no last-inserted identifier")
            })?;
            form.set(&self.primary_key, Value::BigInt(id));
            self.single_read(form, db).await?
        };

        self.run_post(&self.hooks.post_create, std::slice::from_ref(&row));
        Ok(row)
    }

    /// Read the single row matching the form's primary-key value (and the
    /// configured filters).
    ///
    /// Absence of data is not an error: when nothing matches, the returned
    /// row's [`has_data`](Row::has_data) is false.
    pub async fn single_read<E: Executor>(&self, form: &dyn Form, db: &E) -> CrudResult<Row> {
        let mut args = Vec::with_capacity(1 + self.filter_fields.len());
        args.push(self.form_value(&self.primary_key, form));
        args.extend(self.field_values(&self.filter_fields, form));

        let rows = db.query(&self.single_read_statement, &args).await?;
        Ok(rows.into_iter().next().unwrap_or_default())
    }

    /// Read every row matching the configured filters, paged per the
    /// configured strategy.
    ///
    /// `page` is mandatory when pagination is configured (the statement
    /// carries bound pagination placeholders) and rejected when it is not;
    /// a payload of the wrong kind fails with [`CrudError::Pagination`].
    /// An empty result set is not an error.
    pub async fn read<E: Executor>(
        &self,
        form: &mut dyn Form,
        db: &E,
        page: Option<&Page>,
    ) -> CrudResult<Vec<Row>> {
        self.run_pre(&self.hooks.pre_read, form);
        let mut args = self.field_values(&self.filter_fields, form);

        match (self.pagination, page) {
            (PaginationMode::None, None) => {}
            (PaginationMode::None, Some(_)) => {
                return Err(CrudError::pagination(
                    "page bounds supplied but pagination is not configured",
                ));
            }
            (_, None) => {
                return Err(CrudError::pagination(
                    "configured pagination requires page bounds",
                ));
            }
            (mode, Some(p)) if p.mode() == mode => {
                args.extend(p.bind_args(self.dialect));
            }
            (mode, Some(p)) => {
                return Err(CrudError::pagination(format!(
                    "editor is configured for {mode:?} pagination but was given a {:?} page",
                    p.mode()
                )));
            }
        }

        let rows = db.query(&self.read_statement, &args).await?;
        self.run_post(&self.hooks.post_read, &rows);
        Ok(rows)
    }

    /// Update the record keyed by the form's primary-key value and return
    /// the post-update row.
    ///
    /// A single statement is executed on PostgreSQL (via `RETURNING`); on
    /// MySQL/SQLite the update is followed by a re-select.
    pub async fn update<E: Executor>(&self, form: &mut dyn Form, db: &E) -> CrudResult<Row> {
        self.run_pre(&self.hooks.pre_update, form);

        let mut args = self.field_values(&self.update_fields, form);
        args.push(self.form_value(&self.primary_key, form));
        args.extend(self.field_values(&self.filter_fields, form));

        let row = if self.dialect.supports_returning() {
            let rows = db.query(&self.update_statement, &args).await?;
            rows.into_iter().next().unwrap_or_default()
        } else {
            db.execute(&self.update_statement, &args).await?;
            self.single_read(form, db).await?
        };

        self.run_post(&self.hooks.post_update, std::slice::from_ref(&row));
        Ok(row)
    }

    /// Delete the record keyed by the form's primary-key value.
    ///
    /// With soft deletion configured this executes the rewritten UPDATE,
    /// binding one form value per soft-delete column; otherwise a physical
    /// DELETE. Returns an empty row (`has_data()` is false); the delete
    /// statement has no RETURNING shape on any dialect here.
    pub async fn delete<E: Executor>(&self, form: &mut dyn Form, db: &E) -> CrudResult<Row> {
        self.run_pre(&self.hooks.pre_delete, form);

        let mut args = Vec::new();
        if let Some(columns) = &self.soft_delete_columns {
            args.extend(self.field_values(columns, form));
        }
        args.push(self.form_value(&self.primary_key, form));
        args.extend(self.field_values(&self.filter_fields, form));

        let result = db.execute(&self.delete_statement, &args).await?;
        debug!(
            table = %self.table,
            rows_affected = result.rows_affected,
            "delete executed"
        );

        let row = Row::new();
        self.run_post(&self.hooks.post_delete, std::slice::from_ref(&row));
        Ok(row)
    }

    /// Look up one unquoted field name in the form; absent values bind as
    /// SQL NULL.
    fn form_value(&self, name: &str, form: &dyn Form) -> Value {
        form.get(name).cloned().unwrap_or(Value::Null)
    }

    /// Extract argument values for a quoted field list, in field order.
    /// Null-check conditions bind no value and are skipped.
    fn field_values(&self, fields: &[String], form: &dyn Form) -> Vec<Value> {
        fields
            .iter()
            .filter(|f| takes_placeholder(f))
            .map(|f| self.form_value(unquote_ident(f, self.dialect), form))
            .collect()
    }

    fn run_pre(&self, hook: &Option<PreHook>, form: &mut dyn Form) {
        if let Some(hook) = hook {
            hook(self, form);
        }
    }

    fn run_post(&self, hook: &Option<PostHook>, rows: &[Row]) {
        if let Some(hook) = hook {
            hook(self, rows);
        }
    }
}
