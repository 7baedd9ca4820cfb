//! End-to-end verb flows against a scripted in-memory executor.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crudkit::{
    CrudError, CrudResult, Dialect, Editor, ExecResult, Executor, Field, Form, MapForm, Page, Row,
    Value,
};

enum Reply {
    Exec(ExecResult),
    Rows(Vec<Row>),
}

/// Records every statement it is handed and answers from a scripted queue.
#[derive(Default)]
struct MockExecutor {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<(String, Vec<Value>)>>,
}

impl MockExecutor {
    fn new() -> Self {
        Self::default()
    }

    fn push_exec(&self, rows_affected: u64, last_insert_id: Option<i64>) {
        self.replies.lock().unwrap().push_back(Reply::Exec(ExecResult {
            rows_affected,
            last_insert_id,
        }));
    }

    fn push_rows(&self, rows: Vec<Row>) {
        self.replies.lock().unwrap().push_back(Reply::Rows(rows));
    }

    fn calls(&self) -> Vec<(String, Vec<Value>)> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, sql: &str, params: &[Value]) {
        self.calls
            .lock()
            .unwrap()
            .push((sql.to_string(), params.to_vec()));
    }

    fn next_reply(&self) -> Reply {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("mock executor ran out of scripted replies")
    }
}

impl Executor for MockExecutor {
    fn execute(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = CrudResult<ExecResult>> + Send {
        self.record(sql, params);
        let reply = self.next_reply();
        async move {
            match reply {
                Reply::Exec(result) => Ok(result),
                Reply::Rows(_) => Err(CrudError::execution("scripted a row set for execute()")),
            }
        }
    }

    fn query(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = CrudResult<Vec<Row>>> + Send {
        self.record(sql, params);
        let reply = self.next_reply();
        async move {
            match reply {
                Reply::Rows(rows) => Ok(rows),
                Reply::Exec(_) => Err(CrudError::execution("scripted an exec result for query()")),
            }
        }
    }
}

fn students(dialect: Dialect) -> Editor {
    Editor::builder("students", dialect)
        .field(Field::new("id").primary_key().on_read())
        .field(Field::new("name").always())
        .field(Field::new("age").always())
        .field(
            Field::new("school_id")
                .on_create()
                .on_read()
                .selection_filter(),
        )
        .build()
        .unwrap()
}

fn student_form() -> MapForm {
    [
        ("name".to_string(), Value::from("John Doe")),
        ("age".to_string(), Value::Int(25)),
        ("school_id".to_string(), Value::Int(1)),
    ]
    .into_iter()
    .collect()
}

fn student_row(id: i64) -> Row {
    let mut row = Row::new();
    row.set("id", id);
    row.set("name", "John Doe");
    row.set("age", Value::Int(25));
    row.set("school_id", Value::Int(1));
    row
}

/// Placeholders present in a rendered statement.
fn placeholder_count(sql: &str, dialect: Dialect) -> usize {
    match dialect {
        Dialect::PostgreSql => sql.matches('$').count(),
        Dialect::MySql | Dialect::Sqlite => sql.matches('?').count(),
    }
}

#[tokio::test]
async fn postgres_create_scans_the_returned_row() {
    let editor = students(Dialect::PostgreSql);
    let db = MockExecutor::new();
    db.push_rows(vec![student_row(1)]);

    let mut form = student_form();
    let row = editor.create(&mut form, &db).await.unwrap();

    assert_eq!(row.get("name").and_then(Value::as_str), Some("John Doe"));
    assert_eq!(row.get("id").and_then(Value::as_i64), Some(1));

    let calls = db.calls();
    assert_eq!(calls.len(), 1, "a single INSERT .. RETURNING round trip");
    assert_eq!(calls[0].0, editor.create_sql());
    assert_eq!(
        calls[0].1,
        vec![Value::from("John Doe"), Value::Int(25), Value::Int(1)]
    );
}

#[tokio::test]
async fn sqlite_create_follows_up_with_a_keyed_read() {
    let editor = students(Dialect::Sqlite);
    let db = MockExecutor::new();
    db.push_exec(1, Some(42));
    db.push_rows(vec![student_row(42)]);

    let mut form = student_form();
    let row = editor.create(&mut form, &db).await.unwrap();

    // The driver-assigned identifier is injected into the form and the
    // returned row carries it.
    assert_eq!(form.get("id"), Some(&Value::BigInt(42)));
    assert_eq!(row.get("id").and_then(Value::as_i64), Some(42));

    let calls = db.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0, editor.create_sql());
    assert_eq!(calls[1].0, editor.single_read_sql());
    // Follow-up read binds the new key first, then the filter value.
    assert_eq!(calls[1].1, vec![Value::BigInt(42), Value::Int(1)]);
}

#[tokio::test]
async fn sqlite_create_without_insert_id_is_an_error() {
    let editor = students(Dialect::Sqlite);
    let db = MockExecutor::new();
    db.push_exec(1, None);

    let mut form = student_form();
    let err = editor.create(&mut form, &db).await.unwrap_err();
    assert!(matches!(err, CrudError::Execution(_)));
}

#[tokio::test]
async fn single_read_of_missing_row_returns_no_data() {
    let editor = students(Dialect::PostgreSql);
    let db = MockExecutor::new();
    db.push_rows(vec![]);

    let mut form = student_form();
    form.set("id", Value::BigInt(999));
    let row = editor.single_read(&form, &db).await.unwrap();

    assert!(!row.has_data());
    assert_eq!(
        db.calls()[0].1,
        vec![Value::BigInt(999), Value::Int(1)],
        "primary key binds first, filters after"
    );
}

#[tokio::test]
async fn read_binds_filters_then_keyset_bounds() {
    let editor = Editor::builder("students", Dialect::PostgreSql)
        .field(Field::new("id").primary_key().on_read())
        .field(Field::new("name").always())
        .field(
            Field::new("school_id")
                .on_create()
                .on_read()
                .selection_filter(),
        )
        .paginate_keyset("id")
        .build()
        .unwrap();
    let db = MockExecutor::new();
    db.push_rows(vec![student_row(2), student_row(3)]);

    let mut form = student_form();
    let page = Page::keyset(1i64, 10);
    let rows = editor.read(&mut form, &db, Some(&page)).await.unwrap();

    assert_eq!(rows.len(), 2);
    let (sql, params) = &db.calls()[0];
    assert_eq!(sql, editor.read_sql());
    assert_eq!(
        params,
        &vec![Value::Int(1), Value::BigInt(1), Value::BigInt(10)]
    );
    assert_eq!(placeholder_count(sql, Dialect::PostgreSql), params.len());
}

#[tokio::test]
async fn read_with_no_matches_returns_empty_set() {
    let editor = students(Dialect::MySql);
    let db = MockExecutor::new();
    db.push_rows(vec![]);

    let mut form = student_form();
    let rows = editor.read(&mut form, &db, None).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn page_payload_must_match_configured_mode() {
    let offset_editor = Editor::builder("students", Dialect::PostgreSql)
        .field(Field::new("id").primary_key().on_read())
        .field(Field::new("name").always())
        .paginate_offset()
        .build()
        .unwrap();
    let db = MockExecutor::new();
    let mut form = MapForm::new();

    // wrong payload kind
    let page = Page::keyset(1i64, 10);
    let err = offset_editor
        .read(&mut form, &db, Some(&page))
        .await
        .unwrap_err();
    assert!(err.is_pagination());

    // pagination configured but no page supplied
    let err = offset_editor.read(&mut form, &db, None).await.unwrap_err();
    assert!(err.is_pagination());

    // page supplied without pagination configured
    let unpaged = students(Dialect::PostgreSql);
    let page = Page::offset(0, 10);
    let err = unpaged.read(&mut form, &db, Some(&page)).await.unwrap_err();
    assert!(err.is_pagination());

    assert!(db.calls().is_empty(), "nothing reached the executor");
}

#[tokio::test]
async fn offset_binding_order_follows_dialect_clause_order() {
    let mysql = Editor::builder("students", Dialect::MySql)
        .field(Field::new("id").primary_key().on_read())
        .field(Field::new("name").always())
        .paginate_offset()
        .build()
        .unwrap();
    let db = MockExecutor::new();
    db.push_rows(vec![]);
    let mut form = MapForm::new();
    let page = Page::offset(2, 10);
    mysql.read(&mut form, &db, Some(&page)).await.unwrap();
    // LIMIT ? OFFSET ? binds size, then offset
    assert_eq!(db.calls()[0].1, vec![Value::BigInt(10), Value::BigInt(20)]);

    let pg = Editor::builder("students", Dialect::PostgreSql)
        .field(Field::new("id").primary_key().on_read())
        .field(Field::new("name").always())
        .paginate_offset()
        .build()
        .unwrap();
    let db = MockExecutor::new();
    db.push_rows(vec![]);
    let page = Page::offset(2, 10);
    pg.read(&mut form, &db, Some(&page)).await.unwrap();
    // OFFSET $1 FETCH NEXT $2 ROWS ONLY binds offset, then size
    assert_eq!(db.calls()[0].1, vec![Value::BigInt(20), Value::BigInt(10)]);
}

#[tokio::test]
async fn postgres_update_returns_the_row_inline() {
    let editor = students(Dialect::PostgreSql);
    let db = MockExecutor::new();
    let mut updated = student_row(1);
    updated.set("age", Value::Int(26));
    db.push_rows(vec![updated]);

    let mut form = student_form();
    form.set("id", Value::BigInt(1));
    form.set("age", Value::Int(26));
    let row = editor.update(&mut form, &db).await.unwrap();

    assert_eq!(row.get("age"), Some(&Value::Int(26)));
    let (sql, params) = &db.calls()[0];
    assert_eq!(sql, editor.update_sql());
    // update values, then primary key, then filters
    assert_eq!(
        params,
        &vec![
            Value::from("John Doe"),
            Value::Int(26),
            Value::BigInt(1),
            Value::Int(1)
        ]
    );
}

#[tokio::test]
async fn mysql_update_re_selects_the_row() {
    let editor = students(Dialect::MySql);
    let db = MockExecutor::new();
    db.push_exec(1, None);
    db.push_rows(vec![student_row(1)]);

    let mut form = student_form();
    form.set("id", Value::BigInt(1));
    let row = editor.update(&mut form, &db).await.unwrap();

    assert!(row.has_data());
    let calls = db.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0, editor.update_sql());
    assert_eq!(calls[1].0, editor.single_read_sql());
}

#[tokio::test]
async fn soft_delete_executes_the_rewritten_update() {
    let editor = Editor::builder("schools", Dialect::PostgreSql)
        .field(Field::new("id").primary_key().on_read())
        .field(Field::new("school_name").always())
        .soft_delete(["deleted_at"])
        .build()
        .unwrap();
    let db = MockExecutor::new();
    db.push_exec(1, None);

    let mut form = MapForm::new();
    form.set("id", Value::BigInt(7));
    form.set("deleted_at", Value::from("2024-05-01T00:00:00Z"));
    let row = editor.delete(&mut form, &db).await.unwrap();

    assert!(!row.has_data());
    let (sql, params) = &db.calls()[0];
    assert_eq!(sql, editor.delete_sql());
    assert!(sql.starts_with("UPDATE"));
    assert_eq!(
        params,
        &vec![Value::from("2024-05-01T00:00:00Z"), Value::BigInt(7)]
    );
}

#[tokio::test]
async fn hard_delete_executes_a_physical_delete() {
    let editor = Editor::builder("schools", Dialect::Sqlite)
        .field(Field::new("id").primary_key().on_read())
        .field(Field::new("school_name").always())
        .build()
        .unwrap();
    let db = MockExecutor::new();
    db.push_exec(1, None);

    let mut form = MapForm::new();
    form.set("id", Value::BigInt(7));
    editor.delete(&mut form, &db).await.unwrap();

    let (sql, params) = &db.calls()[0];
    assert!(sql.starts_with("DELETE FROM"));
    assert_eq!(params, &vec![Value::BigInt(7)]);
}

#[tokio::test]
async fn hooks_run_around_operations() {
    static POST_READS: AtomicUsize = AtomicUsize::new(0);

    let editor = Editor::builder("students", Dialect::PostgreSql)
        .field(Field::new("id").primary_key().on_read())
        .field(Field::new("name").always())
        .field(Field::new("created_by").on_create().on_read())
        .on_pre_create(|_, form| form.set("created_by", Value::from("system")))
        .on_post_read(|_, rows| {
            POST_READS.fetch_add(rows.len(), Ordering::SeqCst);
        })
        .build()
        .unwrap();

    let db = MockExecutor::new();
    db.push_rows(vec![student_row(1)]);
    let mut form = MapForm::new();
    form.set("name", Value::from("John Doe"));
    editor.create(&mut form, &db).await.unwrap();
    // the pre-create hook injected the audit column before binding
    assert_eq!(
        db.calls()[0].1,
        vec![Value::from("John Doe"), Value::from("system")]
    );

    let db = MockExecutor::new();
    db.push_rows(vec![student_row(1), student_row(2)]);
    editor.read(&mut form, &db, None).await.unwrap();
    assert_eq!(POST_READS.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn executor_errors_propagate_unchanged() {
    let editor = students(Dialect::PostgreSql);
    let db = MockExecutor::new();
    db.push_exec(0, None); // wrong reply kind makes query() fail

    let mut form = student_form();
    let err = editor.create(&mut form, &db).await.unwrap_err();
    assert!(matches!(err, CrudError::Execution(_)));
}

/// Every built statement carries exactly as many placeholders as the
/// binder supplies arguments, per statement kind and dialect.
#[tokio::test]
async fn placeholder_counts_match_bound_arguments() {
    for dialect in [Dialect::MySql, Dialect::PostgreSql, Dialect::Sqlite] {
        let editor = Editor::builder("students", dialect)
            .field(Field::new("id").primary_key().on_read())
            .field(Field::new("name").always())
            .field(Field::new("age").always())
            .field(
                Field::new("school_id")
                    .on_create()
                    .on_read()
                    .selection_filter(),
            )
            .soft_delete(["deleted_at"])
            .paginate_offset()
            .build()
            .unwrap();

        let db = MockExecutor::new();
        let mut form = student_form();
        form.set("id", Value::BigInt(1));
        form.set("deleted_at", Value::from("now"));

        if dialect.supports_returning() {
            db.push_rows(vec![student_row(1)]); // create
        } else {
            db.push_exec(1, Some(1)); // create: insert
            db.push_rows(vec![student_row(1)]); // create: follow-up read
        }
        let _ = editor.create(&mut form, &db).await.unwrap();

        db.push_rows(vec![]);
        let page = Page::offset(0, 10);
        let _ = editor.read(&mut form, &db, Some(&page)).await.unwrap();

        db.push_rows(vec![]);
        let _ = editor.single_read(&form, &db).await.unwrap();

        if dialect.supports_returning() {
            db.push_rows(vec![student_row(1)]);
        } else {
            db.push_exec(1, None);
            db.push_rows(vec![student_row(1)]);
        }
        let _ = editor.update(&mut form, &db).await.unwrap();

        db.push_exec(1, None);
        let _ = editor.delete(&mut form, &db).await.unwrap();

        for (sql, params) in db.calls() {
            assert_eq!(
                placeholder_count(&sql, dialect),
                params.len(),
                "statement/argument mismatch for {dialect:?}: {sql}"
            );
        }
    }
}
