//! # crudkit
//!
//! A declarative, table-level CRUD statement generator and executor.
//!
//! Describe a table's columns once (which participate in create/read/
//! update, which filter selections, which is the primary key) and crudkit
//! renders the five parameterized statements at build time, dialect-correct
//! for MySQL, PostgreSQL or SQLite, then reuses them on every call.
//!
//! ## Features
//!
//! - **Build once, run forever**: statements are rendered at configuration
//!   time; a built [`Editor`] is immutable and safe to share across tasks
//! - **Dialect dispatch**: identifier quoting, placeholder numbering and
//!   `RETURNING` vs. re-select are decided per dialect
//! - **Soft deletes**: `delete` can be rewritten into an UPDATE over
//!   deletion-marker columns
//! - **Two pagination strategies**: `LIMIT`/`OFFSET` or keyset over an
//!   indexed column
//! - **Driver-agnostic**: statements run against anything implementing the
//!   [`Executor`] trait
//!
//! ## Example
//!
//! ```
//! use crudkit::{Dialect, Editor, Field};
//!
//! let students = Editor::builder("students", Dialect::PostgreSql)
//!     .field(Field::new("id").primary_key().on_read())
//!     .field(Field::new("name").always())
//!     .field(Field::new("age").always())
//!     .field(Field::new("school_id").on_create().on_read().selection_filter())
//!     .soft_delete(["deleted_at"])
//!     .paginate_keyset("id")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(
//!     students.create_sql(),
//!     "INSERT INTO \"students\"(\"name\",\"age\",\"school_id\") VALUES ($1,$2,$3) \
//!      RETURNING \"id\",\"name\",\"age\",\"school_id\""
//! );
//! ```
//!
//! At call time, field values come from a [`Form`] and rows come back as
//! column-name → [`Value`] maps:
//!
//! ```ignore
//! let mut form = MapForm::from_record(&new_student)?;
//! let row = students.create(&mut form, &executor).await?;
//! assert!(row.has_data());
//! ```

pub mod dialect;
pub mod editor;
pub mod error;
pub mod executor;
pub mod field;
pub mod form;
pub mod pagination;
pub mod row;
pub mod value;

mod stmt;

pub use dialect::{Dialect, bound_params, parameterize, placeholders, quote_ident};
pub use editor::{Editor, EditorBuilder, PostHook, PreHook};
pub use error::{CrudError, CrudResult};
pub use executor::{ExecResult, Executor};
pub use field::Field;
pub use form::{Form, MapForm};
pub use pagination::{Page, PaginationMode};
pub use row::Row;
pub use value::Value;
