//! SQL dialect rules: identifier quoting, placeholder syntax and whether a
//! modifying statement can return rows inline.
//!
//! Everything here is a pure function of the dialect tag and its inputs; no
//! state is shared with the editor.

/// The dialect to use when interacting with the underlying database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    MySql,
    PostgreSql,
    Sqlite,
}

impl Dialect {
    /// Identifier quote character: backtick for MySQL/SQLite, double quote
    /// for PostgreSQL.
    pub fn quote_char(self) -> char {
        match self {
            Dialect::MySql | Dialect::Sqlite => '`',
            Dialect::PostgreSql => '"',
        }
    }

    /// Whether INSERT/UPDATE may return the affected row inline via a
    /// `RETURNING` clause. MySQL and SQLite need a follow-up read keyed by
    /// primary key instead.
    pub fn supports_returning(self) -> bool {
        matches!(self, Dialect::PostgreSql)
    }

    /// Render the placeholder for the 1-based parameter index `n`.
    ///
    /// PostgreSQL placeholders are positionally numbered (`$n`); MySQL and
    /// SQLite placeholders are order-only (`?`).
    pub fn placeholder(self, n: usize) -> String {
        match self {
            Dialect::PostgreSql => format!("${n}"),
            Dialect::MySql | Dialect::Sqlite => "?".to_string(),
        }
    }
}

/// Quote `name` with the dialect's identifier quote character.
///
/// A field declared as a bare null check (`... IS NULL` / `... IS NOT NULL`)
/// has only its identifier part quoted; the suffix is kept verbatim.
pub fn quote_ident(name: &str, dialect: Dialect) -> String {
    let q = dialect.quote_char();
    match null_check_suffix(name) {
        Some(suffix) => {
            let ident = name[..name.len() - suffix.len()].trim_end();
            format!("{q}{ident}{q} {suffix}")
        }
        None => format!("{q}{name}{q}"),
    }
}

/// Strip the dialect quote character from a quoted identifier.
pub(crate) fn unquote_ident(name: &str, dialect: Dialect) -> &str {
    let q = dialect.quote_char();
    if name.len() >= 2 && name.starts_with(q) && name.ends_with(q) {
        &name[q.len_utf8()..name.len() - q.len_utf8()]
    } else {
        name
    }
}

/// Returns the `IS NULL` / `IS NOT NULL` suffix if `name` is declared as a
/// constant null-check condition rather than a bound comparison.
fn null_check_suffix(name: &str) -> Option<&'static str> {
    if name.ends_with("IS NOT NULL") {
        Some("IS NOT NULL")
    } else if name.ends_with("IS NULL") {
        Some("IS NULL")
    } else {
        None
    }
}

/// Whether a (quoted) field consumes a parameter placeholder. Null-check
/// conditions are emitted bare and bind no value.
pub(crate) fn takes_placeholder(field: &str) -> bool {
    null_check_suffix(field).is_none()
}

/// Number of placeholders a field list will consume when parameterized.
pub fn bound_params(fields: &[String]) -> usize {
    fields.iter().filter(|f| takes_placeholder(f)).count()
}

/// Produce `count` comma-separated placeholders, numbered `1..=count` for
/// PostgreSQL and all `?` for MySQL/SQLite.
pub fn placeholders(count: usize, dialect: Dialect) -> String {
    let mut out = String::new();
    for i in 1..=count {
        if i > 1 {
            out.push(',');
        }
        out.push_str(&dialect.placeholder(i));
    }
    out
}

/// Join field assignments, numbering placeholders from `start`.
///
/// `use_and` selects the ` AND ` separator for condition lists; field lists
/// (INSERT columns, UPDATE SET) join with `,`. A field carrying an
/// `IS NULL` / `IS NOT NULL` suffix is emitted as-is and does not consume a
/// placeholder index.
pub fn parameterize(fields: &[String], dialect: Dialect, use_and: bool, start: usize) -> String {
    let sep = if use_and { " AND " } else { "," };
    let mut out = String::new();
    let mut index = start;

    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push_str(sep);
        }
        out.push_str(field);
        if takes_placeholder(field) {
            out.push('=');
            out.push_str(&dialect.placeholder(index));
            index += 1;
        }
    }
    out
}
