//! Field descriptors and the role classifier.

use crate::dialect::{Dialect, quote_ident};

/// Describes one table column and the CRUD operations it participates in.
///
/// Declared once per column at table-setup time and never mutated
/// afterward. Roles are toggled through the chained builder methods:
///
/// ```
/// use crudkit::Field;
///
/// let id = Field::new("id").primary_key().on_read();
/// let name = Field::new("name").always();
/// let school = Field::new("school_id")
///     .on_create()
///     .on_read()
///     .selection_filter();
/// ```
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    primary_key: bool,
    create: bool,
    read: bool,
    update: bool,
    unique: bool,
    selection_filter: bool,
}

impl Field {
    /// Declare a field with no roles.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary_key: false,
            create: false,
            read: false,
            update: false,
            unique: false,
            selection_filter: false,
        }
    }

    /// Shorthand for a field included on create, read and update.
    pub fn always(self) -> Self {
        self.on_create().on_read().on_update()
    }

    /// Mark as the table's primary key. At most one field may carry this.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Include in INSERT statements.
    pub fn on_create(mut self) -> Self {
        self.create = true;
        self
    }

    /// Include in the SELECT column list (and RETURNING, where supported).
    pub fn on_read(mut self) -> Self {
        self.read = true;
        self
    }

    /// Include in the UPDATE SET list.
    pub fn on_update(mut self) -> Self {
        self.update = true;
        self
    }

    /// Informational uniqueness marker; not used by statement building.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Use this field as a selection filter on every read, update and
    /// delete.
    ///
    /// A filter may also be declared as a constant null check, e.g.
    /// `Field::new("deleted_at IS NULL").selection_filter()`, in which case
    /// it is rendered as a bare condition binding no value.
    pub fn selection_filter(mut self) -> Self {
        self.selection_filter = true;
        self
    }

    /// The declared column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this field is the primary key.
    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    /// Whether this field carries the informational uniqueness marker.
    pub fn is_unique(&self) -> bool {
        self.unique
    }
}

/// The four role-based field subsets, identifier-quoted, preserving
/// declaration order. A field may belong to several subsets.
#[derive(Debug, Clone, Default)]
pub(crate) struct RoleFields {
    pub create: Vec<String>,
    pub read: Vec<String>,
    pub update: Vec<String>,
    pub filter: Vec<String>,
}

/// Classify `fields` into quoted role subsets for `dialect`.
pub(crate) fn classify(fields: &[Field], dialect: Dialect) -> RoleFields {
    let mut roles = RoleFields::default();
    for f in fields {
        let quoted = quote_ident(&f.name, dialect);
        if f.create {
            roles.create.push(quoted.clone());
        }
        if f.read {
            roles.read.push(quoted.clone());
        }
        if f.update {
            roles.update.push(quoted.clone());
        }
        if f.selection_filter {
            roles.filter.push(quoted.clone());
        }
    }
    roles
}

/// The first field marked as primary key, if any.
pub(crate) fn primary_key(fields: &[Field]) -> Option<&Field> {
    fields.iter().find(|f| f.is_primary_key())
}
