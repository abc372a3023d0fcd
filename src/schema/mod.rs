//! In-memory relational model built from catalog metadata.
//!
//! This module provides:
//! - Tables and columns with their key flags, in catalog order
//! - Unique, primary and foreign key structures
//! - Identifier formatting and datatype normalization used by the renderers

mod datatype;
mod ident;
mod keys;

pub use datatype::*;
pub use ident::*;
pub use keys::*;

use ahash::AHashMap;
use std::fmt;

/// Unique identifier for a table within a schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableId(pub u32);

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TableId({})", self.0)
    }
}

/// Unique identifier for a column within a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnId(pub u16);

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ColumnId({})", self.0)
    }
}

/// Fully qualified reference to a column of some table in the schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    pub table: TableId,
    pub column: ColumnId,
}

/// Column definition within a table
#[derive(Debug, Clone)]
pub struct Column {
    /// Owning table
    pub table: TableId,
    /// Position in table (0-indexed)
    pub id: ColumnId,
    /// Column name
    pub name: String,
    /// Column comment, empty when the catalog has none
    pub comment: String,
    /// Whether this column allows NULL values
    pub nullable: bool,
    /// Canonical lowercase datatype
    pub datatype: String,
    /// Whether the column is an identity/autoincrement column
    pub identity: bool,
    /// Whether the column takes part in a unique key
    pub unique: bool,
    /// Primary key constraint name, set when the column is part of the primary key
    pub pk_constraint: Option<String>,
    /// Referenced column when this column is part of a foreign key
    pub fk_target: Option<ColumnRef>,
}

impl Column {
    /// Create a nullable column with an unknown datatype
    pub fn new(table: TableId, id: ColumnId, name: String, comment: String) -> Self {
        Self {
            table,
            id,
            name,
            comment,
            nullable: true,
            datatype: UNKNOWN_DATATYPE.to_string(),
            identity: false,
            unique: false,
            pk_constraint: None,
            fk_target: None,
        }
    }

    pub fn is_primary_key(&self) -> bool {
        self.pk_constraint.is_some()
    }

    pub fn is_foreign_key(&self) -> bool {
        self.fk_target.is_some()
    }

    /// Reference to this column
    pub fn column_ref(&self) -> ColumnRef {
        ColumnRef {
            table: self.table,
            column: self.id,
        }
    }
}

/// Table (or view) definition
#[derive(Debug, Clone)]
pub struct Table {
    /// Table ID within the schema
    pub id: TableId,
    /// Table name as reported by the catalog
    pub name: String,
    /// Table comment, empty when the catalog has none
    pub comment: String,
    /// Render label used as the diagram node id (n1, n2, ...)
    pub label: String,
    /// Column definitions in catalog order
    pub columns: Vec<Column>,
    /// Unique constraints by name, in first-seen order
    pub unique_keys: Vec<KeyConstraint>,
    /// Primary key columns ordered by key position
    pub primary_key: Vec<ColumnId>,
    /// Foreign key constraints by name, in first-seen order
    pub foreign_keys: Vec<KeyConstraint>,
}

impl Table {
    /// Create a new empty table
    pub fn new(name: String, comment: String, id: TableId) -> Self {
        Self {
            id,
            name,
            comment,
            label: String::new(),
            columns: Vec::new(),
            unique_keys: Vec::new(),
            primary_key: Vec::new(),
            foreign_keys: Vec::new(),
        }
    }

    /// Get a column by exact name
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get column ID by exact name
    pub fn get_column_id(&self, name: &str) -> Option<ColumnId> {
        self.get_column(name).map(|c| c.id)
    }

    /// Get column by ID
    pub fn column(&self, id: ColumnId) -> Option<&Column> {
        self.columns.get(id.0 as usize)
    }

    pub(crate) fn column_mut(&mut self, id: ColumnId) -> Option<&mut Column> {
        self.columns.get_mut(id.0 as usize)
    }

    /// Append a column, returning its ID.
    ///
    /// Returns `None` if the name is taken or the table has no free column ID left.
    pub fn add_column(&mut self, name: String, comment: String) -> Option<ColumnId> {
        if self.get_column(&name).is_some() {
            return None;
        }
        let id = ColumnId(u16::try_from(self.columns.len()).ok()?);
        self.columns.push(Column::new(self.id, id, name, comment));
        Some(id)
    }

    /// Get a foreign key constraint by name
    pub fn foreign_key(&self, name: &str) -> Option<&KeyConstraint> {
        self.foreign_keys.iter().find(|k| k.name == name)
    }

    /// Get a unique constraint by name
    pub fn unique_key(&self, name: &str) -> Option<&KeyConstraint> {
        self.unique_keys.iter().find(|k| k.name == name)
    }

    /// Primary key columns in key order
    pub fn primary_key_columns(&self) -> impl Iterator<Item = &Column> {
        self.primary_key.iter().filter_map(|id| self.column(*id))
    }
}

/// Snapshot of one database schema.
///
/// Tables iterate in insertion order; that order drives both renderers.
#[derive(Debug, Default)]
pub struct Schema {
    /// Map from table name to table ID
    tables: AHashMap<String, TableId>,
    /// Tables indexed by TableId
    table_list: Vec<Table>,
}

impl Schema {
    /// Create a new empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Get table ID by exact name
    pub fn get_table_id(&self, name: &str) -> Option<TableId> {
        self.tables.get(name).copied()
    }

    /// Get table by ID
    pub fn table(&self, id: TableId) -> Option<&Table> {
        self.table_list.get(id.0 as usize)
    }

    pub(crate) fn table_mut(&mut self, id: TableId) -> Option<&mut Table> {
        self.table_list.get_mut(id.0 as usize)
    }

    /// Get table by name
    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.get_table_id(name).and_then(|id| self.table(id))
    }

    /// Add a new table, assigning its ID and render label.
    ///
    /// Returns `None` when a table with the same name already exists.
    pub fn add_table(&mut self, name: String, comment: String) -> Option<TableId> {
        if self.tables.contains_key(&name) {
            return None;
        }
        let id = TableId(self.table_list.len() as u32);
        let mut table = Table::new(name.clone(), comment, id);
        table.label = format!("n{}", self.table_list.len() + 1);
        self.tables.insert(name, id);
        self.table_list.push(table);
        Some(id)
    }

    /// Resolve a column reference
    pub fn column(&self, column: ColumnRef) -> Option<&Column> {
        self.table(column.table)
            .and_then(|t| t.column(column.column))
    }

    /// Resolve a table and column by name
    pub fn find_column(&self, table: &str, column: &str) -> Option<ColumnRef> {
        let table = self.get_table(table)?;
        table.get_column(column).map(|c| c.column_ref())
    }

    /// Get the number of tables
    pub fn len(&self) -> usize {
        self.table_list.len()
    }

    /// Check if schema is empty
    pub fn is_empty(&self) -> bool {
        self.table_list.is_empty()
    }

    /// Iterate over all tables in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Table> {
        self.table_list.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Table> {
        self.table_list.iter_mut()
    }

    /// Total number of columns across all tables
    pub fn column_count(&self) -> usize {
        self.table_list.iter().map(|t| t.columns.len()).sum()
    }

    /// Total number of foreign key constraints across all tables
    pub fn foreign_key_count(&self) -> usize {
        self.table_list.iter().map(|t| t.foreign_keys.len()).sum()
    }
}
