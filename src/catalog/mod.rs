//! Catalog query boundary.
//!
//! The importer never talks to a database directly. It issues `CatalogQuery`
//! values against a `CatalogSource` and decodes the returned rows into the
//! typed row schemas in [`rows`] exactly once, at this boundary.

pub mod cache;
mod listing;
pub mod rows;
mod snapshot;

pub use cache::ListingCache;
pub use listing::{default_schema, list_databases, list_schemas};
pub use snapshot::{CatalogSnapshot, SchemaSnapshot, SnapshotCatalog};

use crate::schema::catalog_name;
use schemars::JsonSchema;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// One catalog result row with named-field access
pub type RawRow = serde_json::Map<String, serde_json::Value>;

/// Errors raised by a catalog source or while decoding its rows
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog does not support this call (or it is not recorded)
    #[error("unsupported catalog call: {0}")]
    Unsupported(String),
    /// The object being listed does not exist
    #[error("not found: {0}")]
    NotFound(String),
    /// The query ran but failed
    #[error("catalog query failed: {query}: {message}")]
    Query { query: String, message: String },
    /// A returned row does not match the expected row schema
    #[error("unexpected row shape for {query}: {source}")]
    Decode {
        query: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Database and schema a metadata listing is scoped to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Scope {
    pub database: String,
    pub schema: String,
}

impl Scope {
    pub fn new(database: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            schema: schema.into(),
        }
    }

    /// Snapshot key: raw `DATABASE.SCHEMA`
    pub fn key(&self) -> String {
        format!("{}.{}", self.database, self.schema)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}",
            catalog_name(&self.database),
            catalog_name(&self.schema)
        )
    }
}

/// Import step a schema-scoped query belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CatalogStep {
    Tables,
    Views,
    Columns,
    UniqueKeys,
    PrimaryKeys,
    ImportedKeys,
}

impl CatalogStep {
    /// All import steps in execution order
    pub const ALL: [CatalogStep; 6] = [
        CatalogStep::Tables,
        CatalogStep::Views,
        CatalogStep::Columns,
        CatalogStep::UniqueKeys,
        CatalogStep::PrimaryKeys,
        CatalogStep::ImportedKeys,
    ];

    /// Mandatory steps abort the import on failure
    pub fn is_mandatory(self) -> bool {
        matches!(self, CatalogStep::Tables | CatalogStep::Columns)
    }
}

impl fmt::Display for CatalogStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogStep::Tables => write!(f, "tables"),
            CatalogStep::Views => write!(f, "views"),
            CatalogStep::Columns => write!(f, "columns"),
            CatalogStep::UniqueKeys => write!(f, "unique keys"),
            CatalogStep::PrimaryKeys => write!(f, "primary keys"),
            CatalogStep::ImportedKeys => write!(f, "imported keys"),
        }
    }
}

/// A read-only introspection call
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CatalogQuery {
    Databases,
    Schemas { database: String },
    Metadata { step: CatalogStep, scope: Scope },
}

impl CatalogQuery {
    pub fn metadata(step: CatalogStep, scope: &Scope) -> Self {
        CatalogQuery::Metadata {
            step,
            scope: scope.clone(),
        }
    }

    /// Statement text for catalogs that take SHOW commands
    pub fn sql(&self) -> String {
        match self {
            CatalogQuery::Databases => "SHOW DATABASES".to_string(),
            CatalogQuery::Schemas { database } => {
                format!("SHOW SCHEMAS IN DATABASE {}", catalog_name(database))
            }
            CatalogQuery::Metadata { step, scope } => {
                let object = match step {
                    CatalogStep::Tables => "TABLES",
                    CatalogStep::Views => "VIEWS",
                    CatalogStep::Columns => "COLUMNS",
                    CatalogStep::UniqueKeys => "UNIQUE KEYS",
                    CatalogStep::PrimaryKeys => "PRIMARY KEYS",
                    CatalogStep::ImportedKeys => "IMPORTED KEYS",
                };
                format!("SHOW {} IN SCHEMA {}", object, scope)
            }
        }
    }
}

impl fmt::Display for CatalogQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql())
    }
}

/// Capability to execute catalog queries
pub trait CatalogSource {
    fn execute(&self, query: &CatalogQuery) -> Result<Vec<RawRow>, CatalogError>;

    /// Stable identifier used to key cached listings
    fn source_id(&self) -> String {
        "default".to_string()
    }
}

impl<F> CatalogSource for F
where
    F: Fn(&CatalogQuery) -> Result<Vec<RawRow>, CatalogError>,
{
    fn execute(&self, query: &CatalogQuery) -> Result<Vec<RawRow>, CatalogError> {
        self(query)
    }
}
