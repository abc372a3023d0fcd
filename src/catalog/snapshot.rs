//! Catalog source backed by recorded result sets.
//!
//! A snapshot file (YAML or JSON) holds the rows each catalog call returned:
//!
//! ```yaml
//! databases:
//!   - name: SALES
//! schemas:
//!   SALES:
//!     - name: PUBLIC
//! objects:
//!   SALES.PUBLIC:
//!     tables: [...]
//!     columns: [...]
//!     primary_keys: [...]
//! ```
//!
//! A result set that is not recorded behaves like a call the catalog does not
//! support.

use super::{CatalogError, CatalogQuery, CatalogSource, CatalogStep, RawRow};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Recorded metadata listings for one schema
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaSnapshot {
    pub tables: Option<Vec<RawRow>>,
    pub views: Option<Vec<RawRow>>,
    pub columns: Option<Vec<RawRow>>,
    pub unique_keys: Option<Vec<RawRow>>,
    pub primary_keys: Option<Vec<RawRow>>,
    pub imported_keys: Option<Vec<RawRow>>,
}

impl SchemaSnapshot {
    /// Recorded rows for a step, if any
    pub fn rows(&self, step: CatalogStep) -> Option<&Vec<RawRow>> {
        match step {
            CatalogStep::Tables => self.tables.as_ref(),
            CatalogStep::Views => self.views.as_ref(),
            CatalogStep::Columns => self.columns.as_ref(),
            CatalogStep::UniqueKeys => self.unique_keys.as_ref(),
            CatalogStep::PrimaryKeys => self.primary_keys.as_ref(),
            CatalogStep::ImportedKeys => self.imported_keys.as_ref(),
        }
    }

    /// Record rows for a step
    pub fn set_rows(&mut self, step: CatalogStep, rows: Vec<RawRow>) {
        let slot = match step {
            CatalogStep::Tables => &mut self.tables,
            CatalogStep::Views => &mut self.views,
            CatalogStep::Columns => &mut self.columns,
            CatalogStep::UniqueKeys => &mut self.unique_keys,
            CatalogStep::PrimaryKeys => &mut self.primary_keys,
            CatalogStep::ImportedKeys => &mut self.imported_keys,
        };
        *slot = Some(rows);
    }
}

/// Complete snapshot file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSnapshot {
    /// `SHOW DATABASES` rows
    pub databases: Option<Vec<RawRow>>,
    /// `SHOW SCHEMAS` rows per database
    pub schemas: BTreeMap<String, Vec<RawRow>>,
    /// Metadata listings keyed by `DATABASE.SCHEMA`
    pub objects: BTreeMap<String, SchemaSnapshot>,
}

impl CatalogSnapshot {
    /// Load a snapshot from a YAML or JSON file (chosen by extension)
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let snapshot = if is_json {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };
        Ok(snapshot)
    }
}

/// `CatalogSource` answering from a `CatalogSnapshot`
#[derive(Debug, Clone, Default)]
pub struct SnapshotCatalog {
    snapshot: CatalogSnapshot,
    origin: Option<PathBuf>,
}

impl SnapshotCatalog {
    pub fn new(snapshot: CatalogSnapshot) -> Self {
        Self {
            snapshot,
            origin: None,
        }
    }

    /// Open a snapshot file
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let snapshot = CatalogSnapshot::load(path)?;
        let origin = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        Ok(Self {
            snapshot,
            origin: Some(origin),
        })
    }

    pub fn snapshot(&self) -> &CatalogSnapshot {
        &self.snapshot
    }
}

impl CatalogSource for SnapshotCatalog {
    fn execute(&self, query: &CatalogQuery) -> Result<Vec<RawRow>, CatalogError> {
        match query {
            CatalogQuery::Databases => self
                .snapshot
                .databases
                .clone()
                .ok_or_else(|| CatalogError::Unsupported(query.sql())),
            CatalogQuery::Schemas { database } => self
                .snapshot
                .schemas
                .get(database)
                .cloned()
                .ok_or_else(|| CatalogError::NotFound(format!("database {}", database))),
            CatalogQuery::Metadata { step, scope } => {
                let objects = self
                    .snapshot
                    .objects
                    .get(&scope.key())
                    .ok_or_else(|| CatalogError::NotFound(format!("schema {}", scope)))?;
                objects
                    .rows(*step)
                    .cloned()
                    .ok_or_else(|| CatalogError::Unsupported(query.sql()))
            }
        }
    }

    fn source_id(&self) -> String {
        match &self.origin {
            Some(path) => format!("snapshot:{}", path.display()),
            None => "snapshot:memory".to_string(),
        }
    }
}
