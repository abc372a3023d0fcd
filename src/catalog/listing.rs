//! Database and schema listings for the selection step.

use super::rows::{decode_rows, NameRow};
use super::{CatalogError, CatalogQuery, CatalogSource, ListingCache, RawRow};

/// Schema that is never offered for diagramming
const INFORMATION_SCHEMA: &str = "INFORMATION_SCHEMA";

/// Schema picked when the caller does not name one
const PREFERRED_SCHEMA: &str = "PUBLIC";

/// List database names
pub fn list_databases<S: CatalogSource + ?Sized>(
    source: &S,
    cache: Option<&ListingCache>,
) -> Result<Vec<String>, CatalogError> {
    let query = CatalogQuery::Databases;
    let rows = fetch(source, &query, cache)?;
    let names: Vec<NameRow> = decode_rows(&query, &rows)?;
    Ok(names.into_iter().map(|r| r.name).collect())
}

/// List schema names of a database, without `INFORMATION_SCHEMA`.
///
/// An empty database name yields no schemas.
pub fn list_schemas<S: CatalogSource + ?Sized>(
    source: &S,
    database: &str,
    cache: Option<&ListingCache>,
) -> Result<Vec<String>, CatalogError> {
    if database.is_empty() {
        return Ok(Vec::new());
    }
    let query = CatalogQuery::Schemas {
        database: database.to_string(),
    };
    let rows = fetch(source, &query, cache)?;
    let names: Vec<NameRow> = decode_rows(&query, &rows)?;
    Ok(names
        .into_iter()
        .map(|r| r.name)
        .filter(|name| name != INFORMATION_SCHEMA)
        .collect())
}

/// Pick `PUBLIC` when present, else the first schema
pub fn default_schema(schemas: &[String]) -> Option<&str> {
    schemas
        .iter()
        .find(|s| s.as_str() == PREFERRED_SCHEMA)
        .or_else(|| schemas.first())
        .map(|s| s.as_str())
}

fn fetch<S: CatalogSource + ?Sized>(
    source: &S,
    query: &CatalogQuery,
    cache: Option<&ListingCache>,
) -> Result<Vec<RawRow>, CatalogError> {
    let sql = query.sql();
    let source_id = source.source_id();

    if let Some(cache) = cache {
        match cache.get(&source_id, &sql) {
            Ok(Some(rows)) => {
                tracing::debug!(query = %sql, "listing served from cache");
                return Ok(rows);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "listing cache unavailable"),
        }
    }

    tracing::debug!(query = %sql, "catalog query");
    let rows = source.execute(query)?;

    if let Some(cache) = cache {
        if let Err(e) = cache.put(&source_id, &sql, &rows) {
            tracing::warn!(error = %e, "failed to store listing in cache");
        }
    }

    Ok(rows)
}
