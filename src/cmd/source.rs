//! Shared plumbing: opening the catalog, the listing cache and running imports.

use super::{CatalogArgs, SelectionArgs};
use anyhow::{bail, Context, Result};
use erd_viewer::catalog::{default_schema, list_schemas, ListingCache, SnapshotCatalog};
use erd_viewer::importer::{import_metadata, Import};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Open the catalog snapshot named on the command line
pub fn open_catalog(args: &CatalogArgs) -> Result<SnapshotCatalog> {
    if !args.catalog.exists() {
        bail!("catalog file does not exist: {}", args.catalog.display());
    }
    SnapshotCatalog::open(&args.catalog)
        .with_context(|| format!("Failed to load catalog: {}", args.catalog.display()))
}

/// Open the listing cache unless disabled, invalidating it on --refresh
pub fn open_cache(args: &CatalogArgs) -> Result<Option<ListingCache>> {
    if args.no_cache {
        return Ok(None);
    }

    let ttl = Duration::from_secs(args.ttl);
    let cache = match &args.cache_dir {
        Some(dir) => ListingCache::with_dir(dir.clone(), ttl)?,
        None => ListingCache::new(ttl)?,
    };

    if args.refresh {
        let removed = cache.invalidate()?;
        tracing::info!(removed, "listing cache invalidated");
    }

    Ok(Some(cache))
}

/// Everything a rendering command needs
pub struct Selected {
    pub database: String,
    pub schema: String,
    pub import: Import,
}

/// Resolve the schema (defaulting when omitted) and import its metadata
pub fn import_selection(args: &SelectionArgs) -> Result<Selected> {
    let catalog = open_catalog(&args.catalog)?;
    let cache = open_cache(&args.catalog)?;

    let schema = match &args.schema {
        Some(schema) => schema.clone(),
        None => {
            let schemas = list_schemas(&catalog, &args.database, cache.as_ref())
                .with_context(|| format!("Failed to list schemas of {}", args.database))?;
            match default_schema(&schemas) {
                Some(schema) => {
                    eprintln!("Using schema: {}", schema);
                    schema.to_string()
                }
                None => bail!("database {} has no schemas", args.database),
            }
        }
    };

    let spinner = if args.progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        pb.set_message("Reading metadata...");
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let result = import_metadata(&catalog, &args.database, &schema);

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let import = result?;

    for (step, reason) in import.diagnostics.recovered_steps() {
        eprintln!("Note: {} unavailable ({})", step, reason);
    }
    if import.schema.is_empty() {
        eprintln!("No tables found in {}.{}", args.database, schema);
    }

    Ok(Selected {
        database: args.database.clone(),
        schema,
        import,
    })
}
