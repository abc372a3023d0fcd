use super::source::{open_cache, open_catalog};
use super::CatalogArgs;
use anyhow::Context;
use erd_viewer::catalog::{default_schema, list_databases, list_schemas};
use erd_viewer::render::BuiltinTheme;

pub fn databases(args: CatalogArgs) -> anyhow::Result<()> {
    let catalog = open_catalog(&args)?;
    let cache = open_cache(&args)?;

    let databases =
        list_databases(&catalog, cache.as_ref()).context("Failed to list databases")?;

    if databases.is_empty() {
        eprintln!("No databases found.");
    }
    for name in databases {
        println!("{}", name);
    }
    Ok(())
}

pub fn schemas(args: CatalogArgs, database: String) -> anyhow::Result<()> {
    let catalog = open_catalog(&args)?;
    let cache = open_cache(&args)?;

    let schemas = list_schemas(&catalog, &database, cache.as_ref())
        .with_context(|| format!("Failed to list schemas of {}", database))?;

    if schemas.is_empty() {
        eprintln!("No schemas found in {}.", database);
        return Ok(());
    }

    let default = default_schema(&schemas).map(|s| s.to_string());
    for name in &schemas {
        if Some(name) == default.as_ref() {
            println!("{} (default)", name);
        } else {
            println!("{}", name);
        }
    }
    Ok(())
}

pub fn themes() {
    for theme in BuiltinTheme::ALL {
        if theme == BuiltinTheme::default() {
            println!("{} (default)", theme);
        } else {
            println!("{}", theme);
        }
    }
}
