//! Metadata import: catalog listings into a `Schema`.
//!
//! The import runs six catalog calls in a fixed order. Tables and columns are
//! mandatory and abort the import on failure. Views, unique keys, primary keys
//! and imported keys are optional: a failure leaves that piece of metadata
//! empty and is recorded in the diagnostics with its reason.

mod diagnostics;

pub use diagnostics::{ImportDiagnostics, StepOutcome, StepReport};

use crate::catalog::rows::{
    decode_row, decode_rows, ColumnRow, ImportedKeyRow, PrimaryKeyRow, TableRow, UniqueKeyRow,
};
use crate::catalog::{CatalogError, CatalogQuery, CatalogSource, CatalogStep, RawRow, Scope};
use crate::schema::{push_into, KeySlots, Schema, TableId, TypeDescriptor, UNKNOWN_DATATYPE};
use ahash::AHashMap;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors that abort an import
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to list {step} in {scope}")]
    MandatoryCatalogFailure {
        step: CatalogStep,
        scope: String,
        #[source]
        source: CatalogError,
    },
}

/// Result of a successful import
#[derive(Debug)]
pub struct Import {
    /// The populated model
    pub schema: Schema,
    /// Counters and per-step outcomes
    pub diagnostics: ImportDiagnostics,
}

/// Builds a `Schema` from a catalog source
pub struct Importer<'a, S: CatalogSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: CatalogSource + ?Sized> Importer<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Import one schema.
    ///
    /// An empty database or schema name yields an empty model without issuing
    /// any query.
    pub fn import(&self, database: &str, schema: &str) -> Result<Import, ImportError> {
        let mut model = Schema::new();
        let mut diagnostics = ImportDiagnostics::default();

        if database.is_empty() || schema.is_empty() {
            return Ok(Import {
                schema: model,
                diagnostics,
            });
        }

        let scope = Scope::new(database, schema);

        let tables: Vec<TableRow> = self.mandatory(CatalogStep::Tables, &scope, &mut diagnostics)?;
        self.import_tables(&mut model, tables, &mut diagnostics);

        if let Some(views) = self.optional::<TableRow>(CatalogStep::Views, &scope, &mut diagnostics)
        {
            self.import_views(&mut model, views, &mut diagnostics);
        }

        let columns: Vec<ColumnRow> =
            self.mandatory(CatalogStep::Columns, &scope, &mut diagnostics)?;
        self.import_columns(&mut model, columns, &mut diagnostics);

        if let Some(uniques) =
            self.optional::<UniqueKeyRow>(CatalogStep::UniqueKeys, &scope, &mut diagnostics)
        {
            self.import_unique_keys(&mut model, uniques);
        }

        if let Some(pks) =
            self.optional::<PrimaryKeyRow>(CatalogStep::PrimaryKeys, &scope, &mut diagnostics)
        {
            self.import_primary_keys(&mut model, pks, &mut diagnostics);
        }

        let query = CatalogQuery::metadata(CatalogStep::ImportedKeys, &scope);
        match self.fetch_raw(&query) {
            Ok(raw) => {
                diagnostics.record_loaded(CatalogStep::ImportedKeys, raw.len());
                let fks = self.decode_imported_keys(&query, &raw, &mut diagnostics);
                // Raw rows are kept for troubleshooting, malformed ones included
                diagnostics.fk_rows = raw;
                self.import_foreign_keys(&mut model, fks, &mut diagnostics);
            }
            Err(e) => self.recover(CatalogStep::ImportedKeys, e, &mut diagnostics),
        }

        tracing::info!(
            scope = %scope,
            tables = diagnostics.tables,
            views = diagnostics.views,
            columns = diagnostics.columns,
            primary_keys = diagnostics.primary_keys,
            foreign_keys = diagnostics.foreign_keys,
            "metadata imported"
        );

        Ok(Import {
            schema: model,
            diagnostics,
        })
    }

    fn fetch_raw(&self, query: &CatalogQuery) -> Result<Vec<RawRow>, CatalogError> {
        tracing::debug!(query = %query, "catalog query");
        self.source.execute(query)
    }

    fn fetch<T: DeserializeOwned>(&self, query: &CatalogQuery) -> Result<Vec<T>, CatalogError> {
        let raw = self.fetch_raw(query)?;
        decode_rows(query, &raw)
    }

    fn mandatory<T: DeserializeOwned>(
        &self,
        step: CatalogStep,
        scope: &Scope,
        diagnostics: &mut ImportDiagnostics,
    ) -> Result<Vec<T>, ImportError> {
        let query = CatalogQuery::metadata(step, scope);
        let rows = self
            .fetch(&query)
            .map_err(|source| ImportError::MandatoryCatalogFailure {
                step,
                scope: scope.to_string(),
                source,
            })?;
        diagnostics.record_loaded(step, rows.len());
        Ok(rows)
    }

    fn optional<T: DeserializeOwned>(
        &self,
        step: CatalogStep,
        scope: &Scope,
        diagnostics: &mut ImportDiagnostics,
    ) -> Option<Vec<T>> {
        let query = CatalogQuery::metadata(step, scope);
        match self.fetch(&query) {
            Ok(rows) => {
                diagnostics.record_loaded(step, rows.len());
                Some(rows)
            }
            Err(e) => {
                self.recover(step, e, diagnostics);
                None
            }
        }
    }

    /// Imported keys decode row by row; a malformed row is dropped on its own
    fn decode_imported_keys(
        &self,
        query: &CatalogQuery,
        raw: &[RawRow],
        diagnostics: &mut ImportDiagnostics,
    ) -> Vec<ImportedKeyRow> {
        let mut rows = Vec::with_capacity(raw.len());
        for row in raw {
            match decode_row::<ImportedKeyRow>(query, row) {
                Ok(row) => rows.push(row),
                Err(e) => {
                    tracing::debug!(error = %e, "malformed imported key row dropped");
                    diagnostics.fk_rows_malformed += 1;
                }
            }
        }
        rows
    }

    fn recover(&self, step: CatalogStep, error: CatalogError, diagnostics: &mut ImportDiagnostics) {
        tracing::warn!(step = %step, error = %error, "optional catalog step unavailable, continuing without it");
        diagnostics.record_recovered(step, error.to_string());
    }

    fn import_tables(
        &self,
        model: &mut Schema,
        rows: Vec<TableRow>,
        diagnostics: &mut ImportDiagnostics,
    ) {
        for row in rows {
            if model.add_table(row.name.clone(), row.comment).is_none() {
                tracing::debug!(table = %row.name, "duplicate table row ignored");
            }
        }
        diagnostics.tables = model.len();
    }

    fn import_views(
        &self,
        model: &mut Schema,
        rows: Vec<TableRow>,
        diagnostics: &mut ImportDiagnostics,
    ) {
        let mut views = 0;
        for row in rows {
            if model.add_table(row.name, row.comment).is_some() {
                views += 1;
            }
        }
        diagnostics.views = views;
    }

    fn import_columns(
        &self,
        model: &mut Schema,
        rows: Vec<ColumnRow>,
        diagnostics: &mut ImportDiagnostics,
    ) {
        let mut count = 0;
        for row in rows {
            let Some(table_id) = model.get_table_id(&row.table_name) else {
                continue;
            };
            let Some(table) = model.table_mut(table_id) else {
                continue;
            };
            let Some(column_id) = table.add_column(row.column_name.clone(), row.comment) else {
                tracing::debug!(table = %row.table_name, column = %row.column_name, "column row ignored (duplicate name or table full)");
                continue;
            };
            let Some(column) = table.column_mut(column_id) else {
                continue;
            };

            column.identity = !row.autoincrement.is_empty();
            match TypeDescriptor::parse(&row.data_type) {
                Ok(descriptor) => {
                    column.nullable = descriptor.nullable;
                    column.datatype = descriptor.normalize();
                }
                Err(e) => {
                    tracing::debug!(
                        table = %row.table_name,
                        column = %row.column_name,
                        error = %e,
                        "unparseable type descriptor"
                    );
                    column.datatype = UNKNOWN_DATATYPE.to_string();
                    diagnostics.type_fallbacks += 1;
                }
            }
            count += 1;
        }
        diagnostics.columns = count;
    }

    fn import_unique_keys(&self, model: &mut Schema, rows: Vec<UniqueKeyRow>) {
        for row in rows {
            let Some(column_ref) = model.find_column(&row.table_name, &row.column_name) else {
                tracing::debug!(table = %row.table_name, column = %row.column_name, "unique key row unresolved");
                continue;
            };
            if let Some(table) = model.table_mut(column_ref.table) {
                push_into(&mut table.unique_keys, &row.constraint_name, column_ref.column);
                if let Some(column) = table.column_mut(column_ref.column) {
                    column.unique = true;
                }
            }
        }
    }

    fn import_primary_keys(
        &self,
        model: &mut Schema,
        rows: Vec<PrimaryKeyRow>,
        diagnostics: &mut ImportDiagnostics,
    ) {
        let mut slots: AHashMap<TableId, KeySlots> = AHashMap::new();
        let mut count = 0;

        for row in rows {
            let Some(column_ref) = model.find_column(&row.table_name, &row.column_name) else {
                tracing::debug!(table = %row.table_name, column = %row.column_name, "primary key row unresolved");
                continue;
            };
            if !slots
                .entry(column_ref.table)
                .or_default()
                .place(row.key_sequence, column_ref.column)
            {
                tracing::debug!(table = %row.table_name, column = %row.column_name, "primary key row without position");
                continue;
            }
            if let Some(column) = model
                .table_mut(column_ref.table)
                .and_then(|t| t.column_mut(column_ref.column))
            {
                column.pk_constraint = Some(row.constraint_name);
            }
            count += 1;
        }

        for table in model.iter_mut() {
            if let Some(slots) = slots.remove(&table.id) {
                table.primary_key = slots.finish();
            }
        }
        diagnostics.primary_keys = count;
    }

    fn import_foreign_keys(
        &self,
        model: &mut Schema,
        rows: Vec<ImportedKeyRow>,
        diagnostics: &mut ImportDiagnostics,
    ) {
        let mut count = 0;
        for row in rows {
            let pk = model.find_column(&row.pk_table_name, &row.pk_column_name);
            let fk = model.find_column(&row.fk_table_name, &row.fk_column_name);
            let (Some(pk), Some(fk)) = (pk, fk) else {
                tracing::debug!(constraint = %row.fk_name, "foreign key row unresolved");
                diagnostics.fk_rows_unresolved += 1;
                continue;
            };
            if row.pk_schema_name != row.fk_schema_name {
                tracing::debug!(
                    constraint = %row.fk_name,
                    pk_schema = %row.pk_schema_name,
                    fk_schema = %row.fk_schema_name,
                    "cross-schema foreign key row dropped"
                );
                diagnostics.fk_rows_cross_schema += 1;
                continue;
            }

            if let Some(table) = model.table_mut(fk.table) {
                push_into(&mut table.foreign_keys, &row.fk_name, fk.column);
                if let Some(column) = table.column_mut(fk.column) {
                    column.fk_target = Some(pk);
                }
            }
            count += 1;
        }
        diagnostics.foreign_keys = count;
    }
}

/// Import a schema from a catalog source
pub fn import_metadata<S: CatalogSource + ?Sized>(
    source: &S,
    database: &str,
    schema: &str,
) -> Result<Import, ImportError> {
    Importer::new(source).import(database, schema)
}
