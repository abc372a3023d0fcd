//! Import counters and per-step outcomes.

use crate::catalog::{CatalogStep, RawRow};
use schemars::JsonSchema;
use serde::Serialize;

/// How a catalog step ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
    /// The listing was read; `rows` is the number of rows returned
    Loaded { rows: usize },
    /// The listing failed and the step continued with no data
    Recovered { reason: String },
}

/// Outcome of one catalog step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct StepReport {
    pub step: CatalogStep,
    #[serde(flatten)]
    pub outcome: StepOutcome,
}

/// Counters collected during an import
#[derive(Debug, Clone, Default, Serialize, JsonSchema)]
pub struct ImportDiagnostics {
    /// Tables listed
    pub tables: usize,
    /// Views added (views sharing a table name are not counted)
    pub views: usize,
    /// Columns attached to a known table
    pub columns: usize,
    /// Primary key columns attached
    pub primary_keys: usize,
    /// Foreign key columns attached
    pub foreign_keys: usize,
    /// Columns whose type descriptor could not be parsed
    pub type_fallbacks: usize,
    /// Imported key rows whose table or column could not be resolved
    pub fk_rows_unresolved: usize,
    /// Imported key rows dropped because the two sides are in different schemas
    pub fk_rows_cross_schema: usize,
    /// Imported key rows dropped because they do not match the row schema
    pub fk_rows_malformed: usize,
    /// Raw imported key rows, for troubleshooting
    pub fk_rows: Vec<RawRow>,
    /// One report per step that ran
    pub steps: Vec<StepReport>,
}

impl ImportDiagnostics {
    pub(crate) fn record_loaded(&mut self, step: CatalogStep, rows: usize) {
        self.steps.push(StepReport {
            step,
            outcome: StepOutcome::Loaded { rows },
        });
    }

    pub(crate) fn record_recovered(&mut self, step: CatalogStep, reason: String) {
        self.steps.push(StepReport {
            step,
            outcome: StepOutcome::Recovered { reason },
        });
    }

    /// Outcome of a step, if it ran
    pub fn outcome(&self, step: CatalogStep) -> Option<&StepOutcome> {
        self.steps
            .iter()
            .find(|r| r.step == step)
            .map(|r| &r.outcome)
    }

    /// Steps that were recovered, with their reasons
    pub fn recovered_steps(&self) -> impl Iterator<Item = (CatalogStep, &str)> {
        self.steps.iter().filter_map(|r| match &r.outcome {
            StepOutcome::Recovered { reason } => Some((r.step, reason.as_str())),
            StepOutcome::Loaded { .. } => None,
        })
    }
}
