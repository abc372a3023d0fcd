//! Renderers turning an imported `Schema` into text artifacts.
//!
//! This module provides:
//! - Graphviz DOT diagrams with themed table nodes and FK edges
//! - Re-runnable DDL scripts (`CREATE OR REPLACE` plus FK constraints)
//!
//! Both renderers only read the schema, so they can run side by side on the
//! same model.

mod dot;
mod script;
mod theme;

pub use dot::to_dot;
pub use script::to_script;
pub use theme::{BuiltinTheme, Theme};

/// Display switches for the diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphOptions {
    /// Emit one row per column inside each table node
    pub show_columns: bool,
    /// Add a datatype cell to every column row
    pub show_types: bool,
    /// Render regular names and datatypes in uppercase
    pub upper_case: bool,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            show_columns: true,
            show_types: false,
            upper_case: false,
        }
    }
}
