//! Key constraint structures.

use super::ColumnId;
use std::collections::BTreeMap;

/// A named key constraint grouping one or more columns of a table.
///
/// Used for both unique keys and foreign keys. Columns keep the order in
/// which the catalog reported them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyConstraint {
    /// Constraint name
    pub name: String,
    /// Participating columns in append order
    pub columns: Vec<ColumnId>,
}

impl KeyConstraint {
    pub fn new(name: String) -> Self {
        Self {
            name,
            columns: Vec::new(),
        }
    }

    /// First column, if any
    pub fn first(&self) -> Option<ColumnId> {
        self.columns.first().copied()
    }
}

/// Add `column` to the constraint called `name`, creating it on first use
pub(crate) fn push_into(constraints: &mut Vec<KeyConstraint>, name: &str, column: ColumnId) {
    match constraints.iter_mut().find(|c| c.name == name) {
        Some(constraint) => constraint.columns.push(column),
        None => {
            let mut constraint = KeyConstraint::new(name.to_string());
            constraint.columns.push(column);
            constraints.push(constraint);
        }
    }
}

/// Sparse position-to-column builder for composite primary keys.
///
/// Rows may arrive in any order and with gaps; `finish` yields the columns by
/// ascending position and skips unset slots.
#[derive(Debug, Default, Clone)]
pub struct KeySlots {
    slots: BTreeMap<usize, ColumnId>,
}

impl KeySlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a column at a 1-based key position. Position 0 is rejected.
    pub fn place(&mut self, key_sequence: u32, column: ColumnId) -> bool {
        if key_sequence == 0 {
            return false;
        }
        self.slots.insert(key_sequence as usize - 1, column);
        true
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn finish(self) -> Vec<ColumnId> {
        self.slots.into_values().collect()
    }
}
