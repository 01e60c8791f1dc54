//! FILENAME: core/pivot-engine/src/definition.rs
//! Pivot Definition - The serializable configuration.
//!
//! This module contains the types needed to DESCRIBE a count pivot:
//! which record field feeds the rows, which feeds the columns, how the
//! axis items are ordered and what happens to records lacking a value.

use serde::{Deserialize, Serialize};

/// Label used for the bucket that collects records without a value.
pub const DEFAULT_MISSING_LABEL: &str = "Không xác định";

// ============================================================================
// ORDERING
// ============================================================================

/// Order of the items along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Order of first occurrence in the source records.
    #[default]
    SourceOrder,
    Ascending,
    Descending,
}

// ============================================================================
// MISSING VALUES
// ============================================================================

/// What to do with a record whose row or column field is absent or null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MissingValuePolicy {
    /// Count the record under a dedicated item shown with `label`.
    /// The item never coincides with a real value, even one spelled the same.
    Bucket {
        #[serde(default = "default_missing_label")]
        label: String,
    },
    /// Leave the record out of every count.
    Skip,
    /// Fail the calculation on the first such record.
    Reject,
}

fn default_missing_label() -> String {
    DEFAULT_MISSING_LABEL.to_string()
}

impl Default for MissingValuePolicy {
    fn default() -> Self {
        MissingValuePolicy::Bucket {
            label: default_missing_label(),
        }
    }
}

impl MissingValuePolicy {
    /// Display label of the missing-value item, when one can exist.
    pub fn label(&self) -> Option<&str> {
        match self {
            MissingValuePolicy::Bucket { label } => Some(label),
            _ => None,
        }
    }
}

// ============================================================================
// PIVOT DEFINITION
// ============================================================================

/// The complete definition of a count pivot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PivotDefinition {
    /// Record field whose distinct values become the rows.
    pub row_field: String,

    /// Record field whose distinct values become the columns.
    pub column_field: String,

    #[serde(default)]
    pub row_order: SortOrder,

    #[serde(default)]
    pub column_order: SortOrder,

    #[serde(default)]
    pub missing_values: MissingValuePolicy,
}

impl PivotDefinition {
    pub fn new(row_field: impl Into<String>, column_field: impl Into<String>) -> Self {
        PivotDefinition {
            row_field: row_field.into(),
            column_field: column_field.into(),
            row_order: SortOrder::SourceOrder,
            column_order: SortOrder::SourceOrder,
            missing_values: MissingValuePolicy::default(),
        }
    }

    pub fn with_missing_values(mut self, policy: MissingValuePolicy) -> Self {
        self.missing_values = policy;
        self
    }

    /// Applies the same ordering to both axes.
    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.row_order = order;
        self.column_order = order;
        self
    }

}
