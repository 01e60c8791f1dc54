//! FILENAME: core/pivot-engine/src/engine.rs
//! Pivot Engine - Counts records into a row/column cross-tabulation.
//!
//! Algorithm:
//! 1. Intern the row and column value of every record (first-seen IDs)
//! 2. Increment a counter keyed by (row ValueId, column ValueId)
//! 3. Arrange both axes by the configured order
//! 4. Densify the counters into a matrix and derive row/column/grand totals

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use crate::cache::{record_value, FieldCache, Record, ValueId};
use crate::definition::{MissingValuePolicy, PivotDefinition};
use crate::error::PivotError;

// ============================================================================
// CROSS TAB
// ============================================================================

/// The computed pivot: labels for both axes, a dense count matrix and totals.
/// `counts[r][c]` is the number of records with row item `r` and column item `c`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossTab {
    pub row_field: String,
    pub column_field: String,
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    pub counts: Vec<Vec<u64>>,
    pub row_totals: Vec<u64>,
    pub column_totals: Vec<u64>,
    pub grand_total: u64,
    /// Records left out because of a missing value (Skip policy only).
    pub skipped: usize,
}

impl CrossTab {
    pub fn row_count(&self) -> usize {
        self.row_labels.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_labels.is_empty()
    }

    /// Count at a (row, column) position; 0 outside the matrix.
    pub fn count(&self, row: usize, col: usize) -> u64 {
        self.counts
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(0)
    }

    /// Count for a pair of labels. Returns the first matching item when a
    /// label is shared by several items.
    pub fn count_by_label(&self, row_label: &str, column_label: &str) -> Option<u64> {
        let row = self.row_index(row_label)?;
        let col = self.column_index(column_label)?;
        Some(self.count(row, col))
    }

    pub fn row_index(&self, label: &str) -> Option<usize> {
        self.row_labels.iter().position(|l| l == label)
    }

    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.column_labels.iter().position(|l| l == label)
    }

    /// Verifies every total against the count matrix.
    pub fn is_consistent(&self) -> bool {
        if self.counts.len() != self.row_labels.len()
            || self.row_totals.len() != self.row_labels.len()
            || self.column_totals.len() != self.column_labels.len()
        {
            return false;
        }

        let rows_ok = self.counts.iter().zip(&self.row_totals).all(|(row, total)| {
            row.len() == self.column_labels.len() && row.iter().sum::<u64>() == *total
        });
        let cols_ok = (0..self.column_labels.len()).all(|c| {
            self.counts.iter().map(|row| row[c]).sum::<u64>() == self.column_totals[c]
        });

        rows_ok
            && cols_ok
            && self.row_totals.iter().sum::<u64>() == self.grand_total
            && self.column_totals.iter().sum::<u64>() == self.grand_total
    }
}

// ============================================================================
// PIVOT CALCULATOR
// ============================================================================

/// Incremental counting state. Feed records with `add_record`, then `finish`.
pub struct PivotCalculator<'a> {
    definition: &'a PivotDefinition,
    row_cache: FieldCache,
    col_cache: FieldCache,
    counts: FxHashMap<(ValueId, ValueId), u64>,
    skipped: usize,
}

impl<'a> PivotCalculator<'a> {
    pub fn new(definition: &'a PivotDefinition) -> Self {
        PivotCalculator {
            definition,
            row_cache: FieldCache::new(definition.row_field.clone()),
            col_cache: FieldCache::new(definition.column_field.clone()),
            counts: FxHashMap::default(),
            skipped: 0,
        }
    }

    /// Counts one record. `index` is the record's position in the source,
    /// used for error reporting.
    pub fn add_record(&mut self, index: usize, record: &Record) -> Result<(), PivotError> {
        let row_value = record_value(record, &self.definition.row_field);
        let col_value = record_value(record, &self.definition.column_field);

        if row_value.is_missing() || col_value.is_missing() {
            match self.definition.missing_values {
                MissingValuePolicy::Bucket { .. } => {}
                MissingValuePolicy::Skip => {
                    self.skipped += 1;
                    return Ok(());
                }
                MissingValuePolicy::Reject => {
                    let field = if row_value.is_missing() {
                        &self.definition.row_field
                    } else {
                        &self.definition.column_field
                    };
                    return Err(PivotError::MissingField {
                        index,
                        field: field.clone(),
                    });
                }
            }
        }

        let col_id = self.col_cache.intern(col_value);
        let row_id = self.row_cache.intern(row_value);
        *self.counts.entry((row_id, col_id)).or_insert(0) += 1;
        Ok(())
    }

    /// Builds the dense cross-tab.
    pub fn finish(self) -> CrossTab {
        let missing_label = self.definition.missing_values.label().unwrap_or("");

        let row_ids = self.row_cache.ordered_ids(self.definition.row_order);
        let col_ids = self.col_cache.ordered_ids(self.definition.column_order);

        let row_labels = labels_for(&self.row_cache, &row_ids, missing_label);
        let column_labels = labels_for(&self.col_cache, &col_ids, missing_label);

        let counts: Vec<Vec<u64>> = row_ids
            .iter()
            .map(|&r| {
                col_ids
                    .iter()
                    .map(|&c| self.counts.get(&(r, c)).copied().unwrap_or(0))
                    .collect()
            })
            .collect();

        let row_totals: Vec<u64> = counts.iter().map(|row| row.iter().sum()).collect();
        let column_totals: Vec<u64> = (0..col_ids.len())
            .map(|c| counts.iter().map(|row| row[c]).sum())
            .collect();
        let grand_total = row_totals.iter().sum();

        CrossTab {
            row_field: self.definition.row_field.clone(),
            column_field: self.definition.column_field.clone(),
            row_labels,
            column_labels,
            counts,
            row_totals,
            column_totals,
            grand_total,
            skipped: self.skipped,
        }
    }
}

fn labels_for(cache: &FieldCache, ids: &[ValueId], missing_label: &str) -> Vec<String> {
    ids.iter()
        .filter_map(|&id| cache.get_value(id))
        .map(|v| v.label(missing_label))
        .collect()
}

/// Main entry point: counts `records` according to `definition`.
/// The records are only read.
pub fn calculate_crosstab(
    records: &[Record],
    definition: &PivotDefinition,
) -> Result<CrossTab, PivotError> {
    let mut calculator = PivotCalculator::new(definition);
    for (index, record) in records.iter().enumerate() {
        calculator.add_record(index, record)?;
    }
    Ok(calculator.finish())
}
