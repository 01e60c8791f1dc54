//! FILENAME: core/pivot-engine/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PivotError {
    #[error("Record {index} has no value for field '{field}'")]
    MissingField { index: usize, field: String },
}
