//! FILENAME: core/pivot-engine/src/lib.rs
//! Count pivot subsystem.
//!
//! Cross-tabulates JSON records by two fields and lays the result out as a
//! styled summary sheet. Depends on `engine` only for the sheet model
//! (Cell, Grid, CellStyle, StyleRegistry).
//!
//! Layers:
//! - `definition`: Serializable configuration (what the pivot IS)
//! - `cache`: Value interning in first-seen order (HOW values are keyed)
//! - `engine`: Counting into a CrossTab (HOW we calculate)
//! - `view`: Summary sheet layout and styling (WHAT we display)

pub mod cache;
pub mod definition;
pub mod engine;
pub mod error;
pub mod view;

pub use cache::{record_value, FieldCache, FieldValue, OrderedFloat, Record, ValueId};
pub use definition::*;
pub use engine::{calculate_crosstab, CrossTab, PivotCalculator};
pub use error::PivotError;
pub use view::*;
