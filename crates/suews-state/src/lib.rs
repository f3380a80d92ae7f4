//! The flat state table consumed by the SUEWS numerical core.
//!
//! A [`FlatState`] holds one [`StateRow`] per grid. Every cell is addressed
//! by a [`ColumnKey`]: a parameter name plus an [`IndexDescriptor`] whose
//! canonical string form (`"0"`, `"(a,)"`, `"(a, b)"`, `"(a, b, c)"`) is
//! part of the contract with the external model.
//!
//! Cells are plain `f64` values; integer selectors are stored as whole
//! numbers and read back through [`CellValue`].
//!
//! # Modules
//!
//! - [`index`] -- Index descriptors and their canonical rendering
//! - [`row`] -- Column keys, cell conversion, and single-grid rows
//! - [`table`] -- The multi-grid table
//! - [`error`] -- [`StateError`]

pub mod error;
pub mod index;
pub mod row;
pub mod table;

pub use error::StateError;
pub use index::IndexDescriptor;
pub use row::{CellValue, ColumnKey, StateRow};
pub use table::FlatState;
