//! Column keys and single-grid rows.

use std::collections::HashMap;

use core::fmt;

use crate::{IndexDescriptor, StateError};

// ---------------------------------------------------------------------------
// Column key
// ---------------------------------------------------------------------------

/// Address of one cell: parameter name plus index descriptor.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColumnKey {
    /// Parameter name as the numerical core knows it, e.g. `sfr_surf`.
    pub name: String,
    /// Position within the parameter.
    pub index: IndexDescriptor,
}

impl ColumnKey {
    /// Build a key.
    pub fn new(name: impl Into<String>, index: IndexDescriptor) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }

    /// Build a key for a scalar parameter.
    pub fn scalar(name: impl Into<String>) -> Self {
        Self::new(name, IndexDescriptor::Scalar)
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.name, self.index)
    }
}

// ---------------------------------------------------------------------------
// Cell conversion
// ---------------------------------------------------------------------------

/// A value that can be stored in and read back from a table cell.
pub trait CellValue: Copy + Default {
    /// Convert to the stored representation.
    fn to_cell(self) -> f64;

    /// Convert from the stored representation, or `None` if the cell does
    /// not hold a representable value.
    fn from_cell(cell: f64) -> Option<Self>;
}

impl CellValue for f64 {
    fn to_cell(self) -> f64 {
        self
    }

    fn from_cell(cell: f64) -> Option<Self> {
        Some(cell)
    }
}

impl CellValue for i32 {
    fn to_cell(self) -> f64 {
        f64::from(self)
    }

    #[allow(clippy::float_cmp, clippy::cast_possible_truncation)]
    fn from_cell(cell: f64) -> Option<Self> {
        let integral = cell.is_finite() && cell.fract() == 0.0;
        let in_range = cell >= f64::from(Self::MIN) && cell <= f64::from(Self::MAX);
        (integral && in_range).then_some(cell as Self)
    }
}

impl CellValue for u32 {
    fn to_cell(self) -> f64 {
        f64::from(self)
    }

    #[allow(clippy::float_cmp, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn from_cell(cell: f64) -> Option<Self> {
        let integral = cell.is_finite() && cell.fract() == 0.0;
        let in_range = cell >= 0.0 && cell <= f64::from(Self::MAX);
        (integral && in_range).then_some(cell as Self)
    }
}

// ---------------------------------------------------------------------------
// Row
// ---------------------------------------------------------------------------

/// The columns of one grid, in insertion order.
///
/// A key appears at most once. Inserting a key that is already present
/// leaves the existing value untouched: the first writer wins. Several
/// configuration blocks emit the same padding columns, and this is the rule
/// that makes their concatenation deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateRow {
    /// Cells in insertion order.
    cells: Vec<(ColumnKey, f64)>,
    /// Position of each key in `cells`.
    positions: HashMap<ColumnKey, usize>,
}

impl StateRow {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of columns in the row.
    pub const fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the row has no columns.
    pub const fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Insert a cell, keeping the existing value if the key is present.
    ///
    /// Returns `true` when the cell was added.
    pub fn insert(&mut self, key: ColumnKey, value: f64) -> bool {
        if self.positions.contains_key(&key) {
            return false;
        }
        self.positions.insert(key.clone(), self.cells.len());
        self.cells.push((key, value));
        true
    }

    /// Insert a typed cell by name and index.
    pub fn push<T: CellValue>(&mut self, name: &str, index: IndexDescriptor, value: T) -> bool {
        self.insert(ColumnKey::new(name, index), value.to_cell())
    }

    /// Insert a typed scalar cell.
    pub fn scalar<T: CellValue>(&mut self, name: &str, value: T) -> bool {
        self.push(name, IndexDescriptor::Scalar, value)
    }

    /// Insert consecutive cells of one parameter, indexing each element
    /// with `index(position)`.
    pub fn push_all<T: CellValue>(
        &mut self,
        name: &str,
        values: &[T],
        index: impl Fn(usize) -> IndexDescriptor,
    ) {
        for (position, value) in values.iter().enumerate() {
            self.push(name, index(position), *value);
        }
    }

    /// Append every cell of `other` whose key is not already present.
    ///
    /// Returns the number of cells dropped as duplicates.
    pub fn merge_keep_first(&mut self, other: Self) -> usize {
        let mut dropped: usize = 0;
        for (key, value) in other.cells {
            if !self.insert(key, value) {
                dropped = dropped.saturating_add(1);
            }
        }
        dropped
    }

    /// Raw value at `key`, if present.
    pub fn get(&self, key: &ColumnKey) -> Option<f64> {
        let position = self.positions.get(key)?;
        self.cells.get(*position).map(|(_, value)| *value)
    }

    /// Whether the row has a cell at `(name, index)`.
    pub fn contains(&self, name: &str, index: IndexDescriptor) -> bool {
        self.positions.contains_key(&ColumnKey::new(name, index))
    }

    /// Read a typed cell.
    ///
    /// # Errors
    ///
    /// [`StateError::MissingColumn`] when the cell is absent and
    /// [`StateError::NonIntegral`] when an integer read finds a fractional
    /// or out-of-range value.
    pub fn read<T: CellValue>(&self, name: &str, index: IndexDescriptor) -> Result<T, StateError> {
        let key = ColumnKey::new(name, index);
        let value = self
            .get(&key)
            .ok_or_else(|| StateError::MissingColumn { key: key.clone() })?;
        T::from_cell(value).ok_or(StateError::NonIntegral { key, value })
    }

    /// Read a typed scalar cell.
    pub fn read_scalar<T: CellValue>(&self, name: &str) -> Result<T, StateError> {
        self.read(name, IndexDescriptor::Scalar)
    }

    /// Read `N` consecutive cells of one parameter.
    pub fn read_array<T: CellValue, const N: usize>(
        &self,
        name: &str,
        index: impl Fn(usize) -> IndexDescriptor,
    ) -> Result<[T; N], StateError> {
        let mut out = [T::default(); N];
        for (position, slot) in out.iter_mut().enumerate() {
            *slot = self.read(name, index(position))?;
        }
        Ok(out)
    }

    /// Iterate over cells in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&ColumnKey, f64)> {
        self.cells.iter().map(|(key, value)| (key, *value))
    }

    /// Iterate over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &ColumnKey> {
        self.cells.iter().map(|(key, _)| key)
    }
}
