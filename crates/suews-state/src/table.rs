//! The multi-grid flat state table.
//!
//! Rows are keyed by [`GridId`] and kept in ascending grid order. The
//! table's column set is the union of every row's keys in first-seen order,
//! which is the layout the numerical core reads.

use std::collections::{BTreeMap, HashSet};

use suews_types::GridId;

use crate::{ColumnKey, StateError, StateRow};

/// A table with one [`StateRow`] per grid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatState {
    /// Union of row keys, first-seen order.
    columns: Vec<ColumnKey>,
    /// Membership set for `columns`.
    known: HashSet<ColumnKey>,
    /// Rows by grid.
    rows: BTreeMap<GridId, StateRow>,
}

impl FlatState {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from independently encoded rows.
    ///
    /// # Errors
    ///
    /// [`StateError::DuplicateGrid`] if two rows share a grid.
    pub fn from_rows(
        rows: impl IntoIterator<Item = (GridId, StateRow)>,
    ) -> Result<Self, StateError> {
        let mut table = Self::new();
        for (grid, row) in rows {
            table.insert_row(grid, row)?;
        }
        Ok(table)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Add the row of a new grid.
    ///
    /// # Errors
    ///
    /// [`StateError::DuplicateGrid`] if the grid already has a row.
    pub fn insert_row(&mut self, grid: GridId, row: StateRow) -> Result<(), StateError> {
        if self.rows.contains_key(&grid) {
            return Err(StateError::DuplicateGrid { grid });
        }
        for key in row.keys() {
            self.register(key);
        }
        self.rows.insert(grid, row);
        Ok(())
    }

    /// Row of `grid`.
    ///
    /// # Errors
    ///
    /// [`StateError::UnknownGrid`] if the table has no such row.
    pub fn row(&self, grid: GridId) -> Result<&StateRow, StateError> {
        self.rows.get(&grid).ok_or(StateError::UnknownGrid { grid })
    }

    /// Grid ids in ascending order.
    pub fn grids(&self) -> impl Iterator<Item = GridId> + '_ {
        self.rows.keys().copied()
    }

    /// Rows in ascending grid order.
    pub fn rows(&self) -> impl Iterator<Item = (GridId, &StateRow)> {
        self.rows.iter().map(|(grid, row)| (*grid, row))
    }

    /// Union of column keys in first-seen order.
    pub fn columns(&self) -> &[ColumnKey] {
        &self.columns
    }

    /// Value of `key` in the row of `grid`.
    ///
    /// # Errors
    ///
    /// [`StateError::UnknownGrid`] or [`StateError::MissingColumn`].
    pub fn value(&self, grid: GridId, key: &ColumnKey) -> Result<f64, StateError> {
        self.row(grid)?
            .get(key)
            .ok_or_else(|| StateError::MissingColumn { key: key.clone() })
    }

    /// Merge another table column-wise, grid by grid.
    ///
    /// Rows of grids only present in `other` are added whole. For shared
    /// grids, cells already present keep their value. Returns the number of
    /// cells dropped.
    pub fn merge_keep_first(&mut self, other: Self) -> usize {
        for key in &other.columns {
            self.register(key);
        }
        let mut dropped: usize = 0;
        for (grid, row) in other.rows {
            match self.rows.get_mut(&grid) {
                Some(existing) => {
                    dropped = dropped.saturating_add(existing.merge_keep_first(row));
                }
                None => {
                    self.rows.insert(grid, row);
                }
            }
        }
        tracing::trace!(dropped, columns = self.columns.len(), "merged state tables");
        dropped
    }

    fn register(&mut self, key: &ColumnKey) {
        if self.known.insert(key.clone()) {
            self.columns.push(key.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IndexDescriptor;

    fn row_with(cells: &[(&str, f64)]) -> StateRow {
        let mut row = StateRow::new();
        for (name, value) in cells {
            row.scalar(name, *value);
        }
        row
    }

    #[test]
    fn rejects_duplicate_grid() {
        let mut table = FlatState::new();
        assert!(table.insert_row(GridId(1), StateRow::new()).is_ok());
        assert_eq!(
            table.insert_row(GridId(1), StateRow::new()),
            Err(StateError::DuplicateGrid { grid: GridId(1) })
        );
    }

    #[test]
    fn grids_are_ascending() {
        let table = FlatState::from_rows([
            (GridId(5), StateRow::new()),
            (GridId(0), StateRow::new()),
            (GridId(2), StateRow::new()),
        ])
        .unwrap_or_default();
        let grids: Vec<GridId> = table.grids().collect();
        assert_eq!(grids, vec![GridId(0), GridId(2), GridId(5)]);
    }

    #[test]
    fn columns_are_first_seen_union() {
        let table = FlatState::from_rows([
            (GridId(0), row_with(&[("lat", 51.5), ("lng", -0.1)])),
            (GridId(1), row_with(&[("alt", 10.0), ("lat", 40.0)])),
        ])
        .ok();
        let names: Option<Vec<&str>> = table
            .as_ref()
            .map(|t| t.columns().iter().map(|k| k.name.as_str()).collect());
        assert_eq!(names, Some(vec!["lat", "lng", "alt"]));
    }

    #[test]
    fn unknown_grid_is_reported() {
        let table = FlatState::new();
        assert!(matches!(
            table.row(GridId(3)),
            Err(StateError::UnknownGrid { grid: GridId(3) })
        ));
    }

    #[test]
    fn merge_keeps_first_value_per_grid() {
        let mut left = FlatState::from_rows([(GridId(0), row_with(&[("tstep", 300.0)]))])
            .unwrap_or_default();
        let right = FlatState::from_rows([
            (GridId(0), row_with(&[("tstep", 60.0), ("diagnose", 0.0)])),
            (GridId(1), row_with(&[("tstep", 60.0)])),
        ])
        .unwrap_or_default();

        assert_eq!(left.merge_keep_first(right), 1);
        assert_eq!(left.len(), 2);
        assert_eq!(
            left.value(GridId(0), &ColumnKey::scalar("tstep")).ok(),
            Some(300.0)
        );
        assert_eq!(
            left.value(GridId(1), &ColumnKey::scalar("tstep")).ok(),
            Some(60.0)
        );
        assert!(
            left.columns()
                .contains(&ColumnKey::new("diagnose", IndexDescriptor::Scalar))
        );
    }
}
