//! Error types for the `suews-state` crate.

use suews_types::GridId;

use crate::row::ColumnKey;

/// Errors raised while building or reading a flat state table.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StateError {
    /// A decode step expected a column that the row does not have.
    #[error("missing column {key}")]
    MissingColumn {
        /// The absent column.
        key: ColumnKey,
    },

    /// The table has no row for the requested grid.
    #[error("grid {grid} not present in state table")]
    UnknownGrid {
        /// The requested grid.
        grid: GridId,
    },

    /// A row was inserted for a grid that already has one.
    #[error("grid {grid} already present in state table")]
    DuplicateGrid {
        /// The duplicated grid.
        grid: GridId,
    },

    /// An index descriptor string is not one of the canonical shapes.
    #[error("invalid index descriptor: {raw:?}")]
    InvalidDescriptor {
        /// The rejected text.
        raw: String,
    },

    /// An integer column holds a value that is not a representable integer.
    #[error("column {key} holds {value}, expected an integer")]
    NonIntegral {
        /// The offending column.
        key: ColumnKey,
        /// The stored cell value.
        value: f64,
    },
}
