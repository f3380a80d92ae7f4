//! Grid identifiers.
//!
//! A grid is one simulation unit and one row of the flat state table. The
//! identifier is opaque: the codec assigns it from a site's position in the
//! configuration and reads it back from the table's row index.

use serde::{Deserialize, Serialize};

/// Row key of the flat state table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GridId(pub u32);

impl GridId {
    /// Build a grid id from a zero-based site position.
    ///
    /// Returns `None` when the position does not fit the id range.
    pub fn from_position(position: usize) -> Option<Self> {
        u32::try_from(position).ok().map(Self)
    }

    /// Return the inner integer value.
    pub const fn into_inner(self) -> u32 {
        self.0
    }

    /// The id as a flat-table cell value.
    pub fn as_cell(self) -> f64 {
        f64::from(self.0)
    }
}

impl Default for GridId {
    fn default() -> Self {
        Self(1)
    }
}

impl core::fmt::Display for GridId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for GridId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<GridId> for u32 {
    fn from(id: GridId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_position_in_range() {
        assert_eq!(GridId::from_position(0), Some(GridId(0)));
        assert_eq!(GridId::from_position(41), Some(GridId(41)));
    }

    #[test]
    fn default_matches_single_site_id() {
        assert_eq!(GridId::default().into_inner(), 1);
    }

    #[test]
    fn serializes_as_bare_integer() {
        let json = serde_json::to_string(&GridId(7)).ok();
        assert_eq!(json.as_deref(), Some("7"));
        let restored: Result<GridId, _> = serde_json::from_str("7");
        assert_eq!(restored.ok(), Some(GridId(7)));
    }

    #[test]
    fn display_is_the_number() {
        assert_eq!(GridId(12).to_string(), "12");
    }
}
