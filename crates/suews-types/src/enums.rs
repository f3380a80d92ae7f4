//! Canonical enumerations of the flat-table index space.
//!
//! The integer position of each variant is part of the column-addressing
//! contract with the numerical model and must never be reordered.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Surface types
// ---------------------------------------------------------------------------

/// One of the seven land-cover kinds of a SUEWS grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceType {
    /// Paved surfaces (roads, pavements, car parks).
    Paved,
    /// Buildings.
    Bldgs,
    /// Evergreen trees and shrubs.
    Evetr,
    /// Deciduous trees and shrubs.
    Dectr,
    /// Grass.
    Grass,
    /// Bare soil.
    Bsoil,
    /// Open water.
    Water,
}

impl SurfaceType {
    /// All surface types in index order.
    pub const ALL: [Self; 7] = [
        Self::Paved,
        Self::Bldgs,
        Self::Evetr,
        Self::Dectr,
        Self::Grass,
        Self::Bsoil,
        Self::Water,
    ];

    /// Position of the surface in every per-surface array.
    pub const fn index(self) -> usize {
        match self {
            Self::Paved => 0,
            Self::Bldgs => 1,
            Self::Evetr => 2,
            Self::Dectr => 3,
            Self::Grass => 4,
            Self::Bsoil => 5,
            Self::Water => 6,
        }
    }

    /// Surface type at a given index, if any.
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Paved),
            1 => Some(Self::Bldgs),
            2 => Some(Self::Evetr),
            3 => Some(Self::Dectr),
            4 => Some(Self::Grass),
            5 => Some(Self::Bsoil),
            6 => Some(Self::Water),
            _ => None,
        }
    }

    /// Short name used in column names such as `irrfracpaved`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Paved => "paved",
            Self::Bldgs => "bldgs",
            Self::Evetr => "evetr",
            Self::Dectr => "dectr",
            Self::Grass => "grass",
            Self::Bsoil => "bsoil",
            Self::Water => "water",
        }
    }

    /// Whether the surface carries vegetation parameters.
    pub const fn is_vegetated(self) -> bool {
        matches!(self, Self::Evetr | Self::Dectr | Self::Grass)
    }
}

impl core::fmt::Display for SurfaceType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// The three vegetated surfaces, indexed from zero.
///
/// Vegetation-specific arrays (LAI, biogenic CO2, water use) are sized three
/// and use `surface index - 2` as their position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VegetationType {
    /// Evergreen trees and shrubs.
    Evetr,
    /// Deciduous trees and shrubs.
    Dectr,
    /// Grass.
    Grass,
}

impl VegetationType {
    /// All vegetation types in index order.
    pub const ALL: [Self; 3] = [Self::Evetr, Self::Dectr, Self::Grass];

    /// Position in vegetation-indexed arrays.
    pub const fn index(self) -> usize {
        match self {
            Self::Evetr => 0,
            Self::Dectr => 1,
            Self::Grass => 2,
        }
    }

    /// The corresponding surface type.
    pub const fn surface(self) -> SurfaceType {
        match self {
            Self::Evetr => SurfaceType::Evetr,
            Self::Dectr => SurfaceType::Dectr,
            Self::Grass => SurfaceType::Grass,
        }
    }

    /// Vegetation type of a surface, or `None` for non-vegetated surfaces.
    pub const fn from_surface(surface: SurfaceType) -> Option<Self> {
        match surface {
            SurfaceType::Evetr => Some(Self::Evetr),
            SurfaceType::Dectr => Some(Self::Dectr),
            SurfaceType::Grass => Some(Self::Grass),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Temporal indices
// ---------------------------------------------------------------------------

/// Day type of day-type and hourly profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayType {
    /// Working day.
    WorkingDay,
    /// Weekend or holiday.
    Holiday,
}

impl DayType {
    /// Both day types in index order.
    pub const ALL: [Self; 2] = [Self::WorkingDay, Self::Holiday];

    /// Position in day-type indexed arrays.
    pub const fn index(self) -> usize {
        match self {
            Self::WorkingDay => 0,
            Self::Holiday => 1,
        }
    }
}

impl core::fmt::Display for DayType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::WorkingDay => f.write_str("working_day"),
            Self::Holiday => f.write_str("holiday"),
        }
    }
}

/// Season and wetness combination of the OHM coefficient table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    /// Summer, dry surface.
    SummerDry,
    /// Summer, wet surface.
    SummerWet,
    /// Winter, dry surface.
    WinterDry,
    /// Winter, wet surface.
    WinterWet,
}

impl Season {
    /// All combinations in index order.
    pub const ALL: [Self; 4] = [
        Self::SummerDry,
        Self::SummerWet,
        Self::WinterDry,
        Self::WinterWet,
    ];

    /// Position in the OHM season axis.
    pub const fn index(self) -> usize {
        match self {
            Self::SummerDry => 0,
            Self::SummerWet => 1,
            Self::WinterDry => 2,
            Self::WinterWet => 3,
        }
    }
}

// ---------------------------------------------------------------------------
// Facets
// ---------------------------------------------------------------------------

/// What a thermal-layer stack or initial state belongs to.
///
/// Selects the column-name suffix: land-cover surfaces use `surf`, building
/// layers use `roof` or `wall`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facet {
    /// A land-cover surface, indexed by surface type.
    Surface,
    /// A roof layer, indexed by vertical layer.
    Roof,
    /// A wall layer, indexed by vertical layer.
    Wall,
}

impl Facet {
    /// Column-name suffix for this facet.
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Surface => "surf",
            Self::Roof => "roof",
            Self::Wall => "wall",
        }
    }
}

impl core::fmt::Display for Facet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Surface => f.write_str("surface"),
            Self::Roof => f.write_str("roof"),
            Self::Wall => f.write_str("wall"),
        }
    }
}
