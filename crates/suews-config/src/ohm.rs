//! Objective Hysteresis Model coefficients.
//!
//! Three coefficients for each of the four season/wetness combinations of a
//! surface. The numerical core sizes its coefficient array for eight
//! surfaces, so every set is also written at surface index 7; those padding
//! cells are emitted on encode and ignored on decode.

use serde::{Deserialize, Serialize};

use suews_state::{IndexDescriptor, StateRow};
use suews_types::{Param, Season};

use crate::ConfigError;

const COLUMN: &str = "ohm_coef";

/// Surface index of the padding copy.
pub const OHM_PADDING_SURFACE: usize = 7;

/// The three OHM coefficients of one season/wetness combination.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OhmCoefficients {
    /// Coefficient of net radiation.
    pub a1: Param<f64>,
    /// Coefficient of the net radiation rate of change [h].
    pub a2: Param<f64>,
    /// Constant term [W m-2].
    pub a3: Param<f64>,
}

impl OhmCoefficients {
    const fn values(&self) -> [f64; 3] {
        [self.a1.value, self.a2.value, self.a3.value]
    }

    fn write(&self, row: &mut StateRow, surface: usize, season: Season) {
        row.push_all(COLUMN, &self.values(), |coefficient| {
            IndexDescriptor::ohm(surface, season, coefficient)
        });
    }

    fn read(row: &StateRow, surface: usize, season: Season) -> Result<Self, ConfigError> {
        let [a1, a2, a3]: [f64; 3] = row.read_array(COLUMN, |coefficient| {
            IndexDescriptor::ohm(surface, season, coefficient)
        })?;
        Ok(Self {
            a1: Param::new(a1),
            a2: Param::new(a2),
            a3: Param::new(a3),
        })
    }
}

/// OHM coefficients for every season/wetness combination.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OhmSeasonCoefficients {
    /// Summer, dry surface.
    pub summer_dry: OhmCoefficients,
    /// Summer, wet surface.
    pub summer_wet: OhmCoefficients,
    /// Winter, dry surface.
    pub winter_dry: OhmCoefficients,
    /// Winter, wet surface.
    pub winter_wet: OhmCoefficients,
}

impl OhmSeasonCoefficients {
    /// Coefficients of one season/wetness combination.
    pub const fn get(&self, season: Season) -> &OhmCoefficients {
        match season {
            Season::SummerDry => &self.summer_dry,
            Season::SummerWet => &self.summer_wet,
            Season::WinterDry => &self.winter_dry,
            Season::WinterWet => &self.winter_wet,
        }
    }

    /// Write `("ohm_coef", "(s, season, a)")` for surface index `surface`
    /// and the padding copy at surface 7.
    pub fn to_state(&self, surface: usize) -> StateRow {
        let mut row = StateRow::new();
        for season in Season::ALL {
            let coefficients = self.get(season);
            coefficients.write(&mut row, surface, season);
            coefficients.write(&mut row, OHM_PADDING_SURFACE, season);
        }
        row
    }

    /// Read the coefficients of surface index `surface`.
    pub fn from_state(row: &StateRow, surface: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            summer_dry: OhmCoefficients::read(row, surface, Season::SummerDry)?,
            summer_wet: OhmCoefficients::read(row, surface, Season::SummerWet)?,
            winter_dry: OhmCoefficients::read(row, surface, Season::WinterDry)?,
            winter_wet: OhmCoefficients::read(row, surface, Season::WinterWet)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> OhmSeasonCoefficients {
        let set = |a1: f64, a2: f64, a3: f64| OhmCoefficients {
            a1: Param::new(a1),
            a2: Param::new(a2),
            a3: Param::new(a3),
        };
        OhmSeasonCoefficients {
            summer_dry: set(0.719, 0.194, -36.6),
            summer_wet: set(0.719, 0.194, -36.6),
            winter_dry: set(0.719, 0.194, -36.6),
            winter_wet: set(0.7, 0.2, -30.0),
        }
    }

    #[test]
    fn writes_primary_and_padding_cells() {
        let row = sample().to_state(1);
        assert_eq!(row.len(), 24);
        assert_eq!(
            row.read::<f64>(COLUMN, IndexDescriptor::Triple(1, 3, 2)).ok(),
            Some(-30.0)
        );
        assert_eq!(
            row.read::<f64>(COLUMN, IndexDescriptor::Triple(7, 3, 2)).ok(),
            Some(-30.0)
        );
    }

    #[test]
    fn padding_surface_does_not_duplicate_itself() {
        assert_eq!(sample().to_state(OHM_PADDING_SURFACE).len(), 12);
    }

    #[test]
    fn decode_reads_primary_cells_only() {
        // padding written first by another surface wins the keep-first merge
        let mut row = OhmSeasonCoefficients::default().to_state(5);
        row.merge_keep_first(sample().to_state(2));
        assert_eq!(
            row.read::<f64>(COLUMN, IndexDescriptor::Triple(7, 0, 0)).ok(),
            Some(0.0)
        );
        assert_eq!(OhmSeasonCoefficients::from_state(&row, 2).ok(), Some(sample()));
    }
}
