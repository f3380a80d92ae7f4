//! Leaf area index phenology of the vegetated surfaces.

use serde::{Deserialize, Serialize};

use suews_state::{IndexDescriptor, StateRow};
use suews_types::{Param, VegetationType};

use crate::codec::{check_order, Validate};
use crate::ConfigError;

const POWER_COLUMN: &str = "laipower";

/// Exponents of the growth and senescence equations.
///
/// Stored as `("laipower", "(i, v)")` in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaiPowerCoefficients {
    /// Power of LAI in the growth equation.
    pub growth_lai: Param<f64>,
    /// Power of growing degree days in the growth equation.
    pub growth_gdd: Param<f64>,
    /// Power of LAI in the senescence equation.
    pub senescence_lai: Param<f64>,
    /// Power of senescence degree days in the senescence equation.
    pub senescence_sdd: Param<f64>,
}

impl Default for LaiPowerCoefficients {
    fn default() -> Self {
        Self {
            growth_lai: Param::new(0.1),
            growth_gdd: Param::new(0.1),
            senescence_lai: Param::new(0.1),
            senescence_sdd: Param::new(0.1),
        }
    }
}

impl LaiPowerCoefficients {
    /// The four coefficients in table order.
    pub const fn values(&self) -> [f64; 4] {
        [
            self.growth_lai.value,
            self.growth_gdd.value,
            self.senescence_lai.value,
            self.senescence_sdd.value,
        ]
    }

    /// Write the four cells of `vegetation`.
    pub fn to_state(&self, vegetation: VegetationType) -> StateRow {
        let mut row = StateRow::new();
        row.push_all(POWER_COLUMN, &self.values(), |i| {
            IndexDescriptor::pair(i, vegetation.index())
        });
        row
    }

    /// Read the cells written by [`LaiPowerCoefficients::to_state`].
    pub fn from_state(row: &StateRow, vegetation: VegetationType) -> Result<Self, ConfigError> {
        let [growth_lai, growth_gdd, senescence_lai, senescence_sdd]: [f64; 4] = row
            .read_array(POWER_COLUMN, |i| {
                IndexDescriptor::pair(i, vegetation.index())
            })?;
        Ok(Self {
            growth_lai: Param::new(growth_lai),
            growth_gdd: Param::new(growth_gdd),
            senescence_lai: Param::new(senescence_lai),
            senescence_sdd: Param::new(senescence_sdd),
        })
    }
}

/// Degree-day thresholds and LAI bounds of one vegetation type.
///
/// Scalars are stored at `(name, "(v,)")`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaiParams {
    /// Base temperature for growing degree days [degC].
    pub baset: Param<f64>,
    /// Growing degree days needed for full LAI [degC].
    pub gddfull: Param<f64>,
    /// Base temperature for senescence degree days [degC].
    pub basete: Param<f64>,
    /// Senescence degree days needed to start leaf off [degC].
    pub sddfull: Param<f64>,
    /// Leaf-off wintertime LAI [m2 m-2].
    pub laimin: Param<f64>,
    /// Full leaf-on summertime LAI [m2 m-2].
    pub laimax: Param<f64>,
    /// Growth and senescence exponents.
    pub laipower: LaiPowerCoefficients,
    /// LAI scheme: 0 original, 1 high latitude.
    pub laitype: Param<i32>,
}

impl Default for LaiParams {
    fn default() -> Self {
        Self {
            baset: Param::new(10.0),
            gddfull: Param::new(100.0),
            basete: Param::new(10.0),
            sddfull: Param::new(100.0),
            laimin: Param::new(0.1),
            laimax: Param::new(10.0),
            laipower: LaiPowerCoefficients::default(),
            laitype: Param::new(0),
        }
    }
}

impl Validate for LaiParams {
    fn validate(&self) -> Result<(), ConfigError> {
        check_order(("laimin", self.laimin.value), ("laimax", self.laimax.value), false)?;
        check_order(("baset", self.baset.value), ("gddfull", self.gddfull.value), true)
    }
}

impl LaiParams {
    /// Write the scalars and power coefficients of `vegetation`.
    pub fn to_state(&self, vegetation: VegetationType) -> StateRow {
        let at = IndexDescriptor::vegetation(vegetation);
        let mut row = StateRow::new();
        row.push("baset", at, self.baset.value);
        row.push("gddfull", at, self.gddfull.value);
        row.push("basete", at, self.basete.value);
        row.push("sddfull", at, self.sddfull.value);
        row.push("laimin", at, self.laimin.value);
        row.push("laimax", at, self.laimax.value);
        row.push("laitype", at, self.laitype.value);
        row.merge_keep_first(self.laipower.to_state(vegetation));
        row
    }

    /// Read the cells written by [`LaiParams::to_state`].
    pub fn from_state(row: &StateRow, vegetation: VegetationType) -> Result<Self, ConfigError> {
        let at = IndexDescriptor::vegetation(vegetation);
        Ok(Self {
            baset: Param::new(row.read("baset", at)?),
            gddfull: Param::new(row.read("gddfull", at)?),
            basete: Param::new(row.read("basete", at)?),
            sddfull: Param::new(row.read("sddfull", at)?),
            laimin: Param::new(row.read("laimin", at)?),
            laimax: Param::new(row.read("laimax", at)?),
            laipower: LaiPowerCoefficients::from_state(row, vegetation)?,
            laitype: Param::new(row.read("laitype", at)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_coefficients_use_vegetation_index() {
        let row = LaiPowerCoefficients::default().to_state(VegetationType::Grass);
        assert!(row.contains("laipower", IndexDescriptor::Pair(3, 2)));
        assert!(!row.contains("laipower", IndexDescriptor::Pair(3, 4)));
    }

    #[test]
    fn decode_restores_values() {
        let lai = LaiParams {
            laimax: Param::new(5.5),
            laitype: Param::new(1),
            laipower: LaiPowerCoefficients {
                senescence_sdd: Param::new(0.0015),
                ..LaiPowerCoefficients::default()
            },
            ..LaiParams::default()
        };
        let row = lai.to_state(VegetationType::Dectr);
        assert_eq!(row.len(), 11);
        assert_eq!(LaiParams::from_state(&row, VegetationType::Dectr).ok(), Some(lai));
    }

    #[test]
    fn lai_bounds_may_coincide() {
        let lai = LaiParams {
            laimin: Param::new(4.0),
            laimax: Param::new(4.0),
            ..LaiParams::default()
        };
        assert!(lai.validate().is_ok());
    }

    #[test]
    fn base_temperature_must_stay_below_full_growth() {
        let lai = LaiParams {
            baset: Param::new(100.0),
            ..LaiParams::default()
        };
        assert!(matches!(
            lai.validate(),
            Err(ConfigError::InvalidOrdering { lower: "baset", .. })
        ));
    }
}
