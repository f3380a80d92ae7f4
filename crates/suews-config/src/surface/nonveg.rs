//! Paved, building, bare-soil and water surfaces.

use serde::{Deserialize, Serialize};

use suews_state::{IndexDescriptor, StateRow};
use suews_types::{Param, SurfaceType};

use super::{Surface, SurfaceProperties};
use crate::codec::{check_at_least, check_fraction, StateBlock, Validate};
use crate::water::WaterDistribution;
use crate::ConfigError;

/// Plan-area fraction below which the building frontal area index is
/// bounded from below.
const SFR_BLDG_LOWER_LIMIT: f64 = 0.18;

/// Albedo of a non-vegetated surface, stored at `("alb", "(s,)")`.
fn write_albedo(row: &mut StateRow, surface: SurfaceType, alb: &Param<f64>) {
    row.push("alb", IndexDescriptor::surface(surface), alb.value);
}

fn read_albedo(row: &StateRow, surface: SurfaceType) -> Result<Param<f64>, ConfigError> {
    Ok(Param::new(row.read("alb", IndexDescriptor::surface(surface))?))
}

fn check_albedo(surface: SurfaceType, alb: &Param<f64>) -> Result<(), ConfigError> {
    check_fraction(&format!("{surface}.alb"), alb.value)
}

// ---------------------------------------------------------------------------
// Paved
// ---------------------------------------------------------------------------

/// Roads, pavements and car parks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PavedProperties {
    /// Shared surface fields.
    #[serde(flatten)]
    pub base: SurfaceProperties,
    /// Albedo.
    pub alb: Param<f64>,
    /// Where water leaving the surface goes.
    pub waterdist: WaterDistribution,
}

impl Default for PavedProperties {
    fn default() -> Self {
        Self {
            base: SurfaceProperties::default(),
            alb: Param::new(0.1),
            waterdist: WaterDistribution::defaults_for(Self::SURFACE),
        }
    }
}

impl Surface for PavedProperties {
    const SURFACE: SurfaceType = SurfaceType::Paved;

    fn base(&self) -> &SurfaceProperties {
        &self.base
    }
}

impl Validate for PavedProperties {
    fn validate(&self) -> Result<(), ConfigError> {
        self.base.validate(Self::SURFACE)?;
        check_albedo(Self::SURFACE, &self.alb)?;
        self.waterdist.validate(Self::SURFACE)
    }
}

impl StateBlock for PavedProperties {
    fn to_state(&self) -> StateRow {
        let mut row = self.base.to_state(Self::SURFACE);
        write_albedo(&mut row, Self::SURFACE, &self.alb);
        row.merge_keep_first(self.waterdist.to_state(Self::SURFACE));
        row
    }

    fn decode(row: &StateRow) -> Result<Self, ConfigError> {
        Ok(Self {
            base: SurfaceProperties::from_state(row, Self::SURFACE)?,
            alb: read_albedo(row, Self::SURFACE)?,
            waterdist: WaterDistribution::from_state(row, Self::SURFACE)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Buildings
// ---------------------------------------------------------------------------

/// Buildings, seen from above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BldgsProperties {
    /// Shared surface fields.
    #[serde(flatten)]
    pub base: SurfaceProperties,
    /// Albedo.
    pub alb: Param<f64>,
    /// Frontal area index of buildings.
    pub faibldg: Param<f64>,
    /// Mean building height [m].
    pub bldgh: Param<f64>,
    /// Where water leaving the surface goes.
    pub waterdist: WaterDistribution,
}

impl Default for BldgsProperties {
    fn default() -> Self {
        Self {
            base: SurfaceProperties::default(),
            alb: Param::new(0.1),
            faibldg: Param::new(0.3),
            bldgh: Param::new(10.0),
            waterdist: WaterDistribution::defaults_for(Self::SURFACE),
        }
    }
}

impl Surface for BldgsProperties {
    const SURFACE: SurfaceType = SurfaceType::Bldgs;

    fn base(&self) -> &SurfaceProperties {
        &self.base
    }
}

impl Validate for BldgsProperties {
    /// On top of the ranges, a sparse building cover needs a frontal area
    /// index of at least `0.25 * (1 - sfr)` for the roughness sublayer to
    /// keep a positive displacement height.
    fn validate(&self) -> Result<(), ConfigError> {
        self.base.validate(Self::SURFACE)?;
        check_albedo(Self::SURFACE, &self.alb)?;
        check_at_least("bldgs.faibldg", self.faibldg.value, 0.0, "non-negative")?;
        check_at_least("bldgs.bldgh", self.bldgh.value, 3.0, "at least 3 m")?;

        let sfr = self.base.sfr.value;
        let minimum = 0.25 * (1.0 - sfr);
        if sfr < SFR_BLDG_LOWER_LIMIT && self.faibldg.value < minimum {
            return Err(ConfigError::FrontalAreaTooLow {
                sfr,
                faibldg: self.faibldg.value,
                minimum,
            });
        }
        self.waterdist.validate(Self::SURFACE)
    }
}

impl StateBlock for BldgsProperties {
    fn to_state(&self) -> StateRow {
        let mut row = self.base.to_state(Self::SURFACE);
        write_albedo(&mut row, Self::SURFACE, &self.alb);
        row.merge_keep_first(self.waterdist.to_state(Self::SURFACE));
        row.scalar("faibldg", self.faibldg.value);
        row.scalar("bldgh", self.bldgh.value);
        row
    }

    fn decode(row: &StateRow) -> Result<Self, ConfigError> {
        Ok(Self {
            base: SurfaceProperties::from_state(row, Self::SURFACE)?,
            alb: read_albedo(row, Self::SURFACE)?,
            faibldg: Param::new(row.read_scalar("faibldg")?),
            bldgh: Param::new(row.read_scalar("bldgh")?),
            waterdist: WaterDistribution::from_state(row, Self::SURFACE)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Bare soil
// ---------------------------------------------------------------------------

/// Bare soil.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BsoilProperties {
    /// Shared surface fields.
    #[serde(flatten)]
    pub base: SurfaceProperties,
    /// Albedo.
    pub alb: Param<f64>,
    /// Where water leaving the surface goes.
    pub waterdist: WaterDistribution,
}

impl Default for BsoilProperties {
    fn default() -> Self {
        Self {
            base: SurfaceProperties::default(),
            alb: Param::new(0.1),
            waterdist: WaterDistribution::defaults_for(Self::SURFACE),
        }
    }
}

impl Surface for BsoilProperties {
    const SURFACE: SurfaceType = SurfaceType::Bsoil;

    fn base(&self) -> &SurfaceProperties {
        &self.base
    }
}

impl Validate for BsoilProperties {
    fn validate(&self) -> Result<(), ConfigError> {
        self.base.validate(Self::SURFACE)?;
        check_albedo(Self::SURFACE, &self.alb)?;
        self.waterdist.validate(Self::SURFACE)
    }
}

impl StateBlock for BsoilProperties {
    fn to_state(&self) -> StateRow {
        let mut row = self.base.to_state(Self::SURFACE);
        write_albedo(&mut row, Self::SURFACE, &self.alb);
        row.merge_keep_first(self.waterdist.to_state(Self::SURFACE));
        row
    }

    fn decode(row: &StateRow) -> Result<Self, ConfigError> {
        Ok(Self {
            base: SurfaceProperties::from_state(row, Self::SURFACE)?,
            alb: read_albedo(row, Self::SURFACE)?,
            waterdist: WaterDistribution::from_state(row, Self::SURFACE)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Water
// ---------------------------------------------------------------------------

/// Open water. Never redistributes its water.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterProperties {
    /// Shared surface fields.
    #[serde(flatten)]
    pub base: SurfaceProperties,
    /// Albedo.
    pub alb: Param<f64>,
    /// Change in water flow for water bodies [mm h-1].
    pub flowchange: Param<f64>,
    /// Must stay unset; present only so a document declaring one is
    /// rejected rather than silently ignored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waterdist: Option<WaterDistribution>,
}

impl Default for WaterProperties {
    fn default() -> Self {
        Self {
            base: SurfaceProperties::default(),
            alb: Param::new(0.1),
            flowchange: Param::new(0.0),
            waterdist: None,
        }
    }
}

impl Surface for WaterProperties {
    const SURFACE: SurfaceType = SurfaceType::Water;

    fn base(&self) -> &SurfaceProperties {
        &self.base
    }
}

impl Validate for WaterProperties {
    fn validate(&self) -> Result<(), ConfigError> {
        self.base.validate(Self::SURFACE)?;
        check_albedo(Self::SURFACE, &self.alb)?;
        if self.waterdist.is_some() {
            return Err(ConfigError::DistributionNotApplicable {
                surface: Self::SURFACE,
            });
        }
        Ok(())
    }
}

impl StateBlock for WaterProperties {
    fn to_state(&self) -> StateRow {
        let mut row = self.base.to_state(Self::SURFACE);
        write_albedo(&mut row, Self::SURFACE, &self.alb);
        row.scalar("flowchange", self.flowchange.value);
        row
    }

    fn decode(row: &StateRow) -> Result<Self, ConfigError> {
        Ok(Self {
            base: SurfaceProperties::from_state(row, Self::SURFACE)?,
            alb: read_albedo(row, Self::SURFACE)?,
            flowchange: Param::new(row.read_scalar("flowchange")?),
            waterdist: None,
        })
    }
}
