//! Evergreen tree, deciduous tree and grass surfaces.

use serde::{Deserialize, Serialize};

use suews_state::{IndexDescriptor, StateRow};
use suews_types::{Param, SurfaceType, VegetationType};

use super::{Surface, SurfaceProperties};
use crate::codec::{check_fraction, check_order, check_within, StateBlock, Validate};
use crate::lai::LaiParams;
use crate::water::WaterDistribution;
use crate::ConfigError;

/// Fields shared by the three vegetated surfaces.
///
/// Albedo bounds are stored as `albmin_{name}`/`albmax_{name}` at `"0"`;
/// the remaining scalars at `"(v,)"` with the vegetation index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VegetatedProperties {
    /// Albedo at minimum LAI.
    pub alb_min: Param<f64>,
    /// Albedo at maximum LAI.
    pub alb_max: Param<f64>,
    /// Light-response coefficient of biogenic CO2 uptake.
    pub beta_bioco2: Param<f64>,
    /// Enhanced light-response coefficient of biogenic CO2 uptake.
    pub beta_enh_bioco2: Param<f64>,
    /// Quantum efficiency of biogenic CO2 uptake.
    pub alpha_bioco2: Param<f64>,
    /// Enhanced quantum efficiency of biogenic CO2 uptake.
    pub alpha_enh_bioco2: Param<f64>,
    /// Respiration coefficient a.
    pub resp_a: Param<f64>,
    /// Respiration coefficient b.
    pub resp_b: Param<f64>,
    /// Curvature of the light-response curve.
    pub theta_bioco2: Param<f64>,
    /// Maximum surface conductance [mm s-1].
    pub maxconductance: Param<f64>,
    /// Minimum respiratory biogenic CO2 flux.
    pub min_res_bioco2: Param<f64>,
    /// Leaf area index phenology.
    pub lai: LaiParams,
    /// Efficiency of automatic irrigation.
    pub ie_a: Param<f64>,
    /// Efficiency of manual irrigation.
    pub ie_m: Param<f64>,
}

impl Default for VegetatedProperties {
    fn default() -> Self {
        Self {
            alb_min: Param::new(0.2),
            alb_max: Param::new(0.3),
            beta_bioco2: Param::new(0.6),
            beta_enh_bioco2: Param::new(0.7),
            alpha_bioco2: Param::new(0.8),
            alpha_enh_bioco2: Param::new(0.9),
            resp_a: Param::new(1.0),
            resp_b: Param::new(1.1),
            theta_bioco2: Param::new(1.2),
            maxconductance: Param::new(0.5),
            min_res_bioco2: Param::new(0.1),
            lai: LaiParams::default(),
            ie_a: Param::new(0.5),
            ie_m: Param::new(0.6),
        }
    }
}

impl VegetatedProperties {
    /// Check albedo bounds and LAI parameters.
    ///
    /// # Errors
    ///
    /// [`ConfigError::OutOfRange`] for an albedo outside `[0, 1]`,
    /// [`ConfigError::InvalidOrdering`] when `alb_min > alb_max` or the LAI
    /// parameters are out of order.
    pub fn validate(&self, vegetation: VegetationType) -> Result<(), ConfigError> {
        let surface = vegetation.surface();
        check_fraction(&format!("{surface}.alb_min"), self.alb_min.value)?;
        check_fraction(&format!("{surface}.alb_max"), self.alb_max.value)?;
        check_order(("alb_min", self.alb_min.value), ("alb_max", self.alb_max.value), false)?;
        self.lai.validate()
    }

    /// Write the vegetation columns of `vegetation`.
    pub fn to_state(&self, vegetation: VegetationType) -> StateRow {
        let at = IndexDescriptor::vegetation(vegetation);
        let mut row = StateRow::new();
        for (name, value) in self.scalars() {
            row.push(name, at, value);
        }
        let (albmin, albmax) = albedo_columns(vegetation);
        row.scalar(&albmin, self.alb_min.value);
        row.scalar(&albmax, self.alb_max.value);
        row.merge_keep_first(self.lai.to_state(vegetation));
        row
    }

    /// Read the columns written by [`VegetatedProperties::to_state`].
    pub fn from_state(row: &StateRow, vegetation: VegetationType) -> Result<Self, ConfigError> {
        let at = IndexDescriptor::vegetation(vegetation);
        let read = |name: &str| -> Result<Param<f64>, ConfigError> {
            Ok(Param::new(row.read(name, at)?))
        };
        let (albmin, albmax) = albedo_columns(vegetation);
        Ok(Self {
            alb_min: Param::new(row.read_scalar(&albmin)?),
            alb_max: Param::new(row.read_scalar(&albmax)?),
            beta_bioco2: read("beta_bioco2")?,
            beta_enh_bioco2: read("beta_enh_bioco2")?,
            alpha_bioco2: read("alpha_bioco2")?,
            alpha_enh_bioco2: read("alpha_enh_bioco2")?,
            resp_a: read("resp_a")?,
            resp_b: read("resp_b")?,
            theta_bioco2: read("theta_bioco2")?,
            maxconductance: read("maxconductance")?,
            min_res_bioco2: read("min_res_bioco2")?,
            lai: LaiParams::from_state(row, vegetation)?,
            ie_a: read("ie_a")?,
            ie_m: read("ie_m")?,
        })
    }

    const fn scalars(&self) -> [(&'static str, f64); 11] {
        [
            ("beta_bioco2", self.beta_bioco2.value),
            ("beta_enh_bioco2", self.beta_enh_bioco2.value),
            ("alpha_bioco2", self.alpha_bioco2.value),
            ("alpha_enh_bioco2", self.alpha_enh_bioco2.value),
            ("resp_a", self.resp_a.value),
            ("resp_b", self.resp_b.value),
            ("theta_bioco2", self.theta_bioco2.value),
            ("maxconductance", self.maxconductance.value),
            ("min_res_bioco2", self.min_res_bioco2.value),
            ("ie_a", self.ie_a.value),
            ("ie_m", self.ie_m.value),
        ]
    }
}

fn albedo_columns(vegetation: VegetationType) -> (String, String) {
    let name = vegetation.surface().name();
    (format!("albmin_{name}"), format!("albmax_{name}"))
}

/// Encode base, vegetation and distribution of one vegetated surface.
fn vegetated_row(
    kind: VegetationType,
    base: &SurfaceProperties,
    vegetation: &VegetatedProperties,
    waterdist: &WaterDistribution,
) -> StateRow {
    let surface = kind.surface();
    let mut row = base.to_state(surface);
    row.merge_keep_first(vegetation.to_state(kind));
    row.merge_keep_first(waterdist.to_state(surface));
    row
}

// ---------------------------------------------------------------------------
// Evergreen trees
// ---------------------------------------------------------------------------

/// Evergreen trees and shrubs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvetrProperties {
    /// Shared surface fields.
    #[serde(flatten)]
    pub base: SurfaceProperties,
    /// Shared vegetation fields.
    #[serde(flatten)]
    pub vegetation: VegetatedProperties,
    /// Frontal area index of evergreen trees.
    pub faievetree: Param<f64>,
    /// Evergreen tree height [m].
    pub evetreeh: Param<f64>,
    /// Where water leaving the surface goes.
    pub waterdist: WaterDistribution,
}

impl Default for EvetrProperties {
    fn default() -> Self {
        Self {
            base: SurfaceProperties::default(),
            vegetation: VegetatedProperties::default(),
            faievetree: Param::new(0.1),
            evetreeh: Param::new(15.0),
            waterdist: WaterDistribution::defaults_for(Self::SURFACE),
        }
    }
}

impl Surface for EvetrProperties {
    const SURFACE: SurfaceType = SurfaceType::Evetr;

    fn base(&self) -> &SurfaceProperties {
        &self.base
    }
}

impl Validate for EvetrProperties {
    fn validate(&self) -> Result<(), ConfigError> {
        self.base.validate(Self::SURFACE)?;
        self.vegetation.validate(VegetationType::Evetr)?;
        self.waterdist.validate(Self::SURFACE)
    }
}

impl StateBlock for EvetrProperties {
    fn to_state(&self) -> StateRow {
        let mut row = vegetated_row(
            VegetationType::Evetr,
            &self.base,
            &self.vegetation,
            &self.waterdist,
        );
        row.scalar("faievetree", self.faievetree.value);
        row.scalar("evetreeh", self.evetreeh.value);
        row
    }

    fn decode(row: &StateRow) -> Result<Self, ConfigError> {
        Ok(Self {
            base: SurfaceProperties::from_state(row, Self::SURFACE)?,
            vegetation: VegetatedProperties::from_state(row, VegetationType::Evetr)?,
            faievetree: Param::new(row.read_scalar("faievetree")?),
            evetreeh: Param::new(row.read_scalar("evetreeh")?),
            waterdist: WaterDistribution::from_state(row, Self::SURFACE)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Deciduous trees
// ---------------------------------------------------------------------------

/// Deciduous trees and shrubs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DectrProperties {
    /// Shared surface fields.
    #[serde(flatten)]
    pub base: SurfaceProperties,
    /// Shared vegetation fields.
    #[serde(flatten)]
    pub vegetation: VegetatedProperties,
    /// Frontal area index of deciduous trees.
    pub faidectree: Param<f64>,
    /// Deciduous tree height [m].
    pub dectreeh: Param<f64>,
    /// Porosity in leaf-on season.
    pub pormin_dec: Param<f64>,
    /// Porosity in leaf-off season.
    pub pormax_dec: Param<f64>,
    /// Maximum water storage capacity [mm].
    pub capmax_dec: Param<f64>,
    /// Minimum water storage capacity [mm].
    pub capmin_dec: Param<f64>,
    /// Where water leaving the surface goes.
    pub waterdist: WaterDistribution,
}

impl Default for DectrProperties {
    fn default() -> Self {
        Self {
            base: SurfaceProperties::default(),
            vegetation: VegetatedProperties::default(),
            faidectree: Param::new(0.1),
            dectreeh: Param::new(15.0),
            pormin_dec: Param::new(0.2),
            pormax_dec: Param::new(0.6),
            capmax_dec: Param::new(100.0),
            capmin_dec: Param::new(10.0),
            waterdist: WaterDistribution::defaults_for(Self::SURFACE),
        }
    }
}

impl Surface for DectrProperties {
    const SURFACE: SurfaceType = SurfaceType::Dectr;

    fn base(&self) -> &SurfaceProperties {
        &self.base
    }
}

impl Validate for DectrProperties {
    fn validate(&self) -> Result<(), ConfigError> {
        self.base.validate(Self::SURFACE)?;
        self.vegetation.validate(VegetationType::Dectr)?;
        check_within("dectr.pormin_dec", self.pormin_dec.value, 0.1, 0.9, "within [0.1, 0.9]")?;
        check_within("dectr.pormax_dec", self.pormax_dec.value, 0.1, 0.9, "within [0.1, 0.9]")?;
        check_order(
            ("pormin_dec", self.pormin_dec.value),
            ("pormax_dec", self.pormax_dec.value),
            true,
        )?;
        self.waterdist.validate(Self::SURFACE)
    }
}

impl StateBlock for DectrProperties {
    fn to_state(&self) -> StateRow {
        let mut row = vegetated_row(
            VegetationType::Dectr,
            &self.base,
            &self.vegetation,
            &self.waterdist,
        );
        row.scalar("faidectree", self.faidectree.value);
        row.scalar("dectreeh", self.dectreeh.value);
        row.scalar("pormin_dec", self.pormin_dec.value);
        row.scalar("pormax_dec", self.pormax_dec.value);
        row.scalar("capmax_dec", self.capmax_dec.value);
        row.scalar("capmin_dec", self.capmin_dec.value);
        row
    }

    fn decode(row: &StateRow) -> Result<Self, ConfigError> {
        Ok(Self {
            base: SurfaceProperties::from_state(row, Self::SURFACE)?,
            vegetation: VegetatedProperties::from_state(row, VegetationType::Dectr)?,
            faidectree: Param::new(row.read_scalar("faidectree")?),
            dectreeh: Param::new(row.read_scalar("dectreeh")?),
            pormin_dec: Param::new(row.read_scalar("pormin_dec")?),
            pormax_dec: Param::new(row.read_scalar("pormax_dec")?),
            capmax_dec: Param::new(row.read_scalar("capmax_dec")?),
            capmin_dec: Param::new(row.read_scalar("capmin_dec")?),
            waterdist: WaterDistribution::from_state(row, Self::SURFACE)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Grass
// ---------------------------------------------------------------------------

/// Grass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrassProperties {
    /// Shared surface fields.
    #[serde(flatten)]
    pub base: SurfaceProperties,
    /// Shared vegetation fields.
    #[serde(flatten)]
    pub vegetation: VegetatedProperties,
    /// Where water leaving the surface goes.
    pub waterdist: WaterDistribution,
}

impl Default for GrassProperties {
    fn default() -> Self {
        Self {
            base: SurfaceProperties::default(),
            vegetation: VegetatedProperties::default(),
            waterdist: WaterDistribution::defaults_for(Self::SURFACE),
        }
    }
}

impl Surface for GrassProperties {
    const SURFACE: SurfaceType = SurfaceType::Grass;

    fn base(&self) -> &SurfaceProperties {
        &self.base
    }
}

impl Validate for GrassProperties {
    fn validate(&self) -> Result<(), ConfigError> {
        self.base.validate(Self::SURFACE)?;
        self.vegetation.validate(VegetationType::Grass)?;
        self.waterdist.validate(Self::SURFACE)
    }
}

impl StateBlock for GrassProperties {
    fn to_state(&self) -> StateRow {
        vegetated_row(VegetationType::Grass, &self.base, &self.vegetation, &self.waterdist)
    }

    fn decode(row: &StateRow) -> Result<Self, ConfigError> {
        Ok(Self {
            base: SurfaceProperties::from_state(row, Self::SURFACE)?,
            vegetation: VegetatedProperties::from_state(row, VegetationType::Grass)?,
            waterdist: WaterDistribution::from_state(row, Self::SURFACE)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vegetation_columns_use_vegetation_index() {
        let row = GrassProperties::default().to_state();
        assert!(row.contains("maxconductance", IndexDescriptor::Single(2)));
        assert!(row.contains("laimax", IndexDescriptor::Single(2)));
        assert!(row.contains("albmin_grass", IndexDescriptor::Scalar));
        assert!(!row.contains("maxconductance", IndexDescriptor::Single(4)));
    }

    #[test]
    fn albedo_bounds_must_be_ordered() {
        let mut evetr = EvetrProperties::default();
        evetr.vegetation.alb_min = Param::new(0.4);
        let err = evetr.validate().err();
        assert_eq!(
            err.map(|e| e.to_string()).as_deref(),
            Some("expected alb_min <= alb_max, got 0.4 and 0.3")
        );
    }

    #[test]
    fn porosity_must_increase_strictly() {
        let dectr = DectrProperties {
            pormin_dec: Param::new(0.5),
            pormax_dec: Param::new(0.5),
            ..DectrProperties::default()
        };
        assert!(matches!(
            dectr.validate(),
            Err(ConfigError::InvalidOrdering {
                lower: "pormin_dec",
                ..
            })
        ));

        let too_open = DectrProperties {
            pormax_dec: Param::new(0.95),
            ..DectrProperties::default()
        };
        assert!(matches!(
            too_open.validate(),
            Err(ConfigError::OutOfRange { .. })
        ));
    }

    #[test]
    fn deciduous_round_trip_keeps_every_field() {
        let mut dectr = DectrProperties {
            capmax_dec: Param::new(0.8),
            capmin_dec: Param::new(0.3),
            ..DectrProperties::default()
        };
        dectr.vegetation.lai.laimax = Param::new(5.0);
        dectr.vegetation.ie_m = Param::new(0.25);
        let row = dectr.to_state();
        assert_eq!(DectrProperties::from_state(&row).ok(), Some(dectr));
    }
}
