//! Land-cover surfaces.
//!
//! Every surface embeds the same [`SurfaceProperties`] base and adds the
//! fields of its kind. The seven concrete types fix their position in the
//! index table through [`Surface::SURFACE`], so encoding or decoding a
//! surface never depends on where it sits in a document or a table.
//!
//! [`SurfaceKind`] borrows any of the seven for uniform handling, and
//! [`LandCover`] holds exactly one of each.

mod nonveg;
mod veg;

pub use nonveg::{BldgsProperties, BsoilProperties, PavedProperties, WaterProperties};
pub use veg::{DectrProperties, EvetrProperties, GrassProperties, VegetatedProperties};

use serde::{Deserialize, Serialize};

use suews_state::{IndexDescriptor, StateRow};
use suews_types::{Facet, Param, SurfaceType};

use crate::codec::{check_fraction, StateBlock, Validate};
use crate::drainage::StorageDrainParams;
use crate::ohm::{OhmSeasonCoefficients, OHM_PADDING_SURFACE};
use crate::thermal::ThermalLayers;
use crate::ConfigError;

/// A land-cover surface with a fixed index.
pub trait Surface: StateBlock {
    /// Position of this surface in every per-surface array.
    const SURFACE: SurfaceType;

    /// The shared base fields.
    fn base(&self) -> &SurfaceProperties;
}

// ---------------------------------------------------------------------------
// Shared base
// ---------------------------------------------------------------------------

/// Fields common to all seven surfaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceProperties {
    /// Plan-area fraction of the grid.
    pub sfr: Param<f64>,
    /// Emissivity.
    pub emis: Param<f64>,
    /// Bulk transfer coefficient of the AnOHM scheme.
    pub chanohm: Param<f64>,
    /// Volumetric heat capacity of the AnOHM scheme [J m-3 K-1].
    pub cpanohm: Param<f64>,
    /// Thermal conductivity of the AnOHM scheme [W m-1 K-1].
    pub kkanohm: Param<f64>,
    /// Summer/winter temperature threshold of the OHM coefficients [degC].
    pub ohm_threshsw: Param<f64>,
    /// Wet/dry soil moisture threshold of the OHM coefficients.
    pub ohm_threshwd: Param<f64>,
    /// OHM coefficients.
    pub ohm_coef: OhmSeasonCoefficients,
    /// Depth of the soil store [mm].
    pub soildepth: Param<f64>,
    /// Capacity of the soil store [mm].
    pub soilstorecap: Param<f64>,
    /// Surface water depth above which runoff starts [mm].
    pub statelimit: Param<f64>,
    /// Surface wetness threshold for evaporation.
    pub wetthresh: Param<f64>,
    /// Saturated hydraulic conductivity of the soil [mm s-1].
    pub sathydraulicconduct: Param<f64>,
    /// Storage capacity and drainage.
    pub storedrainprm: StorageDrainParams,
    /// Snow water equivalent above which snow is removed [mm].
    pub snowpacklimit: Param<f64>,
    /// Thermal layers below the surface.
    pub thermal_layers: ThermalLayers,
    /// Irrigated fraction of the surface.
    pub irrfrac: Param<f64>,
}

impl Default for SurfaceProperties {
    fn default() -> Self {
        Self {
            sfr: Param::new(1.0 / 7.0),
            emis: Param::new(0.95),
            chanohm: Param::new(0.0),
            cpanohm: Param::new(1200.0),
            kkanohm: Param::new(0.4),
            ohm_threshsw: Param::new(0.0),
            ohm_threshwd: Param::new(0.0),
            ohm_coef: OhmSeasonCoefficients::default(),
            soildepth: Param::new(0.15),
            soilstorecap: Param::new(150.0),
            statelimit: Param::new(10.0),
            wetthresh: Param::new(0.5),
            sathydraulicconduct: Param::new(0.0001),
            storedrainprm: StorageDrainParams::default(),
            snowpacklimit: Param::new(10.0),
            thermal_layers: ThermalLayers::default(),
            irrfrac: Param::new(0.0),
        }
    }
}

impl SurfaceProperties {
    /// Check the base fields of `surface`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::OutOfRange`] when the fraction or emissivity leaves
    /// `[0, 1]` or a storage capacity is negative.
    pub fn validate(&self, surface: SurfaceType) -> Result<(), ConfigError> {
        check_fraction(&format!("{surface}.sfr"), self.sfr.value)?;
        check_fraction(&format!("{surface}.emis"), self.emis.value)?;
        self.storedrainprm.validate()
    }

    /// Write the base columns of `surface`.
    ///
    /// Scalars sit at `"(s,)"`; `sfr`, `soilstorecap`, `statelimit` and
    /// `wetthresh` take a `_surf` suffix and the irrigated fraction is
    /// `irrfrac{name}` at `"0"`. The OHM thresholds are also written as zero
    /// at the padding surface.
    pub fn to_state(&self, surface: SurfaceType) -> StateRow {
        let at = IndexDescriptor::surface(surface);
        let mut row = StateRow::new();
        for (name, value) in self.scalars() {
            row.push(name, at, value);
        }
        row.scalar(&irrfrac_column(surface), self.irrfrac.value);

        row.merge_keep_first(self.ohm_coef.to_state(surface.index()));
        row.merge_keep_first(self.storedrainprm.to_state(surface));
        row.merge_keep_first(self.thermal_layers.to_state(Facet::Surface, surface.index()));

        let padding = IndexDescriptor::layer(OHM_PADDING_SURFACE);
        row.push("ohm_threshsw", padding, 0.0);
        row.push("ohm_threshwd", padding, 0.0);
        row
    }

    /// Read the base columns of `surface`.
    pub fn from_state(row: &StateRow, surface: SurfaceType) -> Result<Self, ConfigError> {
        let at = IndexDescriptor::surface(surface);
        let read = |name: &str| -> Result<Param<f64>, ConfigError> {
            Ok(Param::new(row.read(name, at)?))
        };
        Ok(Self {
            sfr: read("sfr_surf")?,
            emis: read("emis")?,
            chanohm: read("chanohm")?,
            cpanohm: read("cpanohm")?,
            kkanohm: read("kkanohm")?,
            ohm_threshsw: read("ohm_threshsw")?,
            ohm_threshwd: read("ohm_threshwd")?,
            ohm_coef: OhmSeasonCoefficients::from_state(row, surface.index())?,
            soildepth: read("soildepth")?,
            soilstorecap: read("soilstorecap_surf")?,
            statelimit: read("statelimit_surf")?,
            wetthresh: read("wetthresh_surf")?,
            sathydraulicconduct: read("sathydraulicconduct")?,
            storedrainprm: StorageDrainParams::from_state(row, surface)?,
            snowpacklimit: read("snowpacklimit")?,
            thermal_layers: ThermalLayers::from_state(row, Facet::Surface, surface.index())?,
            irrfrac: Param::new(row.read_scalar(&irrfrac_column(surface))?),
        })
    }

    const fn scalars(&self) -> [(&'static str, f64); 13] {
        [
            ("sfr_surf", self.sfr.value),
            ("emis", self.emis.value),
            ("chanohm", self.chanohm.value),
            ("cpanohm", self.cpanohm.value),
            ("kkanohm", self.kkanohm.value),
            ("ohm_threshsw", self.ohm_threshsw.value),
            ("ohm_threshwd", self.ohm_threshwd.value),
            ("soildepth", self.soildepth.value),
            ("soilstorecap_surf", self.soilstorecap.value),
            ("statelimit_surf", self.statelimit.value),
            ("wetthresh_surf", self.wetthresh.value),
            ("sathydraulicconduct", self.sathydraulicconduct.value),
            ("snowpacklimit", self.snowpacklimit.value),
        ]
    }
}

fn irrfrac_column(surface: SurfaceType) -> String {
    format!("irrfrac{}", surface.name())
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// A borrowed surface of any kind.
#[derive(Debug, Clone, Copy)]
pub enum SurfaceKind<'a> {
    /// Paved surfaces.
    Paved(&'a PavedProperties),
    /// Buildings.
    Bldgs(&'a BldgsProperties),
    /// Evergreen trees.
    Evetr(&'a EvetrProperties),
    /// Deciduous trees.
    Dectr(&'a DectrProperties),
    /// Grass.
    Grass(&'a GrassProperties),
    /// Bare soil.
    Bsoil(&'a BsoilProperties),
    /// Open water.
    Water(&'a WaterProperties),
}

impl<'a> SurfaceKind<'a> {
    /// The surface type of the borrowed surface.
    pub const fn surface_type(self) -> SurfaceType {
        match self {
            Self::Paved(_) => PavedProperties::SURFACE,
            Self::Bldgs(_) => BldgsProperties::SURFACE,
            Self::Evetr(_) => EvetrProperties::SURFACE,
            Self::Dectr(_) => DectrProperties::SURFACE,
            Self::Grass(_) => GrassProperties::SURFACE,
            Self::Bsoil(_) => BsoilProperties::SURFACE,
            Self::Water(_) => WaterProperties::SURFACE,
        }
    }

    /// The shared base fields.
    pub fn base(self) -> &'a SurfaceProperties {
        match self {
            Self::Paved(s) => s.base(),
            Self::Bldgs(s) => s.base(),
            Self::Evetr(s) => s.base(),
            Self::Dectr(s) => s.base(),
            Self::Grass(s) => s.base(),
            Self::Bsoil(s) => s.base(),
            Self::Water(s) => s.base(),
        }
    }

    /// Validate the borrowed surface.
    ///
    /// # Errors
    ///
    /// The surface's first violated invariant.
    pub fn validate(self) -> Result<(), ConfigError> {
        match self {
            Self::Paved(s) => s.validate(),
            Self::Bldgs(s) => s.validate(),
            Self::Evetr(s) => s.validate(),
            Self::Dectr(s) => s.validate(),
            Self::Grass(s) => s.validate(),
            Self::Bsoil(s) => s.validate(),
            Self::Water(s) => s.validate(),
        }
    }

    /// Encode the borrowed surface.
    pub fn to_state(self) -> StateRow {
        match self {
            Self::Paved(s) => s.to_state(),
            Self::Bldgs(s) => s.to_state(),
            Self::Evetr(s) => s.to_state(),
            Self::Dectr(s) => s.to_state(),
            Self::Grass(s) => s.to_state(),
            Self::Bsoil(s) => s.to_state(),
            Self::Water(s) => s.to_state(),
        }
    }
}

// ---------------------------------------------------------------------------
// Land cover
// ---------------------------------------------------------------------------

/// One of each surface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandCover {
    /// Paved surfaces.
    pub paved: PavedProperties,
    /// Buildings.
    pub bldgs: BldgsProperties,
    /// Evergreen trees.
    pub evetr: EvetrProperties,
    /// Deciduous trees.
    pub dectr: DectrProperties,
    /// Grass.
    pub grass: GrassProperties,
    /// Bare soil.
    pub bsoil: BsoilProperties,
    /// Open water.
    pub water: WaterProperties,
}

impl LandCover {
    /// The seven surfaces in index order.
    pub const fn surfaces(&self) -> [SurfaceKind<'_>; 7] {
        [
            SurfaceKind::Paved(&self.paved),
            SurfaceKind::Bldgs(&self.bldgs),
            SurfaceKind::Evetr(&self.evetr),
            SurfaceKind::Dectr(&self.dectr),
            SurfaceKind::Grass(&self.grass),
            SurfaceKind::Bsoil(&self.bsoil),
            SurfaceKind::Water(&self.water),
        ]
    }

    /// Sum of the seven surface fractions.
    pub fn total_fraction(&self) -> f64 {
        self.surfaces().iter().map(|s| s.base().sfr.value).sum()
    }
}

impl Validate for LandCover {
    fn validate(&self) -> Result<(), ConfigError> {
        self.surfaces().into_iter().try_for_each(SurfaceKind::validate)
    }
}

impl StateBlock for LandCover {
    fn to_state(&self) -> StateRow {
        let mut row = StateRow::new();
        for surface in self.surfaces() {
            row.merge_keep_first(surface.to_state());
        }
        row
    }

    fn decode(row: &StateRow) -> Result<Self, ConfigError> {
        Ok(Self {
            paved: PavedProperties::decode(row)?,
            bldgs: BldgsProperties::decode(row)?,
            evetr: EvetrProperties::decode(row)?,
            dectr: DectrProperties::decode(row)?,
            grass: GrassProperties::decode(row)?,
            bsoil: BsoilProperties::decode(row)?,
            water: WaterProperties::decode(row)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_columns_use_surface_index() {
        let row = SurfaceProperties::default().to_state(SurfaceType::Bsoil);
        assert!(row.contains("sfr_surf", IndexDescriptor::Single(5)));
        assert!(row.contains("soilstorecap_surf", IndexDescriptor::Single(5)));
        assert!(row.contains("emis", IndexDescriptor::Single(5)));
        assert!(row.contains("irrfracbsoil", IndexDescriptor::Scalar));
        assert!(row.contains("ohm_threshsw", IndexDescriptor::Single(7)));
        assert!(row.contains("dz_surf", IndexDescriptor::Pair(5, 4)));
    }

    #[test]
    fn base_decode_restores_values() {
        let base = SurfaceProperties {
            sfr: Param::new(0.3),
            soildepth: Param::new(0.35),
            irrfrac: Param::new(0.2),
            ..SurfaceProperties::default()
        };
        let row = base.to_state(SurfaceType::Paved);
        assert_eq!(
            SurfaceProperties::from_state(&row, SurfaceType::Paved).ok(),
            Some(base)
        );
    }

    #[test]
    fn fraction_outside_unit_interval_names_the_surface() {
        let base = SurfaceProperties {
            sfr: Param::new(1.2),
            ..SurfaceProperties::default()
        };
        let err = base.validate(SurfaceType::Grass).err();
        assert_eq!(
            err.map(|e| e.to_string()).as_deref(),
            Some("grass.sfr = 1.2 must be within [0, 1]")
        );
    }

    #[test]
    fn kinds_report_their_fixed_surface() {
        let cover = LandCover::default();
        let order: Vec<SurfaceType> = cover
            .surfaces()
            .into_iter()
            .map(SurfaceKind::surface_type)
            .collect();
        assert_eq!(order, SurfaceType::ALL.to_vec());
    }

    #[test]
    fn default_fractions_cover_the_grid() {
        assert!((LandCover::default().total_fraction() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn land_cover_round_trips() {
        let mut cover = LandCover::default();
        cover.bldgs.base.sfr = Param::new(0.4);
        cover.grass.base.sfr = Param::new(0.1);
        let row = cover.to_state();
        assert_eq!(LandCover::from_state(&row).ok(), Some(cover));
    }
}
