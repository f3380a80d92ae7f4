//! Initial model state of every surface and building layer.
//!
//! Land-cover surfaces carry a snow state on top of the moisture and
//! temperature state shared with roof and wall layers. Vegetated surfaces add
//! phenology and water use, deciduous trees add porosity and storage
//! capacity. A block of always-zero running diagnostics is appended so the
//! numerical core finds every state column it expects.

use serde::{Deserialize, Serialize};

use suews_state::{IndexDescriptor, StateRow};
use suews_types::{Facet, Param, SurfaceType, VegetationType};

use crate::codec::{check_at_least, check_fraction, StateBlock, Validate};
use crate::thermal::THERMAL_LAYERS;
use crate::ConfigError;

/// Running diagnostics reset to zero at the start of a run.
const ZEROED_SCALARS: [&str; 11] = [
    "dqndt",
    "dqnsdt",
    "dt_since_start",
    "lenday_id",
    "qn_av",
    "qn_s_av",
    "tair_av",
    "tmax_id",
    "tmin_id",
    "tstep_prev",
    "snowfallcum",
];

/// Length of the heating degree day history.
const HDD_SLOTS: usize = 12;

// ---------------------------------------------------------------------------
// Shared layer state
// ---------------------------------------------------------------------------

/// Moisture and temperature state of a surface, roof or wall.
///
/// Stored as `{p}_{s}` at `"(i,)"`, with the temperature profile at
/// `("temp_{s}", "(i, k)")`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerInitialState {
    /// Surface water state [mm].
    pub state: Param<f64>,
    /// Soil moisture store [mm].
    pub soilstore: Param<f64>,
    /// Temperature of each thermal layer [degC].
    pub temperature: Param<[f64; THERMAL_LAYERS]>,
    /// Exterior surface temperature [degC].
    pub tsfc: Param<f64>,
    /// Interior surface temperature [degC].
    pub tin: Param<f64>,
}

impl Default for LayerInitialState {
    fn default() -> Self {
        Self {
            state: Param::new(0.0),
            soilstore: Param::new(150.0),
            temperature: Param::new([15.0; THERMAL_LAYERS]),
            tsfc: Param::new(15.0),
            tin: Param::new(20.0),
        }
    }
}

impl LayerInitialState {
    /// The water state must be non-negative and the soil store at least
    /// 10 mm.
    pub fn validate(&self, owner: &str) -> Result<(), ConfigError> {
        check_at_least(&format!("{owner}.state"), self.state.value, 0.0, "non-negative")?;
        check_at_least(
            &format!("{owner}.soilstore"),
            self.soilstore.value,
            10.0,
            "at least 10 mm",
        )
    }

    /// Write the state of entry `index` of `facet`.
    pub fn to_state(&self, facet: Facet, index: usize) -> StateRow {
        let suffix = facet.suffix();
        let at = IndexDescriptor::layer(index);
        let mut row = StateRow::new();
        row.push(&format!("state_{suffix}"), at, self.state.value);
        row.push(&format!("soilstore_{suffix}"), at, self.soilstore.value);
        row.push_all(&format!("temp_{suffix}"), &self.temperature.value, |k| {
            IndexDescriptor::layer_component(index, k)
        });
        row.push(&format!("tsfc_{suffix}"), at, self.tsfc.value);
        row.push(&format!("tin_{suffix}"), at, self.tin.value);
        row
    }

    /// Read the state of entry `index` of `facet`.
    pub fn from_state(row: &StateRow, facet: Facet, index: usize) -> Result<Self, ConfigError> {
        let suffix = facet.suffix();
        let at = IndexDescriptor::layer(index);
        Ok(Self {
            state: Param::new(row.read(&format!("state_{suffix}"), at)?),
            soilstore: Param::new(row.read(&format!("soilstore_{suffix}"), at)?),
            temperature: Param::new(row.read_array(&format!("temp_{suffix}"), |k| {
                IndexDescriptor::layer_component(index, k)
            })?),
            tsfc: Param::new(row.read(&format!("tsfc_{suffix}"), at)?),
            tin: Param::new(row.read(&format!("tin_{suffix}"), at)?),
        })
    }

    /// Whether `row` holds a state for entry `index` of `facet`.
    fn present(row: &StateRow, facet: Facet, index: usize) -> bool {
        row.contains(&format!("state_{}", facet.suffix()), IndexDescriptor::layer(index))
    }
}

// ---------------------------------------------------------------------------
// Land-cover surfaces
// ---------------------------------------------------------------------------

/// Snow on a land-cover surface, stored at `(p, "(s,)")`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnowState {
    /// Snow-covered fraction.
    pub snowfrac: Param<f64>,
    /// Snow water equivalent [mm].
    pub snowpack: Param<f64>,
    /// Ice fraction of the snowpack.
    pub icefrac: Param<f64>,
    /// Liquid water in the snowpack [mm].
    pub snowwater: Param<f64>,
    /// Snow density [kg m-3].
    pub snowdens: Param<f64>,
}

impl Default for SnowState {
    fn default() -> Self {
        Self {
            snowfrac: Param::new(0.0),
            snowpack: Param::new(0.0),
            icefrac: Param::new(0.0),
            snowwater: Param::new(0.0),
            snowdens: Param::new(0.0),
        }
    }
}

impl SnowState {
    fn validate(&self, surface: SurfaceType) -> Result<(), ConfigError> {
        check_fraction(&format!("{surface}.snowfrac"), self.snowfrac.value)?;
        check_fraction(&format!("{surface}.icefrac"), self.icefrac.value)?;
        for (name, value) in [
            ("snowpack", self.snowpack.value),
            ("snowwater", self.snowwater.value),
            ("snowdens", self.snowdens.value),
        ] {
            check_at_least(&format!("{surface}.{name}"), value, 0.0, "non-negative")?;
        }
        Ok(())
    }

    const fn cells(&self) -> [(&'static str, f64); 5] {
        [
            ("snowfrac", self.snowfrac.value),
            ("snowpack", self.snowpack.value),
            ("icefrac", self.icefrac.value),
            ("snowwater", self.snowwater.value),
            ("snowdens", self.snowdens.value),
        ]
    }
}

/// Initial state of a land-cover surface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceInitialState {
    /// Moisture and temperature.
    #[serde(flatten)]
    pub layer: LayerInitialState,
    /// Snow.
    #[serde(flatten)]
    pub snow: SnowState,
}

impl SurfaceInitialState {
    /// Check moisture and snow state of `surface`.
    pub fn validate(&self, surface: SurfaceType) -> Result<(), ConfigError> {
        self.layer.validate(surface.name())?;
        self.snow.validate(surface)
    }

    /// Write the state of `surface`.
    pub fn to_state(&self, surface: SurfaceType) -> StateRow {
        let mut row = self.layer.to_state(Facet::Surface, surface.index());
        let at = IndexDescriptor::surface(surface);
        for (name, value) in self.snow.cells() {
            row.push(name, at, value);
        }
        row
    }

    /// Read the state of `surface`.
    pub fn from_state(row: &StateRow, surface: SurfaceType) -> Result<Self, ConfigError> {
        let at = IndexDescriptor::surface(surface);
        let read = |name: &str| -> Result<Param<f64>, ConfigError> {
            Ok(Param::new(row.read(name, at)?))
        };
        Ok(Self {
            layer: LayerInitialState::from_state(row, Facet::Surface, surface.index())?,
            snow: SnowState {
                snowfrac: read("snowfrac")?,
                snowpack: read("snowpack")?,
                icefrac: read("icefrac")?,
                snowwater: read("snowwater")?,
                snowdens: read("snowdens")?,
            },
        })
    }
}

/// Daily water use of a vegetated surface, stored at
/// `("wuday_id", "(3v + k,)")`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterUse {
    /// Total water use [mm].
    pub wu_total: Param<f64>,
    /// Automatic irrigation [mm].
    pub wu_auto: Param<f64>,
    /// Manual irrigation [mm].
    pub wu_manual: Param<f64>,
}

impl WaterUse {
    const COLUMN: &'static str = "wuday_id";

    const fn slot(vegetation: VegetationType, k: usize) -> IndexDescriptor {
        let base = vegetation.index().saturating_mul(3);
        IndexDescriptor::layer(base.saturating_add(k))
    }

    fn validate(&self, surface: SurfaceType) -> Result<(), ConfigError> {
        for (name, value) in [
            ("wu_total", self.wu_total.value),
            ("wu_auto", self.wu_auto.value),
            ("wu_manual", self.wu_manual.value),
        ] {
            check_at_least(&format!("{surface}.wu.{name}"), value, 0.0, "non-negative")?;
        }
        Ok(())
    }

    fn to_state(&self, vegetation: VegetationType) -> StateRow {
        let mut row = StateRow::new();
        let values = [self.wu_total.value, self.wu_auto.value, self.wu_manual.value];
        row.push_all(Self::COLUMN, &values, |k| Self::slot(vegetation, k));
        row
    }

    fn from_state(row: &StateRow, vegetation: VegetationType) -> Result<Self, ConfigError> {
        let [wu_total, wu_auto, wu_manual]: [f64; 3] =
            row.read_array(Self::COLUMN, |k| Self::slot(vegetation, k))?;
        Ok(Self {
            wu_total: Param::new(wu_total),
            wu_auto: Param::new(wu_auto),
            wu_manual: Param::new(wu_manual),
        })
    }
}

/// Initial state of a vegetated surface.
///
/// The albedo is written twice, at `("alb", "(s,)")` and at
/// `("alb{name}_id", "0")`; decoding reads the latter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VegetatedInitialState {
    /// Moisture, temperature and snow.
    #[serde(flatten)]
    pub surface: SurfaceInitialState,
    /// Albedo on the first day.
    pub alb_id: Param<f64>,
    /// Leaf area index on the first day [m2 m-2].
    pub lai_id: Param<f64>,
    /// Growing degree days on the first day.
    pub gdd_id: Param<f64>,
    /// Senescence degree days on the first day.
    pub sdd_id: Param<f64>,
    /// Water use on the first day.
    pub wu: WaterUse,
}

impl Default for VegetatedInitialState {
    fn default() -> Self {
        Self {
            surface: SurfaceInitialState::default(),
            alb_id: Param::new(0.25),
            lai_id: Param::new(1.0),
            gdd_id: Param::new(0.0),
            sdd_id: Param::new(0.0),
            wu: WaterUse::default(),
        }
    }
}

impl VegetatedInitialState {
    /// Check the state of `vegetation`.
    pub fn validate(&self, vegetation: VegetationType) -> Result<(), ConfigError> {
        let surface = vegetation.surface();
        self.surface.validate(surface)?;
        check_fraction(&format!("{surface}.alb_id"), self.alb_id.value)?;
        self.wu.validate(surface)
    }

    /// Write the state of `vegetation`.
    pub fn to_state(&self, vegetation: VegetationType) -> StateRow {
        let surface = vegetation.surface();
        let mut row = self.surface.to_state(surface);
        row.push("alb", IndexDescriptor::surface(surface), self.alb_id.value);
        let at = IndexDescriptor::vegetation(vegetation);
        row.push("lai_id", at, self.lai_id.value);
        row.push("gdd_id", at, self.gdd_id.value);
        row.push("sdd_id", at, self.sdd_id.value);
        row.merge_keep_first(self.wu.to_state(vegetation));
        row.scalar(&albedo_column(surface), self.alb_id.value);
        row
    }

    /// Read the state of `vegetation`.
    pub fn from_state(row: &StateRow, vegetation: VegetationType) -> Result<Self, ConfigError> {
        let surface = vegetation.surface();
        let at = IndexDescriptor::vegetation(vegetation);
        Ok(Self {
            surface: SurfaceInitialState::from_state(row, surface)?,
            alb_id: Param::new(row.read_scalar(&albedo_column(surface))?),
            lai_id: Param::new(row.read("lai_id", at)?),
            gdd_id: Param::new(row.read("gdd_id", at)?),
            sdd_id: Param::new(row.read("sdd_id", at)?),
            wu: WaterUse::from_state(row, vegetation)?,
        })
    }
}

fn albedo_column(surface: SurfaceType) -> String {
    format!("alb{}_id", surface.name())
}

/// Initial state of deciduous trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DectrInitialState {
    /// State shared with the other vegetated surfaces.
    #[serde(flatten)]
    pub vegetation: VegetatedInitialState,
    /// Canopy porosity on the first day.
    pub porosity_id: Param<f64>,
    /// Water storage capacity on the first day [mm].
    pub decidcap_id: Param<f64>,
}

impl Default for DectrInitialState {
    fn default() -> Self {
        Self {
            vegetation: VegetatedInitialState::default(),
            porosity_id: Param::new(0.2),
            decidcap_id: Param::new(0.3),
        }
    }
}

impl DectrInitialState {
    fn to_state(&self) -> StateRow {
        let mut row = self.vegetation.to_state(VegetationType::Dectr);
        row.scalar("porosity_id", self.porosity_id.value);
        row.scalar("decidcap_id", self.decidcap_id.value);
        row
    }

    fn from_state(row: &StateRow) -> Result<Self, ConfigError> {
        Ok(Self {
            vegetation: VegetatedInitialState::from_state(row, VegetationType::Dectr)?,
            porosity_id: Param::new(row.read_scalar("porosity_id")?),
            decidcap_id: Param::new(row.read_scalar("decidcap_id")?),
        })
    }
}

// ---------------------------------------------------------------------------
// All initial states
// ---------------------------------------------------------------------------

/// Initial state of a site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialStates {
    /// Snow albedo.
    pub snowalb: Param<f64>,
    /// Paved surfaces.
    pub paved: SurfaceInitialState,
    /// Buildings.
    pub bldgs: SurfaceInitialState,
    /// Evergreen trees.
    pub evetr: VegetatedInitialState,
    /// Deciduous trees.
    pub dectr: DectrInitialState,
    /// Grass.
    pub grass: VegetatedInitialState,
    /// Bare soil.
    pub bsoil: SurfaceInitialState,
    /// Open water.
    pub water: SurfaceInitialState,
    /// Roof layers, top to bottom.
    pub roofs: Vec<LayerInitialState>,
    /// Wall layers, top to bottom.
    pub walls: Vec<LayerInitialState>,
}

impl Default for InitialStates {
    fn default() -> Self {
        Self {
            snowalb: Param::new(0.5),
            paved: SurfaceInitialState::default(),
            bldgs: SurfaceInitialState::default(),
            evetr: VegetatedInitialState::default(),
            dectr: DectrInitialState::default(),
            grass: VegetatedInitialState::default(),
            bsoil: SurfaceInitialState::default(),
            water: SurfaceInitialState::default(),
            roofs: vec![LayerInitialState::default(); 3],
            walls: vec![LayerInitialState::default(); 3],
        }
    }
}

impl InitialStates {
    /// Non-vegetated surface states in index order.
    const fn plain_surfaces(&self) -> [(SurfaceType, &SurfaceInitialState); 4] {
        [
            (SurfaceType::Paved, &self.paved),
            (SurfaceType::Bldgs, &self.bldgs),
            (SurfaceType::Bsoil, &self.bsoil),
            (SurfaceType::Water, &self.water),
        ]
    }
}

impl Validate for InitialStates {
    fn validate(&self) -> Result<(), ConfigError> {
        check_fraction("snowalb", self.snowalb.value)?;
        for (surface, state) in self.plain_surfaces() {
            state.validate(surface)?;
        }
        self.evetr.validate(VegetationType::Evetr)?;
        self.dectr.vegetation.validate(VegetationType::Dectr)?;
        self.grass.validate(VegetationType::Grass)?;
        for (index, roof) in self.roofs.iter().enumerate() {
            roof.validate(&format!("roof[{index}]"))?;
        }
        for (index, wall) in self.walls.iter().enumerate() {
            wall.validate(&format!("wall[{index}]"))?;
        }
        Ok(())
    }
}

impl StateBlock for InitialStates {
    fn to_state(&self) -> StateRow {
        let mut row = StateRow::new();
        row.scalar("snowalb", self.snowalb.value);
        row.merge_keep_first(self.paved.to_state(SurfaceType::Paved));
        row.merge_keep_first(self.bldgs.to_state(SurfaceType::Bldgs));
        row.merge_keep_first(self.evetr.to_state(VegetationType::Evetr));
        row.merge_keep_first(self.dectr.to_state());
        row.merge_keep_first(self.grass.to_state(VegetationType::Grass));
        row.merge_keep_first(self.bsoil.to_state(SurfaceType::Bsoil));
        row.merge_keep_first(self.water.to_state(SurfaceType::Water));
        for (index, roof) in self.roofs.iter().enumerate() {
            row.merge_keep_first(roof.to_state(Facet::Roof, index));
        }
        for (index, wall) in self.walls.iter().enumerate() {
            row.merge_keep_first(wall.to_state(Facet::Wall, index));
        }
        for name in ZEROED_SCALARS {
            row.scalar(name, 0.0);
        }
        row.push_all("hdd_id", &[0.0; HDD_SLOTS], IndexDescriptor::layer);
        row
    }

    fn decode(row: &StateRow) -> Result<Self, ConfigError> {
        Ok(Self {
            snowalb: Param::new(row.read_scalar("snowalb")?),
            paved: SurfaceInitialState::from_state(row, SurfaceType::Paved)?,
            bldgs: SurfaceInitialState::from_state(row, SurfaceType::Bldgs)?,
            evetr: VegetatedInitialState::from_state(row, VegetationType::Evetr)?,
            dectr: DectrInitialState::from_state(row)?,
            grass: VegetatedInitialState::from_state(row, VegetationType::Grass)?,
            bsoil: SurfaceInitialState::from_state(row, SurfaceType::Bsoil)?,
            water: SurfaceInitialState::from_state(row, SurfaceType::Water)?,
            roofs: read_layer_states(row, Facet::Roof)?,
            walls: read_layer_states(row, Facet::Wall)?,
        })
    }
}

/// Read consecutive layer states of `facet` until one is absent.
fn read_layer_states(row: &StateRow, facet: Facet) -> Result<Vec<LayerInitialState>, ConfigError> {
    (0..)
        .take_while(|index| LayerInitialState::present(row, facet, *index))
        .map(|index| LayerInitialState::from_state(row, facet, index))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facets_write_no_snow_columns() {
        let row = LayerInitialState::default().to_state(Facet::Roof, 0);
        assert!(row.contains("state_roof", IndexDescriptor::Single(0)));
        assert!(row.contains("temp_roof", IndexDescriptor::Pair(0, 4)));
        assert!(!row.keys().any(|k| k.name.starts_with("snow")));
    }

    #[test]
    fn vegetated_albedo_is_written_twice() {
        let state = VegetatedInitialState {
            alb_id: Param::new(0.18),
            ..VegetatedInitialState::default()
        };
        let row = state.to_state(VegetationType::Grass);
        assert_eq!(row.read::<f64>("alb", IndexDescriptor::Single(4)).ok(), Some(0.18));
        assert_eq!(row.read_scalar::<f64>("albgrass_id").ok(), Some(0.18));
        assert!(row.contains("wuday_id", IndexDescriptor::Single(8)));
    }

    #[test]
    fn padding_diagnostics_are_zero() {
        let row = InitialStates::default().to_state();
        assert_eq!(row.read_scalar::<f64>("tstep_prev").ok(), Some(0.0));
        assert!(row.contains("hdd_id", IndexDescriptor::Single(11)));
        assert!(!row.contains("hdd_id", IndexDescriptor::Single(12)));
    }

    #[test]
    fn layer_states_decode_until_absent() {
        let states = InitialStates {
            roofs: vec![LayerInitialState::default(); 2],
            walls: vec![LayerInitialState::default(); 4],
            ..InitialStates::default()
        };
        let decoded = InitialStates::from_state(&states.to_state()).ok();
        assert_eq!(decoded.as_ref().map(|s| s.roofs.len()), Some(2));
        assert_eq!(decoded.as_ref().map(|s| s.walls.len()), Some(4));
        assert_eq!(decoded, Some(states));
    }

    #[test]
    fn dry_soil_store_is_rejected() {
        let mut states = InitialStates::default();
        states.bsoil.layer.soilstore = Param::new(5.0);
        let err = states.validate().err();
        assert_eq!(
            err.map(|e| e.to_string()).as_deref(),
            Some("bsoil.soilstore = 5 must be at least 10 mm")
        );
    }
}
