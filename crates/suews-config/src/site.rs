//! A simulated site: location, parameter blocks, land cover, and initial
//! state.

use serde::{Deserialize, Serialize};
use tracing::warn;

use suews_state::StateRow;
use suews_types::{GridId, Param};

use crate::anthropogenic::AnthropogenicEmissions;
use crate::blocks::{Conductance, LumpsParams, SpartacusParams};
use crate::building::{ArchetypeProperties, StebbsProperties};
use crate::codec::{check_fraction, check_positive, check_within, StateBlock, Validate};
use crate::initial::InitialStates;
use crate::irrigation::IrrigationParams;
use crate::snow::SnowParams;
use crate::surface::LandCover;
use crate::vertical::VerticalLayers;
use crate::ConfigError;

/// Physical description of a site. Location scalars are stored at
/// `(name, "0")`.
///
/// Large parameter blocks are boxed: held inline, a deserialized site
/// overflows the default thread stack in debug builds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteProperties {
    /// Latitude [deg].
    pub lat: Param<f64>,
    /// Longitude [deg].
    pub lng: Param<f64>,
    /// Altitude above sea level [m].
    pub alt: Param<f64>,
    /// Offset from UTC [h].
    pub timezone: Param<i32>,
    /// Surface area [m2].
    pub surfacearea: Param<f64>,
    /// Measurement height [m].
    pub z: Param<f64>,
    /// Momentum roughness length [m].
    pub z0m_in: Param<f64>,
    /// Zero-plane displacement height [m].
    pub zdm_in: Param<f64>,
    /// Capacity of the drainage pipes [mm h-1].
    pub pipecapacity: Param<f64>,
    /// Fraction of excess water routed to water bodies.
    pub runofftowater: Param<f64>,
    /// Atmospheric transmissivity of the NARP scheme.
    pub narp_trans_site: Param<f64>,
    /// LUMPS scheme.
    pub lumps: LumpsParams,
    /// SPARTACUS-Surface scheme.
    pub spartacus: SpartacusParams,
    /// Building energy model.
    pub stebbs: Box<StebbsProperties>,
    /// Building archetype.
    pub building_archetype: Box<ArchetypeProperties>,
    /// Surface conductance.
    pub conductance: Conductance,
    /// Irrigation.
    pub irrigation: IrrigationParams,
    /// Anthropogenic heat and CO2.
    pub anthropogenic_emissions: Box<AnthropogenicEmissions>,
    /// Snow.
    pub snow: SnowParams,
    /// The seven land-cover surfaces.
    pub land_cover: Box<LandCover>,
    /// Urban canopy layers.
    pub vertical_layers: VerticalLayers,
}

impl Default for SiteProperties {
    fn default() -> Self {
        Self {
            lat: Param::new(51.5),
            lng: Param::new(-0.13),
            alt: Param::new(40.0),
            timezone: Param::new(0),
            surfacearea: Param::new(10_000.0),
            z: Param::new(10.0),
            z0m_in: Param::new(1.0),
            zdm_in: Param::new(5.0),
            pipecapacity: Param::new(100.0),
            runofftowater: Param::new(0.0),
            narp_trans_site: Param::new(0.2),
            lumps: LumpsParams::default(),
            spartacus: SpartacusParams::default(),
            stebbs: Box::default(),
            building_archetype: Box::default(),
            conductance: Conductance::default(),
            irrigation: IrrigationParams::default(),
            anthropogenic_emissions: Box::default(),
            snow: SnowParams::default(),
            land_cover: Box::default(),
            vertical_layers: VerticalLayers::default(),
        }
    }
}

impl SiteProperties {
    const fn location(&self) -> [(&'static str, f64); 10] {
        [
            ("lat", self.lat.value),
            ("lng", self.lng.value),
            ("alt", self.alt.value),
            ("surfacearea", self.surfacearea.value),
            ("z", self.z.value),
            ("z0m_in", self.z0m_in.value),
            ("zdm_in", self.zdm_in.value),
            ("pipecapacity", self.pipecapacity.value),
            ("runofftowater", self.runofftowater.value),
            ("narp_trans_site", self.narp_trans_site.value),
        ]
    }
}

impl Validate for SiteProperties {
    fn validate(&self) -> Result<(), ConfigError> {
        check_within("lat", self.lat.value, -90.0, 90.0, "within [-90, 90]")?;
        check_within("lng", self.lng.value, -180.0, 180.0, "within [-180, 180]")?;
        if !(-12..=12).contains(&self.timezone.value) {
            return Err(ConfigError::out_of_range(
                "timezone",
                f64::from(self.timezone.value),
                "within [-12, 12]",
            ));
        }
        for (field, value) in [
            ("alt", self.alt.value),
            ("surfacearea", self.surfacearea.value),
            ("z", self.z.value),
            ("z0m_in", self.z0m_in.value),
            ("zdm_in", self.zdm_in.value),
            ("pipecapacity", self.pipecapacity.value),
        ] {
            check_positive(field, value)?;
        }
        check_fraction("runofftowater", self.runofftowater.value)?;

        self.lumps.validate()?;
        self.spartacus.validate()?;
        self.stebbs.validate()?;
        self.building_archetype.validate()?;
        self.conductance.validate()?;
        self.irrigation.validate()?;
        self.anthropogenic_emissions.validate()?;
        self.snow.validate()?;
        self.land_cover.validate()?;
        self.vertical_layers.validate()
    }
}

impl StateBlock for SiteProperties {
    fn to_state(&self) -> StateRow {
        let mut row = StateRow::new();
        for (name, value) in self.location() {
            row.scalar(name, value);
        }
        row.scalar("timezone", self.timezone.value);
        row.merge_keep_first(self.lumps.to_state());
        row.merge_keep_first(self.spartacus.to_state());
        row.merge_keep_first(self.conductance.to_state());
        row.merge_keep_first(self.irrigation.to_state());
        row.merge_keep_first(self.anthropogenic_emissions.to_state());
        row.merge_keep_first(self.snow.to_state());
        row.merge_keep_first(self.land_cover.to_state());
        row.merge_keep_first(self.vertical_layers.to_state());
        row.merge_keep_first(self.stebbs.to_state());
        row.merge_keep_first(self.building_archetype.to_state());
        row
    }

    fn decode(row: &StateRow) -> Result<Self, ConfigError> {
        let read = |name: &str| -> Result<Param<f64>, ConfigError> {
            Ok(Param::new(row.read_scalar(name)?))
        };
        Ok(Self {
            lat: read("lat")?,
            lng: read("lng")?,
            alt: read("alt")?,
            timezone: Param::new(row.read_scalar("timezone")?),
            surfacearea: read("surfacearea")?,
            z: read("z")?,
            z0m_in: read("z0m_in")?,
            zdm_in: read("zdm_in")?,
            pipecapacity: read("pipecapacity")?,
            runofftowater: read("runofftowater")?,
            narp_trans_site: read("narp_trans_site")?,
            lumps: LumpsParams::decode(row)?,
            spartacus: SpartacusParams::decode(row)?,
            stebbs: Box::new(StebbsProperties::decode(row)?),
            building_archetype: Box::new(ArchetypeProperties::decode(row)?),
            conductance: Conductance::decode(row)?,
            irrigation: IrrigationParams::decode(row)?,
            anthropogenic_emissions: Box::new(AnthropogenicEmissions::decode(row)?),
            snow: SnowParams::decode(row)?,
            land_cover: Box::new(LandCover::decode(row)?),
            vertical_layers: VerticalLayers::decode(row)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Site
// ---------------------------------------------------------------------------

/// One grid of a simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Site {
    /// Display name, document-only.
    pub name: String,
    /// Grid identifier.
    pub gridiv: GridId,
    /// Physical description.
    pub properties: Box<SiteProperties>,
    /// Initial model state.
    pub initial_states: Box<InitialStates>,
}

impl Default for Site {
    fn default() -> Self {
        Self {
            name: "test site".to_owned(),
            gridiv: GridId::default(),
            properties: Box::default(),
            initial_states: Box::default(),
        }
    }
}

impl Site {
    /// Read a site from the row stored under `grid`.
    ///
    /// The grid id comes from the `gridiv` cell when present and from the
    /// row key otherwise. The name is not stored in the table.
    pub fn from_state(row: &StateRow, grid: GridId) -> Result<Self, ConfigError> {
        let gridiv = if row.contains("gridiv", suews_state::IndexDescriptor::Scalar) {
            GridId(row.read_scalar("gridiv")?)
        } else {
            grid
        };
        let site = Self {
            gridiv,
            properties: Box::new(SiteProperties::decode(row)?),
            initial_states: Box::new(InitialStates::decode(row)?),
            ..Self::default()
        };
        site.warn_on_layer_mismatch();
        site.validate()?;
        Ok(site)
    }

    /// Write `("gridiv", "0")`, the properties and the initial states.
    pub fn to_state(&self) -> StateRow {
        let mut row = StateRow::new();
        row.scalar("gridiv", self.gridiv.into_inner());
        row.merge_keep_first(self.properties.to_state());
        row.merge_keep_first(self.initial_states.to_state());
        row
    }

    fn warn_on_layer_mismatch(&self) {
        let layers = &self.properties.vertical_layers;
        let states = &self.initial_states;
        if states.roofs.len() != layers.roofs.len() || states.walls.len() != layers.walls.len() {
            warn!(
                gridiv = %self.gridiv,
                roofs = layers.roofs.len(),
                roof_states = states.roofs.len(),
                walls = layers.walls.len(),
                wall_states = states.walls.len(),
                "Initial layer states do not match the vertical layers"
            );
        }
    }
}

impl Validate for Site {
    fn validate(&self) -> Result<(), ConfigError> {
        self.properties.validate()?;
        self.initial_states.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use suews_state::IndexDescriptor;

    #[test]
    fn defaults_validate() {
        assert!(Site::default().validate().is_ok());
    }

    #[test]
    fn location_bounds() {
        let props = SiteProperties {
            lat: Param::new(95.0),
            ..SiteProperties::default()
        };
        let err = props.validate().err();
        assert_eq!(
            err.map(|e| e.to_string()).as_deref(),
            Some("lat = 95 must be within [-90, 90]")
        );

        let props = SiteProperties {
            timezone: Param::new(13),
            ..SiteProperties::default()
        };
        assert!(matches!(props.validate(), Err(ConfigError::OutOfRange { .. })));
    }

    #[test]
    fn site_round_trips_through_a_row() {
        let mut site = Site {
            gridiv: GridId(42),
            ..Site::default()
        };
        site.properties.lat = Param::new(-33.9);
        site.properties.timezone = Param::new(10);
        let row = site.to_state();
        assert_eq!(row.read::<u32>("gridiv", IndexDescriptor::Scalar).ok(), Some(42));

        let decoded = Site::from_state(&row, GridId(0)).ok();
        assert_eq!(decoded, Some(site));
    }

    #[test]
    fn row_key_is_the_fallback_grid_id() {
        let site = Site::default();
        let mut row = StateRow::new();
        for (key, value) in site.to_state().iter() {
            if key.name != "gridiv" {
                row.insert(key.clone(), value);
            }
        }
        let decoded = Site::from_state(&row, GridId(7)).ok();
        assert_eq!(decoded.map(|s| s.gridiv), Some(GridId(7)));
    }

    #[test]
    fn decode_reports_the_missing_column() {
        let row = SiteProperties::default().to_state();
        let err = Site::from_state(&row, GridId(1)).err();
        assert_eq!(
            err.map(|e| e.to_string()).as_deref(),
            Some("state table: missing column snowalb[0]")
        );
    }
}
