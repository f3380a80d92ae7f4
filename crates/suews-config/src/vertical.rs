//! Vertical layering of the urban canopy.
//!
//! The canopy is cut into `nlayer` horizontal slabs. Each slab has a building
//! and vegetation fraction plus one roof and one wall layer, and both facets
//! carry a full [`BuildingLayer`] with its own thermal stack. Decoding reads
//! `nlayer` first and sizes every per-layer array from it.

use serde::{Deserialize, Serialize};

use suews_state::{IndexDescriptor, StateRow};
use suews_types::{Facet, Param};

use crate::codec::{check_at_least, check_fraction, StateBlock, Validate};
use crate::thermal::ThermalLayers;
use crate::ConfigError;

/// Radiative, hydrological and thermal properties of one roof or wall
/// layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildingLayer {
    /// Albedo.
    pub alb: Param<f64>,
    /// Emissivity.
    pub emis: Param<f64>,
    /// Thermal layers of the facet.
    pub thermal_layers: ThermalLayers,
    /// Surface water depth above which runoff starts [mm].
    pub statelimit: Param<f64>,
    /// Capacity of the facet's water store [mm].
    pub soilstorecap: Param<f64>,
    /// Wetness threshold for evaporation.
    pub wetthresh: Param<f64>,
}

impl Default for BuildingLayer {
    fn default() -> Self {
        Self {
            alb: Param::new(0.1),
            emis: Param::new(0.95),
            thermal_layers: ThermalLayers::default(),
            statelimit: Param::new(10.0),
            soilstorecap: Param::new(150.0),
            wetthresh: Param::new(0.5),
        }
    }
}

impl BuildingLayer {
    /// Albedo and emissivity must lie in `[0, 1]`.
    pub fn validate(&self, facet: Facet, layer: usize) -> Result<(), ConfigError> {
        check_fraction(&format!("{facet}[{layer}].alb"), self.alb.value)?;
        check_fraction(&format!("{facet}[{layer}].emis"), self.emis.value)
    }

    /// Write `{p}_{facet}` at `"(layer,)"` and the thermal stack.
    pub fn to_state(&self, facet: Facet, layer: usize) -> StateRow {
        let at = IndexDescriptor::layer(layer);
        let mut row = StateRow::new();
        for (param, value) in self.scalars() {
            row.push(&facet_column(param, facet), at, value);
        }
        row.merge_keep_first(self.thermal_layers.to_state(facet, layer));
        row
    }

    /// Read the cells written by [`BuildingLayer::to_state`].
    pub fn from_state(row: &StateRow, facet: Facet, layer: usize) -> Result<Self, ConfigError> {
        let at = IndexDescriptor::layer(layer);
        let read = |param: &str| -> Result<Param<f64>, ConfigError> {
            Ok(Param::new(row.read(&facet_column(param, facet), at)?))
        };
        Ok(Self {
            alb: read("alb")?,
            emis: read("emis")?,
            thermal_layers: ThermalLayers::from_state(row, facet, layer)?,
            statelimit: read("statelimit")?,
            soilstorecap: read("soilstorecap")?,
            wetthresh: read("wetthresh")?,
        })
    }

    const fn scalars(&self) -> [(&'static str, f64); 5] {
        [
            ("alb", self.alb.value),
            ("emis", self.emis.value),
            ("statelimit", self.statelimit.value),
            ("soilstorecap", self.soilstorecap.value),
            ("wetthresh", self.wetthresh.value),
        ]
    }
}

fn facet_column(param: &str, facet: Facet) -> String {
    format!("{param}_{}", facet.suffix())
}

/// A roof layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoofLayer {
    /// Shared layer fields.
    #[serde(flatten)]
    pub layer: BuildingLayer,
    /// Multiplier of the direct-beam roof albedo.
    pub roof_albedo_dir_mult_fact: Param<f64>,
}

impl Default for RoofLayer {
    fn default() -> Self {
        Self {
            layer: BuildingLayer::default(),
            roof_albedo_dir_mult_fact: Param::new(0.1),
        }
    }
}

impl RoofLayer {
    /// Write the roof columns of `layer`.
    pub fn to_state(&self, layer: usize) -> StateRow {
        let mut row = self.layer.to_state(Facet::Roof, layer);
        row.push(
            "roof_albedo_dir_mult_fact",
            IndexDescriptor::pair(0, layer),
            self.roof_albedo_dir_mult_fact.value,
        );
        row
    }

    /// Read the roof columns of `layer`.
    pub fn from_state(row: &StateRow, layer: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            layer: BuildingLayer::from_state(row, Facet::Roof, layer)?,
            roof_albedo_dir_mult_fact: Param::new(
                row.read("roof_albedo_dir_mult_fact", IndexDescriptor::pair(0, layer))?,
            ),
        })
    }
}

/// A wall layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallLayer {
    /// Shared layer fields.
    #[serde(flatten)]
    pub layer: BuildingLayer,
    /// Fraction of wall reflection that is specular.
    pub wall_specular_frac: Param<f64>,
}

impl Default for WallLayer {
    fn default() -> Self {
        Self {
            layer: BuildingLayer::default(),
            wall_specular_frac: Param::new(0.1),
        }
    }
}

impl WallLayer {
    /// Write the wall columns of `layer`.
    pub fn to_state(&self, layer: usize) -> StateRow {
        let mut row = self.layer.to_state(Facet::Wall, layer);
        row.push(
            "wall_specular_frac",
            IndexDescriptor::pair(0, layer),
            self.wall_specular_frac.value,
        );
        row
    }

    /// Read the wall columns of `layer`.
    pub fn from_state(row: &StateRow, layer: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            layer: BuildingLayer::from_state(row, Facet::Wall, layer)?,
            wall_specular_frac: Param::new(
                row.read("wall_specular_frac", IndexDescriptor::pair(0, layer))?,
            ),
        })
    }
}

// ---------------------------------------------------------------------------
// Vertical layers
// ---------------------------------------------------------------------------

/// The layered canopy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerticalLayers {
    /// Number of layers.
    pub nlayer: Param<i32>,
    /// Heights of the layer boundaries [m], `nlayer + 1` values.
    pub height: Param<Vec<f64>>,
    /// Vegetation fraction of each layer.
    pub veg_frac: Param<Vec<f64>>,
    /// Vegetation scaling factor of each layer.
    pub veg_scale: Param<Vec<f64>>,
    /// Building fraction of each layer.
    pub building_frac: Param<Vec<f64>>,
    /// Building scaling factor of each layer.
    pub building_scale: Param<Vec<f64>>,
    /// Roof of each layer.
    pub roofs: Vec<RoofLayer>,
    /// Walls of each layer.
    pub walls: Vec<WallLayer>,
}

impl Default for VerticalLayers {
    fn default() -> Self {
        Self {
            nlayer: Param::new(3),
            height: Param::new(vec![0.0, 10.0, 20.0, 30.0]),
            veg_frac: Param::new(vec![0.0; 3]),
            veg_scale: Param::new(vec![1.0; 3]),
            building_frac: Param::new(vec![0.4, 0.3, 0.3]),
            building_scale: Param::new(vec![1.0; 3]),
            roofs: vec![RoofLayer::default(); 3],
            walls: vec![WallLayer::default(); 3],
        }
    }
}

impl VerticalLayers {
    /// Build a layered canopy with no vegetation and unit scaling factors.
    ///
    /// # Errors
    ///
    /// [`ConfigError::LengthMismatch`] when `height` does not hold
    /// `nlayer + 1` values or `building_frac` does not hold `nlayer`;
    /// [`ConfigError::LayerCountMismatch`] when there are not `nlayer` roofs
    /// or walls.
    pub fn try_new(
        nlayer: i32,
        height: Vec<f64>,
        building_frac: Vec<f64>,
        roofs: Vec<RoofLayer>,
        walls: Vec<WallLayer>,
    ) -> Result<Self, ConfigError> {
        let count = layer_count(nlayer)?;
        let layers = Self {
            nlayer: Param::new(nlayer),
            height: Param::new(height),
            veg_frac: Param::new(vec![0.0; count]),
            veg_scale: Param::new(vec![1.0; count]),
            building_frac: Param::new(building_frac),
            building_scale: Param::new(vec![1.0; count]),
            roofs,
            walls,
        };
        layers.validate()?;
        Ok(layers)
    }

    /// Declared number of layers.
    ///
    /// # Errors
    ///
    /// [`ConfigError::OutOfRange`] when `nlayer` is not positive.
    pub fn count(&self) -> Result<usize, ConfigError> {
        layer_count(self.nlayer.value)
    }
}

fn layer_count(nlayer: i32) -> Result<usize, ConfigError> {
    usize::try_from(nlayer)
        .ok()
        .filter(|count| *count > 0)
        .ok_or_else(|| ConfigError::out_of_range("nlayer", f64::from(nlayer), "at least 1"))
}

fn check_length(field: &'static str, values: &[f64], expected: usize) -> Result<(), ConfigError> {
    if values.len() == expected {
        Ok(())
    } else {
        Err(ConfigError::LengthMismatch {
            field,
            expected,
            actual: values.len(),
        })
    }
}

const fn check_layer_count(
    facet: Facet,
    expected: usize,
    actual: usize,
) -> Result<(), ConfigError> {
    if expected == actual {
        Ok(())
    } else {
        Err(ConfigError::LayerCountMismatch {
            facet,
            expected,
            actual,
        })
    }
}

impl Validate for VerticalLayers {
    fn validate(&self) -> Result<(), ConfigError> {
        let count = self.count()?;
        check_length("height", &self.height.value, count.saturating_add(1))?;
        check_length("veg_frac", &self.veg_frac.value, count)?;
        check_length("veg_scale", &self.veg_scale.value, count)?;
        check_length("building_frac", &self.building_frac.value, count)?;
        check_length("building_scale", &self.building_scale.value, count)?;
        check_layer_count(Facet::Roof, count, self.roofs.len())?;
        check_layer_count(Facet::Wall, count, self.walls.len())?;

        for (layer, fraction) in self.building_frac.value.iter().enumerate() {
            check_fraction(&format!("building_frac[{layer}]"), *fraction)?;
        }
        for (layer, fraction) in self.veg_frac.value.iter().enumerate() {
            check_fraction(&format!("veg_frac[{layer}]"), *fraction)?;
        }
        for pair in self.height.value.windows(2) {
            if let [lower, upper] = pair {
                check_at_least("height", *upper, *lower, "non-decreasing")?;
            }
        }
        for (layer, roof) in self.roofs.iter().enumerate() {
            roof.layer.validate(Facet::Roof, layer)?;
        }
        for (layer, wall) in self.walls.iter().enumerate() {
            wall.layer.validate(Facet::Wall, layer)?;
        }
        Ok(())
    }
}

impl StateBlock for VerticalLayers {
    fn to_state(&self) -> StateRow {
        let mut row = StateRow::new();
        row.scalar("nlayer", self.nlayer.value);
        row.push_all("height", &self.height.value, IndexDescriptor::layer);
        row.push_all("veg_frac", &self.veg_frac.value, IndexDescriptor::layer);
        row.push_all("veg_scale", &self.veg_scale.value, IndexDescriptor::layer);
        row.push_all("building_frac", &self.building_frac.value, IndexDescriptor::layer);
        row.push_all("building_scale", &self.building_scale.value, IndexDescriptor::layer);
        for (layer, roof) in self.roofs.iter().enumerate() {
            row.merge_keep_first(roof.to_state(layer));
        }
        for (layer, wall) in self.walls.iter().enumerate() {
            row.merge_keep_first(wall.to_state(layer));
        }
        row
    }

    fn decode(row: &StateRow) -> Result<Self, ConfigError> {
        let nlayer: i32 = row.read_scalar("nlayer")?;
        let count = layer_count(nlayer)?;
        Ok(Self {
            nlayer: Param::new(nlayer),
            height: Param::new(read_layers(row, "height", count.saturating_add(1))?),
            veg_frac: Param::new(read_layers(row, "veg_frac", count)?),
            veg_scale: Param::new(read_layers(row, "veg_scale", count)?),
            building_frac: Param::new(read_layers(row, "building_frac", count)?),
            building_scale: Param::new(read_layers(row, "building_scale", count)?),
            roofs: (0..count)
                .map(|layer| RoofLayer::from_state(row, layer))
                .collect::<Result<_, _>>()?,
            walls: (0..count)
                .map(|layer| WallLayer::from_state(row, layer))
                .collect::<Result<_, _>>()?,
        })
    }
}

fn read_layers(row: &StateRow, name: &str, count: usize) -> Result<Vec<f64>, ConfigError> {
    (0..count)
        .map(|layer| {
            row.read(name, IndexDescriptor::layer(layer))
                .map_err(ConfigError::from)
        })
        .collect()
}
