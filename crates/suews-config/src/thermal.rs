//! Five-layer thermal stacks of surfaces, roofs and walls.

use serde::{Deserialize, Serialize};

use suews_state::{IndexDescriptor, StateRow};
use suews_types::{Facet, Param};

use crate::ConfigError;

/// Number of layers in every thermal stack.
pub const THERMAL_LAYERS: usize = 5;

/// Thickness, conductivity and volumetric heat capacity of each layer,
/// outermost first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThermalLayers {
    /// Layer thickness [m].
    pub dz: Param<[f64; THERMAL_LAYERS]>,
    /// Thermal conductivity [W m-1 K-1].
    pub k: Param<[f64; THERMAL_LAYERS]>,
    /// Volumetric heat capacity [J m-3 K-1].
    pub cp: Param<[f64; THERMAL_LAYERS]>,
}

impl Default for ThermalLayers {
    fn default() -> Self {
        Self {
            dz: Param::new([0.1, 0.2, 0.3, 0.4, 0.5]),
            k: Param::new([1.0; THERMAL_LAYERS]),
            cp: Param::new([1000.0; THERMAL_LAYERS]),
        }
    }
}

impl ThermalLayers {
    /// Write `dz_{s}`, `k_{s}` and `cp_{s}` at `"(index, i)"` for the five
    /// layers, `s` being the facet suffix.
    pub fn to_state(&self, facet: Facet, index: usize) -> StateRow {
        let (dz, k, cp) = column_names(facet);
        let mut row = StateRow::new();
        let layers = self.dz.value.iter().zip(&self.k.value).zip(&self.cp.value);
        for (layer, ((dz_value, k_value), cp_value)) in layers.enumerate() {
            let at = IndexDescriptor::layer_component(index, layer);
            row.push(&dz, at, *dz_value);
            row.push(&k, at, *k_value);
            row.push(&cp, at, *cp_value);
        }
        row
    }

    /// Read the 15 cells written by [`ThermalLayers::to_state`].
    pub fn from_state(row: &StateRow, facet: Facet, index: usize) -> Result<Self, ConfigError> {
        let (dz, k, cp) = column_names(facet);
        let at = |layer: usize| IndexDescriptor::layer_component(index, layer);
        Ok(Self {
            dz: Param::new(row.read_array(&dz, at)?),
            k: Param::new(row.read_array(&k, at)?),
            cp: Param::new(row.read_array(&cp, at)?),
        })
    }
}

fn column_names(facet: Facet) -> (String, String, String) {
    let suffix = facet.suffix();
    (
        format!("dz_{suffix}"),
        format!("k_{suffix}"),
        format!("cp_{suffix}"),
    )
}
