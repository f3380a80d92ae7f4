//! Model-wide run control and physics method selection.
//!
//! Both are shared by every site of a configuration and are written to
//! every row of the flat table.

use serde::{Deserialize, Serialize};

use suews_state::StateRow;
use suews_types::Param;

use crate::codec::{scalar_block, StateBlock, Validate};
use crate::ConfigError;

// ---------------------------------------------------------------------------
// Control
// ---------------------------------------------------------------------------

/// Time stepping, I/O paths and diagnostics.
///
/// Only `tstep` and `diagnose` are stored in the table; the file paths are
/// document-only and come back as defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelControl {
    /// Time step [s].
    pub tstep: i32,
    /// Meteorological forcing file.
    pub forcing_file: Param<String>,
    /// Output file.
    pub output_file: String,
    /// Diagnostic output level.
    pub diagnose: i32,
}

impl Default for ModelControl {
    fn default() -> Self {
        Self {
            tstep: 300,
            forcing_file: Param::new("forcing.txt".to_owned()),
            output_file: "output.txt".to_owned(),
            diagnose: 0,
        }
    }
}

impl Validate for ModelControl {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.tstep > 0 {
            Ok(())
        } else {
            Err(ConfigError::out_of_range("tstep", f64::from(self.tstep), "greater than 0"))
        }
    }
}

impl StateBlock for ModelControl {
    fn to_state(&self) -> StateRow {
        let mut row = StateRow::new();
        row.scalar("tstep", self.tstep);
        row.scalar("diagnose", self.diagnose);
        row
    }

    fn decode(row: &StateRow) -> Result<Self, ConfigError> {
        Ok(Self {
            tstep: row.read_scalar("tstep")?,
            diagnose: row.read_scalar("diagnose")?,
            ..Self::default()
        })
    }
}

// ---------------------------------------------------------------------------
// Physics
// ---------------------------------------------------------------------------

scalar_block! {
    /// Method selectors of the physics schemes.
    pub struct ModelPhysics {
        /// Net all-wave radiation.
        netradiationmethod: i32 = 3,
        /// Anthropogenic heat and CO2 emissions.
        emissionsmethod: i32 = 2,
        /// Storage heat flux.
        storageheatmethod: i32 = 1,
        /// Whether OHM includes the anthropogenic heat flux.
        ohmincqf: i32 = 0,
        /// Roughness length for momentum.
        roughlenmommethod: i32 = 2,
        /// Roughness length for heat.
        roughlenheatmethod: i32 = 2,
        /// Atmospheric stability functions.
        stabilitymethod: i32 = 2,
        /// Soil moisture deficit.
        smdmethod: i32 = 1,
        /// External water use.
        waterusemethod: i32 = 1,
        /// Near-surface diagnostics.
        diagmethod: i32 = 1,
        /// Frontal area index.
        faimethod: i32 = 1,
        /// Local climate adjustments.
        localclimatemethod: i32 = 0,
        /// Snow scheme switch.
        snowuse: i32 = 0,
        /// Building energy model.
        stebbsmethod: i32 = 0,
    }
}

/// Value of `ohmincqf` each storage heat method requires.
const OHM_QF_REQUIREMENTS: [(i32, i32); 2] = [(1, 0), (2, 1)];

impl Validate for ModelPhysics {
    fn validate(&self) -> Result<(), ConfigError> {
        let storage = self.storageheatmethod.value;
        let ohmincqf = self.ohmincqf.value;
        if let Some((_, required)) = OHM_QF_REQUIREMENTS
            .iter()
            .find(|(method, required)| *method == storage && *required != ohmincqf)
        {
            return Err(ConfigError::MethodConflict {
                field: "storageheatmethod",
                value: storage,
                dependent: "ohmincqf",
                required: *required,
                actual: ohmincqf,
            });
        }
        if self.snowuse.value == 1 {
            return Err(ConfigError::UnsupportedMethod {
                field: "snowuse",
                value: 1,
            });
        }
        if self.emissionsmethod.value == 45 {
            return Err(ConfigError::UnsupportedMethod {
                field: "emissionsmethod",
                value: 45,
            });
        }
        Ok(())
    }
}

/// Run control and physics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Model {
    /// Run control.
    pub control: ModelControl,
    /// Physics methods.
    pub physics: ModelPhysics,
}

impl Validate for Model {
    fn validate(&self) -> Result<(), ConfigError> {
        self.control.validate()?;
        self.physics.validate()
    }
}

impl StateBlock for Model {
    fn to_state(&self) -> StateRow {
        let mut row = self.control.to_state();
        row.merge_keep_first(self.physics.to_state());
        row
    }

    fn decode(row: &StateRow) -> Result<Self, ConfigError> {
        Ok(Self {
            control: ModelControl::decode(row)?,
            physics: ModelPhysics::decode(row)?,
        })
    }
}
