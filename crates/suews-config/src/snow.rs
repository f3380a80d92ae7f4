//! Snow accumulation, ageing and melt parameters.

use serde::{Deserialize, Serialize};

use suews_state::StateRow;
use suews_types::Param;

use crate::codec::{check_at_least, check_fraction, check_order, StateBlock, Validate};
use crate::profiles::HourlyProfile;
use crate::ConfigError;

/// Column of the hourly snow clearing profile.
const PROFILE: &str = "snowprof_24hr";

/// Snow parameters of a site. All scalars are stored at `(name, "0")`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnowParams {
    /// Maximum water holding capacity of snow.
    pub crwmax: Param<f64>,
    /// Minimum water holding capacity of snow.
    pub crwmin: Param<f64>,
    /// Emissivity of snow.
    pub narp_emis_snow: Param<f64>,
    /// Temperature limit between snow and rain [degC].
    pub preciplimit: Param<f64>,
    /// Snowfall that resets the snow albedo [mm].
    pub preciplimitalb: Param<f64>,
    /// Albedo of fresh snow.
    pub snowalbmax: Param<f64>,
    /// Albedo of aged snow.
    pub snowalbmin: Param<f64>,
    /// Density of fresh snow [kg m-3].
    pub snowdensmin: Param<f64>,
    /// Density of aged snow [kg m-3].
    pub snowdensmax: Param<f64>,
    /// Snow water equivalent cleared from roofs [mm].
    pub snowlimbldg: Param<f64>,
    /// Snow water equivalent cleared from paved surfaces [mm].
    pub snowlimpaved: Param<f64>,
    /// Hourly snow clearing profile.
    pub snowprof_24hr: HourlyProfile,
    /// Ageing of cold snow.
    pub tau_a: Param<f64>,
    /// Ageing of melting snow.
    pub tau_f: Param<f64>,
    /// Ageing of refreezing snow.
    pub tau_r: Param<f64>,
    /// Temperature melt factor [mm K-1 h-1].
    pub tempmeltfact: Param<f64>,
    /// Radiation melt factor [mm W-1 m2 h-1].
    pub radmeltfact: Param<f64>,
}

impl Default for SnowParams {
    fn default() -> Self {
        Self {
            crwmax: Param::new(0.1),
            crwmin: Param::new(0.05),
            narp_emis_snow: Param::new(0.99),
            preciplimit: Param::new(2.2),
            preciplimitalb: Param::new(0.1),
            snowalbmax: Param::new(0.85),
            snowalbmin: Param::new(0.4),
            snowdensmin: Param::new(100.0),
            snowdensmax: Param::new(400.0),
            snowlimbldg: Param::new(0.1),
            snowlimpaved: Param::new(0.1),
            snowprof_24hr: HourlyProfile::default(),
            tau_a: Param::new(0.018),
            tau_f: Param::new(0.11),
            tau_r: Param::new(0.05),
            tempmeltfact: Param::new(0.12),
            radmeltfact: Param::new(0.0016),
        }
    }
}

impl SnowParams {
    const fn scalars(&self) -> [(&'static str, f64); 16] {
        [
            ("crwmax", self.crwmax.value),
            ("crwmin", self.crwmin.value),
            ("narp_emis_snow", self.narp_emis_snow.value),
            ("preciplimit", self.preciplimit.value),
            ("preciplimitalb", self.preciplimitalb.value),
            ("snowalbmax", self.snowalbmax.value),
            ("snowalbmin", self.snowalbmin.value),
            ("snowdensmin", self.snowdensmin.value),
            ("snowdensmax", self.snowdensmax.value),
            ("snowlimbldg", self.snowlimbldg.value),
            ("snowlimpaved", self.snowlimpaved.value),
            ("tau_a", self.tau_a.value),
            ("tau_f", self.tau_f.value),
            ("tau_r", self.tau_r.value),
            ("tempmeltfact", self.tempmeltfact.value),
            ("radmeltfact", self.radmeltfact.value),
        ]
    }
}

impl Validate for SnowParams {
    fn validate(&self) -> Result<(), ConfigError> {
        check_order(("crwmin", self.crwmin.value), ("crwmax", self.crwmax.value), true)?;
        check_order(
            ("snowalbmin", self.snowalbmin.value),
            ("snowalbmax", self.snowalbmax.value),
            true,
        )?;
        check_fraction("snow.snowalbmax", self.snowalbmax.value)?;
        check_fraction("snow.narp_emis_snow", self.narp_emis_snow.value)?;
        check_at_least("snow.snowdensmin", self.snowdensmin.value, 0.0, "non-negative")
    }
}

impl StateBlock for SnowParams {
    fn to_state(&self) -> StateRow {
        let mut row = StateRow::new();
        for (name, value) in self.scalars() {
            row.scalar(name, value);
        }
        row.merge_keep_first(self.snowprof_24hr.to_state(PROFILE));
        row
    }

    fn decode(row: &StateRow) -> Result<Self, ConfigError> {
        let read = |name: &str| -> Result<Param<f64>, ConfigError> {
            Ok(Param::new(row.read_scalar(name)?))
        };
        Ok(Self {
            crwmax: read("crwmax")?,
            crwmin: read("crwmin")?,
            narp_emis_snow: read("narp_emis_snow")?,
            preciplimit: read("preciplimit")?,
            preciplimitalb: read("preciplimitalb")?,
            snowalbmax: read("snowalbmax")?,
            snowalbmin: read("snowalbmin")?,
            snowdensmin: read("snowdensmin")?,
            snowdensmax: read("snowdensmax")?,
            snowlimbldg: read("snowlimbldg")?,
            snowlimpaved: read("snowlimpaved")?,
            snowprof_24hr: HourlyProfile::from_state(row, PROFILE)?,
            tau_a: read("tau_a")?,
            tau_f: read("tau_f")?,
            tau_r: read("tau_r")?,
            tempmeltfact: read("tempmeltfact")?,
            radmeltfact: read("radmeltfact")?,
        })
    }
}
