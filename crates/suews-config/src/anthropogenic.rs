//! Anthropogenic heat and CO2 emissions.
//!
//! Most parameters differ between working days and holidays and are held as
//! [`DayProfile`]s; diurnal cycles are [`HourlyProfile`]s. Each profile is
//! written under its own parameter name.

use serde::{Deserialize, Serialize};

use suews_state::StateRow;
use suews_types::Param;

use crate::codec::{
    check_at_least, check_fraction, check_order, check_within, StateBlock, Validate,
};
use crate::profiles::{DayProfile, HourlyProfile};
use crate::ConfigError;

// ---------------------------------------------------------------------------
// Heat
// ---------------------------------------------------------------------------

/// Anthropogenic heat flux model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnthropogenicHeat {
    /// Base flux from buildings, equipment and metabolism [W m-2].
    pub qf0_beu: DayProfile,
    /// Coefficient a of the flux model.
    pub qf_a: DayProfile,
    /// Coefficient b of the flux model.
    pub qf_b: DayProfile,
    /// Coefficient c of the flux model.
    pub qf_c: DayProfile,
    /// Base temperature of cooling degree days [degC].
    pub baset_cooling: DayProfile,
    /// Base temperature of heating degree days [degC].
    pub baset_heating: DayProfile,
    /// Minimum flux [W m-2].
    pub ah_min: DayProfile,
    /// Flux per cooling degree day.
    pub ah_slope_cooling: DayProfile,
    /// Flux per heating degree day.
    pub ah_slope_heating: DayProfile,
    /// Hourly profile of the flux.
    pub ahprof_24hr: HourlyProfile,
    /// Daytime population density [ha-1].
    pub popdensdaytime: DayProfile,
    /// Night-time population density [ha-1].
    pub popdensnighttime: f64,
    /// Hourly profile of population.
    pub popprof_24hr: HourlyProfile,
}

impl Default for AnthropogenicHeat {
    fn default() -> Self {
        Self {
            qf0_beu: DayProfile::default(),
            qf_a: DayProfile::default(),
            qf_b: DayProfile::default(),
            qf_c: DayProfile::default(),
            baset_cooling: DayProfile::default(),
            baset_heating: DayProfile::default(),
            ah_min: DayProfile::default(),
            ah_slope_cooling: DayProfile::default(),
            ah_slope_heating: DayProfile::default(),
            ahprof_24hr: HourlyProfile::default(),
            popdensdaytime: DayProfile::default(),
            popdensnighttime: 10.0,
            popprof_24hr: HourlyProfile::default(),
        }
    }
}

impl AnthropogenicHeat {
    const fn day_profiles(&self) -> [(&'static str, &DayProfile); 10] {
        [
            ("qf0_beu", &self.qf0_beu),
            ("qf_a", &self.qf_a),
            ("qf_b", &self.qf_b),
            ("qf_c", &self.qf_c),
            ("baset_cooling", &self.baset_cooling),
            ("baset_heating", &self.baset_heating),
            ("ah_min", &self.ah_min),
            ("ah_slope_cooling", &self.ah_slope_cooling),
            ("ah_slope_heating", &self.ah_slope_heating),
            ("popdensdaytime", &self.popdensdaytime),
        ]
    }
}

impl Validate for AnthropogenicHeat {
    fn validate(&self) -> Result<(), ConfigError> {
        check_at_least("heat.popdensnighttime", self.popdensnighttime, 0.0, "non-negative")?;
        check_at_least(
            "heat.popdensdaytime.working_day",
            self.popdensdaytime.working_day,
            0.0,
            "non-negative",
        )?;
        check_at_least(
            "heat.popdensdaytime.holiday",
            self.popdensdaytime.holiday,
            0.0,
            "non-negative",
        )
    }
}

impl StateBlock for AnthropogenicHeat {
    fn to_state(&self) -> StateRow {
        let mut row = StateRow::new();
        for (name, profile) in self.day_profiles() {
            row.merge_keep_first(profile.to_state(name));
        }
        row.merge_keep_first(self.ahprof_24hr.to_state("ahprof_24hr"));
        row.merge_keep_first(self.popprof_24hr.to_state("popprof_24hr"));
        row.scalar("popdensnighttime", self.popdensnighttime);
        row
    }

    fn decode(row: &StateRow) -> Result<Self, ConfigError> {
        let day = |name: &str| DayProfile::from_state(row, name);
        Ok(Self {
            qf0_beu: day("qf0_beu")?,
            qf_a: day("qf_a")?,
            qf_b: day("qf_b")?,
            qf_c: day("qf_c")?,
            baset_cooling: day("baset_cooling")?,
            baset_heating: day("baset_heating")?,
            ah_min: day("ah_min")?,
            ah_slope_cooling: day("ah_slope_cooling")?,
            ah_slope_heating: day("ah_slope_heating")?,
            ahprof_24hr: HourlyProfile::from_state(row, "ahprof_24hr")?,
            popdensdaytime: day("popdensdaytime")?,
            popdensnighttime: row.read_scalar("popdensnighttime")?,
            popprof_24hr: HourlyProfile::from_state(row, "popprof_24hr")?,
        })
    }
}

// ---------------------------------------------------------------------------
// CO2
// ---------------------------------------------------------------------------

/// Anthropogenic CO2 emission model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Co2Params {
    /// Point source emissions [umol m-2 s-1].
    pub co2pointsource: Param<f64>,
    /// CO2 emitted per unit of energy from fuel [umol J-1].
    pub ef_umolco2perj: Param<f64>,
    /// Energy released per vehicle distance [J km-1].
    pub enef_v_jkm: Param<f64>,
    /// CO2 emitted per vehicle distance [kg km-1].
    pub fcef_v_kgkm: DayProfile,
    /// Fossil fuel fraction of heating.
    pub frfossilfuel_heat: Param<f64>,
    /// Fossil fuel fraction of non-heating.
    pub frfossilfuel_nonheat: Param<f64>,
    /// Maximum metabolic CO2 release [umol m-2 s-1].
    pub maxfcmetab: Param<f64>,
    /// Maximum metabolic heat release [W m-2].
    pub maxqfmetab: Param<f64>,
    /// Minimum metabolic CO2 release [umol m-2 s-1].
    pub minfcmetab: Param<f64>,
    /// Minimum metabolic heat release [W m-2].
    pub minqfmetab: Param<f64>,
    /// Traffic rate.
    pub trafficrate: DayProfile,
    /// Units of the traffic rate.
    pub trafficunits: Param<f64>,
    /// Hourly profile of traffic.
    pub traffprof_24hr: HourlyProfile,
    /// Hourly profile of human activity.
    pub humactivity_24hr: HourlyProfile,
}

impl Default for Co2Params {
    fn default() -> Self {
        Self {
            co2pointsource: Param::new(0.0),
            ef_umolco2perj: Param::new(0.0),
            enef_v_jkm: Param::new(0.0),
            fcef_v_kgkm: DayProfile::default(),
            frfossilfuel_heat: Param::new(0.0),
            frfossilfuel_nonheat: Param::new(0.0),
            maxfcmetab: Param::new(0.0),
            maxqfmetab: Param::new(0.0),
            minfcmetab: Param::new(0.0),
            minqfmetab: Param::new(0.0),
            trafficrate: DayProfile::default(),
            trafficunits: Param::new(0.0),
            traffprof_24hr: HourlyProfile::default(),
            humactivity_24hr: HourlyProfile::default(),
        }
    }
}

impl Co2Params {
    const fn scalars(&self) -> [(&'static str, f64); 10] {
        [
            ("co2pointsource", self.co2pointsource.value),
            ("ef_umolco2perj", self.ef_umolco2perj.value),
            ("enef_v_jkm", self.enef_v_jkm.value),
            ("frfossilfuel_heat", self.frfossilfuel_heat.value),
            ("frfossilfuel_nonheat", self.frfossilfuel_nonheat.value),
            ("maxfcmetab", self.maxfcmetab.value),
            ("maxqfmetab", self.maxqfmetab.value),
            ("minfcmetab", self.minfcmetab.value),
            ("minqfmetab", self.minqfmetab.value),
            ("trafficunits", self.trafficunits.value),
        ]
    }
}

impl Validate for Co2Params {
    fn validate(&self) -> Result<(), ConfigError> {
        check_fraction("co2.frfossilfuel_heat", self.frfossilfuel_heat.value)?;
        check_fraction("co2.frfossilfuel_nonheat", self.frfossilfuel_nonheat.value)?;
        check_order(
            ("minqfmetab", self.minqfmetab.value),
            ("maxqfmetab", self.maxqfmetab.value),
            false,
        )
    }
}

impl StateBlock for Co2Params {
    fn to_state(&self) -> StateRow {
        let mut row = StateRow::new();
        for (name, value) in self.scalars() {
            row.scalar(name, value);
        }
        row.merge_keep_first(self.fcef_v_kgkm.to_state("fcef_v_kgkm"));
        row.merge_keep_first(self.trafficrate.to_state("trafficrate"));
        row.merge_keep_first(self.traffprof_24hr.to_state("traffprof_24hr"));
        row.merge_keep_first(self.humactivity_24hr.to_state("humactivity_24hr"));
        row
    }

    fn decode(row: &StateRow) -> Result<Self, ConfigError> {
        let read = |name: &str| -> Result<Param<f64>, ConfigError> {
            Ok(Param::new(row.read_scalar(name)?))
        };
        Ok(Self {
            co2pointsource: read("co2pointsource")?,
            ef_umolco2perj: read("ef_umolco2perj")?,
            enef_v_jkm: read("enef_v_jkm")?,
            fcef_v_kgkm: DayProfile::from_state(row, "fcef_v_kgkm")?,
            frfossilfuel_heat: read("frfossilfuel_heat")?,
            frfossilfuel_nonheat: read("frfossilfuel_nonheat")?,
            maxfcmetab: read("maxfcmetab")?,
            maxqfmetab: read("maxqfmetab")?,
            minfcmetab: read("minfcmetab")?,
            minqfmetab: read("minqfmetab")?,
            trafficrate: DayProfile::from_state(row, "trafficrate")?,
            trafficunits: read("trafficunits")?,
            traffprof_24hr: HourlyProfile::from_state(row, "traffprof_24hr")?,
            humactivity_24hr: HourlyProfile::from_state(row, "humactivity_24hr")?,
        })
    }
}

// ---------------------------------------------------------------------------
// Emissions
// ---------------------------------------------------------------------------

/// Daylight saving period plus the heat and CO2 models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnthropogenicEmissions {
    /// Start of daylight saving, day of year.
    pub startdls: Param<f64>,
    /// End of daylight saving, day of year.
    pub enddls: Param<f64>,
    /// Heat emissions.
    pub heat: AnthropogenicHeat,
    /// CO2 emissions.
    pub co2: Co2Params,
}

impl Default for AnthropogenicEmissions {
    fn default() -> Self {
        Self {
            startdls: Param::new(0.0),
            enddls: Param::new(0.0),
            heat: AnthropogenicHeat::default(),
            co2: Co2Params::default(),
        }
    }
}

impl Validate for AnthropogenicEmissions {
    fn validate(&self) -> Result<(), ConfigError> {
        check_within("startdls", self.startdls.value, 0.0, 366.0, "a day of year")?;
        check_within("enddls", self.enddls.value, 0.0, 366.0, "a day of year")?;
        self.heat.validate()?;
        self.co2.validate()
    }
}

impl StateBlock for AnthropogenicEmissions {
    fn to_state(&self) -> StateRow {
        let mut row = StateRow::new();
        row.scalar("startdls", self.startdls.value);
        row.scalar("enddls", self.enddls.value);
        row.merge_keep_first(self.heat.to_state());
        row.merge_keep_first(self.co2.to_state());
        row
    }

    fn decode(row: &StateRow) -> Result<Self, ConfigError> {
        Ok(Self {
            startdls: Param::new(row.read_scalar("startdls")?),
            enddls: Param::new(row.read_scalar("enddls")?),
            heat: AnthropogenicHeat::decode(row)?,
            co2: Co2Params::decode(row)?,
        })
    }
}
