//! Irrigation scheduling.

use serde::{Deserialize, Serialize};

use suews_state::StateRow;
use suews_types::Param;

use crate::codec::{check_fraction, check_within, StateBlock, Validate};
use crate::profiles::{HourlyProfile, WeeklyProfile};
use crate::ConfigError;

/// When and how much a site irrigates.
///
/// Scalars are stored at `(name, "0")`; the weekly profiles `daywatper` and
/// `daywat` and the hourly profiles `wuprofa_24hr` (automatic) and
/// `wuprofm_24hr` (manual) under their own names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IrrigationParams {
    /// Soil moisture deficit that triggers irrigation.
    pub h_maintain: Param<f64>,
    /// Fraction of irrigated area using automatic irrigation.
    pub faut: Param<f64>,
    /// First day of the irrigation season.
    pub ie_start: Param<f64>,
    /// Last day of the irrigation season.
    pub ie_end: Param<f64>,
    /// Internal water use [mm h-1].
    pub internalwateruse_h: Param<f64>,
    /// Fraction of properties irrigating on each weekday.
    pub daywatper: WeeklyProfile,
    /// Whether irrigation is allowed on each weekday.
    pub daywat: WeeklyProfile,
    /// Hourly profile of automatic irrigation.
    pub wuprofa_24hr: HourlyProfile,
    /// Hourly profile of manual irrigation.
    pub wuprofm_24hr: HourlyProfile,
}

impl Default for IrrigationParams {
    fn default() -> Self {
        Self {
            h_maintain: Param::new(0.5),
            faut: Param::new(0.0),
            ie_start: Param::new(0.0),
            ie_end: Param::new(0.0),
            internalwateruse_h: Param::new(0.0),
            daywatper: WeeklyProfile::default(),
            daywat: WeeklyProfile::default(),
            wuprofa_24hr: HourlyProfile::default(),
            wuprofm_24hr: HourlyProfile::default(),
        }
    }
}

impl Validate for IrrigationParams {
    fn validate(&self) -> Result<(), ConfigError> {
        check_fraction("irrigation.faut", self.faut.value)?;
        check_within("irrigation.ie_start", self.ie_start.value, 0.0, 366.0, "a day of year")?;
        check_within("irrigation.ie_end", self.ie_end.value, 0.0, 366.0, "a day of year")?;
        for (day, value) in self.daywatper.days().into_iter().enumerate() {
            check_fraction(&format!("irrigation.daywatper[{day}]"), value)?;
        }
        Ok(())
    }
}

impl StateBlock for IrrigationParams {
    fn to_state(&self) -> StateRow {
        let mut row = StateRow::new();
        row.scalar("h_maintain", self.h_maintain.value);
        row.scalar("faut", self.faut.value);
        row.scalar("ie_start", self.ie_start.value);
        row.scalar("ie_end", self.ie_end.value);
        row.scalar("internalwateruse_h", self.internalwateruse_h.value);
        row.merge_keep_first(self.daywatper.to_state("daywatper"));
        row.merge_keep_first(self.daywat.to_state("daywat"));
        row.merge_keep_first(self.wuprofa_24hr.to_state("wuprofa_24hr"));
        row.merge_keep_first(self.wuprofm_24hr.to_state("wuprofm_24hr"));
        row
    }

    fn decode(row: &StateRow) -> Result<Self, ConfigError> {
        Ok(Self {
            h_maintain: Param::new(row.read_scalar("h_maintain")?),
            faut: Param::new(row.read_scalar("faut")?),
            ie_start: Param::new(row.read_scalar("ie_start")?),
            ie_end: Param::new(row.read_scalar("ie_end")?),
            internalwateruse_h: Param::new(row.read_scalar("internalwateruse_h")?),
            daywatper: WeeklyProfile::from_state(row, "daywatper")?,
            daywat: WeeklyProfile::from_state(row, "daywat")?,
            wuprofa_24hr: HourlyProfile::from_state(row, "wuprofa_24hr")?,
            wuprofm_24hr: HourlyProfile::from_state(row, "wuprofm_24hr")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_scalars_weeks_and_hours() {
        let row = IrrigationParams::default().to_state();
        assert_eq!(row.len(), 5 + 2 * 7 + 2 * 48);
    }

    #[test]
    fn round_trips_weekly_profiles() {
        let irrigation = IrrigationParams {
            daywatper: WeeklyProfile::from_days([1.0, 1.0, 0.5, 0.5, 0.5, 0.0, 0.0]),
            faut: Param::new(0.3),
            ..IrrigationParams::default()
        };
        let decoded = IrrigationParams::from_state(&irrigation.to_state()).ok();
        assert_eq!(decoded, Some(irrigation));
    }

    #[test]
    fn weekday_fraction_is_bounded() {
        let irrigation = IrrigationParams {
            daywatper: WeeklyProfile::from_days([0.0, 0.0, 1.5, 0.0, 0.0, 0.0, 0.0]),
            ..IrrigationParams::default()
        };
        let err = irrigation.validate().err();
        assert_eq!(
            err.map(|e| e.to_string()).as_deref(),
            Some("irrigation.daywatper[2] = 1.5 must be within [0, 1]")
        );
    }
}
