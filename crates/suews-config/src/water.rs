//! Surface water redistribution.
//!
//! Water leaving a surface is split between the other six surfaces and one
//! outflow: runoff for paved and building surfaces, the soil store for the
//! rest. The table has a single slot for the outflow, so the two meanings
//! are one [`Outflow`] value here and decoding recovers which one was meant
//! from the surface's defaults.

use serde::{Deserialize, Serialize};

use suews_state::{IndexDescriptor, StateRow};
use suews_types::{Param, SurfaceType};

use crate::codec::check_fraction;
use crate::ConfigError;

/// Table name of the distribution matrix.
const COLUMN: &str = "waterdist";

/// Slot of the outflow in the distribution matrix.
const OUTFLOW_SLOT: usize = 7;

/// Relative tolerance of the sum-to-one check.
const SUM_TOLERANCE: f64 = 1e-5;

/// Where water that is not passed to another surface goes.
#[derive(Debug, Clone, PartialEq)]
pub enum Outflow {
    /// Infiltrates into the surface's soil store.
    ToSoilStore(Param<f64>),
    /// Leaves the grid as runoff.
    ToRunoff(Param<f64>),
}

impl Outflow {
    /// Fraction routed to the outflow.
    pub const fn fraction(&self) -> &Param<f64> {
        match self {
            Self::ToSoilStore(p) | Self::ToRunoff(p) => p,
        }
    }

    /// Document key of the outflow.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ToSoilStore(_) => "to_soilstore",
            Self::ToRunoff(_) => "to_runoff",
        }
    }
}

/// Fractions of a surface's water passed to each destination.
///
/// Built anonymously (no defaults, no validation) with `Default`, or for a
/// known surface with [`WaterDistribution::with_defaults`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WaterDistributionDoc", into = "WaterDistributionDoc")]
pub struct WaterDistribution {
    /// To paved surfaces.
    pub to_paved: Option<Param<f64>>,
    /// To buildings.
    pub to_bldgs: Option<Param<f64>>,
    /// To evergreen trees.
    pub to_evetr: Option<Param<f64>>,
    /// To deciduous trees.
    pub to_dectr: Option<Param<f64>>,
    /// To grass.
    pub to_grass: Option<Param<f64>>,
    /// To bare soil.
    pub to_bsoil: Option<Param<f64>>,
    /// To water.
    pub to_water: Option<Param<f64>>,
    /// To the soil store or to runoff.
    pub outflow: Option<Outflow>,
}

impl WaterDistribution {
    /// Default distribution of a surface. Empty for water.
    pub fn defaults_for(surface: SurfaceType) -> Self {
        let mut dist = Self::default();
        if surface == SurfaceType::Water {
            return dist;
        }
        for target in SurfaceType::ALL {
            if target != surface {
                *dist.slot_mut(target) = Some(Param::new(0.1));
            }
        }
        match surface {
            SurfaceType::Paved => {
                dist.to_bldgs = Some(Param::new(0.2));
                dist.outflow = Some(Outflow::ToRunoff(Param::new(0.3)));
            }
            SurfaceType::Bldgs => {
                dist.to_paved = Some(Param::new(0.2));
                dist.outflow = Some(Outflow::ToRunoff(Param::new(0.3)));
            }
            _ => dist.outflow = Some(Outflow::ToSoilStore(Param::new(0.4))),
        }
        dist
    }

    /// Fill every unset destination from the surface defaults, then
    /// validate.
    ///
    /// # Errors
    ///
    /// See [`WaterDistribution::validate`].
    pub fn with_defaults(mut self, surface: SurfaceType) -> Result<Self, ConfigError> {
        let defaults = Self::defaults_for(surface);
        for target in SurfaceType::ALL {
            let slot = self.slot_mut(target);
            if slot.is_none() {
                slot.clone_from(defaults.slot(target));
            }
        }
        if self.outflow.is_none() {
            self.outflow = defaults.outflow;
        }
        self.validate(surface)?;
        Ok(self)
    }

    /// Fraction passed to `target`.
    pub const fn slot(&self, target: SurfaceType) -> &Option<Param<f64>> {
        match target {
            SurfaceType::Paved => &self.to_paved,
            SurfaceType::Bldgs => &self.to_bldgs,
            SurfaceType::Evetr => &self.to_evetr,
            SurfaceType::Dectr => &self.to_dectr,
            SurfaceType::Grass => &self.to_grass,
            SurfaceType::Bsoil => &self.to_bsoil,
            SurfaceType::Water => &self.to_water,
        }
    }

    /// Mutable fraction passed to `target`.
    pub const fn slot_mut(&mut self, target: SurfaceType) -> &mut Option<Param<f64>> {
        match target {
            SurfaceType::Paved => &mut self.to_paved,
            SurfaceType::Bldgs => &mut self.to_bldgs,
            SurfaceType::Evetr => &mut self.to_evetr,
            SurfaceType::Dectr => &mut self.to_dectr,
            SurfaceType::Grass => &mut self.to_grass,
            SurfaceType::Bsoil => &mut self.to_bsoil,
            SurfaceType::Water => &mut self.to_water,
        }
    }

    /// Check the distribution of `surface`.
    ///
    /// Every destination other than the surface itself is required, plus
    /// runoff for paved and building surfaces or the soil store for the
    /// others. Set fractions must lie in `[0, 1]` and the required ones must
    /// sum to one within a relative tolerance of 1e-5.
    ///
    /// # Errors
    ///
    /// [`ConfigError::DistributionNotApplicable`] for water,
    /// [`ConfigError::IncompleteDistribution`],
    /// [`ConfigError::OutOfRange`] or
    /// [`ConfigError::UnnormalizedDistribution`] otherwise.
    pub fn validate(&self, surface: SurfaceType) -> Result<(), ConfigError> {
        if surface == SurfaceType::Water {
            return Err(ConfigError::DistributionNotApplicable { surface });
        }

        let mut total = 0.0;
        for target in SurfaceType::ALL {
            let Some(fraction) = self.slot(target) else {
                if target == surface {
                    continue;
                }
                return Err(ConfigError::IncompleteDistribution {
                    surface,
                    missing: destination_name(target),
                });
            };
            let field = format!("{surface}.waterdist.{}", destination_name(target));
            check_fraction(&field, fraction.value)?;
            if target != surface {
                total += fraction.value;
            }
        }

        let needs_runoff = matches!(surface, SurfaceType::Paved | SurfaceType::Bldgs);
        let outflow = match &self.outflow {
            Some(outflow @ Outflow::ToRunoff(_)) if needs_runoff => outflow,
            Some(outflow @ Outflow::ToSoilStore(_)) if !needs_runoff => outflow,
            _ => {
                return Err(ConfigError::IncompleteDistribution {
                    surface,
                    missing: required_outflow(surface),
                });
            }
        };
        let field = format!("{surface}.waterdist.{}", outflow.name());
        check_fraction(&field, outflow.fraction().value)?;
        total += outflow.fraction().value;

        if (total - 1.0).abs() > SUM_TOLERANCE * total.abs().max(1.0) {
            return Err(ConfigError::UnnormalizedDistribution { surface, total });
        }
        Ok(())
    }

    /// Write the eight cells `("waterdist", "(i, s)")`.
    ///
    /// Slots 0 to 6 are the destination surfaces and slot 7 the outflow;
    /// unset fractions are written as 0.
    pub fn to_state(&self, surface: SurfaceType) -> StateRow {
        let mut row = StateRow::new();
        let owner = surface.index();
        for target in SurfaceType::ALL {
            let value = self.slot(target).as_ref().map_or(0.0, |p| p.value);
            row.push(COLUMN, IndexDescriptor::pair(target.index(), owner), value);
        }
        let outflow = self.outflow.as_ref().map_or(0.0, |o| o.fraction().value);
        row.push(COLUMN, IndexDescriptor::pair(OUTFLOW_SLOT, owner), outflow);
        row
    }

    /// Read the distribution of `surface`.
    ///
    /// Starts from the surface defaults and overwrites only the destinations
    /// those defaults define. The outflow slot takes the kind of the default
    /// outflow, the soil store when there is none. The result is validated.
    pub fn from_state(row: &StateRow, surface: SurfaceType) -> Result<Self, ConfigError> {
        let owner = surface.index();
        let mut dist = Self::defaults_for(surface);
        for target in SurfaceType::ALL {
            let value: f64 = row.read(COLUMN, IndexDescriptor::pair(target.index(), owner))?;
            let slot = dist.slot_mut(target);
            if slot.is_some() {
                *slot = Some(Param::new(value));
            }
        }
        let outflow = Param::new(row.read(COLUMN, IndexDescriptor::pair(OUTFLOW_SLOT, owner))?);
        dist.outflow = Some(match dist.outflow {
            Some(Outflow::ToRunoff(_)) => Outflow::ToRunoff(outflow),
            Some(Outflow::ToSoilStore(_)) | None => Outflow::ToSoilStore(outflow),
        });
        dist.validate(surface)?;
        Ok(dist)
    }
}

const fn destination_name(target: SurfaceType) -> &'static str {
    match target {
        SurfaceType::Paved => "to_paved",
        SurfaceType::Bldgs => "to_bldgs",
        SurfaceType::Evetr => "to_evetr",
        SurfaceType::Dectr => "to_dectr",
        SurfaceType::Grass => "to_grass",
        SurfaceType::Bsoil => "to_bsoil",
        SurfaceType::Water => "to_water",
    }
}

const fn required_outflow(surface: SurfaceType) -> &'static str {
    match surface {
        SurfaceType::Paved | SurfaceType::Bldgs => "to_runoff",
        _ => "to_soilstore",
    }
}

// ---------------------------------------------------------------------------
// Document form
// ---------------------------------------------------------------------------

/// Serialized shape of a [`WaterDistribution`]: the outflow is written as
/// whichever of `to_soilstore` or `to_runoff` it is.
#[derive(Default, Serialize, Deserialize)]
#[serde(default)]
struct WaterDistributionDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    to_paved: Option<Param<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    to_bldgs: Option<Param<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    to_evetr: Option<Param<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    to_dectr: Option<Param<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    to_grass: Option<Param<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    to_bsoil: Option<Param<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    to_water: Option<Param<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    to_soilstore: Option<Param<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    to_runoff: Option<Param<f64>>,
}

impl TryFrom<WaterDistributionDoc> for WaterDistribution {
    type Error = ConfigError;

    fn try_from(doc: WaterDistributionDoc) -> Result<Self, Self::Error> {
        let outflow = match (doc.to_soilstore, doc.to_runoff) {
            (Some(_), Some(_)) => return Err(ConfigError::ConflictingOutflow),
            (Some(p), None) => Some(Outflow::ToSoilStore(p)),
            (None, Some(p)) => Some(Outflow::ToRunoff(p)),
            (None, None) => None,
        };
        Ok(Self {
            to_paved: doc.to_paved,
            to_bldgs: doc.to_bldgs,
            to_evetr: doc.to_evetr,
            to_dectr: doc.to_dectr,
            to_grass: doc.to_grass,
            to_bsoil: doc.to_bsoil,
            to_water: doc.to_water,
            outflow,
        })
    }
}

impl From<WaterDistribution> for WaterDistributionDoc {
    fn from(dist: WaterDistribution) -> Self {
        let (to_soilstore, to_runoff) = match dist.outflow {
            Some(Outflow::ToSoilStore(p)) => (Some(p), None),
            Some(Outflow::ToRunoff(p)) => (None, Some(p)),
            None => (None, None),
        };
        Self {
            to_paved: dist.to_paved,
            to_bldgs: dist.to_bldgs,
            to_evetr: dist.to_evetr,
            to_dectr: dist.to_dectr,
            to_grass: dist.to_grass,
            to_bsoil: dist.to_bsoil,
            to_water: dist.to_water,
            to_soilstore,
            to_runoff,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_normalized_for_every_land_surface() {
        for surface in SurfaceType::ALL {
            let dist = WaterDistribution::defaults_for(surface);
            if surface == SurfaceType::Water {
                assert_eq!(dist, WaterDistribution::default());
            } else {
                assert!(dist.validate(surface).is_ok(), "{surface}");
            }
        }
    }

    #[test]
    fn paved_defaults_route_to_runoff() {
        let dist = WaterDistribution::defaults_for(SurfaceType::Paved);
        assert_eq!(dist.to_paved, None);
        assert_eq!(dist.to_bldgs, Some(Param::new(0.2)));
        assert_eq!(dist.outflow, Some(Outflow::ToRunoff(Param::new(0.3))));
    }

    #[test]
    fn sum_of_097_is_rejected() {
        let mut dist = WaterDistribution::defaults_for(SurfaceType::Paved);
        dist.outflow = Some(Outflow::ToRunoff(Param::new(0.27)));
        assert!(matches!(
            dist.validate(SurfaceType::Paved),
            Err(ConfigError::UnnormalizedDistribution { .. })
        ));
    }

    #[test]
    fn water_has_no_distribution() {
        assert!(matches!(
            WaterDistribution::default().with_defaults(SurfaceType::Water),
            Err(ConfigError::DistributionNotApplicable { .. })
        ));
    }

    #[test]
    fn wrong_outflow_kind_is_incomplete() {
        let mut dist = WaterDistribution::defaults_for(SurfaceType::Bldgs);
        dist.outflow = Some(Outflow::ToSoilStore(Param::new(0.3)));
        let err = dist.validate(SurfaceType::Bldgs).err();
        assert_eq!(
            err.map(|e| e.to_string()).as_deref(),
            Some("incomplete water distribution for bldgs: to_runoff is not set")
        );
    }

    #[test]
    fn with_defaults_keeps_explicit_values() {
        let partial = WaterDistribution {
            to_paved: Some(Param::new(0.2)),
            to_bldgs: Some(Param::new(0.0)),
            ..WaterDistribution::default()
        };
        let dist = partial.with_defaults(SurfaceType::Grass);
        assert!(dist.is_ok());
        let dist = dist.unwrap_or_default();
        assert_eq!(dist.to_paved, Some(Param::new(0.2)));
        assert_eq!(dist.to_bldgs, Some(Param::new(0.0)));
        assert_eq!(dist.to_evetr, Some(Param::new(0.1)));
        assert_eq!(dist.to_grass, None);
        assert_eq!(dist.outflow, Some(Outflow::ToSoilStore(Param::new(0.4))));
    }

    #[test]
    fn with_defaults_rejects_a_partial_that_overshoots() {
        let partial = WaterDistribution {
            to_paved: Some(Param::new(0.3)),
            to_bldgs: Some(Param::new(0.0)),
            ..WaterDistribution::default()
        };
        assert!(matches!(
            partial.with_defaults(SurfaceType::Grass),
            Err(ConfigError::UnnormalizedDistribution {
                surface: SurfaceType::Grass,
                total,
            }) if (total - 1.1).abs() < 1e-9
        ));
    }

    #[test]
    fn encodes_eight_slots_with_outflow_last() {
        let row = WaterDistribution::defaults_for(SurfaceType::Evetr).to_state(SurfaceType::Evetr);
        assert_eq!(row.len(), 8);
        assert_eq!(row.read::<f64>("waterdist", IndexDescriptor::Pair(2, 2)).ok(), Some(0.0));
        assert_eq!(row.read::<f64>("waterdist", IndexDescriptor::Pair(7, 2)).ok(), Some(0.4));
    }

    #[test]
    fn decode_restores_outflow_kind() {
        for surface in [SurfaceType::Paved, SurfaceType::Bsoil] {
            let dist = WaterDistribution::defaults_for(surface);
            let decoded = WaterDistribution::from_state(&dist.to_state(surface), surface);
            assert_eq!(decoded.ok(), Some(dist));
        }
    }

    #[test]
    fn document_rejects_two_outflows() {
        let parsed: Result<WaterDistribution, _> =
            serde_json::from_str(r#"{"to_soilstore": 0.2, "to_runoff": 0.2}"#);
        assert!(parsed.is_err());

        let parsed: Result<WaterDistribution, _> =
            serde_json::from_str(r#"{"to_runoff": {"value": 0.3}, "to_bldgs": 0.2}"#);
        let parsed = parsed.ok();
        assert_eq!(
            parsed.as_ref().and_then(|d| d.outflow.clone()),
            Some(Outflow::ToRunoff(Param::new(0.3)))
        );
    }
}
