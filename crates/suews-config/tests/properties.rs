//! Integration tests for the invariants the codec and the validators
//! guarantee.
//!
//! Covers water-distribution normalization, hourly profile completeness,
//! fixed surface indices, vertical layer shape, and keep-first assembly of
//! rows.

// Integration tests use expect/unwrap extensively for clarity -- panicking
// on failure is the correct behavior in test code.
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::float_cmp,
    clippy::indexing_slicing
)]

use std::collections::BTreeMap;

use suews_config::profiles::HourlyProfile;
use suews_config::surface::{BldgsProperties, GrassProperties, PavedProperties, Surface};
use suews_config::vertical::{RoofLayer, VerticalLayers, WallLayer};
use suews_config::water::Outflow;
use suews_config::{ConfigError, Site, StateBlock, Validate};
use suews_state::{ColumnKey, FlatState, IndexDescriptor, StateRow};
use suews_types::{DayType, GridId, Param, SurfaceType};

// ---------------------------------------------------------------------------
// Water distribution
// ---------------------------------------------------------------------------

#[test]
fn paved_defaults_sum_to_one() {
    let paved = PavedProperties::default();
    assert!(paved.validate().is_ok());
    let total: f64 = SurfaceType::ALL
        .iter()
        .filter_map(|target| paved.waterdist.slot(*target).as_ref())
        .map(|p| p.value)
        .sum::<f64>()
        + paved.waterdist.outflow.as_ref().unwrap().fraction().value;
    assert!((total - 1.0).abs() < 1e-12);
}

#[test]
fn distribution_summing_to_097_is_rejected() {
    let mut paved = PavedProperties::default();
    paved.waterdist.outflow = Some(Outflow::ToRunoff(Param::new(0.27)));
    let err = paved.validate().unwrap_err();
    assert!(matches!(
        err,
        ConfigError::UnnormalizedDistribution {
            surface: SurfaceType::Paved,
            total,
        } if (total - 0.97).abs() < 1e-9
    ));
}

#[test]
fn distribution_within_tolerance_is_accepted() {
    let mut paved = PavedProperties::default();
    paved.waterdist.outflow = Some(Outflow::ToRunoff(Param::new(0.300_000_5)));
    assert!(paved.validate().is_ok());
}

#[test]
fn paved_needs_runoff_not_soil_store() {
    let mut paved = PavedProperties::default();
    paved.waterdist.outflow = Some(Outflow::ToSoilStore(Param::new(0.3)));
    assert!(matches!(
        paved.validate(),
        Err(ConfigError::IncompleteDistribution { .. })
    ));
}

// ---------------------------------------------------------------------------
// Hourly profiles
// ---------------------------------------------------------------------------

fn hours(range: core::ops::RangeInclusive<u8>) -> BTreeMap<u8, f64> {
    range.map(|hour| (hour, 1.0 / 24.0)).collect()
}

#[test]
fn profile_missing_hour_24_is_rejected() {
    let err = HourlyProfile::new(&hours(1..=23), &hours(1..=24)).unwrap_err();
    assert!(err.to_string().contains("must have all hours from 1 to 24"));
    assert!(matches!(
        err,
        ConfigError::IncompleteProfile {
            day: DayType::WorkingDay,
            ..
        }
    ));
}

#[test]
fn complete_profile_encodes_to_48_columns() {
    let profile = HourlyProfile::new(&hours(1..=24), &hours(1..=24)).expect("complete");
    let row = profile.to_state("ahprof_24hr");
    assert_eq!(row.len(), 48);
    assert!(row.contains("ahprof_24hr", IndexDescriptor::Pair(23, 1)));
    assert!(!row.contains("ahprof_24hr", IndexDescriptor::Pair(24, 0)));
}

// ---------------------------------------------------------------------------
// Fixed surface indices
// ---------------------------------------------------------------------------

const BASE_SCALARS: [&str; 13] = [
    "sfr_surf",
    "emis",
    "chanohm",
    "cpanohm",
    "kkanohm",
    "ohm_threshsw",
    "ohm_threshwd",
    "soildepth",
    "soilstorecap_surf",
    "statelimit_surf",
    "wetthresh_surf",
    "sathydraulicconduct",
    "snowpacklimit",
];

#[test]
fn buildings_always_decode_from_index_1() {
    let mut bldgs = BldgsProperties::default();
    bldgs.base.sfr = Param::new(0.45);
    let mut row = StateRow::new();
    // A competing value at the paved index must be ignored.
    row.push("sfr_surf", IndexDescriptor::Single(0), 0.9);
    row.merge_keep_first(bldgs.to_state());

    let table = FlatState::from_rows([(GridId(5), row)]).expect("table");
    let stored = table.row(GridId(5)).expect("row");
    let decoded = BldgsProperties::from_state(stored).expect("decode");
    assert_eq!(decoded.base.sfr.value, 0.45);
    assert_eq!(BldgsProperties::SURFACE.index(), 1);
}

#[test]
fn grass_columns_stay_at_index_4() {
    let row = GrassProperties::default().to_state();
    for key in row.keys() {
        let name = key.name.as_str();
        match key.index {
            IndexDescriptor::Single(i) if BASE_SCALARS.contains(&name) => {
                // Thresholds are also padded at index 7.
                assert!(i == 4 || i == 7, "{key}");
            }
            // Vegetation parameters use the vegetation index.
            IndexDescriptor::Single(i) => assert_eq!(i, 2, "{key}"),
            IndexDescriptor::Pair(_, owner) if name == "waterdist" || name == "storedrainprm" => {
                assert_eq!(owner, 4, "{key}");
            }
            IndexDescriptor::Pair(owner, _) if name.ends_with("_surf") => {
                assert_eq!(owner, 4, "{key}");
            }
            IndexDescriptor::Triple(surface, _, _) => {
                assert!(surface == 4 || surface == 7, "{key}");
            }
            _ => {}
        }
    }
    assert!(row.contains("sfr_surf", IndexDescriptor::Single(4)));
    assert!(!row.contains("sfr_surf", IndexDescriptor::Single(7)));
}

// ---------------------------------------------------------------------------
// Vertical layers
// ---------------------------------------------------------------------------

#[test]
fn wall_count_must_match_layer_count() {
    let build = |walls: usize| {
        VerticalLayers::try_new(
            3,
            vec![0.0, 10.0, 20.0, 30.0],
            vec![0.4, 0.3, 0.3],
            vec![RoofLayer::default(); 3],
            vec![WallLayer::default(); walls],
        )
    };
    let err = build(2).unwrap_err();
    assert!(err.to_string().contains("wall layer count mismatch"));
    assert!(build(3).is_ok());
}

#[test]
fn initial_layer_states_follow_the_layers() {
    let mut site = Site::default();
    site.properties.vertical_layers = VerticalLayers::try_new(
        2,
        vec![0.0, 15.0, 30.0],
        vec![0.5, 0.5],
        vec![RoofLayer::default(); 2],
        vec![WallLayer::default(); 2],
    )
    .expect("two layers");
    site.initial_states.roofs.truncate(2);
    site.initial_states.walls.truncate(2);

    let row = site.to_state();
    assert!(row.contains("height", IndexDescriptor::Single(2)));
    assert!(!row.contains("height", IndexDescriptor::Single(3)));

    let decoded = Site::from_state(&row, GridId(0)).expect("decode");
    assert_eq!(decoded.initial_states.roofs.len(), 2);
    assert_eq!(decoded.properties.vertical_layers.roofs.len(), 2);
}

// ---------------------------------------------------------------------------
// Descriptors and keep-first assembly
// ---------------------------------------------------------------------------

#[test]
fn descriptors_render_and_parse() {
    for (raw, descriptor) in [
        ("0", IndexDescriptor::Scalar),
        ("(4,)", IndexDescriptor::Single(4)),
        ("(0, 1)", IndexDescriptor::Pair(0, 1)),
        ("(7, 3, 8)", IndexDescriptor::Triple(7, 3, 8)),
    ] {
        assert_eq!(descriptor.to_string(), raw);
        assert_eq!(raw.parse::<IndexDescriptor>().unwrap(), descriptor);
    }
}

#[test]
fn ohm_padding_keeps_the_first_surface() {
    let mut paved = PavedProperties::default();
    paved.base.ohm_coef.summer_dry.a1 = Param::new(0.11);
    let mut grass = GrassProperties::default();
    grass.base.ohm_coef.summer_dry.a1 = Param::new(0.99);

    let mut row = paved.to_state();
    let dropped = row.merge_keep_first(grass.to_state());
    assert!(dropped > 0);

    let padding = ColumnKey::new("ohm_coef", IndexDescriptor::Triple(7, 0, 0));
    assert_eq!(row.get(&padding), Some(0.11));
    let own = ColumnKey::new("ohm_coef", IndexDescriptor::Triple(4, 0, 0));
    assert_eq!(row.get(&own), Some(0.99));
}
