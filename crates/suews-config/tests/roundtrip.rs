//! Integration tests for the whole-configuration codec.
//!
//! Encodes complete configurations into the flat table and rebuilds them,
//! checking that values survive, that re-encoding is stable, and that each
//! site lands on its own row.

// Integration tests use expect/unwrap extensively for clarity -- panicking
// on failure is the correct behavior in test code.
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::float_cmp,
    clippy::indexing_slicing
)]

use suews_config::{Site, StateBlock, SuewsConfig, Validate};
use suews_state::{ColumnKey, FlatState, IndexDescriptor};
use suews_types::{GridId, Param, Reference, SurfaceType};

fn two_site_config() -> SuewsConfig {
    let mut london = Site {
        name: "london".to_owned(),
        gridiv: GridId(10),
        ..Site::default()
    };
    london.properties.lat = Param::new(51.51);

    let mut sydney = Site {
        name: "sydney".to_owned(),
        gridiv: GridId(20),
        ..Site::default()
    };
    sydney.properties.lat = Param::new(-33.87);
    sydney.properties.lng = Param::new(151.21);
    sydney.properties.timezone = Param::new(10);

    SuewsConfig {
        site: vec![london, sydney],
        ..SuewsConfig::default()
    }
}

#[test]
fn minimal_config_survives_the_table() {
    let config = SuewsConfig::default();
    let table = config.to_df_state().expect("encode");
    assert_eq!(table.len(), 1);

    let decoded = SuewsConfig::from_df_state(&table).expect("decode");
    let sfr = decoded.site[0].properties.land_cover.bldgs.base.sfr.value;
    assert!((sfr - 1.0 / 7.0).abs() < 1e-12);
    assert_eq!(decoded, config);
}

#[test]
fn re_encoding_a_decoded_table_is_stable() {
    let config = two_site_config();
    let first = config.to_df_state().expect("encode");
    let second = SuewsConfig::from_df_state(&first)
        .expect("decode")
        .to_df_state()
        .expect("re-encode");
    assert_eq!(first.columns(), second.columns());
    assert_eq!(first, second);
}

#[test]
fn each_site_gets_its_own_row() {
    let config = two_site_config();
    let table = config.to_df_state().expect("encode");
    let grids: Vec<GridId> = table.grids().collect();
    assert_eq!(grids, vec![GridId(0), GridId(1)]);

    let lat = ColumnKey::scalar("lat");
    assert_eq!(table.value(GridId(0), &lat).unwrap(), 51.51);
    assert_eq!(table.value(GridId(1), &lat).unwrap(), -33.87);

    let gridiv = ColumnKey::scalar("gridiv");
    assert_eq!(table.value(GridId(1), &gridiv).unwrap(), 20.0);

    let decoded = SuewsConfig::from_df_state(&table).expect("decode");
    assert_eq!(decoded.site.len(), 2);
    assert_eq!(decoded.site[0].gridiv, GridId(10));
    assert_eq!(decoded.site[1].gridiv, GridId(20));
    assert_eq!(decoded.site[1].properties.timezone.value, 10);
    // Names are document-only.
    assert_eq!(decoded.site[1].name, "test site");
}

#[test]
fn modified_values_survive() {
    let mut config = SuewsConfig::default();
    config.model.physics.storageheatmethod = Param::new(2);
    config.model.physics.ohmincqf = Param::new(1);
    config.model.control.tstep = 600;

    let site = &mut config.site[0];
    site.properties.land_cover.paved.base.sfr = Param::new(0.3);
    site.properties.land_cover.grass.vegetation.lai.laimax = Param::new(5.5);
    site.properties.snow.crwmax = Param::new(0.25);
    site.initial_states.snowalb = Param::new(0.7);
    site.initial_states.bsoil.layer.soilstore = Param::new(90.0);

    let table = config.to_df_state().expect("encode");
    let decoded = SuewsConfig::from_df_state(&table).expect("decode");

    assert_eq!(decoded.model.physics.storageheatmethod.value, 2);
    assert_eq!(decoded.model.control.tstep, 600);
    let site = &decoded.site[0];
    assert_eq!(site.properties.land_cover.paved.base.sfr.value, 0.3);
    assert_eq!(site.properties.land_cover.grass.vegetation.lai.laimax.value, 5.5);
    assert_eq!(site.properties.snow.crwmax.value, 0.25);
    assert_eq!(site.initial_states.snowalb.value, 0.7);
    assert_eq!(site.initial_states.bsoil.layer.soilstore.value, 90.0);
    assert_eq!(decoded, config);
}

#[test]
fn references_are_not_stored() {
    let mut config = SuewsConfig::default();
    let reference = Reference::described("city centre");
    config.site[0].properties.lat = Param::with_reference(48.85, reference);
    let table = config.to_df_state().expect("encode");
    let decoded = SuewsConfig::from_df_state(&table).expect("decode");
    let lat = &decoded.site[0].properties.lat;
    assert_eq!(lat.value, 48.85);
    assert!(lat.reference.is_none());
}

#[test]
fn decode_rejects_invalid_rows() {
    let mut row = Site::default().to_state();
    row.merge_keep_first(suews_config::Model::default().to_state());

    let mut broken = suews_state::StateRow::new();
    let sfr = ColumnKey::new("sfr_surf", IndexDescriptor::surface(SurfaceType::Water));
    broken.insert(sfr, 1.5);
    broken.merge_keep_first(row);

    let table = FlatState::from_rows([(GridId(0), broken)]).expect("table");
    let err = SuewsConfig::from_df_state(&table).unwrap_err();
    assert_eq!(err.to_string(), "grid 0: water.sfr = 1.5 must be within [0, 1]");
}

#[test]
fn model_columns_are_shared_by_every_row() {
    let table = two_site_config().to_df_state().expect("encode");
    let tstep = ColumnKey::scalar("tstep");
    for grid in table.grids() {
        assert_eq!(table.value(grid, &tstep).unwrap(), 300.0);
    }
    assert!(SuewsConfig::from_df_state(&table).unwrap().validate().is_ok());
}
