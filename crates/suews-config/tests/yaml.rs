//! Integration tests for the YAML document form.
//!
//! Loads the sample configuration shipped at the workspace root, checks
//! that dumped documents load back unchanged, and that document-level
//! mistakes are caught on load.

// Integration tests use expect/unwrap extensively for clarity -- panicking
// on failure is the correct behavior in test code.
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::float_cmp,
    clippy::indexing_slicing
)]

use std::path::{Path, PathBuf};

use suews_config::water::Outflow;
use suews_config::{ConfigError, SuewsConfig};
use suews_types::{GridId, Param};

fn sample_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("suews-config.yaml")
}

#[test]
fn sample_document_loads() {
    let config = SuewsConfig::from_file(&sample_path()).expect("sample config");
    assert_eq!(config.site.len(), 1);

    let site = &config.site[0];
    assert_eq!(site.name, "kc");
    assert_eq!(site.gridiv, GridId(1));
    assert_eq!(site.properties.lat.value, 51.51);
    let reference = site.properties.lat.reference.as_ref().expect("lat reference");
    assert_eq!(reference.desc.as_deref(), Some("Strand campus"));
    assert_eq!(site.properties.land_cover.bldgs.base.sfr.value, 0.38);
    assert!(matches!(
        site.properties.land_cover.bldgs.waterdist.outflow,
        Some(Outflow::ToRunoff(_))
    ));
    assert_eq!(site.initial_states.dectr.vegetation.lai_id.value, 4.0);
    assert_eq!(config.model.physics.stabilitymethod.value, 3);
    assert_eq!(
        config.model.control.forcing_file.value,
        "forcing/kc_2012_data_60.txt"
    );
}

#[test]
fn sample_document_encodes() {
    let config = SuewsConfig::from_file(&sample_path()).expect("sample config");
    let table = config.to_df_state().expect("encode");
    let decoded = SuewsConfig::from_df_state(&table).expect("decode");
    assert_eq!(decoded.site[0].properties, config.site[0].properties);
    assert_eq!(decoded.site[0].initial_states, config.site[0].initial_states);
}

#[test]
fn dumped_document_loads_back() {
    let mut config = SuewsConfig::default();
    config.site[0].name = "dumped".to_owned();
    config.site[0].properties.z = Param::new(25.0);

    let yaml = config.to_yaml().expect("dump");
    let loaded = SuewsConfig::parse(&yaml).expect("load");
    assert_eq!(loaded, config);
    assert_eq!(loaded.site[0].name, "dumped");
}

#[test]
fn missing_file_is_an_io_error() {
    let err = SuewsConfig::from_file(Path::new("does/not/exist.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn both_outflows_are_rejected() {
    let yaml = "\
site:
  - properties:
      land_cover:
        grass:
          waterdist:
            to_soilstore: 0.4
            to_runoff: 0.4
";
    assert!(matches!(
        SuewsConfig::parse(yaml),
        Err(ConfigError::Yaml { .. })
    ));
}

#[test]
fn incomplete_hourly_profile_is_rejected() {
    let hours: String = (1..=23).map(|h| format!("              {h}: 0.04\n")).collect();
    let yaml = format!(
        "site:\n  - properties:\n      anthropogenic_emissions:\n        heat:\n          \
         ahprof_24hr:\n            working_day:\n{hours}            holiday:\n{hours}"
    );
    let err = SuewsConfig::parse(&yaml).unwrap_err();
    assert!(err.to_string().contains("must have all hours from 1 to 24"));
}

#[test]
fn hour_given_as_string_and_integer_is_rejected() {
    let hours: String = (1..=24).map(|h| format!("              {h}: 0.04\n")).collect();
    let yaml = format!(
        "site:\n  - properties:\n      anthropogenic_emissions:\n        heat:\n          \
         ahprof_24hr:\n            working_day:\n              \"1\": 0.5\n{hours}            \
         holiday:\n{hours}"
    );
    let err = SuewsConfig::parse(&yaml).unwrap_err();
    assert!(err.to_string().contains("each hour must be given once"));
}

#[test]
fn storage_method_conflict_is_caught_on_load() {
    let yaml = "model:\n  physics:\n    storageheatmethod: 2\n    ohmincqf: 0\n";
    let err = SuewsConfig::parse(yaml).unwrap_err();
    assert_eq!(
        err.to_string(),
        "storageheatmethod = 2 requires ohmincqf = 1, got 0"
    );
}
