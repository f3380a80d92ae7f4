//! Integration tests for the `suews-state` table.
//!
//! Exercises the public surface the configuration codec relies on: canonical
//! descriptor strings, keep-first assembly of rows from independently built
//! blocks, and typed reads with named failures.

// Integration tests use expect/unwrap extensively for clarity -- panicking
// on failure is the correct behavior in test code.
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::float_cmp,
    clippy::indexing_slicing
)]

use std::thread;

use suews_state::{ColumnKey, FlatState, IndexDescriptor, StateError, StateRow};
use suews_types::{DayType, GridId, Season, SurfaceType};

fn encode_block(surface: SurfaceType, sfr: f64) -> StateRow {
    let mut row = StateRow::new();
    row.push("sfr_surf", IndexDescriptor::surface(surface), sfr);
    for season in Season::ALL {
        for coefficient in 0..3 {
            row.push("ohm_coef", IndexDescriptor::ohm(7, season, coefficient), 0.0);
        }
    }
    row
}

#[test]
fn descriptor_strings_match_the_external_layout() {
    let rendered: Vec<String> = [
        IndexDescriptor::Scalar,
        IndexDescriptor::surface(SurfaceType::Water),
        IndexDescriptor::layer_component(2, 4),
        IndexDescriptor::hour(0, DayType::Holiday),
        IndexDescriptor::ohm(1, Season::SummerWet, 2),
    ]
    .iter()
    .map(ToString::to_string)
    .collect();

    assert_eq!(rendered, vec!["0", "(6,)", "(2, 4)", "(0, 1)", "(1, 1, 2)"]);

    for text in &rendered {
        let parsed: IndexDescriptor = text.parse().expect("canonical descriptor parses");
        assert_eq!(&parsed.to_string(), text);
    }
}

#[test]
fn padding_columns_from_sibling_blocks_collapse_to_one() {
    let mut row = encode_block(SurfaceType::Paved, 0.4);
    let dropped = row.merge_keep_first(encode_block(SurfaceType::Bldgs, 0.6));

    // twelve padding cells per block, the second set is dropped
    assert_eq!(dropped, 12);
    assert_eq!(row.len(), 14);
    assert_eq!(
        row.read::<f64>("sfr_surf", IndexDescriptor::surface(SurfaceType::Bldgs))
            .unwrap(),
        0.6
    );
}

#[test]
fn rows_encoded_on_separate_threads_stack_into_one_table() {
    let handles: Vec<_> = SurfaceType::ALL
        .iter()
        .enumerate()
        .map(|(position, surface)| {
            let surface = *surface;
            thread::spawn(move || {
                let grid = GridId::from_position(position).expect("position fits");
                (grid, encode_block(surface, 1.0))
            })
        })
        .collect();

    let rows: Vec<(GridId, StateRow)> = handles
        .into_iter()
        .map(|handle| handle.join().expect("encoder thread"))
        .collect();
    let table = FlatState::from_rows(rows).expect("distinct grids");

    assert_eq!(table.len(), 7);
    assert_eq!(table.grids().next(), Some(GridId(0)));
    // 7 distinct sfr columns plus the shared padding
    assert_eq!(table.columns().len(), 7 + 12);

    let water = ColumnKey::new("sfr_surf", IndexDescriptor::surface(SurfaceType::Water));
    assert_eq!(table.value(GridId(6), &water).unwrap(), 1.0);
    assert!(matches!(
        table.value(GridId(0), &water),
        Err(StateError::MissingColumn { .. })
    ));
}

#[test]
fn typed_reads_name_the_failing_column() {
    let mut row = StateRow::new();
    row.scalar("storageheatmethod", 1.25);

    let err = row.read_scalar::<i32>("storageheatmethod").unwrap_err();
    assert_eq!(
        err.to_string(),
        "column storageheatmethod[0] holds 1.25, expected an integer"
    );

    let err = row.read_scalar::<i32>("netradiationmethod").unwrap_err();
    assert_eq!(err.to_string(), "missing column netradiationmethod[0]");
}
