//! Error types for the `suews-config` crate.
//!
//! Three families share one enum: validation failures raised when a node is
//! built, codec failures raised while reading or writing the flat table, and
//! cross-field conflicts between method selectors. Document I/O errors sit
//! alongside them so a single `?` covers loading a file end to end.

use suews_state::StateError;
use suews_types::{DayType, Facet, GridId, SurfaceType};

/// Errors raised while building, validating, encoding or decoding a
/// configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    // -- validation --------------------------------------------------------
    /// A value lies outside its physical bounds.
    #[error("{field} = {value} must be {expected}")]
    OutOfRange {
        /// Name of the offending field.
        field: String,
        /// The rejected value.
        value: f64,
        /// Human-readable description of the accepted range.
        expected: &'static str,
    },

    /// Two related values are in the wrong order.
    #[error("expected {lower} {relation} {upper}, got {lower_value} and {upper_value}")]
    InvalidOrdering {
        /// Field that must be the smaller one.
        lower: &'static str,
        /// Field that must be the larger one.
        upper: &'static str,
        /// `<` or `<=`.
        relation: &'static str,
        /// Value of `lower`.
        lower_value: f64,
        /// Value of `upper`.
        upper_value: f64,
    },

    /// A destination required for this surface's water distribution is unset.
    #[error("incomplete water distribution for {surface}: {missing} is not set")]
    IncompleteDistribution {
        /// Surface owning the distribution.
        surface: SurfaceType,
        /// The unset destination.
        missing: &'static str,
    },

    /// The water distribution fractions do not sum to one.
    #[error("water distribution for {surface} is not normalized: fractions sum to {total}")]
    UnnormalizedDistribution {
        /// Surface owning the distribution.
        surface: SurfaceType,
        /// Sum of the required fractions.
        total: f64,
    },

    /// A water surface declared a water distribution.
    #[error("water distribution is not applicable to {surface}")]
    DistributionNotApplicable {
        /// The surface that must not have a distribution.
        surface: SurfaceType,
    },

    /// A water distribution names both outflow destinations.
    #[error("to_soilstore and to_runoff are mutually exclusive")]
    ConflictingOutflow,

    /// An hourly profile does not cover hours 1 to 24 exactly.
    #[error("hourly profile {day}: {reason}")]
    IncompleteProfile {
        /// Day type of the faulty half.
        day: DayType,
        /// What is wrong with the hour keys.
        reason: &'static str,
    },

    /// A roof or wall list does not match the declared layer count.
    #[error("{facet} layer count mismatch: expected {expected}, got {actual}")]
    LayerCountMismatch {
        /// Roof or wall.
        facet: Facet,
        /// The declared `nlayer`.
        expected: usize,
        /// Length of the list.
        actual: usize,
    },

    /// A per-layer array has the wrong length.
    #[error("{field} has length {actual}, expected {expected}")]
    LengthMismatch {
        /// Name of the array.
        field: &'static str,
        /// Required length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// The building frontal area index is too low for its plan area fraction.
    #[error(
        "faibldg = {faibldg} is too low for building fraction {sfr}: must be at least {minimum}"
    )]
    FrontalAreaTooLow {
        /// Building plan area fraction.
        sfr: f64,
        /// Building frontal area index.
        faibldg: f64,
        /// Smallest accepted frontal area index.
        minimum: f64,
    },

    /// A configuration declares no sites.
    #[error("configuration must contain at least one site")]
    NoSites,

    // -- cross-field -------------------------------------------------------
    /// A method selector requires a companion selector to take one value.
    #[error("{field} = {value} requires {dependent} = {required}, got {actual}")]
    MethodConflict {
        /// The controlling selector.
        field: &'static str,
        /// Its value.
        value: i32,
        /// The dependent selector.
        dependent: &'static str,
        /// Value the dependent selector must take.
        required: i32,
        /// Value it has.
        actual: i32,
    },

    /// A method selector value is recognised but not supported.
    #[error("{field} = {value} is not supported")]
    UnsupportedMethod {
        /// The selector.
        field: &'static str,
        /// Its value.
        value: i32,
    },

    // -- codec -------------------------------------------------------------
    /// Reading or writing the flat table failed.
    #[error("state table: {source}")]
    State {
        /// The underlying table error.
        #[from]
        source: StateError,
    },

    /// Decoding the row of one grid failed.
    #[error("grid {grid}: {source}")]
    Decode {
        /// Grid whose row was being decoded.
        grid: GridId,
        /// What went wrong.
        source: Box<ConfigError>,
    },

    /// More sites than grid ids.
    #[error("{count} sites exceed the grid id range")]
    TooManySites {
        /// Number of sites in the configuration.
        count: usize,
    },

    // -- documents ---------------------------------------------------------
    /// Failed to read a configuration document from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse or emit YAML.
    #[error("failed to process config YAML: {source}")]
    Yaml {
        /// The underlying YAML error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

impl ConfigError {
    /// Wrap a decode failure with the grid it happened on.
    pub fn in_grid(self, grid: GridId) -> Self {
        Self::Decode {
            grid,
            source: Box::new(self),
        }
    }

    /// Shorthand for [`ConfigError::OutOfRange`].
    pub(crate) fn out_of_range(
        field: impl Into<String>,
        value: f64,
        expected: &'static str,
    ) -> Self {
        Self::OutOfRange {
            field: field.into(),
            value,
            expected,
        }
    }
}
