//! The encode/decode contract shared by every configuration node.
//!
//! A node that owns a fixed place in the flat table implements
//! [`StateBlock`]: `to_state` writes its cells into a fresh [`StateRow`] and
//! `from_state` reads them back, then runs the same [`Validate`] pass a
//! constructor would. Nodes whose columns depend on where they sit (profiles
//! take a parameter name, thermal layers a facet and index) expose inherent
//! `to_state`/`from_state` methods with those extra arguments instead.
//!
//! Flat blocks of scalar parameters are declared with [`scalar_block!`],
//! which generates the struct, its defaults, and both directions of the
//! codec from one field list.

use suews_state::StateRow;

use crate::ConfigError;

/// Construction-time invariants of a node.
pub trait Validate {
    /// Check every invariant of the node and its children.
    ///
    /// # Errors
    ///
    /// The first violated invariant, naming the offending field.
    fn validate(&self) -> Result<(), ConfigError>;
}

/// A node with a fixed location in the flat table.
pub trait StateBlock: Validate + Sized {
    /// Write the node's cells.
    fn to_state(&self) -> StateRow;

    /// Read the node's cells without validating.
    fn decode(row: &StateRow) -> Result<Self, ConfigError>;

    /// Read the node's cells and validate the result.
    ///
    /// # Errors
    ///
    /// [`ConfigError::State`] for a missing or malformed column, or the
    /// validation error of the decoded node.
    fn from_state(row: &StateRow) -> Result<Self, ConfigError> {
        let node = Self::decode(row)?;
        node.validate()?;
        Ok(node)
    }
}

// ---------------------------------------------------------------------------
// Range checks
// ---------------------------------------------------------------------------

/// `value` must lie in `[0, 1]`.
pub(crate) fn check_fraction(field: &str, value: f64) -> Result<(), ConfigError> {
    check_within(field, value, 0.0, 1.0, "within [0, 1]")
}

/// `value` must be strictly positive.
pub(crate) fn check_positive(field: &str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::out_of_range(field, value, "greater than 0"))
    }
}

/// `value` must be at least `min`.
pub(crate) fn check_at_least(
    field: &str,
    value: f64,
    min: f64,
    expected: &'static str,
) -> Result<(), ConfigError> {
    if value >= min {
        Ok(())
    } else {
        Err(ConfigError::out_of_range(field, value, expected))
    }
}

/// `value` must lie in `[min, max]`.
pub(crate) fn check_within(
    field: &str,
    value: f64,
    min: f64,
    max: f64,
    expected: &'static str,
) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::out_of_range(field, value, expected))
    }
}

/// `lower` must be below `upper`, strictly when `strict`.
pub(crate) fn check_order(
    lower: (&'static str, f64),
    upper: (&'static str, f64),
    strict: bool,
) -> Result<(), ConfigError> {
    let (ok, relation) = if strict {
        (lower.1 < upper.1, "<")
    } else {
        (lower.1 <= upper.1, "<=")
    };
    if ok {
        Ok(())
    } else {
        Err(ConfigError::InvalidOrdering {
            lower: lower.0,
            upper: upper.0,
            relation,
            lower_value: lower.1,
            upper_value: upper.1,
        })
    }
}

// ---------------------------------------------------------------------------
// Scalar blocks
// ---------------------------------------------------------------------------

/// Column name of a [`scalar_block!`] field: the explicit override if one
/// was given, the field name otherwise.
macro_rules! column_name {
    ($field:ident) => {
        stringify!($field)
    };
    ($field:ident, $column:literal) => {
        $column
    };
}

/// Declare a block of scalar parameters stored at `(column, "0")`.
///
/// Each field is written `name: type = default`, optionally followed by
/// `=> "column"` when the table name differs from the field name. The
/// macro emits the struct (every field a `Param`), a `Default` impl, a
/// `COLUMNS` list, and the [`StateBlock`] impl. [`Validate`] is left to the
/// caller. Attributes on the struct and on each field are passed through,
/// so serde renames apply to the document form only.
macro_rules! scalar_block {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $field:ident: $ty:ty = $default:expr $(=> $column:literal)?
            ),* $(,)?
        }
    ) => {
        #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
        #[serde(default)]
        $(#[$meta])*
        pub struct $name {
            $(
                $(#[$fmeta])*
                pub $field: suews_types::Param<$ty>,
            )*
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    $( $field: suews_types::Param::new($default), )*
                }
            }
        }

        impl $name {
            /// Table column names of this block, in encode order.
            pub const COLUMNS: &'static [&'static str] = &[
                $( $crate::codec::column_name!($field $(, $column)?), )*
            ];
        }

        impl $crate::codec::StateBlock for $name {
            fn to_state(&self) -> suews_state::StateRow {
                let mut row = suews_state::StateRow::new();
                $(
                    row.scalar(
                        $crate::codec::column_name!($field $(, $column)?),
                        self.$field.value,
                    );
                )*
                row
            }

            fn decode(row: &suews_state::StateRow) -> Result<Self, $crate::ConfigError> {
                Ok(Self {
                    $(
                        $field: suews_types::Param::new(
                            row.read_scalar($crate::codec::column_name!($field $(, $column)?))?,
                        ),
                    )*
                })
            }
        }
    };
}

pub(crate) use column_name;
pub(crate) use scalar_block;
