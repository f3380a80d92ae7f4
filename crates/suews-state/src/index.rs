//! Index descriptors.
//!
//! The second half of every column key. The numerical core addresses its
//! arrays with Python-tuple-like strings, so the rendering here is exact:
//! a bare `"0"` for scalars, a trailing comma for one-element tuples, and a
//! single space after every inner comma.

use core::fmt;
use core::str::FromStr;

use suews_types::{DayType, Season, SurfaceType, VegetationType};

use crate::StateError;

/// Position of a cell within a named parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IndexDescriptor {
    /// Scalar parameter, rendered `"0"`.
    Scalar,
    /// One-dimensional position, rendered `"(a,)"`.
    Single(usize),
    /// Two-dimensional position, rendered `"(a, b)"`.
    Pair(usize, usize),
    /// Three-dimensional position, rendered `"(a, b, c)"`.
    Triple(usize, usize, usize),
}

impl IndexDescriptor {
    /// Per-surface position.
    pub const fn surface(surface: SurfaceType) -> Self {
        Self::Single(surface.index())
    }

    /// Per-vegetation position (`surface index - 2`).
    pub const fn vegetation(vegetation: VegetationType) -> Self {
        Self::Single(vegetation.index())
    }

    /// Vertical-layer position.
    pub const fn layer(layer: usize) -> Self {
        Self::Single(layer)
    }

    /// Component `component` of the array belonging to `owner`.
    ///
    /// Used for thermal layers (`owner` is a surface or layer index), water
    /// distribution slots and LAI power coefficients.
    pub const fn layer_component(owner: usize, component: usize) -> Self {
        Self::Pair(owner, component)
    }

    /// Day-type position of a day profile.
    pub const fn day(day: DayType) -> Self {
        Self::Single(day.index())
    }

    /// Weekday position, Monday = 0.
    pub const fn weekday(day: usize) -> Self {
        Self::Single(day)
    }

    /// Hourly-profile position from a zero-based hour index.
    pub const fn hour(hour: usize, day: DayType) -> Self {
        Self::Pair(hour, day.index())
    }

    /// OHM coefficient position. `surface` is a raw index so the padding
    /// surface 7 can be addressed.
    pub const fn ohm(surface: usize, season: Season, coefficient: usize) -> Self {
        Self::Triple(surface, season.index(), coefficient)
    }

    /// Arbitrary two-dimensional position.
    pub const fn pair(a: usize, b: usize) -> Self {
        Self::Pair(a, b)
    }
}

impl fmt::Display for IndexDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar => f.write_str("0"),
            Self::Single(a) => write!(f, "({a},)"),
            Self::Pair(a, b) => write!(f, "({a}, {b})"),
            Self::Triple(a, b, c) => write!(f, "({a}, {b}, {c})"),
        }
    }
}

impl FromStr for IndexDescriptor {
    type Err = StateError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || StateError::InvalidDescriptor {
            raw: raw.to_owned(),
        };

        let text = raw.trim();
        if text == "0" {
            return Ok(Self::Scalar);
        }

        let inner = text
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(invalid)?;

        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        let parse = |part: &str| part.parse::<usize>().ok().ok_or_else(invalid);

        match parts.as_slice() {
            [a, ""] => Ok(Self::Single(parse(a)?)),
            [a, b] => Ok(Self::Pair(parse(a)?, parse(b)?)),
            [a, b, c] => Ok(Self::Triple(parse(a)?, parse(b)?, parse(c)?)),
            _ => Err(invalid()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_canonical_shapes() {
        assert_eq!(IndexDescriptor::Scalar.to_string(), "0");
        assert_eq!(IndexDescriptor::Single(4).to_string(), "(4,)");
        assert_eq!(IndexDescriptor::Pair(1, 2).to_string(), "(1, 2)");
        assert_eq!(IndexDescriptor::Triple(7, 3, 0).to_string(), "(7, 3, 0)");
    }

    #[test]
    fn parses_what_it_renders() {
        let samples = [
            IndexDescriptor::Scalar,
            IndexDescriptor::Single(0),
            IndexDescriptor::Single(23),
            IndexDescriptor::Pair(23, 1),
            IndexDescriptor::Triple(6, 3, 2),
        ];
        for descriptor in samples {
            let parsed: Result<IndexDescriptor, _> = descriptor.to_string().parse();
            assert_eq!(parsed.ok(), Some(descriptor));
        }
    }

    #[test]
    fn parsing_tolerates_whitespace() {
        let parsed: Result<IndexDescriptor, _> = " ( 3 ,  4 ) ".parse();
        assert_eq!(parsed.ok(), Some(IndexDescriptor::Pair(3, 4)));
        let parsed: Result<IndexDescriptor, _> = "(2 , )".parse();
        assert_eq!(parsed.ok(), Some(IndexDescriptor::Single(2)));
    }

    #[test]
    fn rejects_non_canonical_shapes() {
        for raw in ["", "1", "()", "(1)", "(1, 2,)", "(a,)", "(1, 2, 3, 4)", "(-1,)", "[1, 2]"] {
            let parsed: Result<IndexDescriptor, _> = raw.parse();
            assert_eq!(
                parsed.err(),
                Some(StateError::InvalidDescriptor {
                    raw: raw.to_owned()
                }),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn semantic_constructors_follow_index_conventions() {
        assert_eq!(
            IndexDescriptor::surface(SurfaceType::Bldgs),
            IndexDescriptor::Single(1)
        );
        assert_eq!(
            IndexDescriptor::vegetation(VegetationType::Grass),
            IndexDescriptor::Single(2)
        );
        assert_eq!(
            IndexDescriptor::hour(23, DayType::Holiday).to_string(),
            "(23, 1)"
        );
        assert_eq!(
            IndexDescriptor::ohm(7, Season::WinterWet, 2).to_string(),
            "(7, 3, 2)"
        );
        assert_eq!(IndexDescriptor::day(DayType::WorkingDay).to_string(), "(0,)");
    }
}
