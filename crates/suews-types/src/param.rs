//! Provenance values.
//!
//! Every physical parameter in a SUEWS configuration is stored as a
//! [`Param`]: the value itself plus an optional [`Reference`] naming where it
//! came from (a database row, a paper, a default). The reference travels with
//! the value through the hierarchical document but is dropped when the value
//! is projected into the flat state table.
//!
//! Equality and ordering only look at the value, so a decoded parameter
//! compares equal to the authored one it was encoded from.

use core::cmp::Ordering;
use core::fmt;

use serde::{Deserialize, Serialize};

/// Citation metadata attached to an authored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    /// Free-text description of the source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    /// Identifier of the source record.
    #[serde(default, rename = "ID", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// DOI or other citation of the source.
    #[serde(default, rename = "DOI", skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
}

impl Reference {
    /// Reference with only a description.
    pub fn described(desc: impl Into<String>) -> Self {
        Self {
            desc: Some(desc.into()),
            ..Self::default()
        }
    }
}

/// A physical value with optional provenance.
///
/// Accepts both the full document form `{value: 0.5, ref: {...}}` and a bare
/// value when deserializing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "ParamDoc<T>")]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Param<T> {
    /// The physical value.
    pub value: T,
    /// Where the value came from, if known.
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<Reference>,
}

impl<T> Param<T> {
    /// Wrap a value without provenance.
    pub const fn new(value: T) -> Self {
        Self {
            value,
            reference: None,
        }
    }

    /// Wrap a value with provenance.
    pub const fn with_reference(value: T, reference: Reference) -> Self {
        Self {
            value,
            reference: Some(reference),
        }
    }

    /// Consume the wrapper and return the value.
    pub fn into_value(self) -> T {
        self.value
    }

    /// Replace the provenance, keeping the value.
    #[must_use]
    pub fn cited(mut self, reference: Reference) -> Self {
        self.reference = Some(reference);
        self
    }
}

impl<T: Copy> Param<T> {
    /// Copy of the value.
    pub const fn get(&self) -> T {
        self.value
    }
}

/// Accepted document shapes for a [`Param`].
#[derive(Deserialize)]
#[serde(untagged)]
enum ParamDoc<T> {
    Full {
        value: T,
        #[serde(default, rename = "ref")]
        reference: Option<Reference>,
    },
    Bare(T),
}

impl<T> From<ParamDoc<T>> for Param<T> {
    fn from(doc: ParamDoc<T>) -> Self {
        match doc {
            ParamDoc::Full { value, reference } => Self { value, reference },
            ParamDoc::Bare(value) => Self::new(value),
        }
    }
}

// ---------------------------------------------------------------------------
// Construction and numeric coercion
// ---------------------------------------------------------------------------

impl<T> From<T> for Param<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl From<f32> for Param<f64> {
    fn from(value: f32) -> Self {
        Self::new(f64::from(value))
    }
}

impl From<i32> for Param<f64> {
    fn from(value: i32) -> Self {
        Self::new(f64::from(value))
    }
}

impl From<u8> for Param<i32> {
    fn from(value: u8) -> Self {
        Self::new(i32::from(value))
    }
}

impl From<i16> for Param<i32> {
    fn from(value: i16) -> Self {
        Self::new(i32::from(value))
    }
}

impl TryFrom<i64> for Param<i32> {
    type Error = core::num::TryFromIntError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        i32::try_from(value).map(Self::new)
    }
}

// ---------------------------------------------------------------------------
// Value-only comparison
// ---------------------------------------------------------------------------

impl<T: PartialEq> PartialEq for Param<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: PartialOrd> PartialOrd for Param<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

/// Comparisons between a wrapped value and a bare value of the same type.
macro_rules! compare_with_raw {
    ($($ty:ty),* $(,)?) => {
        $(
            impl PartialEq<$ty> for Param<$ty> {
                #[allow(clippy::float_cmp)]
                fn eq(&self, other: &$ty) -> bool {
                    self.value == *other
                }
            }

            impl PartialOrd<$ty> for Param<$ty> {
                fn partial_cmp(&self, other: &$ty) -> Option<Ordering> {
                    self.value.partial_cmp(other)
                }
            }
        )*
    };
}

compare_with_raw!(f64, i32);

impl PartialEq<str> for Param<String> {
    fn eq(&self, other: &str) -> bool {
        self.value == other
    }
}

impl PartialEq<&str> for Param<String> {
    fn eq(&self, other: &&str) -> bool {
        self.value == *other
    }
}

impl<T: fmt::Display> fmt::Display for Param<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_ignores_reference() {
        let plain = Param::new(0.25_f64);
        let cited = Param::with_reference(0.25, Reference::described("Ward et al."));
        assert_eq!(plain, cited);
    }

    #[test]
    fn compares_against_raw_values() {
        let p = Param::new(3.0_f64);
        assert!(p == 3.0);
        assert!(p < 4.0);
        assert!(p > 2.0);

        let n = Param::new(2_i32);
        assert!(n == 2);
        assert!(n >= 1);
    }

    #[test]
    fn ordering_between_params() {
        let low = Param::new(0.1_f64);
        let high = Param::with_reference(0.9_f64, Reference::default());
        assert!(low < high);
        assert_eq!(low.partial_cmp(&high), Some(Ordering::Less));
    }

    #[test]
    fn narrow_numerics_coerce_to_canonical_types() {
        let from_f32: Param<f64> = 0.5_f32.into();
        assert!(from_f32 == 0.5);
        let from_i32: Param<f64> = 4_i32.into();
        assert!(from_i32 == 4.0);
        let from_u8: Param<i32> = 3_u8.into();
        assert!(from_u8 == 3);
        let from_i64 = Param::<i32>::try_from(12_i64);
        assert_eq!(from_i64.ok(), Some(Param::new(12)));
        assert!(Param::<i32>::try_from(i64::MAX).is_err());
    }

    #[test]
    fn display_shows_value_only() {
        let p = Param::with_reference(1.5, Reference::described("x"));
        assert_eq!(p.to_string(), "1.5");
    }

    #[test]
    fn serializes_without_empty_reference() {
        let json = serde_json::to_string(&Param::new(0.5)).ok();
        assert_eq!(json.as_deref(), Some(r#"{"value":0.5}"#));
    }

    #[test]
    fn serializes_reference_keys() {
        let reference = Reference {
            desc: Some("table 2".to_owned()),
            id: Some("42".to_owned()),
            doi: Some("10.1000/xyz".to_owned()),
        };
        let json = serde_json::to_string(&Param::with_reference(1, reference)).ok();
        assert_eq!(
            json.as_deref(),
            Some(r#"{"value":1,"ref":{"desc":"table 2","ID":"42","DOI":"10.1000/xyz"}}"#)
        );
    }

    #[test]
    fn deserializes_full_and_bare_forms() {
        let full: Result<Param<f64>, _> =
            serde_json::from_str(r#"{"value": 0.3, "ref": {"DOI": "d"}}"#);
        let full = full.ok();
        assert_eq!(full.as_ref().map(|p| p.value.to_bits()), Some(0.3_f64.to_bits()));
        assert_eq!(
            full.and_then(|p| p.reference).and_then(|r| r.doi).as_deref(),
            Some("d")
        );

        let bare: Result<Param<[f64; 2]>, _> = serde_json::from_str("[1.0, 2.0]");
        assert_eq!(bare.ok().map(Param::into_value), Some([1.0, 2.0]));
    }

    #[test]
    fn string_params_compare_with_str() {
        let p = Param::new("forcing.txt".to_owned());
        assert!(p == "forcing.txt");
    }
}
