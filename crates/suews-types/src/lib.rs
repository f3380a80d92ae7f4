//! Shared type definitions for SUEWS site configuration.
//!
//! This crate is the common vocabulary of the workspace: the provenance
//! wrapper every authored parameter is stored in, the grid identifier that
//! keys rows of the flat state table, and the canonical enumerations whose
//! integer positions are part of the flat-table contract.
//!
//! # Modules
//!
//! - [`param`] -- Provenance values ([`Param`]) and citation metadata ([`Reference`])
//! - [`ids`] -- The [`GridId`] row key
//! - [`enums`] -- Surface, vegetation, day-type, season, and facet enumerations

pub mod enums;
pub mod ids;
pub mod param;

// Re-export all public types at crate root for convenience.
pub use enums::{DayType, Facet, Season, SurfaceType, VegetationType};
pub use ids::GridId;
pub use param::{Param, Reference};
