//! Validated SUEWS site configuration and its flat-state codec.
//!
//! A configuration is a tree: model settings plus one or more sites, each
//! with land cover, building layers, parameter blocks and initial state.
//! Every node validates its physical invariants when built, decoded or
//! loaded, and every node can be projected into the flat
//! `(parameter, index)` table the numerical core reads, and rebuilt from
//! it.
//!
//! # Modules
//!
//! - [`codec`] -- The [`StateBlock`] and [`Validate`] contracts and range checks
//! - [`error`] -- [`ConfigError`]
//! - [`profiles`] -- Day-type, weekly and hourly profiles
//! - [`thermal`] -- Five-layer thermal stacks
//! - [`water`] -- Water redistribution between surfaces
//! - [`drainage`] -- Storage capacity and drainage
//! - [`ohm`] -- Objective hysteresis model coefficients
//! - [`lai`] -- Leaf area index phenology
//! - [`surface`] -- The seven land-cover surfaces
//! - [`vertical`] -- Urban canopy layers, roofs and walls
//! - [`initial`] -- Initial model state
//! - [`blocks`] -- LUMPS, SPARTACUS and conductance parameters
//! - [`snow`] -- Snow parameters
//! - [`irrigation`] -- Irrigation scheduling
//! - [`anthropogenic`] -- Anthropogenic heat and CO2
//! - [`building`] -- Building archetype and energy model parameters
//! - [`site`] -- Site properties and sites
//! - [`model`] -- Run control and physics methods
//! - [`config`] -- The top-level document and whole-table codec

pub mod anthropogenic;
pub mod blocks;
pub mod building;
pub mod codec;
pub mod config;
pub mod drainage;
pub mod error;
pub mod initial;
pub mod irrigation;
pub mod lai;
pub mod model;
pub mod ohm;
pub mod profiles;
pub mod site;
pub mod snow;
pub mod surface;
pub mod thermal;
pub mod vertical;
pub mod water;

pub use codec::{StateBlock, Validate};
pub use config::SuewsConfig;
pub use error::ConfigError;
pub use model::{Model, ModelControl, ModelPhysics};
pub use site::{Site, SiteProperties};
