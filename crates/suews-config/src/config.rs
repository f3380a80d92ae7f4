//! The top-level configuration document and the whole-table codec.
//!
//! A [`SuewsConfig`] is authored as YAML and handed to the numerical core as
//! a [`FlatState`] with one row per site. Sites are keyed by their position
//! in the document; model settings are shared and written to every row.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use suews_state::FlatState;
use suews_types::GridId;

use crate::codec::{StateBlock, Validate};
use crate::model::Model;
use crate::site::Site;
use crate::ConfigError;

/// A complete SUEWS configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuewsConfig {
    /// Configuration name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Shared model settings.
    pub model: Model,
    /// Simulated sites, at least one.
    pub site: Vec<Site>,
}

impl Default for SuewsConfig {
    fn default() -> Self {
        Self {
            name: "sample config".to_owned(),
            description:
                "this is a sample config for testing purposes ONLY - values are not realistic"
                    .to_owned(),
            model: Model::default(),
            site: vec![Site::default()],
        }
    }
}

impl SuewsConfig {
    /// Load and validate a configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file cannot be read, [`ConfigError::Yaml`]
    /// if it is not a valid document, or the first violated invariant.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate a configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Yaml`] if the string is not a valid document, or the
    /// first violated invariant.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Render the configuration as YAML.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Yaml`] if serialization fails.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yml::to_string(self)?)
    }

    /// Encode every site into one table row keyed by its position.
    ///
    /// Each row holds `("gridiv", "0")`, the site columns and the model
    /// columns. Where blocks write the same column, the first value is kept.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NoSites`] for a configuration without sites, or
    /// [`ConfigError::TooManySites`] if a position does not fit a grid id.
    pub fn to_df_state(&self) -> Result<FlatState, ConfigError> {
        if self.site.is_empty() {
            return Err(ConfigError::NoSites);
        }
        let mut table = FlatState::new();
        for (position, site) in self.site.iter().enumerate() {
            let grid = GridId::from_position(position).ok_or(ConfigError::TooManySites {
                count: self.site.len(),
            })?;
            let mut row = site.to_state();
            let dropped = row.merge_keep_first(self.model.to_state());
            debug!(%grid, columns = row.len(), dropped, "Encoded site");
            table.insert_row(grid, row)?;
        }
        Ok(table)
    }

    /// Rebuild a configuration from a table, one site per row.
    ///
    /// The model is read from the first row. The name and description are
    /// not stored in the table and come back as defaults.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NoSites`] for an empty table, otherwise the first
    /// decode or validation error wrapped in [`ConfigError::Decode`] with
    /// the grid it happened on.
    pub fn from_df_state(table: &FlatState) -> Result<Self, ConfigError> {
        let (first, first_row) = table.rows().next().ok_or(ConfigError::NoSites)?;
        let model = Model::from_state(first_row).map_err(|err| err.in_grid(first))?;
        let site = table
            .rows()
            .map(|(grid, row)| Site::from_state(row, grid).map_err(|err| err.in_grid(grid)))
            .collect::<Result<Vec<_>, _>>()?;
        info!(sites = site.len(), columns = table.columns().len(), "Decoded state table");
        Ok(Self {
            model,
            site,
            ..Self::default()
        })
    }
}

impl Validate for SuewsConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.site.is_empty() {
            return Err(ConfigError::NoSites);
        }
        if u32::try_from(self.site.len()).is_err() {
            return Err(ConfigError::TooManySites {
                count: self.site.len(),
            });
        }
        self.model.validate()?;
        self.site.iter().try_for_each(Validate::validate)
    }
}
