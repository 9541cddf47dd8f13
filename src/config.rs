//! Pipeline configuration: the user selections threaded through every derivation.
//!
//! The record can be loaded from YAML, for instance:
//!
//! ```yaml
//! continents: [Asia, "North America"]
//! map_metric: population
//! hover_metrics: [urban_pop_pct, median_age]
//! preview_rows: 10
//! ```

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::continent::Continent;

pub const DEFAULT_PREVIEW_ROWS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub continents: Vec<Continent>,
    pub bar_metric: Option<String>,
    pub line_metric: Option<String>,
    pub map_metric: Option<String>,
    pub hover_metrics: Vec<String>,
    pub preview_rows: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            continents: vec![Continent::Asia],
            bar_metric: None,
            line_metric: None,
            map_metric: None,
            hover_metrics: Vec::new(),
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

impl PipelineConfig {
    pub fn from_yaml_str(input: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(input)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw =
            fs::read_to_string(path).with_context(|| format!("Opening config file {path:?}"))?;
        Self::from_yaml_str(&raw).with_context(|| format!("Parsing config file {path:?}"))
    }
}
