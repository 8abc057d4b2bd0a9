//! View configuration
//!
//! A small YAML file that fixes the initial layout mode, display size and filters:
//!
//! ```yaml
//! mode: sankey
//! compact: false
//! tags: [service, database]
//! neighbors_only: true
//! center: api-gateway
//! ```
//!
//! Every field is optional.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::filter::FilterState;
use crate::io::{IoError, IoResult};
use crate::layout::{DisplayMode, LayoutMode};

/// Initial view settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Layout to build
    pub mode: LayoutMode,

    /// Render as a small static preview
    pub compact: bool,

    /// Categories to show; empty shows all
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Isolate `center` and its neighbors
    pub neighbors_only: bool,

    /// Center node for the neighbor filter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center: Option<String>,
}

impl ViewConfig {
    /// Load from a YAML file
    pub fn load(path: &Path) -> IoResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML text; an empty document yields the defaults
    pub fn from_yaml(content: &str) -> IoResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| IoError::Parse(e.to_string()))
    }

    /// Display size implied by `compact`
    pub fn display(&self) -> DisplayMode {
        DisplayMode::from_compact(self.compact)
    }

    /// Filter state described by this config
    pub fn filter_state(&self) -> FilterState {
        FilterState {
            selected_tags: if self.tags.is_empty() {
                None
            } else {
                Some(self.tags.iter().cloned().collect())
            },
            neighbors_only: self.neighbors_only,
            center_node_id: self.center.clone(),
        }
    }
}
