//! Graph data model
//!
//! Two layers live here:
//!
//! - The *raw* layer (`RawGraph`, `RawNode`, `RawLink`) mirrors the loosely-typed JSON
//!   that editors produce. Every field is optional and may hold any JSON scalar.
//! - The *normalized* layer (`GraphModel` and friends) is what the filter pipeline and
//!   the layout builders consume. All fields are resolved and visually bounded.
//!
//! The `resolve_*` methods are the single place where the raw input's duck typing
//! (`id` or `name`, `weight` or `val`, numbers as strings) is interpreted.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Category assigned to nodes without a `tag`
pub const DEFAULT_TAG: &str = "default";

/// Render a JSON scalar as a string, rejecting containers and null
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Interpret a JSON scalar as a finite number (numeric strings included)
fn scalar_to_f64(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

/// Non-empty string form of an optional scalar
fn non_empty(value: Option<&Value>) -> Option<String> {
    value
        .and_then(scalar_to_string)
        .filter(|s| !s.trim().is_empty())
}

/// Unvalidated node/link structure decoded from input text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawGraph {
    /// Nodes in input order
    #[serde(default)]
    pub nodes: Vec<RawNode>,

    /// Links in input order
    #[serde(default)]
    pub links: Vec<RawLink>,
}

/// A node as written by the user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    /// Preferred identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    /// Display name, also the identifier fallback
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,

    /// Category label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<Value>,

    /// Declared importance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Value>,

    /// Alternate spelling of `weight` used by force-graph style inputs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub val: Option<Value>,

    /// Optional CSS color forwarded to the renderer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Value>,
}

impl RawNode {
    /// Node with only an `id`
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(Value::String(id.into())),
            ..Self::default()
        }
    }

    /// Stable identifier: `id`, falling back to `name`. `None` means the node is unusable.
    pub fn resolve_id(&self) -> Option<String> {
        non_empty(self.id.as_ref()).or_else(|| non_empty(self.name.as_ref()))
    }

    /// Display name: `name`, falling back to the identifier
    pub fn resolve_name(&self) -> Option<String> {
        non_empty(self.name.as_ref()).or_else(|| self.resolve_id())
    }

    /// Category label, `"default"` when absent
    pub fn resolve_tag(&self) -> String {
        non_empty(self.tag.as_ref()).unwrap_or_else(|| DEFAULT_TAG.to_string())
    }

    /// Declared weight: `weight`, then `val`, then 0
    pub fn resolve_weight(&self) -> f64 {
        self.weight
            .as_ref()
            .and_then(scalar_to_f64)
            .or_else(|| self.val.as_ref().and_then(scalar_to_f64))
            .unwrap_or(0.0)
    }

    /// Color string, if one was given
    pub fn resolve_color(&self) -> Option<String> {
        match &self.color {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
            _ => None,
        }
    }
}

/// A link as written by the user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawLink {
    /// Source node identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Value>,

    /// Target node identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Value>,

    /// Numeric strength of the link
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,

    /// Edge label
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub r#type: Option<Value>,
}

impl RawLink {
    /// Link between two identifiers
    pub fn between(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: Some(Value::String(source.into())),
            target: Some(Value::String(target.into())),
            ..Self::default()
        }
    }

    /// Source identifier
    pub fn resolve_source(&self) -> Option<String> {
        non_empty(self.source.as_ref())
    }

    /// Target identifier
    pub fn resolve_target(&self) -> Option<String> {
        non_empty(self.target.as_ref())
    }

    /// Numeric value, if present and finite
    pub fn resolve_value(&self) -> Option<f64> {
        self.value.as_ref().and_then(scalar_to_f64)
    }

    /// Edge label from `type`
    pub fn resolve_label(&self) -> Option<String> {
        non_empty(self.r#type.as_ref())
    }
}

/// A distinct node category, ordered by first appearance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// The `tag` value shared by the category's nodes
    pub name: String,
}

/// A node ready for layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedNode {
    /// Stable identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Resolved weight
    pub value: f64,

    /// Full-mode symbol diameter, always within the full-mode clamp range
    pub symbol_size: f64,

    /// Index into `GraphModel::categories`
    pub category_index: usize,

    /// Number of link endpoints touching this node
    pub degree: u32,

    /// `degree + weight`
    pub importance_score: f64,

    /// Whether the node is among the most important and gets an on-canvas label
    pub label_visible: bool,

    /// Optional renderer color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// A link ready for layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedLink {
    /// Source node identifier (may reference a missing node)
    pub source: String,

    /// Target node identifier (may reference a missing node)
    pub target: String,

    /// Declared value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,

    /// Line width, always within the stroke clamp range
    pub stroke_width: f64,

    /// Edge label taken from the link `type`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Normalized graph snapshot
///
/// Produced by [`crate::normalize::normalize`] and reduced by [`crate::filter::filter`].
/// Snapshots are never edited in place; every change rebuilds a new one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphModel {
    /// Nodes in input order
    pub nodes: Vec<NormalizedNode>,

    /// Links in input order
    pub links: Vec<NormalizedLink>,

    /// Categories by first appearance
    pub categories: Vec<Category>,

    /// Identifiers that appeared on more than one raw node (last one wins)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub duplicate_ids: Vec<String>,

    /// Raw nodes dropped because they had no usable identifier
    #[serde(default)]
    pub skipped_nodes: usize,

    /// Raw links dropped because an endpoint was missing
    #[serde(default)]
    pub skipped_links: usize,
}

impl GraphModel {
    /// A model with no nodes, links or categories
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when there is nothing to draw
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty()
    }

    /// Look up a node by identifier
    pub fn node(&self, id: &str) -> Option<&NormalizedNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Category name of a node
    pub fn category_of(&self, node: &NormalizedNode) -> Option<&str> {
        self.categories
            .get(node.category_index)
            .map(|c| c.name.as_str())
    }

    /// Counts for display by the host page
    pub fn summary(&self) -> GraphSummary {
        GraphSummary {
            nodes: self.nodes.len(),
            links: self.links.len(),
            categories: self.categories.len(),
        }
    }
}

/// Read-only counts of a graph model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GraphSummary {
    pub nodes: usize,
    pub links: usize,
    pub categories: usize,
}

impl fmt::Display for GraphSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node_word = if self.nodes == 1 { "node" } else { "nodes" };
        let category_word = if self.categories == 1 {
            "category"
        } else {
            "categories"
        };
        write!(
            f,
            "{} {}, {} {}",
            self.nodes, node_word, self.categories, category_word
        )
    }
}
