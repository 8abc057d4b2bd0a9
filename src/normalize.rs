//! Graph model builder
//!
//! Turns the raw JSON text of a graph description into a [`GraphModel`]: resolves
//! identifiers and categories, counts degrees, scores importance, picks the labelled
//! nodes and bounds every visual size.
//!
//! Normalization never fails. Text that is not JSON yields [`ParsedGraph::Invalid`];
//! anything else, however incomplete, yields a (possibly empty) model.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::model::{
    Category, GraphModel, NormalizedLink, NormalizedNode, RawGraph, RawLink, RawNode,
};

/// Number of most important nodes that get an on-canvas label
pub const LABEL_TOP_K: usize = 12;

/// Full-mode symbol size bounds
pub const SYMBOL_SIZE_MIN: f64 = 12.0;
pub const SYMBOL_SIZE_MAX: f64 = 60.0;

/// Multiplier from `weight + degree * DEGREE_FACTOR` to symbol size
pub const SYMBOL_SCALE: f64 = 6.0;

/// Contribution of each incident link endpoint to symbol size
pub const DEGREE_FACTOR: f64 = 0.6;

/// Link stroke width bounds
pub const STROKE_WIDTH_MIN: f64 = 1.0;
pub const STROKE_WIDTH_MAX: f64 = 6.0;

/// Result of normalizing source text
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedGraph {
    /// The text was empty or valid JSON
    Valid(GraphModel),
    /// The text was non-empty and not JSON
    Invalid(InvalidGraph),
}

/// Why source text could not be read as a graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidGraph {
    /// Parser message, suitable for a "malformed input" hint
    pub reason: String,
}

/// Host-facing state of the visualization
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum ViewState {
    /// Nothing to draw
    NoData,
    /// Source text is malformed
    InvalidFormat(String),
    /// A graph is ready to render
    Ready,
}

impl ParsedGraph {
    /// The model, if the input was valid
    pub fn model(&self) -> Option<&GraphModel> {
        match self {
            ParsedGraph::Valid(model) => Some(model),
            ParsedGraph::Invalid(_) => None,
        }
    }

    /// Classify for display: invalid, empty, or ready
    pub fn view_state(&self) -> ViewState {
        match self {
            ParsedGraph::Invalid(invalid) => ViewState::InvalidFormat(invalid.reason.clone()),
            ParsedGraph::Valid(model) if model.is_empty() => ViewState::NoData,
            ParsedGraph::Valid(_) => ViewState::Ready,
        }
    }
}

/// Normalize raw source text into a graph model
pub fn normalize(text: &str) -> ParsedGraph {
    if text.trim().is_empty() {
        return ParsedGraph::Valid(GraphModel::empty());
    }

    match serde_json::from_str::<Value>(text) {
        Ok(document) => ParsedGraph::Valid(build_model(&RawGraph::from_document(document))),
        Err(e) => {
            warn!(error = %e, "graph source is not valid JSON");
            ParsedGraph::Invalid(InvalidGraph {
                reason: e.to_string(),
            })
        }
    }
}

impl RawGraph {
    /// Extract nodes and links from any JSON document
    ///
    /// Missing or non-array `nodes`/`links` are empty. Entries that are not objects
    /// are dropped with a warning rather than failing the whole document.
    pub fn from_document(document: Value) -> Self {
        let Value::Object(mut root) = document else {
            warn!("graph source is not a JSON object; treating as empty");
            return Self::default();
        };

        Self {
            nodes: entries(root.remove("nodes"), "nodes"),
            links: entries(root.remove("links"), "links"),
        }
    }
}

fn entries<T: serde::de::DeserializeOwned>(value: Option<Value>, field: &str) -> Vec<T> {
    let items = match value {
        Some(Value::Array(items)) => items,
        Some(Value::Null) | None => return Vec::new(),
        Some(_) => {
            warn!(field, "expected an array; treating as empty");
            return Vec::new();
        }
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(field, index, error = %e, "dropping malformed entry");
                None
            }
        })
        .collect()
}

/// Symbol size for a node, clamped to the full-mode range
pub fn symbol_size(weight: f64, degree: u32) -> f64 {
    ((weight + f64::from(degree) * DEGREE_FACTOR) * SYMBOL_SCALE)
        .clamp(SYMBOL_SIZE_MIN, SYMBOL_SIZE_MAX)
}

/// Stroke width for a link, clamped; absent values draw at minimum width
pub fn stroke_width(value: Option<f64>) -> f64 {
    match value {
        Some(v) => (1.0 + 4.0 * v).clamp(STROKE_WIDTH_MIN, STROKE_WIDTH_MAX),
        None => STROKE_WIDTH_MIN,
    }
}

/// Mark the `LABEL_TOP_K` highest-scoring nodes as labelled
///
/// Ties keep input order.
pub(crate) fn assign_labels(nodes: &mut [NormalizedNode]) {
    let mut order: Vec<usize> = (0..nodes.len()).collect();
    order.sort_by(|&a, &b| {
        nodes[b]
            .importance_score
            .total_cmp(&nodes[a].importance_score)
    });

    for node in nodes.iter_mut() {
        node.label_visible = false;
    }
    for &index in order.iter().take(LABEL_TOP_K) {
        nodes[index].label_visible = true;
    }
}

/// Build a normalized model from an already-decoded raw graph
pub fn build_model(raw: &RawGraph) -> GraphModel {
    let (resolved, duplicate_ids, skipped_nodes) = dedupe_nodes(&raw.nodes);

    let mut categories: Vec<Category> = Vec::new();
    let mut category_index: HashMap<String, usize> = HashMap::new();

    let mut links = Vec::with_capacity(raw.links.len());
    let mut degree: HashMap<String, u32> = HashMap::new();
    let mut skipped_links = 0;

    for link in &raw.links {
        let Some(normalized) = normalize_link(link) else {
            skipped_links += 1;
            continue;
        };
        *degree.entry(normalized.source.clone()).or_default() += 1;
        *degree.entry(normalized.target.clone()).or_default() += 1;
        links.push(normalized);
    }

    let mut nodes: Vec<NormalizedNode> = resolved
        .into_iter()
        .map(|(id, raw_node)| {
            let tag = raw_node.resolve_tag();
            let next = categories.len();
            let index = *category_index.entry(tag.clone()).or_insert_with(|| {
                categories.push(Category { name: tag });
                next
            });

            let weight = raw_node.resolve_weight();
            let node_degree = degree.get(&id).copied().unwrap_or(0);

            NormalizedNode {
                name: raw_node.resolve_name().unwrap_or_else(|| id.clone()),
                id,
                value: weight,
                symbol_size: symbol_size(weight, node_degree),
                category_index: index,
                degree: node_degree,
                importance_score: f64::from(node_degree) + weight,
                label_visible: false,
                color: raw_node.resolve_color(),
            }
        })
        .collect();

    assign_labels(&mut nodes);

    if skipped_nodes > 0 {
        warn!(skipped_nodes, "dropped nodes without an id or name");
    }
    if skipped_links > 0 {
        warn!(skipped_links, "dropped links without a source or target");
    }
    for id in &duplicate_ids {
        warn!(%id, "duplicate node id; last definition wins");
    }

    debug!(
        nodes = nodes.len(),
        links = links.len(),
        categories = categories.len(),
        "normalized graph"
    );

    GraphModel {
        nodes,
        links,
        categories,
        duplicate_ids,
        skipped_nodes,
        skipped_links,
    }
}

/// Resolve identifiers and collapse duplicates
///
/// A repeated id keeps the position of its first occurrence and the data of its last.
fn dedupe_nodes(raw_nodes: &[RawNode]) -> (Vec<(String, &RawNode)>, Vec<String>, usize) {
    let mut resolved: Vec<(String, &RawNode)> = Vec::with_capacity(raw_nodes.len());
    let mut slot: HashMap<String, usize> = HashMap::new();
    let mut duplicates: Vec<String> = Vec::new();
    let mut skipped = 0;

    for raw_node in raw_nodes {
        let Some(id) = raw_node.resolve_id() else {
            skipped += 1;
            continue;
        };
        match slot.get(&id) {
            Some(&index) => {
                resolved[index].1 = raw_node;
                if !duplicates.contains(&id) {
                    duplicates.push(id);
                }
            }
            None => {
                slot.insert(id.clone(), resolved.len());
                resolved.push((id, raw_node));
            }
        }
    }

    (resolved, duplicates, skipped)
}

fn normalize_link(link: &RawLink) -> Option<NormalizedLink> {
    let source = link.resolve_source()?;
    let target = link.resolve_target()?;
    let value = link.resolve_value();

    Some(NormalizedLink {
        source,
        target,
        value,
        stroke_width: stroke_width(value),
        label: link.resolve_label(),
    })
}
