//! View filter pipeline
//!
//! Reduces a [`GraphModel`] to what the user asked to see: first by category, then
//! (optionally) to the closed neighborhood of a center node. Both stages are pure;
//! `filter(filter(m, s), s) == filter(m, s)`.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{Category, GraphModel};
use crate::normalize::assign_labels;

/// What the user has chosen to display
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    /// Categories to keep; `None` or empty keeps everything
    #[serde(default)]
    pub selected_tags: Option<BTreeSet<String>>,

    /// Restrict the view to `center_node_id` and its direct neighbors
    #[serde(default)]
    pub neighbors_only: bool,

    /// Node the neighbor filter is centered on
    #[serde(default)]
    pub center_node_id: Option<String>,
}

impl FilterState {
    /// State that shows the whole graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only the given categories
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Isolate a node and its neighbors
    pub fn with_center(mut self, id: impl Into<String>) -> Self {
        self.neighbors_only = true;
        self.center_node_id = Some(id.into());
        self
    }

    /// Add a category to the selection, or remove it if already selected
    pub fn toggle_tag(&mut self, tag: &str) {
        let tags = self.selected_tags.get_or_insert_with(BTreeSet::new);
        if !tags.remove(tag) {
            tags.insert(tag.to_string());
        }
    }

    /// Show every category again
    pub fn clear_tags(&mut self) {
        self.selected_tags = None;
    }

    /// Selected categories, if the category filter is active
    pub fn active_tags(&self) -> Option<&BTreeSet<String>> {
        self.selected_tags.as_ref().filter(|tags| !tags.is_empty())
    }

    /// Center node, if the neighbor filter is active
    pub fn active_center(&self) -> Option<&str> {
        if self.neighbors_only {
            self.center_node_id.as_deref()
        } else {
            None
        }
    }
}

/// Apply the category filter, then the neighbor filter
pub fn filter(model: &GraphModel, state: &FilterState) -> GraphModel {
    let mut result = match state.active_tags() {
        Some(tags) => filter_categories(model, tags),
        None => model.clone(),
    };

    if let Some(center) = state.active_center() {
        result = filter_neighbors(&result, center);
    }

    assign_labels(&mut result.nodes);

    debug!(
        nodes = result.nodes.len(),
        links = result.links.len(),
        categories = result.categories.len(),
        "filtered graph"
    );
    result
}

/// Keep nodes in the selected categories and links whose endpoints both survive
fn filter_categories(model: &GraphModel, tags: &BTreeSet<String>) -> GraphModel {
    let mut categories: Vec<Category> = Vec::new();
    let mut remap: HashMap<usize, usize> = HashMap::new();
    for (old_index, category) in model.categories.iter().enumerate() {
        if tags.contains(&category.name) {
            remap.insert(old_index, categories.len());
            categories.push(category.clone());
        }
    }

    let nodes: Vec<_> = model
        .nodes
        .iter()
        .filter_map(|node| {
            let new_index = *remap.get(&node.category_index)?;
            let mut kept = node.clone();
            kept.category_index = new_index;
            Some(kept)
        })
        .collect();

    let kept_ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let links = model
        .links
        .iter()
        .filter(|l| kept_ids.contains(l.source.as_str()) && kept_ids.contains(l.target.as_str()))
        .cloned()
        .collect();

    GraphModel {
        nodes,
        links,
        categories,
        ..diagnostics(model)
    }
}

/// Keep the center node, its direct neighbors, and the links among them
///
/// Links are restricted to the neighborhood ids, not to the surviving nodes, so a
/// link from the center to a missing node is passed through.
///
/// A center that is not in the model yields an empty neighborhood.
fn filter_neighbors(model: &GraphModel, center: &str) -> GraphModel {
    if model.node(center).is_none() {
        return GraphModel {
            categories: model.categories.clone(),
            ..diagnostics(model)
        };
    }

    let mut neighborhood: HashSet<&str> = HashSet::new();
    neighborhood.insert(center);
    for link in &model.links {
        if link.source == center {
            neighborhood.insert(link.target.as_str());
        }
        if link.target == center {
            neighborhood.insert(link.source.as_str());
        }
    }

    let nodes: Vec<_> = model
        .nodes
        .iter()
        .filter(|n| neighborhood.contains(n.id.as_str()))
        .cloned()
        .collect();

    // Dangling links at the center stay; the renderer owns missing references
    let links = model
        .links
        .iter()
        .filter(|l| {
            neighborhood.contains(l.source.as_str()) && neighborhood.contains(l.target.as_str())
        })
        .cloned()
        .collect();

    GraphModel {
        nodes,
        links,
        categories: model.categories.clone(),
        ..diagnostics(model)
    }
}

/// Normalization diagnostics carried through every filter stage
fn diagnostics(model: &GraphModel) -> GraphModel {
    GraphModel {
        duplicate_ids: model.duplicate_ids.clone(),
        skipped_nodes: model.skipped_nodes,
        skipped_links: model.skipped_links,
        ..GraphModel::empty()
    }
}
