//! Interaction controller
//!
//! Translates renderer click events back into node ids and drives the neighbor filter.
//!
//! A click while the neighbor filter is off only *remembers* the node; the view does
//! not jump. Turning the filter on promotes the remembered node to the center. With the
//! filter on, clicks re-center immediately.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::filter::FilterState;
use crate::layout::{LayoutMode, sankey_display_names};
use crate::model::GraphModel;

/// Click payload reported by the renderer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickEvent {
    /// `"node"` or `"edge"`
    #[serde(default)]
    pub data_type: Option<String>,

    /// Node id, when the renderer exposes it
    #[serde(default)]
    pub id: Option<String>,

    /// Node name (display name for sankey)
    #[serde(default)]
    pub name: Option<String>,
}

impl ClickEvent {
    /// A node click carrying an id
    pub fn node_id(id: impl Into<String>) -> Self {
        Self {
            data_type: Some("node".to_string()),
            id: Some(id.into()),
            name: None,
        }
    }

    /// A node click carrying only a name
    pub fn node_name(name: impl Into<String>) -> Self {
        Self {
            data_type: Some("node".to_string()),
            id: None,
            name: Some(name.into()),
        }
    }

    fn is_edge(&self) -> bool {
        self.data_type.as_deref() == Some("edge")
    }
}

/// Maps a renderer-specific click payload to a model node id
pub trait ClickResolver: Sync {
    fn resolve_clicked_node_id(&self, event: &ClickEvent, model: &GraphModel) -> Option<String>;
}

/// Force and radial renderers expose `id` or `name`
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphClickResolver;

/// Sankey renderers expose only the disambiguated display name
#[derive(Debug, Clone, Copy, Default)]
pub struct SankeyClickResolver;

/// The resolver matching a layout mode
pub fn resolver_for(mode: LayoutMode) -> &'static dyn ClickResolver {
    match mode {
        LayoutMode::Force | LayoutMode::Radial => &GraphClickResolver,
        LayoutMode::Sankey => &SankeyClickResolver,
    }
}

/// Find a node whose id, then whose name, equals `key`
fn lookup(model: &GraphModel, key: &str) -> Option<String> {
    model
        .node(key)
        .or_else(|| model.nodes.iter().find(|n| n.name == key))
        .map(|n| n.id.clone())
}

impl ClickResolver for GraphClickResolver {
    fn resolve_clicked_node_id(&self, event: &ClickEvent, model: &GraphModel) -> Option<String> {
        if event.is_edge() {
            return None;
        }
        event
            .id
            .as_deref()
            .and_then(|id| lookup(model, id))
            .or_else(|| event.name.as_deref().and_then(|name| lookup(model, name)))
    }
}

impl ClickResolver for SankeyClickResolver {
    fn resolve_clicked_node_id(&self, event: &ClickEvent, model: &GraphModel) -> Option<String> {
        if event.is_edge() {
            return None;
        }
        let name = event.name.as_deref().or(event.id.as_deref())?;

        let names = sankey_display_names(&model.nodes);
        names
            .iter()
            .position(|display| display == name)
            .map(|index| model.nodes[index].id.clone())
            .or_else(|| lookup(model, name))
    }
}

/// Change to apply to a [`FilterState`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterDelta {
    /// New value for `neighbors_only`
    pub neighbors_only: Option<bool>,
    /// New center node
    pub center_node_id: Option<String>,
}

impl FilterDelta {
    /// Write the changed fields into `state`
    pub fn apply(&self, state: &mut FilterState) {
        if let Some(on) = self.neighbors_only {
            state.neighbors_only = on;
        }
        if let Some(center) = &self.center_node_id {
            state.center_node_id = Some(center.clone());
        }
    }
}

/// Owns the filter state and reacts to user input
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    state: FilterState,
    pending_center: Option<String>,
}

impl InteractionController {
    pub fn new(state: FilterState) -> Self {
        Self {
            state,
            pending_center: None,
        }
    }

    /// Current filter state
    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// Node clicked while the neighbor filter was off
    pub fn pending_center(&self) -> Option<&str> {
        self.pending_center.as_deref()
    }

    /// Handle a renderer click
    ///
    /// Returns the applied delta when the filter changed and the pipeline must re-run.
    pub fn on_node_click(
        &mut self,
        event: &ClickEvent,
        model: &GraphModel,
        mode: LayoutMode,
    ) -> Option<FilterDelta> {
        let id = resolver_for(mode).resolve_clicked_node_id(event, model)?;
        trace!(%id, %mode, "resolved click");

        if !self.state.neighbors_only {
            self.pending_center = Some(id);
            return None;
        }

        if self.state.center_node_id.as_deref() == Some(id.as_str()) {
            return None;
        }

        let delta = FilterDelta {
            center_node_id: Some(id),
            ..FilterDelta::default()
        };
        delta.apply(&mut self.state);
        Some(delta)
    }

    /// Turn the neighbor filter on or off
    ///
    /// Turning it on promotes a pending click to the center.
    pub fn set_neighbors_only(&mut self, on: bool) -> Option<FilterDelta> {
        if self.state.neighbors_only == on {
            return None;
        }

        let delta = FilterDelta {
            neighbors_only: Some(on),
            center_node_id: if on { self.pending_center.take() } else { None },
        };
        delta.apply(&mut self.state);
        Some(delta)
    }

    /// Replace the filter state; a pending click is kept
    pub fn set_state(&mut self, state: FilterState) {
        self.state = state;
    }

    /// Add or remove one category from the selection
    pub fn toggle_tag(&mut self, tag: &str) {
        self.state.toggle_tag(tag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{ParsedGraph, normalize};

    fn model() -> GraphModel {
        let text = r#"{"nodes":[
            {"id":"a","name":"Same"},
            {"id":"b","name":"Same"},
            {"id":"c","name":"Gamma"}
        ],"links":[{"source":"a","target":"b"},{"source":"b","target":"c"}]}"#;
        match normalize(text) {
            ParsedGraph::Valid(model) => model,
            ParsedGraph::Invalid(invalid) => panic!("{}", invalid.reason),
        }
    }

    // ========== Click Resolution ==========

    #[test]
    fn graph_resolver_prefers_id() {
        let m = model();
        let resolved = GraphClickResolver.resolve_clicked_node_id(&ClickEvent::node_id("b"), &m);
        assert_eq!(resolved.as_deref(), Some("b"));
    }

    #[test]
    fn graph_resolver_falls_back_to_name() {
        let m = model();
        let resolved =
            GraphClickResolver.resolve_clicked_node_id(&ClickEvent::node_name("Gamma"), &m);
        assert_eq!(resolved.as_deref(), Some("c"));
    }

    #[test]
    fn edge_clicks_are_ignored() {
        let m = model();
        let event = ClickEvent {
            data_type: Some("edge".to_string()),
            id: Some("a".to_string()),
            name: None,
        };
        assert!(GraphClickResolver.resolve_clicked_node_id(&event, &m).is_none());
        assert!(SankeyClickResolver.resolve_clicked_node_id(&event, &m).is_none());
    }

    #[test]
    fn sankey_resolver_reverses_display_names() {
        let m = model();
        let first = SankeyClickResolver.resolve_clicked_node_id(&ClickEvent::node_name("Same"), &m);
        let second =
            SankeyClickResolver.resolve_clicked_node_id(&ClickEvent::node_name("Same (1)"), &m);
        assert_eq!(first.as_deref(), Some("a"));
        assert_eq!(second.as_deref(), Some("b"));
    }

    #[test]
    fn unknown_click_resolves_to_nothing() {
        let m = model();
        for mode in LayoutMode::ALL {
            let event = ClickEvent::node_name("nobody");
            assert!(resolver_for(mode).resolve_clicked_node_id(&event, &m).is_none());
        }
    }

    // ========== Deferred Centering ==========

    #[test]
    fn click_while_off_is_only_pending() {
        let m = model();
        let mut controller = InteractionController::default();

        let delta = controller.on_node_click(&ClickEvent::node_id("c"), &m, LayoutMode::Force);
        assert!(delta.is_none());
        assert_eq!(controller.pending_center(), Some("c"));
        assert!(controller.state().center_node_id.is_none());
    }

    #[test]
    fn enabling_promotes_pending_center() {
        let m = model();
        let mut controller = InteractionController::default();
        controller.on_node_click(&ClickEvent::node_id("c"), &m, LayoutMode::Force);

        let delta = controller.set_neighbors_only(true).unwrap();
        assert_eq!(delta.neighbors_only, Some(true));
        assert_eq!(delta.center_node_id.as_deref(), Some("c"));
        assert_eq!(controller.state().center_node_id.as_deref(), Some("c"));
        assert!(controller.pending_center().is_none());
    }

    #[test]
    fn click_while_on_recenters_immediately() {
        let m = model();
        let mut controller = InteractionController::new(FilterState::new().with_center("a"));

        let delta = controller
            .on_node_click(&ClickEvent::node_name("Same (1)"), &m, LayoutMode::Sankey)
            .unwrap();
        assert_eq!(delta.center_node_id.as_deref(), Some("b"));
        assert_eq!(controller.state().center_node_id.as_deref(), Some("b"));
    }

    #[test]
    fn clicking_current_center_changes_nothing() {
        let m = model();
        let mut controller = InteractionController::new(FilterState::new().with_center("a"));
        assert!(
            controller
                .on_node_click(&ClickEvent::node_id("a"), &m, LayoutMode::Radial)
                .is_none()
        );
    }

    #[test]
    fn replacing_state_keeps_pending_center() {
        let m = model();
        let mut controller = InteractionController::default();
        controller.on_node_click(&ClickEvent::node_id("b"), &m, LayoutMode::Force);

        controller.set_state(FilterState::new().with_tags(["x"]));
        assert_eq!(controller.pending_center(), Some("b"));
        assert_eq!(controller.state().active_tags().map(|t| t.len()), Some(1));
    }

    #[test]
    fn toggling_to_same_value_is_a_no_op() {
        let mut controller = InteractionController::default();
        assert!(controller.set_neighbors_only(false).is_none());
    }

    #[test]
    fn disabling_keeps_center_but_deactivates_it() {
        let mut controller = InteractionController::new(FilterState::new().with_center("a"));
        let delta = controller.set_neighbors_only(false).unwrap();
        assert_eq!(delta.neighbors_only, Some(false));
        assert!(delta.center_node_id.is_none());
        assert!(controller.state().active_center().is_none());
        assert_eq!(controller.state().center_node_id.as_deref(), Some("a"));
    }

    #[test]
    fn delta_apply_writes_changed_fields() {
        let mut state = FilterState::new();
        FilterDelta {
            neighbors_only: Some(true),
            center_node_id: Some("x".to_string()),
        }
        .apply(&mut state);
        assert_eq!(state, FilterState::new().with_center("x"));
    }
}
