//! Pipeline orchestration
//!
//! `GraphView` ties the stages together for a host page:
//!
//! ```text
//! source text ──normalize──▶ GraphModel ──filter──▶ GraphModel ──builder──▶ ChartOption
//!                                             ▲                       │
//!                                             └── InteractionController ◀── clicks
//! ```
//!
//! The filtered model is memoized. Source and filter changes re-run normalization
//! and/or filtering; layout and display changes only affect the builder stage.

use tracing::debug;

use crate::config::ViewConfig;
use crate::filter::{FilterState, filter};
use crate::interaction::{ClickEvent, InteractionController};
use crate::layout::{ChartOption, DisplayMode, LayoutMode, build_option};
use crate::model::{GraphModel, GraphSummary};
use crate::normalize::{ParsedGraph, ViewState, normalize};

/// Stateful front of the visualization pipeline
#[derive(Debug, Clone)]
pub struct GraphView {
    source: String,
    parsed: ParsedGraph,
    controller: InteractionController,
    mode: LayoutMode,
    display: DisplayMode,
    filtered: GraphModel,
    filter_runs: usize,
}

impl GraphView {
    /// View of `source` with default settings
    pub fn new(source: &str) -> Self {
        Self::with_config(source, &ViewConfig::default())
    }

    /// View of `source` with settings from a config
    pub fn with_config(source: &str, config: &ViewConfig) -> Self {
        let mut view = Self {
            source: source.to_string(),
            parsed: normalize(source),
            controller: InteractionController::new(config.filter_state()),
            mode: config.mode,
            display: config.display(),
            filtered: GraphModel::empty(),
            filter_runs: 0,
        };
        view.refilter();
        view
    }

    /// Replace the source text; unchanged text is ignored
    pub fn set_source(&mut self, source: &str) {
        if self.source == source {
            return;
        }
        self.source = source.to_string();
        self.parsed = normalize(source);
        self.refilter();
    }

    /// Replace the whole filter state; a pending click survives
    pub fn set_filter(&mut self, state: FilterState) {
        if self.controller.state() == &state {
            return;
        }
        self.controller.set_state(state);
        self.refilter();
    }

    /// Add or remove a category from the selection
    pub fn toggle_tag(&mut self, tag: &str) {
        self.controller.toggle_tag(tag);
        self.refilter();
    }

    /// Turn neighbor isolation on or off
    pub fn set_neighbors_only(&mut self, on: bool) {
        if self.controller.set_neighbors_only(on).is_some() {
            self.refilter();
        }
    }

    /// Forward a renderer click; returns true if the view changed
    pub fn click(&mut self, event: &ClickEvent) -> bool {
        let changed = self
            .controller
            .on_node_click(event, &self.filtered, self.mode)
            .is_some();
        if changed {
            self.refilter();
        }
        changed
    }

    /// Switch layout; the filtered model is reused
    pub fn set_mode(&mut self, mode: LayoutMode) {
        self.mode = mode;
    }

    /// Switch between full and compact rendering
    pub fn set_display(&mut self, display: DisplayMode) {
        self.display = display;
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn display(&self) -> DisplayMode {
        self.display
    }

    /// Current filter state
    pub fn filter_state(&self) -> &FilterState {
        self.controller.state()
    }

    /// Node remembered from a click while neighbor isolation was off
    pub fn pending_center(&self) -> Option<&str> {
        self.controller.pending_center()
    }

    /// No data, invalid format, or ready
    pub fn view_state(&self) -> ViewState {
        self.parsed.view_state()
    }

    /// The normalized, unfiltered model (if the source was valid)
    pub fn source_model(&self) -> Option<&GraphModel> {
        self.parsed.model()
    }

    /// The filtered model currently on screen
    pub fn model(&self) -> &GraphModel {
        &self.filtered
    }

    /// Counts of the filtered model for display
    pub fn summary(&self) -> GraphSummary {
        self.filtered.summary()
    }

    /// Renderer option for the current mode and display
    pub fn option(&self) -> ChartOption {
        build_option(&self.filtered, self.mode, self.display)
    }

    /// Number of times the filter stage has run
    pub fn filter_runs(&self) -> usize {
        self.filter_runs
    }

    fn refilter(&mut self) {
        self.filtered = match &self.parsed {
            ParsedGraph::Valid(model) => filter(model, self.controller.state()),
            ParsedGraph::Invalid(_) => GraphModel::empty(),
        };
        self.filter_runs += 1;
        debug!(summary = %self.filtered.summary(), "view updated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Series;

    const CHAIN: &str = r#"{"nodes":[
        {"id":"A","tag":"x"},{"id":"B","tag":"y"},{"id":"C","tag":"x"}
    ],"links":[{"source":"A","target":"B"},{"source":"B","target":"C"}]}"#;

    #[test]
    fn states_for_empty_invalid_and_ready_sources() {
        assert_eq!(GraphView::new("").view_state(), ViewState::NoData);
        assert!(matches!(
            GraphView::new("{not json").view_state(),
            ViewState::InvalidFormat(_)
        ));
        assert_eq!(GraphView::new(CHAIN).view_state(), ViewState::Ready);
    }

    #[test]
    fn invalid_source_renders_empty_option() {
        let view = GraphView::new("{not json");
        assert!(view.model().is_empty());
        match view.option().primary_series() {
            Some(Series::Graph(series)) => assert!(series.data.is_empty()),
            other => panic!("unexpected series {other:?}"),
        }
    }

    #[test]
    fn summary_reflects_filters() {
        let mut view = GraphView::new(CHAIN);
        assert_eq!(view.summary().to_string(), "3 nodes, 2 categories");

        view.toggle_tag("x");
        assert_eq!(view.summary().to_string(), "2 nodes, 1 category");
    }

    #[test]
    fn mode_switch_does_not_refilter() {
        let mut view = GraphView::new(CHAIN);
        let runs = view.filter_runs();

        view.set_mode(LayoutMode::Sankey);
        view.set_display(DisplayMode::Compact);
        assert_eq!(view.filter_runs(), runs);
        assert!(matches!(
            view.option().primary_series(),
            Some(Series::Sankey(_))
        ));
    }

    #[test]
    fn unchanged_source_is_not_reprocessed() {
        let mut view = GraphView::new(CHAIN);
        let runs = view.filter_runs();
        view.set_source(CHAIN);
        assert_eq!(view.filter_runs(), runs);

        view.set_source("");
        assert_eq!(view.filter_runs(), runs + 1);
        assert_eq!(view.view_state(), ViewState::NoData);
    }

    #[test]
    fn click_then_enable_isolates_neighborhood() {
        let mut view = GraphView::new(CHAIN);

        assert!(!view.click(&ClickEvent::node_id("A")));
        assert_eq!(view.model().nodes.len(), 3);
        assert_eq!(view.pending_center(), Some("A"));

        view.set_neighbors_only(true);
        let ids: Vec<&str> = view.model().nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);

        assert!(view.click(&ClickEvent::node_id("B")));
        assert_eq!(view.model().nodes.len(), 3);
    }

    #[test]
    fn config_sets_initial_view() {
        let config = ViewConfig {
            mode: LayoutMode::Radial,
            compact: true,
            neighbors_only: true,
            center: Some("C".to_string()),
            ..ViewConfig::default()
        };
        let view = GraphView::with_config(CHAIN, &config);
        assert_eq!(view.mode(), LayoutMode::Radial);
        assert_eq!(view.display(), DisplayMode::Compact);
        assert_eq!(view.model().nodes.len(), 2);
        assert!(view.source_model().is_some());
    }

    #[test]
    fn set_filter_keeps_pending_center() {
        let mut view = GraphView::new(CHAIN);
        view.click(&ClickEvent::node_id("A"));
        assert_eq!(view.pending_center(), Some("A"));

        view.set_filter(FilterState::new().with_tags(["x", "y"]));
        assert_eq!(view.pending_center(), Some("A"));

        view.set_neighbors_only(true);
        assert_eq!(view.filter_state().active_center(), Some("A"));
        assert_eq!(view.model().nodes.len(), 2);
    }

    #[test]
    fn set_filter_replaces_state() {
        let mut view = GraphView::new(CHAIN);
        view.set_filter(FilterState::new().with_tags(["y"]));
        assert_eq!(view.model().nodes.len(), 1);
        assert_eq!(view.filter_state().active_tags().map(|t| t.len()), Some(1));
    }
}
