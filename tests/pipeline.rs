//! End-to-end scenarios through the public library API

use std::collections::HashSet;

use graphview::filter::filter;
use graphview::interaction::ClickEvent;
use graphview::layout::{Series, build_option};
use graphview::normalize::{LABEL_TOP_K, normalize};
use graphview::{
    DisplayMode, FilterState, GraphModel, GraphView, LayoutMode, ParsedGraph, ViewState,
};

fn valid(text: &str) -> GraphModel {
    match normalize(text) {
        ParsedGraph::Valid(model) => model,
        ParsedGraph::Invalid(invalid) => panic!("unexpected invalid input: {}", invalid.reason),
    }
}

/// A star of `spokes` around a hub plus a ring among the spokes
fn star(spokes: usize) -> String {
    let mut nodes = vec![r#"{"id":"hub","tag":"core","weight":2}"#.to_string()];
    let mut links = Vec::new();
    for i in 0..spokes {
        let tag = if i % 2 == 0 { "even" } else { "odd" };
        nodes.push(format!(r#"{{"id":"s{i}","name":"spoke","tag":"{tag}","val":{i}}}"#));
        links.push(format!(r#"{{"source":"hub","target":"s{i}","value":{}}}"#, i as f64 / 4.0));
        links.push(format!(r#"{{"source":"s{i}","target":"s{}"}}"#, (i + 1) % spokes));
    }
    format!(
        r#"{{"nodes":[{}],"links":[{}]}}"#,
        nodes.join(","),
        links.join(",")
    )
}

#[test]
fn stroke_width_scenario() {
    let model = valid(
        r#"{"nodes":[{"id":"A"},{"id":"B"}],"links":[{"source":"A","target":"B","value":2}]}"#,
    );
    assert_eq!(model.nodes.len(), 2);
    assert_eq!(model.links.len(), 1);
    assert_eq!(model.links[0].stroke_width, 6.0);
}

#[test]
fn empty_and_invalid_scenarios() {
    assert_eq!(normalize("").view_state(), ViewState::NoData);
    assert!(matches!(
        normalize("{not json").view_state(),
        ViewState::InvalidFormat(_)
    ));
}

#[test]
fn neighbors_scenario() {
    let model = valid(
        r#"{"nodes":[{"id":"A"},{"id":"B"},{"id":"C"}],
            "links":[{"source":"A","target":"B"},{"source":"B","target":"C"}]}"#,
    );
    let result = filter(&model, &FilterState::new().with_center("A"));
    let ids: Vec<&str> = result.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["A", "B"]);
}

#[test]
fn properties_hold_across_filters_and_layouts() {
    let model = valid(&star(30));
    let states = [
        FilterState::new(),
        FilterState::new().with_tags(["even", "core"]),
        FilterState::new().with_center("hub"),
        FilterState::new().with_center("s3"),
        FilterState::new().with_tags(["odd"]).with_center("s5"),
    ];

    for state in &states {
        let filtered = filter(&model, state);

        // Idempotence
        assert_eq!(filter(&filtered, state), filtered);

        // Top-K label count
        let labelled = filtered.nodes.iter().filter(|n| n.label_visible).count();
        assert_eq!(labelled, LABEL_TOP_K.min(filtered.nodes.len()));

        for mode in LayoutMode::ALL {
            for display in [DisplayMode::Full, DisplayMode::Compact] {
                match build_option(&filtered, mode, display).series.first() {
                    Some(Series::Graph(series)) => {
                        let (min, max) = match display {
                            DisplayMode::Full => (12.0, 60.0),
                            DisplayMode::Compact => (6.0, 22.0),
                        };
                        assert!(
                            series
                                .data
                                .iter()
                                .all(|d| (min..=max).contains(&d.symbol_size))
                        );
                    }
                    Some(Series::Sankey(series)) => {
                        let names: HashSet<&str> =
                            series.data.iter().map(|d| d.name.as_str()).collect();
                        assert_eq!(names.len(), series.data.len());
                        assert!(series.links.iter().all(|l| l.value >= 0.1));
                    }
                    None => panic!("option without series"),
                }
            }
        }
    }
}

#[test]
fn neighbor_closure_in_category_filtered_graph() {
    let model = valid(&star(12));
    let state = FilterState::new().with_tags(["even", "core"]).with_center("s4");
    let by_category = filter(&model, &FilterState::new().with_tags(["even", "core"]));
    let result = filter(&model, &state);

    for node in &result.nodes {
        let adjacent = by_category.links.iter().any(|l| {
            (l.source == "s4" && l.target == node.id) || (l.target == "s4" && l.source == node.id)
        });
        assert!(node.id == "s4" || adjacent);
    }
    // s4's ring neighbors s3 and s5 are odd and filtered out; only the hub remains
    let ids: Vec<&str> = result.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["hub", "s4"]);
}

#[test]
fn sankey_click_round_trip() {
    let mut view = GraphView::new(&star(4));
    view.set_mode(LayoutMode::Sankey);

    // Every spoke is named "spoke"; the third one is displayed as "spoke (2)"
    view.click(&ClickEvent::node_name("spoke (2)"));
    assert_eq!(view.pending_center(), Some("s2"));

    view.set_neighbors_only(true);
    let ids: Vec<&str> = view.model().nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["hub", "s1", "s2", "s3"]);
}
