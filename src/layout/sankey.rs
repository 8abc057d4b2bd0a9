//! Sankey (flow) layout
//!
//! Flow renderers address nodes by display name, not id, so every node needs a
//! globally unique name. Collisions get a ` (n)` suffix in iteration order:
//! `A`, `A (1)`, `A (2)`.

use std::collections::{HashMap, HashSet};

use super::{
    ChartOption, DisplayMode, EdgeLabel, ItemStyle, LayoutBuilder, LayoutMode, Legend,
    SankeyLinkItem, SankeyNodeItem, SankeySeries, Series,
};
use crate::model::{GraphModel, NormalizedNode};

/// Smallest flow a link is drawn with; renderers cannot draw zero-width flows
pub const SANKEY_MIN_VALUE: f64 = 0.1;

/// Flow assumed for links without a value
const DEFAULT_FLOW: f64 = 1.0;

/// Unique display names, parallel to `nodes`
///
/// The next free suffix is remembered per base name, so a long run of equal names
/// does not rescan the suffixes it already handed out.
pub fn sankey_display_names(nodes: &[NormalizedNode]) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::with_capacity(nodes.len());
    let mut next_suffix: HashMap<&str, usize> = HashMap::new();
    let mut names = Vec::with_capacity(nodes.len());

    for node in nodes {
        let base = node.name.as_str();
        let mut candidate = base.to_string();
        if used.contains(&candidate) {
            let n = next_suffix.entry(base).or_insert(1);
            loop {
                candidate = format!("{base} ({n})");
                *n += 1;
                if !used.contains(&candidate) {
                    break;
                }
            }
        }
        used.insert(candidate.clone());
        names.push(candidate);
    }

    names
}

/// Builds a flow diagram with unique node names
#[derive(Debug, Clone, Copy, Default)]
pub struct SankeyBuilder;

impl LayoutBuilder for SankeyBuilder {
    fn build(&self, model: &GraphModel, display: DisplayMode) -> ChartOption {
        let names = sankey_display_names(&model.nodes);
        let by_id: HashMap<&str, &str> = model
            .nodes
            .iter()
            .zip(&names)
            .map(|(node, name)| (node.id.as_str(), name.as_str()))
            .collect();

        // Unknown endpoints keep their raw id; the renderer decides what to do with them
        let display_name = |id: &str| -> String {
            match by_id.get(id) {
                Some(name) => (*name).to_string(),
                None => id.to_string(),
            }
        };

        let data = model
            .nodes
            .iter()
            .zip(&names)
            .map(|(node, name)| SankeyNodeItem {
                name: name.clone(),
                item_style: node.color.clone().map(|color| ItemStyle { color }),
            })
            .collect();

        let links = model
            .links
            .iter()
            .map(|link| SankeyLinkItem {
                source: display_name(&link.source),
                target: display_name(&link.target),
                value: link.value.unwrap_or(DEFAULT_FLOW).max(SANKEY_MIN_VALUE),
                label: link.label.clone().map(|formatter| EdgeLabel {
                    show: true,
                    formatter,
                }),
            })
            .collect();

        ChartOption {
            legend: Legend::from_model(model),
            animation: display.is_interactive(),
            series: vec![Series::Sankey(SankeySeries {
                draggable: display.is_interactive(),
                data,
                links,
            })],
        }
    }

    fn mode(&self) -> LayoutMode {
        LayoutMode::Sankey
    }
}
