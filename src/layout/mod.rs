//! Layout option builders
//!
//! Each builder maps a filtered [`GraphModel`] to a [`ChartOption`], the configuration
//! object a generic chart renderer consumes. The renderer does the actual layout work
//! (force simulation, circular placement, sankey flow); builders only describe data
//! and tuning.
//!
//! | Mode     | Builder          | Series         |
//! |----------|------------------|----------------|
//! | `force`  | [`ForceBuilder`] | graph, force   |
//! | `radial` | [`RadialBuilder`]| graph, circular|
//! | `sankey` | [`SankeyBuilder`]| sankey         |
//!
//! Builders are total: an empty model produces an option with no nodes or links.

mod force;
mod radial;
mod sankey;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::GraphModel;

pub use force::ForceBuilder;
pub use radial::RadialBuilder;
pub use sankey::{SANKEY_MIN_VALUE, SankeyBuilder, sankey_display_names};

/// Compact-mode symbol scale relative to the full-mode size
pub const COMPACT_SCALE: f64 = 0.6;

/// Compact-mode symbol size bounds
pub const COMPACT_SIZE_MIN: f64 = 6.0;
pub const COMPACT_SIZE_MAX: f64 = 22.0;

/// Which diagram style to build
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    #[default]
    Force,
    Radial,
    Sankey,
}

impl LayoutMode {
    /// All modes, in selector order
    pub const ALL: [LayoutMode; 3] = [LayoutMode::Force, LayoutMode::Radial, LayoutMode::Sankey];

    /// Identifier used in configs and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutMode::Force => "force",
            LayoutMode::Radial => "radial",
            LayoutMode::Sankey => "sankey",
        }
    }

    /// The builder for this mode
    pub fn builder(&self) -> &'static dyn LayoutBuilder {
        match self {
            LayoutMode::Force => &ForceBuilder,
            LayoutMode::Radial => &RadialBuilder,
            LayoutMode::Sankey => &SankeyBuilder,
        }
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Size class of the host surface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// Interactive canvas with panning, zooming, dragging and animation
    #[default]
    Full,
    /// Small static preview, e.g. inside a table cell
    Compact,
}

impl DisplayMode {
    /// From a `compact` flag
    pub fn from_compact(compact: bool) -> Self {
        if compact {
            DisplayMode::Compact
        } else {
            DisplayMode::Full
        }
    }

    /// Whether the user can pan, zoom and drag
    pub fn is_interactive(&self) -> bool {
        matches!(self, DisplayMode::Full)
    }

    /// Rescale a full-mode symbol size for this display
    pub fn symbol_size(&self, full_size: f64) -> f64 {
        match self {
            DisplayMode::Full => full_size,
            DisplayMode::Compact => {
                (full_size * COMPACT_SCALE).clamp(COMPACT_SIZE_MIN, COMPACT_SIZE_MAX)
            }
        }
    }
}

/// Maps a filtered graph to renderer configuration for one diagram style
pub trait LayoutBuilder: Sync {
    /// Build the renderer option
    fn build(&self, model: &GraphModel, display: DisplayMode) -> ChartOption;

    /// The mode this builder serves
    fn mode(&self) -> LayoutMode;
}

/// Build the option for `mode`
pub fn build_option(model: &GraphModel, mode: LayoutMode, display: DisplayMode) -> ChartOption {
    let option = mode.builder().build(model, display);
    let surface = display;
    tracing::debug!(%mode, ?surface, "built chart option");
    option
}

/// Complete renderer configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOption {
    /// Category legend
    pub legend: Legend,

    /// Whether the renderer animates transitions
    pub animation: bool,

    /// Exactly one series per option
    pub series: Vec<Series>,
}

impl ChartOption {
    /// The single series of this option
    pub fn primary_series(&self) -> Option<&Series> {
        self.series.first()
    }
}

/// Legend entries, one per category
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Legend {
    pub data: Vec<String>,
}

impl Legend {
    fn from_model(model: &GraphModel) -> Self {
        Self {
            data: model.categories.iter().map(|c| c.name.clone()).collect(),
        }
    }
}

/// A renderer series, tagged by chart type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Series {
    Graph(GraphSeries),
    Sankey(SankeySeries),
}

/// Node-link series laid out by force simulation or on a circle
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSeries {
    pub layout: GraphLayout,
    pub roam: bool,
    pub draggable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force: Option<ForceParams>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub circular: Option<CircularParams>,
    pub categories: Vec<CategoryItem>,
    pub data: Vec<GraphNodeItem>,
    pub links: Vec<GraphLinkItem>,
}

/// Layout algorithm requested from the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphLayout {
    Force,
    Circular,
}

/// Force simulation tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForceParams {
    /// Node repulsion strength
    pub repulsion: f64,
    /// Rest length range for edges
    pub edge_length: [f64; 2],
    /// Pull towards the center
    pub gravity: f64,
    pub layout_animation: bool,
}

/// Circular layout tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CircularParams {
    pub rotate_label: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryItem {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNodeItem {
    pub id: String,
    pub name: String,
    pub value: f64,
    pub symbol_size: f64,
    pub category: usize,
    pub label: LabelStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_style: Option<ItemStyle>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphLinkItem {
    pub source: String,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    pub line_style: LineStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<EdgeLabel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LabelStyle {
    pub show: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemStyle {
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineStyle {
    pub width: f64,
}

/// Text drawn along an edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeLabel {
    pub show: bool,
    pub formatter: String,
}

/// Flow diagram series; node names must be unique
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SankeySeries {
    pub draggable: bool,
    pub data: Vec<SankeyNodeItem>,
    pub links: Vec<SankeyLinkItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SankeyNodeItem {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_style: Option<ItemStyle>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SankeyLinkItem {
    pub source: String,
    pub target: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<EdgeLabel>,
}

/// Shared node/link mapping for the graph-series builders
fn graph_series(model: &GraphModel, display: DisplayMode, layout: GraphLayout) -> GraphSeries {
    let data = model
        .nodes
        .iter()
        .map(|node| GraphNodeItem {
            id: node.id.clone(),
            name: node.name.clone(),
            value: node.value,
            symbol_size: display.symbol_size(node.symbol_size),
            category: node.category_index,
            label: LabelStyle {
                show: node.label_visible,
            },
            item_style: node.color.clone().map(|color| ItemStyle { color }),
        })
        .collect();

    let links = model
        .links
        .iter()
        .map(|link| GraphLinkItem {
            source: link.source.clone(),
            target: link.target.clone(),
            value: link.value,
            line_style: LineStyle {
                width: link.stroke_width,
            },
            label: link.label.clone().map(|formatter| EdgeLabel {
                show: display.is_interactive(),
                formatter,
            }),
        })
        .collect();

    let interactive = display.is_interactive();
    GraphSeries {
        layout,
        roam: interactive,
        draggable: interactive,
        force: None,
        circular: None,
        categories: model
            .categories
            .iter()
            .map(|c| CategoryItem {
                name: c.name.clone(),
            })
            .collect(),
        data,
        links,
    }
}
