//! Force-directed layout

use super::{
    ChartOption, DisplayMode, ForceParams, GraphLayout, LayoutBuilder, LayoutMode, Legend, Series,
    graph_series,
};
use crate::model::GraphModel;

/// Simulation tuning for the interactive canvas
const FULL_PARAMS: ForceParams = ForceParams {
    repulsion: 220.0,
    edge_length: [60.0, 180.0],
    gravity: 0.08,
    layout_animation: true,
};

/// Tighter, static simulation for previews
const COMPACT_PARAMS: ForceParams = ForceParams {
    repulsion: 60.0,
    edge_length: [20.0, 60.0],
    gravity: 0.2,
    layout_animation: false,
};

/// Builds a force-simulated node-link diagram
#[derive(Debug, Clone, Copy, Default)]
pub struct ForceBuilder;

impl ForceBuilder {
    /// Simulation parameters for a display mode
    pub fn params(display: DisplayMode) -> ForceParams {
        match display {
            DisplayMode::Full => FULL_PARAMS,
            DisplayMode::Compact => COMPACT_PARAMS,
        }
    }
}

impl LayoutBuilder for ForceBuilder {
    fn build(&self, model: &GraphModel, display: DisplayMode) -> ChartOption {
        let mut series = graph_series(model, display, GraphLayout::Force);
        series.force = Some(Self::params(display));

        ChartOption {
            legend: Legend::from_model(model),
            animation: display.is_interactive(),
            series: vec![Series::Graph(series)],
        }
    }

    fn mode(&self) -> LayoutMode {
        LayoutMode::Force
    }
}
