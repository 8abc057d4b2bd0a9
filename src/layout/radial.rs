//! Radial (circular) layout

use super::{
    ChartOption, CircularParams, DisplayMode, GraphLayout, LayoutBuilder, LayoutMode, Legend,
    Series, graph_series,
};
use crate::model::GraphModel;

/// Places nodes on a circle instead of simulating forces
#[derive(Debug, Clone, Copy, Default)]
pub struct RadialBuilder;

impl LayoutBuilder for RadialBuilder {
    fn build(&self, model: &GraphModel, display: DisplayMode) -> ChartOption {
        let mut series = graph_series(model, display, GraphLayout::Circular);
        series.circular = Some(CircularParams {
            rotate_label: display.is_interactive(),
        });

        ChartOption {
            legend: Legend::from_model(model),
            animation: display.is_interactive(),
            series: vec![Series::Graph(series)],
        }
    }

    fn mode(&self) -> LayoutMode {
        LayoutMode::Radial
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::ForceBuilder;
    use crate::layout::tests::{graph_series_of, model};

    const SAMPLE: &str = r#"{"nodes":[{"id":"a","tag":"x"},{"id":"b","weight":3}],
        "links":[{"source":"a","target":"b","value":1}]}"#;

    #[test]
    fn requests_circular_layout() {
        let option = RadialBuilder.build(&model(SAMPLE), DisplayMode::Full);
        let series = graph_series_of(&option);

        assert_eq!(series.layout, GraphLayout::Circular);
        assert!(series.force.is_none());
        assert_eq!(series.circular, Some(CircularParams { rotate_label: true }));
    }

    #[test]
    fn data_matches_force_layout() {
        let m = model(SAMPLE);
        for display in [DisplayMode::Full, DisplayMode::Compact] {
            let radial = RadialBuilder.build(&m, display);
            let force = ForceBuilder.build(&m, display);
            assert_eq!(graph_series_of(&radial).data, graph_series_of(&force).data);
            assert_eq!(graph_series_of(&radial).links, graph_series_of(&force).links);
            assert_eq!(radial.legend, force.legend);
        }
    }

    #[test]
    fn compact_mode_disables_interaction() {
        let option = RadialBuilder.build(&model(SAMPLE), DisplayMode::Compact);
        let series = graph_series_of(&option);
        assert!(!option.animation);
        assert!(!series.roam && !series.draggable);
    }
}
