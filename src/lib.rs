//! graphview - Normalize loosely-typed node/link graphs into render-ready chart options.
//!
//! The pipeline runs in one direction:
//!
//! 1. [`normalize`] parses raw JSON text into a [`model::GraphModel`].
//! 2. [`filter`] reduces it by category and to a node's neighborhood.
//! 3. [`layout`] builds a force, radial or sankey option for a chart renderer.
//!
//! Renderer clicks come back through [`interaction`], which updates the filter state.
//! [`view::GraphView`] wires the stages together.

pub mod config;
pub mod filter;
pub mod interaction;
pub mod io;
pub mod layout;
pub mod model;
pub mod normalize;
pub mod view;

pub use filter::FilterState;
pub use layout::{ChartOption, DisplayMode, LayoutMode};
pub use model::GraphModel;
pub use normalize::{ParsedGraph, ViewState};
pub use view::GraphView;
