//! Beeswarm chart core.
//!
//! Loads a per-country dataset, maps the selected measure onto a linear or
//! logarithmic horizontal scale, settles the visible records into a
//! non-overlapping swarm and emits the transition plan a renderer animates.
//!
//! Submodules:
//! - data: records, regions, measures, CSV loading and category filtering
//! - scale: linear/log scales and axis ticks
//! - layout: force-directed swarm placement
//! - chart: state, redraw protocol, reconciliation and hover handling
//! - output: serializable plans and feedback sent to the renderer
//! - dom: applies plans to an SVG surface in the browser
//! - wasm: JavaScript bindings

pub mod chart;
pub mod data;
pub mod dom;
pub mod error;
pub mod layout;
pub mod output;
pub mod scale;
mod wasm;

pub use chart::{Action, Chart, ChartConfig, ChartState, Frame, PlacedCircle, RedrawPhase};
pub use data::{load_dataset, load_dataset_from_path, Dataset, Measure, Record, Region};
pub use error::{ChartError, Result};
pub use output::{ChartOutput, HoverFeedback, RenderPlan};
pub use scale::{build_scale, Scale, ScaleKind};
pub use wasm::BeeswarmChart;
