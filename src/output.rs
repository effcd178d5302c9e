//! Output types for the page script.
//!
//! These structs are serialized to JSON and handed to JavaScript, and the
//! SVG surface applies the same values when it is attached.

use serde::Serialize;

use crate::data::Region;
use crate::layout::Point;
use crate::scale::{ScaleKind, Tick};

/// Animated move of one circle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircleTransition {
    pub country: String,
    pub region: Region,
    pub color: &'static str,
    pub radius: f64,
    pub from: Point,
    pub to: Point,
    pub duration_ms: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisOutput {
    /// Vertical offset of the axis line.
    pub y: f64,
    pub range: (f64, f64),
    pub ticks: Vec<Tick>,
    pub tick_size_outer: f64,
    pub duration_ms: u32,
}

/// Everything one redraw changes, keyed by country.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderPlan {
    /// Increases with every successful redraw; newer plans supersede older ones.
    pub generation: u64,
    pub scale: ScaleKind,
    pub legend_label: String,
    pub axis: AxisOutput,
    /// Countries not rendered before: start at the entry point.
    pub enter: Vec<CircleTransition>,
    /// Countries rendered before and still visible.
    pub update: Vec<CircleTransition>,
    /// Countries no longer visible: move to the entry point, then remove.
    pub exit: Vec<CircleTransition>,
    /// Visible countries left out because they lack the active measure.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
}

impl RenderPlan {
    /// Final position of every rendered country after this plan.
    pub fn targets(&self) -> impl Iterator<Item = (&str, Point)> {
        self.enter.iter().chain(&self.update).map(|t| (t.country.as_str(), t.to))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipContent {
    /// Page coordinates of the tooltip's top-left corner.
    pub left: f64,
    pub top: f64,
    pub country: String,
    pub measure_label: String,
    pub value: f64,
    pub value_text: String,
}

impl TooltipContent {
    pub fn lines(&self) -> [String; 2] {
        [
            format!("Country: {}", self.country),
            format!("{}: {}", self.measure_label, self.value_text),
        ]
    }

    pub fn text(&self) -> String {
        self.lines().join("\n")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Line {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Tooltip and guide line state. Hidden feedback carries no content: the
/// elements keep their last content and only their opacity changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoverFeedback {
    pub tooltip_opacity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<TooltipContent>,
    pub guide_opacity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guide: Option<Line>,
}

/// Error information for the page script.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub kind: &'static str,
    pub message: String,
}

/// The combined output returned by the wasm bindings.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChartOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<RenderPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hover: Option<HoverFeedback>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}
