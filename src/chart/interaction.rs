// Hover feedback: tooltip next to the pointer and a dashed guide line from
// the hovered circle down to the axis. Purely presentational.

use serde::Serialize;

use super::ChartConfig;
use crate::layout::Point;
use crate::output::{HoverFeedback, Line, TooltipContent};
use crate::scale::format_grouped;

const TOOLTIP_OFFSET_X: f64 = 25.0;
const TOOLTIP_OFFSET_Y: f64 = -12.0;
const TOOLTIP_OPACITY: f64 = 0.9;

/// A hover over one rendered circle, carrying its last computed position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractionEvent {
    pub country: String,
    pub position: Point,
    /// Pointer position in page coordinates.
    pub pointer: Point,
}

pub fn hover(event: &InteractionEvent, value: f64, legend_label: &str, config: &ChartConfig) -> HoverFeedback {
    let tooltip = TooltipContent {
        left: event.pointer.x + TOOLTIP_OFFSET_X,
        top: event.pointer.y + TOOLTIP_OFFSET_Y,
        country: event.country.clone(),
        measure_label: legend_label.to_string(),
        value,
        value_text: format_grouped(value),
    };
    let guide = Line {
        x1: event.position.x,
        y1: event.position.y,
        x2: event.position.x,
        y2: config.axis_y(),
    };
    HoverFeedback {
        tooltip_opacity: TOOLTIP_OPACITY,
        tooltip: Some(tooltip),
        guide_opacity: 1.0,
        guide: Some(guide),
    }
}

pub fn hover_exit() -> HoverFeedback {
    HoverFeedback { tooltip_opacity: 0.0, tooltip: None, guide_opacity: 0.0, guide: None }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hover_positions_tooltip_and_guide() {
        let config = ChartConfig::default();
        let event = InteractionEvent {
            country: "B".to_string(),
            position: Point::new(480.0, 175.0),
            pointer: Point::new(600.0, 300.0),
        };
        let feedback = hover(&event, 12345.0, "Total", &config);

        let tooltip = feedback.tooltip.as_ref().unwrap();
        assert_eq!((tooltip.left, tooltip.top), (625.0, 288.0));
        assert_eq!(tooltip.text(), "Country: B\nTotal: 12,345");
        assert_eq!(feedback.tooltip_opacity, 0.9);

        let guide = feedback.guide.unwrap();
        assert_eq!((guide.x1, guide.y1), (480.0, 175.0));
        assert_eq!((guide.x2, guide.y2), (480.0, 366.0));
        assert_eq!(feedback.guide_opacity, 1.0);
    }

    #[test]
    fn test_hover_exit_only_hides() {
        let feedback = hover_exit();
        assert_eq!(feedback.tooltip_opacity, 0.0);
        assert_eq!(feedback.guide_opacity, 0.0);
        assert!(feedback.tooltip.is_none() && feedback.guide.is_none());
    }
}
