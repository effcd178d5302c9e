// Keyed reconciliation between the circles on screen and a new frame.
//
// added   = visible - rendered  (enter from the entry point)
// removed = rendered - visible  (exit to the entry point)
// kept    = visible ∩ rendered  (move from previous to new position)

use std::collections::{BTreeMap, HashSet};

use super::{ChartConfig, Frame, PlacedCircle};
use crate::layout::Point;
use crate::output::{AxisOutput, CircleTransition, RenderPlan};

#[derive(Debug, Default)]
pub struct Diff<'a> {
    pub added: Vec<&'a PlacedCircle>,
    /// New placement together with the previously rendered position.
    pub kept: Vec<(&'a PlacedCircle, Point)>,
    pub removed: Vec<&'a PlacedCircle>,
}

pub fn diff<'a>(rendered: &'a BTreeMap<String, PlacedCircle>, next: &'a [PlacedCircle]) -> Diff<'a> {
    let mut out = Diff::default();
    let visible: HashSet<&str> = next.iter().map(|c| c.country.as_str()).collect();

    for circle in next {
        match rendered.get(&circle.country) {
            Some(previous) => out.kept.push((circle, previous.position)),
            None => out.added.push(circle),
        }
    }
    out.removed = rendered
        .values()
        .filter(|c| !visible.contains(c.country.as_str()))
        .collect();
    out
}

pub fn plan(
    rendered: &BTreeMap<String, PlacedCircle>,
    frame: &Frame,
    legend_label: &str,
    generation: u64,
    config: &ChartConfig,
) -> RenderPlan {
    let entry = config.entry_point();
    let durations = &config.transitions;
    let d = diff(rendered, &frame.circles);

    let transition = |c: &PlacedCircle, from: Point, to: Point, duration_ms: u32| CircleTransition {
        country: c.country.clone(),
        region: c.region,
        color: c.region.color(),
        radius: config.circle_radius,
        from,
        to,
        duration_ms,
    };

    RenderPlan {
        generation,
        scale: frame.scale.kind(),
        legend_label: legend_label.to_string(),
        axis: AxisOutput {
            y: config.axis_y(),
            range: config.x_range(),
            ticks: frame.ticks.clone(),
            tick_size_outer: 0.0,
            duration_ms: durations.axis_ms,
        },
        enter: d
            .added
            .iter()
            .map(|&c| transition(c, entry, c.position, durations.enter_ms))
            .collect(),
        update: d
            .kept
            .iter()
            .map(|&(c, previous)| transition(c, previous, c.position, durations.update_ms))
            .collect(),
        exit: d
            .removed
            .iter()
            .map(|&c| transition(c, c.position, entry, durations.exit_ms))
            .collect(),
        skipped: frame.skipped.clone(),
    }
}
