//! Redraw controller.
//!
//! Every user action goes through [`Chart::dispatch`]: the reducer derives
//! the next [`ChartState`], a [`Frame`] is computed from scratch (filter,
//! scale, axis, layout), and only if that succeeds is it reconciled against
//! the circles on screen into a [`RenderPlan`]. A failed computation leaves
//! state and rendered circles exactly as they were.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::{filter, Dataset, Region};
use crate::error::{ChartError, Result};
use crate::layout::{layout_swarm, ForceConfig, Point};
use crate::output::{HoverFeedback, RenderPlan};
use crate::scale::{build_scale, domain_of, Scale, Tick};

pub mod interaction;
pub mod reconcile;
pub mod state;

pub use interaction::InteractionEvent;
pub use state::{reduce, Action, ChartState};

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self { top: 0.0, right: 40.0, bottom: 34.0, left: 40.0 }
    }
}

/// Animation durations in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    pub axis_ms: u32,
    pub enter_ms: u32,
    pub update_ms: u32,
    pub exit_ms: u32,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self { axis_ms: 2000, enter_ms: 2000, update_ms: 2000, exit_ms: 1000 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
    /// Drawn radius. Smaller than the collision radius, leaving a gap.
    pub circle_radius: f64,
    pub tick_count: usize,
    pub force: ForceConfig,
    pub transitions: TransitionConfig,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 400.0,
            margin: Margin::default(),
            circle_radius: 6.0,
            tick_count: 10,
            force: ForceConfig::default(),
            transitions: TransitionConfig::default(),
        }
    }
}

impl ChartConfig {
    pub fn x_range(&self) -> (f64, f64) {
        (self.margin.left, self.width - self.margin.right)
    }

    /// Line the swarm gathers around.
    pub fn center_y(&self) -> f64 {
        self.height / 2.0 - self.margin.bottom / 2.0
    }

    pub fn axis_y(&self) -> f64 {
        self.height - self.margin.bottom
    }

    /// Where circles enter from and exit to: the origin of the axis group.
    pub fn entry_point(&self) -> Point {
        Point { x: 0.0, y: self.center_y() }
    }

    pub fn validate(&self) -> Result<()> {
        let (left, right) = self.x_range();
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(ChartError::InvalidConfig(format!(
                "canvas must have a positive size, got {}x{}",
                self.width, self.height
            )));
        }
        if !(right > left) {
            return Err(ChartError::InvalidConfig(format!(
                "horizontal margins leave no plot area ({left}..{right})"
            )));
        }
        if !(self.axis_y() > self.margin.top) {
            return Err(ChartError::InvalidConfig("vertical margins leave no plot area".to_string()));
        }
        if !(self.circle_radius > 0.0) {
            return Err(ChartError::InvalidConfig(format!(
                "circle_radius must be positive, got {}",
                self.circle_radius
            )));
        }
        self.force.validate().map_err(ChartError::InvalidConfig)
    }
}

/// Render data for one visible record after layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedCircle {
    pub country: String,
    pub region: Region,
    /// Value of the active measure.
    pub value: f64,
    pub position: Point,
}

/// Result of the computing steps of a redraw.
#[derive(Debug, Clone)]
pub struct Frame {
    pub scale: Scale,
    pub ticks: Vec<Tick>,
    pub circles: Vec<PlacedCircle>,
    pub skipped: Vec<String>,
}

/// Filter, fit the scale, build the axis and lay out the swarm.
pub fn compute_frame(dataset: &Dataset, state: &ChartState, config: &ChartConfig) -> Result<Frame> {
    let visible = filter(&dataset.records, Some(&state.categories));

    let mut measured = Vec::with_capacity(visible.len());
    let mut skipped = Vec::new();
    for record in visible.iter() {
        match record.measure(state.measure) {
            Some(value) => measured.push((record, value)),
            None => {
                tracing::warn!(
                    country = %record.country,
                    measure = state.measure.column(),
                    "record has no value for the active measure, skipped"
                );
                skipped.push(record.country.clone());
            }
        }
    }

    let domain = domain_of(measured.iter().map(|&(_, v)| v));
    let scale = build_scale(state.scale_kind, domain, config.x_range())?;
    let ticks = scale.tick_labels(config.tick_count);

    let targets: Vec<f64> = measured.iter().map(|&(_, v)| scale.apply(v)).collect();
    let positions = layout_swarm(&targets, config.center_y(), &config.force);

    let circles = measured
        .into_iter()
        .zip(positions)
        .map(|((record, value), position)| {
            if !position.is_finite() {
                return Err(ChartError::NonFinitePosition { country: record.country.clone() });
            }
            Ok(PlacedCircle { country: record.country.clone(), region: record.region, value, position })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Frame { scale, ticks, circles, skipped })
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum RedrawPhase {
    Idle,
    Computing,
    /// Host is animating the plan with this generation.
    Transitioning { generation: u64 },
}

pub struct Chart {
    config: ChartConfig,
    dataset: Dataset,
    state: ChartState,
    /// Circles as left by the last successful plan, keyed by country.
    rendered: BTreeMap<String, PlacedCircle>,
    phase: RedrawPhase,
    generation: u64,
}

impl Chart {
    pub fn new(dataset: Dataset, config: ChartConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            dataset,
            state: ChartState::default(),
            rendered: BTreeMap::new(),
            phase: RedrawPhase::Idle,
            generation: 0,
        })
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn state(&self) -> &ChartState {
        &self.state
    }

    pub fn phase(&self) -> RedrawPhase {
        self.phase
    }

    pub fn rendered(&self) -> impl Iterator<Item = &PlacedCircle> {
        self.rendered.values()
    }

    /// Apply a user action and produce the plan that brings the screen to the
    /// new state. Supersedes any transition still running.
    pub fn dispatch(&mut self, action: Action) -> Result<RenderPlan> {
        let next = reduce(&self.state, &action);
        let previous_phase = std::mem::replace(&mut self.phase, RedrawPhase::Computing);

        let frame = match compute_frame(&self.dataset, &next, &self.config) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!(?action, error = %e, "redraw rejected, keeping previous render");
                self.phase = previous_phase;
                return Err(e);
            }
        };

        self.generation += 1;
        let plan = reconcile::plan(&self.rendered, &frame, &next.legend_label, self.generation, &self.config);
        tracing::debug!(
            generation = self.generation,
            enter = plan.enter.len(),
            update = plan.update.len(),
            exit = plan.exit.len(),
            "redraw planned"
        );

        self.rendered = frame.circles.into_iter().map(|c| (c.country.clone(), c)).collect();
        self.state = next;
        self.phase = RedrawPhase::Transitioning { generation: self.generation };
        Ok(plan)
    }

    pub fn redraw(&mut self) -> Result<RenderPlan> {
        self.dispatch(Action::Redraw)
    }

    /// Host callback once the animation of `generation` has finished.
    /// Completions of superseded plans are ignored.
    pub fn complete_transition(&mut self, generation: u64) -> bool {
        match self.phase {
            RedrawPhase::Transitioning { generation: current } if current == generation => {
                self.phase = RedrawPhase::Idle;
                true
            }
            _ => false,
        }
    }

    /// Build a hover event for a rendered country.
    pub fn interaction_event(&self, country: &str, pointer: Point) -> Option<InteractionEvent> {
        self.rendered.get(country).map(|c| InteractionEvent {
            country: c.country.clone(),
            position: c.position,
            pointer,
        })
    }

    pub fn hover(&self, country: &str, pointer: Point) -> Option<HoverFeedback> {
        let event = self.interaction_event(country, pointer)?;
        let value = self.rendered.get(country)?.value;
        Some(interaction::hover(&event, value, &self.state.legend_label, &self.config))
    }

    pub fn hover_exit(&self) -> HoverFeedback {
        interaction::hover_exit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Measure, Record};
    use crate::scale::ScaleKind;
    use std::collections::{BTreeSet, HashMap};

    fn record(country: &str, region: Region, total: f64) -> Record {
        Record::new(country, region).with_measure(Measure::Total, total)
    }

    fn six_category_dataset() -> Dataset {
        let records = Region::ALL
            .iter()
            .enumerate()
            .flat_map(|(i, &region)| {
                (0..3).map(move |k| record(&format!("{region}-{k}"), region, (1 + i * 10 + k * 3) as f64))
            })
            .collect();
        Dataset::from_records(records)
    }

    fn chart(dataset: Dataset) -> Chart {
        Chart::new(dataset, ChartConfig::default()).unwrap()
    }

    fn positions(plan: &RenderPlan) -> HashMap<String, Point> {
        plan.targets().map(|(c, p)| (c.to_string(), p)).collect()
    }

    #[test]
    fn test_first_redraw_enters_every_circle_from_entry_point() {
        let mut chart = chart(six_category_dataset());
        let plan = chart.redraw().unwrap();

        assert_eq!(plan.generation, 1);
        assert_eq!(plan.enter.len(), 18);
        assert!(plan.update.is_empty() && plan.exit.is_empty());
        let entry = chart.config().entry_point();
        for t in &plan.enter {
            assert_eq!(t.from, entry);
            assert_eq!(t.color, t.region.color());
            assert_eq!(t.duration_ms, 2000);
            assert!(t.to.is_finite());
        }
        assert_eq!(plan.axis.y, 366.0);
        assert_eq!(plan.axis.tick_size_outer, 0.0);
        assert!(!plan.axis.ticks.is_empty());
    }

    #[test]
    fn test_shared_value_scenario() {
        let dataset = Dataset::from_records(vec![
            record("A", Region::Wildfire, 10.0),
            record("B", Region::Drought, 10.0),
        ]);
        let mut chart = chart(dataset);
        let plan = chart.redraw().unwrap();
        let pos = positions(&plan);

        let diameter = chart.config().force.collision_diameter();
        let (a, b) = (pos["A"], pos["B"]);
        assert!((a.y - b.y).abs() >= diameter - 1.0);
        // Degenerate domain: both target the middle of the axis.
        let mid = 500.0;
        assert!((a.x - mid).abs() < 1.0 && (b.x - mid).abs() < 1.0);
    }

    #[test]
    fn test_single_category_filter_scenario() {
        let mut chart = chart(six_category_dataset());
        chart.redraw().unwrap();

        let only_drought: BTreeSet<Region> = [Region::Drought].into_iter().collect();
        let plan = chart.dispatch(Action::SetCategories(only_drought)).unwrap();

        assert!(plan.enter.is_empty());
        assert_eq!(plan.update.len(), 3);
        assert!(plan.update.iter().all(|t| t.region == Region::Drought));
        assert_eq!(plan.exit.len(), 15);
        let entry = chart.config().entry_point();
        assert!(plan.exit.iter().all(|t| t.to == entry && t.duration_ms == 1000));

        let rendered: Vec<Region> = chart.rendered().map(|c| c.region).collect();
        assert_eq!(rendered, vec![Region::Drought; 3]);
    }

    #[test]
    fn test_update_starts_from_previous_position() {
        let mut chart = chart(six_category_dataset());
        let first = positions(&chart.redraw().unwrap());

        let only_two: BTreeSet<Region> = [Region::Heatwave, Region::Wildfire].into_iter().collect();
        let plan = chart.dispatch(Action::SetCategories(only_two)).unwrap();
        for t in &plan.update {
            assert_eq!(t.from, first[&t.country]);
        }
    }

    #[test]
    fn test_empty_selection_renders_nothing() {
        let mut chart = chart(six_category_dataset());
        chart.redraw().unwrap();
        let plan = chart.dispatch(Action::SetCategories(BTreeSet::new())).unwrap();

        assert!(plan.enter.is_empty() && plan.update.is_empty());
        assert_eq!(plan.exit.len(), 18);
        assert!(plan.axis.ticks.is_empty());
        assert_eq!(chart.rendered().count(), 0);
    }

    #[test]
    fn test_scale_round_trip_restores_positions() {
        let mut chart = chart(six_category_dataset());
        let linear = positions(&chart.redraw().unwrap());

        let log = positions(&chart.dispatch(Action::SelectScale(ScaleKind::Log)).unwrap());
        assert_ne!(log, linear);

        let back = positions(&chart.dispatch(Action::SelectScale(ScaleKind::Linear)).unwrap());
        assert_eq!(back, linear);
    }

    #[test]
    fn test_log_over_non_positive_data_is_rejected() {
        let mut records = six_category_dataset().records;
        records.push(record("Zero", Region::Heatwave, 0.0));
        let mut chart = chart(Dataset::from_records(records));
        let before = chart.redraw().unwrap();

        let err = chart.dispatch(Action::SelectScale(ScaleKind::Log)).unwrap_err();
        assert!(matches!(err, ChartError::InvalidDomain { .. }));

        // Previous render, state and phase are untouched.
        assert_eq!(chart.state().scale_kind, ScaleKind::Linear);
        assert_eq!(chart.phase(), RedrawPhase::Transitioning { generation: before.generation });
        let rendered: HashMap<String, Point> =
            chart.rendered().map(|c| (c.country.clone(), c.position)).collect();
        assert_eq!(rendered, positions(&before));
        assert!(rendered.values().all(Point::is_finite));
    }

    #[test]
    fn test_records_without_measure_are_skipped() {
        let mut records = six_category_dataset().records;
        records.push(Record::new("NoValue", Region::Drought));
        let mut chart = chart(Dataset::from_records(records));

        let plan = chart.redraw().unwrap();
        assert_eq!(plan.skipped, vec!["NoValue".to_string()]);
        assert_eq!(plan.enter.len(), 18);
        assert!(chart.hover("NoValue", Point::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn test_phases_and_stale_completion() {
        let mut chart = chart(six_category_dataset());
        assert_eq!(chart.phase(), RedrawPhase::Idle);

        let first = chart.redraw().unwrap();
        let second = chart.dispatch(Action::SelectScale(ScaleKind::Log)).unwrap();
        assert_eq!(chart.phase(), RedrawPhase::Transitioning { generation: second.generation });

        // The superseded animation finishing late changes nothing.
        assert!(!chart.complete_transition(first.generation));
        assert_eq!(chart.phase(), RedrawPhase::Transitioning { generation: second.generation });

        assert!(chart.complete_transition(second.generation));
        assert_eq!(chart.phase(), RedrawPhase::Idle);
    }

    #[test]
    fn test_hover_scenario() {
        let dataset = Dataset::from_records(vec![
            record("A", Region::Wildfire, 10.0),
            record("B", Region::Drought, 1234.0),
        ]);
        let mut chart = chart(dataset);
        chart.redraw().unwrap();

        let b = chart.rendered().find(|c| c.country == "B").unwrap().position;
        let feedback = chart.hover("B", Point::new(300.0, 200.0)).unwrap();
        let tooltip = feedback.tooltip.as_ref().unwrap();
        assert!(tooltip.text().contains("B"));
        assert!(tooltip.text().contains("1,234"));
        assert_eq!(feedback.guide.unwrap().x1, b.x);

        let hidden = chart.hover_exit();
        assert_eq!(hidden.tooltip_opacity, 0.0);
        assert_eq!(hidden.guide_opacity, 0.0);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = ChartConfig { width: 60.0, ..ChartConfig::default() };
        assert!(matches!(
            Chart::new(Dataset::default(), config),
            Err(ChartError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: ChartConfig =
            serde_json::from_str(r#"{"width": 800, "margin": {"left": 20}, "force": {"collide_radius": 7}}"#)
                .unwrap();
        assert_eq!(config.x_range(), (20.0, 760.0));
        assert_eq!(config.force.collision_diameter(), 14.0);
        assert_eq!(config.center_y(), 183.0);
    }
}
