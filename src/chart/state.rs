// Chart state and the reducer that derives the next state from a user action.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::data::{Measure, Region};
use crate::scale::ScaleKind;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartState {
    /// Field that drives the x position.
    pub measure: Measure,
    pub scale_kind: ScaleKind,
    /// Display text for the active measure.
    pub legend_label: String,
    /// Ticked category checkboxes. Empty shows nothing.
    pub categories: BTreeSet<Region>,
}

impl Default for ChartState {
    fn default() -> Self {
        Self {
            measure: Measure::Total,
            scale_kind: ScaleKind::Linear,
            legend_label: Measure::Total.legend().to_string(),
            categories: Region::ALL.into_iter().collect(),
        }
    }
}

/// Something the user did on the control surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Action {
    SelectMeasure(Measure),
    SelectScale(ScaleKind),
    SetCategories(BTreeSet<Region>),
    /// Redraw with the current state.
    Redraw,
}

pub fn reduce(state: &ChartState, action: &Action) -> ChartState {
    let mut next = state.clone();
    match action {
        Action::SelectMeasure(measure) => {
            next.measure = *measure;
            next.legend_label = measure.legend().to_string();
        }
        Action::SelectScale(kind) => next.scale_kind = *kind,
        Action::SetCategories(categories) => next.categories = categories.clone(),
        Action::Redraw => {}
    }
    next
}
