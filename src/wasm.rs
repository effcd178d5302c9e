//! WASM bindings for the beeswarm chart.
//!
//! All functions exposed to JavaScript via wasm-bindgen are defined here.
//! Mutating calls return a JSON `ChartOutput`; failures are reported both
//! on the console and in its `error` field.

use std::collections::BTreeSet;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::chart::{Action, Chart, ChartConfig};
use crate::data::{self, Measure, Region};
use crate::dom::SvgSurface;
use crate::error::ChartError;
use crate::layout::Point;
use crate::output::{ChartOutput, ErrorInfo, HoverFeedback, RenderPlan};
use crate::scale::ScaleKind;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = log)]
    pub fn console_log(s: &str);

    #[wasm_bindgen(js_namespace = console, js_name = error)]
    pub fn console_error(s: &str);
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        console_error(&format!("Error serializing output: {e}"));
        r#"{"error":{"kind":"json","message":"output could not be serialized"}}"#.to_string()
    })
}

fn error_output(e: &ChartError) -> ChartOutput {
    console_error(&format!("Chart error: {e}"));
    ChartOutput {
        error: Some(ErrorInfo { kind: e.kind(), message: e.to_string() }),
        ..ChartOutput::default()
    }
}

#[wasm_bindgen]
pub struct BeeswarmChart {
    chart: Chart,
    surface: Option<SvgSurface>,
}

#[wasm_bindgen]
impl BeeswarmChart {
    /// Load the dataset and build the chart. Load failures are thrown.
    #[wasm_bindgen(constructor)]
    pub fn new(csv_text: &str, config_json: &str) -> Result<BeeswarmChart, JsValue> {
        let build = || -> Result<Chart, ChartError> {
            let config: ChartConfig = if config_json.trim().is_empty() {
                ChartConfig::default()
            } else {
                serde_json::from_str(config_json)?
            };
            let dataset = data::load_dataset(csv_text)?;
            for warning in &dataset.warnings {
                console_log(&format!("Skipped while loading: {warning}"));
            }
            Chart::new(dataset, config)
        };
        build()
            .map(|chart| BeeswarmChart { chart, surface: None })
            .map_err(|e| {
                console_error(&format!("Error loading chart: {e}"));
                JsValue::from_str(&e.to_string())
            })
    }

    /// Create the SVG surface inside the element matching `selector`.
    pub fn attach(&mut self, selector: &str) -> Result<(), JsValue> {
        self.surface = Some(SvgSurface::attach(selector, self.chart.config())?);
        Ok(())
    }

    pub fn redraw(&mut self) -> String {
        self.run(Ok(Action::Redraw))
    }

    pub fn set_scale(&mut self, kind: &str) -> String {
        self.run(kind.parse::<ScaleKind>().map(Action::SelectScale))
    }

    pub fn set_measure(&mut self, measure: &str) -> String {
        self.run(measure.parse::<Measure>().map(Action::SelectMeasure))
    }

    /// `categories_json` is an array of region labels, e.g. `["Drought"]`.
    pub fn set_categories(&mut self, categories_json: &str) -> String {
        let action = serde_json::from_str::<BTreeSet<Region>>(categories_json)
            .map(Action::SetCategories)
            .map_err(ChartError::from);
        self.run(action)
    }

    pub fn hover(&mut self, country: &str, page_x: f64, page_y: f64) -> String {
        match self.chart.hover(country, Point::new(page_x, page_y)) {
            Some(feedback) => self.show_hover(feedback),
            None => to_json(&ChartOutput::default()),
        }
    }

    pub fn hover_exit(&mut self) -> String {
        let feedback = self.chart.hover_exit();
        self.show_hover(feedback)
    }

    /// Report that the animation of a plan has finished.
    pub fn complete_transition(&mut self, generation: f64) -> bool {
        self.chart.complete_transition(generation as u64)
    }

    /// Warnings collected while loading the dataset, as a JSON array.
    pub fn warnings(&self) -> String {
        to_json(&self.chart.dataset().warnings)
    }

    pub fn state(&self) -> String {
        to_json(self.chart.state())
    }

    /// Category legend (label and color per region) as JSON.
    pub fn legend() -> String {
        to_json(&data::legend())
    }
}

impl BeeswarmChart {
    fn run(&mut self, action: Result<Action, ChartError>) -> String {
        let output = match action.and_then(|a| self.chart.dispatch(a)) {
            Ok(plan) => self.show_plan(plan),
            Err(e) => error_output(&e),
        };
        to_json(&output)
    }

    fn show_plan(&mut self, plan: RenderPlan) -> ChartOutput {
        if let Some(surface) = self.surface.as_mut() {
            if let Err(e) = surface.apply_plan(&plan) {
                console_error(&format!("Error applying render plan: {e:?}"));
            }
        }
        ChartOutput { plan: Some(plan), ..ChartOutput::default() }
    }

    fn show_hover(&mut self, feedback: HoverFeedback) -> String {
        if let Some(surface) = self.surface.as_ref() {
            if let Err(e) = surface.apply_hover(&feedback) {
                console_error(&format!("Error applying hover feedback: {e:?}"));
            }
        }
        to_json(&ChartOutput { hover: Some(feedback), ..ChartOutput::default() })
    }
}
