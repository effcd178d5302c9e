//! SVG rendering surface.
//!
//! Applies render plans and hover feedback to the page with web-sys.
//! Circles move with CSS transitions on their `cx`/`cy` properties, so a
//! newer plan simply retargets circles that are still moving.

use std::collections::HashMap;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CssStyleDeclaration, Document, Element, HtmlElement, Node, SvgElement};

use crate::chart::ChartConfig;
use crate::layout::Point;
use crate::output::{AxisOutput, CircleTransition, HoverFeedback, RenderPlan};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const GUIDE_STROKE: &str = "rgb(96,125,139)";
const TICK_SIZE: f64 = 6.0;

pub struct SvgSurface {
    document: Document,
    axis: Element,
    guide: Element,
    tooltip: HtmlElement,
    svg: Element,
    /// Live circle elements by country. Exiting circles leave this map
    /// immediately and are removed from the page after their animation.
    circles: HashMap<String, Element>,
}

impl SvgSurface {
    /// Create the SVG, axis group, guide line and tooltip inside the element
    /// matching `anchor_selector`.
    pub fn attach(anchor_selector: &str, config: &ChartConfig) -> Result<Self, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document available"))?;
        let anchor = document
            .query_selector(anchor_selector)?
            .ok_or_else(|| JsValue::from_str(&format!("no element matches '{anchor_selector}'")))?;

        let svg = create_svg(&document, "svg")?;
        svg.set_attribute("width", &config.width.to_string())?;
        svg.set_attribute("height", &config.height.to_string())?;
        anchor.append_child(&svg)?;

        let axis = create_svg(&document, "g")?;
        axis.set_attribute("class", "x axis")?;
        axis.set_attribute("transform", &format!("translate(0,{})", config.axis_y()))?;
        svg.append_child(&axis)?;

        let guide = create_svg(&document, "line")?;
        guide.set_attribute("stroke", GUIDE_STROKE)?;
        guide.set_attribute("stroke-dasharray", "1,2")?;
        guide.set_attribute("opacity", "0")?;
        svg.append_child(&guide)?;

        let tooltip: HtmlElement = document.create_element("div")?.dyn_into()?;
        tooltip.set_attribute("class", "tooltip")?;
        let style = tooltip.style();
        style.set_property("opacity", "0")?;
        style.set_property("position", "absolute")?;
        style.set_property("white-space", "pre-line")?;
        anchor.append_child(&tooltip)?;

        Ok(Self { document, axis, guide, tooltip, svg, circles: HashMap::new() })
    }

    pub fn apply_plan(&mut self, plan: &RenderPlan) -> Result<(), JsValue> {
        self.draw_axis(&plan.axis)?;

        for t in &plan.exit {
            if let Some(el) = self.circles.remove(&t.country) {
                move_to(&el, t.to, t.duration_ms)?;
                remove_after(el, t.duration_ms)?;
            }
        }

        for t in &plan.enter {
            // A circle from a superseded exit may still be fading out.
            if let Some(stale) = self.circles.remove(&t.country) {
                stale.remove();
            }
            let el = self.create_circle(t)?;
            move_to(&el, t.to, t.duration_ms)?;
            self.circles.insert(t.country.clone(), el);
        }

        for t in &plan.update {
            match self.circles.get(&t.country) {
                Some(el) => move_to(el, t.to, t.duration_ms)?,
                None => {
                    let el = self.create_circle(t)?;
                    move_to(&el, t.to, t.duration_ms)?;
                    self.circles.insert(t.country.clone(), el);
                }
            }
        }
        Ok(())
    }

    pub fn apply_hover(&self, feedback: &HoverFeedback) -> Result<(), JsValue> {
        let style = self.tooltip.style();
        if let Some(content) = &feedback.tooltip {
            self.tooltip.set_text_content(Some(content.text().as_str()));
            style.set_property("left", &format!("{}px", content.left))?;
            style.set_property("top", &format!("{}px", content.top))?;
        }
        style.set_property("opacity", &feedback.tooltip_opacity.to_string())?;

        if let Some(line) = &feedback.guide {
            self.guide.set_attribute("x1", &line.x1.to_string())?;
            self.guide.set_attribute("y1", &line.y1.to_string())?;
            self.guide.set_attribute("x2", &line.x2.to_string())?;
            self.guide.set_attribute("y2", &line.y2.to_string())?;
        }
        self.guide.set_attribute("opacity", &feedback.guide_opacity.to_string())?;
        Ok(())
    }

    fn create_circle(&self, t: &CircleTransition) -> Result<Element, JsValue> {
        let el = create_svg(&self.document, "circle")?;
        el.set_attribute("class", "events")?;
        el.set_attribute("r", &t.radius.to_string())?;
        el.set_attribute("fill", t.color)?;
        el.set_attribute("data-country", &t.country)?;
        let style = svg_style(&el)?;
        style.set_property("cx", &format!("{}px", t.from.x))?;
        style.set_property("cy", &format!("{}px", t.from.y))?;
        // Below the guide line so the line stays visible on hover.
        let guide: &Node = &self.guide;
        self.svg.insert_before(&el, Some(guide))?;
        // Flush styles so the first move animates from the entry point.
        el.get_bounding_client_rect();
        Ok(el)
    }

    fn draw_axis(&self, axis: &AxisOutput) -> Result<(), JsValue> {
        let g = &self.axis;
        g.set_inner_html("");

        let (r0, r1) = axis.range;
        let domain = create_svg(&self.document, "path")?;
        domain.set_attribute("class", "domain")?;
        domain.set_attribute("stroke", "currentColor")?;
        domain.set_attribute("d", &format!("M{r0},{}H{r1}", axis.tick_size_outer))?;
        g.append_child(&domain)?;

        for tick in &axis.ticks {
            let tg = create_svg(&self.document, "g")?;
            tg.set_attribute("class", "tick")?;
            tg.set_attribute("transform", &format!("translate({},0)", tick.position))?;

            let mark = create_svg(&self.document, "line")?;
            mark.set_attribute("stroke", "currentColor")?;
            mark.set_attribute("y2", &TICK_SIZE.to_string())?;
            tg.append_child(&mark)?;

            let label = create_svg(&self.document, "text")?;
            label.set_attribute("fill", "currentColor")?;
            label.set_attribute("y", "9")?;
            label.set_attribute("dy", "0.71em")?;
            label.set_attribute("text-anchor", "middle")?;
            label.set_text_content(Some(tick.label.as_str()));
            tg.append_child(&label)?;

            g.append_child(&tg)?;
        }

        let style = svg_style(g)?;
        style.set_property("transition", "none")?;
        style.set_property("opacity", "0")?;
        g.get_bounding_client_rect();
        style.set_property("transition", &format!("opacity {}ms", axis.duration_ms))?;
        style.set_property("opacity", "1")?;
        Ok(())
    }
}

fn create_svg(document: &Document, tag: &str) -> Result<Element, JsValue> {
    document.create_element_ns(Some(SVG_NS), tag)
}

fn svg_style(el: &Element) -> Result<CssStyleDeclaration, JsValue> {
    let svg = el
        .dyn_ref::<SvgElement>()
        .ok_or_else(|| JsValue::from_str("not an svg element"))?;
    Ok(svg.style())
}

fn move_to(el: &Element, to: Point, duration_ms: u32) -> Result<(), JsValue> {
    let style = svg_style(el)?;
    style.set_property("transition", &format!("cx {duration_ms}ms, cy {duration_ms}ms"))?;
    style.set_property("cx", &format!("{}px", to.x))?;
    style.set_property("cy", &format!("{}px", to.y))?;
    Ok(())
}

fn remove_after(el: Element, duration_ms: u32) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window available"))?;
    let callback = Closure::once_into_js(move || el.remove());
    window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref::<js_sys::Function>(),
        duration_ms as i32,
    )?;
    Ok(())
}
