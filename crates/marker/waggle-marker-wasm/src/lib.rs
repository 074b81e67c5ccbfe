//! wasm-bindgen interface for the Waggle marker.
//!
//! `WaggleTimeline` owns a core [`Timeline`], drives it from
//! `requestAnimationFrame`, and writes every emitted change onto the marker
//! element. Each call also returns the `Outputs` as a plain JS object, and an
//! optional listener receives the outputs of frame callbacks.

mod dom;
mod environment;
mod frames;
mod logging;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use js_sys::{Function, JSON};
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, SvgPathElement, Window};

use waggle_marker_core::{
    Config, CurveDef, CurvePair, CurveVariant, EnvironmentSignal, InputMode, Outputs, StopList,
    Timeline,
};

pub use dom::{transform_css, transition_css, DomPath, HostCurve};
pub use logging::init_logging;

use dom::apply_to_marker;
use environment::{read_environment, EnvListeners};
use frames::RafScheduler;

type HostTimeline = Timeline<HostCurve, RafScheduler>;

struct Inner {
    timeline: HostTimeline,
    marker: Option<HtmlElement>,
    listener: Option<Function>,
}

type Shared = Rc<RefCell<Inner>>;

/// Run one timeline call, apply its changes to the marker, then notify the
/// listener once the borrow is released. The listener may call back into
/// the timeline, which is why every export takes `&self`.
fn run<F>(inner: &Shared, f: F) -> Outputs
where
    F: FnOnce(&mut HostTimeline) -> Outputs,
{
    let (out, listener) = {
        let mut guard = inner.borrow_mut();
        let out = f(&mut guard.timeline);
        if let Some(marker) = &guard.marker {
            apply_to_marker(marker, &out);
        }
        (out, guard.listener.clone())
    };
    if let Some(listener) = listener {
        if !out.is_empty() {
            match swb::to_value(&out) {
                Ok(v) => {
                    if let Err(e) = listener.call1(&JsValue::UNDEFINED, &v) {
                        log::warn!("output listener threw: {e:?}");
                    }
                }
                Err(e) => log::warn!("outputs serialize error: {e}"),
            }
        }
    }
    out
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsError> {
    swb::to_value(value).map_err(|e| JsError::new(&format!("serialize error: {e}")))
}

fn parse_stops(stops: &JsValue) -> Result<StopList, JsError> {
    let s = JSON::stringify(stops)
        .map_err(|e| JsError::new(&format!("stops stringify error: {e:?}")))?
        .as_string()
        .ok_or_else(|| JsError::new("stops: stringify produced non-string"))?;
    StopList::from_json_str(&s).map_err(|e| JsError::new(&format!("stops error: {e}")))
}

fn build_curve(variant: CurveVariant, d: String, samples: usize) -> Result<HostCurve, JsError> {
    let def = CurveDef {
        variant,
        view_box: None,
        d,
    };
    def.build(samples)
        .map(HostCurve::Native)
        .map_err(|e| JsError::new(&format!("{variant:?} path error: {e}")))
}

#[wasm_bindgen]
pub struct WaggleTimeline {
    inner: Shared,
    env: RefCell<Option<EnvListeners>>,
}

#[wasm_bindgen]
impl WaggleTimeline {
    /// Create a timeline. `config` may be undefined/null for defaults.
    /// `stops` is an array of `{ id, year, title, subtitle, description }`;
    /// `wide_d` and `tall_d` are the SVG path data for the two layouts and
    /// serve as geometry until `attach` supplies the rendered paths.
    ///
    ///   new WaggleTimeline(undefined, milestones, DESKTOP_PATH, MOBILE_PATH)
    #[wasm_bindgen(constructor)]
    pub fn new(
        config: JsValue,
        stops: JsValue,
        wide_d: String,
        tall_d: String,
    ) -> Result<WaggleTimeline, JsError> {
        console_error_panic_hook::set_once();

        let cfg: Config = if jsvalue_is_undefined_or_null(&config) {
            Config::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };
        let stops = parse_stops(&stops)?;
        let curves = CurvePair::new(
            build_curve(CurveVariant::Wide, wide_d, cfg.curve_table_samples)?,
            build_curve(CurveVariant::Tall, tall_d, cfg.curve_table_samples)?,
        );

        let window: Option<Window> = web_sys::window();
        let ctx = read_environment(window.as_ref(), &cfg);

        let inner: Shared = Rc::new_cyclic(|weak: &Weak<RefCell<Inner>>| {
            let weak = weak.clone();
            let on_frame: Rc<dyn Fn(f64)> = Rc::new(move |ts: f64| {
                if let Some(inner) = weak.upgrade() {
                    run(&inner, |tl| tl.on_frame(ts).clone());
                }
            });
            let scheduler = RafScheduler::new(window.is_some(), on_frame);
            RefCell::new(Inner {
                timeline: Timeline::new(cfg, stops, curves, ctx, scheduler),
                marker: None,
                listener: None,
            })
        });

        log::debug!("waggle timeline created ({ctx:?})");
        Ok(WaggleTimeline {
            inner,
            env: RefCell::new(None),
        })
    }

    /// Bind the marker element and, optionally, the rendered `<path>`
    /// elements. Attached paths replace the parsed geometry for their layout.
    #[wasm_bindgen(js_name = attach)]
    pub fn attach(
        &self,
        marker: HtmlElement,
        wide_path: Option<SvgPathElement>,
        tall_path: Option<SvgPathElement>,
    ) -> Result<JsValue, JsError> {
        self.inner.borrow_mut().marker = Some(marker);
        let mut out = Outputs::default();
        if let Some(p) = wide_path {
            out.extend_from(&run(&self.inner, |tl| {
                tl.set_curve(CurveVariant::Wide, HostCurve::Dom(DomPath::new(p)))
                    .clone()
            }));
        }
        if let Some(p) = tall_path {
            out.extend_from(&run(&self.inner, |tl| {
                tl.set_curve(CurveVariant::Tall, HostCurve::Dom(DomPath::new(p)))
                    .clone()
            }));
        }
        to_js(&out)
    }

    /// Subscribe to window `resize` and reduced-motion `change` events.
    /// No-op outside a browser window.
    #[wasm_bindgen(js_name = watch_environment)]
    pub fn watch_environment(&self) {
        if self.env.borrow().is_some() {
            return;
        }
        let Some(window) = web_sys::window() else {
            log::debug!("no window; environment not observed");
            return;
        };
        let weak = Rc::downgrade(&self.inner);
        let listeners = EnvListeners::install(&window, move |signal: EnvironmentSignal| {
            if let Some(inner) = weak.upgrade() {
                run(&inner, |tl| tl.apply(signal).clone());
            }
        });
        *self.env.borrow_mut() = Some(listeners);
    }

    /// Drop the `resize` and reduced-motion subscriptions.
    #[wasm_bindgen(js_name = unwatch_environment)]
    pub fn unwatch_environment(&self) {
        self.env.borrow_mut().take();
    }

    /// Receive the outputs of every call, including frame callbacks.
    /// Pass undefined/null to remove.
    #[wasm_bindgen(js_name = set_listener)]
    pub fn set_listener(&self, f: JsValue) {
        self.inner.borrow_mut().listener = f.dyn_into::<Function>().ok();
    }

    /// Pointer enter on a milestone card (desktop).
    pub fn enter(&self, index: usize) -> Result<JsValue, JsError> {
        to_js(&run(&self.inner, |tl| tl.enter(index, InputMode::Pointer).clone()))
    }

    /// Pointer leave on a milestone card. Clears the highlight only.
    pub fn leave(&self, index: usize) -> Result<JsValue, JsError> {
        to_js(&run(&self.inner, |tl| tl.leave(index, InputMode::Pointer).clone()))
    }

    /// Touch start on a milestone card (mobile).
    #[wasm_bindgen(js_name = touch_start)]
    pub fn touch_start(&self, index: usize) -> Result<JsValue, JsError> {
        to_js(&run(&self.inner, |tl| tl.enter(index, InputMode::Touch).clone()))
    }

    #[wasm_bindgen(js_name = touch_end)]
    pub fn touch_end(&self, index: usize) -> Result<JsValue, JsError> {
        to_js(&run(&self.inner, |tl| tl.leave(index, InputMode::Touch).clone()))
    }

    /// Enter by stop id, in whichever input mode the layout uses.
    #[wasm_bindgen(js_name = enter_by_id)]
    pub fn enter_by_id(&self, id: String) -> Result<JsValue, JsError> {
        to_js(&run(&self.inner, |tl| {
            let mode = tl.input_mode();
            tl.enter_by_id(&id, mode).clone()
        }))
    }

    #[wasm_bindgen(js_name = container_leave)]
    pub fn container_leave(&self) -> Result<JsValue, JsError> {
        to_js(&run(&self.inner, |tl| tl.container_leave().clone()))
    }

    /// Move to a stop without touching the highlight.
    #[wasm_bindgen(js_name = go_to)]
    pub fn go_to(&self, index: usize) -> Result<JsValue, JsError> {
        to_js(&run(&self.inner, |tl| tl.go_to(index).clone()))
    }

    pub fn hide(&self) -> Result<JsValue, JsError> {
        to_js(&run(&self.inner, |tl| tl.hide().clone()))
    }

    /// The timeline section scrolled into view.
    #[wasm_bindgen(js_name = section_visible)]
    pub fn section_visible(&self) -> Result<JsValue, JsError> {
        to_js(&run(&self.inner, |tl| tl.section_visible().clone()))
    }

    #[wasm_bindgen(js_name = set_viewport_width)]
    pub fn set_viewport_width(&self, width: f32) -> Result<JsValue, JsError> {
        to_js(&run(&self.inner, |tl| {
            tl.apply(EnvironmentSignal::ViewportWidth(width)).clone()
        }))
    }

    #[wasm_bindgen(js_name = set_reduced_motion)]
    pub fn set_reduced_motion(&self, reduced: bool) -> Result<JsValue, JsError> {
        to_js(&run(&self.inner, |tl| {
            tl.apply(EnvironmentSignal::ReducedMotion(reduced)).clone()
        }))
    }

    /// Id of the highlighted stop, if any.
    #[wasm_bindgen(js_name = active_stop)]
    pub fn active_stop(&self) -> Option<String> {
        self.inner
            .borrow()
            .timeline
            .active_stop()
            .map(|s| s.id.clone())
    }

    /// Driver state: `"Hidden"`, `{ Animating: {...} }` or `{ IdleAt: d }`.
    pub fn state(&self) -> Result<JsValue, JsError> {
        to_js(&self.inner.borrow().timeline.driver().state())
    }

    /// Current arc length of the marker.
    pub fn position(&self) -> f32 {
        self.inner.borrow().timeline.driver().position()
    }

    #[wasm_bindgen(js_name = is_mobile_layout)]
    pub fn is_mobile_layout(&self) -> bool {
        self.inner.borrow().timeline.context().is_mobile_layout()
    }

    /// Style descriptor for a milestone card. `tilt_deg` is clamped to ±3.
    #[wasm_bindgen(js_name = card_pose)]
    pub fn card_pose(&self, index: usize, tilt_deg: f32) -> Result<JsValue, JsError> {
        to_js(&self.inner.borrow().timeline.card_pose(index, tilt_deg))
    }

    /// Dash pattern and draw-in timing for the path stroke.
    #[wasm_bindgen(js_name = stroke_reveal)]
    pub fn stroke_reveal(&self) -> Result<JsValue, JsError> {
        to_js(&self.inner.borrow().timeline.stroke_reveal())
    }
}

/// ABI version for JS glue compatibility checks.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
