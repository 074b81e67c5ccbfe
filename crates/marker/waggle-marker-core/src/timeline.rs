//! Timeline: single owner of the curves, stops, motion context, driver and
//! selection surface. Hosts forward interactions, environment signals and
//! frame callbacks here and apply the returned [`Outputs`].

use crate::config::Config;
use crate::decor::{card_pose, stroke_reveal, CardPose, StrokeReveal};
use crate::driver::Driver;
use crate::error::WaggleError;
use crate::geometry::{Curve, CurveDef, CurveGeometry, CurvePair, CurveVariant};
use crate::motion::{EnvironmentSignal, MotionContext};
use crate::outputs::{MarkerEvent, Outputs};
use crate::schedule::FrameScheduler;
use crate::stops::{Stop, StopList};
use crate::surface::{Command, InputMode, Reaction, SelectionSurface};

pub struct Timeline<G: CurveGeometry, S: FrameScheduler> {
    stops: StopList,
    curves: CurvePair<G>,
    ctx: MotionContext,
    driver: Driver<S>,
    surface: SelectionSurface,
    outputs: Outputs,
}

impl<S: FrameScheduler> Timeline<Curve, S> {
    /// Build native curves from their definitions.
    pub fn from_defs(
        cfg: Config,
        stops: StopList,
        wide: &CurveDef,
        tall: &CurveDef,
        ctx: MotionContext,
        scheduler: S,
    ) -> Result<Self, WaggleError> {
        let curves = CurvePair::new(
            wide.build(cfg.curve_table_samples)?,
            tall.build(cfg.curve_table_samples)?,
        );
        Ok(Self::new(cfg, stops, curves, ctx, scheduler))
    }
}

impl<G: CurveGeometry, S: FrameScheduler> Timeline<G, S> {
    pub fn new(
        cfg: Config,
        stops: StopList,
        curves: CurvePair<G>,
        ctx: MotionContext,
        scheduler: S,
    ) -> Self {
        Self {
            stops,
            curves,
            ctx,
            driver: Driver::new(cfg, scheduler),
            surface: SelectionSurface::new(),
            outputs: Outputs::default(),
        }
    }

    pub fn config(&self) -> &Config {
        self.driver.config()
    }

    pub fn context(&self) -> &MotionContext {
        &self.ctx
    }

    pub fn stops(&self) -> &StopList {
        &self.stops
    }

    pub fn curves(&self) -> &CurvePair<G> {
        &self.curves
    }

    pub fn driver(&self) -> &Driver<S> {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut Driver<S> {
        &mut self.driver
    }

    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    pub fn active_variant(&self) -> CurveVariant {
        CurveVariant::for_layout(self.ctx.is_mobile_layout())
    }

    pub fn active_curve(&self) -> &G {
        self.curves.get(self.active_variant())
    }

    pub fn input_mode(&self) -> InputMode {
        InputMode::for_layout(self.ctx.is_mobile_layout())
    }

    pub fn active_stop(&self) -> Option<&Stop> {
        self.surface.active().and_then(|i| self.stops.get(i))
    }

    /// Hover/touch-start on stop `stop`.
    pub fn enter(&mut self, stop: usize, mode: InputMode) -> &Outputs {
        let r = self.surface.enter(stop, self.stops.len(), mode, &self.ctx);
        self.react(r)
    }

    /// Like [`Timeline::enter`], addressing the stop by id. Unknown ids do nothing.
    pub fn enter_by_id(&mut self, id: &str, mode: InputMode) -> &Outputs {
        match self.stops.index_of(id) {
            Some(i) => self.enter(i, mode),
            None => {
                log::debug!("enter_by_id: unknown stop '{id}'");
                self.outputs.clear();
                &self.outputs
            }
        }
    }

    /// Mouse-leave/touch-end on stop `stop`.
    pub fn leave(&mut self, stop: usize, mode: InputMode) -> &Outputs {
        let r = self.surface.leave(stop, mode, &self.ctx);
        self.react(r)
    }

    /// Pointer left the whole timeline.
    pub fn container_leave(&mut self) -> &Outputs {
        let r = self.surface.container_leave(&self.ctx);
        self.react(r)
    }

    /// Programmatic move, bypassing the selection surface.
    pub fn go_to(&mut self, stop: usize) -> &Outputs {
        self.react(Reaction {
            command: Some(Command::GoTo(stop)),
            active_changed: None,
        })
    }

    /// Programmatic hide, bypassing the selection surface.
    pub fn hide(&mut self) -> &Outputs {
        self.react(Reaction {
            command: Some(Command::Hide),
            active_changed: None,
        })
    }

    /// Host frame callback.
    pub fn on_frame(&mut self, timestamp_ms: f64) -> &Outputs {
        self.outputs.clear();
        let curve = self.curves.get(CurveVariant::for_layout(self.ctx.is_mobile_layout()));
        let out = self.driver.on_frame(curve, timestamp_ms);
        self.outputs.extend_from(out);
        &self.outputs
    }

    /// The timeline section scrolled into view: hide the marker at once and
    /// rewind it.
    pub fn section_visible(&mut self) -> &Outputs {
        self.outputs.clear();
        let out = self.driver.reset();
        self.outputs.extend_from(out);
        if let Some(active) = self.surface.clear() {
            self.push_active(active);
        }
        &self.outputs
    }

    /// Fold in an environment change. A switch between the wide and tall
    /// curve resets the marker.
    pub fn apply(&mut self, signal: EnvironmentSignal) -> &Outputs {
        self.outputs.clear();
        let was_mobile = self.ctx.is_mobile_layout();
        if self.ctx.apply(signal, self.driver.config()) && was_mobile != self.ctx.is_mobile_layout() {
            let out = self.driver.invalidate();
            self.outputs.extend_from(out);
        }
        &self.outputs
    }

    /// Replace one curve (for example after the host re-measured it).
    /// Replacing the active curve resets the marker.
    pub fn set_curve(&mut self, variant: CurveVariant, curve: G) -> &Outputs {
        self.outputs.clear();
        *self.curves.get_mut(variant) = curve;
        if variant == self.active_variant() {
            let out = self.driver.invalidate();
            self.outputs.extend_from(out);
        }
        &self.outputs
    }

    /// Pose for stop card `index` given the current highlight.
    pub fn card_pose(&self, index: usize, tilt_deg: f32) -> CardPose {
        card_pose(
            index,
            self.surface.active() == Some(index),
            self.ctx.is_mobile_layout(),
            tilt_deg,
        )
    }

    pub fn stroke_reveal(&self) -> StrokeReveal {
        stroke_reveal(&self.ctx, self.driver.config())
    }

    fn react(&mut self, r: Reaction) -> &Outputs {
        self.outputs.clear();
        if let Some(cmd) = r.command {
            let curve = self.curves.get(CurveVariant::for_layout(self.ctx.is_mobile_layout()));
            let out = match cmd {
                Command::GoTo(stop) => self.driver.go_to(stop, self.stops.len(), &self.ctx, curve),
                Command::Hide => self.driver.hide(&self.ctx),
            };
            self.outputs.extend_from(out);
        }
        if let Some(active) = r.active_changed {
            self.push_active(active);
        }
        &self.outputs
    }

    fn push_active(&mut self, active: Option<usize>) {
        let stop = active.and_then(|i| self.stops.get(i)).map(|s| s.id.clone());
        self.outputs.push_event(MarkerEvent::ActiveStopChanged { stop });
    }
}
