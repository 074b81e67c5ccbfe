//! Driver: moves the marker along the active curve to a selected stop.
//!
//! States:
//! - `Hidden`: invisible, resting at arc length 0.
//! - `Animating`: linear interpolation of arc length, one frame at a time.
//! - `IdleAt`: visible and still.
//!
//! Every public call clears and returns the driver's [`Outputs`]. At most one
//! frame callback is registered with the host at any time; only `schedule`
//! and `cancel` touch the handle.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::geometry::{clamp_distance, usable_length, CurveGeometry};
use crate::motion::MotionContext;
use crate::outputs::{MarkerChange, MarkerEvent, Outputs};
use crate::progress::progress_for;
use crate::schedule::{FrameHandle, FrameScheduler};

/// A move in progress.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Interpolation {
    pub stop: usize,
    pub from: f32,
    pub to: f32,
    /// Timestamp of the first frame; latched when that frame runs.
    pub start_ms: Option<f64>,
    pub duration_ms: f64,
    /// Curve length captured when the move was issued.
    pub length: f32,
}

impl Interpolation {
    /// Arc length at `timestamp_ms` and whether the move is complete.
    /// Latches the start time on first use.
    pub fn advance(&mut self, timestamp_ms: f64) -> (f32, bool) {
        let start = *self.start_ms.get_or_insert(timestamp_ms);
        let elapsed = (timestamp_ms - start).max(0.0);
        let t = if self.duration_ms > 0.0 {
            (elapsed / self.duration_ms).min(1.0)
        } else {
            1.0
        };
        let d = self.from + (self.to - self.from) * t as f32;
        (clamp_distance(d, self.length), t >= 1.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DriverState {
    Hidden,
    Animating(Interpolation),
    IdleAt(f32),
}

/// Path-anchored marker driver.
#[derive(Debug)]
pub struct Driver<S: FrameScheduler> {
    cfg: Config,
    scheduler: S,
    frame: Option<FrameHandle>,
    state: DriverState,
    current: f32,
    /// Stop the marker is heading to or resting at.
    target_stop: Option<usize>,
    outputs: Outputs,
}

impl<S: FrameScheduler> Driver<S> {
    pub fn new(cfg: Config, scheduler: S) -> Self {
        Self {
            cfg,
            scheduler,
            frame: None,
            state: DriverState::Hidden,
            current: 0.0,
            target_stop: None,
            outputs: Outputs::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Current arc length of the marker.
    pub fn position(&self) -> f32 {
        self.current
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self.state, DriverState::Hidden)
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.state, DriverState::Animating(_))
    }

    pub fn target_stop(&self) -> Option<usize> {
        self.target_stop
    }

    /// Whether a frame callback is registered with the host.
    pub fn has_pending_frame(&self) -> bool {
        self.frame.is_some()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Outputs of the most recent call.
    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    /// Move toward stop `stop` of `stop_count` on `curve`.
    ///
    /// No-op under reduced motion, when the curve is not measurable yet, or
    /// when `stop` is out of range.
    pub fn go_to<G: CurveGeometry + ?Sized>(
        &mut self,
        stop: usize,
        stop_count: usize,
        ctx: &MotionContext,
        curve: &G,
    ) -> &Outputs {
        self.outputs.clear();
        if ctx.prefers_reduced_motion {
            return &self.outputs;
        }
        let Some(length) = usable_length(curve.total_length()) else {
            log::debug!("go_to({stop}): curve not available");
            return &self.outputs;
        };
        let Some(progress) =
            progress_for(stop, stop_count, ctx.is_mobile_layout(), &self.cfg.adjustments)
        else {
            log::debug!("go_to({stop}): no such stop (count {stop_count})");
            return &self.outputs;
        };

        let target = progress * length;
        let from = clamp_distance(self.current, length);
        let was_visible = self.is_visible();
        self.cancel();
        self.target_stop = Some(stop);

        if (target - from).abs() < self.cfg.position_tolerance {
            self.current = target;
            self.state = DriverState::IdleAt(target);
            if !was_visible {
                self.show();
            }
            if let Some(pose) = curve.point_and_tangent(target, self.cfg.tangent_epsilon) {
                self.outputs.push_change(MarkerChange::Transform(pose));
            }
            self.outputs.push_event(MarkerEvent::Snapped {
                stop,
                position: target,
            });
            return &self.outputs;
        }

        let duration_ms = self.cfg.duration_for(target - from);
        log::debug!("go_to({stop}): {from:.1} -> {target:.1} over {duration_ms:.0}ms");
        self.show();
        self.current = from;
        self.state = DriverState::Animating(Interpolation {
            stop,
            from,
            to: target,
            start_ms: None,
            duration_ms,
            length,
        });
        self.outputs.push_event(MarkerEvent::AnimationStarted {
            stop,
            from,
            to: target,
            duration_ms,
        });
        if !self.schedule() {
            self.finish(curve);
        }
        &self.outputs
    }

    /// Fade the marker out and rewind it to the curve start.
    ///
    /// No-op under reduced motion. The next `go_to` animates from arc length 0.
    pub fn hide(&mut self, ctx: &MotionContext) -> &Outputs {
        self.outputs.clear();
        if ctx.prefers_reduced_motion {
            return &self.outputs;
        }
        self.cancel();
        self.outputs.push_change(MarkerChange::Opacity {
            value: 0.0,
            transition_ms: Some(self.cfg.fade_ms),
        });
        self.rewind();
        self.outputs.push_event(MarkerEvent::Hidden);
        log::debug!("hide");
        &self.outputs
    }

    /// Hide immediately (no fade) and rewind, regardless of motion preference.
    pub fn reset(&mut self) -> &Outputs {
        self.outputs.clear();
        self.cancel();
        self.outputs.push_change(MarkerChange::Opacity {
            value: 0.0,
            transition_ms: None,
        });
        self.rewind();
        self.outputs.push_event(MarkerEvent::Reset);
        &self.outputs
    }

    /// The active curve changed; an arc length on the old curve means nothing
    /// on the new one, so the marker is reset.
    pub fn invalidate(&mut self) -> &Outputs {
        log::debug!("curve changed; resetting marker");
        self.reset()
    }

    /// Host callback for the frame this driver requested.
    ///
    /// Calls without a registered frame are ignored.
    pub fn on_frame<G: CurveGeometry + ?Sized>(&mut self, curve: &G, timestamp_ms: f64) -> &Outputs {
        self.outputs.clear();
        if self.frame.take().is_none() {
            return &self.outputs;
        }
        let DriverState::Animating(mut interp) = self.state else {
            return &self.outputs;
        };

        let (distance, done) = interp.advance(timestamp_ms);
        let Some(pose) = curve.point_and_tangent(distance, self.cfg.tangent_epsilon) else {
            log::warn!("curve unavailable mid-flight; stopping at {:.1}", self.current);
            self.state = DriverState::IdleAt(self.current);
            self.outputs.push_event(MarkerEvent::AnimationCancelled { at: self.current });
            return &self.outputs;
        };
        self.outputs.push_change(MarkerChange::Transform(pose));
        self.current = distance;

        if done {
            self.arrive(interp.stop, interp.to);
        } else {
            self.state = DriverState::Animating(interp);
            if !self.schedule() {
                self.finish(curve);
            }
        }
        &self.outputs
    }

    fn show(&mut self) {
        self.outputs.push_change(MarkerChange::Opacity {
            value: 1.0,
            transition_ms: None,
        });
    }

    fn rewind(&mut self) {
        self.current = 0.0;
        self.state = DriverState::Hidden;
        self.target_stop = None;
    }

    fn arrive(&mut self, stop: usize, position: f32) {
        self.current = position;
        self.state = DriverState::IdleAt(position);
        self.outputs.push_event(MarkerEvent::Arrived { stop, position });
        log::trace!("arrived at stop {stop} ({position:.1})");
    }

    /// Jump to the end of the current move (host gave us no frame).
    fn finish<G: CurveGeometry + ?Sized>(&mut self, curve: &G) {
        if let DriverState::Animating(interp) = self.state {
            log::warn!("no animation frame available; jumping to stop {}", interp.stop);
            if let Some(pose) = curve.point_and_tangent(interp.to, self.cfg.tangent_epsilon) {
                self.outputs.push_change(MarkerChange::Transform(pose));
            }
            self.arrive(interp.stop, interp.to);
        }
    }

    /// Register the next frame. False if the host could not.
    fn schedule(&mut self) -> bool {
        debug_assert!(self.frame.is_none());
        self.frame = self.scheduler.request_frame();
        self.frame.is_some()
    }

    /// Drop the pending frame, if any, and freeze an in-flight move where it is.
    fn cancel(&mut self) {
        if let Some(h) = self.frame.take() {
            self.scheduler.cancel_frame(h);
        }
        if let DriverState::Animating(_) = self.state {
            self.state = DriverState::IdleAt(self.current);
            self.outputs.push_event(MarkerEvent::AnimationCancelled { at: self.current });
        }
    }
}
