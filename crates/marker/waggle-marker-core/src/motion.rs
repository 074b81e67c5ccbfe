//! Layout and motion-preference flags read by every command.
//!
//! Hosts seed a [`MotionContext`] synchronously before the first render and
//! feed later environment changes through [`MotionContext::apply`].

use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Responsive class of the viewport. Only `Mobile` changes animator behavior.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutClass {
    Mobile,
    Tablet,
    Desktop,
}

impl LayoutClass {
    pub fn from_width(width_px: f32, cfg: &Config) -> Self {
        if width_px < cfg.mobile_breakpoint_px {
            LayoutClass::Mobile
        } else if width_px < cfg.tablet_breakpoint_px {
            LayoutClass::Tablet
        } else {
            LayoutClass::Desktop
        }
    }
}

/// One environment change reported by the host.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EnvironmentSignal {
    ViewportWidth(f32),
    ReducedMotion(bool),
}

/// Session-wide flags. Written by the host, read by the animator.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotionContext {
    pub layout: LayoutClass,
    pub prefers_reduced_motion: bool,
}

impl Default for MotionContext {
    /// Desktop, motion allowed (what a host assumes before measuring).
    fn default() -> Self {
        Self {
            layout: LayoutClass::Desktop,
            prefers_reduced_motion: false,
        }
    }
}

impl MotionContext {
    pub fn from_environment(viewport_width_px: f32, prefers_reduced_motion: bool, cfg: &Config) -> Self {
        Self {
            layout: LayoutClass::from_width(viewport_width_px, cfg),
            prefers_reduced_motion,
        }
    }

    #[inline]
    pub fn is_mobile_layout(&self) -> bool {
        self.layout == LayoutClass::Mobile
    }

    /// Fold in one signal. Returns true if any flag changed.
    pub fn apply(&mut self, signal: EnvironmentSignal, cfg: &Config) -> bool {
        let before = *self;
        match signal {
            EnvironmentSignal::ViewportWidth(w) => {
                // Non-finite widths come from detached windows; keep the last good value.
                if w.is_finite() {
                    self.layout = LayoutClass::from_width(w, cfg);
                }
            }
            EnvironmentSignal::ReducedMotion(r) => self.prefers_reduced_motion = r,
        }
        *self != before
    }
}
