//! Core configuration for waggle-marker-core.

use serde::{Deserialize, Serialize};

/// Tunables for the marker animator.
///
/// Defaults reproduce the reference timeline. Every field is optional when
/// deserializing, so hosts only pass the values they want to override.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Lower bound for a move, in milliseconds.
    pub min_duration_ms: f64,
    /// Milliseconds of travel per unit of arc length.
    pub ms_per_unit: f64,
    /// Moves shorter than this (arc length units) snap instead of animating.
    pub position_tolerance: f32,
    /// Duration of the declarative fade applied by `hide()`.
    pub fade_ms: f64,
    /// Half-width of the arc-length window used to estimate the tangent.
    pub tangent_epsilon: f32,

    /// Per-layout stop corrections.
    pub adjustments: ProgressAdjustments,

    /// Viewports narrower than this use the tall curve.
    pub mobile_breakpoint_px: f32,
    /// Viewports at least this wide are classified as desktop.
    pub tablet_breakpoint_px: f32,

    /// Samples per curved segment when building arc-length tables.
    pub curve_table_samples: usize,

    /// Initial dash offset for the path draw-in effect.
    pub stroke_dash_offset: f32,
    /// Duration of the path draw-in effect.
    pub stroke_draw_ms: f64,
}

/// Fixed per-stop calibration offsets.
///
/// These keep the marker clear of the stop cards in the reference layouts;
/// they are content-specific, not a general algorithm.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressAdjustments {
    /// Desktop: added to the first stop. Mobile: absolute progress of the first stop.
    pub start_offset: f32,
    /// Mobile: absolute progress of the last stop.
    pub end_offset: f32,
    /// Desktop: added to the third stop (index 2).
    pub desktop_third_stop_offset: f32,
}

impl Default for ProgressAdjustments {
    fn default() -> Self {
        Self {
            start_offset: 0.05,
            end_offset: 0.95,
            desktop_third_stop_offset: -0.08,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_duration_ms: 600.0,
            ms_per_unit: 3.0,
            position_tolerance: 5.0,
            fade_ms: 300.0,
            tangent_epsilon: 1.0,
            adjustments: ProgressAdjustments::default(),
            mobile_breakpoint_px: 768.0,
            tablet_breakpoint_px: 1024.0,
            curve_table_samples: 32,
            stroke_dash_offset: 2000.0,
            stroke_draw_ms: 2000.0,
        }
    }
}

impl Config {
    /// Parse a (possibly partial) JSON config.
    pub fn from_json_str(s: &str) -> Result<Self, crate::WaggleError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Travel time for a move of `distance` arc-length units.
    pub fn duration_for(&self, distance: f32) -> f64 {
        (f64::from(distance.abs()) * self.ms_per_unit).max(self.min_duration_ms)
    }
}
