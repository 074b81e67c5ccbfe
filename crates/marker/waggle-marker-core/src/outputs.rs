//! Output contracts from the driver.
//!
//! Outputs carry the marker changes produced by one call (a command or a
//! frame) and a separate list of semantic events. Renderers apply the changes
//! in order; the driver never touches a rendering surface itself.

use serde::{Deserialize, Serialize};

use crate::geometry::MarkerPose;

/// One visual change to the marker.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum MarkerChange {
    /// Move and orient the marker.
    Transform(MarkerPose),
    /// Set opacity. `transition_ms: None` applies it immediately; `Some(ms)`
    /// asks the renderer for a declarative fade of that length.
    Opacity {
        value: f32,
        transition_ms: Option<f64>,
    },
}

/// Discrete signals emitted alongside changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum MarkerEvent {
    AnimationStarted {
        stop: usize,
        from: f32,
        to: f32,
        duration_ms: f64,
    },
    /// An in-flight move was dropped at arc length `at`.
    AnimationCancelled {
        at: f32,
    },
    Arrived {
        stop: usize,
        position: f32,
    },
    /// Target was within tolerance; position set without animating.
    Snapped {
        stop: usize,
        position: f32,
    },
    Hidden,
    /// Marker hidden without a fade and position reset (section reveal, layout switch).
    Reset,
    /// The highlighted stop changed (`None` clears it).
    ActiveStopChanged {
        stop: Option<String>,
    },
}

/// Outputs returned by every driver call.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub changes: Vec<MarkerChange>,
    #[serde(default)]
    pub events: Vec<MarkerEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.changes.clear();
        self.events.clear();
    }

    #[inline]
    pub fn push_change(&mut self, change: MarkerChange) {
        self.changes.push(change);
    }

    #[inline]
    pub fn push_event(&mut self, event: MarkerEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.events.is_empty()
    }

    /// Append everything from `other`, preserving order.
    pub fn extend_from(&mut self, other: &Outputs) {
        self.changes.extend_from_slice(&other.changes);
        self.events.extend_from_slice(&other.events);
    }

    /// Last pose written in this batch, if any.
    pub fn last_pose(&self) -> Option<MarkerPose> {
        self.changes.iter().rev().find_map(|c| match c {
            MarkerChange::Transform(p) => Some(*p),
            _ => None,
        })
    }

    /// Last opacity written in this batch, if any.
    pub fn last_opacity(&self) -> Option<(f32, Option<f64>)> {
        self.changes.iter().rev().find_map(|c| match c {
            MarkerChange::Opacity {
                value,
                transition_ms,
            } => Some((*value, *transition_ms)),
            _ => None,
        })
    }
}
