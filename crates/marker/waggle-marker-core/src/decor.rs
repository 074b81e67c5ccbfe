//! Decoration descriptors the host applies next to the marker: stop card
//! poses and the dashed-path draw-in. Pure values; no animator state.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::motion::MotionContext;

/// Vertical stagger of the desktop cards, by stop index.
pub const STAGGER_OFFSETS_PX: [f32; 4] = [0.0, 120.0, 30.0, 80.0];
/// How far an active card lifts.
pub const LIFT_PX: f32 = 4.0;
/// Active cards tilt by at most this much either way.
pub const MAX_TILT_DEG: f32 = 3.0;
pub const Z_INDEX_ACTIVE: i32 = 10;
pub const Z_INDEX_INACTIVE: i32 = 1;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardPose {
    /// Vertical offset in px (negative is up).
    pub offset_y: f32,
    pub tilt_deg: f32,
    /// Raised shadow.
    pub elevated: bool,
    pub z_index: i32,
}

/// Pose of stop card `index`. `tilt_deg` is the host's random tilt; it is
/// clamped and only used while the card is active.
pub fn card_pose(index: usize, is_active: bool, is_mobile_layout: bool, tilt_deg: f32) -> CardPose {
    let stagger = if is_mobile_layout {
        0.0
    } else {
        STAGGER_OFFSETS_PX.get(index).copied().unwrap_or(0.0)
    };
    if is_active {
        let tilt = if tilt_deg.is_finite() {
            tilt_deg.clamp(-MAX_TILT_DEG, MAX_TILT_DEG)
        } else {
            0.0
        };
        CardPose {
            offset_y: stagger - LIFT_PX,
            tilt_deg: tilt,
            elevated: true,
            z_index: Z_INDEX_ACTIVE,
        }
    } else {
        CardPose {
            offset_y: stagger,
            tilt_deg: 0.0,
            elevated: false,
            z_index: Z_INDEX_INACTIVE,
        }
    }
}

/// Dashed-stroke draw-in for the curve.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrokeReveal {
    pub dash_array: [f32; 2],
    pub initial_dash_offset: f32,
    /// `None` when the stroke is shown fully drawn with no animation.
    pub draw_duration_ms: Option<f64>,
}

pub fn stroke_reveal(ctx: &MotionContext, cfg: &Config) -> StrokeReveal {
    if ctx.prefers_reduced_motion {
        StrokeReveal {
            dash_array: [5.0, 8.0],
            initial_dash_offset: 0.0,
            draw_duration_ms: None,
        }
    } else {
        StrokeReveal {
            dash_array: [5.0, 8.0],
            initial_dash_offset: cfg.stroke_dash_offset,
            draw_duration_ms: Some(cfg.stroke_draw_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_card_lifts_and_tilts() {
        let p = card_pose(1, true, false, 9.0);
        assert_eq!(p.offset_y, 116.0);
        assert_eq!(p.tilt_deg, MAX_TILT_DEG);
        assert!(p.elevated);
        assert_eq!(p.z_index, Z_INDEX_ACTIVE);
    }

    #[test]
    fn inactive_card_rests_on_stagger() {
        let p = card_pose(3, false, false, 2.0);
        assert_eq!(p.offset_y, 80.0);
        assert_eq!(p.tilt_deg, 0.0);
        assert_eq!(p.z_index, Z_INDEX_INACTIVE);
        // Beyond the stagger table, and on mobile, there is no offset.
        assert_eq!(card_pose(7, false, false, 0.0).offset_y, 0.0);
        assert_eq!(card_pose(1, false, true, 0.0).offset_y, 0.0);
    }

    #[test]
    fn stroke_reveal_respects_reduced_motion() {
        let cfg = Config::default();
        let mut ctx = MotionContext::default();
        assert_eq!(stroke_reveal(&ctx, &cfg).draw_duration_ms, Some(2000.0));
        ctx.prefers_reduced_motion = true;
        let r = stroke_reveal(&ctx, &cfg);
        assert_eq!(r.draw_duration_ms, None);
        assert_eq!(r.initial_dash_offset, 0.0);
    }
}
