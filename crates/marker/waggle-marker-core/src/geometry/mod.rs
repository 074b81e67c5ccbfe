//! Curve geometry: the planar paths a marker travels along.
//!
//! - [`CurveGeometry`]: arc-length queries, implemented natively by [`Curve`]
//!   and by host adapters that measure a rendered path.
//! - [`CurveVariant`] / [`CurvePair`]: the wide (desktop) and tall (mobile) curves.

pub mod curve;
pub mod path;

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

pub use curve::{Curve, CurveDef};

/// 2D point in curve (view box) coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    #[inline]
    pub fn distance(self, other: Vec2) -> f32 {
        (other - self).length()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Position and heading of the marker at some arc length.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerPose {
    pub x: f32,
    pub y: f32,
    /// Tangent direction in degrees, in (-180, 180].
    pub angle_deg: f32,
}

/// Direction from `a` to `b` in degrees, normalized to (-180, 180].
pub fn heading_deg(a: Vec2, b: Vec2) -> f32 {
    let angle = (b.y - a.y).atan2(b.x - a.x).to_degrees();
    if angle <= -180.0 {
        angle + 360.0
    } else {
        angle
    }
}

/// Arc-length access to a curve.
///
/// `None` means the geometry is not available yet (for example a path that is
/// not mounted or not measured). Callers treat that as "do nothing".
pub trait CurveGeometry {
    /// Total arc length of the rendered curve.
    fn total_length(&self) -> Option<f32>;

    /// Point at `distance` along the curve. Implementations clamp `distance`
    /// into `[0, total_length]`.
    fn point_at_length(&self, distance: f32) -> Option<Vec2>;

    /// Point at `distance` plus the tangent heading, estimated from two samples
    /// `epsilon` before and after it (clamped to the curve's own bounds).
    fn point_and_tangent(&self, distance: f32, epsilon: f32) -> Option<MarkerPose> {
        let total = usable_length(self.total_length())?;
        let d = clamp_distance(distance, total);
        let p = self.point_at_length(d)?;
        let before = self.point_at_length((d - epsilon).max(0.0))?;
        let after = self.point_at_length((d + epsilon).min(total))?;
        Some(MarkerPose {
            x: p.x,
            y: p.y,
            angle_deg: heading_deg(before, after),
        })
    }
}

impl<T: CurveGeometry + ?Sized> CurveGeometry for &T {
    fn total_length(&self) -> Option<f32> {
        (**self).total_length()
    }

    fn point_at_length(&self, distance: f32) -> Option<Vec2> {
        (**self).point_at_length(distance)
    }
}

/// Filters out lengths that cannot drive an animation (missing, zero, NaN).
#[inline]
pub fn usable_length(total: Option<f32>) -> Option<f32> {
    total.filter(|t| t.is_finite() && *t > 0.0)
}

/// Clamp into `[0, total]`, mapping NaN to the curve start.
#[inline]
pub fn clamp_distance(distance: f32, total: f32) -> f32 {
    if distance.is_nan() {
        0.0
    } else {
        distance.clamp(0.0, total)
    }
}

/// Which of the two layout curves is active.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveVariant {
    /// Horizontal desktop curve.
    Wide,
    /// Vertical mobile curve.
    Tall,
}

impl CurveVariant {
    #[inline]
    pub fn for_layout(is_mobile_layout: bool) -> Self {
        if is_mobile_layout {
            CurveVariant::Tall
        } else {
            CurveVariant::Wide
        }
    }
}

/// The wide and tall curves of one timeline.
#[derive(Clone, Debug)]
pub struct CurvePair<G> {
    pub wide: G,
    pub tall: G,
}

impl<G> CurvePair<G> {
    pub fn new(wide: G, tall: G) -> Self {
        Self { wide, tall }
    }

    pub fn get(&self, variant: CurveVariant) -> &G {
        match variant {
            CurveVariant::Wide => &self.wide,
            CurveVariant::Tall => &self.tall,
        }
    }

    pub fn get_mut(&mut self, variant: CurveVariant) -> &mut G {
        match variant {
            CurveVariant::Wide => &mut self.wide,
            CurveVariant::Tall => &mut self.tall,
        }
    }

    /// Curve for the given layout flag.
    pub fn for_layout(&self, is_mobile_layout: bool) -> &G {
        self.get(CurveVariant::for_layout(is_mobile_layout))
    }
}
