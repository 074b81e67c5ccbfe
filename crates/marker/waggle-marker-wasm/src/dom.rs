//! DOM-backed geometry and marker styling.

use web_sys::{HtmlElement, SvgPathElement};

use waggle_marker_core::geometry::{clamp_distance, usable_length};
use waggle_marker_core::{Curve, CurveGeometry, MarkerChange, MarkerPose, Outputs, Vec2};

/// A mounted `<path>` measured by the browser.
///
/// Reports no geometry while the element is detached or not laid out, which
/// is exactly when the driver should stay idle.
#[derive(Clone, Debug)]
pub struct DomPath {
    element: SvgPathElement,
}

impl DomPath {
    pub fn new(element: SvgPathElement) -> Self {
        Self { element }
    }
}

impl CurveGeometry for DomPath {
    fn total_length(&self) -> Option<f32> {
        if !self.element.is_connected() {
            return None;
        }
        usable_length(Some(self.element.get_total_length()))
    }

    fn point_at_length(&self, distance: f32) -> Option<Vec2> {
        let total = self.total_length()?;
        let p = self
            .element
            .get_point_at_length(clamp_distance(distance, total))
            .ok()?;
        Some(Vec2::new(p.x(), p.y()))
    }
}

/// Geometry source for one layout: parsed path data, or the rendered element.
#[derive(Clone, Debug)]
pub enum HostCurve {
    Native(Curve),
    Dom(DomPath),
}

impl CurveGeometry for HostCurve {
    fn total_length(&self) -> Option<f32> {
        match self {
            HostCurve::Native(c) => c.total_length(),
            HostCurve::Dom(p) => p.total_length(),
        }
    }

    fn point_at_length(&self, distance: f32) -> Option<Vec2> {
        match self {
            HostCurve::Native(c) => c.point_at_length(distance),
            HostCurve::Dom(p) => p.point_at_length(distance),
        }
    }
}

pub fn transform_css(pose: &MarkerPose) -> String {
    format!(
        "translate({}px, {}px) rotate({}deg)",
        pose.x, pose.y, pose.angle_deg
    )
}

pub fn transition_css(transition_ms: Option<f64>) -> String {
    match transition_ms {
        Some(ms) => format!("opacity {}s ease", ms / 1000.0),
        None => "none".to_string(),
    }
}

/// Write the changes onto the marker element's inline style, in order.
pub fn apply_to_marker(marker: &HtmlElement, out: &Outputs) {
    let style = marker.style();
    for change in &out.changes {
        let res = match change {
            MarkerChange::Transform(pose) => style.set_property("transform", &transform_css(pose)),
            MarkerChange::Opacity {
                value,
                transition_ms,
            } => style
                .set_property("transition", &transition_css(*transition_ms))
                .and_then(|_| style.set_property("opacity", &value.to_string())),
        };
        if let Err(e) = res {
            log::warn!("marker style update failed: {e:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_strings() {
        let pose = MarkerPose {
            x: 12.5,
            y: -3.0,
            angle_deg: 45.0,
        };
        assert_eq!(transform_css(&pose), "translate(12.5px, -3px) rotate(45deg)");
        assert_eq!(transition_css(Some(300.0)), "opacity 0.3s ease");
        assert_eq!(transition_css(None), "none");
    }
}
