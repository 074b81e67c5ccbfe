//! SVG path data → drawable segments.
//!
//! Supports move/line/horizontal/vertical/cubic/smooth-cubic/quadratic/
//! smooth-quadratic/close commands in absolute and relative form. Elliptical
//! arcs are rejected. Move commands start a new subpath and contribute no
//! length, matching how browsers measure multi-subpath paths.

use svgtypes::PathParser;

use super::Vec2;
use crate::error::PathError;

const LENGTH_EPSILON: f32 = 1e-5;

/// One drawable piece of a path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Segment {
    Line {
        start: Vec2,
        end: Vec2,
    },
    Quadratic {
        start: Vec2,
        ctrl: Vec2,
        end: Vec2,
    },
    Cubic {
        start: Vec2,
        ctrl1: Vec2,
        ctrl2: Vec2,
        end: Vec2,
    },
}

impl Segment {
    /// Evaluate at curve parameter `t` in [0, 1].
    pub fn eval(&self, t: f32) -> Vec2 {
        match *self {
            Segment::Line { start, end } => start + (end - start) * t,
            Segment::Quadratic { start, ctrl, end } => {
                let mt = 1.0 - t;
                start * (mt * mt) + ctrl * (2.0 * mt * t) + end * (t * t)
            }
            Segment::Cubic {
                start,
                ctrl1,
                ctrl2,
                end,
            } => {
                let mt = 1.0 - t;
                start * (mt * mt * mt)
                    + ctrl1 * (3.0 * mt * mt * t)
                    + ctrl2 * (3.0 * mt * t * t)
                    + end * (t * t * t)
            }
        }
    }

    pub fn start(&self) -> Vec2 {
        match *self {
            Segment::Line { start, .. }
            | Segment::Quadratic { start, .. }
            | Segment::Cubic { start, .. } => start,
        }
    }

    pub fn end(&self) -> Vec2 {
        match *self {
            Segment::Line { end, .. }
            | Segment::Quadratic { end, .. }
            | Segment::Cubic { end, .. } => end,
        }
    }
}

/// Tracks pen position and the last control points for smooth commands.
struct Pen {
    current: Vec2,
    subpath_start: Vec2,
    last_cubic_ctrl: Option<Vec2>,
    last_quad_ctrl: Option<Vec2>,
}

impl Pen {
    fn resolve(&self, abs: bool, x: f64, y: f64) -> Vec2 {
        if abs {
            Vec2::new(x as f32, y as f32)
        } else {
            Vec2::new(self.current.x + x as f32, self.current.y + y as f32)
        }
    }

    fn reflect(&self, ctrl: Option<Vec2>) -> Vec2 {
        match ctrl {
            Some(c) => self.current + (self.current - c),
            None => self.current,
        }
    }
}

/// Parse SVG path data into segments.
pub fn parse_segments(d: &str) -> Result<Vec<Segment>, PathError> {
    use svgtypes::PathSegment as S;

    let mut out = Vec::new();
    let mut pen = Pen {
        current: Vec2::default(),
        subpath_start: Vec2::default(),
        last_cubic_ctrl: None,
        last_quad_ctrl: None,
    };

    for seg in PathParser::from(d) {
        let seg = seg.map_err(|e| PathError::Syntax(e.to_string()))?;
        let start = pen.current;
        let mut cubic_ctrl = None;
        let mut quad_ctrl = None;
        match seg {
            S::MoveTo { abs, x, y } => {
                let pos = pen.resolve(abs, x, y);
                pen.current = pos;
                pen.subpath_start = pos;
            }
            S::LineTo { abs, x, y } => {
                let end = pen.resolve(abs, x, y);
                push_line(&mut out, start, end);
                pen.current = end;
            }
            S::HorizontalLineTo { abs, x } => {
                let end = if abs {
                    Vec2::new(x as f32, start.y)
                } else {
                    Vec2::new(start.x + x as f32, start.y)
                };
                push_line(&mut out, start, end);
                pen.current = end;
            }
            S::VerticalLineTo { abs, y } => {
                let end = if abs {
                    Vec2::new(start.x, y as f32)
                } else {
                    Vec2::new(start.x, start.y + y as f32)
                };
                push_line(&mut out, start, end);
                pen.current = end;
            }
            S::CurveTo {
                abs,
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                let ctrl1 = pen.resolve(abs, x1, y1);
                let ctrl2 = pen.resolve(abs, x2, y2);
                let end = pen.resolve(abs, x, y);
                out.push(Segment::Cubic {
                    start,
                    ctrl1,
                    ctrl2,
                    end,
                });
                cubic_ctrl = Some(ctrl2);
                pen.current = end;
            }
            S::SmoothCurveTo { abs, x2, y2, x, y } => {
                let ctrl1 = pen.reflect(pen.last_cubic_ctrl);
                let ctrl2 = pen.resolve(abs, x2, y2);
                let end = pen.resolve(abs, x, y);
                out.push(Segment::Cubic {
                    start,
                    ctrl1,
                    ctrl2,
                    end,
                });
                cubic_ctrl = Some(ctrl2);
                pen.current = end;
            }
            S::Quadratic { abs, x1, y1, x, y } => {
                let ctrl = pen.resolve(abs, x1, y1);
                let end = pen.resolve(abs, x, y);
                out.push(Segment::Quadratic { start, ctrl, end });
                quad_ctrl = Some(ctrl);
                pen.current = end;
            }
            S::SmoothQuadratic { abs, x, y } => {
                let ctrl = pen.reflect(pen.last_quad_ctrl);
                let end = pen.resolve(abs, x, y);
                out.push(Segment::Quadratic { start, ctrl, end });
                quad_ctrl = Some(ctrl);
                pen.current = end;
            }
            S::EllipticalArc { .. } => return Err(PathError::Unsupported("elliptical arc")),
            S::ClosePath { .. } => {
                push_line(&mut out, start, pen.subpath_start);
                pen.current = pen.subpath_start;
            }
        }
        pen.last_cubic_ctrl = cubic_ctrl;
        pen.last_quad_ctrl = quad_ctrl;
    }

    if out.is_empty() {
        return Err(PathError::Empty);
    }
    Ok(out)
}

fn push_line(out: &mut Vec<Segment>, start: Vec2, end: Vec2) {
    if start.distance(end) > LENGTH_EPSILON {
        out.push(Segment::Line { start, end });
    }
}
