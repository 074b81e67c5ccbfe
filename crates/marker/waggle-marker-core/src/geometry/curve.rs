//! Native curve with a lazily built arc-length table.

use std::cmp::Ordering;

use once_cell::unsync::OnceCell;
use serde::{Deserialize, Serialize};

use super::path::{parse_segments, Segment};
use super::{clamp_distance, CurveGeometry, CurveVariant, Vec2};
use crate::error::PathError;

/// Serializable curve description (the shape of the curve fixtures).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurveDef {
    pub variant: CurveVariant,
    /// `[min_x, min_y, width, height]` of the coordinate space the path is drawn in.
    #[serde(default)]
    pub view_box: Option<[f32; 4]>,
    /// SVG path data.
    pub d: String,
}

impl CurveDef {
    pub fn build(&self, samples: usize) -> Result<Curve, PathError> {
        let mut curve = Curve::with_samples(&self.d, samples)?;
        curve.view_box = self.view_box;
        Ok(curve)
    }
}

/// Cumulative length samples for one segment, indexed by uniform parameter steps.
#[derive(Clone, Debug)]
struct SegmentTable {
    cumulative: Vec<f32>,
    total: f32,
}

impl SegmentTable {
    fn build(segment: &Segment, samples: usize) -> Self {
        if let Segment::Line { start, end } = segment {
            let total = start.distance(*end);
            return Self {
                cumulative: vec![0.0, total],
                total,
            };
        }
        let samples = samples.max(1);
        let mut cumulative = Vec::with_capacity(samples + 1);
        let mut total = 0.0;
        let mut prev = segment.eval(0.0);
        cumulative.push(0.0);
        for i in 1..=samples {
            let point = segment.eval(i as f32 / samples as f32);
            total += prev.distance(point);
            cumulative.push(total);
            prev = point;
        }
        Self { cumulative, total }
    }

    /// Curve parameter at `length` into this segment.
    fn param_for_length(&self, length: f32) -> f32 {
        if self.total <= 0.0 {
            return 0.0;
        }
        let target = length.clamp(0.0, self.total);
        let idx = match self
            .cumulative
            .binary_search_by(|v| v.partial_cmp(&target).unwrap_or(Ordering::Less))
        {
            Ok(ix) | Err(ix) => ix,
        };
        if idx == 0 {
            return 0.0;
        }
        if idx >= self.cumulative.len() {
            return 1.0;
        }
        let prev = self.cumulative[idx - 1];
        let next = self.cumulative[idx];
        let span = next - prev;
        let alpha = if span <= 0.0 {
            0.0
        } else {
            (target - prev) / span
        };
        let steps = (self.cumulative.len() - 1) as f32;
        ((idx - 1) as f32 + alpha) / steps
    }
}

#[derive(Clone, Debug)]
struct ArcTable {
    segments: Vec<SegmentTable>,
    /// Running length at the end of each segment.
    ends: Vec<f32>,
    total: f32,
}

/// A parsed path with arc-length lookup.
///
/// The arc-length table is built on first use, then reused; a curve is
/// read-only after construction.
#[derive(Clone, Debug)]
pub struct Curve {
    definition: String,
    segments: Vec<Segment>,
    samples: usize,
    pub view_box: Option<[f32; 4]>,
    table: OnceCell<ArcTable>,
}

impl Curve {
    pub const DEFAULT_SAMPLES: usize = 32;

    /// Parse SVG path data with the default table resolution.
    pub fn parse(d: &str) -> Result<Self, PathError> {
        Self::with_samples(d, Self::DEFAULT_SAMPLES)
    }

    pub fn with_samples(d: &str, samples: usize) -> Result<Self, PathError> {
        let segments = parse_segments(d)?;
        Ok(Self {
            definition: d.to_string(),
            segments,
            samples: samples.max(1),
            view_box: None,
            table: OnceCell::new(),
        })
    }

    /// The SVG path data this curve was built from.
    pub fn definition(&self) -> &str {
        &self.definition
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    fn table(&self) -> &ArcTable {
        self.table.get_or_init(|| {
            let mut segments = Vec::with_capacity(self.segments.len());
            let mut ends = Vec::with_capacity(self.segments.len());
            let mut total = 0.0;
            for seg in &self.segments {
                let t = SegmentTable::build(seg, self.samples);
                total += t.total;
                ends.push(total);
                segments.push(t);
            }
            log::trace!(
                "built arc table: {} segments, length {total:.2}",
                segments.len()
            );
            ArcTable {
                segments,
                ends,
                total,
            }
        })
    }
}

impl CurveGeometry for Curve {
    fn total_length(&self) -> Option<f32> {
        Some(self.table().total)
    }

    fn point_at_length(&self, distance: f32) -> Option<Vec2> {
        let table = self.table();
        if table.total <= 0.0 {
            return None;
        }
        let d = clamp_distance(distance, table.total);
        let idx = match table
            .ends
            .binary_search_by(|v| v.partial_cmp(&d).unwrap_or(Ordering::Less))
        {
            Ok(ix) | Err(ix) => ix.min(self.segments.len() - 1),
        };
        let seg_start = if idx == 0 { 0.0 } else { table.ends[idx - 1] };
        let t = table.segments[idx].param_for_length(d - seg_start);
        Some(self.segments[idx].eval(t))
    }
}
