//! Stop index → fraction of curve length.

use crate::config::ProgressAdjustments;

/// Uniform spacing: `index / (count - 1)`, with a single stop mapped to 0.
///
/// Returns `None` when `index` does not address a stop.
#[inline]
pub fn base_progress(index: usize, count: usize) -> Option<f32> {
    if index >= count {
        return None;
    }
    if count == 1 {
        return Some(0.0);
    }
    Some(index as f32 / (count - 1) as f32)
}

/// Progress in [0, 1] at which the marker rests for stop `index`.
///
/// Desktop nudges the first stop forward and the third stop backward; mobile
/// pins the first and last stops to fixed fractions. Interior stops use the
/// uniform spacing. A lone stop sits at 0 in either layout. Pure and
/// deterministic.
pub fn progress_for(
    index: usize,
    count: usize,
    is_mobile_layout: bool,
    adj: &ProgressAdjustments,
) -> Option<f32> {
    let base = base_progress(index, count)?;
    if count == 1 {
        return Some(0.0);
    }
    let p = if is_mobile_layout {
        if index == 0 {
            adj.start_offset
        } else if index == count - 1 {
            adj.end_offset
        } else {
            base
        }
    } else if index == 0 {
        base + adj.start_offset
    } else if index == 2 {
        base + adj.desktop_third_stop_offset
    } else {
        base
    };
    Some(if p.is_finite() { p.clamp(0.0, 1.0) } else { 0.0 })
}
