//! Fixed-size layout
//!
//! Strokes of length 4 at hand-placed offsets inside an 8x9 box. Wall size
//! only affects the background fill.
//!
//! ```text
//!   ..xaax..
//!   ..f..b..
//!   ..f..b..
//!   ..xggx..
//!   ..e..c..
//!   ..e..c..
//!   ..xddx..
//!   .......*
//! ```
//!
//! `*` is the wall origin; positive x runs to the left, positive y up.

use super::{SegmentSet, SegmentSpec, WallGeometry};
use crate::digit::Segment;

/// Length of every stroke
pub const STROKE_LENGTH: i32 = 4;

/// Width of the box the strokes were placed in
pub const BOX_WIDTH: u16 = 8;

/// Height of the box the strokes were placed in
pub const BOX_HEIGHT: u16 = 9;

/// Wall-local (x, y) of each stroke's first cell, a..g
const OFFSETS: [(i32, i32); 7] = [(2, 7), (2, 4), (2, 1), (2, 1), (5, 1), (5, 4), (2, 4)];

/// Compute the fixed-layout strokes for `geometry`
pub fn segments(geometry: &WallGeometry) -> SegmentSet {
    core::array::from_fn(|i| {
        let segment = Segment::ALL[i];
        let (x, y) = OFFSETS[i];
        let (x1, y1) = if segment.is_horizontal() {
            (x + STROKE_LENGTH - 1, y)
        } else {
            (x, y + STROKE_LENGTH - 1)
        };
        SegmentSpec::from_box(segment, geometry.stroke_box(x, y, x1, y1))
    })
}
