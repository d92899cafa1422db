//! Proportional layout
//!
//! Stroke length and width scale with the wall; the digit box is centred in
//! the wall and mirrored about its far x edge so the glyph shares the fixed
//! layout's handedness (positive x is the viewer's left).

use super::{SegmentSet, SegmentSpec, WallGeometry};
use crate::coord::Cuboid;
use crate::digit::Segment;

/// Stroke dimensions derived from the wall size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StrokeMetrics {
    /// Cells along the stroke
    pub length: i32,
    /// Cells across the stroke
    pub width: i32,
}

impl StrokeMetrics {
    /// Metrics for a `width` x `height` wall
    ///
    /// `length = max(1, min(width / 2, height / 4))`,
    /// `width = max(1, length / 4)`.
    pub fn for_wall(width: u16, height: u16) -> Self {
        let length = (width / 2).min(height / 4).max(1) as i32;
        Self {
            length,
            width: (length / 4).max(1),
        }
    }

    /// Size (width, height) of the digit box
    pub fn digit_size(&self) -> (i32, i32) {
        (
            2 * self.width + self.length,
            3 * self.width + 2 * self.length,
        )
    }

    /// Digit-local cell range `[x0, x1) x [y0, y1)` of a stroke
    ///
    /// Local space has x to the viewer's right and y up, origin at the
    /// bottom-left of the digit box.
    fn local_rect(&self, segment: Segment) -> (i32, i32, i32, i32) {
        let (l, t) = (self.length, self.width);
        match segment {
            Segment::A => (t, 2 * t + 2 * l, t + l, 3 * t + 2 * l),
            Segment::B => (t + l, 2 * t + l, 2 * t + l, 2 * t + 2 * l),
            Segment::C => (t + l, t, 2 * t + l, t + l),
            Segment::D => (t, 0, t + l, t),
            Segment::E => (0, t, t, t + l),
            Segment::F => (0, 2 * t + l, t, 2 * t + 2 * l),
            Segment::G => (t, t + l, t + l, 2 * t + l),
        }
    }
}

/// Compute the proportional-layout strokes for `geometry`
///
/// Strokes that do not fit a tiny wall are clamped into it, collapsing to a
/// single cell at worst.
pub fn segments(geometry: &WallGeometry) -> SegmentSet {
    let metrics = StrokeMetrics::for_wall(geometry.width(), geometry.height());
    let (digit_w, digit_h) = metrics.digit_size();
    let box_x = ((geometry.width() as i32 - digit_w) / 2).max(0);
    let box_y = ((geometry.height() as i32 - digit_h) / 2).max(0);
    let far_x = geometry.width() as i32 - 1;
    let bounds = geometry.bounds();

    core::array::from_fn(|i| {
        let segment = Segment::ALL[i];
        let (x0, y0, x1, y1) = metrics.local_rect(segment);

        // Wall-local inclusive cells, then mirrored on x
        let (lx0, lx1) = (box_x + x0, box_x + x1 - 1);
        let (ly0, ly1) = (box_y + y0, box_y + y1 - 1);
        let stroke = geometry.stroke_box(far_x - lx1, ly0, far_x - lx0, ly1);

        let clamped = Cuboid::new(bounds.clamp(stroke.start()), bounds.clamp(stroke.end()));
        SegmentSpec::from_box(segment, clamped)
    })
}
