use crate::math::polygon_2d::polyline_length;
use crate::math::{next_index, Point2};

use super::Crossing;

/// Which part of the boundary between two crossings gets replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arc {
    /// Corners `low.polygon_edge + 1 ..= high.polygon_edge`.
    Between,
    /// Corners after `high.polygon_edge`, around the seam, up to `low.polygon_edge`.
    Wrapped,
}

/// Boundary path lengths on either side of a crossing pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcLengths {
    /// Length from `low` forward to `high`.
    pub between: f64,
    /// Length from `high` forward, across the seam, to `low`.
    pub wrapped: f64,
}

impl ArcLengths {
    /// Measures both arcs. Requires `low.polygon_edge <= high.polygon_edge`.
    ///
    /// For a same-edge pair `between` is the straight distance between the
    /// crossings and `wrapped` the rest of the perimeter.
    #[must_use]
    pub fn measure(corners: &[Point2], low: &Crossing, high: &Crossing) -> Self {
        let n = corners.len();
        let dist = |a: &Point2, b: &Point2| (b - a).norm();
        let edge_len = |i: usize| dist(&corners[i], &corners[next_index(i, n)]);

        if low.polygon_edge == high.polygon_edge {
            let between = dist(&low.point, &high.point);
            let perimeter = polyline_length(corners, true);
            return Self {
                between,
                wrapped: perimeter - between,
            };
        }

        let between = dist(&low.point, &corners[low.polygon_edge + 1])
            + (low.polygon_edge + 1..high.polygon_edge).map(edge_len).sum::<f64>()
            + dist(&corners[high.polygon_edge], &high.point);

        let mut wrapped = dist(&high.point, &corners[next_index(high.polygon_edge, n)]);
        let mut i = next_index(high.polygon_edge, n);
        while i != low.polygon_edge {
            wrapped += edge_len(i);
            i = next_index(i, n);
        }
        wrapped += dist(&corners[low.polygon_edge], &low.point);

        Self { between, wrapped }
    }

    /// The arc to discard: the shorter one, `Between` on a tie.
    #[must_use]
    pub fn shorter(&self) -> Arc {
        if self.between <= self.wrapped {
            Arc::Between
        } else {
            Arc::Wrapped
        }
    }
}

/// Picks the arc to discard for an ordered crossing pair.
///
/// A same-edge pair always discards the (empty) `Between` arc.
#[must_use]
pub fn select_arc(corners: &[Point2], low: &Crossing, high: &Crossing) -> Arc {
    if low.polygon_edge == high.polygon_edge {
        Arc::Between
    } else {
        ArcLengths::measure(corners, low, high).shorter()
    }
}
