use super::intersect_2d::segments_intersect_no_corners;
use super::{next_index, Point2};

/// Computes the signed area of a polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = next_index(i, n);
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Signed area of the triangle `a, b, c`. Positive when counter-clockwise.
#[must_use]
pub fn triangle_area(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    (b - a).perp(&(c - a)) * 0.5
}

/// Even-odd point-in-polygon test.
#[must_use]
pub fn point_in_polygon(point: &Point2, polygon: &[Point2]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (pi, pj) = (&polygon[i], &polygon[j]);
        if (pi.y > point.y) != (pj.y > point.y) {
            let x_cross = pi.x + (point.y - pi.y) * (pj.x - pi.x) / (pj.y - pi.y);
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Total length of a polyline, including the closing edge when `closed`.
#[must_use]
pub fn polyline_length(points: &[Point2], closed: bool) -> f64 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }
    let seg_count = if closed { n } else { n - 1 };
    (0..seg_count)
        .map(|i| (points[next_index(i, n)] - points[i]).norm())
        .sum()
}

/// Self-intersection classification of a corner sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelfIntersection {
    /// No two non-adjacent edges cross.
    None,
    /// Two edges of the open polyline cross. Edge `i` runs from corner `i` to `i + 1`.
    Intersects { first: usize, second: usize },
    /// Only the closing edge (last corner back to the first) crosses another edge.
    IntersectsWithLoop { edge: usize },
}

impl SelfIntersection {
    /// `true` if the sequence is simple when treated as a closed polygon.
    #[must_use]
    pub fn is_simple_polygon(self) -> bool {
        self == Self::None
    }

    /// `true` if the sequence is simple when treated as an open polyline.
    #[must_use]
    pub fn is_simple_polyline(self) -> bool {
        !matches!(self, Self::Intersects { .. })
    }
}

/// Finds the first pair of crossing edges of a corner sequence.
///
/// Edges sharing a corner position are never reported, so consecutive edges
/// and corners touching at a shared point do not count.
#[must_use]
pub fn find_self_intersection(points: &[Point2]) -> SelfIntersection {
    let n = points.len();
    if n < 3 {
        return SelfIntersection::None;
    }

    // Open part: edges 0..n-1.
    for i in 0..n - 1 {
        for j in (i + 1)..n - 1 {
            if segments_intersect_no_corners(&points[i], &points[i + 1], &points[j], &points[j + 1]) {
                return SelfIntersection::Intersects { first: i, second: j };
            }
        }
    }

    // Closing edge.
    let (last, first) = (&points[n - 1], &points[0]);
    for j in 0..n - 1 {
        if segments_intersect_no_corners(last, first, &points[j], &points[j + 1]) {
            return SelfIntersection::IntersectsWithLoop { edge: j };
        }
    }

    SelfIntersection::None
}
