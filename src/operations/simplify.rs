use tracing::trace;

use crate::error::Result;
use crate::geometry::CornerHolder;
use crate::math::{next_index, prev_index, Point2, Vector2, TOLERANCE};

/// Simplifier thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimplifyParams {
    /// Squared length below which an edge is collapsed.
    pub dist_min_sq: f64,
    /// Direction change (radians) below which a corner is dropped.
    pub angle_min: f64,
}

impl Default for SimplifyParams {
    fn default() -> Self {
        Self {
            dist_min_sq: 0.25,
            angle_min: 5.0_f64.to_radians(),
        }
    }
}

/// Removes near-duplicate and near-collinear corners.
///
/// Both variants return the removed indices in removal order; each index is
/// valid for the corner list as it was at the moment of that removal.
pub struct Simplify {
    params: SimplifyParams,
}

impl Simplify {
    /// Creates a new `Simplify` operation.
    #[must_use]
    pub fn new(params: SimplifyParams) -> Self {
        Self { params }
    }

    /// Closed polygon variant. Never goes below 3 corners.
    #[must_use]
    pub fn closed(&self, corners: &[Point2]) -> Vec<usize> {
        let mut pts = corners.to_vec();
        let mut removed = Vec::new();
        loop {
            let before = removed.len();
            let mut i = 0;
            while i < pts.len() && pts.len() > 3 {
                let n = pts.len();
                if self.is_redundant(&pts[prev_index(i, n)], &pts[i], &pts[next_index(i, n)]) {
                    pts.remove(i);
                    removed.push(i);
                } else {
                    i += 1;
                }
            }
            if removed.len() == before || pts.len() <= 3 {
                break;
            }
        }
        removed
    }

    /// Open polyline variant: both endpoints are kept.
    ///
    /// A too-short final edge is collapsed by dropping the point before the end.
    #[must_use]
    pub fn open(&self, points: &[Point2]) -> Vec<usize> {
        let mut pts = points.to_vec();
        let mut removed = Vec::new();
        loop {
            let before = removed.len();
            let mut i = 1;
            while i + 1 < pts.len() {
                if self.is_redundant(&pts[i - 1], &pts[i], &pts[i + 1]) {
                    pts.remove(i);
                    removed.push(i);
                } else {
                    i += 1;
                }
            }
            let n = pts.len();
            if n > 2 && (pts[n - 1] - pts[n - 2]).norm_squared() < self.params.dist_min_sq {
                pts.remove(n - 2);
                removed.push(n - 2);
            }
            if removed.len() == before {
                break;
            }
        }
        removed
    }

    /// Simplifies a closed polygon in place. Returns the number of corners removed.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`CornerHolder::remove_corner`].
    pub fn apply_closed<H: CornerHolder + ?Sized>(&self, holder: &mut H) -> Result<usize> {
        let removed = self.closed(holder.corners());
        for &index in &removed {
            holder.remove_corner(index)?;
        }
        trace!(removed = removed.len(), "simplified polygon");
        Ok(removed.len())
    }

    /// Simplifies an open polyline in place. Returns the number of points removed.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`CornerHolder::remove_corner`].
    pub fn apply_open<H: CornerHolder + ?Sized>(&self, holder: &mut H) -> Result<usize> {
        let removed = self.open(holder.corners());
        for &index in &removed {
            holder.remove_corner(index)?;
        }
        trace!(removed = removed.len(), "simplified polyline");
        Ok(removed.len())
    }

    fn is_redundant(&self, prev: &Point2, current: &Point2, next: &Point2) -> bool {
        let incoming: Vector2 = current - prev;
        let outgoing: Vector2 = next - current;
        if incoming.norm_squared() < self.params.dist_min_sq {
            return true;
        }
        if incoming.norm() < TOLERANCE || outgoing.norm() < TOLERANCE {
            return true;
        }
        let turn = incoming.perp(&outgoing).atan2(incoming.dot(&outgoing));
        turn.abs() < self.params.angle_min
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::{BrushStroke, Polygon};

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn apply(indices: &[usize], corners: &[Point2]) -> Vec<Point2> {
        let mut pts = corners.to_vec();
        for &i in indices {
            pts.remove(i);
        }
        pts
    }

    fn simplify() -> Simplify {
        Simplify::new(SimplifyParams::default())
    }

    #[test]
    fn square_is_untouched() {
        let square = [p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 10.0)];
        assert!(simplify().closed(&square).is_empty());
    }

    #[test]
    fn collinear_corner_is_removed() {
        let corners = [p(0.0, 0.0), p(5.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 10.0)];
        let removed = simplify().closed(&corners);
        assert_eq!(removed, vec![1]);
    }

    #[test]
    fn near_duplicate_corner_is_removed() {
        let corners = [p(0.0, 0.0), p(10.0, 0.0), p(10.1, 0.2), p(10.0, 10.0), p(0.0, 10.0)];
        let removed = simplify().closed(&corners);
        let result = apply(&removed, &corners);
        assert_eq!(result.len(), 4);
        assert!(result.contains(&p(0.0, 0.0)));
        assert!(result.contains(&p(10.0, 10.0)));
    }

    #[test]
    fn never_below_three_corners() {
        // All corners within the distance threshold of each other.
        let tiny = [p(0.0, 0.0), p(0.1, 0.0), p(0.1, 0.1), p(0.0, 0.1), p(0.05, 0.15)];
        let removed = simplify().closed(&tiny);
        assert_eq!(apply(&removed, &tiny).len(), 3);

        let triangle = [p(0.0, 0.0), p(0.1, 0.0), p(0.0, 0.1)];
        assert!(simplify().closed(&triangle).is_empty());
    }

    #[test]
    fn closed_is_idempotent() {
        let corners = [
            p(0.0, 0.0),
            p(3.0, 0.01),
            p(6.0, 0.0),
            p(6.2, 0.1),
            p(10.0, 0.0),
            p(10.0, 10.0),
            p(5.0, 10.02),
            p(0.0, 10.0),
        ];
        let once = apply(&simplify().closed(&corners), &corners);
        let twice = apply(&simplify().closed(&once), &once);
        assert_eq!(once, twice);
    }

    #[test]
    fn open_keeps_endpoints() {
        let stroke = [p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0), p(3.0, 0.0)];
        let result = apply(&simplify().open(&stroke), &stroke);
        assert_eq!(result, vec![p(0.0, 0.0), p(3.0, 0.0)]);
    }

    #[test]
    fn open_collapses_short_last_edge() {
        let stroke = [p(0.0, 0.0), p(0.0, 5.0), p(5.0, 5.0), p(5.1, 5.1)];
        let result = apply(&simplify().open(&stroke), &stroke);
        assert_eq!(result, vec![p(0.0, 0.0), p(0.0, 5.0), p(5.1, 5.1)]);
    }

    #[test]
    fn apply_variants_edit_holders() {
        let mut polygon = Polygon::new(vec![
            p(0.0, 0.0),
            p(5.0, 0.0),
            p(10.0, 0.0),
            p(10.0, 10.0),
            p(0.0, 10.0),
        ]);
        assert_eq!(simplify().apply_closed(&mut polygon).unwrap(), 1);
        assert_eq!(polygon.len(), 4);

        let mut brush = BrushStroke::from_points(vec![p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0)]);
        assert_eq!(simplify().apply_open(&mut brush).unwrap(), 1);
        assert_eq!(brush.len(), 2);
    }
}
