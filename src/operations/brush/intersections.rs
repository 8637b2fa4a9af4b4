use std::cmp::Ordering;

use tracing::trace;

use crate::error::Result;
use crate::geometry::BrushStroke;
use crate::math::intersect_2d::segment_segment_intersect_2d;
use crate::math::polygon_2d::point_in_polygon;
use crate::math::{next_index, points_equal, Point2, Vector2, TOLERANCE};
use crate::store::{ShapeId, ShapeStore};

/// A point where a brush edge crosses a polygon edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    /// Where the edges cross.
    pub point: Point2,
    /// Polygon edge index (edge `i` starts at corner `i`).
    pub polygon_edge: usize,
    /// Brush edge index (edge `i` starts at brush point `i`).
    pub brush_edge: usize,
    /// Position along the brush edge, in `[0, 1]`.
    pub brush_t: f64,
}

impl Crossing {
    /// Copy of the crossing shifted by `offset`.
    #[must_use]
    pub fn translated(&self, offset: &Vector2) -> Self {
        Self {
            point: self.point + offset,
            ..*self
        }
    }

    /// Orders crossings along the brush.
    #[must_use]
    pub fn brush_order(&self, other: &Self) -> Ordering {
        self.brush_edge
            .cmp(&other.brush_edge)
            .then(self.brush_t.total_cmp(&other.brush_t))
    }

    /// Position along the whole brush: edge index plus the fraction along it.
    #[allow(clippy::cast_precision_loss)]
    fn brush_position(&self) -> f64 {
        self.brush_edge as f64 + self.brush_t
    }
}

/// Finds every crossing between the closed polygon `corners` and the open
/// polyline `brush`, ordered along the brush.
///
/// Parallel and collinear edge pairs are not crossings. Crossings that land on
/// the same point (the brush meets a corner, or a brush point lies on an edge)
/// yield one crossing if the brush passes from inside to outside there, and
/// none if it only touches the boundary and stays on the same side.
#[must_use]
pub fn find_crossings(corners: &[Point2], brush: &[Point2]) -> Vec<Crossing> {
    let n = corners.len();
    if n < 3 || brush.len() < 2 {
        return Vec::new();
    }

    let mut crossings = Vec::new();
    for polygon_edge in 0..n {
        let a0 = &corners[polygon_edge];
        let a1 = &corners[next_index(polygon_edge, n)];
        for (brush_edge, pair) in brush.windows(2).enumerate() {
            if let Some((point, _, brush_t)) = segment_segment_intersect_2d(a0, a1, &pair[0], &pair[1]) {
                crossings.push(Crossing {
                    point,
                    polygon_edge,
                    brush_edge,
                    brush_t,
                });
            }
        }
    }

    crossings.sort_by(Crossing::brush_order);
    merge_coincident(corners, brush, crossings)
}

fn merge_coincident(corners: &[Point2], brush: &[Point2], crossings: Vec<Crossing>) -> Vec<Crossing> {
    let mut clusters: Vec<Vec<Crossing>> = Vec::new();
    for crossing in crossings {
        match clusters.last_mut() {
            Some(cluster) if points_equal(&cluster[0].point, &crossing.point) => cluster.push(crossing),
            _ => clusters.push(vec![crossing]),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let brush_end = (brush.len() - 1) as f64;
    let mut merged = Vec::with_capacity(clusters.len());
    for (i, cluster) in clusters.iter().enumerate() {
        let (Some(first), Some(last)) = (cluster.first(), cluster.last()) else {
            continue;
        };
        if cluster.len() > 1 {
            let before_from = i
                .checked_sub(1)
                .and_then(|j| clusters[j].last())
                .map_or(0.0, Crossing::brush_position);
            let after_to = clusters
                .get(i + 1)
                .and_then(|next| next.first())
                .map_or(brush_end, Crossing::brush_position);
            let before = gap_inside(corners, brush, before_from, first.brush_position());
            let after = gap_inside(corners, brush, last.brush_position(), after_to);
            if before.is_some() && before == after {
                trace!(x = first.point.x, y = first.point.y, count = cluster.len(), "brush touches boundary");
                continue;
            }
        }
        merged.push(*first);
    }
    merged
}

/// Whether the brush between positions `from` and `to` runs inside the
/// polygon. Between two consecutive crossings that does not change, so the
/// midpoint decides. `None` for an empty gap.
fn gap_inside(corners: &[Point2], brush: &[Point2], from: f64, to: f64) -> Option<bool> {
    if to - from <= TOLERANCE {
        return None;
    }
    point_at(brush, (from + to) * 0.5).map(|point| point_in_polygon(&point, corners))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn point_at(brush: &[Point2], position: f64) -> Option<Point2> {
    let last_edge = brush.len().checked_sub(2)?;
    let edge = (position.floor().max(0.0) as usize).min(last_edge);
    let (start, end) = (brush.get(edge)?, brush.get(edge + 1)?);
    #[allow(clippy::cast_precision_loss)]
    let t = position - edge as f64;
    Some(start + (end - start) * t)
}

/// A crossing together with the shape it belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushIntersection {
    /// The crossed shape.
    pub shape: ShapeId,
    /// The crossing, in world coordinates.
    pub crossing: Crossing,
}

/// Finds the crossings of a world-space brush with a set of stored shapes.
pub struct FindBrushIntersections<'a> {
    brush: &'a BrushStroke,
    targets: &'a [ShapeId],
}

impl<'a> FindBrushIntersections<'a> {
    /// Creates a new `FindBrushIntersections` operation.
    #[must_use]
    pub fn new(brush: &'a BrushStroke, targets: &'a [ShapeId]) -> Self {
        Self { brush, targets }
    }

    /// Executes the search.
    ///
    /// Results are grouped by target, in target order, and ordered along the
    /// brush within each group.
    ///
    /// # Errors
    ///
    /// Returns an error if a target shape is not in the store.
    pub fn execute(&self, store: &ShapeStore) -> Result<Vec<BrushIntersection>> {
        let mut found = Vec::new();
        for &shape in self.targets {
            let corners = store.shape(shape)?.world_corners();
            found.extend(
                find_crossings(&corners, self.brush.points())
                    .into_iter()
                    .map(|crossing| BrushIntersection { shape, crossing }),
            );
        }
        Ok(found)
    }
}
