use crate::error::{GeometryError, PreconditionError, Result};
use crate::math::polygon_2d::{find_self_intersection, point_in_polygon, signed_area_2d, SelfIntersection};
use crate::math::{next_index, prev_index, Point2, Vector2};

use super::CornerHolder;

/// Closed polygon: edge `i` joins corner `i` to corner `(i + 1) % len`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    corners: Vec<Point2>,
}

impl Polygon {
    /// Creates a polygon from its corners.
    #[must_use]
    pub fn new(corners: Vec<Point2>) -> Self {
        Self { corners }
    }

    /// Number of corners (and edges).
    #[must_use]
    pub fn len(&self) -> usize {
        self.corners.len()
    }

    /// Returns `true` if the polygon has no corners.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.corners.is_empty()
    }

    /// Index of the corner after `index`.
    #[must_use]
    pub fn next(&self, index: usize) -> usize {
        next_index(index, self.corners.len())
    }

    /// Index of the corner before `index`.
    #[must_use]
    pub fn prev(&self, index: usize) -> usize {
        prev_index(index, self.corners.len())
    }

    /// Endpoints of edge `index`, or `None` if out of range.
    #[must_use]
    pub fn edge(&self, index: usize) -> Option<(Point2, Point2)> {
        let start = *self.corners.get(index)?;
        Some((start, self.corners[self.next(index)]))
    }

    /// Fails unless the polygon has at least three corners.
    ///
    /// # Errors
    ///
    /// Returns [`PreconditionError::PolygonTooSmall`] for fewer than 3 corners.
    pub fn ensure_usable(&self) -> Result<()> {
        if self.corners.len() < 3 {
            return Err(PreconditionError::PolygonTooSmall {
                count: self.corners.len(),
            }
            .into());
        }
        Ok(())
    }

    /// Signed area, positive when counter-clockwise.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        signed_area_2d(&self.corners)
    }

    /// Even-odd containment test.
    #[must_use]
    pub fn contains(&self, point: &Point2) -> bool {
        point_in_polygon(point, &self.corners)
    }

    /// Self-intersection classification of the corner loop.
    #[must_use]
    pub fn self_intersection(&self) -> SelfIntersection {
        find_self_intersection(&self.corners)
    }

    /// Copy of the polygon shifted by `offset`.
    #[must_use]
    pub fn translated(&self, offset: &Vector2) -> Self {
        Self::new(self.corners.iter().map(|c| c + offset).collect())
    }
}

impl CornerHolder for Polygon {
    fn corners(&self) -> &[Point2] {
        &self.corners
    }

    fn add_corner(&mut self, index: usize, point: Point2) -> Result<()> {
        if index > self.corners.len() {
            return Err(GeometryError::IndexOutOfRange {
                index,
                len: self.corners.len(),
            }
            .into());
        }
        self.corners.insert(index, point);
        Ok(())
    }

    fn move_corner(&mut self, index: usize, point: Point2) -> Result<Point2> {
        let len = self.corners.len();
        let corner = self
            .corners
            .get_mut(index)
            .ok_or(GeometryError::IndexOutOfRange { index, len })?;
        Ok(std::mem::replace(corner, point))
    }

    fn remove_corner(&mut self, index: usize) -> Result<Point2> {
        if index >= self.corners.len() {
            return Err(GeometryError::IndexOutOfRange {
                index,
                len: self.corners.len(),
            }
            .into());
        }
        Ok(self.corners.remove(index))
    }
}

impl From<Vec<Point2>> for Polygon {
    fn from(corners: Vec<Point2>) -> Self {
        Self::new(corners)
    }
}
