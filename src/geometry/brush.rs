use crate::error::{GeometryError, PreconditionError, Result};
use crate::math::{points_equal, Point2, Vector2};

use super::CornerHolder;

/// Whether a brush gesture grows or shrinks the shapes it touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    /// The stroke started inside a selected shape; only that shape is edited.
    Add,
    /// The stroke started outside every selected shape; all of them are edited.
    Erase,
}

/// Open polyline sampled from a freehand drag. Edge `i` joins point `i` to `i + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct BrushStroke {
    points: Vec<Point2>,
    sample_dist_min_sq: f64,
}

impl BrushStroke {
    /// Starts a stroke at `start`. Later points are kept only once the pointer
    /// has moved more than `sample_dist_min_sq.sqrt()` from the last kept point.
    #[must_use]
    pub fn new(start: Point2, sample_dist_min_sq: f64) -> Self {
        Self {
            points: vec![start],
            sample_dist_min_sq,
        }
    }

    /// Builds a stroke from already sampled points.
    #[must_use]
    pub fn from_points(points: Vec<Point2>) -> Self {
        Self {
            points,
            sample_dist_min_sq: 0.0,
        }
    }

    /// Offers a pointer position; returns `true` if it was kept.
    pub fn extend(&mut self, point: Point2) -> bool {
        let far_enough = self
            .points
            .last()
            .is_none_or(|last| (point - last).norm_squared() > self.sample_dist_min_sq);
        if far_enough {
            self.points.push(point);
        }
        far_enough
    }

    /// Appends the release position unless it repeats the last point.
    pub fn finish(&mut self, point: Point2) {
        if !self.points.last().is_some_and(|last| points_equal(last, &point)) {
            self.points.push(point);
        }
    }

    /// The sampled points.
    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if nothing has been sampled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of edges (`len - 1`, or 0).
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Endpoints of edge `index`, or `None` if out of range.
    #[must_use]
    pub fn edge(&self, index: usize) -> Option<(Point2, Point2)> {
        Some((*self.points.get(index)?, *self.points.get(index + 1)?))
    }

    /// Fails unless the stroke has at least one edge.
    ///
    /// # Errors
    ///
    /// Returns [`PreconditionError::BrushTooShort`] for fewer than 2 points.
    pub fn ensure_usable(&self) -> Result<()> {
        if self.points.len() < 2 {
            return Err(PreconditionError::BrushTooShort {
                count: self.points.len(),
            }
            .into());
        }
        Ok(())
    }

    /// Copy of the stroke shifted by `offset`.
    #[must_use]
    pub fn translated(&self, offset: &Vector2) -> Self {
        Self {
            points: self.points.iter().map(|p| p + offset).collect(),
            sample_dist_min_sq: self.sample_dist_min_sq,
        }
    }
}

impl CornerHolder for BrushStroke {
    fn corners(&self) -> &[Point2] {
        &self.points
    }

    fn add_corner(&mut self, index: usize, point: Point2) -> Result<()> {
        if index > self.points.len() {
            return Err(GeometryError::IndexOutOfRange {
                index,
                len: self.points.len(),
            }
            .into());
        }
        self.points.insert(index, point);
        Ok(())
    }

    fn move_corner(&mut self, index: usize, point: Point2) -> Result<Point2> {
        let len = self.points.len();
        let slot = self
            .points
            .get_mut(index)
            .ok_or(GeometryError::IndexOutOfRange { index, len })?;
        Ok(std::mem::replace(slot, point))
    }

    fn remove_corner(&mut self, index: usize) -> Result<Point2> {
        if index >= self.points.len() {
            return Err(GeometryError::IndexOutOfRange {
                index,
                len: self.points.len(),
            }
            .into());
        }
        Ok(self.points.remove(index))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ShapeBrushError;

    #[test]
    fn sampling_skips_close_points() {
        let mut brush = BrushStroke::new(Point2::origin(), 0.25);
        assert!(!brush.extend(Point2::new(0.3, 0.0)));
        assert!(brush.extend(Point2::new(0.6, 0.0)));
        assert!(!brush.extend(Point2::new(0.6, 0.4)));
        assert_eq!(brush.len(), 2);
        assert_eq!(brush.edge_count(), 1);
    }

    #[test]
    fn finish_keeps_release_point_once() {
        let mut brush = BrushStroke::new(Point2::origin(), 0.25);
        brush.finish(Point2::new(0.1, 0.0));
        assert_eq!(brush.len(), 2);
        brush.finish(Point2::new(0.1, 0.0));
        assert_eq!(brush.len(), 2);
    }

    #[test]
    fn edges_are_open() {
        let brush = BrushStroke::from_points(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
        ]);
        assert_eq!(brush.edge(1), Some((Point2::new(1.0, 0.0), Point2::new(1.0, 1.0))));
        assert!(brush.edge(2).is_none());
    }

    #[test]
    fn single_point_is_too_short() {
        let brush = BrushStroke::new(Point2::origin(), 0.25);
        assert!(matches!(
            brush.ensure_usable(),
            Err(ShapeBrushError::Precondition(PreconditionError::BrushTooShort { count: 1 }))
        ));
    }

    #[test]
    fn corner_holder_edits_points() {
        let mut brush = BrushStroke::from_points(vec![Point2::origin(), Point2::new(2.0, 0.0)]);
        brush.add_corner(1, Point2::new(1.0, 0.0)).unwrap();
        assert_eq!(brush.remove_corner(1).unwrap(), Point2::new(1.0, 0.0));
        assert!(brush.remove_corner(2).is_err());

        let shifted = brush.translated(&Vector2::new(0.0, 3.0));
        assert_eq!(shifted.points()[1], Point2::new(2.0, 3.0));
    }
}
