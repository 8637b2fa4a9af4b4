use crate::error::Result;
use crate::geometry::{CornerHolder, Polygon};
use crate::math::{Point2, Vector2};

slotmap::new_key_type! {
    /// Unique identifier for a shape in the shape store.
    pub struct ShapeId;
}

/// A polygon placed in the world.
///
/// Corners are stored relative to `position`; brush strokes and picking work in
/// world coordinates.
#[derive(Debug, Clone)]
pub struct ShapeData {
    /// Boundary in shape-local coordinates.
    pub polygon: Polygon,
    /// World position of the local origin.
    pub position: Vector2,
}

impl ShapeData {
    /// Creates a shape at `position` with local corners `polygon`.
    #[must_use]
    pub fn new(polygon: Polygon, position: Vector2) -> Self {
        Self { polygon, position }
    }

    /// Creates a shape at the world origin.
    #[must_use]
    pub fn at_origin(polygon: Polygon) -> Self {
        Self::new(polygon, Vector2::zeros())
    }

    /// Converts a world point to shape-local coordinates.
    #[must_use]
    pub fn to_local(&self, point: &Point2) -> Point2 {
        point - self.position
    }

    /// Converts a shape-local point to world coordinates.
    #[must_use]
    pub fn to_world(&self, point: &Point2) -> Point2 {
        point + self.position
    }

    /// Corners in world coordinates.
    #[must_use]
    pub fn world_corners(&self) -> Vec<Point2> {
        self.polygon
            .corners()
            .iter()
            .map(|c| self.to_world(c))
            .collect()
    }
}

impl CornerHolder for ShapeData {
    fn corners(&self) -> &[Point2] {
        self.polygon.corners()
    }

    fn add_corner(&mut self, index: usize, point: Point2) -> Result<()> {
        self.polygon.add_corner(index, point)
    }

    fn move_corner(&mut self, index: usize, point: Point2) -> Result<Point2> {
        self.polygon.move_corner(index, point)
    }

    fn remove_corner(&mut self, index: usize) -> Result<Point2> {
        self.polygon.remove_corner(index)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn frames_round_trip() {
        let shape = ShapeData::new(
            Polygon::new(vec![
                Point2::new(0.0, 0.0),
                Point2::new(2.0, 0.0),
                Point2::new(0.0, 2.0),
            ]),
            Vector2::new(5.0, -1.0),
        );
        let world = Point2::new(6.0, 0.0);
        let local = shape.to_local(&world);
        assert_eq!(local, Point2::new(1.0, 1.0));
        assert_eq!(shape.to_world(&local), world);
        assert_eq!(shape.world_corners()[1], Point2::new(7.0, -1.0));
    }

    #[test]
    fn edits_reach_the_polygon() {
        let mut shape = ShapeData::at_origin(Polygon::default());
        shape.append_corner(Point2::new(1.0, 1.0)).unwrap();
        assert_eq!(shape.polygon.len(), 1);
        assert_eq!(shape.remove_corner(0).unwrap(), Point2::new(1.0, 1.0));
        assert!(shape.polygon.is_empty());
    }
}
