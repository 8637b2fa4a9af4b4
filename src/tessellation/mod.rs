mod triangulate;
mod validator;

pub use triangulate::TriangulatePolygon;
pub use validator::{fix_polygon_area, FixtureValidator, TriangulationValidator, Validation};

use crate::math::Point2;

/// Parameters for turning a polygon into fixture triangles.
#[derive(Debug, Clone, Copy)]
pub struct FixtureParams {
    /// Triangles with an area at or below this are rejected.
    pub area_min: f64,
}

impl Default for FixtureParams {
    fn default() -> Self {
        Self { area_min: 1e-3 }
    }
}

impl FixtureParams {
    /// Sets the minimum triangle area.
    #[must_use]
    pub fn with_area_min(mut self, area_min: f64) -> Self {
        self.area_min = area_min;
        self
    }
}

/// A triangulation of a polygon's interior.
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    /// Vertex positions, identical to the polygon corners.
    pub vertices: Vec<Point2>,
    /// Triangles as corner indices, counter-clockwise.
    pub indices: Vec<[usize; 3]>,
}

impl TriangleMesh {
    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Corner positions of triangle `index`.
    #[must_use]
    pub fn triangle(&self, index: usize) -> Option<[Point2; 3]> {
        let [a, b, c] = *self.indices.get(index)?;
        Some([self.vertices[a], self.vertices[b], self.vertices[c]])
    }
}
