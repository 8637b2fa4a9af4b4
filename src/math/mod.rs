pub mod distance_2d;
pub mod intersect_2d;
pub mod polygon_2d;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Index following `index` on a cycle of `len` elements.
#[must_use]
pub fn next_index(index: usize, len: usize) -> usize {
    (index + 1) % len
}

/// Index preceding `index` on a cycle of `len` elements.
#[must_use]
pub fn prev_index(index: usize, len: usize) -> usize {
    (index + len - 1) % len
}

/// Approximate point equality within [`TOLERANCE`] per axis.
#[must_use]
pub fn points_equal(a: &Point2, b: &Point2) -> bool {
    (a.x - b.x).abs() < TOLERANCE && (a.y - b.y).abs() < TOLERANCE
}
