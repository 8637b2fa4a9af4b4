use tracing::trace;

use crate::error::{GeometryError, Result, ShapeBrushError};
use crate::math::polygon_2d::{find_self_intersection, signed_area_2d, triangle_area};
use crate::math::{next_index, Point2};

use super::{FixtureParams, TriangulatePolygon};

/// Outcome of turning a polygon into fixture geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    /// The polygon can be used as is.
    Valid,
    /// Some triangle is too small. Removing these corners (highest first) is
    /// expected to help; an empty list means no fix is known.
    AreaTooSmall(Vec<usize>),
    /// The polygon crosses itself or has fewer than 3 corners.
    Complex,
}

/// Judges whether a polygon is usable downstream.
pub trait FixtureValidator {
    /// Validates `corners` as a closed polygon.
    ///
    /// # Errors
    ///
    /// Returns an error only for failures unrelated to the polygon's shape,
    /// such as non-finite coordinates.
    fn validate(&self, corners: &[Point2]) -> Result<Validation>;
}

/// [`FixtureValidator`] that triangulates the polygon and checks each triangle's area.
#[derive(Debug, Clone, Copy, Default)]
pub struct TriangulationValidator {
    params: FixtureParams,
}

impl TriangulationValidator {
    /// Creates a validator with the given parameters.
    #[must_use]
    pub fn new(params: FixtureParams) -> Self {
        Self { params }
    }

    /// The parameters in use.
    #[must_use]
    pub fn params(&self) -> FixtureParams {
        self.params
    }
}

impl FixtureValidator for TriangulationValidator {
    fn validate(&self, corners: &[Point2]) -> Result<Validation> {
        if corners.len() < 3 || !find_self_intersection(corners).is_simple_polygon() {
            return Ok(Validation::Complex);
        }

        let mesh = match TriangulatePolygon::new(corners).execute() {
            Ok(mesh) => mesh,
            Err(ShapeBrushError::Geometry(GeometryError::Degenerate(reason))) => {
                trace!(%reason, "triangulation rejected polygon");
                return Ok(Validation::Complex);
            }
            Err(e) => return Err(e),
        };

        if mesh.indices.is_empty() {
            return Ok(Validation::AreaTooSmall(Vec::new()));
        }

        let area_min = self.params.area_min;
        let mut too_small = false;
        for &[a, b, c] in &mesh.indices {
            let area = triangle_area(&corners[a], &corners[b], &corners[c]).abs();
            if area > area_min {
                continue;
            }
            too_small = true;
            let fix = fix_polygon_area(corners, [a, b, c], area_min);
            trace!(a, b, c, area, ?fix, "triangle below minimum area");
            if !fix.is_empty() {
                return Ok(Validation::AreaTooSmall(fix));
            }
        }

        if too_small {
            Ok(Validation::AreaTooSmall(Vec::new()))
        } else {
            Ok(Validation::Valid)
        }
    }
}

/// Finds corners whose removal gets rid of the too-small `triangle`.
///
/// Two of the triangle's corners must be neighbours on the boundary. The
/// boundary between them is widened backwards and forwards until the triangle
/// they form with the third corner is larger than `area_min`; the widening that
/// removes the fewest corners wins, then the one changing the polygon area
/// least. Returns the corner indices strictly inside the widened range, in
/// ascending order, or an empty list if no widening works.
#[must_use]
pub fn fix_polygon_area(corners: &[Point2], triangle: [usize; 3], area_min: f64) -> Vec<usize> {
    let n = corners.len();
    if n < 4 || triangle.iter().any(|&i| i >= n) {
        return Vec::new();
    }

    let [a, b, c] = triangle;
    let adjacent = [(a, b, c), (b, c, a), (c, a, b)]
        .into_iter()
        .find_map(|(x, y, other)| {
            if next_index(x, n) == y {
                Some((x, y, other))
            } else if next_index(y, n) == x {
                Some((y, x, other))
            } else {
                None
            }
        });
    let Some((low, high, other)) = adjacent else {
        return Vec::new();
    };

    let steps = |from: usize, to: usize| (to + n - from) % n;
    let max_back = steps(other, low);
    let max_fwd = steps(high, other);

    // (removed count, area change, low', high')
    let mut best: Option<(usize, f64, usize, usize)> = None;
    for back in 0..max_back {
        for fwd in 0..max_fwd {
            let removed = back + fwd;
            if removed == 0 || removed > n - 3 {
                continue;
            }
            if best.is_some_and(|(count, ..)| removed > count) {
                continue;
            }
            let lo = (low + n - back) % n;
            let hi = (high + fwd) % n;
            let area = triangle_area(&corners[other], &corners[lo], &corners[hi]).abs();
            if area <= area_min {
                continue;
            }
            let cut: Vec<Point2> = (0..=removed + 1).map(|k| corners[(lo + k) % n]).collect();
            let change = signed_area_2d(&cut).abs();
            let better = match best {
                None => true,
                Some((count, best_change, ..)) => removed < count || change < best_change,
            };
            if better {
                best = Some((removed, change, lo, hi));
            }
        }
    }

    let Some((_, _, lo, hi)) = best else {
        return Vec::new();
    };
    let mut indices = Vec::new();
    let mut i = next_index(lo, n);
    while i != hi {
        indices.push(i);
        i = next_index(i, n);
    }
    indices.sort_unstable();
    indices
}
