pub mod brush;
pub mod corner;
pub mod repair;
pub mod simplify;

use simplify::SimplifyParams;

/// Thresholds shared by the brush and corner tools.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushParams {
    /// Squared distance the pointer must travel before a new brush point is sampled.
    pub sample_dist_min_sq: f64,
    /// Squared length below which an edge is collapsed by the simplifier.
    pub dist_min_sq: f64,
    /// Direction change (radians) below which a corner is considered collinear.
    pub angle_min: f64,
    /// Squared distance from an edge within which a new corner may be inserted.
    pub new_corner_dist_max_sq: f64,
    /// Squared radius for grabbing an existing corner.
    pub corner_hit_dist_sq: f64,
}

impl Default for BrushParams {
    fn default() -> Self {
        Self {
            sample_dist_min_sq: 0.25,
            dist_min_sq: 0.25,
            angle_min: 5.0_f64.to_radians(),
            new_corner_dist_max_sq: 1.0,
            corner_hit_dist_sq: 0.25,
        }
    }
}

impl BrushParams {
    /// Sets the brush sampling distance (squared).
    #[must_use]
    pub fn with_sample_dist_min_sq(mut self, value: f64) -> Self {
        self.sample_dist_min_sq = value;
        self
    }

    /// Sets the minimum edge length (squared).
    #[must_use]
    pub fn with_dist_min_sq(mut self, value: f64) -> Self {
        self.dist_min_sq = value;
        self
    }

    /// Sets the minimum direction change in radians.
    #[must_use]
    pub fn with_angle_min(mut self, value: f64) -> Self {
        self.angle_min = value;
        self
    }

    /// Sets the maximum distance (squared) for inserting a corner on an edge.
    #[must_use]
    pub fn with_new_corner_dist_max_sq(mut self, value: f64) -> Self {
        self.new_corner_dist_max_sq = value;
        self
    }

    /// Sets the corner grab radius (squared).
    #[must_use]
    pub fn with_corner_hit_dist_sq(mut self, value: f64) -> Self {
        self.corner_hit_dist_sq = value;
        self
    }

    /// The simplifier thresholds.
    #[must_use]
    pub fn simplify(&self) -> SimplifyParams {
        SimplifyParams {
            dist_min_sq: self.dist_min_sq,
            angle_min: self.angle_min,
        }
    }
}
