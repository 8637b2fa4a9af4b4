use tracing::debug;

use crate::error::{RepairError, Result};
use crate::geometry::CornerHolder;
use crate::tessellation::{FixtureValidator, Validation};

/// What the repair loop did to reach a valid polygon.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Number of validation rounds, including the final successful one.
    pub attempts: usize,
    /// Removed corner indices in removal order.
    pub removed: Vec<usize>,
}

/// Validates a polygon and removes flagged corners until it is accepted.
pub struct RepairLoop<'v, V: FixtureValidator + ?Sized> {
    validator: &'v V,
}

impl<'v, V: FixtureValidator + ?Sized> RepairLoop<'v, V> {
    /// Creates a new `RepairLoop` operation.
    #[must_use]
    pub fn new(validator: &'v V) -> Self {
        Self { validator }
    }

    /// Runs the loop on `holder`.
    ///
    /// Every round either accepts the polygon or removes at least one corner, so
    /// the loop ends after at most `corner_count` rounds. Corners removed before
    /// a failure stay removed; callers undo them through their command log.
    ///
    /// # Errors
    ///
    /// - [`RepairError::Complex`] if the validator reports a self-intersection.
    /// - [`RepairError::AreaTooSmall`] if a triangle is too small and no fix is known.
    /// - [`RepairError::TooFewCorners`] if fewer than 3 corners remain or would remain.
    pub fn execute<H: CornerHolder + ?Sized>(&self, holder: &mut H) -> Result<RepairReport> {
        let mut report = RepairReport::default();
        loop {
            let count = holder.corner_count();
            if count < 3 {
                return Err(RepairError::TooFewCorners { count }.into());
            }

            report.attempts += 1;
            match self.validator.validate(holder.corners())? {
                Validation::Valid => {
                    debug!(attempts = report.attempts, removed = report.removed.len(), "polygon accepted");
                    return Ok(report);
                }
                Validation::Complex => return Err(RepairError::Complex.into()),
                Validation::AreaTooSmall(mut indices) => {
                    if indices.is_empty() {
                        return Err(RepairError::AreaTooSmall.into());
                    }
                    indices.sort_unstable_by(|a, b| b.cmp(a));
                    indices.dedup();
                    let remaining = count.saturating_sub(indices.len());
                    if remaining < 3 {
                        return Err(RepairError::TooFewCorners { count: remaining }.into());
                    }
                    debug!(?indices, "removing corners of too-small triangle");
                    for index in indices {
                        holder.remove_corner(index)?;
                        report.removed.push(index);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;
    use crate::error::ShapeBrushError;
    use crate::geometry::Polygon;
    use crate::math::Point2;
    use crate::tessellation::TriangulationValidator;

    /// Replays a fixed sequence of answers, then accepts everything.
    struct Scripted(RefCell<VecDeque<Validation>>);

    impl Scripted {
        fn new(answers: Vec<Validation>) -> Self {
            Self(RefCell::new(answers.into()))
        }
    }

    impl FixtureValidator for Scripted {
        fn validate(&self, _corners: &[Point2]) -> Result<Validation> {
            Ok(self.0.borrow_mut().pop_front().unwrap_or(Validation::Valid))
        }
    }

    fn pentagon() -> Polygon {
        Polygon::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(12.0, 5.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
        ])
    }

    #[test]
    fn valid_polygon_needs_one_attempt() {
        let mut poly = pentagon();
        let report = RepairLoop::new(&Scripted::new(vec![])).execute(&mut poly).unwrap();
        assert_eq!(report.attempts, 1);
        assert!(report.removed.is_empty());
    }

    #[test]
    fn flagged_corners_are_removed_highest_first() {
        let mut poly = pentagon();
        let validator = Scripted::new(vec![Validation::AreaTooSmall(vec![1, 3, 1])]);
        let report = RepairLoop::new(&validator).execute(&mut poly).unwrap();
        assert_eq!(report.attempts, 2);
        assert_eq!(report.removed, vec![3, 1]);
        assert_eq!(
            poly.corners(),
            &[Point2::new(0.0, 0.0), Point2::new(12.0, 5.0), Point2::new(0.0, 10.0)]
        );
    }

    #[test]
    fn complex_is_fatal() {
        let mut poly = pentagon();
        let validator = Scripted::new(vec![Validation::Complex]);
        assert!(matches!(
            RepairLoop::new(&validator).execute(&mut poly),
            Err(ShapeBrushError::Repair(RepairError::Complex))
        ));
    }

    #[test]
    fn empty_fix_is_fatal() {
        let mut poly = pentagon();
        let validator = Scripted::new(vec![Validation::AreaTooSmall(vec![])]);
        assert!(matches!(
            RepairLoop::new(&validator).execute(&mut poly),
            Err(ShapeBrushError::Repair(RepairError::AreaTooSmall))
        ));
    }

    #[test]
    fn corner_floor_is_enforced() {
        let mut poly = pentagon();
        let validator = Scripted::new(vec![Validation::AreaTooSmall(vec![0, 1, 2])]);
        assert!(matches!(
            RepairLoop::new(&validator).execute(&mut poly),
            Err(ShapeBrushError::Repair(RepairError::TooFewCorners { count: 2 }))
        ));
        assert_eq!(poly.len(), 5);

        let mut line = Polygon::new(vec![Point2::origin(), Point2::new(1.0, 0.0)]);
        assert!(matches!(
            RepairLoop::new(&validator).execute(&mut line),
            Err(ShapeBrushError::Repair(RepairError::TooFewCorners { count: 2 }))
        ));
    }

    #[test]
    fn spike_is_repaired_with_triangulation() {
        let mut poly = Polygon::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(5.00001, 10.0),
            Point2::new(5.000005, 20.0),
            Point2::new(5.0, 10.0),
            Point2::new(0.0, 10.0),
        ]);
        let initial = poly.len();
        let validator = TriangulationValidator::default();
        let report = RepairLoop::new(&validator).execute(&mut poly).unwrap();
        assert!(report.attempts >= 2);
        assert!(report.attempts <= initial);
        assert!(!report.removed.is_empty());
        assert_eq!(validator.validate(poly.corners()).unwrap(), Validation::Valid);
    }
}
