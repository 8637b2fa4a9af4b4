use tracing::debug;

use crate::commands::{CommandLog, ShapeEditor};
use crate::error::{PreconditionError, Result};
use crate::geometry::CornerHolder;
use crate::math::Point2;
use crate::operations::BrushParams;
use crate::store::{ShapeId, ShapeStore};
use crate::tessellation::FixtureValidator;

use super::{accept_or_rollback, ensure_finite};

/// Removes the corner under the pointer.
pub struct RemoveCorner<'a> {
    point: Point2,
    selection: &'a [ShapeId],
    hit_dist_sq: f64,
}

impl<'a> RemoveCorner<'a> {
    /// Creates a new `RemoveCorner` operation for a click at the world point `point`.
    #[must_use]
    pub fn new(point: Point2, selection: &'a [ShapeId], params: &BrushParams) -> Self {
        Self {
            point,
            selection,
            hit_dist_sq: params.corner_hit_dist_sq,
        }
    }

    /// Executes the removal.
    ///
    /// Returns the shape and the removed (shape-local) corner, or `None` if no
    /// corner is under the pointer.
    ///
    /// # Errors
    ///
    /// - [`PreconditionError::CornerFloor`] if the shape has 3 corners or fewer.
    /// - [`crate::error::RepairError`] if the validator rejects the result (the
    ///   removal is undone and the redo stack cleared).
    /// - Input, store and command errors.
    pub fn execute<L, V>(
        &self,
        store: &mut ShapeStore,
        log: &mut L,
        validator: &V,
    ) -> Result<Option<(ShapeId, Point2)>>
    where
        L: CommandLog,
        V: FixtureValidator + ?Sized,
    {
        ensure_finite(&self.point)?;
        let Some((shape, index)) = store.corner_at(&self.point, self.selection, self.hit_dist_sq) else {
            return Ok(None);
        };

        let count = store.shape(shape)?.corner_count();
        if count <= 3 {
            return Err(PreconditionError::CornerFloor {
                count: count.saturating_sub(1),
            }
            .into());
        }

        let mut editor = ShapeEditor::new(store, log, shape, false)?;
        let removed = editor.remove_corner(index)?;
        let issued = editor.executed();
        debug!(index, "removed corner");

        accept_or_rollback(store, log, shape, issued, validator)?;
        Ok(Some((shape, removed)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::commands::Invoker;
    use crate::error::{RepairError, ShapeBrushError};
    use crate::geometry::Polygon;
    use crate::store::ShapeData;
    use crate::tessellation::TriangulationValidator;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn setup(corners: Vec<Point2>) -> (ShapeStore, Invoker, ShapeId) {
        let mut store = ShapeStore::new();
        let shape = store.add_shape(ShapeData::at_origin(Polygon::new(corners)));
        (store, Invoker::new(), shape)
    }

    fn pentagon() -> Vec<Point2> {
        vec![p(0.0, 0.0), p(10.0, 0.0), p(12.0, 5.0), p(10.0, 10.0), p(0.0, 10.0)]
    }

    #[test]
    fn removes_corner_under_pointer() {
        let (mut store, mut log, shape) = setup(pentagon());
        let params = BrushParams::default();
        let validator = TriangulationValidator::default();

        let removed = RemoveCorner::new(p(12.1, 5.0), &[shape], &params)
            .execute(&mut store, &mut log, &validator)
            .unwrap();
        assert_eq!(removed, Some((shape, p(12.0, 5.0))));
        assert_eq!(store.shape(shape).unwrap().corner_count(), 4);

        log.undo(&mut store, true).unwrap();
        assert_eq!(store.shape(shape).unwrap().corners(), pentagon().as_slice());
    }

    #[test]
    fn miss_does_nothing() {
        let (mut store, mut log, shape) = setup(pentagon());
        let removed = RemoveCorner::new(p(5.0, 5.0), &[shape], &BrushParams::default())
            .execute(&mut store, &mut log, &TriangulationValidator::default())
            .unwrap();
        assert!(removed.is_none());
        assert!(log.is_empty());
    }

    #[test]
    fn triangle_keeps_its_corners() {
        let (mut store, mut log, shape) = setup(vec![p(0.0, 0.0), p(10.0, 0.0), p(0.0, 10.0)]);
        let result = RemoveCorner::new(p(10.0, 0.0), &[shape], &BrushParams::default())
            .execute(&mut store, &mut log, &TriangulationValidator::default());
        assert!(matches!(
            result,
            Err(ShapeBrushError::Precondition(PreconditionError::CornerFloor { count: 2 }))
        ));
        assert_eq!(store.shape(shape).unwrap().corner_count(), 3);
    }

    #[test]
    fn self_intersecting_result_is_rolled_back() {
        // Dropping the top-right corner makes the diagonal cut through the spike.
        let spiked = vec![
            p(0.0, 0.0),
            p(4.0, 0.0),
            p(5.0, 8.0),
            p(6.0, 0.0),
            p(10.0, 0.0),
            p(10.0, 10.0),
            p(0.0, 10.0),
        ];
        let (mut store, mut log, shape) = setup(spiked.clone());
        let result = RemoveCorner::new(p(10.0, 10.0), &[shape], &BrushParams::default())
            .execute(&mut store, &mut log, &TriangulationValidator::default());
        assert!(matches!(result, Err(ShapeBrushError::Repair(RepairError::Complex))));
        assert_eq!(store.shape(shape).unwrap().corners(), spiked.as_slice());
        assert!(!log.can_undo());
    }
}
