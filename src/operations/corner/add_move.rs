use tracing::debug;

use crate::commands::{CommandLog, ShapeEditor};
use crate::error::{GeometryError, Result};
use crate::geometry::CornerHolder;
use crate::math::{points_equal, Point2};
use crate::operations::BrushParams;
use crate::store::{ShapeId, ShapeStore};
use crate::tessellation::FixtureValidator;

use super::{accept_or_rollback, ensure_finite};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Grab {
    /// An existing corner, with its position before the drag.
    Existing { origin: Point2 },
    /// A corner that will be inserted on release.
    Inserted,
}

/// Drags an existing corner, or a new one inserted on an edge.
///
/// The shape is left untouched until [`AddMoveCorner::finish`], which commits
/// a single add or move command.
#[derive(Debug, Clone)]
pub struct AddMoveCorner {
    shape: ShapeId,
    index: usize,
    grab: Grab,
    position: Point2,
}

impl AddMoveCorner {
    /// Starts a drag at the world point `point`.
    ///
    /// A corner within `corner_hit_dist_sq` is grabbed; otherwise a new corner
    /// is placed on the nearest edge within `new_corner_dist_max_sq`. Returns
    /// `None` when neither is under the pointer.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::OperationError::InvalidInput`] for a non-finite point.
    pub fn begin(
        point: Point2,
        store: &ShapeStore,
        selection: &[ShapeId],
        params: &BrushParams,
    ) -> Result<Option<Self>> {
        ensure_finite(&point)?;

        if let Some((shape, index)) = store.corner_at(&point, selection, params.corner_hit_dist_sq) {
            let data = store.shape(shape)?;
            let origin = data.corner(index).ok_or(GeometryError::IndexOutOfRange {
                index,
                len: data.corner_count(),
            })?;
            debug!(index, "grabbed corner");
            return Ok(Some(Self {
                shape,
                index,
                grab: Grab::Existing { origin },
                position: origin,
            }));
        }

        if let Some((shape, edge)) = store.edge_at(&point, selection, params.new_corner_dist_max_sq) {
            debug!(edge, "new corner on edge");
            return Ok(Some(Self {
                shape,
                index: edge + 1,
                grab: Grab::Inserted,
                position: store.shape(shape)?.to_local(&point),
            }));
        }

        Ok(None)
    }

    /// The shape being edited.
    #[must_use]
    pub fn shape(&self) -> ShapeId {
        self.shape
    }

    /// Index the dragged corner has (or will have once inserted).
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// `true` if releasing inserts a new corner.
    #[must_use]
    pub fn inserts(&self) -> bool {
        self.grab == Grab::Inserted
    }

    /// Follows the pointer.
    ///
    /// # Errors
    ///
    /// Returns an error for a non-finite point or if the shape is gone.
    pub fn drag(&mut self, point: Point2, store: &ShapeStore) -> Result<()> {
        ensure_finite(&point)?;
        self.position = store.shape(self.shape)?.to_local(&point);
        Ok(())
    }

    /// Shape-local corners as they would be if released now.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape is gone.
    pub fn preview(&self, store: &ShapeStore) -> Result<Vec<Point2>> {
        let mut corners = store.shape(self.shape)?.corners().to_vec();
        match self.grab {
            Grab::Existing { .. } => {
                if let Some(corner) = corners.get_mut(self.index) {
                    *corner = self.position;
                }
            }
            Grab::Inserted => corners.insert(self.index.min(corners.len()), self.position),
        }
        Ok(corners)
    }

    /// Commits the drag at the world point `end`.
    ///
    /// Returns `false` when a grabbed corner was released where it started;
    /// nothing is logged then.
    ///
    /// # Errors
    ///
    /// - [`crate::error::RepairError`] if the validator rejects the result (the
    ///   command is undone and the redo stack cleared).
    /// - Input, store and command errors.
    pub fn finish<L, V>(
        mut self,
        end: Point2,
        store: &mut ShapeStore,
        log: &mut L,
        validator: &V,
    ) -> Result<bool>
    where
        L: CommandLog,
        V: FixtureValidator + ?Sized,
    {
        self.drag(end, store)?;
        if let Grab::Existing { origin } = self.grab {
            if points_equal(&origin, &self.position) {
                return Ok(false);
            }
        }

        let mut editor = ShapeEditor::new(store, log, self.shape, false)?;
        match self.grab {
            Grab::Existing { .. } => {
                editor.move_corner(self.index, self.position)?;
            }
            Grab::Inserted => editor.add_corner(self.index, self.position)?,
        }
        let issued = editor.executed();

        accept_or_rollback(store, log, self.shape, issued, validator)?;
        Ok(true)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::commands::Invoker;
    use crate::error::{OperationError, RepairError, ShapeBrushError};
    use crate::geometry::Polygon;
    use crate::math::Vector2;
    use crate::store::ShapeData;
    use crate::tessellation::TriangulationValidator;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn square() -> Polygon {
        Polygon::new(vec![p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 10.0)])
    }

    fn setup(position: Vector2) -> (ShapeStore, Invoker, ShapeId) {
        let mut store = ShapeStore::new();
        let shape = store.add_shape(ShapeData::new(square(), position));
        (store, Invoker::new(), shape)
    }

    #[test]
    fn drag_existing_corner() {
        let (mut store, mut log, shape) = setup(Vector2::zeros());
        let params = BrushParams::default();
        let mut tool = AddMoveCorner::begin(p(10.2, 10.1), &store, &[shape], &params)
            .unwrap()
            .unwrap();
        assert_eq!(tool.index(), 2);
        assert!(!tool.inserts());

        tool.drag(p(11.0, 11.0), &store).unwrap();
        assert_eq!(tool.preview(&store).unwrap()[2], p(11.0, 11.0));
        // Nothing is committed while dragging.
        assert_eq!(store.shape(shape).unwrap().polygon, square());

        assert!(tool
            .finish(p(12.0, 12.0), &mut store, &mut log, &TriangulationValidator::default())
            .unwrap());
        assert_eq!(store.shape(shape).unwrap().corners()[2], p(12.0, 12.0));
        assert_eq!(log.len(), 1);

        log.undo(&mut store, true).unwrap();
        assert_eq!(store.shape(shape).unwrap().polygon, square());
    }

    #[test]
    fn insert_on_nearest_edge() {
        let (mut store, mut log, shape) = setup(Vector2::zeros());
        let tool = AddMoveCorner::begin(p(5.0, 0.5), &store, &[shape], &BrushParams::default())
            .unwrap()
            .unwrap();
        assert!(tool.inserts());
        assert_eq!(tool.index(), 1);
        assert_eq!(tool.preview(&store).unwrap().len(), 5);

        tool.finish(p(5.0, -2.0), &mut store, &mut log, &TriangulationValidator::default())
            .unwrap();
        let corners = store.shape(shape).unwrap().corners().to_vec();
        assert_eq!(corners.len(), 5);
        assert_eq!(corners[1], p(5.0, -2.0));
    }

    #[test]
    fn works_in_shape_frame() {
        let (mut store, mut log, shape) = setup(Vector2::new(20.0, 0.0));
        let tool = AddMoveCorner::begin(p(30.0, 10.0), &store, &[shape], &BrushParams::default())
            .unwrap()
            .unwrap();
        tool.finish(p(32.0, 12.0), &mut store, &mut log, &TriangulationValidator::default())
            .unwrap();
        assert_eq!(store.shape(shape).unwrap().corners()[2], p(12.0, 12.0));
    }

    #[test]
    fn nothing_under_pointer() {
        let (store, _, shape) = setup(Vector2::zeros());
        assert!(AddMoveCorner::begin(p(5.0, 5.0), &store, &[shape], &BrushParams::default())
            .unwrap()
            .is_none());
        assert!(AddMoveCorner::begin(p(50.0, 50.0), &store, &[shape], &BrushParams::default())
            .unwrap()
            .is_none());
    }

    #[test]
    fn release_in_place_logs_nothing() {
        let (mut store, mut log, shape) = setup(Vector2::zeros());
        let tool = AddMoveCorner::begin(p(10.0, 10.0), &store, &[shape], &BrushParams::default())
            .unwrap()
            .unwrap();
        assert!(!tool
            .finish(p(10.0, 10.0), &mut store, &mut log, &TriangulationValidator::default())
            .unwrap());
        assert!(log.is_empty());
    }

    #[test]
    fn self_intersecting_move_is_rolled_back() {
        let (mut store, mut log, shape) = setup(Vector2::zeros());
        let tool = AddMoveCorner::begin(p(10.0, 10.0), &store, &[shape], &BrushParams::default())
            .unwrap()
            .unwrap();
        let result = tool.finish(p(-5.0, 5.0), &mut store, &mut log, &TriangulationValidator::default());
        assert!(matches!(result, Err(ShapeBrushError::Repair(RepairError::Complex))));
        assert_eq!(store.shape(shape).unwrap().polygon, square());
        assert!(!log.can_undo());
        assert!(!log.can_redo());
    }

    #[test]
    fn non_finite_pointer_is_refused() {
        let (store, _, shape) = setup(Vector2::zeros());
        let result = AddMoveCorner::begin(p(f64::NAN, 0.0), &store, &[shape], &BrushParams::default());
        assert!(matches!(
            result,
            Err(ShapeBrushError::Operation(OperationError::InvalidInput(_)))
        ));
    }
}
