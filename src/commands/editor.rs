use crate::error::{GeometryError, Result};
use crate::geometry::CornerHolder;
use crate::math::Point2;
use crate::store::{ShapeId, ShapeStore};

use super::{CommandLog, CornerCommand};

/// [`CornerHolder`] view of one stored shape that records every edit in a
/// [`CommandLog`].
///
/// The first command is chained only if `chain` was set at construction; every
/// later one is chained, so all edits made through one editor undo as a group.
pub struct ShapeEditor<'a, L: CommandLog> {
    store: &'a mut ShapeStore,
    log: &'a mut L,
    shape: ShapeId,
    chain: bool,
    executed: usize,
}

impl<'a, L: CommandLog> ShapeEditor<'a, L> {
    /// Opens an editor on `shape`.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape is not in the store.
    pub fn new(store: &'a mut ShapeStore, log: &'a mut L, shape: ShapeId, chain: bool) -> Result<Self> {
        store.shape(shape)?;
        Ok(Self {
            store,
            log,
            shape,
            chain,
            executed: 0,
        })
    }

    /// The shape being edited.
    #[must_use]
    pub fn shape(&self) -> ShapeId {
        self.shape
    }

    /// Number of commands issued so far.
    #[must_use]
    pub fn executed(&self) -> usize {
        self.executed
    }

    fn existing_corner(&self, index: usize) -> Result<Point2> {
        let corners = self.store.shape(self.shape)?.polygon.corners();
        Ok(*corners.get(index).ok_or(GeometryError::IndexOutOfRange {
            index,
            len: corners.len(),
        })?)
    }

    fn issue(&mut self, command: CornerCommand) -> Result<()> {
        let chained = self.chain || self.executed > 0;
        self.log.execute(self.store, command, chained)?;
        self.executed += 1;
        Ok(())
    }
}

impl<L: CommandLog> CornerHolder for ShapeEditor<'_, L> {
    fn corners(&self) -> &[Point2] {
        match self.store.shape(self.shape) {
            Ok(data) => data.polygon.corners(),
            Err(_) => &[],
        }
    }

    fn add_corner(&mut self, index: usize, point: Point2) -> Result<()> {
        self.issue(CornerCommand::Add {
            shape: self.shape,
            index,
            point,
        })
    }

    fn move_corner(&mut self, index: usize, point: Point2) -> Result<Point2> {
        let old = self.existing_corner(index)?;
        self.issue(CornerCommand::Move {
            shape: self.shape,
            index,
            point,
        })?;
        Ok(old)
    }

    fn remove_corner(&mut self, index: usize) -> Result<Point2> {
        let old = self.existing_corner(index)?;
        self.issue(CornerCommand::Remove {
            shape: self.shape,
            index,
        })?;
        Ok(old)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::commands::Invoker;
    use crate::geometry::Polygon;
    use crate::store::ShapeData;

    fn triangle() -> Polygon {
        Polygon::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(0.0, 4.0),
        ])
    }

    #[test]
    fn edits_go_through_the_log_as_one_group() {
        let mut store = ShapeStore::new();
        let shape = store.add_shape(ShapeData::at_origin(triangle()));
        let mut log = Invoker::new();

        {
            let mut editor = ShapeEditor::new(&mut store, &mut log, shape, false).unwrap();
            editor.add_corner(1, Point2::new(2.0, -1.0)).unwrap();
            let old = editor.move_corner(0, Point2::new(-1.0, 0.0)).unwrap();
            assert_eq!(old, Point2::new(0.0, 0.0));
            let removed = editor.remove_corner(3).unwrap();
            assert_eq!(removed, Point2::new(0.0, 4.0));
            assert_eq!(editor.corner_count(), 3);
            assert_eq!(editor.executed(), 3);
        }

        assert_eq!(log.len(), 3);
        assert_eq!(log.undo(&mut store, false).unwrap(), 3);
        assert_eq!(store.shape(shape).unwrap().polygon, triangle());
    }

    #[test]
    fn chained_editor_joins_previous_group() {
        let mut store = ShapeStore::new();
        let a = store.add_shape(ShapeData::at_origin(triangle()));
        let b = store.add_shape(ShapeData::at_origin(triangle()));
        let mut log = Invoker::new();

        ShapeEditor::new(&mut store, &mut log, a, false)
            .unwrap()
            .append_corner(Point2::new(-1.0, 2.0))
            .unwrap();
        ShapeEditor::new(&mut store, &mut log, b, true)
            .unwrap()
            .append_corner(Point2::new(-1.0, 2.0))
            .unwrap();

        assert_eq!(log.undo(&mut store, false).unwrap(), 2);
        assert_eq!(store.shape(a).unwrap().polygon, triangle());
        assert_eq!(store.shape(b).unwrap().polygon, triangle());
    }

    #[test]
    fn failed_edit_is_not_counted() {
        let mut store = ShapeStore::new();
        let shape = store.add_shape(ShapeData::at_origin(triangle()));
        let mut log = Invoker::new();
        let mut editor = ShapeEditor::new(&mut store, &mut log, shape, false).unwrap();
        assert!(editor.remove_corner(7).is_err());
        assert_eq!(editor.executed(), 0);
    }
}
