mod brush;
mod polygon;

pub use brush::{BrushStroke, EditMode};
pub use polygon::Polygon;

use crate::error::Result;
use crate::math::Point2;

/// Anything that owns an ordered list of corners that can be edited one at a time.
///
/// The brush engine, the simplifier and the repair loop only ever talk to this
/// trait, so the same code edits a bare [`Polygon`], a shape in the store, or a
/// shape routed through the command log.
pub trait CornerHolder {
    /// Current corners in order.
    fn corners(&self) -> &[Point2];

    /// Inserts `point` so that it ends up at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index > corner_count()`.
    fn add_corner(&mut self, index: usize, point: Point2) -> Result<()>;

    /// Moves the corner at `index` to `point`, returning the previous position.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range.
    fn move_corner(&mut self, index: usize, point: Point2) -> Result<Point2>;

    /// Removes the corner at `index`, returning its position.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range.
    fn remove_corner(&mut self, index: usize) -> Result<Point2>;

    /// Number of corners.
    fn corner_count(&self) -> usize {
        self.corners().len()
    }

    /// The corner at `index`, if any.
    fn corner(&self, index: usize) -> Option<Point2> {
        self.corners().get(index).copied()
    }

    /// Appends a corner after the last one.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`CornerHolder::add_corner`].
    fn append_corner(&mut self, point: Point2) -> Result<()> {
        let index = self.corner_count();
        self.add_corner(index, point)
    }
}
