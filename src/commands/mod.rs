mod editor;
mod invoker;

pub use editor::ShapeEditor;
pub use invoker::Invoker;

use tracing::warn;

use crate::error::Result;
use crate::geometry::CornerHolder;
use crate::math::Point2;
use crate::store::{ShapeId, ShapeStore};

/// A single corner edit on one shape. Applying it yields its inverse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CornerCommand {
    /// Insert `point` at `index`.
    Add {
        shape: ShapeId,
        index: usize,
        point: Point2,
    },
    /// Move the corner at `index` to `point`.
    Move {
        shape: ShapeId,
        index: usize,
        point: Point2,
    },
    /// Remove the corner at `index`.
    Remove { shape: ShapeId, index: usize },
}

impl CornerCommand {
    /// The shape this command edits.
    #[must_use]
    pub fn shape(&self) -> ShapeId {
        match *self {
            Self::Add { shape, .. } | Self::Move { shape, .. } | Self::Remove { shape, .. } => shape,
        }
    }

    /// Applies the command to `store` and returns the command that undoes it.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape is missing or the corner index is out of range.
    pub fn apply(&self, store: &mut ShapeStore) -> Result<CornerCommand> {
        let data = store.shape_mut(self.shape())?;
        match *self {
            Self::Add { shape, index, point } => {
                data.add_corner(index, point)?;
                Ok(Self::Remove { shape, index })
            }
            Self::Move { shape, index, point } => {
                let old = data.move_corner(index, point)?;
                Ok(Self::Move {
                    shape,
                    index,
                    point: old,
                })
            }
            Self::Remove { shape, index } => {
                let point = data.remove_corner(index)?;
                Ok(Self::Add { shape, index, point })
            }
        }
    }
}

/// Ordered log of corner edits with grouped undo.
///
/// Commands executed with `chained = true` belong to the same undo group as the
/// command before them, so one gesture becomes one undo step.
pub trait CommandLog {
    /// Applies `command` to `store` and records it.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be applied; nothing is recorded then.
    fn execute(&mut self, store: &mut ShapeStore, command: CornerCommand, chained: bool) -> Result<()>;

    /// Undoes the most recent group. Returns the number of commands undone.
    ///
    /// When `add_to_redo` is `false` the undone commands are discarded instead
    /// of becoming redoable.
    ///
    /// # Errors
    ///
    /// Returns an error if an inverse command cannot be applied.
    fn undo(&mut self, store: &mut ShapeStore, add_to_redo: bool) -> Result<usize>;

    /// Drops every redoable command.
    fn clear_redo(&mut self);
}

/// Undoes the `issued` commands of an aborted edit and clears the redo stack.
///
/// The edit must have issued its first command unchained and the rest chained,
/// so a single grouped undo removes exactly those commands. Nothing is undone
/// when `issued` is 0.
///
/// # Errors
///
/// Propagates errors from [`CommandLog::undo`].
pub fn rollback<L: CommandLog + ?Sized>(store: &mut ShapeStore, log: &mut L, issued: usize) -> Result<()> {
    if issued > 0 {
        let undone = log.undo(store, false)?;
        warn!(issued, undone, "edit rolled back");
    }
    log.clear_redo();
    Ok(())
}
