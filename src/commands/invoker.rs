use tracing::trace;

use crate::error::Result;
use crate::store::ShapeStore;

use super::{CommandLog, CornerCommand};

#[derive(Debug, Clone, Copy)]
struct Record {
    command: CornerCommand,
    inverse: CornerCommand,
    chained: bool,
}

/// In-memory [`CommandLog`] with undo and redo stacks.
#[derive(Debug, Default)]
pub struct Invoker {
    done: Vec<Record>,
    undone: Vec<Record>,
}

impl Invoker {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if there is something to undo.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.done.is_empty()
    }

    /// Returns `true` if there is something to redo.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    /// Number of recorded commands on the undo stack.
    #[must_use]
    pub fn len(&self) -> usize {
        self.done.len()
    }

    /// Returns `true` if the undo stack is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.done.is_empty()
    }

    /// Re-applies the most recently undone group. Returns the number of commands redone.
    ///
    /// # Errors
    ///
    /// Returns an error if a command cannot be re-applied.
    pub fn redo(&mut self, store: &mut ShapeStore) -> Result<usize> {
        let mut count = 0;
        while let Some(record) = self.undone.pop() {
            let inverse = record.command.apply(store)?;
            self.done.push(Record { inverse, ..record });
            count += 1;
            if !self.undone.last().is_some_and(|next| next.chained) {
                break;
            }
        }
        trace!(count, "redo");
        Ok(count)
    }
}

impl CommandLog for Invoker {
    fn execute(&mut self, store: &mut ShapeStore, command: CornerCommand, chained: bool) -> Result<()> {
        let inverse = command.apply(store)?;
        self.done.push(Record {
            command,
            inverse,
            chained,
        });
        self.undone.clear();
        Ok(())
    }

    fn undo(&mut self, store: &mut ShapeStore, add_to_redo: bool) -> Result<usize> {
        let mut count = 0;
        while let Some(record) = self.done.pop() {
            record.inverse.apply(store)?;
            if add_to_redo {
                self.undone.push(record);
            }
            count += 1;
            if !record.chained {
                break;
            }
        }
        trace!(count, add_to_redo, "undo");
        Ok(count)
    }

    fn clear_redo(&mut self) {
        self.undone.clear();
    }
}
