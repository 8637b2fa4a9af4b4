mod add_move;
mod draw_append;
mod remove;

pub use add_move::AddMoveCorner;
pub use draw_append::{DrawAppend, DrawReport};
pub use remove::RemoveCorner;

use tracing::warn;

use crate::commands::{rollback, CommandLog};
use crate::error::{OperationError, RepairError, Result, ShapeBrushError};
use crate::geometry::CornerHolder;
use crate::math::Point2;
use crate::store::{ShapeId, ShapeStore};
use crate::tessellation::{FixtureValidator, Validation};

fn ensure_finite(point: &Point2) -> Result<()> {
    if point.x.is_finite() && point.y.is_finite() {
        Ok(())
    } else {
        Err(OperationError::InvalidInput(format!("pointer position ({}, {}) is not finite", point.x, point.y)).into())
    }
}

/// Validates `shape` after an edit of `issued` commands and rolls the edit
/// back if the validator rejects it.
fn accept_or_rollback<L, V>(
    store: &mut ShapeStore,
    log: &mut L,
    shape: ShapeId,
    issued: usize,
    validator: &V,
) -> Result<()>
where
    L: CommandLog,
    V: FixtureValidator + ?Sized,
{
    let verdict = validator.validate(store.shape(shape)?.corners());
    let rejection: ShapeBrushError = match verdict {
        Ok(Validation::Valid) => return Ok(()),
        Ok(Validation::Complex) => RepairError::Complex.into(),
        Ok(Validation::AreaTooSmall(_)) => RepairError::AreaTooSmall.into(),
        Err(e) => e,
    };
    warn!(error = %rejection, "corner edit rejected");
    rollback(store, log, issued)?;
    Err(rejection)
}
