use tracing::{debug, warn};

use crate::commands::{rollback, CommandLog, ShapeEditor};
use crate::error::Result;
use crate::geometry::CornerHolder;
use crate::math::{points_equal, Point2};
use crate::operations::simplify::Simplify;
use crate::operations::BrushParams;
use crate::store::{ShapeId, ShapeStore};
use crate::tessellation::FixtureValidator;

use super::{accept_or_rollback, ensure_finite};

/// Outcome of a committed draw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawReport {
    /// Corners appended while drawing, the release point included.
    pub appended: usize,
    /// Corners removed by the simplifier on release.
    pub simplified: usize,
}

/// Appends sampled pointer positions to the end of a shape's boundary.
///
/// Corners are appended live while dragging; all of them, plus the
/// simplification on release, form one undo step.
pub struct DrawAppend {
    shape: ShapeId,
    sample_dist_min_sq: f64,
    simplify: Simplify,
    report: DrawReport,
    issued: usize,
}

impl DrawAppend {
    /// Starts drawing onto `shape`.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape is not in the store.
    pub fn begin(shape: ShapeId, store: &ShapeStore, params: &BrushParams) -> Result<Self> {
        store.shape(shape)?;
        Ok(Self {
            shape,
            sample_dist_min_sq: params.sample_dist_min_sq,
            simplify: Simplify::new(params.simplify()),
            report: DrawReport::default(),
            issued: 0,
        })
    }

    /// Commands issued so far.
    #[must_use]
    pub fn issued(&self) -> usize {
        self.issued
    }

    /// Samples a pointer move, appending it as a corner when it is far enough
    /// from the current last corner. Returns `true` if a corner was appended.
    ///
    /// # Errors
    ///
    /// Input, store and command errors.
    pub fn drag<L: CommandLog>(&mut self, point: Point2, store: &mut ShapeStore, log: &mut L) -> Result<bool> {
        ensure_finite(&point)?;
        let data = store.shape(self.shape)?;
        let local = data.to_local(&point);
        if let Some(last) = data.corners().last() {
            if (local - last).norm_squared() <= self.sample_dist_min_sq {
                return Ok(false);
            }
        }
        self.append(local, store, log)?;
        Ok(true)
    }

    /// Commits the draw at the world point `end`.
    ///
    /// The release point is appended and the boundary simplified. Once the
    /// shape has at least 3 corners the validator must accept it.
    ///
    /// # Errors
    ///
    /// - [`crate::error::RepairError`] if the validator rejects the result.
    /// - Input, store and command errors.
    ///
    /// Every corner of the draw is undone before an error is returned.
    pub fn finish<L, V>(
        mut self,
        end: Point2,
        store: &mut ShapeStore,
        log: &mut L,
        validator: &V,
    ) -> Result<DrawReport>
    where
        L: CommandLog,
        V: FixtureValidator + ?Sized,
    {
        if let Err(e) = self.close(end, store, log) {
            warn!(error = %e, "draw failed");
            rollback(store, log, self.issued)?;
            return Err(e);
        }

        if store.shape(self.shape)?.corner_count() >= 3 {
            accept_or_rollback(store, log, self.shape, self.issued, validator)?;
        }
        debug!(
            appended = self.report.appended,
            simplified = self.report.simplified,
            "draw committed",
        );
        Ok(self.report)
    }

    fn close<L: CommandLog>(&mut self, end: Point2, store: &mut ShapeStore, log: &mut L) -> Result<()> {
        ensure_finite(&end)?;
        let data = store.shape(self.shape)?;
        let local = data.to_local(&end);
        if !data.corners().last().is_some_and(|last| points_equal(last, &local)) {
            self.append(local, store, log)?;
        }

        let mut editor = ShapeEditor::new(store, log, self.shape, self.issued > 0)?;
        let simplified = self.simplify.apply_closed(&mut editor);
        self.issued += editor.executed();
        self.report.simplified = simplified?;
        Ok(())
    }

    fn append<L: CommandLog>(&mut self, local: Point2, store: &mut ShapeStore, log: &mut L) -> Result<()> {
        let mut editor = ShapeEditor::new(store, log, self.shape, self.issued > 0)?;
        editor.append_corner(local)?;
        self.issued += editor.executed();
        self.report.appended += 1;
        Ok(())
    }
}
