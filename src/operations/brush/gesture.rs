use tracing::{debug, warn};

use crate::commands::{rollback, CommandLog, ShapeEditor};
use crate::error::Result;
use crate::geometry::{BrushStroke, CornerHolder, EditMode};
use crate::math::intersect_2d::segments_intersect;
use crate::math::polygon_2d::find_self_intersection;
use crate::math::Point2;
use crate::operations::repair::{RepairLoop, RepairReport};
use crate::operations::simplify::Simplify;
use crate::operations::BrushParams;
use crate::store::{ShapeId, ShapeStore};
use crate::tessellation::FixtureValidator;

use super::{BrushIntersection, Crossing, FindBrushIntersections, SpliceBrush, SpliceReport};

/// What one gesture did to one shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeEdit {
    /// The edited shape.
    pub shape: ShapeId,
    /// Splice summary.
    pub splice: SpliceReport,
    /// Corners removed by the simplifier.
    pub simplified: usize,
    /// Repair loop summary.
    pub repair: RepairReport,
}

/// Outcome of a committed brush gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GestureReport {
    /// Mode the gesture ran in.
    pub mode: EditMode,
    /// `true` if the stroke crossed itself and nothing was edited.
    pub skipped: bool,
    /// Shapes that had at least one crossing pair.
    pub edits: Vec<ShapeEdit>,
    /// Commands issued to the log; they undo as one group.
    pub commands: usize,
}

/// One pointer-down to pointer-up brush stroke.
///
/// Start it with [`BrushGesture::begin`], feed pointer moves to
/// [`BrushGesture::drag`] and commit with [`BrushGesture::finish`].
#[derive(Debug, Clone)]
pub struct BrushGesture {
    mode: EditMode,
    hit: Option<ShapeId>,
    stroke: BrushStroke,
    params: BrushParams,
}

impl BrushGesture {
    /// Starts a gesture at the world point `start`.
    ///
    /// Starting inside one of the `selection` shapes makes this an
    /// [`EditMode::Add`] gesture on that shape; otherwise it is an
    /// [`EditMode::Erase`] gesture on the whole selection.
    #[must_use]
    pub fn begin(start: Point2, store: &ShapeStore, selection: &[ShapeId], params: BrushParams) -> Self {
        let hit = store.shape_at(&start, selection);
        let mode = if hit.is_some() { EditMode::Add } else { EditMode::Erase };
        debug!(?mode, x = start.x, y = start.y, "brush gesture started");
        Self {
            mode,
            hit,
            stroke: BrushStroke::new(start, params.sample_dist_min_sq),
            params,
        }
    }

    /// The gesture's mode.
    #[must_use]
    pub fn mode(&self) -> EditMode {
        self.mode
    }

    /// The stroke sampled so far.
    #[must_use]
    pub fn stroke(&self) -> &BrushStroke {
        &self.stroke
    }

    /// Samples a pointer move. Returns `true` if the point was kept.
    pub fn drag(&mut self, point: Point2) -> bool {
        self.stroke.extend(point)
    }

    /// Commits the gesture at the release point `end`.
    ///
    /// The stroke is simplified and, unless it crosses itself, spliced into
    /// every target shape it crosses at least twice. Each edited shape is then
    /// simplified and repaired. All edits go through `log` as one undo group;
    /// on failure they are undone and the redo stack is cleared.
    ///
    /// # Errors
    ///
    /// - Precondition errors for a stroke with fewer than 2 points or a target
    ///   with fewer than 3 corners that the stroke runs across (nothing is
    ///   edited).
    /// - [`crate::error::RepairError`] if a shape cannot be repaired (everything
    ///   is rolled back).
    /// - Store and command errors.
    pub fn finish<L, V>(
        mut self,
        end: Point2,
        store: &mut ShapeStore,
        selection: &[ShapeId],
        log: &mut L,
        validator: &V,
    ) -> Result<GestureReport>
    where
        L: CommandLog,
        V: FixtureValidator + ?Sized,
    {
        self.stroke.finish(end);
        self.stroke.ensure_usable()?;
        let simplify = Simplify::new(self.params.simplify());
        simplify.apply_open(&mut self.stroke)?;

        let mut report = GestureReport {
            mode: self.mode,
            skipped: false,
            edits: Vec::new(),
            commands: 0,
        };

        if !find_self_intersection(self.stroke.points()).is_simple_polyline() {
            warn!(points = self.stroke.len(), "brush stroke crosses itself, edit skipped");
            report.skipped = true;
            return Ok(report);
        }

        let targets: Vec<ShapeId> = match (self.mode, self.hit) {
            (EditMode::Add, Some(hit)) => vec![hit],
            _ => selection.to_vec(),
        };
        let intersections = FindBrushIntersections::new(&self.stroke, &targets).execute(store)?;

        let mut crossed = Vec::with_capacity(targets.len());
        for &shape in &targets {
            let data = store.shape(shape)?;
            if let Err(e) = data.polygon.ensure_usable() {
                if stroke_hits(&data.world_corners(), self.stroke.points()) {
                    return Err(e);
                }
                continue;
            }
            if intersections.iter().filter(|i| i.shape == shape).count() >= 2 {
                crossed.push(shape);
            }
        }
        debug!(
            mode = ?self.mode,
            points = self.stroke.len(),
            targets = targets.len(),
            crossed = crossed.len(),
            crossings = intersections.len(),
            "committing brush gesture",
        );

        let mut issued = 0;
        let outcome = self.edit_targets(&crossed, &intersections, &simplify, store, log, validator, &mut issued);
        match outcome {
            Ok(edits) => {
                report.edits = edits;
                report.commands = issued;
                Ok(report)
            }
            Err(e) => {
                warn!(error = %e, issued, "brush gesture failed");
                rollback(store, log, issued)?;
                Err(e)
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn edit_targets<L, V>(
        &self,
        targets: &[ShapeId],
        intersections: &[BrushIntersection],
        simplify: &Simplify,
        store: &mut ShapeStore,
        log: &mut L,
        validator: &V,
        issued: &mut usize,
    ) -> Result<Vec<ShapeEdit>>
    where
        L: CommandLog,
        V: FixtureValidator + ?Sized,
    {
        let mut edits = Vec::new();
        for &shape in targets {
            let offset = -store.shape(shape)?.position;
            let crossings: Vec<Crossing> = intersections
                .iter()
                .filter(|i| i.shape == shape)
                .map(|i| i.crossing.translated(&offset))
                .collect();
            if crossings.len() < 2 {
                continue;
            }
            let brush = self.stroke.translated(&offset);

            let mut editor = ShapeEditor::new(store, log, shape, *issued > 0)?;
            let result = edit_shape(&mut editor, &brush, crossings, simplify, validator);
            *issued += editor.executed();
            let (splice, simplified, repair) = result?;
            debug!(
                passes = splice.passes,
                removed = splice.removed,
                inserted = splice.inserted,
                simplified,
                repaired = repair.removed.len(),
                "shape edited",
            );
            edits.push(ShapeEdit {
                shape,
                splice,
                simplified,
                repair,
            });
        }
        Ok(edits)
    }
}

/// Whether `stroke` runs across any segment of the open chain `corners`.
fn stroke_hits(corners: &[Point2], stroke: &[Point2]) -> bool {
    corners.windows(2).any(|c| {
        stroke
            .windows(2)
            .any(|b| segments_intersect(&c[0], &c[1], &b[0], &b[1]))
    })
}

fn edit_shape<H, V>(
    holder: &mut H,
    brush: &BrushStroke,
    crossings: Vec<Crossing>,
    simplify: &Simplify,
    validator: &V,
) -> Result<(SpliceReport, usize, RepairReport)>
where
    H: CornerHolder + ?Sized,
    V: FixtureValidator + ?Sized,
{
    let splice = SpliceBrush::new(brush.points(), crossings).execute(holder)?;
    let simplified = simplify.apply_closed(holder)?;
    let repair = RepairLoop::new(validator).execute(holder)?;
    Ok((splice, simplified, repair))
}
