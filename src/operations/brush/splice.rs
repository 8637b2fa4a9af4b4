use tracing::{debug, trace, warn};

use crate::error::Result;
use crate::geometry::CornerHolder;
use crate::math::distance_2d::point_to_segment_dist_sq;
use crate::math::{next_index, Point2};

use super::{select_arc, Arc, Crossing};

/// How far (squared) a pending crossing may be from an edge and still be
/// considered on it.
const RELOCATE_DIST_SQ: f64 = 1e-12;

/// Summary of a splice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpliceReport {
    /// Crossing pairs consumed.
    pub passes: usize,
    /// Polygon corners removed.
    pub removed: usize,
    /// Corners inserted (crossing points and brush points).
    pub inserted: usize,
    /// Pending crossings that no longer lay on the boundary and were dropped.
    pub dropped: usize,
}

/// Replaces the boundary between consecutive crossing pairs with the brush.
///
/// Brush and crossings must be in the polygon's coordinate frame, with the
/// crossings ordered along the brush.
pub struct SpliceBrush<'a> {
    brush: &'a [Point2],
    crossings: Vec<Crossing>,
}

impl<'a> SpliceBrush<'a> {
    /// Creates a new `SpliceBrush` operation.
    #[must_use]
    pub fn new(brush: &'a [Point2], crossings: Vec<Crossing>) -> Self {
        Self { brush, crossings }
    }

    /// Executes the splice on `holder`.
    ///
    /// Each pass takes the first two pending crossings, discards the shorter
    /// boundary arc between them, inserts the crossing points with the brush
    /// points in between, and relocates the remaining crossings onto the new
    /// boundary. Runs until fewer than two crossings are pending.
    ///
    /// # Errors
    ///
    /// Propagates errors from the holder's corner edits.
    pub fn execute<H: CornerHolder + ?Sized>(&self, holder: &mut H) -> Result<SpliceReport> {
        let mut report = SpliceReport::default();
        let mut pending = self.crossings.clone();

        while pending.len() >= 2 {
            let first = pending.remove(0);
            let second = pending.remove(0);
            self.splice_pair(holder, first, second, &mut report)?;
            report.passes += 1;

            let corners = holder.corners();
            pending.retain_mut(|crossing| match locate_edge(corners, &crossing.point) {
                Some(edge) => {
                    trace!(from = crossing.polygon_edge, to = edge, "relocated crossing");
                    crossing.polygon_edge = edge;
                    true
                }
                None => {
                    warn!(x = crossing.point.x, y = crossing.point.y, "crossing left the boundary, dropped");
                    report.dropped += 1;
                    false
                }
            });
        }

        Ok(report)
    }

    fn splice_pair<H: CornerHolder + ?Sized>(
        &self,
        holder: &mut H,
        first: Crossing,
        second: Crossing,
        report: &mut SpliceReport,
    ) -> Result<()> {
        let corners = holder.corners();
        let n = corners.len();
        let (mut low, mut high) = order_pair(corners, first, second);
        let arc = select_arc(corners, &low, &high);
        debug!(
            ?arc,
            low = low.polygon_edge,
            high = high.polygon_edge,
            brush_from = low.brush_edge,
            brush_to = high.brush_edge,
            "splicing brush",
        );

        let add_index = match arc {
            Arc::Between => {
                let add_index = low.polygon_edge + 1;
                for _ in low.polygon_edge..high.polygon_edge {
                    holder.remove_corner(add_index)?;
                    report.removed += 1;
                }
                add_index
            }
            Arc::Wrapped => {
                for _ in high.polygon_edge + 1..n {
                    holder.remove_corner(holder.corner_count() - 1)?;
                    report.removed += 1;
                }
                for _ in 0..=low.polygon_edge {
                    holder.remove_corner(0)?;
                    report.removed += 1;
                }
                std::mem::swap(&mut low, &mut high);
                holder.corner_count()
            }
        };

        for (offset, point) in self.replacement_run(&low, &high).into_iter().enumerate() {
            holder.add_corner(add_index + offset, point)?;
            report.inserted += 1;
        }
        Ok(())
    }

    /// `low.point`, the brush points between the two crossings in the
    /// direction from `low` to `high`, then `high.point`.
    fn replacement_run(&self, low: &Crossing, high: &Crossing) -> Vec<Point2> {
        let (lb, hb) = (low.brush_edge, high.brush_edge);
        let mut run = Vec::with_capacity(lb.abs_diff(hb) + 2);
        run.push(low.point);
        if hb < lb {
            run.extend(self.brush.get(hb + 1..=lb).unwrap_or(&[]).iter().rev());
        } else {
            run.extend(self.brush.get(lb + 1..=hb).unwrap_or(&[]));
        }
        run.push(high.point);
        run
    }
}

/// Orders a pair by polygon edge; on a shared edge the crossing nearer the
/// edge start comes first.
fn order_pair(corners: &[Point2], a: Crossing, b: Crossing) -> (Crossing, Crossing) {
    if a.polygon_edge == b.polygon_edge {
        let Some(start) = corners.get(a.polygon_edge) else {
            return (a, b);
        };
        if (a.point - start).norm_squared() <= (b.point - start).norm_squared() {
            (a, b)
        } else {
            (b, a)
        }
    } else if a.polygon_edge < b.polygon_edge {
        (a, b)
    } else {
        (b, a)
    }
}

/// Edge of the closed boundary `corners` that `point` lies on. Closest edge
/// wins, lowest index on ties.
fn locate_edge(corners: &[Point2], point: &Point2) -> Option<usize> {
    let n = corners.len();
    let mut best: Option<(usize, f64)> = None;
    for i in 0..n {
        let dist_sq = point_to_segment_dist_sq(point, &corners[i], &corners[next_index(i, n)]);
        if dist_sq <= RELOCATE_DIST_SQ && best.is_none_or(|(_, d)| dist_sq < d) {
            best = Some((i, dist_sq));
        }
    }
    best.map(|(i, _)| i)
}
