use std::collections::{HashMap, HashSet};

use spade::handles::{FixedFaceHandle, InnerTag};
use spade::{ConstrainedDelaunayTriangulation, InsertionError, Point2 as SpadePoint2, Triangulation};

use crate::error::{GeometryError, OperationError, Result};
use crate::math::Point2;

use super::TriangleMesh;

type Cdt = ConstrainedDelaunayTriangulation<SpadePoint2<f64>>;

/// Triangulates the interior of a simple polygon with a constrained Delaunay
/// triangulation.
pub struct TriangulatePolygon<'a> {
    corners: &'a [Point2],
}

impl<'a> TriangulatePolygon<'a> {
    /// Creates a new `TriangulatePolygon` operation.
    #[must_use]
    pub fn new(corners: &'a [Point2]) -> Self {
        Self { corners }
    }

    /// Executes the triangulation.
    ///
    /// Triangle indices refer to `corners`. Coincident corners share the index
    /// of the first one.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] if there are fewer than 3 corners
    /// or two boundary edges cross, and [`OperationError::Failed`] if a corner
    /// cannot be inserted (non-finite coordinates).
    pub fn execute(&self) -> Result<TriangleMesh> {
        let mut cdt = Cdt::new();
        let corner_of_vertex = insert_constraint_loop(&mut cdt, self.corners)?;
        let interior = interior_faces(&cdt);

        let mut mesh = TriangleMesh {
            vertices: self.corners.to_vec(),
            indices: Vec::new(),
        };
        for face in cdt.inner_faces() {
            if !interior.contains(&face.fix().index()) {
                continue;
            }
            let mut triangle = [0usize; 3];
            for (slot, vertex) in triangle.iter_mut().zip(face.vertices()) {
                // Every CDT vertex came from a corner.
                *slot = corner_of_vertex
                    .get(&vertex.fix().index())
                    .copied()
                    .ok_or_else(|| OperationError::Failed("triangulation vertex without corner".into()))?;
            }
            mesh.indices.push(triangle);
        }
        Ok(mesh)
    }
}

/// Inserts the corners and constrains every boundary edge.
///
/// Returns the corner index for each CDT vertex index.
fn insert_constraint_loop(cdt: &mut Cdt, corners: &[Point2]) -> Result<HashMap<usize, usize>> {
    if corners.len() < 3 {
        return Err(GeometryError::Degenerate("constraint loop needs at least 3 points".into()).into());
    }

    let mut handles = Vec::with_capacity(corners.len());
    let mut corner_of_vertex = HashMap::with_capacity(corners.len());
    for (index, corner) in corners.iter().enumerate() {
        let h = cdt
            .insert(SpadePoint2::new(corner.x, corner.y))
            .map_err(|e: InsertionError| OperationError::Failed(format!("CDT insert: {e}")))?;
        corner_of_vertex.entry(h.index()).or_insert(index);
        handles.push(h);
    }

    for i in 0..handles.len() {
        let from = handles[i];
        let to = handles[(i + 1) % handles.len()];
        if from == to {
            continue;
        }
        if !cdt.can_add_constraint(from, to) {
            return Err(GeometryError::Degenerate(format!("boundary edge {i} crosses another edge")).into());
        }
        cdt.add_constraint(from, to);
    }

    Ok(corner_of_vertex)
}

/// Inner CDT faces that lie inside the boundary loop.
///
/// The loop is simple, so the region outside it is connected: every outside
/// face is reachable from the hull without stepping over a boundary edge.
/// The faces that fill cannot reach are the polygon.
fn interior_faces(cdt: &Cdt) -> HashSet<usize> {
    let outer = cdt.outer_face().fix();
    let mut outside = HashSet::new();
    let mut pending: Vec<FixedFaceHandle<InnerTag>> = Vec::new();

    for edge in cdt.directed_edges() {
        if edge.face().fix() != outer || cdt.is_constraint_edge(edge.as_undirected().fix()) {
            continue;
        }
        if let Some(face) = edge.rev().face().as_inner() {
            if outside.insert(face.fix().index()) {
                pending.push(face.fix());
            }
        }
    }

    while let Some(face) = pending.pop() {
        for edge in cdt.face(face).adjacent_edges() {
            if cdt.is_constraint_edge(edge.as_undirected().fix()) {
                continue;
            }
            let Some(neighbor) = edge.rev().face().as_inner() else {
                continue;
            };
            if outside.insert(neighbor.fix().index()) {
                pending.push(neighbor.fix());
            }
        }
    }

    cdt.inner_faces()
        .map(|face| face.fix().index())
        .filter(|index| !outside.contains(index))
        .collect()
}
