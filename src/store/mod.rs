mod shape;

pub use shape::{ShapeData, ShapeId};

use slotmap::SlotMap;

use crate::error::{Result, StoreError};
use crate::geometry::CornerHolder;
use crate::math::distance_2d::point_to_segment_dist_sq;
use crate::math::{next_index, Point2};

/// Central arena that owns every editable shape.
///
/// Shapes are addressed by generational [`ShapeId`]s, so commands and
/// intersections can refer to a shape without borrowing it.
#[derive(Debug, Default)]
pub struct ShapeStore {
    shapes: SlotMap<ShapeId, ShapeData>,
}

impl ShapeStore {
    /// Creates a new, empty shape store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a shape and returns its ID.
    pub fn add_shape(&mut self, data: ShapeData) -> ShapeId {
        self.shapes.insert(data)
    }

    /// Returns a reference to the shape data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShapeNotFound`] if the shape is not in the store.
    pub fn shape(&self, id: ShapeId) -> Result<&ShapeData> {
        Ok(self.shapes.get(id).ok_or(StoreError::ShapeNotFound)?)
    }

    /// Returns a mutable reference to the shape data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShapeNotFound`] if the shape is not in the store.
    pub fn shape_mut(&mut self, id: ShapeId) -> Result<&mut ShapeData> {
        Ok(self.shapes.get_mut(id).ok_or(StoreError::ShapeNotFound)?)
    }

    /// Removes a shape, returning its data.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShapeNotFound`] if the shape is not in the store.
    pub fn remove_shape(&mut self, id: ShapeId) -> Result<ShapeData> {
        Ok(self.shapes.remove(id).ok_or(StoreError::ShapeNotFound)?)
    }

    /// Returns `true` if `id` refers to a live shape.
    #[must_use]
    pub fn contains(&self, id: ShapeId) -> bool {
        self.shapes.contains_key(id)
    }

    /// Iterates over all shape IDs.
    pub fn ids(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.shapes.keys()
    }

    /// Number of shapes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Returns `true` if the store holds no shapes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    // --- Picking ---

    /// First shape among `candidates` whose boundary contains the world `point`.
    #[must_use]
    pub fn shape_at(&self, point: &Point2, candidates: &[ShapeId]) -> Option<ShapeId> {
        candidates.iter().copied().find(|&id| {
            self.shapes
                .get(id)
                .is_some_and(|shape| shape.polygon.contains(&shape.to_local(point)))
        })
    }

    /// Nearest corner among `candidates` within `radius_sq` (squared) of the
    /// world `point`, as `(shape, corner index)`.
    #[must_use]
    pub fn corner_at(
        &self,
        point: &Point2,
        candidates: &[ShapeId],
        radius_sq: f64,
    ) -> Option<(ShapeId, usize)> {
        let mut best: Option<(ShapeId, usize, f64)> = None;
        for &id in candidates {
            let Some(shape) = self.shapes.get(id) else {
                continue;
            };
            let local = shape.to_local(point);
            for (index, corner) in shape.polygon.corners().iter().enumerate() {
                let dist_sq = (corner - local).norm_squared();
                if dist_sq <= radius_sq && best.is_none_or(|(_, _, d)| dist_sq < d) {
                    best = Some((id, index, dist_sq));
                }
            }
        }
        best.map(|(id, index, _)| (id, index))
    }

    /// Nearest boundary edge among `candidates` within `radius_sq` (squared)
    /// of the world `point`, as `(shape, edge index)`. Edge `i` starts at
    /// corner `i`.
    #[must_use]
    pub fn edge_at(
        &self,
        point: &Point2,
        candidates: &[ShapeId],
        radius_sq: f64,
    ) -> Option<(ShapeId, usize)> {
        let mut best: Option<(ShapeId, usize, f64)> = None;
        for &id in candidates {
            let Some(shape) = self.shapes.get(id) else {
                continue;
            };
            let local = shape.to_local(point);
            let corners = shape.polygon.corners();
            let n = corners.len();
            if n < 2 {
                continue;
            }
            for (index, start) in corners.iter().enumerate() {
                let dist_sq = point_to_segment_dist_sq(&local, start, &corners[next_index(index, n)]);
                if dist_sq <= radius_sq && best.is_none_or(|(_, _, d)| dist_sq < d) {
                    best = Some((id, index, dist_sq));
                }
            }
        }
        best.map(|(id, index, _)| (id, index))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ShapeBrushError;
    use crate::geometry::Polygon;
    use crate::math::Vector2;

    fn unit_square() -> Polygon {
        Polygon::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ])
    }

    #[test]
    fn add_get_remove() {
        let mut store = ShapeStore::new();
        let id = store.add_shape(ShapeData::at_origin(unit_square()));
        assert_eq!(store.len(), 1);
        assert!(store.contains(id));
        assert_eq!(store.shape(id).unwrap().polygon.len(), 4);

        store.remove_shape(id).unwrap();
        assert!(store.is_empty());
        assert!(matches!(
            store.shape(id),
            Err(ShapeBrushError::Store(StoreError::ShapeNotFound))
        ));
    }

    #[test]
    fn shape_at_uses_world_coordinates() {
        let mut store = ShapeStore::new();
        let a = store.add_shape(ShapeData::at_origin(unit_square()));
        let b = store.add_shape(ShapeData::new(unit_square(), Vector2::new(3.0, 0.0)));
        let both = [a, b];

        assert_eq!(store.shape_at(&Point2::new(0.5, 0.5), &both), Some(a));
        assert_eq!(store.shape_at(&Point2::new(3.5, 0.5), &both), Some(b));
        assert_eq!(store.shape_at(&Point2::new(2.0, 0.5), &both), None);
        // Only candidates are considered.
        assert_eq!(store.shape_at(&Point2::new(3.5, 0.5), &[a]), None);
    }

    #[test]
    fn corner_at_picks_nearest_within_radius() {
        let mut store = ShapeStore::new();
        let a = store.add_shape(ShapeData::at_origin(unit_square()));
        let b = store.add_shape(ShapeData::new(unit_square(), Vector2::new(1.2, 0.0)));
        let both = [a, b];

        assert_eq!(store.corner_at(&Point2::new(1.05, 0.0), &both, 0.04), Some((a, 1)));
        assert_eq!(store.corner_at(&Point2::new(1.15, 0.0), &both, 0.04), Some((b, 0)));
        assert_eq!(store.corner_at(&Point2::new(0.5, 0.5), &both, 0.04), None);
    }

    #[test]
    fn edge_at_picks_nearest_edge() {
        let mut store = ShapeStore::new();
        let a = store.add_shape(ShapeData::new(unit_square(), Vector2::new(2.0, 0.0)));

        assert_eq!(store.edge_at(&Point2::new(2.5, -0.1), &[a], 0.04), Some((a, 0)));
        assert_eq!(store.edge_at(&Point2::new(2.5, 1.05), &[a], 0.04), Some((a, 2)));
        // The closing edge runs from the last corner back to the first.
        assert_eq!(store.edge_at(&Point2::new(1.9, 0.5), &[a], 0.04), Some((a, 3)));
        assert_eq!(store.edge_at(&Point2::new(2.5, 0.5), &[a], 0.04), None);
    }
}
