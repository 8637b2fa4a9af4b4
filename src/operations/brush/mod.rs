mod arc;
mod gesture;
mod intersections;
mod splice;

pub use arc::{select_arc, Arc, ArcLengths};
pub use gesture::{BrushGesture, GestureReport, ShapeEdit};
pub use intersections::{find_crossings, BrushIntersection, Crossing, FindBrushIntersections};
pub use splice::{SpliceBrush, SpliceReport};
