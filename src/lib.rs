pub mod commands;
pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod store;
pub mod tessellation;

pub use error::{Result, ShapeBrushError};
