//! Drifting 3D point cloud projected onto the canvas.

pub mod field;
pub mod renderer;
