//! Spring-damped line mesh displaced by coherent noise and pointer motion.

pub mod field;
/// Seeded 2D gradient noise.
pub mod noise;
pub mod renderer;
