//! JSON scene description.

pub mod events;
pub mod model;
