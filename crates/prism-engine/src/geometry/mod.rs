//! Immutable vertex data for the built-in shape families.
//!
//! Convention:
//! - clip-space origin at the center, +Y up
//! - texture-space rows follow the decoded image: the first uploaded row is
//!   sampled at `v = 0`, so image quads invert `v` relative to vertex `y`

mod buffer;
mod shapes;

pub use buffer::{GeometryBuffer, GeometryError, Topology};
pub use shapes::{camera_quad, circle, image_quad, square, tex_coord_for, triangle};
