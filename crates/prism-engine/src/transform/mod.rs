//! Model-view-projection solving.
//!
//! Everything here is a pure function of its inputs: no GPU access, no hidden
//! state. Matrices are `glam::Mat4` (column-major) and are uploaded as-is.

mod solver;

pub use solver::{fit_center_inside, ortho_bounds, solve, FitPolicy, FitRect, OrthoBounds};

/// Column-major 4x4 matrix used for every transform uniform.
pub type Mat4 = glam::Mat4;
