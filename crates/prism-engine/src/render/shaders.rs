//! Built-in WGSL sources.
//!
//! Symbol names are shared across programs so the draw routine can look them
//! up uniformly: `position`, `tex_coord`, `u_mvp`, `u_tex_matrix`, `u_color`,
//! `t_image`, `s_image`.

pub const SOLID_VS: &str = include_str!("shaders/solid.vert.wgsl");
pub const SOLID_FS: &str = include_str!("shaders/solid.frag.wgsl");
pub const TEXTURED_VS: &str = include_str!("shaders/textured.vert.wgsl");
pub const TEXTURED_FS: &str = include_str!("shaders/textured.frag.wgsl");
pub const CAMERA_VS: &str = include_str!("shaders/camera.vert.wgsl");
