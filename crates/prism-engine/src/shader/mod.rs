//! Shader compilation, linking and reflection.
//!
//! Shaders are WGSL. Each stage is parsed and validated on the CPU with naga,
//! the same front end wgpu uses, so every compile or link failure surfaces
//! before any GPU object exists. The linked [`ShaderProgram`] carries the
//! reflected attribute and uniform tables that GL-style callers look up by name.

mod error;
mod program;

pub use error::ShaderError;
pub use program::{
    Attribute, CompiledStage, ShaderProgram, StageMask, Uniform, UniformKind, FRAGMENT_ENTRY,
    VERTEX_ENTRY,
};

use std::fmt;

/// Programmable pipeline stage.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Stage {
    Vertex,
    Fragment,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Vertex => f.write_str("vertex"),
            Stage::Fragment => f.write_str("fragment"),
        }
    }
}
