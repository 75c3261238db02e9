use std::sync::Arc;

/// Primitive assembly mode.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Topology {
    TriangleList,
    TriangleStrip,
}

/// Rejected vertex layouts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    #[error("components per vertex must be 2..=4, got {0}")]
    Components(u32),
    #[error("{len} floats do not divide into vertices of {components}")]
    Ragged { len: usize, components: u32 },
    #[error("expected {expected} texture coordinates, got {actual}")]
    TexCoordCount { expected: usize, actual: usize },
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u16, vertex_count: u32 },
}

/// Vertex positions plus optional texture coordinates and indices.
///
/// Immutable after construction; clones share storage.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryBuffer {
    positions: Arc<[f32]>,
    components: u32,
    tex_coords: Option<Arc<[f32]>>,
    indices: Option<Arc<[u16]>>,
    topology: Topology,
}

impl GeometryBuffer {
    /// Validates and wraps a vertex list.
    pub fn new(
        positions: Vec<f32>,
        components: u32,
        tex_coords: Option<Vec<f32>>,
        indices: Option<Vec<u16>>,
        topology: Topology,
    ) -> Result<Self, GeometryError> {
        if !(2..=4).contains(&components) {
            return Err(GeometryError::Components(components));
        }
        if positions.len() % components as usize != 0 {
            return Err(GeometryError::Ragged {
                len: positions.len(),
                components,
            });
        }

        let vertex_count = positions.len() / components as usize;

        if let Some(tc) = &tex_coords {
            if tc.len() != vertex_count * 2 {
                return Err(GeometryError::TexCoordCount {
                    expected: vertex_count * 2,
                    actual: tc.len(),
                });
            }
        }

        if let Some(index) = indices
            .iter()
            .flatten()
            .copied()
            .find(|&i| i as usize >= vertex_count)
        {
            return Err(GeometryError::IndexOutOfRange {
                index,
                vertex_count: vertex_count as u32,
            });
        }

        Ok(Self::from_parts(positions, components, tex_coords, indices, topology))
    }

    /// Built-in shapes are correct by construction and skip validation.
    pub(super) fn from_parts(
        positions: Vec<f32>,
        components: u32,
        tex_coords: Option<Vec<f32>>,
        indices: Option<Vec<u16>>,
        topology: Topology,
    ) -> Self {
        Self {
            positions: positions.into(),
            components,
            tex_coords: tex_coords.map(Into::into),
            indices: indices.map(Into::into),
            topology,
        }
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn tex_coords(&self) -> Option<&[f32]> {
        self.tex_coords.as_deref()
    }

    pub fn indices(&self) -> Option<&[u16]> {
        self.indices.as_deref()
    }

    /// Floats per vertex position.
    pub fn components(&self) -> u32 {
        self.components
    }

    /// Byte distance between consecutive positions.
    pub fn stride(&self) -> u64 {
        u64::from(self.components) * std::mem::size_of::<f32>() as u64
    }

    pub fn vertex_count(&self) -> u32 {
        (self.positions.len() / self.components as usize) as u32
    }

    /// Elements submitted per draw: index count when indexed, vertex count otherwise.
    pub fn element_count(&self) -> u32 {
        match &self.indices {
            Some(indices) => indices.len() as u32,
            None => self.vertex_count(),
        }
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Raw position bytes ready for upload.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions[..])
    }

    pub fn tex_coord_bytes(&self) -> Option<&[u8]> {
        self.tex_coords.as_deref().map(|tc| bytemuck::cast_slice(tc))
    }

    pub fn index_bytes(&self) -> Option<&[u8]> {
        self.indices.as_deref().map(|ix| bytemuck::cast_slice(ix))
    }
}
