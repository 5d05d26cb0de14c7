use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};

/// Per-object constant buffer payload, refreshed every frame.
///
/// The world matrix is stored transposed, which is the layout HLSL-style
/// constant buffers expect from a column-major glam matrix.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ObjectUniforms {
    pub world: Mat4,
    pub mesh_color: Vec4,
}

impl ObjectUniforms {
    #[must_use]
    pub fn new(world: &Mat4, mesh_color: Vec4) -> Self {
        Self {
            world: world.transpose(),
            mesh_color,
        }
    }

    /// The world matrix in glam's own (column-major) convention.
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> Mat4 {
        self.world.transpose()
    }

    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

impl Default for ObjectUniforms {
    fn default() -> Self {
        Self::new(&Mat4::IDENTITY, Vec4::ONE)
    }
}
