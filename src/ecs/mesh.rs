//! Render-facing data components.
//!
//! These are the `Mesh` and `Material` variants of the component model. They
//! only carry CPU-side data; uploading it is the graphics layer's business.

use bytemuck::{Pod, Zeroable};
use glam::Vec4;

use crate::ecs::component::{Component, ComponentKind};

/// Vertex layout shared with the graphics layer (position + texture coordinate).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub tex_coord: [f32; 2],
}

impl Vertex {
    #[must_use]
    pub const fn new(position: [f32; 3], tex_coord: [f32; 2]) -> Self {
        Self { position, tex_coord }
    }
}

/// Indexed triangle list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshComponent {
    name: String,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl MeshComponent {
    #[must_use]
    pub fn new(name: impl Into<String>, vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            vertices,
            indices,
        }
    }

    /// Unit quad in the XY plane, facing +Z.
    #[must_use]
    pub fn quad(name: impl Into<String>) -> Self {
        let vertices = vec![
            Vertex::new([-0.5, -0.5, 0.0], [0.0, 1.0]),
            Vertex::new([0.5, -0.5, 0.0], [1.0, 1.0]),
            Vertex::new([0.5, 0.5, 0.0], [1.0, 0.0]),
            Vertex::new([-0.5, 0.5, 0.0], [0.0, 0.0]),
        ];
        Self::new(name, vertices, vec![0, 1, 2, 0, 2, 3])
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    #[must_use]
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Raw vertex data, ready for a vertex buffer upload.
    #[must_use]
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    #[must_use]
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

impl Component for MeshComponent {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Mesh
    }

    fn destroy(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }
}

/// Surface appearance of a mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialComponent {
    pub base_color: Vec4,
    /// Asset path of the albedo texture bound to slot 0, if any.
    pub albedo_texture: Option<String>,
}

impl MaterialComponent {
    #[must_use]
    pub fn new(base_color: Vec4) -> Self {
        Self {
            base_color,
            albedo_texture: None,
        }
    }

    #[must_use]
    pub fn with_albedo(mut self, path: impl Into<String>) -> Self {
        self.albedo_texture = Some(path.into());
        self
    }
}

impl Default for MaterialComponent {
    fn default() -> Self {
        Self::new(Vec4::ONE)
    }
}

impl Component for MaterialComponent {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Material
    }
}
