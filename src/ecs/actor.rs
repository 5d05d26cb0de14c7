use glam::Vec4;

use crate::ecs::component::Component;
use crate::ecs::entity::{Entity, EntityCore};
use crate::ecs::mesh::{MaterialComponent, MeshComponent};
use crate::render::{DrawCommand, ObjectUniforms, RenderContext};
use crate::scene::Transform;

/// Renderable entity.
///
/// Spawns with a [`Transform`] and no geometry. Sub-meshes are kept in an
/// ordered list owned by the actor. Every render phase it refreshes its
/// [`ObjectUniforms`] from the propagated world matrix and the material color,
/// then submits one indexed draw per sub-mesh that has indices, in list order.
#[derive(Debug)]
pub struct Actor {
    core: EntityCore,
    meshes: Vec<MeshComponent>,
    cast_shadow: bool,
    uniforms: ObjectUniforms,
}

impl Actor {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let mut core = EntityCore::new(name);
        core.add_component(Transform::new());
        Self {
            core,
            meshes: Vec::new(),
            cast_shadow: true,
            uniforms: ObjectUniforms::default(),
        }
    }

    #[must_use]
    pub fn with_mesh(mut self, mesh: MeshComponent) -> Self {
        self.set_mesh(mesh);
        self
    }

    #[must_use]
    pub fn with_meshes(mut self, meshes: Vec<MeshComponent>) -> Self {
        self.set_meshes(meshes);
        self
    }

    #[must_use]
    pub fn with_material(mut self, material: MaterialComponent) -> Self {
        match self.core.get_component_mut::<MaterialComponent>() {
            Some(slot) => *slot = material,
            None => self.core.add_component(material),
        }
        self
    }

    /// Replaces every sub-mesh with `mesh`.
    pub fn set_mesh(&mut self, mesh: MeshComponent) {
        self.set_meshes(vec![mesh]);
    }

    pub fn set_meshes(&mut self, meshes: Vec<MeshComponent>) {
        self.meshes = meshes;
    }

    pub fn add_mesh(&mut self, mesh: MeshComponent) {
        self.meshes.push(mesh);
    }

    /// Sub-meshes in draw order.
    #[inline]
    #[must_use]
    pub fn meshes(&self) -> &[MeshComponent] {
        &self.meshes
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        self.core.name()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.core.set_name(name);
    }

    #[inline]
    #[must_use]
    pub fn cast_shadow(&self) -> bool {
        self.cast_shadow
    }

    pub fn set_cast_shadow(&mut self, cast_shadow: bool) {
        self.cast_shadow = cast_shadow;
    }

    /// Uniforms as of the last render phase.
    #[inline]
    #[must_use]
    pub fn uniforms(&self) -> &ObjectUniforms {
        &self.uniforms
    }

    fn refresh_uniforms(&mut self) {
        let world = self
            .core
            .get_component::<Transform>()
            .map(|t| *t.world_matrix())
            .unwrap_or_default();
        let color = self
            .core
            .get_component::<MaterialComponent>()
            .map_or(Vec4::ONE, |m| m.base_color);
        self.uniforms = ObjectUniforms::new(&world, color);
    }
}

impl Entity for Actor {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn render(&mut self, ctx: &mut dyn RenderContext) {
        self.core.components_mut().render_all(ctx);
        self.refresh_uniforms();

        // Albedo binds to slot 0 for every sub-mesh
        let albedo = self
            .core
            .get_component::<MaterialComponent>()
            .and_then(|m| m.albedo_texture.clone());

        for mesh in self.meshes.iter().filter(|m| m.index_count() > 0) {
            ctx.submit(DrawCommand {
                label: self.core.name().to_owned(),
                mesh: mesh.name().to_owned(),
                uniforms: self.uniforms,
                index_count: mesh.index_count(),
                albedo: albedo.clone(),
                cast_shadow: self.cast_shadow,
            });
        }
    }

    fn destroy(&mut self) {
        self.core.components_mut().destroy_all();
        for mesh in &mut self.meshes {
            mesh.destroy();
        }
        self.meshes.clear();
    }
}
