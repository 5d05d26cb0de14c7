use std::any::Any;

use slotmap::new_key_type;

use crate::ecs::component::{Component, ComponentKind};
use crate::ecs::storage::Components;
use crate::render::RenderContext;

new_key_type! {
    /// Generational handle of an entity inside a [`World`](crate::World).
    ///
    /// A handle outlives the entity it names: once the entity is despawned the
    /// handle simply stops resolving, which is how stale references are detected.
    pub struct EntityHandle;
}

/// State shared by every entity: name, active flag and owned components.
#[derive(Debug)]
pub struct EntityCore {
    name: String,
    active: bool,
    components: Components,
}

impl EntityCore {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: true,
            components: Components::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Inactive entities stay registered but are skipped by update and render dispatch.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    #[inline]
    #[must_use]
    pub fn components(&self) -> &Components {
        &self.components
    }

    #[inline]
    pub fn components_mut(&mut self) -> &mut Components {
        &mut self.components
    }

    pub fn add_component<T: Component>(&mut self, component: T) {
        self.components.insert(component);
    }

    #[must_use]
    pub fn get_component<T: Component>(&self) -> Option<&T> {
        self.components.get::<T>()
    }

    pub fn get_component_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.components.get_mut::<T>()
    }

    #[must_use]
    pub fn has_component<T: Component>(&self) -> bool {
        self.components.contains::<T>()
    }

    /// Kinds of the attached components, in attach order.
    #[must_use]
    pub fn component_kinds(&self) -> Vec<ComponentKind> {
        self.components.kinds().collect()
    }
}

/// Lifecycle contract of a game-world object.
///
/// Hooks are invoked by the owning systems: the [`World`](crate::World) calls
/// `awake`, `init` and `destroy`; the [`SceneGraph`](crate::SceneGraph) calls
/// `update` and `render` once per frame. An entity never schedules itself.
pub trait Entity: Any {
    fn core(&self) -> &EntityCore;

    fn core_mut(&mut self) -> &mut EntityCore;

    /// Runs right after the entity enters the world, before [`init`](Self::init).
    fn awake(&mut self) {}

    fn init(&mut self) {}

    /// Per-frame logic. The default forwards to every component in attach order.
    fn update(&mut self, delta_time: f32, _ctx: &mut dyn RenderContext) {
        self.core_mut().components_mut().update_all(delta_time);
    }

    /// Render phase. The default forwards to every component.
    fn render(&mut self, ctx: &mut dyn RenderContext) {
        self.core_mut().components_mut().render_all(ctx);
    }

    /// Teardown before the entity leaves the world. The default destroys every component.
    fn destroy(&mut self) {
        self.core_mut().components_mut().destroy_all();
    }
}

impl dyn Entity {
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        self.core().name()
    }

    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.core().is_active()
    }

    pub fn set_active(&mut self, active: bool) {
        self.core_mut().set_active(active);
    }

    pub fn add_component<T: Component>(&mut self, component: T) {
        self.core_mut().add_component(component);
    }

    #[must_use]
    pub fn get_component<T: Component>(&self) -> Option<&T> {
        self.core().get_component::<T>()
    }

    pub fn get_component_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.core_mut().get_component_mut::<T>()
    }

    #[must_use]
    pub fn has_component<T: Component>(&self) -> bool {
        self.core().has_component::<T>()
    }

    #[must_use]
    pub fn component_kinds(&self) -> Vec<ComponentKind> {
        self.core().component_kinds()
    }

    /// Downcasts to the concrete entity type.
    #[must_use]
    pub fn downcast_ref<E: Entity>(&self) -> Option<&E> {
        let any: &dyn Any = self;
        any.downcast_ref::<E>()
    }

    pub fn downcast_mut<E: Entity>(&mut self) -> Option<&mut E> {
        let any: &mut dyn Any = self;
        any.downcast_mut::<E>()
    }
}

/// An entity with no behaviour beyond its components.
///
/// Used for grouping nodes, pivots and anything whose only job is to sit in
/// the hierarchy and carry a transform.
#[derive(Debug)]
pub struct SceneNode {
    core: EntityCore,
}

impl SceneNode {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            core: EntityCore::new(name),
        }
    }
}

impl Entity for SceneNode {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }
}
