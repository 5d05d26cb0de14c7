//! Per-entity component storage.
//!
//! Components are kept in attach order (lifecycle hooks run in that order)
//! next to a `TypeId → index` map, so typed lookup does not scan the list or
//! try a downcast per element.

use std::any::{Any, TypeId};
use std::fmt;

use rustc_hash::FxHashMap;

use crate::ecs::component::{Component, ComponentKind};
use crate::render::RenderContext;

/// Ordered, owned collection of an entity's components.
#[derive(Default)]
pub struct Components {
    items: Vec<Box<dyn Component>>,
    /// First attached instance of each concrete type.
    first_of_type: FxHashMap<TypeId, usize>,
}

impl Components {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a component.
    ///
    /// A second component of an already present type is appended as well, but
    /// typed lookup keeps resolving to the first one.
    pub fn insert<T: Component>(&mut self, component: T) {
        let index = self.items.len();
        let type_id = TypeId::of::<T>();
        if self.first_of_type.contains_key(&type_id) {
            log::warn!(
                "Duplicate {} attached; lookups keep returning the first instance",
                component.type_name()
            );
        } else {
            self.first_of_type.insert(type_id, index);
        }
        self.items.push(Box::new(component));
    }

    /// Returns the first attached component of type `T`.
    #[must_use]
    pub fn get<T: Component>(&self) -> Option<&T> {
        let index = *self.first_of_type.get(&TypeId::of::<T>())?;
        let component: &(dyn Component + 'static) = self.items.get(index)?.as_ref();
        let any: &dyn Any = component;
        any.downcast_ref::<T>()
    }

    /// Mutable variant of [`get`](Self::get).
    pub fn get_mut<T: Component>(&mut self) -> Option<&mut T> {
        let index = *self.first_of_type.get(&TypeId::of::<T>())?;
        let component: &mut (dyn Component + 'static) = self.items.get_mut(index)?.as_mut();
        let any: &mut dyn Any = component;
        any.downcast_mut::<T>()
    }

    #[inline]
    #[must_use]
    pub fn contains<T: Component>(&self) -> bool {
        self.first_of_type.contains_key(&TypeId::of::<T>())
    }

    /// Number of attached components, duplicates included.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Kinds of all attached components, in attach order.
    pub fn kinds(&self) -> impl Iterator<Item = ComponentKind> + '_ {
        self.items.iter().map(|c| c.kind())
    }

    pub fn iter(&self) -> impl Iterator<Item = &(dyn Component + 'static)> {
        self.items.iter().map(AsRef::as_ref)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut (dyn Component + 'static)> {
        self.items.iter_mut().map(AsMut::as_mut)
    }

    pub fn init_all(&mut self) {
        for component in &mut self.items {
            component.init();
        }
    }

    pub fn update_all(&mut self, delta_time: f32) {
        for component in &mut self.items {
            component.update(delta_time);
        }
    }

    pub fn render_all(&mut self, ctx: &mut dyn RenderContext) {
        for component in &mut self.items {
            component.render(ctx);
        }
    }

    pub fn destroy_all(&mut self) {
        for component in &mut self.items {
            component.destroy();
        }
    }
}

impl fmt::Debug for Components {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter().map(|c| c.type_name())).finish()
    }
}
