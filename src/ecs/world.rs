use slotmap::SlotMap;

use crate::ecs::component::Component;
use crate::ecs::entity::{Entity, EntityHandle};

/// Arena that owns every entity.
///
/// The scene graph only stores [`EntityHandle`]s into this arena, so entity
/// lifetime is decided here: [`spawn`](Self::spawn) runs `awake` + `init`,
/// [`despawn`](Self::despawn) runs `destroy` and frees the slot.
#[derive(Default)]
pub struct World {
    entities: SlotMap<EntityHandle, Box<dyn Entity>>,
}

impl World {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entities: SlotMap::with_key(),
        }
    }

    /// Moves an entity into the world and returns its handle.
    pub fn spawn<E: Entity>(&mut self, entity: E) -> EntityHandle {
        self.spawn_boxed(Box::new(entity))
    }

    pub fn spawn_boxed(&mut self, mut entity: Box<dyn Entity>) -> EntityHandle {
        entity.awake();
        entity.init();
        let handle = self.entities.insert(entity);
        log::debug!("Spawned entity {handle:?}");
        handle
    }

    /// Destroys and removes an entity, handing it back to the caller.
    ///
    /// Remove the entity from any scene graph first (or use
    /// [`SceneGraph::despawn_entity`](crate::SceneGraph::despawn_entity));
    /// otherwise the graph is left holding a handle that no longer resolves.
    pub fn despawn(&mut self, handle: EntityHandle) -> Option<Box<dyn Entity>> {
        let mut entity = self.entities.remove(handle)?;
        entity.destroy();
        log::debug!("Despawned entity {handle:?} ({})", entity.name());
        Some(entity)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, handle: EntityHandle) -> bool {
        self.entities.contains_key(handle)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    #[must_use]
    pub fn get(&self, handle: EntityHandle) -> Option<&(dyn Entity + 'static)> {
        self.entities.get(handle).map(AsRef::as_ref)
    }

    pub fn get_mut(&mut self, handle: EntityHandle) -> Option<&mut (dyn Entity + 'static)> {
        self.entities.get_mut(handle).map(AsMut::as_mut)
    }

    /// Typed access to a concrete entity.
    #[must_use]
    pub fn get_as<E: Entity>(&self, handle: EntityHandle) -> Option<&E> {
        self.get(handle)?.downcast_ref::<E>()
    }

    pub fn get_as_mut<E: Entity>(&mut self, handle: EntityHandle) -> Option<&mut E> {
        self.get_mut(handle)?.downcast_mut::<E>()
    }

    /// Shortcut for `get(handle)?.get_component::<T>()`.
    #[must_use]
    pub fn component<T: Component>(&self, handle: EntityHandle) -> Option<&T> {
        self.get(handle)?.get_component::<T>()
    }

    pub fn component_mut<T: Component>(&mut self, handle: EntityHandle) -> Option<&mut T> {
        self.get_mut(handle)?.get_component_mut::<T>()
    }

    /// First entity with the given name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<EntityHandle> {
        self.entities
            .iter()
            .find_map(|(handle, entity)| (entity.name() == name).then_some(handle))
    }

    pub fn handles(&self) -> impl Iterator<Item = EntityHandle> + '_ {
        self.entities.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityHandle, &(dyn Entity + 'static))> {
        self.entities.iter().map(|(handle, entity)| (handle, entity.as_ref()))
    }

    /// Despawns every entity.
    pub fn clear(&mut self) {
        for (_, entity) in &mut self.entities {
            entity.destroy();
        }
        self.entities.clear();
    }
}
