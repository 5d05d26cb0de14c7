//! Scene Graph
//!
//! Flat registry of entities plus the parent/child relation stored in each
//! entity's [`HierarchyComponent`].
//!
//! The graph never owns entities. It holds [`EntityHandle`]s into a
//! [`World`], which every operation receives explicitly. A handle whose
//! entity was despawned stops resolving: update and render skip it, and
//! [`SceneGraph::validate`] reports it.
//!
//! # Frame contract
//!
//! [`SceneGraph::update`] runs two passes, and the first completes before the
//! second begins:
//!
//! 1. **Update**: every registered entity gets `update(dt, ctx)` in
//!    registry order. This is where `Transform` recomputes its local matrix.
//! 2. **Propagation**: starting at identity from every root, world matrices
//!    are pushed down depth-first as `world = parent_world * local` and
//!    written into `Transform::world_matrix`.
//!
//! Propagation therefore always reads this frame's local matrices.
//! [`SceneGraph::render`] then dispatches `render(ctx)` in registry order.

use glam::Mat4;
use rustc_hash::FxHashSet;

use crate::ecs::{Component, ComponentKind, Entity, EntityHandle, World};
use crate::errors::{Result, SceneError};
use crate::render::RenderContext;
use crate::scene::hierarchy::HierarchyComponent;
use crate::scene::settings::{PropagationMode, SceneSettings};
use crate::scene::transform::Transform;
use crate::scene::transform_system;

/// Per-frame counters returned by [`SceneGraph::update`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Entities whose `update` ran.
    pub updated: usize,
    /// Entities whose world matrix was written.
    pub propagated: usize,
    /// Registered handles that no longer resolve.
    pub dangling: usize,
}

#[derive(Debug, Default)]
pub struct SceneGraph {
    entities: Vec<EntityHandle>,
    settings: SceneSettings,

    // Per-frame scratch, kept to reuse allocations
    roots: Vec<EntityHandle>,
    visited: FxHashSet<EntityHandle>,
}

impl SceneGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_settings(settings: SceneSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &SceneSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: SceneSettings) {
        self.settings = settings;
    }

    // ========================================================================
    // Registry
    // ========================================================================

    /// Registered handles, in dispatch order.
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &[EntityHandle] {
        &self.entities
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

    #[inline]
    #[must_use]
    pub fn is_registered(&self, entity: EntityHandle) -> bool {
        self.entities.contains(&entity)
    }

    /// Registers an entity.
    ///
    /// A missing [`Transform`] or [`HierarchyComponent`] is attached and
    /// initialised first. Returns `false` without doing anything when the
    /// handle does not resolve or is already registered.
    pub fn add_entity(&mut self, world: &mut World, entity: EntityHandle) -> bool {
        if self.is_registered(entity) {
            return false;
        }
        let Some(e) = world.get_mut(entity) else {
            log::warn!("Cannot register {entity:?}: it does not exist in the world");
            return false;
        };

        if !e.has_component::<Transform>() {
            let mut transform = Transform::new();
            transform.init();
            e.add_component(transform);
        }
        if !e.has_component::<HierarchyComponent>() {
            let mut hierarchy = HierarchyComponent::new();
            hierarchy.init();
            e.add_component(hierarchy);
        }

        log::debug!("Registered entity {entity:?} ({})", e.name());
        self.entities.push(entity);
        true
    }

    /// Unregisters an entity without destroying it.
    ///
    /// The entity is detached from its parent and each of its children becomes
    /// a root. Grandchildren stay under their own parents. When the handle no
    /// longer resolves, registered entities that still name it as parent are
    /// orphaned and it is dropped from every registered child list.
    pub fn remove_entity(&mut self, world: &mut World, entity: EntityHandle) -> bool {
        let Some(index) = self.entities.iter().position(|&h| h == entity) else {
            return false;
        };

        if world.contains(entity) {
            self.detach(world, entity);

            let children = world
                .component::<HierarchyComponent>(entity)
                .map(|h| h.children().to_vec())
                .unwrap_or_default();
            for child in children {
                if let Some(hc) = world.component_mut::<HierarchyComponent>(child)
                    && hc.parent() == Some(entity)
                {
                    hc.set_parent(None);
                }
            }
            if let Some(he) = world.component_mut::<HierarchyComponent>(entity) {
                he.clear_children();
            }
        } else {
            for &other in &self.entities {
                if let Some(hc) = world.component_mut::<HierarchyComponent>(other) {
                    if hc.parent() == Some(entity) {
                        hc.set_parent(None);
                    }
                    hc.remove_child(entity);
                }
            }
        }

        self.entities.remove(index);
        log::debug!("Unregistered entity {entity:?}");
        true
    }

    /// Unregisters then despawns an entity, returning it.
    ///
    /// Despawning through the [`World`] alone leaves the graph holding a
    /// dangling handle; this is the order that avoids it.
    pub fn despawn_entity(
        &mut self,
        world: &mut World,
        entity: EntityHandle,
    ) -> Option<Box<dyn Entity>> {
        self.remove_entity(world, entity);
        world.despawn(entity)
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// Whether `possible_ancestor` appears on the parent chain above `node`.
    ///
    /// `node` itself is not part of its own chain. The walk is bounded by the
    /// world's size; a chain longer than that can only be a corrupted cycle and
    /// is reported as `true` so no caller extends it further.
    #[must_use]
    pub fn is_ancestor(
        &self,
        world: &World,
        possible_ancestor: EntityHandle,
        node: EntityHandle,
    ) -> bool {
        let mut current = parent_link(world, node);
        let mut steps = 0;

        while let Some(parent) = current {
            if parent == possible_ancestor {
                return true;
            }
            steps += 1;
            if steps > world.len() {
                log::error!("Parent chain above {node:?} does not terminate; hierarchy links are corrupted");
                return true;
            }
            current = parent_link(world, parent);
        }
        false
    }

    /// Makes `child` a child of `parent`.
    ///
    /// Both are registered if they are not yet. Fails without mutating the
    /// hierarchy when either handle does not resolve, when they are the same
    /// entity, or when `child` is an ancestor of `parent`. An existing parent
    /// of `child` is replaced.
    pub fn attach(&mut self, world: &mut World, child: EntityHandle, parent: EntityHandle) -> bool {
        if child == parent || !world.contains(child) || !world.contains(parent) {
            return false;
        }

        self.add_entity(world, child);
        self.add_entity(world, parent);

        if self.is_ancestor(world, child, parent) {
            log::warn!("Refusing to attach {child:?} under {parent:?}: it would create a cycle");
            return false;
        }
        let has_links = world.component::<HierarchyComponent>(child).is_some()
            && world.component::<HierarchyComponent>(parent).is_some();
        if !has_links {
            return false;
        }

        self.detach(world, child);

        if let Some(hc) = world.component_mut::<HierarchyComponent>(child) {
            hc.set_parent(Some(parent));
        }
        if let Some(hp) = world.component_mut::<HierarchyComponent>(parent) {
            hp.add_child(child);
        }
        true
    }

    /// Makes `child` a root.
    ///
    /// Returns `false` if the handle does not resolve or has no hierarchy;
    /// an entity that already is a root is left alone and reports `true`.
    pub fn detach(&mut self, world: &mut World, child: EntityHandle) -> bool {
        let Some(hc) = world.component_mut::<HierarchyComponent>(child) else {
            return false;
        };
        let Some(parent) = hc.parent() else {
            return true;
        };
        hc.set_parent(None);

        if let Some(hp) = world.component_mut::<HierarchyComponent>(parent) {
            hp.remove_child(child);
        }
        true
    }

    /// Whether the entity resolves and has no parent.
    #[must_use]
    pub fn is_root(&self, world: &World, entity: EntityHandle) -> bool {
        world.contains(entity) && parent_link(world, entity).is_none()
    }

    #[must_use]
    pub fn parent_of(&self, world: &World, entity: EntityHandle) -> Option<EntityHandle> {
        parent_link(world, entity)
    }

    #[must_use]
    pub fn children_of<'w>(&self, world: &'w World, entity: EntityHandle) -> &'w [EntityHandle] {
        world
            .component::<HierarchyComponent>(entity)
            .map(HierarchyComponent::children)
            .unwrap_or_default()
    }

    /// Registered entities that propagation starts from.
    ///
    /// An entity whose parent no longer resolves counts as a root, so its
    /// subtree keeps receiving world matrices.
    #[must_use]
    pub fn roots(&self, world: &World) -> Vec<EntityHandle> {
        let mut roots = Vec::new();
        collect_roots(world, &self.entities, &mut roots);
        roots
    }

    /// Every entity below `entity`, depth-first pre-order, `entity` excluded.
    #[must_use]
    pub fn descendants(&self, world: &World, entity: EntityHandle) -> Vec<EntityHandle> {
        let mut out = Vec::new();
        let mut seen = FxHashSet::default();
        seen.insert(entity);

        let mut stack: Vec<EntityHandle> = self.children_of(world, entity).iter().rev().copied().collect();
        while let Some(handle) = stack.pop() {
            if !seen.insert(handle) {
                continue;
            }
            out.push(handle);
            stack.extend(self.children_of(world, handle).iter().rev().copied());
        }
        out
    }

    /// World matrix written by the last propagation.
    #[must_use]
    pub fn world_matrix(&self, world: &World, entity: EntityHandle) -> Option<Mat4> {
        world.component::<Transform>(entity).map(|t| *t.world_matrix())
    }

    // ========================================================================
    // Frame
    // ========================================================================

    /// Runs the update pass, then propagation. See the module docs.
    ///
    /// Every registered entity is updated; the active flag is left to
    /// application code.
    pub fn update(
        &mut self,
        world: &mut World,
        delta_time: f32,
        ctx: &mut dyn RenderContext,
    ) -> FrameStats {
        let mut stats = FrameStats::default();

        // Pass 1: entity updates
        for &handle in &self.entities {
            match world.get_mut(handle) {
                Some(entity) => {
                    entity.update(delta_time, ctx);
                    stats.updated += 1;
                }
                None => {
                    stats.dangling += 1;
                    if self.settings.warn_on_dangling {
                        log::warn!("Skipping {handle:?} in update: entity no longer exists");
                    }
                }
            }
        }

        // Pass 2: world matrices
        stats.propagated = self.propagate(world);
        stats
    }

    /// Propagation pass alone, for when local matrices changed outside
    /// [`update`](Self::update). Returns the number of world matrices written.
    pub fn propagate(&mut self, world: &mut World) -> usize {
        collect_roots(world, &self.entities, &mut self.roots);
        self.visited.clear();

        match self.settings.propagation {
            PropagationMode::Iterative => {
                transform_system::update_hierarchy_iterative(world, &self.roots, &mut self.visited)
            }
            PropagationMode::Recursive => {
                transform_system::update_hierarchy_recursive(world, &self.roots, &mut self.visited)
            }
        }
    }

    /// Re-propagates the subtree under `entity` from its parent's current world matrix.
    pub fn propagate_subtree(&mut self, world: &mut World, entity: EntityHandle) -> usize {
        self.visited.clear();
        transform_system::update_subtree(world, entity, &mut self.visited)
    }

    /// Dispatches `render(ctx)` to every registered entity.
    pub fn render(&mut self, world: &mut World, ctx: &mut dyn RenderContext) {
        for &handle in &self.entities {
            match world.get_mut(handle) {
                Some(entity) => entity.render(ctx),
                None => {
                    if self.settings.warn_on_dangling {
                        log::warn!("Skipping {handle:?} in render: entity no longer exists");
                    }
                }
            }
        }
    }

    /// Clears every registered entity's links and empties the registry.
    ///
    /// Entities stay alive in the world.
    pub fn destroy(&mut self, world: &mut World) {
        for &handle in &self.entities {
            if let Some(hc) = world.component_mut::<HierarchyComponent>(handle) {
                hc.destroy();
            }
        }
        self.entities.clear();
        self.roots.clear();
        self.visited.clear();
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    /// Checks the graph against the world and reports the first violation.
    ///
    /// Every registered handle must resolve and carry a transform and a
    /// hierarchy; links must point at registered entities and agree on both
    /// sides; child lists hold no duplicates; no entity is its own ancestor.
    pub fn validate(&self, world: &World) -> Result<()> {
        for &handle in &self.entities {
            let entity = world.get(handle).ok_or(SceneError::DanglingEntity(handle))?;
            if !entity.has_component::<Transform>() {
                return Err(SceneError::MissingComponent {
                    entity: handle,
                    kind: ComponentKind::Transform,
                });
            }
            let hierarchy = entity.get_component::<HierarchyComponent>().ok_or(
                SceneError::MissingComponent {
                    entity: handle,
                    kind: ComponentKind::Hierarchy,
                },
            )?;

            if let Some(parent) = hierarchy.parent() {
                self.check_linked(world, parent)?;
                if !self.children_of(world, parent).contains(&handle) {
                    return Err(SceneError::InconsistentLink { parent, child: handle });
                }
            }

            let mut seen = FxHashSet::default();
            for &child in hierarchy.children() {
                if !seen.insert(child) {
                    return Err(SceneError::DuplicateChild { parent: handle, child });
                }
                self.check_linked(world, child)?;
                if parent_link(world, child) != Some(handle) {
                    return Err(SceneError::InconsistentLink { parent: handle, child });
                }
            }
        }

        for &handle in &self.entities {
            let mut current = parent_link(world, handle);
            let mut steps = 0;
            while let Some(parent) = current {
                if parent == handle {
                    return Err(SceneError::Cycle(handle));
                }
                steps += 1;
                if steps > world.len() {
                    break;
                }
                current = parent_link(world, parent);
            }
        }

        Ok(())
    }

    fn check_linked(&self, world: &World, entity: EntityHandle) -> Result<()> {
        if !world.contains(entity) {
            return Err(SceneError::DanglingEntity(entity));
        }
        if !self.is_registered(entity) {
            return Err(SceneError::UnregisteredEntity(entity));
        }
        Ok(())
    }

    /// Drops handles that no longer resolve, from the registry and from the
    /// links of surviving entities. Returns how many registry entries went.
    pub fn prune_dangling(&mut self, world: &mut World) -> usize {
        let before = self.entities.len();
        self.entities.retain(|&h| world.contains(h));
        let removed = before - self.entities.len();

        for &handle in &self.entities {
            let Some(hierarchy) = world.component::<HierarchyComponent>(handle) else {
                continue;
            };
            let stale_parent = hierarchy.parent().filter(|&p| !world.contains(p));
            let stale_children: Vec<EntityHandle> = hierarchy
                .children()
                .iter()
                .copied()
                .filter(|&c| !world.contains(c))
                .collect();

            if stale_parent.is_none() && stale_children.is_empty() {
                continue;
            }
            if let Some(hc) = world.component_mut::<HierarchyComponent>(handle) {
                if stale_parent.is_some() {
                    hc.set_parent(None);
                }
                for child in stale_children {
                    hc.remove_child(child);
                }
            }
        }

        if removed > 0 {
            log::debug!("Pruned {removed} dangling entities from the scene graph");
        }
        removed
    }
}

fn parent_link(world: &World, entity: EntityHandle) -> Option<EntityHandle> {
    world
        .component::<HierarchyComponent>(entity)
        .and_then(HierarchyComponent::parent)
}

fn collect_roots(world: &World, entities: &[EntityHandle], out: &mut Vec<EntityHandle>) {
    out.clear();
    out.extend(entities.iter().copied().filter(|&h| {
        world.contains(h) && parent_link(world, h).is_none_or(|p| !world.contains(p))
    }));
}
