//! Scene Graph Integration Tests
//!
//! Tests for:
//! - Registration: auto-attached components, idempotence, unresolvable handles
//! - attach/detach: cycle rejection, single parent, detach idempotence
//! - remove_entity: orphaning, dangling handles
//! - Frame: two-pass update, propagation order, render dispatch, active flag, deep chains
//! - Diagnostics: validate, prune_dangling, descendants

use glam::{Mat4, Vec3};
use monaco::{
    Actor, Component, DrawList, Entity, EntityHandle, HierarchyComponent, MeshComponent, PropagationMode,
    SceneError, SceneGraph, SceneNode, SceneSettings, Transform, World,
};

// ============================================================================
// Helper
// ============================================================================

struct Fixture {
    world: World,
    scene: SceneGraph,
}

impl Fixture {
    fn new() -> Self {
        Self {
            world: World::new(),
            scene: SceneGraph::new(),
        }
    }

    fn node(&mut self, name: &str) -> EntityHandle {
        let handle = self.world.spawn(SceneNode::new(name));
        assert!(self.scene.add_entity(&mut self.world, handle));
        handle
    }

    fn attach(&mut self, child: EntityHandle, parent: EntityHandle) -> bool {
        self.scene.attach(&mut self.world, child, parent)
    }

    fn detach(&mut self, child: EntityHandle) -> bool {
        self.scene.detach(&mut self.world, child)
    }

    fn parent(&self, entity: EntityHandle) -> Option<EntityHandle> {
        self.scene.parent_of(&self.world, entity)
    }

    fn children(&self, entity: EntityHandle) -> Vec<EntityHandle> {
        self.scene.children_of(&self.world, entity).to_vec()
    }

    fn set_position(&mut self, entity: EntityHandle, position: Vec3) {
        self.world
            .component_mut::<Transform>(entity)
            .unwrap()
            .set_position(position);
    }

    fn world_position(&self, entity: EntityHandle) -> Vec3 {
        self.world
            .component::<Transform>(entity)
            .unwrap()
            .world_position()
    }

    fn update(&mut self) -> monaco::FrameStats {
        self.scene.update(&mut self.world, 0.016, &mut DrawList::new())
    }

    /// Root -> A -> B
    fn chain() -> (Self, EntityHandle, EntityHandle, EntityHandle) {
        let mut f = Self::new();
        let r = f.node("R");
        let a = f.node("A");
        let b = f.node("B");
        assert!(f.attach(a, r));
        assert!(f.attach(b, a));
        (f, r, a, b)
    }
}

// ============================================================================
// Registration
// ============================================================================

#[test]
fn add_entity_attaches_missing_components() {
    let mut world = World::new();
    let mut scene = SceneGraph::new();
    let handle = world.spawn(SceneNode::new("Bare"));
    assert!(!world.get(handle).unwrap().has_component::<Transform>());

    assert!(scene.add_entity(&mut world, handle));

    let entity = world.get(handle).unwrap();
    assert!(entity.has_component::<Transform>());
    assert!(entity.has_component::<HierarchyComponent>());
    assert!(scene.is_registered(handle));
}

#[test]
fn add_entity_keeps_existing_transform() {
    let mut world = World::new();
    let mut scene = SceneGraph::new();
    let handle = world.spawn(Actor::new("Actor"));
    world
        .component_mut::<Transform>(handle)
        .unwrap()
        .set_position(Vec3::new(3.0, 0.0, 0.0));

    scene.add_entity(&mut world, handle);

    let entity = world.get(handle).unwrap();
    // Transform + Mesh from the actor, Hierarchy from registration
    assert_eq!(entity.core().components().len(), 3);
    assert_eq!(
        world.component::<Transform>(handle).unwrap().position(),
        Vec3::new(3.0, 0.0, 0.0)
    );
}

#[test]
fn add_entity_is_idempotent() {
    let mut f = Fixture::new();
    let a = f.node("A");

    assert!(!f.scene.add_entity(&mut f.world, a));
    assert_eq!(f.scene.len(), 1);
    assert_eq!(f.world.get(a).unwrap().core().components().len(), 2);
}

#[test]
fn add_entity_rejects_unresolvable_handle() {
    let mut f = Fixture::new();
    let gone = f.world.spawn(SceneNode::new("Gone"));
    f.world.despawn(gone);

    assert!(!f.scene.add_entity(&mut f.world, gone));
    assert!(f.scene.is_empty());
}

// ============================================================================
// Attach / Detach
// ============================================================================

#[test]
fn attach_registers_both_sides() {
    let mut world = World::new();
    let mut scene = SceneGraph::new();
    let parent = world.spawn(SceneNode::new("Parent"));
    let child = world.spawn(SceneNode::new("Child"));

    assert!(scene.attach(&mut world, child, parent));
    assert!(scene.is_registered(parent));
    assert!(scene.is_registered(child));
    assert_eq!(scene.parent_of(&world, child), Some(parent));
}

#[test]
fn attach_to_self_fails() {
    let mut f = Fixture::new();
    let a = f.node("A");

    assert!(!f.attach(a, a));
    assert_eq!(f.parent(a), None);
    assert!(f.children(a).is_empty());
}

#[test]
fn attach_with_unresolvable_handle_fails() {
    let mut f = Fixture::new();
    let a = f.node("A");
    let gone = f.world.spawn(SceneNode::new("Gone"));
    f.world.despawn(gone);

    assert!(!f.attach(a, gone));
    assert!(!f.attach(gone, a));
    assert_eq!(f.parent(a), None);
    assert_eq!(f.scene.len(), 1);
}

#[test]
fn attach_rejects_cycle_without_mutation() {
    let (mut f, r, a, b) = Fixture::chain();

    // R is an ancestor of B
    assert!(!f.attach(r, b));
    assert!(!f.attach(a, b));

    assert_eq!(f.parent(r), None);
    assert_eq!(f.parent(a), Some(r));
    assert_eq!(f.parent(b), Some(a));
    assert_eq!(f.children(r), vec![a]);
    assert_eq!(f.children(a), vec![b]);
    assert!(f.children(b).is_empty());
}

#[test]
fn reattach_moves_child_to_new_parent() {
    let (mut f, r, a, b) = Fixture::chain();

    assert!(f.attach(b, r));

    assert_eq!(f.parent(b), Some(r));
    assert_eq!(f.children(r), vec![a, b]);
    assert!(f.children(a).is_empty());
    for &other in f.scene.entities() {
        let listed = f.children(other).iter().filter(|&&c| c == b).count();
        assert_eq!(listed, usize::from(other == r));
    }
}

#[test]
fn attach_to_current_parent_keeps_single_entry() {
    let (mut f, _r, a, b) = Fixture::chain();

    assert!(f.attach(b, a));
    assert_eq!(f.children(a), vec![b]);
}

#[test]
fn detach_is_idempotent() {
    let (mut f, r, a, b) = Fixture::chain();

    assert!(f.detach(a));
    assert!(f.scene.is_root(&f.world, a));
    assert!(!f.children(r).contains(&a));

    assert!(f.detach(a));
    assert!(f.scene.is_root(&f.world, a));
    // The subtree under A is untouched
    assert_eq!(f.children(a), vec![b]);
}

#[test]
fn detach_without_hierarchy_fails() {
    let mut world = World::new();
    let mut scene = SceneGraph::new();
    let bare = world.spawn(SceneNode::new("Bare"));

    assert!(!scene.detach(&mut world, bare));
}

#[test]
fn is_ancestor_walks_parent_chain() {
    let (f, r, a, b) = Fixture::chain();

    assert!(f.scene.is_ancestor(&f.world, r, b));
    assert!(f.scene.is_ancestor(&f.world, a, b));
    assert!(!f.scene.is_ancestor(&f.world, b, r));
    assert!(!f.scene.is_ancestor(&f.world, b, b));
}

#[test]
fn is_ancestor_terminates_on_corrupted_chain() {
    let (mut f, r, a, _b) = Fixture::chain();
    // Bypass the graph to build R -> A -> R
    f.world
        .component_mut::<HierarchyComponent>(r)
        .unwrap()
        .set_parent(Some(a));
    let outsider = f.node("Outsider");

    assert!(f.scene.is_ancestor(&f.world, outsider, r));
}

#[test]
fn concrete_r_a_b_scenario() {
    let mut f = Fixture::new();
    let r = f.node("R");
    let a = f.node("A");
    let b = f.node("B");

    assert!(f.attach(a, r));
    assert!(f.attach(b, a));
    assert!(!f.attach(r, b));

    assert_eq!(f.parent(r), None);
    assert_eq!(f.parent(a), Some(r));
    assert_eq!(f.parent(b), Some(a));

    assert!(f.detach(a));
    assert!(f.scene.is_root(&f.world, a));
    assert_eq!(f.parent(b), Some(a));
    assert_eq!(f.children(a), vec![b]);
}

// ============================================================================
// Removal
// ============================================================================

#[test]
fn remove_entity_orphans_children() {
    let (mut f, r, a, b) = Fixture::chain();
    let c = f.node("C");
    assert!(f.attach(c, b));

    assert!(f.scene.remove_entity(&mut f.world, a));

    assert!(!f.scene.is_registered(a));
    assert!(f.scene.is_registered(b));
    assert_eq!(f.parent(b), None);
    assert!(f.children(r).is_empty());
    assert!(f.children(a).is_empty());
    assert_eq!(f.parent(a), None);
    // Shallow: grandchildren stay where they are
    assert_eq!(f.parent(c), Some(b));
    // A is still alive in the world
    assert!(f.world.contains(a));
    assert!(f.scene.validate(&f.world).is_ok());
}

#[test]
fn remove_unregistered_is_noop() {
    let mut f = Fixture::new();
    let loose = f.world.spawn(SceneNode::new("Loose"));

    assert!(!f.scene.remove_entity(&mut f.world, loose));
}

#[test]
fn remove_dangling_entity_orphans_registered_children() {
    let (mut f, r, a, b) = Fixture::chain();
    // Despawned without unregistering first
    f.world.despawn(a);

    assert!(f.scene.remove_entity(&mut f.world, a));
    assert_eq!(f.parent(b), None);
    assert!(f.children(r).is_empty());
    assert!(f.scene.validate(&f.world).is_ok());
}

#[test]
fn despawn_entity_unregisters_first() {
    let (mut f, r, a, b) = Fixture::chain();

    let removed = f.scene.despawn_entity(&mut f.world, a).unwrap();
    assert_eq!(removed.name(), "A");
    assert!(!f.world.contains(a));
    assert!(f.children(r).is_empty());
    assert!(f.scene.is_root(&f.world, b));
    assert!(f.scene.validate(&f.world).is_ok());
}

#[test]
fn destroy_clears_links_but_keeps_entities() {
    let (mut f, r, a, b) = Fixture::chain();

    f.scene.destroy(&mut f.world);

    assert!(f.scene.is_empty());
    for handle in [r, a, b] {
        assert!(f.world.contains(handle));
        assert_eq!(f.parent(handle), None);
        assert!(f.children(handle).is_empty());
    }
}

// ============================================================================
// Frame
// ============================================================================

#[test]
fn propagation_sums_translations() {
    for mode in [PropagationMode::Iterative, PropagationMode::Recursive] {
        let (mut f, r, a, b) = Fixture::chain();
        f.scene.set_settings(SceneSettings {
            propagation: mode,
            ..Default::default()
        });
        f.set_position(r, Vec3::new(1.0, 0.0, 0.0));
        f.set_position(a, Vec3::new(0.0, 2.0, 0.0));
        f.set_position(b, Vec3::new(0.0, 0.0, 3.0));

        let stats = f.update();

        assert_eq!(stats.updated, 3);
        assert_eq!(stats.propagated, 3);
        assert_eq!(f.world_position(b), Vec3::new(1.0, 2.0, 3.0), "{mode:?}");
        assert_eq!(f.world_position(a), Vec3::new(1.0, 2.0, 0.0), "{mode:?}");
    }
}

#[test]
fn propagation_uses_this_frames_local_matrices() {
    let (mut f, r, _a, b) = Fixture::chain();
    f.update();
    assert_eq!(f.world_position(b), Vec3::ZERO);

    // One update call is enough: the local matrix is rebuilt before propagation
    f.set_position(r, Vec3::new(5.0, 0.0, 0.0));
    f.update();
    assert_eq!(f.world_position(b), Vec3::new(5.0, 0.0, 0.0));
}

#[test]
fn world_matrix_before_first_update_is_identity() {
    let (mut f, r, _a, b) = Fixture::chain();
    f.set_position(r, Vec3::new(5.0, 0.0, 0.0));

    assert_eq!(f.scene.world_matrix(&f.world, b), Some(Mat4::IDENTITY));
    assert_eq!(*f.world.component::<Transform>(r).unwrap().matrix(), Mat4::IDENTITY);
}

#[test]
fn propagate_alone_skips_entity_updates() {
    let (mut f, r, _a, b) = Fixture::chain();
    f.set_position(r, Vec3::new(5.0, 0.0, 0.0));

    // Local matrices are only refreshed by update
    assert_eq!(f.scene.propagate(&mut f.world), 3);
    assert_eq!(f.world_position(b), Vec3::ZERO);

    f.world.component_mut::<Transform>(r).unwrap().update(0.0);
    f.scene.propagate(&mut f.world);
    assert_eq!(f.world_position(b), Vec3::new(5.0, 0.0, 0.0));
}

#[test]
fn propagate_subtree_refreshes_below_entity() {
    let (mut f, _r, a, b) = Fixture::chain();
    f.set_position(a, Vec3::new(0.0, 1.0, 0.0));
    f.update();

    f.set_position(b, Vec3::new(2.0, 0.0, 0.0));
    f.world.component_mut::<Transform>(b).unwrap().update(0.0);

    assert_eq!(f.scene.propagate_subtree(&mut f.world, b), 1);
    assert_eq!(f.world_position(b), Vec3::new(2.0, 1.0, 0.0));
}

#[test]
fn inactive_entities_are_still_updated() {
    let (mut f, r, a, b) = Fixture::chain();
    f.set_position(r, Vec3::new(1.0, 0.0, 0.0));
    f.update();
    f.world.get_mut(a).unwrap().set_active(false);

    f.set_position(a, Vec3::new(0.0, 7.0, 0.0));
    let stats = f.update();

    assert_eq!(stats.updated, 3);
    assert_eq!(stats.propagated, 3);
    assert_eq!(f.world_position(b), Vec3::new(1.0, 7.0, 0.0));
}

#[test]
fn deep_chain_propagates_iteratively() {
    const DEPTH: usize = 5_000;

    let mut f = Fixture::new();
    f.scene.set_settings(SceneSettings {
        propagation: PropagationMode::Iterative,
        ..Default::default()
    });
    let mut parent = f.node("N0");
    f.set_position(parent, Vec3::new(1.0, 0.0, 0.0));
    let first = parent;
    for i in 1..DEPTH {
        let child = f.node(&format!("N{i}"));
        assert!(f.attach(child, parent));
        f.set_position(child, Vec3::new(1.0, 0.0, 0.0));
        parent = child;
    }

    let stats = f.update();

    assert_eq!(stats.propagated, DEPTH);
    assert_eq!(f.world_position(first), Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(f.world_position(parent), Vec3::new(DEPTH as f32, 0.0, 0.0));
}

#[test]
fn render_dispatches_in_registry_order() {
    let mut world = World::new();
    let mut scene = SceneGraph::new();
    let names = ["First", "Second", "Third"];
    let handles: Vec<EntityHandle> = names
        .iter()
        .map(|name| world.spawn(Actor::new(*name).with_mesh(MeshComponent::quad("quad"))))
        .collect();
    // Hierarchy order does not affect dispatch order
    scene.attach(&mut world, handles[0], handles[2]);
    scene.add_entity(&mut world, handles[1]);

    let mut draws = DrawList::new();
    scene.update(&mut world, 0.016, &mut draws);
    scene.render(&mut world, &mut draws);

    let labels: Vec<&str> = draws.commands().iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, vec!["First", "Third", "Second"]);
}

#[test]
fn render_ignores_active_flag() {
    let mut world = World::new();
    let mut scene = SceneGraph::new();
    let shown = world.spawn(Actor::new("Shown").with_mesh(MeshComponent::quad("quad")));
    let hidden = world.spawn(Actor::new("Hidden").with_mesh(MeshComponent::quad("quad")));
    scene.add_entity(&mut world, shown);
    scene.add_entity(&mut world, hidden);
    world.get_mut(hidden).unwrap().set_active(false);

    let mut draws = DrawList::new();
    scene.render(&mut world, &mut draws);

    let labels: Vec<&str> = draws.commands().iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, vec!["Shown", "Hidden"]);
}

#[test]
fn dangling_handles_are_skipped_and_counted() {
    let (mut f, r, a, b) = Fixture::chain();
    f.set_position(r, Vec3::new(1.0, 0.0, 0.0));
    f.world.despawn(a);

    let stats = f.update();

    assert_eq!(stats.dangling, 1);
    assert_eq!(stats.updated, 2);
    // B's parent no longer resolves, so it is propagated as a root
    assert_eq!(f.world_position(b), Vec3::ZERO);
    assert_eq!(f.scene.roots(&f.world), vec![r, b]);
}

// ============================================================================
// Diagnostics
// ============================================================================

#[test]
fn validate_accepts_consistent_graph() {
    let (f, _r, _a, _b) = Fixture::chain();
    assert!(f.scene.validate(&f.world).is_ok());
}

#[test]
fn validate_reports_dangling_entity() {
    let (mut f, _r, a, _b) = Fixture::chain();
    f.world.despawn(a);

    let err = f.scene.validate(&f.world).unwrap_err();
    assert!(matches!(err, SceneError::DanglingEntity(h) if h == a));
}

#[test]
fn validate_reports_one_sided_link() {
    let (mut f, _r, a, b) = Fixture::chain();
    f.world
        .component_mut::<HierarchyComponent>(a)
        .unwrap()
        .remove_child(b);

    let err = f.scene.validate(&f.world).unwrap_err();
    assert!(matches!(
        err,
        SceneError::InconsistentLink { parent, child } if parent == a && child == b
    ));
}

#[test]
fn validate_reports_unregistered_link() {
    let (mut f, _r, _a, b) = Fixture::chain();
    let loose = f.world.spawn(SceneNode::new("Loose"));
    f.world.get_mut(loose).unwrap().add_component(HierarchyComponent::new());
    f.world
        .component_mut::<HierarchyComponent>(b)
        .unwrap()
        .add_child(loose);

    let err = f.scene.validate(&f.world).unwrap_err();
    assert!(matches!(err, SceneError::UnregisteredEntity(h) if h == loose));
}

#[test]
fn validate_reports_cycle() {
    let (mut f, r, _a, b) = Fixture::chain();
    // A consistent but cyclic R -> A -> B -> R, built behind the graph's back
    f.world
        .component_mut::<HierarchyComponent>(r)
        .unwrap()
        .set_parent(Some(b));
    f.world
        .component_mut::<HierarchyComponent>(b)
        .unwrap()
        .add_child(r);

    let err = f.scene.validate(&f.world).unwrap_err();
    assert!(matches!(err, SceneError::Cycle(_)));
}

#[test]
fn prune_dangling_cleans_registry_and_links() {
    let (mut f, r, a, b) = Fixture::chain();
    f.world.despawn(a);

    assert_eq!(f.scene.prune_dangling(&mut f.world), 1);
    assert_eq!(f.scene.entities(), &[r, b]);
    assert!(f.children(r).is_empty());
    assert_eq!(f.parent(b), None);
    assert!(f.scene.validate(&f.world).is_ok());
    assert_eq!(f.scene.prune_dangling(&mut f.world), 0);
}

#[test]
fn descendants_are_depth_first_pre_order() {
    let (mut f, r, a, b) = Fixture::chain();
    let c = f.node("C");
    let d = f.node("D");
    assert!(f.attach(c, r));
    assert!(f.attach(d, a));

    assert_eq!(f.scene.descendants(&f.world, r), vec![a, b, d, c]);
    assert_eq!(f.scene.descendants(&f.world, a), vec![b, d]);
    assert!(f.scene.descendants(&f.world, b).is_empty());
    assert_eq!(f.scene.roots(&f.world), vec![r]);
}
