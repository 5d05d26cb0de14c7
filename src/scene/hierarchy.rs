use crate::ecs::{Component, ComponentKind, EntityHandle};

/// Parent/child relation of an entity.
///
/// # Hierarchy
///
/// - `parent`: handle of the parent entity (`None` for roots)
/// - `children`: ordered child handles, without duplicates
///
/// The edges are relations only; entity lifetime belongs to the
/// [`World`](crate::World). This component is a passive holder: its mutators
/// do not check for cycles and do not touch the other side of a link. Use
/// [`SceneGraph::attach`](crate::SceneGraph::attach) and
/// [`SceneGraph::detach`](crate::SceneGraph::detach), which keep both sides
/// in sync.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HierarchyComponent {
    parent: Option<EntityHandle>,
    children: Vec<EntityHandle>,
}

impl HierarchyComponent {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the parent handle, if any.
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<EntityHandle> {
        self.parent
    }

    /// Returns a read-only slice of child handles.
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[EntityHandle] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    #[inline]
    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn contains_child(&self, child: EntityHandle) -> bool {
        self.children.contains(&child)
    }

    /// Overwrites the parent back-reference.
    pub fn set_parent(&mut self, parent: Option<EntityHandle>) {
        self.parent = parent;
    }

    /// Appends a child; a handle already present is ignored.
    pub fn add_child(&mut self, child: EntityHandle) {
        if self.children.contains(&child) {
            return;
        }
        self.children.push(child);
    }

    /// Removes a child, keeping the order of the remaining ones.
    pub fn remove_child(&mut self, child: EntityHandle) {
        self.children.retain(|&c| c != child);
    }

    pub fn clear_children(&mut self) {
        self.children.clear();
    }
}

impl Component for HierarchyComponent {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Hierarchy
    }

    /// Drops both sides of every link so nothing keeps pointing at a dead entity.
    fn destroy(&mut self) {
        self.children.clear();
        self.parent = None;
    }
}
