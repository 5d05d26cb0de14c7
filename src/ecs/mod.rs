//! Entity-Component model
//!
//! - [`Component`]: capability unit attached to an entity, tagged with a [`ComponentKind`]
//! - [`Components`]: per-entity component storage with O(1) typed lookup
//! - [`Entity`]: polymorphic lifecycle contract driven by the world and the scene graph
//! - [`World`]: arena that owns entity memory, addressed by [`EntityHandle`]
//! - [`Actor`]: renderable entity submitting draw commands
//! - [`MeshComponent`] / [`MaterialComponent`]: render-facing data components

pub mod actor;
pub mod component;
pub mod entity;
pub mod mesh;
pub mod storage;
pub mod world;

pub use actor::Actor;
pub use component::{Component, ComponentKind};
pub use entity::{Entity, EntityCore, EntityHandle, SceneNode};
pub use mesh::{MaterialComponent, MeshComponent, Vertex};
pub use storage::Components;
pub use world::World;
