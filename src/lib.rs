#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

//! Scene graph core of the Monaco engine.
//!
//! Entities live in a [`World`] arena and carry components. A [`SceneGraph`]
//! tracks a subset of them, keeps their parent/child links acyclic and, once
//! per frame, updates every entity before propagating world matrices from the
//! roots down.
//!
//! ```rust,ignore
//! use monaco::{DrawList, SceneGraph, SceneNode, World};
//!
//! let mut world = World::new();
//! let mut scene = SceneGraph::new();
//! let root = world.spawn(SceneNode::new("Root"));
//! let child = world.spawn(SceneNode::new("Child"));
//! assert!(scene.attach(&mut world, child, root));
//!
//! let mut draws = DrawList::new();
//! scene.update(&mut world, 1.0 / 60.0, &mut draws);
//! scene.render(&mut world, &mut draws);
//! ```

pub mod ecs;
pub mod engine;
pub mod errors;
pub mod render;
pub mod scene;
pub mod utils;

pub use ecs::{
    Actor, Component, ComponentKind, Components, Entity, EntityCore, EntityHandle, MaterialComponent,
    MeshComponent, SceneNode, Vertex, World,
};
pub use engine::{Engine, EngineSettings};
pub use errors::{Result, SceneError};
pub use render::{DrawCommand, DrawList, ObjectUniforms, RenderContext};
pub use scene::{FrameStats, HierarchyComponent, PropagationMode, SceneGraph, SceneSettings, Transform};
