//! Scene graph module
//!
//! - [`Transform`]: local TRS state, local matrix and propagated world matrix
//! - [`HierarchyComponent`]: parent/child relation of an entity
//! - [`SceneGraph`]: registry, attach/detach with cycle checks, per-frame dispatch
//! - [`transform_system`]: world-matrix propagation, decoupled from the graph
//! - [`SceneSettings`]: propagation strategy and diagnostics

pub mod hierarchy;
pub mod scene_graph;
pub mod settings;
pub mod transform;
pub mod transform_system;

pub use hierarchy::HierarchyComponent;
pub use scene_graph::{FrameStats, SceneGraph};
pub use settings::{PropagationMode, SceneSettings};
pub use transform::Transform;
