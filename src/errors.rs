//! Error Types
//!
//! Hierarchy mutations (`attach`, `detach`, ...) report failure through a
//! plain `bool`, so [`SceneError`] only shows up where a caller asks for a
//! diagnosis: [`SceneGraph::validate`](crate::SceneGraph::validate) and
//! settings parsing.
//!
//! ```rust,ignore
//! use monaco::errors::{Result, SceneError};
//!
//! fn check(scene: &SceneGraph, world: &World) -> Result<()> {
//!     scene.validate(world)?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

use crate::ecs::{ComponentKind, EntityHandle};

/// The main error type of the engine core.
#[derive(Error, Debug)]
pub enum SceneError {
    // ========================================================================
    // Registry Errors
    // ========================================================================
    /// A handle held by the scene graph no longer resolves in the world.
    ///
    /// This is what happens when an entity is despawned without being
    /// removed from the scene graph first.
    #[error("Entity {0:?} is referenced by the scene graph but no longer exists in the world")]
    DanglingEntity(EntityHandle),

    /// A handle is referenced by a hierarchy link but was never registered.
    #[error("Entity {0:?} is referenced by the hierarchy but is not registered")]
    UnregisteredEntity(EntityHandle),

    /// A registered entity lacks one of the components registration guarantees.
    #[error("Entity {entity:?} is missing its {kind:?} component")]
    MissingComponent {
        /// The offending entity
        entity: EntityHandle,
        /// The component kind that was expected
        kind: ComponentKind,
    },

    // ========================================================================
    // Hierarchy Errors
    // ========================================================================
    /// Parent back-reference and child list disagree.
    #[error("Hierarchy link between parent {parent:?} and child {child:?} is one-sided")]
    InconsistentLink {
        /// Parent side of the link
        parent: EntityHandle,
        /// Child side of the link
        child: EntityHandle,
    },

    /// The same child appears more than once in a child list.
    #[error("Entity {child:?} is listed more than once under parent {parent:?}")]
    DuplicateChild {
        /// Owner of the child list
        parent: EntityHandle,
        /// The repeated child
        child: EntityHandle,
    },

    /// Following parent links from the entity leads back to it.
    #[error("Entity {0:?} is its own ancestor")]
    Cycle(EntityHandle),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Settings could not be parsed.
    #[error("Invalid settings: {0}")]
    InvalidSettings(#[from] serde_json::Error),
}

/// Alias for `Result<T, SceneError>`.
pub type Result<T> = std::result::Result<T, SceneError>;
