//! Scene Settings
//!
//! Knobs of the per-frame scene pass.
//!
//! ```rust,ignore
//! use monaco::scene::{PropagationMode, SceneSettings};
//!
//! // Default: iterative propagation, warn about dangling handles
//! let settings = SceneSettings::default();
//!
//! let settings = SceneSettings {
//!     propagation: PropagationMode::Recursive,
//!     ..Default::default()
//! };
//!
//! // Or from a JSON config file
//! let settings = SceneSettings::from_json(r#"{ "warn_on_dangling": false }"#)?;
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::Result;

// ---------------------------------------------------------------------------
// PropagationMode
// ---------------------------------------------------------------------------

/// How world matrices are pushed down the hierarchy.
///
/// Both strategies visit nodes in the same depth-first pre-order and produce
/// identical results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PropagationMode {
    /// Explicit work stack. Depth is bounded only by memory.
    #[default]
    Iterative,
    /// One call frame per level. Very deep chains can exhaust the thread stack.
    Recursive,
}

// ---------------------------------------------------------------------------
// SceneSettings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    /// World-matrix propagation strategy. See [`PropagationMode`].
    pub propagation: PropagationMode,

    /// Log a warning each time a registered handle fails to resolve during
    /// update or render.
    ///
    /// Dangling handles are skipped either way; turn this off when despawning
    /// without unregistering is intentional and
    /// [`prune_dangling`](crate::SceneGraph::prune_dangling) runs later.
    pub warn_on_dangling: bool,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            propagation: PropagationMode::default(),
            warn_on_dangling: true,
        }
    }
}

impl SceneSettings {
    /// Parses settings from JSON. Missing fields take their default value.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
