//! Boundary to the graphics layer.
//!
//! The scene core never talks to a GPU. Entities hand draw requests to a
//! [`RenderContext`] during the render phase; whatever implements it (a
//! device context wrapper, a test recorder) decides what to do with them.

pub mod context;
pub mod uniforms;

pub use context::{DrawCommand, DrawList, RenderContext};
pub use uniforms::ObjectUniforms;
