use std::any::Any;

use crate::render::RenderContext;

/// Type tag carried by every component.
///
/// Lookup itself goes through the concrete Rust type; the tag is what
/// diagnostics, validation errors and editor listings report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Transform,
    Hierarchy,
    Mesh,
    Material,
    /// Application-defined component.
    Custom,
}

/// A capability or data unit owned by an entity.
///
/// Components are driven by their owning entity and never schedule
/// themselves. Every hook except [`kind`](Self::kind) defaults to a no-op.
pub trait Component: Any {
    /// The tag identifying this component's variant.
    fn kind(&self) -> ComponentKind;

    /// Called once after the component is attached by a system that needs it ready.
    fn init(&mut self) {}

    /// Called once per frame with the elapsed time in seconds.
    fn update(&mut self, _delta_time: f32) {}

    /// Called during the render phase.
    fn render(&mut self, _ctx: &mut dyn RenderContext) {}

    /// Releases whatever the component holds before the entity goes away.
    fn destroy(&mut self) {}

    /// Type name used in log output.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
