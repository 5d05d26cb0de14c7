use crate::render::uniforms::ObjectUniforms;

/// A single indexed draw request.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    /// Name of the submitting entity, for debugging and capture tools.
    pub label: String,
    /// Name of the sub-mesh being drawn.
    pub mesh: String,
    pub uniforms: ObjectUniforms,
    pub index_count: u32,
    /// Albedo texture path bound to slot 0.
    pub albedo: Option<String>,
    pub cast_shadow: bool,
}

/// Sink for everything an entity wants drawn this frame.
///
/// Passed to `update` as well so entities can stage per-frame data.
pub trait RenderContext {
    fn submit(&mut self, command: DrawCommand);
}

/// In-memory [`RenderContext`] that records draw commands in submission order.
#[derive(Debug, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Commands whose entity casts a shadow, in submission order.
    pub fn shadow_casters(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(|c| c.cast_shadow)
    }

    /// Hands the recorded commands over and starts a fresh frame.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl RenderContext for DrawList {
    fn submit(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}
