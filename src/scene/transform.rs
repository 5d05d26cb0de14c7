use glam::{Mat4, Vec3};

use crate::ecs::{Component, ComponentKind};

/// Transform component
///
/// Holds the local position, rotation (Euler angles in radians) and scale of
/// an entity, the local matrix derived from them and the world matrix written
/// by the scene graph's propagation pass.
///
/// The local matrix is recomputed on every [`update`](Component::update),
/// unconditionally. Setters only change the TRS state, so the matrix read
/// between a setter and the next update is the previous frame's.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    position: Vec3,
    /// Euler angles in radians, applied X then Y then Z.
    rotation: Vec3,
    scale: Vec3,

    matrix: Mat4,
    world_matrix: Mat4,
}

impl Transform {
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,

            matrix: Mat4::IDENTITY,
            world_matrix: Mat4::IDENTITY,
        }
    }

    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::new()
        }
    }

    // ========================================================================
    // Matrix composition
    // ========================================================================

    /// Builds a local matrix from TRS state.
    ///
    /// Reading left to right with row vectors this is
    /// `Scale × RotX × RotY × RotZ × Translate`; in glam's column-vector
    /// convention the same transform is `T · Rz · Ry · Rx · S`. Each axis is
    /// rotated separately instead of going through a combined Euler
    /// conversion, so gizmo manipulation of one axis stays predictable.
    #[must_use]
    pub fn compose(position: Vec3, rotation: Vec3, scale: Vec3) -> Mat4 {
        Mat4::from_translation(position)
            * Mat4::from_rotation_z(rotation.z)
            * Mat4::from_rotation_y(rotation.y)
            * Mat4::from_rotation_x(rotation.x)
            * Mat4::from_scale(scale)
    }

    // ========================================================================
    // Getters & Setters
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    #[must_use]
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    #[inline]
    #[must_use]
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Sets the Euler rotation, in radians.
    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
    }

    pub fn set_transform(&mut self, position: Vec3, rotation: Vec3, scale: Vec3) {
        self.position = position;
        self.rotation = rotation;
        self.scale = scale;
    }

    /// Moves the entity relative to its current local position.
    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
    }

    /// Local matrix as of the last update.
    #[inline]
    #[must_use]
    pub fn matrix(&self) -> &Mat4 {
        &self.matrix
    }

    /// World matrix as of the last propagation pass.
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Mat4 {
        &self.world_matrix
    }

    #[inline]
    #[must_use]
    pub fn world_position(&self) -> Vec3 {
        self.world_matrix.w_axis.truncate()
    }

    pub(crate) fn set_world_matrix(&mut self, world: Mat4) {
        self.world_matrix = world;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for Transform {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Transform
    }

    /// Resets scale to one and both matrices to identity.
    fn init(&mut self) {
        self.scale = Vec3::ONE;
        self.matrix = Mat4::IDENTITY;
        self.world_matrix = Mat4::IDENTITY;
    }

    fn update(&mut self, _delta_time: f32) {
        self.matrix = Self::compose(self.position, self.rotation, self.scale);
    }
}
