// Core ECS components for the scene graph
// Generated geometry is handed to the scene as entities carrying these components

use bevy_ecs::prelude::*;
use glam::{Mat4, Quat, Vec3};

use super::primitives::Primitive;

/// Local transform of a node relative to its parent.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation:    Quat,
    pub scale:       Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation:    Quat::IDENTITY,
        scale:       Vec3::ONE,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self { translation, ..Self::IDENTITY }
    }

    pub fn from_rotation(rotation: Quat) -> Self {
        Self { rotation, ..Self::IDENTITY }
    }

    /// Move along an axis of the node's own (rotated) frame.
    /// Same semantics as `translateX/Y/Z` on a scene-graph object.
    pub fn translate_local(&mut self, offset: Vec3) {
        self.translation += self.rotation * offset;
    }

    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// World-space matrix, written by `propagate_transforms_system`.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct GlobalTransform(pub Mat4);

impl Default for GlobalTransform {
    fn default() -> Self {
        Self(Mat4::IDENTITY)
    }
}

impl GlobalTransform {
    pub fn translation(&self) -> Vec3 {
        self.0.w_axis.truncate()
    }
}

/// RGB color for rendering
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// CSS `green`, used for land cells.
    pub const LAND: Self = Self::from_hex(0x008000);
    /// CSS `grey`, used for the ground under street cells.
    pub const STREET: Self = Self::from_hex(0x808080);
    pub const ASPHALT: Self = Self::from_hex(0x696969);
    pub const BUILDING: Self = Self::from_hex(0xF4A460);
    pub const BODY: Self = Self::from_hex(0x156289);

    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }
}

/// Link from a child node to its parent.
#[derive(Component, Debug, Clone, Copy)]
pub struct ParentNode(pub Entity);

/// Ordered child list of a node.
#[derive(Component, Debug, Clone, Default)]
pub struct Children(pub Vec<Entity>);

/// Geometry attached to a node. The renderer builds the mesh from the primitive.
#[derive(Component, Debug, Clone)]
pub struct MeshPart {
    pub primitive: Primitive,
}

/// Grid coordinates of a city tile node.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileCell {
    pub col: u32,
    pub row: u32,
}

/// Marks the node that owns a skinned mesh.
#[derive(Component, Debug, Clone, Copy)]
pub struct SkinnedBody {
    pub vertex_count: usize,
    pub bone_count:   usize,
}

/// Node driven by bone `index` of the owning skeleton.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoneLink {
    pub index: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn translate_local_follows_rotation() {
        let mut t = Transform::from_rotation(Quat::from_rotation_x(FRAC_PI_2));
        t.translate_local(Vec3::new(-5.0, -5.0, -1.0));
        assert!(t.translation.abs_diff_eq(Vec3::new(-5.0, 1.0, -5.0), 1e-5));
    }

    #[test]
    fn color_from_hex_splits_channels() {
        let c = Color::from_hex(0xFF8000);
        assert_eq!(c.r, 1.0);
        assert!((c.g - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.b, 0.0);
    }
}
