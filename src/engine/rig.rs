// Segmented rig: a linear bone chain bound to a skinned cylinder.
//
// The body is split into `segment_count` spans of `segment_height` along +Y.
// One bone sits on every span boundary (segment_count + 1 bones), bone 0 at
// the bottom. Each vertex is weighted between the bone at or below it and
// the next one up, linearly by its height inside the span.
//
// Bones live in an arena (`BoneChain`) and point at their parent by index.
// Parents always precede their children, so forward kinematics is one pass.

use glam::{Mat4, Quat, Vec3};

use super::components::Transform;
use super::error::RigError;
use super::mesh::{triangulate_smooth, PolyMesh, SkinnedGpuVertex, SkinnedRenderMesh};
use super::primitives::Primitive;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Radial subdivisions of the body cylinder.
pub const RADIUS_SEGMENTS: u32 = 20;

/// Cylinder rings per bone span, so each bone bends more than one ring.
pub const RINGS_PER_SEGMENT: u32 = 3;

// ============================================================================
// SIZING
// ============================================================================

/// Validated segment layout shared by the geometry and the bone chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigSizing {
    segment_height: f32,
    segment_count:  u32,
}

impl RigSizing {
    pub fn new(segment_height: f32, segment_count: u32) -> Result<Self, RigError> {
        if segment_count == 0 {
            return Err(RigError::NoSegments);
        }
        // Joint indices are 16-bit and the chain has one more bone than segments
        if segment_count >= u16::MAX as u32 {
            return Err(RigError::TooManySegments(segment_count));
        }
        if !(segment_height.is_finite() && segment_height > 0.0) {
            return Err(RigError::SegmentHeight(segment_height));
        }
        Ok(Self { segment_height, segment_count })
    }

    pub fn segment_height(&self) -> f32 { self.segment_height }
    pub fn segment_count(&self) -> u32 { self.segment_count }
    pub fn bone_count(&self) -> usize { self.segment_count as usize + 1 }

    pub fn height(&self) -> f32 {
        self.segment_height * self.segment_count as f32
    }

    pub fn half_height(&self) -> f32 {
        self.height() * 0.5
    }
}

/// Radii of the body cylinder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylinderParams {
    pub radius_top:    f32,
    pub radius_bottom: f32,
}

impl Default for CylinderParams {
    fn default() -> Self {
        Self { radius_top: 5.0, radius_bottom: 5.0 }
    }
}

impl CylinderParams {
    fn validate(&self) -> Result<(), RigError> {
        for r in [self.radius_top, self.radius_bottom] {
            if !(r.is_finite() && r >= 0.0) {
                return Err(RigError::Radius(r));
            }
        }
        Ok(())
    }
}

// ============================================================================
// SKIN WEIGHTS
// ============================================================================

/// Four-slot skinning attribute. Only slots 0 and 1 are ever used.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkinInfluence {
    pub indices: [u16; 4],
    pub weights: [f32; 4],
}

impl SkinInfluence {
    pub fn primary(&self) -> (u16, f32) {
        (self.indices[0], self.weights[0])
    }

    pub fn secondary(&self) -> (u16, f32) {
        (self.indices[1], self.weights[1])
    }
}

/// Bone indices and weights for a vertex at local height `y` (centred body).
///
/// Heights outside the body are clamped to its ends. The top boundary has no
/// bone above it, so its secondary index repeats the primary with weight 0.
pub fn skin_influence(y: f32, sizing: &RigSizing) -> SkinInfluence {
    let rebased = (y + sizing.half_height()).clamp(0.0, sizing.height());
    let t = rebased / sizing.segment_height;
    let span = t.floor();
    let primary = (span as u32).min(sizing.segment_count);
    let secondary = (primary + 1).min(sizing.segment_count);
    let weight = (t - span).clamp(0.0, 1.0);

    SkinInfluence {
        indices: [primary as u16, secondary as u16, 0, 0],
        weights: [1.0 - weight, weight, 0.0, 0.0],
    }
}

// ============================================================================
// BONE CHAIN
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Bone {
    pub name:   String,
    parent:     Option<usize>,
    pub local:  Transform,
}

impl Bone {
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }
}

/// Arena of bones; every parent index is smaller than its child's index.
#[derive(Debug, Clone, PartialEq)]
pub struct BoneChain {
    bones: Vec<Bone>,
}

impl BoneChain {
    /// Linear chain for `sizing`: root at the bottom, each child one segment up.
    pub fn segmented(sizing: &RigSizing) -> Self {
        let mut bones = Vec::with_capacity(sizing.bone_count());
        bones.push(Bone {
            name:   "bone_0".to_string(),
            parent: None,
            local:  Transform::from_translation(Vec3::new(0.0, -sizing.half_height(), 0.0)),
        });
        for i in 1..sizing.bone_count() {
            bones.push(Bone {
                name:   format!("bone_{i}"),
                parent: Some(i - 1),
                local:  Transform::from_translation(Vec3::new(0.0, sizing.segment_height, 0.0)),
            });
        }
        Self { bones }
    }

    pub fn len(&self) -> usize { self.bones.len() }
    pub fn is_empty(&self) -> bool { self.bones.is_empty() }
    pub fn bones(&self) -> &[Bone] { &self.bones }

    pub fn bone(&self, index: usize) -> Option<&Bone> {
        self.bones.get(index)
    }

    /// Local transform of a bone, free to pose after binding. Weights are
    /// never re-derived and the chain's parent links stay fixed.
    pub fn local_mut(&mut self, index: usize) -> Option<&mut Transform> {
        self.bones.get_mut(index).map(|bone| &mut bone.local)
    }

    pub fn set_rotation(&mut self, index: usize, rotation: Quat) -> bool {
        match self.local_mut(index) {
            Some(local) => {
                local.rotation = rotation;
                true
            }
            None => false,
        }
    }

    /// Model-space matrix of every bone.
    pub fn world_matrices(&self) -> Vec<Mat4> {
        let mut world: Vec<Mat4> = Vec::with_capacity(self.bones.len());
        for bone in &self.bones {
            let local = bone.local.to_matrix();
            let m = match bone.parent {
                Some(p) => world[p] * local,
                None => local,
            };
            world.push(m);
        }
        world
    }
}

// ============================================================================
// SKELETON
// ============================================================================

/// Bone chain plus the inverse bind matrices captured when it was bound.
#[derive(Debug, Clone)]
pub struct Skeleton {
    chain:        BoneChain,
    inverse_bind: Vec<Mat4>,
}

impl Skeleton {
    /// Bind using the chain's current pose as the bind pose.
    pub fn bind(chain: BoneChain) -> Self {
        let inverse_bind = chain.world_matrices().iter().map(Mat4::inverse).collect();
        Self { chain, inverse_bind }
    }

    pub fn chain(&self) -> &BoneChain { &self.chain }
    pub fn chain_mut(&mut self) -> &mut BoneChain { &mut self.chain }
    pub fn inverse_bind_matrices(&self) -> &[Mat4] { &self.inverse_bind }

    /// Skinning matrices (current world × inverse bind). Identity in bind pose.
    pub fn bone_matrices(&self) -> Vec<Mat4> {
        self.chain.world_matrices()
            .iter()
            .zip(&self.inverse_bind)
            .map(|(world, inverse)| *world * *inverse)
            .collect()
    }
}

// ============================================================================
// SKINNED MESH
// ============================================================================

#[derive(Debug, Clone)]
pub struct SkinnedMesh {
    pub sizing:     RigSizing,
    pub mesh:       PolyMesh,
    /// Parallel to `mesh.positions`.
    pub influences: Vec<SkinInfluence>,
    pub skeleton:   Skeleton,
}

impl SkinnedMesh {
    /// CPU linear-blend skinning of every vertex with the current pose.
    pub fn deform(&self) -> Vec<Vec3> {
        let matrices = self.skeleton.bone_matrices();
        self.mesh.positions.iter()
            .zip(&self.influences)
            .map(|(&p, influence)| {
                influence.indices.iter()
                    .zip(influence.weights)
                    .filter(|(_, w)| *w > 0.0)
                    .map(|(&i, w)| matrices[i as usize].transform_point3(p) * w)
                    .sum::<Vec3>()
            })
            .collect()
    }

    /// Rest geometry with skinning attributes, ready for upload.
    pub fn to_render_mesh(&self) -> SkinnedRenderMesh {
        let base = triangulate_smooth(&self.mesh);
        let vertices = base.vertices.iter()
            .zip(&self.influences)
            .map(|(v, influence)| SkinnedGpuVertex {
                position: v.position,
                normal:   v.normal,
                uv:       v.uv,
                joints:   influence.indices,
                weights:  influence.weights,
            })
            .collect();
        SkinnedRenderMesh { vertices, indices: base.indices }
    }
}

// ============================================================================
// BUILDER
// ============================================================================

pub struct SegmentedRigBuilder {
    sizing:   RigSizing,
    cylinder: CylinderParams,
}

impl SegmentedRigBuilder {
    pub fn new(sizing: RigSizing, cylinder: CylinderParams) -> Result<Self, RigError> {
        cylinder.validate()?;
        Ok(Self { sizing, cylinder })
    }

    pub fn build(&self) -> SkinnedMesh {
        let mesh = self.geometry();
        let influences: Vec<SkinInfluence> = mesh.positions.iter()
            .map(|p| skin_influence(p.y, &self.sizing))
            .collect();
        let skeleton = Skeleton::bind(BoneChain::segmented(&self.sizing));

        log::debug!(
            "rig built: {} vertices, {} bones, height {}",
            mesh.vertex_count(),
            skeleton.chain().len(),
            self.sizing.height()
        );

        SkinnedMesh { sizing: self.sizing, mesh, influences, skeleton }
    }

    fn geometry(&self) -> PolyMesh {
        Primitive::Cylinder {
            radius_top:      self.cylinder.radius_top,
            radius_bottom:   self.cylinder.radius_bottom,
            height:          self.sizing.height(),
            radial_segments: RADIUS_SEGMENTS,
            height_segments: self.sizing.segment_count * RINGS_PER_SEGMENT,
            open_ended:      true,
        }.build()
    }
}
