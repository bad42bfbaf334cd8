// Procedural mesh types and triangulation.
//
// Pipeline:
//   Primitive::build() → PolyMesh → triangulate_smooth() → RenderMesh → GPU
//   SkinnedMesh        → PolyMesh + SkinInfluence → SkinnedRenderMesh → GPU

use glam::{Vec2, Vec3};

// ============================================================================
// GPU VERTEX
// ============================================================================

/// GPU-ready vertex with position, normal and texture coordinate.
///   @location(0) position: vec3<f32>
///   @location(1) normal:   vec3<f32>
///   @location(2) uv:       vec2<f32>
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuVertex {
    pub position: [f32; 3],
    pub normal:   [f32; 3],
    pub uv:       [f32; 2],
}

impl GpuVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GpuVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// GPU vertex for linear-blend skinning.
///   @location(3) joints:  vec4<u32>  (Uint16x4)
///   @location(4) weights: vec4<f32>
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SkinnedGpuVertex {
    pub position: [f32; 3],
    pub normal:   [f32; 3],
    pub uv:       [f32; 2],
    pub joints:   [u16; 4],
    pub weights:  [f32; 4],
}

impl SkinnedGpuVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x2,
        3 => Uint16x4,
        4 => Float32x4
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SkinnedGpuVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

// ============================================================================
// POLY MESH
// ============================================================================

/// Intermediate polygon mesh for procedural manipulation.
/// Supports n-gon faces (arbitrary vertex count per face).
/// Faces use CCW winding when viewed from the front side.
/// `uvs` is either empty or parallel to `positions`.
#[derive(Debug, Clone, Default)]
pub struct PolyMesh {
    pub positions: Vec<Vec3>,
    pub uvs:       Vec<Vec2>,
    pub faces:     Vec<Vec<usize>>,  // each face = CCW-ordered vertex index list
}

impl PolyMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex and return its index.
    pub fn add_vertex(&mut self, pos: Vec3) -> usize {
        let idx = self.positions.len();
        self.positions.push(pos);
        idx
    }

    /// Add a vertex with a texture coordinate and return its index.
    pub fn add_vertex_uv(&mut self, pos: Vec3, uv: Vec2) -> usize {
        debug_assert_eq!(self.uvs.len(), self.positions.len(), "mixing vertices with and without uv");
        self.uvs.push(uv);
        self.add_vertex(pos)
    }

    /// Add a face by vertex indices (CCW order).
    pub fn add_face(&mut self, indices: Vec<usize>) {
        debug_assert!(indices.len() >= 3, "Face must have at least 3 vertices");
        self.faces.push(indices);
    }

    pub fn vertex_count(&self) -> usize { self.positions.len() }

    pub fn face_count(&self) -> usize { self.faces.len() }

    /// Axis-aligned bounds as (min, max). `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.positions.first()?;
        Some(self.positions.iter().fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p))))
    }
}

// ============================================================================
// RENDER MESH
// ============================================================================

/// GPU-ready triangulated mesh with per-vertex normals.
/// Vertices are shared across triangles via the index buffer (smooth normals).
/// Upload vertex_bytes() to a VERTEX buffer, index_bytes() to an INDEX buffer.
pub struct RenderMesh {
    pub vertices: Vec<GpuVertex>,
    pub indices:  Vec<u32>,
}

impl RenderMesh {
    /// Cast vertex slice to raw bytes for wgpu buffer upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Cast index slice to raw bytes for wgpu buffer upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    pub fn index_count(&self) -> usize  { self.indices.len() }
}

/// Skinned counterpart of `RenderMesh`.
pub struct SkinnedRenderMesh {
    pub vertices: Vec<SkinnedGpuVertex>,
    pub indices:  Vec<u32>,
}

impl SkinnedRenderMesh {
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    pub fn index_count(&self) -> usize  { self.indices.len() }
}

// ============================================================================
// TRIANGULATION + SMOOTH NORMALS
// ============================================================================

/// Convert a PolyMesh to a GPU-ready RenderMesh using smooth (area-weighted) normals.
///
/// Algorithm:
///   1. Accumulate area-weighted face normals into each vertex's normal accumulator.
///      The cross product magnitude = 2×triangle_area, giving automatic area-weighting.
///   2. Normalize each accumulated normal.
///   3. Fan-triangulate each face (from vertex 0).
///   4. Build the index buffer referencing shared GpuVertex entries.
pub fn triangulate_smooth(poly: &PolyMesh) -> RenderMesh {
    let n_verts = poly.vertex_count();

    // Step 1: Accumulate area-weighted normals per vertex
    let mut normal_accum: Vec<Vec3> = vec![Vec3::ZERO; n_verts];

    for face in &poly.faces {
        let n = face.len();
        // Fan triangulate from vertex 0
        for i in 1..(n - 1) {
            let a = poly.positions[face[0]];
            let b = poly.positions[face[i]];
            let c = poly.positions[face[i + 1]];
            // Unnormalized: magnitude encodes 2×area (area-weighting)
            let weighted_normal = (b - a).cross(c - a);
            normal_accum[face[0]]     += weighted_normal;
            normal_accum[face[i]]     += weighted_normal;
            normal_accum[face[i + 1]] += weighted_normal;
        }
    }

    // Step 2: Build GpuVertex per PolyMesh position
    let vertices: Vec<GpuVertex> = poly.positions.iter()
        .zip(normal_accum.iter())
        .enumerate()
        .map(|(i, (pos, n))| GpuVertex {
            position: pos.to_array(),
            normal:   n.normalize_or_zero().to_array(),
            uv:       poly.uvs.get(i).copied().unwrap_or(Vec2::ZERO).to_array(),
        })
        .collect();

    // Step 3 & 4: Fan-triangulate faces to build index buffer
    let mut indices: Vec<u32> = Vec::new();
    for face in &poly.faces {
        let n = face.len();
        for i in 1..(n - 1) {
            indices.push(face[0]     as u32);
            indices.push(face[i]     as u32);
            indices.push(face[i + 1] as u32);
        }
    }

    RenderMesh { vertices, indices }
}
