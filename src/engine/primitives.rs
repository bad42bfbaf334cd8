// Parametric primitives.
//
// Vertex order and UV layout match the conventional scene-graph primitives
// (plane, box, ring, cylinder), so per-vertex attributes computed elsewhere
// (skin weights, displacement sampling) can index the output directly.

use glam::{Vec2, Vec3};
use super::mesh::PolyMesh;

/// Description of a parametric shape. `build()` turns it into geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// Rectangle centred on the origin in the XY plane, facing +Z.
    Plane {
        width:           f32,
        height:          f32,
        width_segments:  u32,
        height_segments: u32,
    },
    /// Axis-aligned box centred on the origin.
    Box {
        width:  f32,
        height: f32,
        depth:  f32,
    },
    /// Flat annulus sector in the XY plane, facing +Z.
    RingSector {
        inner_radius:   f32,
        outer_radius:   f32,
        theta_segments: u32,
        phi_segments:   u32,
        theta_start:    f32,
        theta_length:   f32,
    },
    /// Cylinder (or frustum) along Y, centred on the origin.
    Cylinder {
        radius_top:      f32,
        radius_bottom:   f32,
        height:          f32,
        radial_segments: u32,
        height_segments: u32,
        open_ended:      bool,
    },
}

impl Primitive {
    pub fn plane(width: f32, height: f32) -> Self {
        Self::Plane { width, height, width_segments: 1, height_segments: 1 }
    }

    pub fn build(&self) -> PolyMesh {
        match *self {
            Self::Plane { width, height, width_segments, height_segments } =>
                build_plane(width, height, width_segments, height_segments),
            Self::Box { width, height, depth } =>
                build_box(width, height, depth),
            Self::RingSector { inner_radius, outer_radius, theta_segments, phi_segments, theta_start, theta_length } =>
                build_ring_sector(inner_radius, outer_radius, theta_segments, phi_segments, theta_start, theta_length),
            Self::Cylinder { radius_top, radius_bottom, height, radial_segments, height_segments, open_ended } =>
                build_cylinder(radius_top, radius_bottom, height, radial_segments, height_segments, open_ended),
        }
    }
}

// ============================================================================
// PLANE
// ============================================================================

/// Rows run from the top edge (+Y) downwards; UV v is 1 on the top row.
fn build_plane(width: f32, height: f32, width_segments: u32, height_segments: u32) -> PolyMesh {
    let grid_x = width_segments.max(1) as usize;
    let grid_y = height_segments.max(1) as usize;
    let seg_w = width / grid_x as f32;
    let seg_h = height / grid_y as f32;

    let mut mesh = PolyMesh::new();
    for iy in 0..=grid_y {
        let y = iy as f32 * seg_h - height * 0.5;
        for ix in 0..=grid_x {
            let x = ix as f32 * seg_w - width * 0.5;
            mesh.add_vertex_uv(
                Vec3::new(x, -y, 0.0),
                Vec2::new(ix as f32 / grid_x as f32, 1.0 - iy as f32 / grid_y as f32),
            );
        }
    }

    let row = grid_x + 1;
    for iy in 0..grid_y {
        for ix in 0..grid_x {
            let a = ix + row * iy;
            let b = ix + row * (iy + 1);
            let c = (ix + 1) + row * (iy + 1);
            let d = (ix + 1) + row * iy;
            mesh.add_face(vec![a, b, c, d]);
        }
    }
    mesh
}

// ============================================================================
// BOX
// ============================================================================

/// 8 shared corners, CCW quads viewed from outside.
///
/// Vertex layout (half extents hx, hy, hz):
///   0: (-x, -y, +z)  front-bottom-left
///   1: (+x, -y, +z)  front-bottom-right
///   2: (+x, +y, +z)  front-top-right
///   3: (-x, +y, +z)  front-top-left
///   4: (+x, -y, -z)  back-bottom-right
///   5: (-x, -y, -z)  back-bottom-left
///   6: (-x, +y, -z)  back-top-left
///   7: (+x, +y, -z)  back-top-right
fn build_box(width: f32, height: f32, depth: f32) -> PolyMesh {
    let (hx, hy, hz) = (width * 0.5, height * 0.5, depth * 0.5);

    let mut mesh = PolyMesh::new();
    mesh.add_vertex(Vec3::new(-hx, -hy,  hz));
    mesh.add_vertex(Vec3::new( hx, -hy,  hz));
    mesh.add_vertex(Vec3::new( hx,  hy,  hz));
    mesh.add_vertex(Vec3::new(-hx,  hy,  hz));
    mesh.add_vertex(Vec3::new( hx, -hy, -hz));
    mesh.add_vertex(Vec3::new(-hx, -hy, -hz));
    mesh.add_vertex(Vec3::new(-hx,  hy, -hz));
    mesh.add_vertex(Vec3::new( hx,  hy, -hz));

    mesh.add_face(vec![0, 1, 2, 3]); // front  (+Z)
    mesh.add_face(vec![4, 5, 6, 7]); // back   (-Z)
    mesh.add_face(vec![5, 0, 3, 6]); // left   (-X)
    mesh.add_face(vec![1, 4, 7, 2]); // right  (+X)
    mesh.add_face(vec![3, 2, 7, 6]); // top    (+Y)
    mesh.add_face(vec![5, 4, 1, 0]); // bottom (-Y)
    mesh
}

// ============================================================================
// RING SECTOR
// ============================================================================

/// Rings run from the inner radius outwards, each ring from `theta_start`
/// to `theta_start + theta_length`.
fn build_ring_sector(
    inner_radius: f32,
    outer_radius: f32,
    theta_segments: u32,
    phi_segments: u32,
    theta_start: f32,
    theta_length: f32,
) -> PolyMesh {
    let theta_segments = theta_segments.max(3) as usize;
    let phi_segments = phi_segments.max(1) as usize;
    let radius_step = (outer_radius - inner_radius) / phi_segments as f32;

    let mut mesh = PolyMesh::new();
    for j in 0..=phi_segments {
        let radius = inner_radius + j as f32 * radius_step;
        for i in 0..=theta_segments {
            let angle = theta_start + i as f32 / theta_segments as f32 * theta_length;
            let p = Vec3::new(radius * angle.cos(), radius * angle.sin(), 0.0);
            let uv = Vec2::new((p.x / outer_radius + 1.0) * 0.5, (p.y / outer_radius + 1.0) * 0.5);
            mesh.add_vertex_uv(p, uv);
        }
    }

    let ring = theta_segments + 1;
    for j in 0..phi_segments {
        for i in 0..theta_segments {
            let a = i + j * ring;
            let b = a + ring;
            let c = a + ring + 1;
            let d = a + 1;
            mesh.add_face(vec![a, b, c, d]);
        }
    }
    mesh
}

// ============================================================================
// CYLINDER
// ============================================================================

/// Side rows run from the top (y = +height/2) to the bottom; each row has
/// `radial_segments + 1` vertices (the seam is duplicated for UVs).
/// Closed cylinders append a centre vertex plus a ring per cap.
fn build_cylinder(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    radial_segments: u32,
    height_segments: u32,
    open_ended: bool,
) -> PolyMesh {
    let radial = radial_segments.max(3) as usize;
    let rows = height_segments.max(1) as usize;
    let half_height = height * 0.5;

    let mut mesh = PolyMesh::new();
    for y in 0..=rows {
        let v = y as f32 / rows as f32;
        let radius = v * (radius_bottom - radius_top) + radius_top;
        for x in 0..=radial {
            let u = x as f32 / radial as f32;
            let theta = u * std::f32::consts::TAU;
            mesh.add_vertex_uv(
                Vec3::new(radius * theta.sin(), -v * height + half_height, radius * theta.cos()),
                Vec2::new(u, 1.0 - v),
            );
        }
    }

    let row = radial + 1;
    for x in 0..radial {
        for y in 0..rows {
            let a = y * row + x;
            let b = (y + 1) * row + x;
            let c = (y + 1) * row + x + 1;
            let d = y * row + x + 1;
            mesh.add_face(vec![a, b, c, d]);
        }
    }

    if !open_ended {
        if radius_top > 0.0 {
            add_cap(&mut mesh, radius_top, half_height, radial, true);
        }
        if radius_bottom > 0.0 {
            add_cap(&mut mesh, radius_bottom, -half_height, radial, false);
        }
    }
    mesh
}

fn add_cap(mesh: &mut PolyMesh, radius: f32, y: f32, radial: usize, top: bool) {
    let center = mesh.add_vertex_uv(Vec3::new(0.0, y, 0.0), Vec2::splat(0.5));
    let first = mesh.vertex_count();
    for x in 0..=radial {
        let theta = x as f32 / radial as f32 * std::f32::consts::TAU;
        let (sin, cos) = theta.sin_cos();
        let uv_sign = if top { 1.0 } else { -1.0 };
        mesh.add_vertex_uv(
            Vec3::new(radius * sin, y, radius * cos),
            Vec2::new(cos * 0.5 + 0.5, sin * 0.5 * uv_sign + 0.5),
        );
    }
    for x in 0..radial {
        let (i, j) = (first + x, first + x + 1);
        // Top faces +Y, bottom faces -Y
        if top {
            mesh.add_face(vec![i, j, center]);
        } else {
            mesh.add_face(vec![j, i, center]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mesh::triangulate_smooth;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn plane_grid_layout() {
        let mesh = Primitive::Plane { width: 10.0, height: 4.0, width_segments: 5, height_segments: 2 }.build();
        assert_eq!(mesh.vertex_count(), 6 * 3);
        assert_eq!(mesh.face_count(), 10);
        // First vertex is the top-left corner
        assert_eq!(mesh.positions[0], Vec3::new(-5.0, 2.0, 0.0));
        assert_eq!(mesh.uvs[0], Vec2::new(0.0, 1.0));
        let (lo, hi) = mesh.bounds().unwrap();
        assert_eq!(lo, Vec3::new(-5.0, -2.0, 0.0));
        assert_eq!(hi, Vec3::new(5.0, 2.0, 0.0));
    }

    #[test]
    fn plane_faces_positive_z() {
        let render = triangulate_smooth(&Primitive::plane(2.0, 2.0).build());
        for v in &render.vertices {
            assert!(Vec3::from_array(v.normal).abs_diff_eq(Vec3::Z, 1e-6));
        }
    }

    #[test]
    fn box_extents_and_outward_normals() {
        let mesh = Primitive::Box { width: 2.0, height: 6.0, depth: 4.0 }.build();
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.face_count(), 6);
        let (lo, hi) = mesh.bounds().unwrap();
        assert_eq!(hi - lo, Vec3::new(2.0, 6.0, 4.0));

        // Smooth normals on a centred box point away from the centre
        for v in &triangulate_smooth(&mesh).vertices {
            let p = Vec3::from_array(v.position);
            assert!(Vec3::from_array(v.normal).dot(p) > 0.0);
        }
    }

    #[test]
    fn ring_sector_stays_in_quarter_annulus() {
        let mesh = Primitive::RingSector {
            inner_radius: 20.0,
            outer_radius: 80.0,
            theta_segments: 9,
            phi_segments: 5,
            theta_start: 0.0,
            theta_length: FRAC_PI_2,
        }.build();
        assert_eq!(mesh.vertex_count(), 10 * 6);
        assert_eq!(mesh.face_count(), 9 * 5);
        for p in &mesh.positions {
            let r = p.truncate().length();
            assert!(r > 20.0 - 1e-3 && r < 80.0 + 1e-3);
            assert!(p.x > -1e-3 && p.y > -1e-3);
        }
    }

    #[test]
    fn open_cylinder_rows_run_top_to_bottom() {
        let mesh = Primitive::Cylinder {
            radius_top: 5.0,
            radius_bottom: 5.0,
            height: 32.0,
            radial_segments: 20,
            height_segments: 12,
            open_ended: true,
        }.build();
        assert_eq!(mesh.vertex_count(), 21 * 13);
        assert_eq!(mesh.face_count(), 20 * 12);
        assert_eq!(mesh.positions[0].y, 16.0);
        assert_eq!(mesh.positions[mesh.vertex_count() - 1].y, -16.0);
        for p in &mesh.positions {
            assert!((Vec2::new(p.x, p.z).length() - 5.0).abs() < 1e-4);
        }
    }

    #[test]
    fn closed_cylinder_adds_caps() {
        let mesh = Primitive::Cylinder {
            radius_top: 1.0,
            radius_bottom: 1.0,
            height: 2.0,
            radial_segments: 8,
            height_segments: 1,
            open_ended: false,
        }.build();
        assert_eq!(mesh.vertex_count(), 9 * 2 + 2 * (1 + 9));
        assert_eq!(mesh.face_count(), 8 + 2 * 8);
    }
}
