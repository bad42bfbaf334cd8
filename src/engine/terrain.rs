// Heightfield terrain: a subdivided plane displaced by a grayscale raster.
//
// The plane is built synchronously. Albedo and displacement rasters load
// through futures and are assigned to the material as each one completes.
// A failed load is logged and leaves that slot empty, the plane stays flat
// or untextured.

use std::f32::consts::FRAC_PI_2;
use std::path::Path;

use glam::{Quat, Vec3};
use image::{GrayImage, RgbaImage};

use super::components::Transform;
use super::error::TerrainError;
use super::mesh::PolyMesh;
use super::primitives::Primitive;

/// Source pixels per plane subdivision.
const PIXELS_PER_SEGMENT: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainSpec {
    pub plane_width:        f32,
    pub plane_height:       f32,
    /// Pixel size of the source rasters.
    pub image_width:        u32,
    pub image_height:       u32,
    pub displacement_scale: f32,
    pub displacement_bias:  f32,
}

impl Default for TerrainSpec {
    fn default() -> Self {
        Self::from_image_dimensions(1710, 797)
    }
}

impl TerrainSpec {
    pub fn from_image_dimensions(image_width: u32, image_height: u32) -> Self {
        Self {
            plane_width: 10.0,
            plane_height: 10.0,
            image_width,
            image_height,
            displacement_scale: 4.0,
            displacement_bias: 0.0,
        }
    }

    /// `(floor(image_width / 10), floor(image_height / 10))`
    pub fn subdivisions(&self) -> (u32, u32) {
        (self.image_width / PIXELS_PER_SEGMENT, self.image_height / PIXELS_PER_SEGMENT)
    }

    pub fn validate(&self) -> Result<(), TerrainError> {
        let ok = |v: f32| v.is_finite() && v > 0.0;
        if !ok(self.plane_width) || !ok(self.plane_height) {
            return Err(TerrainError::PlaneSize { width: self.plane_width, height: self.plane_height });
        }
        let (sx, sy) = self.subdivisions();
        if sx == 0 || sy == 0 {
            return Err(TerrainError::TooSmall { width: self.image_width, height: self.image_height });
        }
        Ok(())
    }
}

/// Texture slots and displacement parameters of the terrain.
#[derive(Debug, Clone, Default)]
pub struct TerrainMaterial {
    pub albedo:             Option<RgbaImage>,
    pub displacement:       Option<GrayImage>,
    pub displacement_scale: f32,
    pub displacement_bias:  f32,
}

#[derive(Debug, Clone)]
pub struct TerrainPlane {
    pub spec:      TerrainSpec,
    /// Plane in its local XY frame; `transform` lays it flat.
    pub mesh:      PolyMesh,
    pub transform: Transform,
    pub material:  TerrainMaterial,
}

impl TerrainPlane {
    pub fn primitive(&self) -> Primitive {
        let (width_segments, height_segments) = self.spec.subdivisions();
        Primitive::Plane {
            width: self.spec.plane_width,
            height: self.spec.plane_height,
            width_segments,
            height_segments,
        }
    }

    pub fn apply_albedo(&mut self, texture: RgbaImage) {
        self.material.albedo = Some(texture);
    }

    pub fn apply_displacement(&mut self, texture: GrayImage) {
        self.material.displacement = Some(texture);
    }

    /// Local-space positions after displacement along the plane normal (+Z).
    /// Without a displacement raster the plane is returned flat.
    pub fn displaced_positions(&self) -> Vec<Vec3> {
        let Some(map) = &self.material.displacement else {
            return self.mesh.positions.clone();
        };
        let scale = self.material.displacement_scale;
        let bias = self.material.displacement_bias;

        self.mesh.positions.iter()
            .zip(&self.mesh.uvs)
            .map(|(&p, uv)| p + Vec3::Z * (sample(map, uv.x, uv.y) * scale + bias))
            .collect()
    }
}

/// Nearest texel, normalized to [0, 1]. UV v = 1 is the top image row.
fn sample(map: &GrayImage, u: f32, v: f32) -> f32 {
    let (w, h) = map.dimensions();
    if w == 0 || h == 0 {
        return 0.0;
    }
    let x = (u.clamp(0.0, 1.0) * (w - 1) as f32).round() as u32;
    let y = ((1.0 - v.clamp(0.0, 1.0)) * (h - 1) as f32).round() as u32;
    map.get_pixel(x, y).0[0] as f32 / 255.0
}

/// Decode a raster from disk.
///
/// The decode itself is blocking: the future completes on its first poll, so
/// awaiting it stalls the executor for the duration of the file read.
pub async fn load_raster(path: impl AsRef<Path>) -> Result<image::DynamicImage, TerrainError> {
    let path = path.as_ref();
    image::open(path).map_err(|source| TerrainError::Image { path: path.to_path_buf(), source })
}

pub struct HeightfieldTerrain {
    spec: TerrainSpec,
}

impl HeightfieldTerrain {
    pub fn new(spec: TerrainSpec) -> Result<Self, TerrainError> {
        spec.validate()?;
        Ok(Self { spec })
    }

    pub fn spec(&self) -> &TerrainSpec {
        &self.spec
    }

    /// Flat, untextured plane lying in the XZ plane.
    pub fn create(&self) -> TerrainPlane {
        let mut plane = TerrainPlane {
            spec:      self.spec,
            mesh:      PolyMesh::new(),
            transform: Transform::from_rotation(Quat::from_rotation_x(-FRAC_PI_2)),
            material:  TerrainMaterial {
                displacement_scale: self.spec.displacement_scale,
                displacement_bias: self.spec.displacement_bias,
                ..TerrainMaterial::default()
            },
        };
        plane.mesh = plane.primitive().build();
        let (sx, sy) = self.spec.subdivisions();
        log::debug!("terrain plane {sx}x{sy} segments, {} vertices", plane.mesh.vertex_count());
        plane
    }

    /// Load both rasters and assign each one that succeeds. Never fails.
    pub async fn load_textures(
        plane: &mut TerrainPlane,
        albedo_path: impl AsRef<Path>,
        displacement_path: impl AsRef<Path>,
    ) {
        match load_raster(albedo_path).await {
            Ok(image) => {
                plane.apply_albedo(image.to_rgba8());
                log::info!("albedo map loaded");
            }
            Err(e) => log::error!("failed to load albedo map: {e}"),
        }
        match load_raster(displacement_path).await {
            Ok(image) => {
                plane.apply_displacement(image.to_luma8());
                log::info!("displacement map loaded");
            }
            Err(e) => log::error!("failed to load displacement map: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use std::path::PathBuf;

    fn temp_png(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("procgen_terrain_{}_{name}.png", std::process::id()))
    }

    fn small_terrain() -> TerrainPlane {
        let spec = TerrainSpec::from_image_dimensions(40, 20);
        HeightfieldTerrain::new(spec).unwrap().create()
    }

    #[test]
    fn subdivisions_follow_image_size() {
        let spec = TerrainSpec::default();
        assert_eq!(spec.subdivisions(), (171, 79));
        let plane = HeightfieldTerrain::new(spec).unwrap().create();
        assert_eq!(plane.mesh.vertex_count(), 172 * 80);
        assert_eq!(plane.mesh.face_count(), 171 * 79);
    }

    #[test]
    fn plane_is_laid_flat_and_untextured() {
        let plane = small_terrain();
        assert!(plane.material.albedo.is_none());
        assert!(plane.material.displacement.is_none());
        assert_eq!(plane.material.displacement_scale, 4.0);
        assert_eq!(plane.material.displacement_bias, 0.0);

        let m = plane.transform.to_matrix();
        for p in &plane.mesh.positions {
            assert!(m.transform_point3(*p).y.abs() < 1e-5);
        }
        assert_eq!(plane.displaced_positions(), plane.mesh.positions);
    }

    #[test]
    fn tiny_images_and_bad_sizes_are_rejected() {
        assert!(matches!(
            HeightfieldTerrain::new(TerrainSpec::from_image_dimensions(9, 100)),
            Err(TerrainError::TooSmall { .. })
        ));
        let spec = TerrainSpec { plane_width: 0.0, ..TerrainSpec::default() };
        assert!(matches!(HeightfieldTerrain::new(spec), Err(TerrainError::PlaneSize { .. })));
    }

    #[test]
    fn displacement_follows_raster() {
        let mut plane = small_terrain();
        // Black on the left half, white on the right half
        let map = GrayImage::from_fn(4, 2, |x, _| Luma([if x >= 2 { 255 } else { 0 }]));
        plane.apply_displacement(map);

        let displaced = plane.displaced_positions();
        for ((d, p), uv) in displaced.iter().zip(&plane.mesh.positions).zip(&plane.mesh.uvs) {
            assert_eq!(d.x, p.x);
            assert_eq!(d.y, p.y);
            if uv.x <= 0.25 {
                assert_eq!(d.z, 0.0);
            } else if uv.x >= 0.75 {
                assert!((d.z - 4.0).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn textures_are_applied_when_loaded() {
        let albedo = temp_png("albedo");
        let height = temp_png("height");
        image::RgbaImage::from_pixel(8, 8, image::Rgba([10, 20, 30, 255])).save(&albedo).unwrap();
        GrayImage::from_pixel(8, 8, Luma([128])).save(&height).unwrap();

        let mut plane = small_terrain();
        pollster::block_on(HeightfieldTerrain::load_textures(&mut plane, &albedo, &height));
        assert_eq!(plane.material.albedo.as_ref().unwrap().dimensions(), (8, 8));
        assert_eq!(plane.material.displacement.as_ref().unwrap().get_pixel(0, 0).0, [128]);

        let _ = std::fs::remove_file(albedo);
        let _ = std::fs::remove_file(height);
    }

    #[test]
    fn failed_loads_leave_plane_intact() {
        let mut plane = small_terrain();
        let vertices = plane.mesh.vertex_count();
        pollster::block_on(HeightfieldTerrain::load_textures(
            &mut plane,
            temp_png("missing_albedo"),
            temp_png("missing_height"),
        ));
        assert!(plane.material.albedo.is_none());
        assert!(plane.material.displacement.is_none());
        assert_eq!(plane.mesh.vertex_count(), vertices);

        let err = pollster::block_on(load_raster(temp_png("missing"))).unwrap_err();
        assert!(matches!(err, TerrainError::Image { .. }));
    }
}
